//! Status command implementation.
//!
//! The `sitemesh-setup status` command reports whether SiteMesh can be
//! installed into the project.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::StatusArgs;
use crate::cli::context::ProjectContext;
use crate::error::{Result, SetupError};
use crate::sitemesh::{Availability, SitemeshOperations};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Machine-readable status for `--json`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub project: String,
    pub available: bool,
    pub code: &'static str,
    pub reason: Option<String>,
}

impl StatusReport {
    fn new(project: String, availability: &Availability) -> Self {
        Self {
            project,
            available: availability.is_available(),
            code: availability.code(),
            reason: availability.reason(),
        }
    }
}

/// The status command implementation.
pub struct StatusCommand {
    project_root: PathBuf,
    config: Option<PathBuf>,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(project_root: &Path, config: Option<&Path>, args: StatusArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config: config.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let project = ProjectContext::load(&self.project_root, self.config.as_deref())?;
        let metadata = project.metadata();
        let dependencies = project.dependencies();
        let ops = SitemeshOperations::new(project.files(), project.layout(), &metadata, &dependencies);

        if self.args.json {
            let availability = ops.availability();
            let report = StatusReport::new(project.display_name(), &availability);
            let output =
                serde_json::to_string_pretty(&report).map_err(|e| SetupError::Other(e.into()))?;
            ui.message(&output);
            return Ok(exit_for(availability.is_available()));
        }

        ui.show_header(&format!("{} - SiteMesh", project.display_name()));

        if ops.is_install_sitemesh_available_verbose(ui) {
            ui.success("SiteMesh can be installed.");
            ui.show_hint("Run 'sitemesh-setup install' to install it.");
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

fn exit_for(available: bool) -> CommandResult {
    if available {
        CommandResult::success()
    } else {
        CommandResult::failure(1)
    }
}
