//! Install command implementation.
//!
//! The `sitemesh-setup install` command checks the project, asks for
//! confirmation, then runs the installer one step at a time.

use std::path::{Path, PathBuf};

use crate::cli::args::InstallArgs;
use crate::cli::context::ProjectContext;
use crate::error::Result;
use crate::project::PathResolver;
use crate::sitemesh::{FilterInsertion, InstallReport, InstallStep, SitemeshOperations};
use crate::ui::{Prompt, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Prompt key for the confirmation (`SITEMESH_PROMPT_CONFIRM_INSTALL`).
pub const CONFIRM_KEY: &str = "confirm_install";

/// The install command implementation.
pub struct InstallCommand {
    project_root: PathBuf,
    config: Option<PathBuf>,
    args: InstallArgs,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(project_root: &Path, config: Option<&Path>, args: InstallArgs) -> Self {
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

    /// Non-interactive UIs answer from `SITEMESH_PROMPT_CONFIRM_INSTALL` or
    /// the default.
    fn confirmed(&self, ui: &mut dyn UserInterface) -> Result<bool> {
        if self.args.yes {
            return Ok(true);
        }
        let prompt = Prompt::confirm(CONFIRM_KEY, "Install SiteMesh into this project?", true);
        Ok(ui.prompt(&prompt)?.as_bool().unwrap_or(false))
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let project = ProjectContext::load(&self.project_root, self.config.as_deref())?;
        let metadata = project.metadata();
        let dependencies = project.dependencies();
        let ops = SitemeshOperations::new(project.files(), project.layout(), &metadata, &dependencies);

        ui.show_header(&format!("{} - Install SiteMesh", project.display_name()));

        if !ops.is_install_sitemesh_available_verbose(ui) {
            if !self.args.force {
                ui.show_hint("Use --force to run the installer anyway.");
                return Ok(CommandResult::failure(1));
            }
            ui.warning("Continuing because --force was given.");
        }

        if !self.confirmed(ui)? {
            ui.message("Installation cancelled.");
            return Ok(CommandResult::failure(1));
        }

        let installer = ops.installer();
        let mut report = InstallReport::default();
        for step in InstallStep::ALL {
            let mut spinner = ui.start_spinner(step.label());
            match installer.run_step(step, &mut report) {
                Ok(()) => spinner.finish_success(step.label()),
                Err(e) => {
                    spinner.finish_error(&format!("{}: {}", step.label(), e));
                    return Err(e);
                }
            }
        }

        show_report(ui, project.layout(), &report);
        ui.success("SiteMesh installed.");
        Ok(CommandResult::success())
    }
}

fn show_report(ui: &mut dyn UserInterface, paths: &dyn PathResolver, report: &InstallReport) {
    for dependency in &report.dependencies_added {
        ui.message(&format!("Added dependency {}", dependency));
    }
    for dependency in &report.dependencies_present {
        ui.message(&format!("Dependency {} already present", dependency));
    }

    if report.assets_skipped {
        ui.message("Decorator templates already present; left unchanged");
    } else if ui.output_mode().shows_detail() {
        for asset in &report.assets_created {
            ui.message(&format!("Created {}", paths.friendly_name(asset)));
        }
    } else {
        ui.message(&format!("Created {} decorator files", report.assets_created.len()));
    }

    for filter in &report.filters {
        match filter.insertion {
            FilterInsertion::Inserted { anchored: true } => {
                ui.message(&format!("Added filter {}", filter.name));
            }
            FilterInsertion::Completed { anchored: true } => {
                ui.message(&format!("Completed partial configuration of filter {}", filter.name));
            }
            FilterInsertion::Inserted { anchored: false }
            | FilterInsertion::Completed { anchored: false } => {
                ui.warning(&format!(
                    "Added filter {}, but HttpMethodFilter is not mapped; check the filter order in web.xml",
                    filter.name
                ));
            }
            FilterInsertion::AlreadyPresent => {
                ui.message(&format!("Filter {} already declared", filter.name));
            }
        }
    }

    ui.message(&format!(
        "Removed {} view resolver bean(s)",
        report.resolver_beans_removed
    ));
}
