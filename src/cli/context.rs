//! Wiring a project directory to the installer's collaborators.

use std::path::{Path, PathBuf};

use crate::config::load_config;
use crate::error::Result;
use crate::project::{
    MetadataReader, PomDependencyManager, PomMetadataReader, ProjectFileStore, ProjectLayout,
};

/// Local collaborators for one project, built from its configuration.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    files: ProjectFileStore,
    layout: ProjectLayout,
    descriptor: String,
}

impl ProjectContext {
    /// Load configuration and build the collaborators for `project_root`.
    pub fn load(project_root: &Path, config_override: Option<&Path>) -> Result<Self> {
        let config = load_config(project_root, config_override)?;
        tracing::debug!("Using layout {:?}", config.layout);
        Ok(Self {
            files: ProjectFileStore::new(project_root),
            descriptor: config.layout.project_descriptor.clone(),
            layout: ProjectLayout::new(project_root, config.layout),
        })
    }

    pub fn files(&self) -> &ProjectFileStore {
        &self.files
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn metadata(&self) -> PomMetadataReader<'_> {
        PomMetadataReader::new(&self.files, &self.layout, &self.descriptor)
    }

    pub fn dependencies(&self) -> PomDependencyManager<'_> {
        PomDependencyManager::new(&self.files, &self.layout, &self.descriptor)
    }

    /// Name for headers: the project coordinates, else the directory name.
    pub fn display_name(&self) -> String {
        if let Ok(Some(state)) = self.metadata().project_state() {
            if state.artifact_id.is_some() {
                return state.display_name();
            }
        }
        self.layout
            .project_root()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.layout.project_root().display().to_string())
    }

    pub fn project_root(&self) -> PathBuf {
        self.layout.project_root().to_path_buf()
    }
}
