//! Project metadata.
//!
//! [`ProjectState`] is a snapshot read fresh on every call. Nothing is
//! cached, so a check made right after an edit sees the edit.

use crate::error::Result;
use crate::xml::XmlDocument;

use super::dependency::Dependency;
use super::files::FileStore;
use super::paths::{LogicalPath, PathResolver};

/// Snapshot of a project's descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectState {
    /// Group identifier (inherited from the parent when not declared).
    pub group_id: Option<String>,
    /// Artifact identifier.
    pub artifact_id: Option<String>,
    /// Version (inherited from the parent when not declared).
    pub version: Option<String>,
    /// Declared dependencies, in document order.
    pub dependencies: Vec<Dependency>,
}

impl ProjectState {
    /// Dependencies sharing group and artifact with `dependency`, any version.
    pub fn dependencies_excluding_version(&self, dependency: &Dependency) -> Vec<&Dependency> {
        self.dependencies
            .iter()
            .filter(|d| d.same_artifact(dependency))
            .collect()
    }

    /// Display name for the project.
    pub fn display_name(&self) -> String {
        match (&self.group_id, &self.artifact_id) {
            (Some(g), Some(a)) => format!("{}:{}", g, a),
            (None, Some(a)) => a.clone(),
            _ => "unnamed project".to_string(),
        }
    }
}

/// Reads project metadata.
pub trait MetadataReader {
    /// Current project state, or `None` if no project descriptor exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor exists but cannot be read or parsed.
    fn project_state(&self) -> Result<Option<ProjectState>>;
}

/// Metadata reader for a Maven `pom.xml`.
pub struct PomMetadataReader<'a> {
    files: &'a dyn FileStore,
    paths: &'a dyn PathResolver,
    descriptor: String,
}

impl<'a> PomMetadataReader<'a> {
    /// Create a reader for the descriptor at `descriptor` under the project root.
    pub fn new(files: &'a dyn FileStore, paths: &'a dyn PathResolver, descriptor: &str) -> Self {
        Self {
            files,
            paths,
            descriptor: descriptor.to_string(),
        }
    }
}

impl MetadataReader for PomMetadataReader<'_> {
    fn project_state(&self) -> Result<Option<ProjectState>> {
        let path = self.paths.identifier(LogicalPath::Root, &self.descriptor);
        if !self.files.exists(&path) {
            return Ok(None);
        }

        let source = self.files.read(&path)?;
        let pom = XmlDocument::parse(&path, &source)?;

        let coordinate = |name: &str| -> Result<Option<String>> {
            let own = pom.find_first(&format!("/project/{}", name))?;
            let inherited = pom.find_first(&format!("/project/parent/{}", name))?;
            Ok(own
                .or(inherited)
                .map(|e| e.text().trim().to_string())
                .filter(|s| !s.is_empty()))
        };

        let dependencies = pom
            .find_all("/project/dependencies/dependency")?
            .into_iter()
            .filter_map(Dependency::from_element)
            .collect();

        Ok(Some(ProjectState {
            group_id: coordinate("groupId")?,
            artifact_id: coordinate("artifactId")?,
            version: coordinate("version")?,
            dependencies,
        }))
    }
}
