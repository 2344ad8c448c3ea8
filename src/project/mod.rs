//! Access to the target project.
//!
//! The installer only talks to a project through the traits defined here,
//! each with one local implementation:
//!
//! - [`FileStore`] / [`ProjectFileStore`] - transactional file access
//! - [`PathResolver`] / [`ProjectLayout`] - logical to physical paths
//! - [`MetadataReader`] / [`PomMetadataReader`] - project state
//! - [`DependencyManager`] / [`PomDependencyManager`] - manifest edits

pub mod dependency;
pub mod files;
pub mod metadata;
pub mod paths;

pub use dependency::{Dependency, DependencyManager, PomDependencyManager};
pub use files::{write_atomic, FileStore, MutableFile, ProjectFileStore};
pub use metadata::{MetadataReader, PomMetadataReader, ProjectState};
pub use paths::{LogicalPath, PathResolver, ProjectLayout};
