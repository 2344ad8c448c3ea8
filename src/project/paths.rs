//! Logical project paths.
//!
//! Callers name a logical root plus a fragment (`SrcMainWebapp` +
//! `WEB-INF/web.xml`) and the resolver maps it onto the project's physical
//! layout, so nothing else needs to know where a project keeps its web root.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::LayoutConfig;

/// A logical root inside a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalPath {
    /// The project root itself.
    Root,
    /// Java sources.
    SrcMainJava,
    /// Classpath resources.
    SrcMainResources,
    /// Web application root (parent of `WEB-INF`).
    SrcMainWebapp,
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Root => "ROOT",
            Self::SrcMainJava => "SRC_MAIN_JAVA",
            Self::SrcMainResources => "SRC_MAIN_RESOURCES",
            Self::SrcMainWebapp => "SRC_MAIN_WEBAPP",
        };
        f.write_str(name)
    }
}

/// Maps logical paths onto concrete filesystem paths.
pub trait PathResolver {
    /// Concrete directory for a logical root.
    fn root(&self, path: LogicalPath) -> PathBuf;

    /// Concrete path for `relative` under a logical root.
    ///
    /// Leading slashes on `relative` are ignored, so `/WEB-INF/web.xml` and
    /// `WEB-INF/web.xml` resolve to the same file.
    fn identifier(&self, path: LogicalPath, relative: &str) -> PathBuf {
        let trimmed = relative.trim_start_matches(['/', '\\']);
        if trimmed.is_empty() {
            self.root(path)
        } else {
            self.root(path).join(trimmed)
        }
    }

    /// Human-readable form of a concrete path (`SRC_MAIN_WEBAPP/WEB-INF/web.xml`).
    fn friendly_name(&self, path: &Path) -> String;
}

/// Path resolver for a project on disk.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    project_root: PathBuf,
    layout: LayoutConfig,
}

impl ProjectLayout {
    /// Create a resolver for a project root and layout.
    pub fn new(project_root: &Path, layout: LayoutConfig) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            layout,
        }
    }

    /// Create a resolver using the default Maven layout.
    pub fn maven(project_root: &Path) -> Self {
        Self::new(project_root, LayoutConfig::default())
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Path of the project descriptor.
    pub fn project_descriptor(&self) -> PathBuf {
        self.identifier(LogicalPath::Root, &self.layout.project_descriptor)
    }
}

impl PathResolver for ProjectLayout {
    fn root(&self, path: LogicalPath) -> PathBuf {
        match path {
            LogicalPath::Root => self.project_root.clone(),
            LogicalPath::SrcMainJava => self.project_root.join(&self.layout.java_root),
            LogicalPath::SrcMainResources => self.project_root.join(&self.layout.resources_root),
            LogicalPath::SrcMainWebapp => self.project_root.join(&self.layout.webapp_root),
        }
    }

    fn friendly_name(&self, path: &Path) -> String {
        // Most specific root first; Root contains all others.
        let roots = [
            LogicalPath::SrcMainWebapp,
            LogicalPath::SrcMainResources,
            LogicalPath::SrcMainJava,
            LogicalPath::Root,
        ];
        for logical in roots {
            if let Ok(rest) = path.strip_prefix(self.root(logical)) {
                let rest = rest.to_string_lossy().replace('\\', "/");
                return format!("{}/{}", logical, rest);
            }
        }
        path.display().to_string()
    }
}
