//! Dependency coordinates and the manifest operations on them.
//!
//! A dependency's identity is its (group, artifact) pair. Versions are
//! carried along but never take part in "is it already there" checks, so a
//! project that pins an older release is treated as having the dependency.

use std::fmt;

use crate::error::{Result, SetupError};
use crate::xml::{Element, XmlDocument};

use super::files::FileStore;
use super::paths::{LogicalPath, PathResolver};

/// Maven-style dependency coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// Group identifier.
    pub group_id: String,
    /// Artifact identifier.
    pub artifact_id: String,
    /// Version, absent when managed elsewhere.
    pub version: Option<String>,
    /// Scope (`compile`, `provided`, ...), absent for the default.
    pub scope: Option<String>,
}

impl Dependency {
    /// Create a dependency with a version.
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: Some(version.to_string()),
            scope: None,
        }
    }

    /// Set the scope (builder style).
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = Some(scope.to_string());
        self
    }

    /// Whether two dependencies share group and artifact, ignoring version.
    pub fn same_artifact(&self, other: &Dependency) -> bool {
        self.group_id == other.group_id && self.artifact_id == other.artifact_id
    }

    /// Read a `<dependency>` element.
    ///
    /// Returns `None` when `groupId` or `artifactId` is missing.
    pub fn from_element(element: &Element) -> Option<Self> {
        let non_empty = |name: &str| element.child_text(name).filter(|s| !s.is_empty());
        Some(Self {
            group_id: non_empty("groupId")?,
            artifact_id: non_empty("artifactId")?,
            version: non_empty("version"),
            scope: non_empty("scope"),
        })
    }

    /// Render as a `<dependency>` element.
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("dependency")
            .with_child(Element::new("groupId").with_text(&self.group_id))
            .with_child(Element::new("artifactId").with_text(&self.artifact_id));
        if let Some(version) = &self.version {
            element = element.with_child(Element::new("version").with_text(version));
        }
        if let Some(scope) = &self.scope {
            element = element.with_child(Element::new("scope").with_text(scope));
        }
        element
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if let Some(version) = &self.version {
            write!(f, ":{}", version)?;
        }
        Ok(())
    }
}

/// Operations on the project's dependency manifest.
pub trait DependencyManager {
    /// Add a dependency unless one with the same group and artifact exists.
    ///
    /// Returns `true` when the manifest changed.
    fn add_dependency(&self, dependency: &Dependency) -> Result<bool>;
}

/// Dependency manager editing the `<dependencies>` section of a `pom.xml`.
pub struct PomDependencyManager<'a> {
    files: &'a dyn FileStore,
    paths: &'a dyn PathResolver,
    descriptor: String,
}

impl<'a> PomDependencyManager<'a> {
    /// Create a manager for the descriptor at `descriptor` under the project root.
    pub fn new(files: &'a dyn FileStore, paths: &'a dyn PathResolver, descriptor: &str) -> Self {
        Self {
            files,
            paths,
            descriptor: descriptor.to_string(),
        }
    }
}

impl DependencyManager for PomDependencyManager<'_> {
    fn add_dependency(&self, dependency: &Dependency) -> Result<bool> {
        let pom_path = self.paths.identifier(LogicalPath::Root, &self.descriptor);
        if !self.files.exists(&pom_path) {
            return Err(SetupError::MissingFile {
                path: pom_path,
                message: "Project descriptor not found".to_string(),
            });
        }

        let file = self.files.update_file(&pom_path)?;
        let mut pom = XmlDocument::parse(file.path(), file.contents())?;

        let present = pom
            .find_all("/project/dependencies/dependency")?
            .into_iter()
            .filter_map(Dependency::from_element)
            .any(|existing| existing.same_artifact(dependency));
        if present {
            tracing::debug!("Dependency {} already present", dependency);
            return Ok(false);
        }

        let unit = pom.indent_unit();
        match pom.find_first_mut("/project/dependencies")? {
            Some(dependencies) => dependencies.append(dependency.to_element(), &unit),
            None => {
                let section = Element::new("dependencies").with_child(dependency.to_element());
                let project = pom.root_mut();
                match project.position("build")? {
                    Some(build) => project.insert_before(build, section, &unit),
                    None => project.append(section, &unit),
                }
            }
        }

        file.commit(&pom.to_xml_string())?;
        tracing::info!("Added dependency {}", dependency);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::files::ProjectFileStore;
    use crate::project::paths::ProjectLayout;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>com.example</groupId>
    <artifactId>petclinic</artifactId>
    <version>0.1.0</version>
    <dependencies>
        <dependency>
            <groupId>org.springframework</groupId>
            <artifactId>spring-webmvc</artifactId>
            <version>3.0.5.RELEASE</version>
        </dependency>
    </dependencies>
</project>
"#;

    fn sitemesh() -> Dependency {
        Dependency::new("opensymphony", "sitemesh", "2.4.2")
    }

    fn project(pom: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pom.xml"), pom).unwrap();
        temp
    }

    fn count(root: &Path, dependency: &Dependency) -> usize {
        let src = fs::read_to_string(root.join("pom.xml")).unwrap();
        let doc = XmlDocument::parse(Path::new("pom.xml"), &src).unwrap();
        doc.find_all("/project/dependencies/dependency")
            .unwrap()
            .into_iter()
            .filter_map(Dependency::from_element)
            .filter(|d| d.same_artifact(dependency))
            .count()
    }

    #[test]
    fn same_artifact_ignores_version() {
        let a = Dependency::new("opensymphony", "sitemesh", "2.4.2");
        let b = Dependency::new("opensymphony", "sitemesh", "2.3");
        let c = Dependency::new("opensymphony", "oscache", "2.4.2");
        assert!(a.same_artifact(&b));
        assert!(!a.same_artifact(&c));
    }

    #[test]
    fn display_includes_version_when_known() {
        assert_eq!(sitemesh().to_string(), "opensymphony:sitemesh:2.4.2");
        let mut managed = sitemesh();
        managed.version = None;
        assert_eq!(managed.to_string(), "opensymphony:sitemesh");
    }

    #[test]
    fn element_conversion_keeps_scope() {
        let dep = Dependency::new("javax.servlet", "servlet-api", "2.5").with_scope("provided");
        assert_eq!(Dependency::from_element(&dep.to_element()), Some(dep));
    }

    #[test]
    fn from_element_requires_coordinates() {
        let element = Element::new("dependency")
            .with_child(Element::new("groupId").with_text("x"));
        assert!(Dependency::from_element(&element).is_none());
    }

    #[test]
    fn adds_missing_dependency() {
        let temp = project(POM);
        let files = ProjectFileStore::new(temp.path());
        let layout = ProjectLayout::maven(temp.path());
        let manager = PomDependencyManager::new(&files, &layout, "pom.xml");

        assert!(manager.add_dependency(&sitemesh()).unwrap());
        assert_eq!(count(temp.path(), &sitemesh()), 1);

        let pom = fs::read_to_string(temp.path().join("pom.xml")).unwrap();
        assert!(pom.contains(
            "        <dependency>\n            <groupId>opensymphony</groupId>\n            <artifactId>sitemesh</artifactId>\n            <version>2.4.2</version>\n        </dependency>\n    </dependencies>"
        ));
    }

    #[test]
    fn existing_version_blocks_add() {
        let pom = POM.replace(
            "    </dependencies>",
            "        <dependency>\n            <groupId>opensymphony</groupId>\n            <artifactId>sitemesh</artifactId>\n            <version>2.3</version>\n        </dependency>\n    </dependencies>",
        );
        let temp = project(&pom);
        let files = ProjectFileStore::new(temp.path());
        let layout = ProjectLayout::maven(temp.path());
        let manager = PomDependencyManager::new(&files, &layout, "pom.xml");

        assert!(!manager.add_dependency(&sitemesh()).unwrap());
        assert_eq!(count(temp.path(), &sitemesh()), 1);
        assert_eq!(
            fs::read_to_string(temp.path().join("pom.xml")).unwrap(),
            pom
        );
    }

    #[test]
    fn adding_twice_keeps_one() {
        let temp = project(POM);
        let files = ProjectFileStore::new(temp.path());
        let layout = ProjectLayout::maven(temp.path());
        let manager = PomDependencyManager::new(&files, &layout, "pom.xml");

        assert!(manager.add_dependency(&sitemesh()).unwrap());
        assert!(!manager.add_dependency(&sitemesh()).unwrap());
        assert_eq!(count(temp.path(), &sitemesh()), 1);
    }

    #[test]
    fn creates_dependencies_section_before_build() {
        let temp = project(
            "<project>\n  <artifactId>a</artifactId>\n  <build>\n    <plugins/>\n  </build>\n</project>\n",
        );
        let files = ProjectFileStore::new(temp.path());
        let layout = ProjectLayout::maven(temp.path());
        let manager = PomDependencyManager::new(&files, &layout, "pom.xml");

        assert!(manager.add_dependency(&sitemesh()).unwrap());
        let pom = fs::read_to_string(temp.path().join("pom.xml")).unwrap();
        let deps = pom.find("<dependencies>").unwrap();
        let build = pom.find("<build>").unwrap();
        assert!(deps < build);
        assert_eq!(count(temp.path(), &sitemesh()), 1);
    }

    #[test]
    fn missing_descriptor_is_fatal() {
        let temp = TempDir::new().unwrap();
        let files = ProjectFileStore::new(temp.path());
        let layout = ProjectLayout::maven(temp.path());
        let manager = PomDependencyManager::new(&files, &layout, "pom.xml");

        let err = manager.add_dependency(&sitemesh()).unwrap_err();
        assert!(matches!(err, SetupError::MissingFile { .. }));
    }
}
