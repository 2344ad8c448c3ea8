//! Applicability checks run before installation.

use std::fmt;

use crate::project::{FileStore, LogicalPath, MetadataReader, PathResolver};
use crate::ui::UserInterface;

use super::{sitemesh_dependency, WEB_XML};

/// Why installation is or is not possible right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// All preconditions hold.
    Available,
    /// No readable project descriptor. Carries the parse failure, if any.
    NoProject { detail: Option<String> },
    /// The project has no web dispatch descriptor.
    NotWebProject,
    /// Some version of SiteMesh is already a dependency.
    AlreadyInstalled,
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Advisory message for the operator, `None` when available.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Available => None,
            Self::NoProject { detail: None } => {
                Some("Please configure a project first. Run 'project'.".to_string())
            }
            Self::NoProject {
                detail: Some(detail),
            } => Some(format!(
                "Please configure a project first. Run 'project'. ({})",
                detail
            )),
            Self::NotWebProject => Some(
                "Please set up a web project. No web.xml has been found. \
                 The 'controller' command will do this for you."
                    .to_string(),
            ),
            Self::AlreadyInstalled => Some("SiteMesh has already been installed.".to_string()),
        }
    }

    /// Stable machine-readable identifier.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::NoProject { .. } => "no_project",
            Self::NotWebProject => "not_web_project",
            Self::AlreadyInstalled => "already_installed",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => f.write_str(&reason),
            None => f.write_str("SiteMesh can be installed."),
        }
    }
}

/// Decides whether installation is safe and necessary.
///
/// Nothing here writes to the project; every call re-reads current state.
pub struct Checker<'a> {
    metadata: &'a dyn MetadataReader,
    files: &'a dyn FileStore,
    paths: &'a dyn PathResolver,
}

impl<'a> Checker<'a> {
    pub fn new(
        metadata: &'a dyn MetadataReader,
        files: &'a dyn FileStore,
        paths: &'a dyn PathResolver,
    ) -> Self {
        Self {
            metadata,
            files,
            paths,
        }
    }

    /// Evaluate the preconditions, stopping at the first that fails.
    pub fn availability(&self) -> Availability {
        let project = match self.metadata.project_state() {
            Ok(Some(project)) => project,
            Ok(None) => return Availability::NoProject { detail: None },
            Err(e) => {
                tracing::debug!("Project descriptor unreadable: {}", e);
                return Availability::NoProject {
                    detail: Some(e.to_string()),
                };
            }
        };

        let web_xml = self.paths.identifier(LogicalPath::SrcMainWebapp, WEB_XML);
        if !self.files.exists(&web_xml) {
            return Availability::NotWebProject;
        }

        if !project
            .dependencies_excluding_version(&sitemesh_dependency())
            .is_empty()
        {
            return Availability::AlreadyInstalled;
        }

        Availability::Available
    }

    pub fn is_available(&self) -> bool {
        self.availability().is_available()
    }

    /// Like [`is_available`](Self::is_available), reporting the failed
    /// precondition to the user.
    pub fn is_available_verbose(&self, ui: &mut dyn UserInterface) -> bool {
        let availability = self.availability();
        if let Some(reason) = availability.reason() {
            ui.warning(&reason);
        }
        availability.is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{PomMetadataReader, ProjectFileStore, ProjectLayout};
    use crate::ui::MockUI;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const POM: &str = "<project><groupId>com.example</groupId><artifactId>shop</artifactId><dependencies/></project>";

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn check(root: &Path) -> Availability {
        let files = ProjectFileStore::new(root);
        let layout = ProjectLayout::maven(root);
        let metadata = PomMetadataReader::new(&files, &layout, "pom.xml");
        Checker::new(&metadata, &files, &layout).availability()
    }

    #[test]
    fn web_project_is_available() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "pom.xml", POM);
        write(temp.path(), "src/main/webapp/WEB-INF/web.xml", "<web-app/>");
        assert_eq!(check(temp.path()), Availability::Available);
    }

    #[test]
    fn no_project_wins_over_web_xml() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/main/webapp/WEB-INF/web.xml", "<web-app/>");
        assert_eq!(check(temp.path()), Availability::NoProject { detail: None });
    }

    #[test]
    fn malformed_descriptor_reports_no_project() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "pom.xml", "<project>");
        let availability = check(temp.path());
        assert_eq!(availability.code(), "no_project");
        assert!(availability
            .reason()
            .unwrap()
            .starts_with("Please configure a project first."));
    }

    #[test]
    fn missing_web_xml_is_not_a_web_project() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "pom.xml", POM);
        assert_eq!(check(temp.path()), Availability::NotWebProject);
    }

    #[test]
    fn any_sitemesh_version_means_installed() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "pom.xml",
            "<project><dependencies><dependency><groupId>opensymphony</groupId><artifactId>sitemesh</artifactId><version>2.2.1</version></dependency></dependencies></project>",
        );
        write(temp.path(), "src/main/webapp/WEB-INF/web.xml", "<web-app/>");
        assert_eq!(check(temp.path()), Availability::AlreadyInstalled);
    }

    #[test]
    fn verbose_check_reports_reason() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "pom.xml", POM);
        let files = ProjectFileStore::new(temp.path());
        let layout = ProjectLayout::maven(temp.path());
        let metadata = PomMetadataReader::new(&files, &layout, "pom.xml");
        let checker = Checker::new(&metadata, &files, &layout);

        let mut ui = MockUI::new();
        assert!(!checker.is_available_verbose(&mut ui));
        assert!(ui.has_warning("No web.xml has been found"));

        let mut quiet = MockUI::new();
        write(temp.path(), "src/main/webapp/WEB-INF/web.xml", "<web-app/>");
        assert!(checker.is_available_verbose(&mut quiet));
        assert!(quiet.warnings().is_empty());
    }

    #[test]
    fn messages_match_operator_wording() {
        assert_eq!(
            Availability::NoProject { detail: None }.to_string(),
            "Please configure a project first. Run 'project'."
        );
        assert_eq!(
            Availability::NotWebProject.to_string(),
            "Please set up a web project. No web.xml has been found. The 'controller' command will do this for you."
        );
        assert_eq!(
            Availability::AlreadyInstalled.to_string(),
            "SiteMesh has already been installed."
        );
        assert!(Availability::Available.reason().is_none());
    }
}
