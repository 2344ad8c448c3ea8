//! Template assets embedded at compile time.

use std::path::Path;

use include_dir::{include_dir, Dir};

use crate::error::{Result, SetupError};
use crate::project::Dependency;
use crate::xml::XmlDocument;

/// Embedded templates directory.
static TEMPLATES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Bundled configuration listing the dependencies to merge.
pub const CONFIGURATION: &str = "configuration.xml";

/// Raw contents of an embedded template, by path relative to `templates/`.
pub fn template(name: &str) -> Result<&'static [u8]> {
    TEMPLATES_DIR
        .get_file(name)
        .map(|f| f.contents())
        .ok_or_else(|| SetupError::TemplateNotFound {
            name: name.to_string(),
        })
}

/// Dependencies declared in the bundled configuration.
pub fn required_dependencies() -> Result<Vec<Dependency>> {
    let path = Path::new("templates").join(CONFIGURATION);
    let source = std::str::from_utf8(template(CONFIGURATION)?).map_err(|e| SetupError::XmlParse {
        path: path.clone(),
        message: format!("invalid UTF-8: {}", e),
    })?;
    declared_dependencies(&path, source)
}

/// Every `<dependency>` in a configuration document.
///
/// A dependency without `groupId` or `artifactId` is an `XmlParse` error.
fn declared_dependencies(path: &Path, source: &str) -> Result<Vec<Dependency>> {
    let configuration = XmlDocument::parse(path, source)?;
    configuration
        .find_all("/configuration/sitemesh/dependencies/dependency")?
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            Dependency::from_element(element).ok_or_else(|| SetupError::XmlParse {
                path: path.to_path_buf(),
                message: format!("dependency #{} needs a groupId and an artifactId", index + 1),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_assets_are_present() {
        for name in [
            "configuration.xml",
            "decorators.xml",
            "sitemesh.xml",
            "decorators/default.jspx",
            "decorators/public.jspx",
        ] {
            assert!(!template(name).unwrap().is_empty(), "{name}");
        }
    }

    #[test]
    fn unknown_template_is_an_error() {
        let err = template("decorators/missing.jspx").unwrap_err();
        assert!(matches!(err, SetupError::TemplateNotFound { ref name } if name == "decorators/missing.jspx"));
    }

    #[test]
    fn required_dependencies_lists_sitemesh() {
        let deps = required_dependencies().unwrap();
        assert_eq!(deps, vec![Dependency::new("opensymphony", "sitemesh", "2.4.2")]);
    }

    #[test]
    fn incomplete_bundled_dependency_is_an_error() {
        let source = "<configuration><sitemesh><dependencies>\n<dependency><groupId>opensymphony</groupId><artifactId>sitemesh</artifactId></dependency>\n<dependency><groupId>opensymphony</groupId></dependency>\n</dependencies></sitemesh></configuration>";
        let err = declared_dependencies(Path::new("configuration.xml"), source).unwrap_err();
        match err {
            SetupError::XmlParse { message, .. } => assert!(message.contains("dependency #2")),
            other => panic!("expected XmlParse, got {other:?}"),
        }
    }

    #[test]
    fn xml_templates_are_well_formed() {
        for name in ["configuration.xml", "decorators.xml", "sitemesh.xml"] {
            let source = std::str::from_utf8(template(name).unwrap()).unwrap();
            XmlDocument::parse(Path::new(name), source).unwrap();
        }
    }
}
