//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::SetupConfig;
use crate::error::{Result, SetupError};

/// Location of the project configuration file.
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(".sitemesh").join("config.yml")
}

/// Load configuration for a project.
///
/// If `config_override` is provided, that file is loaded and must exist.
/// Otherwise `.sitemesh/config.yml` is used when present, and defaults
/// when it is not.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<SetupConfig> {
    if let Some(path) = config_override {
        return load_config_file(path);
    }

    let path = config_path(project_root);
    if path.exists() {
        load_config_file(&path)
    } else {
        tracing::debug!("No config at {}, using defaults", path.display());
        Ok(SetupConfig::default())
    }
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `MissingFile` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<SetupConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SetupError::MissingFile {
                path: path.to_path_buf(),
                message: "Configuration not found".to_string(),
            }
        } else {
            SetupError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into a [`SetupConfig`].
///
/// An empty file is treated as an empty mapping.
pub fn parse_config(content: &str, source_path: &Path) -> Result<SetupConfig> {
    if content.trim().is_empty() {
        return Ok(SetupConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| SetupError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_project_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config, SetupConfig::default());
    }

    #[test]
    fn loads_project_config() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".sitemesh")).unwrap();
        fs::write(
            config_path(temp.path()),
            "layout:\n  webapp_root: web\n  project_descriptor: build/pom.xml\n",
        )
        .unwrap();

        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config.layout.webapp_root, "web");
        assert_eq!(config.layout.project_descriptor, "build/pom.xml");
    }

    #[test]
    fn empty_config_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".sitemesh")).unwrap();
        fs::write(config_path(temp.path()), "").unwrap();

        assert_eq!(load_config(temp.path(), None).unwrap(), SetupConfig::default());
    }

    #[test]
    fn override_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");
        let err = load_config(temp.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, SetupError::MissingFile { .. }));
    }

    #[test]
    fn override_takes_precedence() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".sitemesh")).unwrap();
        fs::write(config_path(temp.path()), "layout:\n  webapp_root: web\n").unwrap();
        let other = temp.path().join("other.yml");
        fs::write(&other, "layout:\n  webapp_root: war\n").unwrap();

        let config = load_config(temp.path(), Some(&other)).unwrap();
        assert_eq!(config.layout.webapp_root, "war");
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yml");
        fs::write(&path, "layout: [unclosed").unwrap();

        let err = load_config_file(&path).unwrap_err();
        match err {
            SetupError::ConfigParseError { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected ConfigParseError, got {other:?}"),
        }
    }
}
