//! Configuration schema.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
    /// Where the project keeps its descriptors and sources.
    pub layout: LayoutConfig,
}

/// Project layout, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Project descriptor holding coordinates and dependencies.
    pub project_descriptor: String,

    /// Web application root (contains `WEB-INF`).
    pub webapp_root: String,

    /// Resources root.
    pub resources_root: String,

    /// Java sources root.
    pub java_root: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            project_descriptor: "pom.xml".to_string(),
            webapp_root: "src/main/webapp".to_string(),
            resources_root: "src/main/resources".to_string(),
            java_root: "src/main/java".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_maven_layout() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.project_descriptor, "pom.xml");
        assert_eq!(layout.webapp_root, "src/main/webapp");
        assert_eq!(layout.resources_root, "src/main/resources");
        assert_eq!(layout.java_root, "src/main/java");
    }

    #[test]
    fn empty_document_gives_defaults() {
        let config: SetupConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, SetupConfig::default());
    }

    #[test]
    fn partial_layout_keeps_other_defaults() {
        let config: SetupConfig =
            serde_yaml::from_str("layout:\n  webapp_root: war\n").unwrap();
        assert_eq!(config.layout.webapp_root, "war");
        assert_eq!(config.layout.project_descriptor, "pom.xml");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<SetupConfig, _> =
            serde_yaml::from_str("layout:\n  webroot: war\n");
        assert!(result.is_err());
    }
}
