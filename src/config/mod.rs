//! Configuration loading and parsing.
//!
//! The installer works without any configuration: every setting has a
//! default matching the standard Maven web project layout. Projects with a
//! different layout describe it in `.sitemesh/config.yml`:
//!
//! ```yaml
//! layout:
//!   webapp_root: web
//!   project_descriptor: pom.xml
//! ```
//!
//! # Example
//!
//! ```
//! use sitemesh_setup::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::create_dir_all(temp.path().join(".sitemesh")).unwrap();
//! fs::write(temp.path().join(".sitemesh/config.yml"), "layout:\n  webapp_root: web\n").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.layout.webapp_root, "web");
//! assert_eq!(config.layout.project_descriptor, "pom.xml");
//! ```

pub mod loader;
pub mod schema;

pub use loader::{config_path, load_config, load_config_file, parse_config};
pub use schema::{LayoutConfig, SetupConfig};
