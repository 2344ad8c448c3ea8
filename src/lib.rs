//! sitemesh-setup - Install SiteMesh 2 page decoration into Spring MVC web projects.
//!
//! The installer edits an existing project in place: it adds the SiteMesh
//! dependency to the project descriptor, copies decorator templates into
//! `WEB-INF`, registers the decoration filters in `web.xml` and replaces
//! Tiles view resolution in `webmvc-config.xml`. Every step checks for its
//! own prior effect, so running it twice leaves the project unchanged.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Project layout configuration
//! - [`error`] - Error types and result aliases
//! - [`project`] - File access, logical paths and the dependency manifest
//! - [`sitemesh`] - Applicability checks and the install pipeline
//! - [`ui`] - Prompts, spinners, and terminal output
//! - [`xml`] - Round-trip XML documents and path expressions
//!
//! # Example
//!
//! ```
//! use sitemesh_setup::sitemesh::{sitemesh_filter, Dispatcher};
//!
//! let filter = sitemesh_filter();
//! assert_eq!(filter.name, "sitemeshFilter");
//! assert_eq!(filter.dispatchers, [Dispatcher::Request, Dispatcher::Error]);
//! ```
//!
//! For installing into a project on disk, see the integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod project;
pub mod sitemesh;
pub mod ui;
pub mod xml;

pub use error::{Result, SetupError};
