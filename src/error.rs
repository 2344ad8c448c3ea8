//! Error types for installer operations.
//!
//! This module defines [`SetupError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Precondition failures are not errors; they are reported as
//!   [`Availability`](crate::sitemesh::Availability) values
//! - Use `SetupError` for fatal conditions that abort the install pipeline
//! - Use `anyhow::Error` (via `SetupError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for installer operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A file the installer needs is not present in the project.
    #[error("{message}: {path}")]
    MissingFile { path: PathBuf, message: String },

    /// A configuration document could not be parsed.
    #[error("Failed to parse XML document {path}: {message}")]
    XmlParse { path: PathBuf, message: String },

    /// A path expression used to query a document is malformed.
    #[error("Invalid path expression '{expression}': {message}")]
    XmlQuery { expression: String, message: String },

    /// An embedded template asset does not exist.
    #[error("Unknown template: {name}")]
    TemplateNotFound { name: String },

    /// Failed to parse the installer configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A prompt was needed but no answer can be obtained.
    #[error("Cannot prompt for '{key}' in non-interactive mode (no default value)")]
    PromptUnavailable { key: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for installer operations.
pub type Result<T> = std::result::Result<T, SetupError>;
