//! # Error Handling
//!
//! This module defines the centralized error type for `gitinfo`. It uses the
//! `thiserror` library to build a single `Error` enum covering every failure
//! the collector can report, each with enough context to produce a useful
//! message on the command line.
//!
//! ## Fatal versus recorded failures
//!
//! Only two variants ever end a run:
//!
//! - **`InvalidReference`**: the repository string could not be parsed. This is
//!   raised before any filesystem or network access.
//! - **`SyncFailed`**: the initial clone failed, so there is no workspace to
//!   collect evidence from.
//!
//! `CommandFailed` and `FetchFailed` exist so the components that produce them
//! have a typed error internally, but they are converted into best-effort data
//! (`CommandOutcome::Failed`, a zero-status `FetchResult`) before leaving their
//! component. The remaining variants wrap I/O and parsing errors from the
//! artifact writer and the settings file.

use thiserror::Error;

/// Main error type for gitinfo operations
#[derive(Error, Debug)]
pub enum Error {
    /// The repository reference is not a supported forge URL or SSH shorthand.
    #[error("Invalid repository reference '{input}': {reason}")]
    InvalidReference { input: String, reason: String },

    /// Cloning the repository into a fresh workspace failed.
    ///
    /// Includes the canonical URL, the diagnostic from git, and an optional
    /// hint for resolution.
    #[error("Clone failed for {url}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    SyncFailed {
        url: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// An external command exited unsuccessfully or could not be started.
    #[error("Command failed: {command} - {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// An HTTP request could not be completed at the transport level.
    #[error("Fetch failed for {url}: {message}")]
    FetchFailed { url: String, message: String },

    /// The settings file could not be parsed.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Builds an `InvalidReference` error for `input`.
    pub fn invalid_reference(input: &str, reason: impl Into<String>) -> Self {
        Error::InvalidReference {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
