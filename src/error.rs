//! Centralized error types for jiraseed.
//!
//! This module aggregates the per-module error enums into one
//! application error with user-friendly display messages. All error
//! types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::submit::SubmitError;
use crate::templates::TemplateError;

/// The main application error type.
///
/// Aggregates everything that can fail in jiraseed, providing
/// user-friendly messages while preserving the underlying error for
/// debugging. Errors are shown once and never retried automatically.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Template file errors.
    #[error("{0}")]
    Template(#[from] TemplateError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Submission validation or dispatch errors.
    #[error("{0}")]
    Submit(#[from] SubmitError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    ///
    /// Non-2xx API bodies are passed through verbatim; JIRA's own error
    /// text is usually the most useful thing to show.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::MissingVar(var) => format!(
                    "Missing configuration: set {} in the environment or a .env file.",
                    var
                ),
                ConfigError::Validation(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Template(e) => match e {
                TemplateError::NotFound { path } => format!(
                    "No templates available: {} does not exist.",
                    path.display()
                ),
                TemplateError::Read { path, .. } => {
                    format!("Could not read the template file {}.", path.display())
                }
                TemplateError::Parse { path, source } => format!(
                    "Template file {} is not valid JSON: {}",
                    path.display(),
                    source
                ),
            },
            AppError::Api(e) => match e {
                ApiError::Api { status: 401, .. } => {
                    "Authentication failed (HTTP 401). Check your email and API token.".to_string()
                }
                ApiError::Api { status, body } => format!("JIRA rejected the request (HTTP {}): {}", status, body),
                ApiError::Connection(err) => format!("Could not reach JIRA: {}", err),
                ApiError::ProjectNotFound(key) => format!(
                    "Project '{}' was not found or is not visible to this account.",
                    key
                ),
                ApiError::InvalidResponse(msg) => {
                    format!("Unexpected response from JIRA: {}", msg)
                }
            },
            AppError::Submit(e) => match e {
                SubmitError::UnknownIssueType(name) => format!(
                    "Issue type '{}' is not available in this project. Run 'jiraseed types' to list valid types.",
                    name
                ),
                SubmitError::MissingParentKey(name) => format!(
                    "Issue type '{}' is a subtask; supply a parent issue key with --parent.",
                    name
                ),
                SubmitError::EmptySummary => "The summary must not be empty.".to_string(),
                SubmitError::Api(_) => e.to_string(),
            },
            AppError::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// A short status-line summary, e.g. for the final line of output.
    pub fn status_line(&self) -> String {
        match self {
            AppError::Config(_) => "configuration error".to_string(),
            AppError::Template(_) => "template error".to_string(),
            AppError::Api(ApiError::Api { status, .. })
            | AppError::Submit(SubmitError::Api(ApiError::Api { status, .. })) => {
                format!("request failed (HTTP {})", status)
            }
            AppError::Api(_) | AppError::Submit(SubmitError::Api(_)) => {
                "connection error".to_string()
            }
            AppError::Submit(_) => "validation error".to_string(),
            AppError::Io(_) => "io error".to_string(),
            AppError::Other(_) => "error".to_string(),
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
