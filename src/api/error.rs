//! API error types for the JIRA client.

use thiserror::Error;

/// Errors that can occur when talking to the JIRA API.
///
/// Non-2xx responses keep the response body verbatim so it can be shown
/// to the user unmodified; JIRA's error bodies are usually the only
/// useful diagnostic.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("JIRA returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Transport-level failure: DNS, timeout, connection refused.
    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// The createmeta response contained no entry for the project.
    #[error("Project '{0}' not found or not visible to this account")]
    ProjectNotFound(String),

    /// A 2xx response whose body could not be interpreted.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// HTTP status of the response, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened before the server produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status() {
        let err = ApiError::Api {
            status: 401,
            body: "Unauthorized".to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_project_not_found_has_no_status() {
        let err = ApiError::ProjectNotFound("AUT".to_string());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_api_error_display_keeps_body_verbatim() {
        let err = ApiError::Api {
            status: 400,
            body: r#"{"errorMessages":["Field 'priority' is required"]}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("HTTP 400"));
        assert!(msg.contains("Field 'priority' is required"));
    }

    #[test]
    fn test_project_not_found_display() {
        let err = ApiError::ProjectNotFound("AUT".to_string());
        assert!(err.to_string().contains("AUT"));
        assert!(err.to_string().contains("not found"));
    }
}
