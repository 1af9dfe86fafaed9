//! JIRA API client implementation.
//!
//! This module provides the client for the three JIRA REST API v3 calls
//! this tool makes: the authentication smoke test, the issue-type
//! metadata fetch, and issue creation. Each operation performs exactly
//! one request; a failed attempt is terminal and must be re-triggered by
//! the caller.

use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use tracing::{debug, info, instrument, warn};

use super::auth::Auth;
use super::error::{ApiError, Result};
use super::types::{
    CreateIssuePayload, CreateMetaResponse, CreatedIssue, CurrentUser, IssueTypeCatalog,
};
use crate::config::Config;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The JIRA API client.
///
/// Provides async methods for the JIRA REST API v3 endpoints used by
/// this tool. Holds the base URL and the pre-encoded Basic Auth header.
#[derive(Debug)]
pub struct JiraClient {
    /// The HTTP client.
    client: Client,
    /// The base URL for the JIRA instance.
    base_url: String,
    /// Authentication credentials.
    auth: Auth,
}

impl JiraClient {
    /// Create a new JIRA client from a configuration value.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_credentials(&config.base_url, &config.email, &config.api_token)
    }

    /// Create a new JIRA client with explicit credentials.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The JIRA instance URL
    /// * `email` - The user's email address
    /// * `token` - The API token
    pub fn with_credentials(base_url: &str, email: &str, token: &str) -> Result<Self> {
        let auth = Auth::new(email, token);
        let client = Self::build_http_client()?;
        let base_url = normalize_base_url(base_url);

        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    /// Build the HTTP client with appropriate settings.
    fn build_http_client() -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(ApiError::Connection)
    }

    /// Get the current authenticated user.
    ///
    /// Calls `GET /rest/api/3/myself`. This is the authentication smoke
    /// test: it verifies the URL is reachable and the credentials are
    /// accepted without touching any project.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<CurrentUser> {
        debug!("Checking credentials against /myself");

        let url = format!("{}/rest/api/3/myself", self.base_url);
        let user: CurrentUser = self.get_json(&url).await?;

        info!("Authenticated as {}", user.display_name);
        Ok(user)
    }

    /// Fetch the issue-type catalog for a project.
    ///
    /// Calls the issue-creation-metadata endpoint with issue-type
    /// expansion and maps each returned `name` to its `id`.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` when a 2xx response contains no project
    /// entry for the key, `Api` on a non-2xx response, and `Connection`
    /// on transport failure.
    #[instrument(skip(self), fields(project_key = %project_key))]
    pub async fn fetch_issue_types(&self, project_key: &str) -> Result<IssueTypeCatalog> {
        debug!("Fetching issue-type metadata");

        let url = format!(
            "{}/rest/api/3/issue/createmeta?projectKeys={}&expand=projects.issuetypes",
            self.base_url,
            urlencoding::encode(project_key)
        );

        let response: CreateMetaResponse = self.get_json(&url).await?;
        let catalog = IssueTypeCatalog::from_createmeta(response, project_key)?;

        debug!("Catalog holds {} issue types", catalog.len());
        Ok(catalog)
    }

    /// Create an issue.
    ///
    /// Performs exactly one `POST /rest/api/3/issue`; there are no
    /// retries. On a non-2xx response the body is kept verbatim in the
    /// returned error.
    #[instrument(skip_all, fields(project = %payload.fields.project.key))]
    pub async fn create_issue(&self, payload: &CreateIssuePayload) -> Result<CreatedIssue> {
        let url = format!("{}/rest/api/3/issue", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, self.auth.header_value())
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await?;

        let created: CreatedIssue = Self::handle_response(response).await?;
        info!("Created issue {}", created.key);
        Ok(created)
    }

    /// Perform a single authenticated GET and parse the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, self.auth.header_value())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Consume an HTTP response, checking the status and parsing JSON.
    async fn handle_response<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!("Error response body: {}", body);
        }

        parse_json_response(status, &body)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Turn a status/body pair into a typed result.
///
/// Split out of the async path so response handling can be tested
/// without a live server.
fn parse_json_response<T: serde::de::DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    if status.is_success() {
        serde_json::from_str(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    } else {
        Err(ApiError::Api {
            status: status.as_u16(),
            body: body.to_string(),
        })
    }
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    // Warn if not HTTPS (but don't enforce for localhost/testing)
    if !url.starts_with("https://") && !url.contains("localhost") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_removes_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net/"),
            "https://company.atlassian.net"
        );
    }

    #[test]
    fn test_normalize_base_url_handles_multiple_slashes() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net///"),
            "https://company.atlassian.net"
        );
    }

    #[test]
    fn test_normalize_base_url_preserves_path() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net/jira/"),
            "https://company.atlassian.net/jira"
        );
    }

    #[test]
    fn test_parse_created_issue_on_201() {
        let result: Result<CreatedIssue> =
            parse_json_response(StatusCode::CREATED, r#"{"key":"AUT-42","id":"10100"}"#);

        let created = result.unwrap();
        assert_eq!(created.key, "AUT-42");
        assert_eq!(created.id.as_deref(), Some("10100"));
    }

    #[test]
    fn test_parse_401_keeps_status_and_body() {
        let result: Result<CreatedIssue> = parse_json_response(
            StatusCode::UNAUTHORIZED,
            r#"{"errorMessages":["Unauthorized"]}"#,
        );

        match result.unwrap_err() {
            ApiError::Api { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Unauthorized"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_2xx_with_bad_body_is_invalid_response() {
        let result: Result<CreatedIssue> = parse_json_response(StatusCode::OK, "not json");
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }

    #[test]
    fn test_with_credentials_normalizes_url() {
        let client =
            JiraClient::with_credentials("https://example.atlassian.net/", "a@b.com", "tok")
                .unwrap();
        assert_eq!(client.base_url(), "https://example.atlassian.net");
    }
}
