//! Configuration for the JIRA connection.
//!
//! Credentials are read from the process environment (`JIRA_URL`,
//! `JIRA_EMAIL`, `JIRA_API_TOKEN`); a `.env` file in the working
//! directory is loaded into the environment at startup by the binary.
//! The configuration is an explicit value passed into the client at
//! call time, never process-wide mutable state; `reload` produces a
//! fresh value instead of mutating in place.

use thiserror::Error;

/// Environment variable holding the JIRA instance URL.
pub const ENV_URL: &str = "JIRA_URL";
/// Environment variable holding the account email.
pub const ENV_EMAIL: &str = "JIRA_EMAIL";
/// Environment variable holding the API token.
pub const ENV_API_TOKEN: &str = "JIRA_API_TOKEN";

/// Errors that can occur while building or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing or empty.
    #[error("Missing configuration: {0} is not set")]
    MissingVar(&'static str),

    /// A configuration value is present but malformed.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Connection details for a JIRA instance.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// The JIRA instance URL, e.g. "https://company.atlassian.net".
    pub base_url: String,
    /// The account email used for Basic Auth.
    pub email: String,
    /// The API token used for Basic Auth.
    pub api_token: String,
}

impl Config {
    /// Build a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `MissingVar` if any of the three variables is unset or
    /// empty, and `Validation` if a value is malformed.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            base_url: require_var(ENV_URL)?,
            email: require_var(ENV_EMAIL)?,
            api_token: require_var(ENV_API_TOKEN)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-read the environment and return a fresh configuration value.
    ///
    /// The caller swaps the returned value in; the old one is dropped.
    /// This replaces the restart-the-process reload of earlier versions
    /// of this tool.
    pub fn reload(&self) -> Result<Self> {
        Self::from_env()
    }

    /// Validate this configuration.
    ///
    /// Checks that the URL has an HTTP scheme and the email looks like
    /// an email address.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::Validation` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ConfigError::Validation(format!(
                "{}: URL must start with http:// or https://",
                ENV_URL
            )));
        }

        if !self.email.contains('@') {
            return Err(ConfigError::Validation(format!(
                "{}: '{}' does not appear to be a valid email address",
                ENV_EMAIL, self.email
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Read a required environment variable; empty counts as missing.
fn require_var(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_full_env() {
        std::env::set_var(ENV_URL, "https://company.atlassian.net");
        std::env::set_var(ENV_EMAIL, "user@company.com");
        std::env::set_var(ENV_API_TOKEN, "token123");
    }

    fn clear_env() {
        std::env::remove_var(ENV_URL);
        std::env::remove_var(ENV_EMAIL);
        std::env::remove_var(ENV_API_TOKEN);
    }

    #[test]
    #[serial]
    fn test_from_env_complete() {
        set_full_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.base_url, "https://company.atlassian.net");
        assert_eq!(config.email, "user@company.com");
        assert_eq!(config.api_token, "token123");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_token_rejected() {
        set_full_env();
        std::env::remove_var(ENV_API_TOKEN);

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(v) if v == ENV_API_TOKEN));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_var_counts_as_missing() {
        set_full_env();
        std::env::set_var(ENV_URL, "   ");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(v) if v == ENV_URL));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_reload_picks_up_changed_values() {
        set_full_env();
        let config = Config::from_env().unwrap();

        std::env::set_var(ENV_EMAIL, "other@company.com");
        let reloaded = config.reload().unwrap();

        // Old value untouched, new value reflects the environment
        assert_eq!(config.email, "user@company.com");
        assert_eq!(reloaded.email, "other@company.com");
        clear_env();
    }

    #[test]
    fn test_invalid_url_scheme_rejected() {
        let config = Config {
            base_url: "company.atlassian.net".to_string(),
            email: "user@company.com".to_string(),
            api_token: "tok".to_string(),
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must start with http"));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let config = Config {
            base_url: "https://company.atlassian.net".to_string(),
            email: "not-an-email".to_string(),
            api_token: "tok".to_string(),
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("valid email"));
    }

    #[test]
    fn test_http_url_accepted() {
        let config = Config {
            base_url: "http://localhost:8080".to_string(),
            email: "user@company.com".to_string(),
            api_token: "tok".to_string(),
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config {
            base_url: "https://company.atlassian.net".to_string(),
            email: "user@company.com".to_string(),
            api_token: "super_secret".to_string(),
        };

        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("super_secret"));
        assert!(debug_output.contains("<redacted>"));
    }
}
