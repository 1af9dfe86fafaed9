//! JIRA API client and types.
//!
//! This module provides the interface for communicating with the JIRA
//! REST API v3: authentication, the metadata fetch, and issue creation.

mod auth;
mod client;
pub mod error;
pub mod types;

pub use auth::Auth;
pub use client::JiraClient;
pub use error::ApiError;
pub use types::IssueTypeCatalog;
