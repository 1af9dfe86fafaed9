//! jiraseed - generate JIRA issues from local templates.
//!
//! The library half of the tool: the JIRA REST API v3 client, the
//! template store, the validating issue submitter, and the unattended
//! polling submitter. The binary in `main.rs` is a thin clap front end
//! over these modules.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod poll;
pub mod submit;
pub mod templates;
