//! Local issue templates.
//!
//! Templates are pre-authored issue skeletons stored as a JSON array in
//! a local file. The collection is loaded once at startup and never
//! re-read; templates are immutable after load. Selection is a uniform
//! random pick over the whole collection, repeats permitted.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Default file name for the template collection.
pub const DEFAULT_TEMPLATES_FILE: &str = "templates.json";

/// Description used when a template does not supply one.
const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// Priority name used when a template does not supply one.
const DEFAULT_PRIORITY_NAME: &str = "Medium";

/// Errors that can occur while loading the template file.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The backing file does not exist.
    #[error("Template file not found: {path}")]
    NotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Could not read template file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file contents are not a well-formed template array.
    #[error("Could not parse template file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// A pre-authored issue skeleton.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Template {
    /// The issue summary. Required.
    pub summary: String,

    /// The issue description. Defaults to a placeholder.
    #[serde(default = "default_description")]
    pub description: String,

    /// Optional issue-type name hint, e.g. "Bug".
    #[serde(default)]
    pub issuetype: Option<String>,

    /// Priority display name used by the interactive path.
    #[serde(default = "default_priority_name")]
    pub priority_name: String,

    /// Raw priority identifier used by the polling path.
    #[serde(rename = "priority", default)]
    pub priority_id: Option<String>,

    /// Labels applied to the created issue.
    #[serde(default)]
    pub labels: Vec<String>,

    /// Optional assignee object, copied into the payload verbatim.
    #[serde(default)]
    pub assignee: Option<serde_json::Value>,

    /// Optional due date, e.g. "2026-09-30".
    #[serde(default)]
    pub duedate: Option<String>,
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

fn default_priority_name() -> String {
    DEFAULT_PRIORITY_NAME.to_string()
}

/// Load all templates from a JSON file.
///
/// # Errors
///
/// Returns `NotFound` if the file is absent and `Parse` if the contents
/// are not a well-formed array of template objects.
pub fn load(path: &Path) -> Result<Vec<Template>> {
    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            TemplateError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            TemplateError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&contents).map_err(|source| TemplateError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load templates, degrading a missing file to an empty collection.
///
/// A missing template file means "no templates available", not a crash;
/// any other failure still propagates.
pub fn load_or_empty(path: &Path) -> Result<Vec<Template>> {
    match load(path) {
        Ok(templates) => Ok(templates),
        Err(TemplateError::NotFound { path }) => {
            warn!("Template file {} not found, no templates available", path.display());
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Pick one template uniformly at random.
///
/// Returns `None` on an empty collection; callers must check non-empty
/// first. Previously chosen templates are not excluded.
pub fn pick_random(templates: &[Template]) -> Option<&Template> {
    templates.choose(&mut rand::thread_rng())
}
