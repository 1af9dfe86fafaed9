//! Data types for JIRA API requests and responses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::{ApiError, Result};

/// The currently authenticated user, from `GET /rest/api/3/myself`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    /// The user's account ID.
    #[serde(rename = "accountId")]
    pub account_id: String,
    /// The user's display name.
    #[serde(rename = "displayName")]
    pub display_name: String,
    /// The user's email address, if visible.
    #[serde(rename = "emailAddress", default)]
    pub email_address: Option<String>,
}

/// The issue created by a successful `POST /rest/api/3/issue`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
    /// The new issue's key, e.g. "AUT-42".
    pub key: String,
    /// The new issue's numeric ID.
    #[serde(default)]
    pub id: Option<String>,
}

/// One issue type entry from the createmeta response.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueTypeMeta {
    /// The tracker-internal identifier, e.g. "10001".
    pub id: String,
    /// The display name, e.g. "Task".
    pub name: String,
}

/// One project entry from the createmeta response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The project key, e.g. "AUT".
    #[serde(default)]
    pub key: Option<String>,
    /// The issue types that can be created in this project.
    #[serde(default)]
    pub issuetypes: Vec<IssueTypeMeta>,
}

/// Response body of the issue-creation-metadata endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMetaResponse {
    #[serde(default)]
    pub projects: Vec<ProjectMeta>,
}

/// The issue-type name → id mapping for one project.
///
/// Rebuilt from a createmeta response; duplicate names are last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct IssueTypeCatalog {
    /// The project key this catalog was fetched for.
    project_key: String,
    types: HashMap<String, String>,
}

impl IssueTypeCatalog {
    /// Build a catalog from a parsed createmeta response.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` when the response carries zero project
    /// entries, regardless of anything else in the body.
    pub fn from_createmeta(response: CreateMetaResponse, project_key: &str) -> Result<Self> {
        if response.projects.is_empty() {
            return Err(ApiError::ProjectNotFound(project_key.to_string()));
        }

        let mut types = HashMap::new();
        for project in response.projects {
            for issue_type in project.issuetypes {
                types.insert(issue_type.name, issue_type.id);
            }
        }

        Ok(Self {
            project_key: project_key.to_string(),
            types,
        })
    }

    /// Resolve an issue-type display name to its internal identifier.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.types.get(name).map(String::as_str)
    }

    /// The project key this catalog belongs to.
    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    /// The known issue-type names, sorted for stable display.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of known issue types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the catalog holds no issue types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Atlassian Document Format (ADF) content.
///
/// JIRA requires rich text fields like descriptions to be ADF documents.
/// The two constructors encode the two description conventions this tool
/// supports; they are deliberately distinct and must not be unified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AtlassianDoc {
    /// The document type (always "doc" for root documents).
    #[serde(rename = "type")]
    pub doc_type: String,
    /// The document version (typically 1).
    pub version: u32,
    /// The content nodes within the document.
    #[serde(default)]
    pub content: Vec<serde_json::Value>,
}

impl AtlassianDoc {
    /// Wrap the full text in a single paragraph with one text run.
    ///
    /// Newlines are kept inside the run; this is the interactive
    /// submission convention.
    pub fn single_paragraph(text: &str) -> Self {
        Self {
            doc_type: "doc".to_string(),
            version: 1,
            content: vec![json!({
                "type": "paragraph",
                "content": [{ "type": "text", "text": text }],
            })],
        }
    }

    /// Turn each line of the text into its own paragraph.
    ///
    /// This is the polling submission convention.
    pub fn paragraph_per_line(text: &str) -> Self {
        let content = text
            .split('\n')
            .map(|line| {
                json!({
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": line }],
                })
            })
            .collect();

        Self {
            doc_type: "doc".to_string(),
            version: 1,
            content,
        }
    }
}

/// Request body for `POST /rest/api/3/issue`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateIssuePayload {
    pub fields: IssueFields,
}

/// The `fields` object of an issue-creation request.
///
/// Optional fields are omitted from the JSON entirely when absent;
/// JIRA rejects explicit nulls for some of them.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IssueFields {
    pub project: ProjectRef,
    pub issuetype: IssueTypeRef,
    pub summary: String,
    pub description: AtlassianDoc,
    pub priority: PriorityRef,
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duedate: Option<String>,
}

/// A project reference by key, e.g. `{"key": "AUT"}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProjectRef {
    pub key: String,
}

/// A parent-issue reference by key, present only for subtasks.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParentRef {
    pub key: String,
}

/// An issue-type reference.
///
/// The interactive path resolves the type through the catalog and sends
/// the id; the polling path sends the configured display name as-is.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum IssueTypeRef {
    ById { id: String },
    ByName { name: String },
}

/// A priority reference, by display name or by raw identifier.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PriorityRef {
    ByName { name: String },
    ById { id: String },
}
