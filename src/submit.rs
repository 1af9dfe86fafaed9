//! Issue submission: validation, payload construction, dispatch.
//!
//! A [`SubmissionRequest`] is assembled immediately before submission
//! from a template plus whatever the caller edited, validated locally,
//! turned into a wire payload, and POSTed exactly once. Validation is
//! ordered and the first failure wins; no network traffic happens until
//! every local check has passed.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::api::error::ApiError;
use crate::api::types::{
    AtlassianDoc, CreateIssuePayload, CreatedIssue, IssueFields, IssueTypeRef, ParentRef,
    PriorityRef, ProjectRef,
};
use crate::api::{IssueTypeCatalog, JiraClient};
use crate::templates::Template;

/// Issue-type name substrings that mark a type as a subtask.
///
/// One marker per supported locale (English, Spanish). The match is a
/// case-sensitive substring test, so a type name that merely contains a
/// marker (e.g. "Subtask Review") is classified as a subtask too; the
/// list is explicit and enumerated rather than inferred from metadata.
pub const SUBTASK_MARKERS: [&str; 2] = ["Subtask", "Subtarea"];

/// Whether an issue-type name denotes a subtask.
pub fn is_subtask_type(type_name: &str) -> bool {
    SUBTASK_MARKERS
        .iter()
        .any(|marker| type_name.contains(marker))
}

/// Errors produced by submission.
///
/// The first three are local validation failures and are always raised
/// before any network call.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The selected issue-type name is not in the catalog.
    #[error("Unknown issue type '{0}': not available in this project")]
    UnknownIssueType(String),

    /// A subtask was selected without a parent issue key.
    #[error("Issue type '{0}' is a subtask and requires a parent issue key")]
    MissingParentKey(String),

    /// The summary is empty.
    #[error("Summary must not be empty")]
    EmptySummary,

    /// The request itself failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for submission operations.
pub type Result<T> = std::result::Result<T, SubmitError>;

/// Everything needed to create one issue.
///
/// Assembled per submit action and discarded after use. The caller
/// (CLI flags, or eventually any other front end) supplies the edited
/// values; no widget state leaks in here.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    /// The target project key, e.g. "AUT".
    pub project_key: String,
    /// The selected issue-type display name; resolved against the catalog.
    pub issue_type_name: String,
    /// The (possibly edited) summary. Must be non-empty.
    pub summary: String,
    /// The (possibly edited) description text.
    pub description: String,
    /// Priority display name.
    pub priority_name: String,
    /// Labels copied from the chosen template.
    pub labels: Vec<String>,
    /// Parent issue key; required when the type name is a subtask.
    pub parent_key: Option<String>,
    /// Assignee object copied from the template, if present.
    pub assignee: Option<Value>,
    /// Due date copied from the template, if present.
    pub duedate: Option<String>,
}

impl SubmissionRequest {
    /// Build a request from a template and the caller's selections.
    ///
    /// The issue-type name falls back to the template's hint, then to
    /// "Task"; the priority name comes from the template unless
    /// overridden later by mutating the returned value.
    pub fn from_template(template: &Template, project_key: &str) -> Self {
        Self {
            project_key: project_key.to_string(),
            issue_type_name: template
                .issuetype
                .clone()
                .unwrap_or_else(|| "Task".to_string()),
            summary: template.summary.clone(),
            description: template.description.clone(),
            priority_name: template.priority_name.clone(),
            labels: template.labels.clone(),
            parent_key: None,
            assignee: template.assignee.clone(),
            duedate: template.duedate.clone(),
        }
    }
}

/// Validate a request against the catalog and build the wire payload.
///
/// Validation order, first failure wins:
/// 1. the type name must resolve in the catalog (`UnknownIssueType`),
/// 2. a subtask type must carry a non-empty parent key (`MissingParentKey`),
/// 3. the summary must be non-empty (`EmptySummary`).
///
/// This function is pure; callers that stop here have provably made no
/// network call.
pub fn build_payload(
    request: &SubmissionRequest,
    catalog: &IssueTypeCatalog,
) -> Result<CreateIssuePayload> {
    let type_id = catalog
        .resolve(&request.issue_type_name)
        .ok_or_else(|| SubmitError::UnknownIssueType(request.issue_type_name.clone()))?;

    let subtask = is_subtask_type(&request.issue_type_name);
    let parent = if subtask {
        match request.parent_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Some(ParentRef {
                key: key.to_string(),
            }),
            _ => {
                return Err(SubmitError::MissingParentKey(
                    request.issue_type_name.clone(),
                ))
            }
        }
    } else {
        None
    };

    if request.summary.trim().is_empty() {
        return Err(SubmitError::EmptySummary);
    }

    Ok(CreateIssuePayload {
        fields: IssueFields {
            project: ProjectRef {
                key: request.project_key.clone(),
            },
            issuetype: IssueTypeRef::ById {
                id: type_id.to_string(),
            },
            summary: request.summary.clone(),
            // Interactive convention: one paragraph, one text run,
            // newlines kept inside the run.
            description: AtlassianDoc::single_paragraph(&request.description),
            priority: PriorityRef::ByName {
                name: request.priority_name.clone(),
            },
            labels: request.labels.clone(),
            parent,
            assignee: request.assignee.clone(),
            duedate: request.duedate.clone(),
        },
    })
}

/// Validate, build, and submit a request.
///
/// Performs at most one HTTP POST; a failed attempt is terminal and
/// must be re-triggered by the caller.
pub async fn submit(
    client: &JiraClient,
    request: &SubmissionRequest,
    catalog: &IssueTypeCatalog,
) -> Result<CreatedIssue> {
    let payload = build_payload(request, catalog)?;
    debug!(
        "Submitting '{}' as {} to {}",
        request.summary, request.issue_type_name, request.project_key
    );

    let created = client.create_issue(&payload).await?;
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{CreateMetaResponse, IssueTypeMeta, ProjectMeta};
    use serde_json::json;

    fn catalog(pairs: &[(&str, &str)]) -> IssueTypeCatalog {
        let response = CreateMetaResponse {
            projects: vec![ProjectMeta {
                key: Some("AUT".to_string()),
                issuetypes: pairs
                    .iter()
                    .map(|(name, id)| IssueTypeMeta {
                        id: id.to_string(),
                        name: name.to_string(),
                    })
                    .collect(),
            }],
        };
        IssueTypeCatalog::from_createmeta(response, "AUT").unwrap()
    }

    fn request(type_name: &str) -> SubmissionRequest {
        SubmissionRequest {
            project_key: "AUT".to_string(),
            issue_type_name: type_name.to_string(),
            summary: "S".to_string(),
            description: "D".to_string(),
            priority_name: "High".to_string(),
            labels: vec!["x".to_string(), "y".to_string()],
            parent_key: None,
            assignee: None,
            duedate: None,
        }
    }

    #[test]
    fn test_subtask_markers() {
        assert!(is_subtask_type("Subtask"));
        assert!(is_subtask_type("Subtarea"));
        assert!(!is_subtask_type("Task"));
        assert!(!is_subtask_type("Bug"));
        // Substring match is deliberate, including its false positives
        assert!(is_subtask_type("Subtask Review"));
        // Case-sensitive: lowercase does not match
        assert!(!is_subtask_type("subtask"));
    }

    #[test]
    fn test_unknown_type_fails_before_anything_else() {
        let err = build_payload(&request("Bug"), &catalog(&[("Task", "10001")])).unwrap_err();
        assert!(matches!(err, SubmitError::UnknownIssueType(name) if name == "Bug"));
    }

    #[test]
    fn test_subtask_without_parent_fails() {
        let err =
            build_payload(&request("Subtask"), &catalog(&[("Subtask", "10003")])).unwrap_err();
        assert!(matches!(err, SubmitError::MissingParentKey(name) if name == "Subtask"));
    }

    #[test]
    fn test_subtask_with_blank_parent_fails() {
        let mut req = request("Subtarea");
        req.parent_key = Some("   ".to_string());

        let err = build_payload(&req, &catalog(&[("Subtarea", "10003")])).unwrap_err();
        assert!(matches!(err, SubmitError::MissingParentKey(_)));
    }

    #[test]
    fn test_subtask_with_parent_builds_parent_field() {
        let mut req = request("Subtask");
        req.parent_key = Some("AUT-5".to_string());

        let payload = build_payload(&req, &catalog(&[("Subtask", "10003")])).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["fields"]["parent"], json!({"key": "AUT-5"}));
    }

    #[test]
    fn test_empty_summary_rejected() {
        let mut req = request("Task");
        req.summary = "  ".to_string();

        let err = build_payload(&req, &catalog(&[("Task", "10001")])).unwrap_err();
        assert!(matches!(err, SubmitError::EmptySummary));
    }

    #[test]
    fn test_type_resolution_precedes_summary_check() {
        // First failure wins: unknown type is reported even though the
        // summary is also empty.
        let mut req = request("Bug");
        req.summary = String::new();

        let err = build_payload(&req, &catalog(&[("Task", "10001")])).unwrap_err();
        assert!(matches!(err, SubmitError::UnknownIssueType(_)));
    }

    #[test]
    fn test_payload_fields_match_request() {
        let payload = build_payload(&request("Task"), &catalog(&[("Task", "10001")])).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        let fields = &value["fields"];

        assert_eq!(fields["summary"].as_str(), Some("S"));
        assert_eq!(fields["priority"], json!({"name": "High"}));
        assert_eq!(fields["labels"], json!(["x", "y"]));
        assert_eq!(fields["issuetype"], json!({"id": "10001"}));
        assert_eq!(fields["project"], json!({"key": "AUT"}));
        assert!(fields.get("parent").is_none());
    }

    #[test]
    fn test_description_is_single_paragraph() {
        let mut req = request("Task");
        req.description = "line one\nline two".to_string();

        let payload = build_payload(&req, &catalog(&[("Task", "10001")])).unwrap();
        assert_eq!(
            payload.fields.description,
            AtlassianDoc::single_paragraph("line one\nline two")
        );
        assert_eq!(payload.fields.description.content.len(), 1);
    }

    #[test]
    fn test_assignee_and_duedate_copied_when_present() {
        let mut req = request("Task");
        req.assignee = Some(json!({"accountId": "abc123"}));
        req.duedate = Some("2026-09-30".to_string());

        let payload = build_payload(&req, &catalog(&[("Task", "10001")])).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["fields"]["assignee"], json!({"accountId": "abc123"}));
        assert_eq!(value["fields"]["duedate"].as_str(), Some("2026-09-30"));
    }

    #[test]
    fn test_parent_key_ignored_for_non_subtask() {
        let mut req = request("Task");
        req.parent_key = Some("AUT-1".to_string());

        let payload = build_payload(&req, &catalog(&[("Task", "10001")])).unwrap();
        assert!(payload.fields.parent.is_none());
    }

    #[test]
    fn test_from_template_falls_back_to_task() {
        let template = Template {
            summary: "S".to_string(),
            description: "D".to_string(),
            issuetype: None,
            priority_name: "Medium".to_string(),
            priority_id: None,
            labels: vec![],
            assignee: None,
            duedate: None,
        };

        let req = SubmissionRequest::from_template(&template, "AUT");
        assert_eq!(req.issue_type_name, "Task");
        assert_eq!(req.project_key, "AUT");
        assert!(req.parent_key.is_none());
    }

    #[test]
    fn test_from_template_uses_type_hint() {
        let template = Template {
            summary: "S".to_string(),
            description: "D".to_string(),
            issuetype: Some("Bug".to_string()),
            priority_name: "High".to_string(),
            priority_id: None,
            labels: vec!["a".to_string()],
            assignee: None,
            duedate: None,
        };

        let req = SubmissionRequest::from_template(&template, "AUT");
        assert_eq!(req.issue_type_name, "Bug");
        assert_eq!(req.priority_name, "High");
        assert_eq!(req.labels, vec!["a"]);
    }
}
