//! Unattended polling submitter.
//!
//! Repeatedly picks a random template and submits it verbatim on a
//! fixed timer. This path deliberately differs from the interactive
//! submitter and the two must not be unified: the issue type is sent by
//! configured display name without consulting the catalog, the priority
//! is sent by raw identifier, and each description line becomes its own
//! paragraph. The loop is stateless and runs until interrupted; each
//! cycle completes (or fails) before the next begins.

use std::time::Duration;

use tracing::{info, warn};

use crate::api::types::{
    AtlassianDoc, CreateIssuePayload, IssueFields, IssueTypeRef, PriorityRef, ProjectRef,
};
use crate::api::JiraClient;
use crate::error::AppError;
use crate::templates::{self, Template};

/// Default seconds between submission cycles.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Priority identifier used when a template does not supply one.
const DEFAULT_PRIORITY_ID: &str = "3";

/// Fixed settings for one polling run.
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// The target project key.
    pub project_key: String,
    /// The issue-type display name sent with every cycle.
    pub issue_type_name: String,
    /// Sleep interval between cycles.
    pub interval: Duration,
}

/// Build the wire payload for one polling cycle.
///
/// The template is submitted verbatim; there are no user-editable
/// fields in this path.
pub fn build_poll_payload(template: &Template, settings: &PollSettings) -> CreateIssuePayload {
    CreateIssuePayload {
        fields: IssueFields {
            project: ProjectRef {
                key: settings.project_key.clone(),
            },
            // By name, never resolved through the catalog.
            issuetype: IssueTypeRef::ByName {
                name: settings.issue_type_name.clone(),
            },
            summary: template.summary.clone(),
            // Polling convention: one paragraph per description line.
            description: AtlassianDoc::paragraph_per_line(&template.description),
            priority: PriorityRef::ById {
                id: template
                    .priority_id
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PRIORITY_ID.to_string()),
            },
            labels: template.labels.clone(),
            parent: None,
            assignee: template.assignee.clone(),
            duedate: template.duedate.clone(),
        },
    }
}

/// Run the polling loop until externally interrupted.
///
/// Each cycle picks a template uniformly at random (repeats permitted),
/// submits it, logs the outcome, and sleeps. A failed submission is
/// logged and the loop moves on; nothing is carried between cycles.
///
/// # Errors
///
/// Returns an error only when the template collection is empty; there
/// is nothing to submit and the loop would spin uselessly.
pub async fn run(
    client: &JiraClient,
    templates: &[Template],
    settings: &PollSettings,
) -> Result<(), AppError> {
    if templates.is_empty() {
        return Err(AppError::other("no templates available"));
    }

    info!(
        "Starting template submitter: project={}, type={}, every {}s",
        settings.project_key,
        settings.issue_type_name,
        settings.interval.as_secs()
    );

    loop {
        let Some(template) = templates::pick_random(templates) else {
            return Err(AppError::other("no templates available"));
        };

        let payload = build_poll_payload(template, settings);
        match client.create_issue(&payload).await {
            Ok(created) => info!("[+] Issue created -> {}: {}", created.key, template.summary),
            Err(e) => warn!("[!] Submission failed: {}", e),
        }

        tokio::time::sleep(settings.interval).await;
    }
}
