//! Event ingestion from the hosting environment.
//!
//! The runner hands us the event name plus a JSON payload file; only the
//! fields the dispatcher routes on are deserialized here.

use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;
use triage_bot_core::event::{EventContext, EventKind, IssueAction, RepoRef};

#[derive(Debug, Deserialize)]
struct WebhookUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct WebhookLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WebhookIssue {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct WebhookComment {
    body: Option<String>,
    user: WebhookUser,
}

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    action: Option<String>,
    issue: Option<WebhookIssue>,
    label: Option<WebhookLabel>,
    assignee: Option<WebhookUser>,
    comment: Option<WebhookComment>,
    sender: Option<WebhookUser>,
}

/// Read the inbound event from `GITHUB_EVENT_NAME`, `GITHUB_EVENT_PATH` and
/// `GITHUB_REPOSITORY`.
pub fn load_event_context() -> Result<EventContext> {
    let name = std::env::var("GITHUB_EVENT_NAME").context("GITHUB_EVENT_NAME is not set")?;
    let path = std::env::var("GITHUB_EVENT_PATH").context("GITHUB_EVENT_PATH is not set")?;
    let body = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read event payload {path}"))?;
    let full_name =
        std::env::var("GITHUB_REPOSITORY").context("GITHUB_REPOSITORY is not set")?;
    let repo = RepoRef::parse(&full_name)
        .with_context(|| format!("Invalid GITHUB_REPOSITORY: {full_name}"))?;
    parse_event(&name, &body, repo)
}

/// Map an event name and JSON payload to the run's event context.
///
/// `issues` events become state changes with their sub-action; `issue_comment`
/// events carry the comment body and author, but only for the `created`
/// action. Everything else, including comment edits and deletions, maps to
/// the generic triggered kind, which the router treats as a no-op when an
/// issue number is present.
pub fn parse_event(name: &str, body: &str, repo: RepoRef) -> Result<EventContext> {
    let payload: WebhookPayload =
        serde_json::from_str(body).context("Failed to parse event payload")?;
    let actor = payload
        .sender
        .as_ref()
        .map(|sender| sender.login.clone())
        .unwrap_or_else(|| "unknown".to_string());
    let issue_number = payload.issue.as_ref().map(|issue| issue.number);
    let kind = match name {
        "issues" => EventKind::IssueStateChange {
            action: issue_action(payload.action.as_deref().unwrap_or_default(), &payload),
        },
        "issue_comment" if payload.action.as_deref() == Some("created") => {
            let comment =
                payload.comment.as_ref().context("issue_comment event without comment")?;
            EventKind::CommentAdded {
                body: comment.body.clone().unwrap_or_default(),
                author: comment.user.login.clone(),
            }
        }
        _ => EventKind::Triggered,
    };
    Ok(EventContext { kind, repo, issue_number, actor })
}

fn issue_action(action: &str, payload: &WebhookPayload) -> IssueAction {
    let login = |user: &Option<WebhookUser>| {
        user.as_ref().map(|user| user.login.clone()).unwrap_or_default()
    };
    match action {
        "opened" => IssueAction::Opened,
        "reopened" => IssueAction::Reopened,
        "closed" => IssueAction::Closed,
        "edited" => IssueAction::Edited,
        "milestoned" => IssueAction::Milestoned,
        "labeled" => IssueAction::Labeled {
            label: payload.label.as_ref().map(|label| label.name.clone()).unwrap_or_default(),
        },
        "assigned" => IssueAction::Assigned { assignee: login(&payload.assignee) },
        "unassigned" => IssueAction::Unassigned { assignee: login(&payload.assignee) },
        other => IssueAction::Other(other.to_string()),
    }
}
