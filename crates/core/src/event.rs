use std::fmt;

/// Repository identity as `owner`/`name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self { owner: owner.into(), name: name.into() }
    }

    /// Parse an `owner/name` pair as found in `GITHUB_REPOSITORY`.
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Sub-action of an issue state change, carrying the event-specific scalar
/// where one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueAction {
    Opened,
    Reopened,
    Closed,
    Edited,
    Milestoned,
    Labeled { label: String },
    Assigned { assignee: String },
    Unassigned { assignee: String },
    /// Anything outside the routing table ("unlabeled", "pinned", ...).
    Other(String),
}

/// Top-level category of the inbound trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    IssueStateChange { action: IssueAction },
    CommentAdded { body: String, author: String },
    /// Schedule-driven or repository-wide trigger with no specific routing.
    Triggered,
}

/// Ambient trigger data for one run. Supplied by the hosting platform and
/// immutable for the run's duration.
#[derive(Debug, Clone)]
pub struct EventContext {
    pub kind: EventKind,
    pub repo: RepoRef,
    pub issue_number: Option<u64>,
    /// Login of whoever caused the event.
    pub actor: String,
}
