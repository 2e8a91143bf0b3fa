use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::RunInputs;

/// Point-in-time view of an issue, as much of it as handler hooks need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueSnapshot {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub author: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub open: bool,
}

/// Consumed quota counters read back from the API at run end: the run's
/// outbound request count plus the `used` value of the three independent
/// rate-limit buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiUsage {
    pub requests: u64,
    pub core_used: u64,
    pub graphql_used: u64,
    pub search_used: u64,
}

/// Client bound to a single issue for the duration of one run.
#[async_trait]
pub trait IssueClient: Send + Sync {
    fn issue_number(&self) -> u64;
    fn readonly(&self) -> bool;
    async fn get_issue(&self) -> Result<IssueSnapshot>;
    async fn post_comment(&self, body: &str) -> Result<()>;
    async fn add_label(&self, label: &str) -> Result<()>;
    async fn remove_label(&self, label: &str) -> Result<()>;
    async fn close_issue(&self) -> Result<()>;
}

/// Client scoped to the whole repository, for runs with no issue number.
#[async_trait]
pub trait RepoClient: Send + Sync {
    fn readonly(&self) -> bool;
    /// Returns the new issue number, or `None` when skipped (readonly).
    async fn create_issue(&self, title: &str, body: &str) -> Result<Option<u64>>;
    async fn search_issues(&self, query: &str) -> Result<Vec<IssueSnapshot>>;
}

/// Builds the single scoped client a run owns, and accounts for every
/// outbound call those clients make.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn issue_client(&self, inputs: &RunInputs, number: u64)
        -> Result<Arc<dyn IssueClient>>;
    async fn repo_client(&self, inputs: &RunInputs) -> Result<Arc<dyn RepoClient>>;
    /// Live usage accounting, fetched fresh from the API. Errors if no
    /// client was constructed this run.
    async fn usage(&self) -> Result<ApiUsage>;
}

/// Resolves the display name of the authenticated principal.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticated_user(&self) -> Result<String>;
}
