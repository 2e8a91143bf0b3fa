use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use triage_bot_core::{
    client::{IssueClient, RepoClient},
    error::RunError,
};

/// One concrete bot. Implementations override the hooks for the events they
/// care about; any hook left at its default fails the run with a
/// not-implemented error, which the dispatcher reports upward.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Stable identifier, used for metric and failure attribution.
    fn id(&self) -> &str;

    /// Schedule-driven or repository-wide run with no specific issue.
    async fn on_triggered(&self, _client: Arc<dyn RepoClient>) -> Result<()> {
        Err(RunError::NotImplemented("triggered").into())
    }

    async fn on_opened(&self, _client: Arc<dyn IssueClient>) -> Result<()> {
        Err(RunError::NotImplemented("opened").into())
    }

    async fn on_reopened(&self, _client: Arc<dyn IssueClient>) -> Result<()> {
        Err(RunError::NotImplemented("reopened").into())
    }

    async fn on_closed(&self, _client: Arc<dyn IssueClient>) -> Result<()> {
        Err(RunError::NotImplemented("closed").into())
    }

    async fn on_edited(&self, _client: Arc<dyn IssueClient>) -> Result<()> {
        Err(RunError::NotImplemented("edited").into())
    }

    async fn on_milestoned(&self, _client: Arc<dyn IssueClient>) -> Result<()> {
        Err(RunError::NotImplemented("milestoned").into())
    }

    async fn on_labeled(&self, _client: Arc<dyn IssueClient>, _label: &str) -> Result<()> {
        Err(RunError::NotImplemented("labeled").into())
    }

    async fn on_assigned(&self, _client: Arc<dyn IssueClient>, _assignee: &str) -> Result<()> {
        Err(RunError::NotImplemented("assigned").into())
    }

    async fn on_unassigned(
        &self,
        _client: Arc<dyn IssueClient>,
        _assignee: &str,
    ) -> Result<()> {
        Err(RunError::NotImplemented("unassigned").into())
    }

    async fn on_commented(
        &self,
        _client: Arc<dyn IssueClient>,
        _body: &str,
        _actor: &str,
    ) -> Result<()> {
        Err(RunError::NotImplemented("commented").into())
    }
}
