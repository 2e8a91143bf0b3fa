//! Built-in bot that logs every event it receives and changes nothing.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use triage_bot_core::client::{IssueClient, RepoClient};
use triage_bot_dispatch::Bot;

pub struct EchoBot;

#[async_trait]
impl Bot for EchoBot {
    fn id(&self) -> &str {
        "echo"
    }

    async fn on_triggered(&self, _client: Arc<dyn RepoClient>) -> Result<()> {
        tracing::info!("Repository-wide trigger");
        Ok(())
    }

    async fn on_opened(&self, client: Arc<dyn IssueClient>) -> Result<()> {
        let issue = client.get_issue().await?;
        tracing::info!("Issue #{} opened by {}: {}", issue.number, issue.author, issue.title);
        Ok(())
    }

    async fn on_reopened(&self, client: Arc<dyn IssueClient>) -> Result<()> {
        tracing::info!("Issue #{} reopened", client.issue_number());
        Ok(())
    }

    async fn on_closed(&self, client: Arc<dyn IssueClient>) -> Result<()> {
        tracing::info!("Issue #{} closed", client.issue_number());
        Ok(())
    }

    async fn on_edited(&self, client: Arc<dyn IssueClient>) -> Result<()> {
        tracing::info!("Issue #{} edited", client.issue_number());
        Ok(())
    }

    async fn on_milestoned(&self, client: Arc<dyn IssueClient>) -> Result<()> {
        tracing::info!("Issue #{} milestoned", client.issue_number());
        Ok(())
    }

    async fn on_labeled(&self, client: Arc<dyn IssueClient>, label: &str) -> Result<()> {
        tracing::info!("Issue #{} labeled {}", client.issue_number(), label);
        Ok(())
    }

    async fn on_assigned(&self, client: Arc<dyn IssueClient>, assignee: &str) -> Result<()> {
        tracing::info!("Issue #{} assigned to {}", client.issue_number(), assignee);
        Ok(())
    }

    async fn on_unassigned(&self, client: Arc<dyn IssueClient>, assignee: &str) -> Result<()> {
        tracing::info!("Issue #{} unassigned from {}", client.issue_number(), assignee);
        Ok(())
    }

    async fn on_commented(
        &self,
        client: Arc<dyn IssueClient>,
        body: &str,
        actor: &str,
    ) -> Result<()> {
        tracing::info!(
            "Issue #{} commented on by {} ({} bytes)",
            client.issue_number(),
            actor,
            body.len()
        );
        Ok(())
    }
}
