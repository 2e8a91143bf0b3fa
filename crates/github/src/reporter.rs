//! Failure report delivery to the designated tracking issue.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use triage_bot_core::{
    config::{InputSource, IssueCoordinates},
    report::{ErrorReporter, FailureReport},
};

use crate::build_client;

/// Marker prefixed to automated reports so they are distinguishable from
/// human comments on the tracking issue.
const AUTOMATED_MARKER: &str = "<!-- triage-bot: automated error report -->";

/// Posts rendered failure reports as comments on the configured tracking
/// issue. Uses its own API client so delivery still works when the run never
/// got as far as constructing a scoped client.
pub struct TrackingIssueReporter {
    issue: Option<IssueCoordinates>,
    inputs: Arc<dyn InputSource>,
}

impl TrackingIssueReporter {
    pub fn new(issue: Option<IssueCoordinates>, inputs: Arc<dyn InputSource>) -> Self {
        Self { issue, inputs }
    }

    fn comment_body(report: &FailureReport) -> String {
        format!("{AUTOMATED_MARKER}\n{}", report.render())
    }
}

#[async_trait]
impl ErrorReporter for TrackingIssueReporter {
    async fn deliver(&self, report: &FailureReport) -> Result<()> {
        let issue = self.issue.as_ref().context("No error report issue configured")?;
        let inputs = self.inputs.run_inputs()?;
        let client = build_client(&inputs.token)?;
        client
            .issues(&issue.owner, &issue.repo)
            .create_comment(issue.number, Self::comment_body(report))
            .await
            .with_context(|| {
                format!(
                    "Failed to post failure report to {}/{}#{}",
                    issue.owner, issue.repo, issue.number
                )
            })?;
        Ok(())
    }
}
