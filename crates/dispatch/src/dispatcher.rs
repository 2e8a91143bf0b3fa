use std::sync::Arc;

use anyhow::Result;
use triage_bot_core::{
    client::{ClientFactory, IdentityProvider},
    commands,
    config::{InputSource, IssueCoordinates},
    error::RunError,
    event::{EventContext, EventKind, IssueAction},
    log::LogSink,
    metrics::{MetricSample, MetricTags, TelemetrySink},
    report::{ErrorReporter, FailureReport},
};

use crate::{bot::Bot, identity::ActingIdentity};

/// Collaborators the dispatcher consumes through narrow interfaces. All of
/// them are injected at construction; there is no ambient state.
pub struct Collaborators {
    pub inputs: Arc<dyn InputSource>,
    pub clients: Arc<dyn ClientFactory>,
    pub reporter: Arc<dyn ErrorReporter>,
    pub telemetry: Option<Arc<dyn TelemetrySink>>,
    pub identity: Arc<dyn IdentityProvider>,
    pub log: Arc<dyn LogSink>,
}

/// Terminal state of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The handler finished without error.
    Completed,
    /// An error was caught, reported and signalled to the host.
    Failed,
    /// Self-protection short-circuit: the event targeted the error report
    /// issue itself.
    Refused,
}

/// Dispatches a single inbound event to the bot's matching handler hook.
///
/// One dispatcher serves exactly one run: it owns the event context, builds
/// at most one scoped client, and guarantees that any failure is reported
/// (or at worst logged) and that usage metrics are emitted before the run
/// ends, whatever the handler did.
pub struct Dispatcher {
    bot: Arc<dyn Bot>,
    event: EventContext,
    error_report_issue: Option<IssueCoordinates>,
    collab: Collaborators,
    identity: ActingIdentity,
}

impl Dispatcher {
    /// Construction suppresses workflow command processing for the rest of
    /// the run and eagerly starts acting-identity resolution.
    pub fn new(
        bot: Arc<dyn Bot>,
        event: EventContext,
        error_report_issue: Option<IssueCoordinates>,
        collab: Collaborators,
    ) -> Self {
        commands::suppress_log_commands();
        let identity = ActingIdentity::spawn(collab.identity.clone());
        Self { bot, event, error_report_issue, collab, identity }
    }

    /// Route the event, report any failure, then emit usage metrics. Never
    /// returns an error: the outcome plus the process failure marker are the
    /// only externally observable results.
    pub async fn run(&self) -> RunOutcome {
        if self.targets_error_report_issue() {
            self.collab.log.write_line(&format!(
                "refusing to run against the error report issue {}#{}",
                self.event.repo,
                self.event.issue_number.unwrap_or_default(),
            ));
            return RunOutcome::Refused;
        }
        let outcome = match self.route().await {
            Ok(()) => RunOutcome::Completed,
            Err(err) => {
                self.report_failure(err).await;
                RunOutcome::Failed
            }
        };
        self.emit_usage_metrics().await;
        outcome
    }

    fn targets_error_report_issue(&self) -> bool {
        let Some(target) = &self.error_report_issue else { return false };
        let Some(number) = self.event.issue_number else { return false };
        target.owner == self.event.repo.owner
            && target.repo == self.event.repo.name
            && target.number == number
    }

    async fn route(&self) -> Result<()> {
        let inputs = self.collab.inputs.run_inputs()?;
        match self.event.issue_number {
            Some(number) => {
                let client = self.collab.clients.issue_client(&inputs, number).await?;
                match &self.event.kind {
                    EventKind::CommentAdded { body, author } => {
                        self.bot.on_commented(client, body, author).await
                    }
                    EventKind::IssueStateChange { action } => match action {
                        IssueAction::Opened => self.bot.on_opened(client).await,
                        IssueAction::Reopened => self.bot.on_reopened(client).await,
                        IssueAction::Closed => self.bot.on_closed(client).await,
                        IssueAction::Edited => self.bot.on_edited(client).await,
                        IssueAction::Milestoned => self.bot.on_milestoned(client).await,
                        IssueAction::Labeled { label } => {
                            self.bot.on_labeled(client, label).await
                        }
                        IssueAction::Assigned { assignee } => {
                            self.bot.on_assigned(client, assignee).await
                        }
                        IssueAction::Unassigned { assignee } => {
                            self.bot.on_unassigned(client, assignee).await
                        }
                        IssueAction::Other(name) => {
                            Err(RunError::UnexpectedAction(name.clone()).into())
                        }
                    },
                    // An issue-bearing event outside the routing table is a
                    // deliberate no-op.
                    EventKind::Triggered => Ok(()),
                }
            }
            None => {
                let client = self.collab.clients.repo_client(&inputs).await?;
                self.bot.on_triggered(client).await
            }
        }
    }

    /// Deliver the failure report, falling back to the plain log sink when
    /// delivery itself fails. Nothing propagates past this point; the host
    /// only sees the process failure marker.
    async fn report_failure(&self, err: anyhow::Error) {
        let report = FailureReport {
            message: format!("{err:?}"),
            bot: self.bot.id().to_string(),
            actor: self.identity.get().await,
            issue: self.event.issue_number,
        };
        if let Some(sink) = &self.collab.telemetry {
            if let Err(sink_err) = sink.track_exception(&report).await {
                tracing::warn!("Failed to track exception: {:?}", sink_err);
            }
        }
        if let Err(delivery_err) = self.collab.reporter.deliver(&report).await {
            tracing::error!("Failed to deliver failure report: {:?}", delivery_err);
            self.collab.log.write_line(&report.render());
        }
        commands::fail_with(&err.to_string());
    }

    /// Forward a sample to the telemetry sink, tagged with the run context.
    /// A no-op without a sink; sink failures never affect the run.
    pub async fn track_metric(&self, name: &str, value: f64) {
        let Some(sink) = &self.collab.telemetry else { return };
        let sample = MetricSample {
            name: name.to_string(),
            value,
            tags: MetricTags {
                repo: self.event.repo.to_string(),
                issue: self.event.issue_number,
                bot: self.bot.id().to_string(),
                actor: self.identity.get().await,
            },
        };
        if let Err(err) = sink.track_metric(&sample).await {
            tracing::warn!("Failed to track metric {}: {:?}", sample.name, err);
        }
    }

    /// Read the run's live usage accounting and emit the four counters.
    async fn emit_usage_metrics(&self) {
        let usage = match self.collab.clients.usage().await {
            Ok(usage) => usage,
            Err(err) => {
                tracing::warn!("Failed to read API usage: {:?}", err);
                return;
            }
        };
        self.track_metric("usage.requests", usage.requests as f64).await;
        self.track_metric("usage.core", usage.core_used as f64).await;
        self.track_metric("usage.graphql", usage.graphql_used as f64).await;
        self.track_metric("usage.search", usage.search_used as f64).await;
    }
}
