//! Telemetry sink implementations.
//!
//! The dispatcher treats telemetry as an optional collaborator and absorbs
//! every sink error, so both sinks here are free to fail loudly.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use triage_bot_core::{
    config::TelemetryConfig,
    metrics::{MetricSample, TelemetrySink},
    report::FailureReport,
};

/// Sink that writes samples into the structured log. Used when telemetry is
/// enabled without a collector endpoint.
pub struct LogMetrics;

#[async_trait]
impl TelemetrySink for LogMetrics {
    async fn track_metric(&self, sample: &MetricSample) -> Result<()> {
        tracing::info!(
            name = %sample.name,
            value = sample.value,
            repo = %sample.tags.repo,
            issue = ?sample.tags.issue,
            bot = %sample.tags.bot,
            actor = %sample.tags.actor,
            "metric"
        );
        Ok(())
    }

    async fn track_exception(&self, report: &FailureReport) -> Result<()> {
        tracing::error!(
            bot = %report.bot,
            actor = %report.actor,
            issue = ?report.issue,
            "tracked exception: {}",
            report.message
        );
        Ok(())
    }
}

/// Sink that posts each record to a collector endpoint as JSON.
pub struct HttpMetrics {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpMetrics {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self { client: reqwest::Client::new(), endpoint, api_key }
    }

    async fn post(&self, kind: &str, data: serde_json::Value) -> Result<()> {
        let mut request =
            self.client.post(&self.endpoint).json(&json!({ "kind": kind, "data": data }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        request
            .send()
            .await
            .context("Failed to deliver telemetry")?
            .error_for_status()
            .context("Telemetry endpoint rejected the record")?;
        Ok(())
    }
}

#[async_trait]
impl TelemetrySink for HttpMetrics {
    async fn track_metric(&self, sample: &MetricSample) -> Result<()> {
        self.post("metric", serde_json::to_value(sample)?).await
    }

    async fn track_exception(&self, report: &FailureReport) -> Result<()> {
        self.post("exception", serde_json::to_value(report)?).await
    }
}

/// Build the sink the configuration asks for. `None` disables telemetry
/// entirely, making the dispatcher's metric path a no-op.
pub fn from_config(config: Option<&TelemetryConfig>) -> Option<Arc<dyn TelemetrySink>> {
    let config = config?;
    match &config.endpoint {
        Some(endpoint) => {
            Some(Arc::new(HttpMetrics::new(endpoint.clone(), config.api_key.clone())))
        }
        None => Some(Arc::new(LogMetrics)),
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use triage_bot_core::{
        config::TelemetryConfig,
        metrics::{MetricSample, MetricTags, TelemetrySink},
        report::FailureReport,
    };

    use super::{HttpMetrics, from_config};

    fn sample() -> MetricSample {
        MetricSample {
            name: "usage.requests".to_string(),
            value: 7.0,
            tags: MetricTags {
                repo: "o/r".to_string(),
                issue: Some(42),
                bot: "locker".to_string(),
                actor: "octo-bot".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_metric_delivery() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/records")
                    .header("authorization", "Bearer sekrit")
                    .json_body_includes(
                        r#"{
                            "kind": "metric",
                            "data": {
                                "name": "usage.requests",
                                "value": 7.0,
                                "tags": { "repo": "o/r", "issue": 42 }
                            }
                        }"#,
                    );
                then.status(202);
            })
            .await;

        let sink = HttpMetrics::new(server.url("/v1/records"), Some("sekrit".to_string()));
        sink.track_metric(&sample()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_record_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/records");
                then.status(500);
            })
            .await;

        let sink = HttpMetrics::new(server.url("/v1/records"), None);
        let report = FailureReport {
            message: "boom".to_string(),
            bot: "locker".to_string(),
            actor: "unknown".to_string(),
            issue: None,
        };
        assert!(sink.track_exception(&report).await.is_err());
    }

    #[test]
    fn test_from_config_selection() {
        assert!(from_config(None).is_none());
        let log_only = TelemetryConfig { endpoint: None, api_key: None };
        assert!(from_config(Some(&log_only)).is_some());
        let http = TelemetryConfig {
            endpoint: Some("https://collector.example/v1".to_string()),
            api_key: None,
        };
        assert!(from_config(Some(&http)).is_some());
    }
}
