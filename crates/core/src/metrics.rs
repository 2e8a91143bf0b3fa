use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::report::FailureReport;

/// Contextual tags attached to every sample. The shape is identical across
/// all samples of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricTags {
    pub repo: String,
    pub issue: Option<u64>,
    pub bot: String,
    pub actor: String,
}

/// Fire-and-forget name/value pair; no acknowledgement required.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    pub name: String,
    pub value: f64,
    pub tags: MetricTags,
}

/// Optional telemetry collaborator. Callers absorb errors; delivery failure
/// must never affect the run outcome.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn track_metric(&self, sample: &MetricSample) -> Result<()>;
    async fn track_exception(&self, report: &FailureReport) -> Result<()>;
}
