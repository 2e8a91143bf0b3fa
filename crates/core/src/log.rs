/// Last-resort plain-text sink: the self-protection refusal message and the
/// fallback when structured error reporting fails both land here.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Default sink, writing through the structured log.
pub struct TracingLog;

impl LogSink for TracingLog {
    fn write_line(&self, line: &str) {
        tracing::warn!("{line}");
    }
}
