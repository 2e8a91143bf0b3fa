use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Artifact delivered to the error-reporting channel when a run fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    /// Error message plus its context chain.
    pub message: String,
    /// Id of the bot the failure is attributed to.
    pub bot: String,
    /// Resolved acting identity ("unknown" when resolution failed).
    pub actor: String,
    pub issue: Option<u64>,
}

impl FailureReport {
    /// Fixed template: what failed, the error text, who was acting.
    pub fn render(&self) -> String {
        let mut out = format!("Bot `{}` failed", self.bot);
        if let Some(number) = self.issue {
            out.push_str(&format!(" while handling #{number}"));
        }
        out.push_str(&format!(":\n```\n{}\n```\nActor: {}", self.message, self.actor));
        out
    }
}

/// Error-reporting channel. Posts rendered reports to a designated tracking
/// issue, marked as automated; may itself fail.
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn deliver(&self, report: &FailureReport) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::FailureReport;

    fn report(issue: Option<u64>) -> FailureReport {
        FailureReport {
            message: "unexpected action: pinned".to_string(),
            bot: "locker".to_string(),
            actor: "octo-bot".to_string(),
            issue,
        }
    }

    #[test]
    fn test_render_with_issue() {
        let rendered = report(Some(42)).render();
        assert!(rendered.starts_with("Bot `locker` failed while handling #42:"));
        assert!(rendered.contains("unexpected action: pinned"));
        assert!(rendered.ends_with("Actor: octo-bot"));
    }

    #[test]
    fn test_render_without_issue() {
        let rendered = report(None).render();
        assert!(rendered.starts_with("Bot `locker` failed:"));
        assert!(!rendered.contains('#'));
    }
}
