use thiserror::Error;

/// Error kinds the dispatcher distinguishes when a run fails. Everything else
/// travels as a plain [`anyhow::Error`].
#[derive(Debug, Error)]
pub enum RunError {
    /// A hook the concrete bot did not override was invoked.
    #[error("no handler implemented for {0} events")]
    NotImplemented(&'static str),
    /// An issue event carried a sub-action outside the routing table.
    #[error("unexpected action: {0}")]
    UnexpectedAction(String),
    /// A required run input was absent from the environment.
    #[error("missing required input: {0}")]
    MissingInput(String),
}
