use std::sync::Arc;

use futures_util::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use triage_bot_core::client::IdentityProvider;

/// Name used whenever the principal cannot be resolved.
pub const UNKNOWN_ACTOR: &str = "unknown";

/// Memoized acting identity. Resolution starts eagerly when constructed and
/// is awaited on first use; every failure path, including a panicked
/// resolution task, degrades to [`UNKNOWN_ACTOR`].
#[derive(Clone)]
pub struct ActingIdentity {
    inner: Shared<BoxFuture<'static, String>>,
}

impl ActingIdentity {
    /// Kick off resolution in the background. Must be called from within a
    /// tokio runtime.
    pub fn spawn(provider: Arc<dyn IdentityProvider>) -> Self {
        let handle = tokio::spawn(async move {
            match provider.authenticated_user().await {
                Ok(login) => login,
                Err(err) => {
                    tracing::warn!("Failed to resolve acting identity: {:?}", err);
                    UNKNOWN_ACTOR.to_string()
                }
            }
        });
        let inner = handle
            .map(|joined| joined.unwrap_or_else(|_| UNKNOWN_ACTOR.to_string()))
            .boxed()
            .shared();
        Self { inner }
    }

    /// Identity with nothing to resolve.
    pub fn fixed(name: impl Into<String>) -> Self {
        let name = name.into();
        Self { inner: async move { name }.boxed().shared() }
    }

    pub async fn get(&self) -> String {
        self.inner.clone().await
    }
}
