use std::future::Future;

use anyhow::{bail, Context, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owns the lifetime of one polling task.
///
/// At most one poller may run per loaded transcript; `start` refuses a
/// double-start and `stop` cancels then joins, so a replaced transcript can
/// never leave a stale loop firing against the wrong line index.
pub(crate) struct SyncWorker {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SyncWorker {
    pub(crate) fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawn the polling loop built by `make_loop` with a fresh cancellation
    /// token.
    pub(crate) fn start<F, Fut>(&mut self, make_loop: F) -> Result<()>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.handle.is_some() {
            bail!("sync poller already active");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(make_loop(cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancel the poller and wait for it to wind down. Safe to call when
    /// nothing is running.
    pub(crate) async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("sync poller task failed to join")?;
        }

        Ok(())
    }
}
