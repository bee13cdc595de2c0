//! Per-call cancellation and deadline.
//!
//! A [`CallContext`] is threaded from the client down to the backend adapter,
//! which wraps its HTTP round trip in [`CallContext::run`]. When the token
//! fires or the deadline elapses the request future is dropped, which aborts
//! the in-flight request, and the call resolves to
//! [`AnyFuncError::Cancelled`] instead of a transport error.
use std::{future::Future, time::Duration};

pub use tokio_util::sync::CancellationToken;

use crate::error::{AnyFuncError, CancelReason, Result};

#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl CallContext {
    /// A context that never cancels and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort the call once `token` (or any of its parents) is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Abort the call once `timeout` has elapsed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drive `future` to completion unless the context is cancelled first.
    ///
    /// An already-cancelled context never polls `future`.
    pub async fn run<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(AnyFuncError::Cancelled(CancelReason::Token));
        }

        let guarded = async {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(AnyFuncError::Cancelled(CancelReason::Token)),
                out = future => out,
            }
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, guarded)
                .await
                .unwrap_or_else(|_| Err(AnyFuncError::Cancelled(CancelReason::Timeout(limit)))),
            None => guarded.await,
        }
    }
}
