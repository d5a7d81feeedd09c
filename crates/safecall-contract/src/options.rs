use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Per-call limits applied around the handler.
///
/// The default imposes nothing: a handler that never settles keeps the call
/// pending. A deadline requires a tokio runtime with the time driver enabled.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Maximum time the handler may run before the call resolves as timed out.
    pub deadline: Option<Duration>,
    /// Resolves the call as cancelled once the token fires.
    pub cancel: Option<CancellationToken>,
}

impl ExecuteOptions {
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// True when neither a deadline nor a cancellation token is set.
    pub fn is_unbounded(&self) -> bool {
        self.deadline.is_none() && self.cancel.is_none()
    }
}
