//! Cancellation signal shared between a caller and its retry sessions.
//!
//! The signal fires when its token is cancelled or its deadline passes,
//! whichever happens first. The retry loop polls it before every invocation
//! and races every wait against it; it never owns the signal's lifecycle.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::Cancelled;

/// External deadline/cancel token passed into every retry session.
///
/// Cloning is cheap and clones observe the same token and deadline.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelSignal {
    /// A signal that only fires when [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal that fires `timeout` from now (or on explicit cancel).
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(deadline_after(timeout))
    }

    /// A signal that fires at `deadline` (or on explicit cancel).
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Use an existing token, e.g. one owned by a larger shutdown tree.
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Derive a signal that fires when this one does. Cancelling the child
    /// does not cancel the parent.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Like [`child`](Self::child), but also fires `timeout` from now if that
    /// is earlier than the inherited deadline.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let own = deadline_after(timeout);
        Self {
            token: self.token.child_token(),
            deadline: Some(match self.deadline {
                Some(parent) => parent.min(own),
                None => own,
            }),
        }
    }

    /// Fire the signal explicitly.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Why the signal has fired, or `None` if it has not.
    ///
    /// Explicit cancellation is reported ahead of an elapsed deadline.
    pub fn cause(&self) -> Option<Cancelled> {
        if self.token.is_cancelled() {
            return Some(Cancelled::Canceled);
        }
        match self.deadline {
            Some(at) if Instant::now() >= at => Some(Cancelled::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_fired(&self) -> bool {
        self.cause().is_some()
    }

    /// Wait until the signal fires. Never resolves for a signal without a
    /// deadline that is never cancelled.
    pub async fn fired(&self) -> Cancelled {
        match self.deadline {
            Some(at) => {
                tokio::select! {
                    _ = self.token.cancelled() => Cancelled::Canceled,
                    _ = tokio::time::sleep_until(at) => {
                        self.cause().unwrap_or(Cancelled::DeadlineExceeded)
                    }
                }
            }
            None => {
                self.token.cancelled().await;
                Cancelled::Canceled
            }
        }
    }
}

/// `now + timeout`, saturating far in the future for huge timeouts.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .unwrap_or_else(|| now + Duration::from_secs(86_400 * 365 * 30))
}
