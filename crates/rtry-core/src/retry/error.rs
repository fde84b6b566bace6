//! Errors surfaced by the retry loop.

use thiserror::Error;

/// Why a cancellation signal fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Cancelled {
    /// The signal was cancelled explicitly.
    #[error("retry canceled")]
    Canceled,
    /// The signal's deadline passed.
    #[error("retry deadline exceeded")]
    DeadlineExceeded,
}

/// Error returned by a retry session.
///
/// A terminal failure and an exhausted retryable failure both surface as
/// [`RetryError::Operation`] carrying the operation's own cause, never a
/// wrapper around it.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The cancellation signal fired before (or between) invocations.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    /// The operation's cause: terminal, or the last retryable failure.
    #[error(transparent)]
    Operation(E),
}

impl<E> RetryError<E> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled(_))
    }

    /// The cancellation cause, if the session ended by cancellation.
    pub fn cancelled(&self) -> Option<Cancelled> {
        match self {
            RetryError::Cancelled(c) => Some(*c),
            RetryError::Operation(_) => None,
        }
    }

    /// The operation's cause, consuming this error.
    pub fn into_operation(self) -> Option<E> {
        match self {
            RetryError::Operation(e) => Some(e),
            RetryError::Cancelled(_) => None,
        }
    }

    pub fn operation(&self) -> Option<&E> {
        match self {
            RetryError::Operation(e) => Some(e),
            RetryError::Cancelled(_) => None,
        }
    }

    pub fn map_err<E2, F>(self, f: F) -> RetryError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            RetryError::Cancelled(c) => RetryError::Cancelled(c),
            RetryError::Operation(e) => RetryError::Operation(f(e)),
        }
    }
}
