//! Classification of a single operation invocation.
//!
//! An operation tells the retry loop what to do next by returning an
//! [`Outcome`]: stop with success, try again, or stop with a failure.

/// Result of one invocation of a retried operation.
///
/// Exactly one of the three states holds per invocation. A retryable failure
/// always owns its cause, which is handed back to the caller (unwrapped) if the
/// strategy declines further attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<E> {
    /// The operation succeeded; the loop stops without an error.
    Success,
    /// The operation failed but another attempt is warranted.
    Retry(E),
    /// The operation failed and must not be attempted again.
    Stop(E),
}

/// Wrap `cause` as a retryable failure.
///
/// Most errors should stop the loop; only wrap the ones that are worth
/// another attempt (timeouts, throttling, dropped connections).
pub fn again<E>(cause: E) -> Outcome<E> {
    Outcome::Retry(cause)
}

impl<E> Outcome<E> {
    /// The success sentinel.
    pub fn success() -> Self {
        Outcome::Success
    }

    /// Classify `result`, treating an error as retryable only when
    /// `is_retryable` returns true for it.
    pub fn retry_if<T, F>(result: Result<T, E>, is_retryable: F) -> Self
    where
        F: FnOnce(&E) -> bool,
    {
        match result {
            Ok(_) => Outcome::Success,
            Err(e) if is_retryable(&e) => Outcome::Retry(e),
            Err(e) => Outcome::Stop(e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn is_retry(&self) -> bool {
        matches!(self, Outcome::Retry(_))
    }

    /// The failure cause, if any.
    pub fn cause(&self) -> Option<&E> {
        match self {
            Outcome::Success => None,
            Outcome::Retry(e) | Outcome::Stop(e) => Some(e),
        }
    }

    /// Map the cause type, keeping the classification.
    pub fn map_err<E2, F>(self, f: F) -> Outcome<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Outcome::Success => Outcome::Success,
            Outcome::Retry(e) => Outcome::Retry(f(e)),
            Outcome::Stop(e) => Outcome::Stop(f(e)),
        }
    }
}

/// Errors stop the loop unless explicitly wrapped with [`again`].
impl<T, E> From<Result<T, E>> for Outcome<E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(_) => Outcome::Success,
            Err(e) => Outcome::Stop(e),
        }
    }
}

/// Extension methods to classify a `Result` inside an operation body.
pub trait Classify<E> {
    /// `Ok` is success, `Err` is a retryable failure.
    fn retry_on_err(self) -> Outcome<E>;
    /// `Ok` is success, `Err` is a terminal failure.
    fn stop_on_err(self) -> Outcome<E>;
}

impl<T, E> Classify<E> for Result<T, E> {
    fn retry_on_err(self) -> Outcome<E> {
        match self {
            Ok(_) => Outcome::Success,
            Err(e) => Outcome::Retry(e),
        }
    }

    fn stop_on_err(self) -> Outcome<E> {
        Outcome::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn again_wraps_cause_as_retry() {
        let o = again("flaky");
        assert!(o.is_retry());
        assert_eq!(o.cause(), Some(&"flaky"));
    }

    #[test]
    fn plain_errors_are_terminal() {
        let r: Result<(), &str> = Err("bad input");
        assert_eq!(Outcome::from(r), Outcome::Stop("bad input"));
        let ok: Result<u8, &str> = Ok(3);
        assert_eq!(Outcome::from(ok), Outcome::Success);
    }

    #[test]
    fn classify_extension() {
        let r: Result<(), io::ErrorKind> = Err(io::ErrorKind::TimedOut);
        assert_eq!(r.retry_on_err(), Outcome::Retry(io::ErrorKind::TimedOut));
        let r: Result<(), io::ErrorKind> = Err(io::ErrorKind::NotFound);
        assert_eq!(r.stop_on_err(), Outcome::Stop(io::ErrorKind::NotFound));
    }

    #[test]
    fn retry_if_uses_predicate() {
        let timed_out: Result<(), io::ErrorKind> = Err(io::ErrorKind::TimedOut);
        let not_found: Result<(), io::ErrorKind> = Err(io::ErrorKind::NotFound);
        let transient = |k: &io::ErrorKind| *k == io::ErrorKind::TimedOut;

        assert!(Outcome::retry_if(timed_out, transient).is_retry());
        assert_eq!(
            Outcome::retry_if(not_found, transient),
            Outcome::Stop(io::ErrorKind::NotFound)
        );
        assert!(Outcome::<io::ErrorKind>::retry_if(Ok(()), transient).is_success());
    }

    #[test]
    fn map_err_keeps_classification() {
        let o = again(404u16).map_err(|c| format!("HTTP {}", c));
        assert_eq!(o, Outcome::Retry("HTTP 404".to_string()));
        assert!(Outcome::<u16>::success().map_err(|c| c + 1).is_success());
    }
}
