//! Named retry strategies: pre-wired backoff calculators and continuation
//! predicates.
//!
//! | Strategy                 | Wait                         | Attempts  |
//! |--------------------------|------------------------------|-----------|
//! | [`Forever`]              | fixed                        | unbounded |
//! | [`Linear`]               | linear                       | unbounded |
//! | [`Exponential`]          | exponential                  | unbounded |
//! | [`UpTo`]                 | fixed                        | bounded   |
//! | [`LinearUpTo`]           | linear                       | bounded   |
//! | [`ExponentialUpTo`]      | exponential                  | bounded   |
//! | [`LinearMaxWaitUpTo`]    | linear, capped               | bounded   |
//! | [`ExponentialMaxWaitUpTo`] | exponential, capped        | bounded   |
//! | [`NEVER`]                | none                         | one call  |
//! | [`Skip`]                 | none                         | no calls  |
//!
//! [`Policy`] expresses any of these as data, e.g. from a config file.

use std::time::Duration;

use super::backoff::{self, Backoff};
use super::run::Continuation;
use super::strategy::Strategy;

/// Retry forever with a fixed wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Forever {
    pub wait: Duration,
}

impl Forever {
    pub fn new(wait: Duration) -> Self {
        Self { wait }
    }
}

impl Strategy for Forever {
    fn wait(&self, _waits: u64) -> Duration {
        backoff::fixed(self.wait)
    }

    fn should_continue(&self, _attempted: u64) -> bool {
        true
    }
}

/// Retry forever; the wait grows by `initial_wait * growth_factor` each time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Linear {
    pub initial_wait: Duration,
    pub growth_factor: f64,
}

impl Linear {
    pub fn new(initial_wait: Duration, growth_factor: f64) -> Self {
        Self {
            initial_wait,
            growth_factor,
        }
    }
}

impl Strategy for Linear {
    fn wait(&self, waits: u64) -> Duration {
        backoff::linear(self.initial_wait, self.growth_factor, waits)
    }

    fn should_continue(&self, _attempted: u64) -> bool {
        true
    }
}

/// Retry forever; wait `initial_wait * (1 + growth_factor)^i` before retry `i`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Exponential {
    pub initial_wait: Duration,
    pub growth_factor: f64,
}

impl Exponential {
    pub fn new(initial_wait: Duration, growth_factor: f64) -> Self {
        Self {
            initial_wait,
            growth_factor,
        }
    }
}

impl Strategy for Exponential {
    fn wait(&self, waits: u64) -> Duration {
        backoff::exponential(self.initial_wait, self.growth_factor, waits)
    }

    fn should_continue(&self, _attempted: u64) -> bool {
        true
    }
}

/// Retry up to `max_attempts` retryable failures with a fixed wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpTo {
    pub wait: Duration,
    /// Retryable failures tolerated before giving up. 0 behaves like 1: the
    /// first retryable failure is returned.
    pub max_attempts: u64,
}

impl UpTo {
    pub const fn new(wait: Duration, max_attempts: u64) -> Self {
        Self { wait, max_attempts }
    }
}

impl Strategy for UpTo {
    fn wait(&self, _waits: u64) -> Duration {
        backoff::fixed(self.wait)
    }

    fn should_continue(&self, attempted: u64) -> bool {
        Continuation::UpTo(self.max_attempts).should_continue(attempted)
    }
}

/// Invoke once and return whatever the operation reports, without waiting.
pub const NEVER: UpTo = UpTo::new(Duration::ZERO, 0);

/// Linear backoff, bounded attempts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearUpTo {
    pub initial_wait: Duration,
    pub growth_factor: f64,
    pub max_attempts: u64,
}

impl LinearUpTo {
    pub fn new(initial_wait: Duration, growth_factor: f64, max_attempts: u64) -> Self {
        Self {
            initial_wait,
            growth_factor,
            max_attempts,
        }
    }
}

impl Strategy for LinearUpTo {
    fn wait(&self, waits: u64) -> Duration {
        backoff::linear(self.initial_wait, self.growth_factor, waits)
    }

    fn should_continue(&self, attempted: u64) -> bool {
        Continuation::UpTo(self.max_attempts).should_continue(attempted)
    }
}

/// Exponential backoff, bounded attempts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExponentialUpTo {
    pub initial_wait: Duration,
    pub growth_factor: f64,
    pub max_attempts: u64,
}

impl ExponentialUpTo {
    pub fn new(initial_wait: Duration, growth_factor: f64, max_attempts: u64) -> Self {
        Self {
            initial_wait,
            growth_factor,
            max_attempts,
        }
    }
}

impl Strategy for ExponentialUpTo {
    fn wait(&self, waits: u64) -> Duration {
        backoff::exponential(self.initial_wait, self.growth_factor, waits)
    }

    fn should_continue(&self, attempted: u64) -> bool {
        Continuation::UpTo(self.max_attempts).should_continue(attempted)
    }
}

/// Linear backoff that stops growing at `max_wait`, bounded attempts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearMaxWaitUpTo {
    pub initial_wait: Duration,
    pub growth_factor: f64,
    pub max_attempts: u64,
    pub max_wait: Duration,
}

impl LinearMaxWaitUpTo {
    pub fn new(
        initial_wait: Duration,
        growth_factor: f64,
        max_attempts: u64,
        max_wait: Duration,
    ) -> Self {
        Self {
            initial_wait,
            growth_factor,
            max_attempts,
            max_wait,
        }
    }
}

impl Strategy for LinearMaxWaitUpTo {
    fn wait(&self, waits: u64) -> Duration {
        let raw = backoff::linear(self.initial_wait, self.growth_factor, waits);
        backoff::capped(raw, Some(self.max_wait))
    }

    fn should_continue(&self, attempted: u64) -> bool {
        Continuation::UpTo(self.max_attempts).should_continue(attempted)
    }
}

/// Exponential backoff that stops growing at `max_wait`, bounded attempts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExponentialMaxWaitUpTo {
    pub initial_wait: Duration,
    pub growth_factor: f64,
    pub max_attempts: u64,
    pub max_wait: Duration,
}

impl ExponentialMaxWaitUpTo {
    pub fn new(
        initial_wait: Duration,
        growth_factor: f64,
        max_attempts: u64,
        max_wait: Duration,
    ) -> Self {
        Self {
            initial_wait,
            growth_factor,
            max_attempts,
            max_wait,
        }
    }
}

impl Strategy for ExponentialMaxWaitUpTo {
    fn wait(&self, waits: u64) -> Duration {
        let raw = backoff::exponential(self.initial_wait, self.growth_factor, waits);
        backoff::capped(raw, Some(self.max_wait))
    }

    fn should_continue(&self, attempted: u64) -> bool {
        Continuation::UpTo(self.max_attempts).should_continue(attempted)
    }
}

/// Never invokes the operation and always succeeds. Disables a retry-guarded
/// block without branching at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Skip;

impl Strategy for Skip {
    fn wait(&self, _waits: u64) -> Duration {
        Duration::ZERO
    }

    fn should_continue(&self, _attempted: u64) -> bool {
        false
    }

    fn skips(&self) -> bool {
        true
    }
}

/// Any backoff with optional attempt limit and wait cap.
///
/// `max_attempts: None` retries until success, terminal failure, or
/// cancellation; `max_wait: None` leaves the wait uncapped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Policy {
    pub backoff: Backoff,
    pub max_attempts: Option<u64>,
    pub max_wait: Option<Duration>,
}

impl Policy {
    pub fn new(backoff: Backoff) -> Self {
        Self {
            backoff,
            max_attempts: None,
            max_wait: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    pub fn continuation(&self) -> Continuation {
        Continuation::from_max_attempts(self.max_attempts)
    }

    /// Waits issued before each of the first `count` retries.
    pub fn schedule(&self, count: u64) -> Vec<Duration> {
        (0..count).map(|i| self.wait(i)).collect()
    }
}

impl Strategy for Policy {
    fn wait(&self, waits: u64) -> Duration {
        backoff::capped(self.backoff.wait(waits), self.max_wait)
    }

    fn should_continue(&self, attempted: u64) -> bool {
        self.continuation().should_continue(attempted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn never_stops_on_first_retry() {
        assert!(!NEVER.should_continue(1));
        assert_eq!(NEVER.wait(0), Duration::ZERO);
    }

    #[test]
    fn skip_skips() {
        assert!(Skip.skips());
        assert!(!Forever::new(MS).skips());
    }

    #[test]
    fn up_to_counts_attempts() {
        let s = UpTo::new(MS, 5);
        assert!(s.should_continue(4));
        assert!(!s.should_continue(5));
        assert_eq!(s.wait(100), MS);
    }

    #[test]
    fn unbounded_strategies_always_continue() {
        assert!(Forever::new(MS).should_continue(u64::MAX));
        assert!(Linear::new(MS, 1.0).should_continue(u64::MAX));
        assert!(Exponential::new(MS, 1.0).should_continue(u64::MAX));
    }

    #[test]
    fn growth_strategies_use_calculators() {
        assert_eq!(Exponential::new(MS, 1.0).wait(5), Duration::from_millis(32));
        assert_eq!(Linear::new(MS, 1.0).wait(5), Duration::from_millis(6));
        assert_eq!(ExponentialUpTo::new(MS, 1.0, 3).wait(2), Duration::from_millis(4));
        assert_eq!(LinearUpTo::new(MS, 2.0, 3).wait(2), Duration::from_millis(5));
    }

    #[test]
    fn max_wait_caps_growth() {
        let cap = Duration::from_millis(20);
        let exp = ExponentialMaxWaitUpTo::new(MS, 1.0, 100, cap);
        let lin = LinearMaxWaitUpTo::new(MS, 1.0, 100, cap);
        for i in 0..200 {
            assert!(exp.wait(i) <= cap);
            assert!(lin.wait(i) <= cap);
        }
        assert_eq!(exp.wait(4), Duration::from_millis(16));
        assert_eq!(exp.wait(5), cap);
        assert_eq!(lin.wait(30), cap);
    }

    #[test]
    fn policy_matches_named_strategies() {
        let p = Policy::new(Backoff::Exponential {
            initial_wait: MS,
            growth_factor: 1.0,
        })
        .with_max_attempts(4)
        .with_max_wait(Duration::from_millis(5));
        let named = ExponentialMaxWaitUpTo::new(MS, 1.0, 4, Duration::from_millis(5));
        for i in 0..10 {
            assert_eq!(p.wait(i), named.wait(i));
            assert_eq!(p.should_continue(i), named.should_continue(i));
        }
        assert_eq!(
            p.schedule(4),
            vec![MS, Duration::from_millis(2), Duration::from_millis(4), Duration::from_millis(5)]
        );
    }

    #[test]
    fn default_policy_is_forever_without_wait() {
        let p = Policy::default();
        assert_eq!(p.continuation(), Continuation::Forever);
        assert_eq!(p.wait(3), Duration::ZERO);
    }

    #[test]
    fn boxed_strategies_are_interchangeable() {
        let mut strategies: Vec<Box<dyn Strategy>> =
            vec![Box::new(UpTo::new(MS, 2)), Box::new(NEVER), Box::new(Skip)];
        assert!(strategies[0].should_continue(1));
        assert!(!strategies[1].should_continue(1));
        assert!(strategies[2].skips());
        strategies.swap(0, 2);
        assert!(strategies[0].skips());
    }
}
