//! Scripted operation: replays a fixed list of outcomes and counts invocations.

use std::collections::VecDeque;
use std::future::{self, Ready};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rtry_core::retry::{again, Outcome};

/// Cause type used by the scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault(pub &'static str);

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Fault {}

pub const RETRY_REASON: Fault = Fault("retry reason");
pub const FATAL: Fault = Fault("cannot be retried");

/// Replays `responses` in order; once exhausted keeps repeating `fallback`.
#[derive(Clone)]
pub struct Script {
    responses: Arc<Mutex<VecDeque<Outcome<Fault>>>>,
    fallback: Outcome<Fault>,
    runs: Arc<AtomicUsize>,
}

impl Script {
    pub fn new(responses: Vec<Outcome<Fault>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            fallback: Outcome::Success,
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// `n` retryable failures followed by success.
    pub fn fails_then_succeeds(n: usize) -> Self {
        Self::new(vec![again(RETRY_REASON); n])
    }

    /// Retryable failure on every invocation.
    pub fn always_retries() -> Self {
        Self {
            fallback: again(RETRY_REASON),
            ..Self::new(Vec::new())
        }
    }

    pub fn times_run(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// The operation closure to hand to a strategy.
    pub fn op(&self) -> impl FnMut() -> Ready<Outcome<Fault>> + Send + '_ {
        move || {
            self.runs.fetch_add(1, Ordering::SeqCst);
            let next = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone());
            future::ready(next)
        }
    }
}
