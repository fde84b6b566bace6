//! Backoff calculators: how long to wait before the next attempt.
//!
//! All calculators are pure functions of (initial wait, growth factor,
//! iteration). `iteration` is the zero-based number of waits issued so far in
//! the session, so the first wait is always the initial wait. Results saturate
//! at [`Duration::MAX`] instead of overflowing.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Fixed backoff: always `wait`.
pub fn fixed(wait: Duration) -> Duration {
    wait
}

/// Linear backoff: `initial + initial * growth_factor * iteration`.
pub fn linear(initial: Duration, growth_factor: f64, iteration: u64) -> Duration {
    if iteration == 0 {
        return initial;
    }
    let w = initial.as_nanos() as f64;
    let g = clamp_growth(growth_factor);
    grown(initial, g, w + w * g * iteration as f64)
}

/// Exponential backoff: `initial * (1 + growth_factor)^iteration`.
pub fn exponential(initial: Duration, growth_factor: f64, iteration: u64) -> Duration {
    if iteration == 0 {
        return initial;
    }
    let w = initial.as_nanos() as f64;
    let g = clamp_growth(growth_factor);
    grown(initial, g, w * (1.0 + g).powf(iteration as f64))
}

/// Apply an optional cap after the growth calculation.
pub fn capped(wait: Duration, max_wait: Option<Duration>) -> Duration {
    match max_wait {
        Some(cap) => wait.min(cap),
        None => wait,
    }
}

/// Negative or NaN growth degenerates to fixed backoff.
fn clamp_growth(growth_factor: f64) -> f64 {
    if growth_factor.is_nan() || growth_factor < 0.0 {
        0.0
    } else {
        growth_factor
    }
}

/// Never below `initial`. Waits above 2^53 ns lose precision in f64, so any
/// result that does not exceed `initial` there is `initial` itself.
fn grown(initial: Duration, growth_factor: f64, nanos: f64) -> Duration {
    if growth_factor == 0.0 || nanos <= initial.as_nanos() as f64 {
        return initial;
    }
    saturating_from_nanos(nanos).max(initial)
}

fn saturating_from_nanos(nanos: f64) -> Duration {
    if nanos.is_nan() || nanos <= 0.0 {
        return Duration::ZERO;
    }
    if nanos >= Duration::MAX.as_nanos() as f64 {
        return Duration::MAX;
    }
    let n = nanos as u128;
    Duration::new((n / NANOS_PER_SEC) as u64, (n % NANOS_PER_SEC) as u32)
}

/// A backoff calculator selected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Backoff {
    Fixed {
        wait: Duration,
    },
    Linear {
        initial_wait: Duration,
        growth_factor: f64,
    },
    Exponential {
        initial_wait: Duration,
        growth_factor: f64,
    },
}

impl Backoff {
    /// Wait before the retry that follows `iteration` earlier waits.
    pub fn wait(&self, iteration: u64) -> Duration {
        match *self {
            Backoff::Fixed { wait } => fixed(wait),
            Backoff::Linear {
                initial_wait,
                growth_factor,
            } => linear(initial_wait, growth_factor, iteration),
            Backoff::Exponential {
                initial_wait,
                growth_factor,
            } => exponential(initial_wait, growth_factor, iteration),
        }
    }

    pub fn initial_wait(&self) -> Duration {
        match *self {
            Backoff::Fixed { wait } => wait,
            Backoff::Linear { initial_wait, .. } | Backoff::Exponential { initial_wait, .. } => {
                initial_wait
            }
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Fixed {
            wait: Duration::ZERO,
        }
    }
}
