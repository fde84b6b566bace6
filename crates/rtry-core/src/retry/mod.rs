//! Retry-with-backoff engine.
//!
//! An operation reports each invocation as an [`Outcome`]: success, a
//! retryable failure (built with [`again`]), or a terminal failure. A
//! [`Strategy`] decides how long to wait between attempts and when to give up;
//! a [`CancelSignal`] bounds the whole session from outside.
//!
//! ```no_run
//! use std::time::Duration;
//! use rtry_core::retry::{again, CancelSignal, ExponentialMaxWaitUpTo, Outcome, Strategy};
//!
//! # async fn fetch() -> Result<(), std::io::Error> { Ok(()) }
//! # async fn example() {
//! let signal = CancelSignal::with_timeout(Duration::from_secs(2));
//! let strategy = ExponentialMaxWaitUpTo::new(
//!     Duration::from_millis(50),
//!     1.0,
//!     15,
//!     Duration::from_millis(500),
//! );
//! let res = strategy
//!     .retry(&signal, || async {
//!         match fetch().await {
//!             Ok(()) => Outcome::Success,
//!             Err(e) if e.kind() == std::io::ErrorKind::TimedOut => again(e),
//!             Err(e) => Outcome::Stop(e),
//!         }
//!     })
//!     .await;
//! # let _ = res;
//! # }
//! ```

mod backoff;
mod cancel;
mod error;
mod observer;
mod outcome;
mod run;
mod sleep;
mod strategies;
mod strategy;

pub use backoff::{capped, exponential, fixed, linear, Backoff};
pub use cancel::CancelSignal;
pub use error::{Cancelled, RetryError};
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use outcome::{again, Classify, Outcome};
pub use run::{run, run_forever, run_until, run_up_to, Continuation};
pub use sleep::sleep;
pub use strategies::{
    Exponential, ExponentialMaxWaitUpTo, ExponentialUpTo, Forever, Linear, LinearMaxWaitUpTo,
    LinearUpTo, Policy, Skip, UpTo, NEVER,
};
pub use strategy::Strategy;
