//! `rtry exec` – run a command until it exits 0 or the strategy gives up.

use anyhow::{anyhow, Context, Result};
use rtry_core::retry::{again, CancelSignal, Outcome, RetryError, Strategy, TracingObserver};
use std::time::Duration;
use tokio::process::Command;
use tokio::task::JoinHandle;

pub async fn run_exec(
    strategy: Box<dyn Strategy>,
    deadline: Option<Duration>,
    retry_on: &[i32],
    command: &[String],
) -> Result<()> {
    let (program, args) = command.split_first().context("no command given")?;

    let signal = match deadline {
        Some(d) => CancelSignal::with_timeout(d),
        None => CancelSignal::new(),
    };
    let interrupt_handle = spawn_interrupt_listener(signal.clone());

    let observer = TracingObserver::new(program.as_str());
    let res = strategy
        .retry_observed(&signal, || attempt(program, args, retry_on), &observer)
        .await;
    interrupt_handle.abort();

    match res {
        Ok(()) => Ok(()),
        Err(RetryError::Cancelled(cause)) => {
            Err(anyhow::Error::new(cause).context(format!("{} did not succeed", program)))
        }
        Err(RetryError::Operation(err)) => Err(err),
    }
}

/// Cancel `signal` on Ctrl-C. Abort the handle once the session is over.
pub(crate) fn spawn_interrupt_listener(signal: CancelSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling retries");
            signal.cancel();
        }
    })
}

async fn attempt(program: &str, args: &[String], retry_on: &[i32]) -> Outcome<anyhow::Error> {
    match Command::new(program).args(args).status().await {
        Ok(status) if status.success() => Outcome::Success,
        Ok(status) => classify_exit(status.code(), retry_on),
        Err(err) => {
            Outcome::Stop(anyhow::Error::new(err).context(format!("failed to spawn {}", program)))
        }
    }
}

/// Classify a non-zero exit. `code` is None when the child was killed by a
/// signal; that only counts as retryable when no codes were listed.
pub(crate) fn classify_exit(code: Option<i32>, retry_on: &[i32]) -> Outcome<anyhow::Error> {
    let err = match code {
        Some(c) => anyhow!("command exited with code {}", c),
        None => anyhow!("command terminated by signal"),
    };
    let retryable = match code {
        _ if retry_on.is_empty() => true,
        Some(c) => retry_on.contains(&c),
        None => false,
    };
    if retryable {
        again(err)
    } else {
        Outcome::Stop(err)
    }
}
