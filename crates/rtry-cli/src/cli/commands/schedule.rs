//! `rtry schedule` – print the waits a strategy would issue.

use rtry_core::retry::Strategy;
use std::time::Duration;

/// (retry number, wait before it, cumulative wait) for each retry the
/// strategy permits, up to `count`.
pub(crate) fn schedule_rows(strategy: &dyn Strategy, count: u64) -> Vec<(u64, Duration, Duration)> {
    let mut rows = Vec::new();
    if strategy.skips() {
        return rows;
    }
    let mut total = Duration::ZERO;
    for i in 0..count {
        if !strategy.should_continue(i + 1) {
            break;
        }
        let wait = strategy.wait(i);
        total = total.saturating_add(wait);
        rows.push((i + 1, wait, total));
    }
    rows
}

pub fn run_schedule(strategy: &dyn Strategy, count: u64) {
    if strategy.skips() {
        println!("skip: the command is never run");
        return;
    }
    let rows = schedule_rows(strategy, count);
    if rows.is_empty() {
        println!("no retries: the first retryable failure is returned");
        return;
    }
    println!("{:>5}  {:>12}  {:>12}", "retry", "wait", "total");
    for (n, wait, total) in rows {
        println!("{:>5}  {:>12?}  {:>12?}", n, wait, total);
    }
}
