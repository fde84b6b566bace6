//! Tests for the exec subcommand and exit-code classification.

use super::{parse, parse_err};
use crate::cli::commands::{classify_exit, spawn_interrupt_listener};
use rtry_core::retry::CancelSignal;
use crate::cli::{CliCommand, StrategyArg};

#[test]
fn cli_parse_exec_minimal() {
    match parse(&["rtry", "exec", "--", "curl", "-f", "http://localhost"]) {
        CliCommand::Exec {
            strategy,
            deadline_secs,
            retry_on,
            command,
        } => {
            assert!(strategy.strategy.is_none());
            assert!(!strategy.never && !strategy.skip);
            assert!(deadline_secs.is_none());
            assert!(retry_on.is_empty());
            assert_eq!(command, vec!["curl", "-f", "http://localhost"]);
        }
        _ => panic!("expected Exec"),
    }
}

#[test]
fn cli_parse_exec_options() {
    match parse(&[
        "rtry",
        "exec",
        "--strategy",
        "linear",
        "--wait-ms",
        "250",
        "--growth",
        "0.5",
        "--max-attempts",
        "7",
        "--max-wait-ms",
        "2000",
        "--deadline-secs",
        "30",
        "--retry-on",
        "75",
        "--retry-on",
        "-1",
        "--",
        "make",
    ]) {
        CliCommand::Exec {
            strategy,
            deadline_secs,
            retry_on,
            command,
        } => {
            assert_eq!(strategy.strategy, Some(StrategyArg::Linear));
            assert_eq!(strategy.wait_ms, Some(250));
            assert_eq!(strategy.growth, Some(0.5));
            assert_eq!(strategy.max_attempts, Some(7));
            assert_eq!(strategy.max_wait_ms, Some(2000));
            assert_eq!(deadline_secs, Some(30));
            assert_eq!(retry_on, vec![75, -1]);
            assert_eq!(command, vec!["make"]);
        }
        _ => panic!("expected Exec with options"),
    }
}

#[test]
fn cli_parse_exec_requires_command() {
    parse_err(&["rtry", "exec"]);
    parse_err(&["rtry", "exec", "--never"]);
}

#[test]
fn cli_parse_never_conflicts_with_backoff_options() {
    parse_err(&["rtry", "exec", "--never", "--wait-ms", "5", "--", "true"]);
    parse_err(&["rtry", "exec", "--never", "--skip", "--", "true"]);
    parse_err(&["rtry", "exec", "--skip", "--max-attempts", "3", "--", "true"]);
}

#[test]
fn classify_any_nonzero_is_retryable_without_list() {
    assert!(classify_exit(Some(1), &[]).is_retry());
    assert!(classify_exit(Some(75), &[]).is_retry());
    assert!(classify_exit(None, &[]).is_retry());
}

#[test]
fn classify_only_listed_codes_are_retryable() {
    let listed = [75, 111];
    assert!(classify_exit(Some(75), &listed).is_retry());
    assert!(classify_exit(Some(111), &listed).is_retry());

    let stop = classify_exit(Some(2), &listed);
    assert!(!stop.is_retry() && !stop.is_success());
    assert_eq!(
        stop.cause().map(|e| e.to_string()).as_deref(),
        Some("command exited with code 2")
    );
    assert!(!classify_exit(None, &listed).is_retry());
}

#[tokio::test]
async fn interrupt_listener_is_aborted_without_cancelling() {
    let signal = CancelSignal::new();
    let handle = spawn_interrupt_listener(signal.clone());
    handle.abort();
    let err = handle.await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(!signal.is_fired());
}
