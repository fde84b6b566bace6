//! Cancellable sleep used between attempts.

use std::time::Duration;

use super::cancel::CancelSignal;

/// Sleep for `duration` or until `signal` fires, whichever comes first.
///
/// Returns without error either way; callers check `signal` afterwards to
/// tell the two apart.
pub async fn sleep(signal: &CancelSignal, duration: Duration) {
    if duration.is_zero() {
        return;
    }
    tokio::select! {
        _ = signal.fired() => {}
        _ = tokio::time::sleep(duration) => {}
    }
}
