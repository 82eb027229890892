//! TimeoutMonitor (spec.md §4.4): sleeps for `duration_seconds`, then
//! resolves via `status`. Exits silently if `stop` fires first.

use std::time::Duration;

use shared::model::Status;
use shared::Error;

use crate::monitor::{ResultsSender, StopSignal, Verdict};

pub async fn run(
    duration_seconds: u64,
    status: Status,
    results: ResultsSender,
    mut stop: StopSignal,
) {
    let verdict: Verdict = tokio::select! {
        _ = stop.recv() => return,
        _ = tokio::time::sleep(Duration::from_secs(duration_seconds)) => match status {
            Status::Success => Ok(()),
            Status::Failure => Err(Error::MonitorFailure(format!(
                "timeout of {}s elapsed", duration_seconds
            ))),
        },
    };

    let _ = results.send(verdict).await;
}
