//! ExitMonitor (spec.md §4.4): blocks on the process's `wait()`. A code
//! present in `codes` resolves directly via `status`; a code absent from
//! `codes` resolves to the *opposite* of `status`.

use std::collections::HashSet;

use shared::model::Status;
use shared::Error;

use crate::monitor::{ResultsSender, StopSignal, Verdict};
use crate::runtime::ProcessHandle;

/// Installed when a container declares no `Exit` condition. -1 never
/// occurs as a real exit code, so every real exit is "absent from codes"
/// and resolves to the complement of `Status::Success`, i.e. failure.
pub fn default_codes() -> HashSet<i32> {
    HashSet::from([-1])
}

pub async fn run(
    mut process: Box<dyn ProcessHandle>,
    codes: HashSet<i32>,
    status: Status,
    results: ResultsSender,
    mut stop: StopSignal,
) {
    let verdict: Verdict = tokio::select! {
        _ = stop.recv() => return,
        outcome = process.wait() => match outcome {
            Ok(code) => {
                let in_set = codes.contains(&code);
                let success = if in_set { status == Status::Success } else { status != Status::Success };
                if success {
                    Ok(())
                } else {
                    Err(Error::MonitorFailure(format!("exit code {} triggered failure", code)))
                }
            }
            Err(e) => Err(Error::MonitorFailure(format!("waiting for exit: {}", e))),
        },
    };

    let _ = results.send(verdict).await;
}
