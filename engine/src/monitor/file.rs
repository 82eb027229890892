//! FileMonitor (spec.md §4.4): tails `file` from its current end-of-file,
//! tolerating absence at start and reopening across truncation/rotation.
//!
//! No inotify-style crate sits in the teacher's dependency stack, so
//! tailing polls on a short interval rather than watching for OS-level
//! change events — adequate for line-regex matching, and spec.md's
//! Non-goals exclude demanding low-latency file watching.

use std::io::SeekFrom;
use std::time::Duration;

use regex::Regex;
use shared::model::Status;
use shared::Error;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::monitor::{ResultsSender, StopSignal, Verdict};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub async fn run(
    path: String,
    regex: Regex,
    status: Status,
    results: ResultsSender,
    mut stop: StopSignal,
) {
    let mut offset: u64 = 0;
    let mut seen_initial = false;
    let mut pending = String::new();

    loop {
        tokio::select! {
            _ = stop.recv() => return,
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }

        let mut file = match tokio::fs::File::open(&path).await {
            Ok(f) => f,
            Err(_) => continue,
        };
        let len = match file.metadata().await {
            Ok(m) => m.len(),
            Err(_) => continue,
        };

        if !seen_initial {
            offset = len;
            seen_initial = true;
            continue;
        }

        if len < offset {
            offset = 0;
            pending.clear();
        }
        if len == offset {
            continue;
        }

        if file.seek(SeekFrom::Start(offset)).await.is_err() {
            continue;
        }
        let mut buf = Vec::new();
        if file.read_to_end(&mut buf).await.is_err() {
            continue;
        }
        offset += buf.len() as u64;
        pending.push_str(&String::from_utf8_lossy(&buf));

        while let Some(idx) = pending.find('\n') {
            let line: String = pending.drain(..=idx).collect();
            let text = line.trim_end_matches(['\n', '\r']);
            if regex.is_match(text) {
                let verdict: Verdict = match status {
                    Status::Success => Ok(()),
                    Status::Failure => Err(Error::MonitorFailure(format!(
                        "file {} line matched {}: {}",
                        path, regex, text
                    ))),
                };
                let _ = results.send(verdict).await;
                return;
            }
        }
    }
}
