//! Output multiplexer (spec.md §4.3): reads a container's stdout/stderr
//! line-by-line, logs each line tagged with the container's color, and
//! feeds matching lines to any attached `OutputMonitor`s.
//!
//! Each stream gets its own task (spec.md §5); both share the same
//! `stop` subscription and `results` sender as the container's other
//! monitors. Once cancellation is observed, monitors are dropped but the
//! stream keeps draining to the user log until EOF, so the user still
//! sees the process's final output (spec.md §4.3 step 4).

use owo_colors::AnsiColors;
use shared::model::OutputSource;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::color::tag_line;
use crate::monitor::output::OutputMonitor;
use crate::monitor::{ResultsSender, StopSignal};

pub async fn run_stream<R>(
    source: OutputSource,
    reader: R,
    name: String,
    color: AnsiColors,
    monitors: Vec<OutputMonitor>,
    mut stop: StopSignal,
    results: ResultsSender,
) where
    R: AsyncRead + Unpin + Send,
{
    let mut lines = BufReader::new(reader).lines();
    let mut cancelled = monitors.is_empty();

    loop {
        let line = if cancelled {
            match lines.next_line().await {
                Ok(Some(line)) => line,
                _ => break,
            }
        } else {
            tokio::select! {
                result = lines.next_line() => match result {
                    Ok(Some(line)) => line,
                    _ => break,
                },
                _ = stop.recv() => {
                    cancelled = true;
                    continue;
                }
            }
        };

        tracing::info!("{}", tag_line(&name, color, &line));

        if !cancelled {
            for monitor in &monitors {
                if let Some(verdict) = monitor.check(source, &line) {
                    let _ = results.send(verdict).await;
                    cancelled = true;
                    break;
                }
            }
        }
    }
}
