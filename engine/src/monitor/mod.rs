//! State-condition monitors (spec.md §4.4). Each variant races
//! independently against a `stop` signal, emits at most one verdict on the
//! shared `results` channel, and never sends after observing `stop`.
//!
//! Reimplemented per spec.md §9 "Polymorphic state conditions" as a closed
//! set of free functions/structs rather than a shared base `Handle` type —
//! the Exit monitor needs a process handle, Output is driven externally by
//! the multiplexer, File and Timeout are self-contained, so each gets the
//! arguments it actually needs instead of a uniform signature.

pub mod exit;
pub mod file;
pub mod output;
pub mod timeout;

use shared::Error;
use tokio::sync::{broadcast, mpsc};

/// `Ok(())` is a success verdict; `Err(e)` is a failure verdict.
pub type Verdict = Result<(), Error>;

pub type ResultsSender = mpsc::Sender<Verdict>;
pub type StopSender = broadcast::Sender<()>;
pub type StopSignal = broadcast::Receiver<()>;

/// Builds the shared `stop` channel for a container's race, sized to the
/// monitor count per spec.md §5. Every monitor (and the output
/// multiplexer's two readers) subscribes its own receiver via
/// `sender.subscribe()`.
pub fn stop_channel(count: usize) -> StopSender {
    let (tx, _rx) = broadcast::channel(count.max(1));
    tx
}

/// Posts one cancellation signal per monitor, matching spec.md §5's "posts
/// `count` cancellation signals on stop" — broadcast delivers each send to
/// every live subscriber, so in practice the first send already reaches
/// everyone, but the loop preserves the described one-slot-per-monitor
/// shape and never blocks regardless of how many subscribers remain.
pub fn cancel_all(stop: &StopSender, count: usize) {
    for _ in 0..count {
        let _ = stop.send(());
    }
}
