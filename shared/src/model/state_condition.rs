use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Which side of a verdict a monitor's match counts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

/// Which output stream an `OutputCondition` watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSource {
    Stdout,
    Stderr,
}

/// Container exits with one of `codes`; resolves to `status`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExitCondition {
    pub codes: HashSet<i32>,
    pub status: Status,
}

/// Container has run for `duration_seconds` without an earlier condition firing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutCondition {
    pub duration_seconds: u64,
    pub status: Status,
}

/// A line written to `file` matches `regex`; resolves to `status`.
///
/// `file` is a container-internal path; the engine rewrites it to a host
/// path by matching it against the container's mounts before watching it
/// (spec.md §4, "file monitors resolve through mounts").
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileMonitorCondition {
    pub file: String,
    pub regex: String,
    pub status: Status,
}

/// A line written to stdout/stderr matches `regex`; resolves to `status`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputCondition {
    pub source: OutputSource,
    pub regex: String,
    pub status: Status,
}

/// The composite set of state conditions raced against a single container.
///
/// `count()` is the number of monitors the engine must spawn and is also
/// the capacity of the per-launch stop/results channels (spec.md §4).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StateConditions {
    #[serde(default)]
    pub exit: Option<ExitCondition>,
    #[serde(default)]
    pub timeout: Option<TimeoutCondition>,
    #[serde(rename = "filemonitor", default)]
    pub file_monitors: Vec<FileMonitorCondition>,
    #[serde(rename = "output", default)]
    pub outputs: Vec<OutputCondition>,
}

impl StateConditions {
    pub fn count(&self) -> usize {
        self.exit.is_some() as usize
            + self.timeout.is_some() as usize
            + self.file_monitors.len()
            + self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}
