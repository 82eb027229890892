//! OutputMonitor (spec.md §4.4): passive. Unlike the other three, it never
//! runs as its own task — the output multiplexer (§4.3) calls `check` on
//! each line of the stream it watches, and the first match yields a
//! verdict.

use regex::Regex;
use shared::model::{OutputSource, Status};
use shared::Error;

use crate::monitor::Verdict;

#[derive(Debug, Clone)]
pub struct OutputMonitor {
    pub source: OutputSource,
    pub regex: Regex,
    pub status: Status,
}

impl OutputMonitor {
    /// Returns `Some(verdict)` the first time a line on `source` matches;
    /// `None` otherwise (wrong stream, or no match).
    pub fn check(&self, source: OutputSource, line: &str) -> Option<Verdict> {
        if source != self.source || !self.regex.is_match(line) {
            return None;
        }
        Some(match self.status {
            Status::Success => Ok(()),
            Status::Failure => Err(Error::MonitorFailure(format!(
                "output line matched {}: {}",
                self.regex, line
            ))),
        })
    }
}
