//! Unified error type for the constellation launch engine.
//!
//! Mirrors the teacher's `DockerError` idiom (plain enum, hand-written
//! `Display`, string payloads produced at the call site) rather than pulling
//! in `thiserror` — the teacher never reaches for it, so neither do we.

use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// Malformed YAML, unknown stanza, type mismatch, missing required field.
    Config(String),
    /// An unknown container/volume/mount target was referenced.
    Reference { from: String, to: String },
    /// A dependency cycle was detected; names at least one offending node.
    Cycle { members: Vec<String> },
    /// Image fetch or manifest retrieval failed.
    Image(String),
    /// Spawn / pod-list / stop / remove failure at the runtime adapter.
    Runtime(String),
    /// A state-condition monitor produced a non-nil verdict.
    MonitorFailure(String),
    /// A required dependency pod is not running and was not allowed to exit.
    MissingDependency { container: String, dependency: String },
    /// File, pipe, or socket failure.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "config error: {}", msg),
            Error::Reference { from, to } => {
                write!(f, "{} references {} which does not exist", from, to)
            }
            Error::Cycle { members } => {
                write!(f, "dependency cycle detected, involving: {}", members.join(", "))
            }
            Error::Image(msg) => write!(f, "image error: {}", msg),
            Error::Runtime(msg) => write!(f, "runtime error: {}", msg),
            Error::MonitorFailure(msg) => write!(f, "monitor failure: {}", msg),
            Error::MissingDependency { container, dependency } => write!(
                f,
                "{} requires {} to be running, but it is not and was not allowed to exit",
                container, dependency
            ),
            Error::Io(msg) => write!(f, "io error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
