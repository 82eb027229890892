//! The abstract Runtime collaborator (spec.md §4.2) the launch engine is
//! built against, plus a concrete implementation backed by Docker.
//!
//! The trait mirrors the teacher's `DockerClient` split: a narrow interface
//! the engine depends on, and a struct implementing it that owns the real
//! client handle. Unlike the teacher, `spawn` does not map onto a single
//! Engine-API call — spec.md §4.5 models a runtime CLI invoked with a flat
//! argv, so the Docker-backed implementation shells out to a configurable
//! runtime binary for that operation while still using bollard's HTTP API
//! for image/pod bookkeeping.

pub mod docker;

use async_trait::async_trait;
use shared::Error;

/// A running pod as reported by the runtime (spec.md §4.2).
#[derive(Debug, Clone)]
pub struct Pod {
    pub state: PodState,
    pub app_names: Vec<String>,
    pub networks: Vec<PodNetwork>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodState {
    Running,
    Exited,
    Other,
}

#[derive(Debug, Clone)]
pub struct PodNetwork {
    pub ip: String,
}

/// A handle to a spawned container process (spec.md §4.2).
#[async_trait]
pub trait ProcessHandle: Send {
    /// Takes ownership of the stdout reader; callable once.
    fn stdout(&mut self) -> Box<dyn tokio::io::AsyncRead + Send + Unpin>;
    /// Takes ownership of the stderr reader; callable once.
    fn stderr(&mut self) -> Box<dyn tokio::io::AsyncRead + Send + Unpin>;
    /// Blocks until the process exits, returning its exit code.
    async fn wait(&mut self) -> Result<i32, Error>;
    /// Forcibly terminates the process.
    async fn kill(&mut self) -> Result<(), Error>;
}

#[async_trait]
pub trait Runtime: Send + Sync {
    /// Pulls `image` if not already local; idempotent. Returns the resolved
    /// image hash/digest.
    async fn fetch(&self, image: &str) -> Result<String, Error>;

    /// Reads the already-local manifest for `image_hash`, returning the
    /// ports the image declares.
    async fn image_manifest(&self, image_hash: &str) -> Result<Vec<shared::model::Port>, Error>;

    /// Lists pods whose app name starts with `project_prefix`.
    async fn list_pods(
        &self,
        project_prefix: &str,
    ) -> Result<std::collections::HashMap<String, Pod>, Error>;

    /// Spawns a process with the given argv, returning a handle.
    async fn spawn(&self, args: &[String]) -> Result<Box<dyn ProcessHandle>, Error>;

    /// Stops the pod known by `app_name`.
    async fn stop(&self, app_name: &str) -> Result<(), Error>;

    /// Removes the pod known by `app_name`.
    async fn remove(&self, app_name: &str) -> Result<(), Error>;
}
