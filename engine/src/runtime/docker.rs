//! Docker-backed `Runtime` implementation.
//!
//! Image pull/inspect/list/stop/remove go through bollard's Engine API,
//! mirrored directly from the teacher's `DockerManager`
//! (`ensure_image`/`get_container_status`/`stop_pod`/`remove_container` in
//! `node/src/docker/manager.rs`). `spawn` has no Engine-API equivalent for
//! this system's argv-based invocation model (spec.md §4.5), so it shells
//! out to a configurable runtime binary via `tokio::process::Command`
//! instead, in the style of a CLI wrapper rather than an API client.

use std::collections::HashMap;
use std::process::Stdio;

use async_trait::async_trait;
use bollard::query_parameters::{
    CreateImageOptions, InspectContainerOptions, ListContainersOptions, RemoveContainerOptions,
    StopContainerOptions,
};
use bollard::Docker;
use dashmap::DashSet;
use futures_util::stream::TryStreamExt;
use shared::model::Port;
use shared::Error;
use tokio::process::Command;

use crate::runtime::{Pod, PodNetwork, PodState, ProcessHandle, Runtime};

/// Tracks pulled images and owns the bollard client handle, plus the path
/// to the runtime CLI binary used for `spawn`.
#[derive(Debug)]
pub struct DockerRuntime {
    images: DashSet<String>,
    client: Docker,
    runtime_bin: String,
}

impl DockerRuntime {
    pub fn connect(runtime_bin: impl Into<String>) -> Result<Self, Error> {
        let client = Docker::connect_with_local_defaults()
            .map_err(|e| Error::Runtime(format!("connecting to docker: {}", e)))?;
        Ok(DockerRuntime {
            images: DashSet::new(),
            client,
            runtime_bin: runtime_bin.into(),
        })
    }

    fn client(&self) -> Docker {
        self.client.clone()
    }
}

#[async_trait]
impl Runtime for DockerRuntime {
    async fn fetch(&self, image: &str) -> Result<String, Error> {
        if !self.images.contains(image) {
            let docker = self.client();
            let options = Some(CreateImageOptions {
                from_image: Some(image.to_string()),
                ..Default::default()
            });
            let mut stream = docker.create_image(options, None, None);

            tracing::debug!(%image, "pulling image");
            while stream
                .try_next()
                .await
                .map_err(|e| Error::Image(format!("pulling {}: {}", image, e)))?
                .is_some()
            {}

            self.images.insert(image.to_string());
        }

        let inspect = self
            .client()
            .inspect_image(image)
            .await
            .map_err(|e| Error::Image(format!("inspecting {}: {}", image, e)))?;

        Ok(inspect.id.unwrap_or_else(|| image.to_string()))
    }

    async fn image_manifest(&self, image_hash: &str) -> Result<Vec<Port>, Error> {
        let inspect = self
            .client()
            .inspect_image(image_hash)
            .await
            .map_err(|e| Error::Image(format!("reading manifest for {}: {}", image_hash, e)))?;

        let exposed = inspect
            .config
            .and_then(|c| c.exposed_ports)
            .unwrap_or_default();

        let mut ports = Vec::with_capacity(exposed.len());
        for spec in exposed.keys() {
            let (port_str, protocol) = spec.split_once('/').unwrap_or((spec.as_str(), "tcp"));
            let container_port: u16 = port_str
                .parse()
                .map_err(|_| Error::Image(format!("malformed exposed port \"{}\"", spec)))?;
            ports.push(Port {
                name: spec.clone(),
                protocol: protocol.to_string(),
                container_port,
                host_port: None,
            });
        }
        Ok(ports)
    }

    async fn list_pods(&self, project_prefix: &str) -> Result<HashMap<String, Pod>, Error> {
        let docker = self.client();
        let mut filters = HashMap::new();
        filters.insert("name".to_string(), vec![project_prefix.to_string()]);

        let containers = docker
            .list_containers(Some(ListContainersOptions {
                all: true,
                filters: Some(filters),
                ..Default::default()
            }))
            .await
            .map_err(|e| Error::Runtime(format!("listing pods: {}", e)))?;

        let mut pods = HashMap::new();
        for summary in containers {
            let app_name = summary
                .names
                .as_ref()
                .and_then(|n| n.first())
                .map(|n| n.trim_start_matches('/').to_string())
                .unwrap_or_default();
            if app_name.is_empty() {
                continue;
            }

            let state = match summary.state.as_deref() {
                Some("running") => PodState::Running,
                Some("exited") => PodState::Exited,
                _ => PodState::Other,
            };

            let networks = summary
                .network_settings
                .and_then(|settings| settings.networks)
                .map(|nets| {
                    nets.into_values()
                        .filter_map(|n| n.ip_address)
                        .filter(|ip| !ip.is_empty())
                        .map(|ip| PodNetwork { ip })
                        .collect()
                })
                .unwrap_or_default();

            pods.insert(
                app_name.clone(),
                Pod {
                    state,
                    app_names: vec![app_name],
                    networks,
                },
            );
        }
        Ok(pods)
    }

    async fn spawn(&self, args: &[String]) -> Result<Box<dyn ProcessHandle>, Error> {
        // No `.kill_on_drop(true)`: a launched container must survive past its
        // `ProcessHandle` (and the exit monitor holding it) being dropped,
        // whether the launch succeeded (spec.md §4.5 step 5 "leaks the child
        // into the runtime's pod set by design") or failed (the child is left
        // running for inspection until the operator runs `clean`).
        let child = Command::new(&self.runtime_bin)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Runtime(format!("spawning {}: {}", self.runtime_bin, e)))?;

        Ok(Box::new(ChildProcessHandle::new(child)))
    }

    async fn stop(&self, app_name: &str) -> Result<(), Error> {
        self.client()
            .stop_container(app_name, None::<StopContainerOptions>)
            .await
            .map_err(|e| Error::Runtime(format!("stopping {}: {}", app_name, e)))
    }

    async fn remove(&self, app_name: &str) -> Result<(), Error> {
        self.client()
            .remove_container(app_name, None::<RemoveContainerOptions>)
            .await
            .map_err(|e| Error::Runtime(format!("removing {}: {}", app_name, e)))
    }
}

/// Kept for parity with teacher status-reading helpers, unused by the
/// launch engine (which relies on `list_pods` instead) but handy for
/// diagnostics.
#[allow(dead_code)]
async fn inspect_state(docker: &Docker, id: &str) -> Result<String, Error> {
    let inspection = docker
        .inspect_container(id, None::<InspectContainerOptions>)
        .await
        .map_err(|e| Error::Runtime(format!("inspecting {}: {}", id, e)))?;
    Ok(inspection
        .state
        .and_then(|s| s.status)
        .map(|s| s.to_string())
        .unwrap_or_default())
}

struct ChildProcessHandle {
    child: tokio::process::Child,
    stdout: Option<tokio::process::ChildStdout>,
    stderr: Option<tokio::process::ChildStderr>,
}

impl ChildProcessHandle {
    fn new(mut child: tokio::process::Child) -> Self {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        ChildProcessHandle {
            child,
            stdout,
            stderr,
        }
    }
}

#[async_trait]
impl ProcessHandle for ChildProcessHandle {
    fn stdout(&mut self) -> Box<dyn tokio::io::AsyncRead + Send + Unpin> {
        Box::new(self.stdout.take().expect("stdout taken twice"))
    }

    fn stderr(&mut self) -> Box<dyn tokio::io::AsyncRead + Send + Unpin> {
        Box::new(self.stderr.take().expect("stderr taken twice"))
    }

    async fn wait(&mut self) -> Result<i32, Error> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| Error::Runtime(format!("waiting on process: {}", e)))?;
        Ok(status.code().unwrap_or(-1))
    }

    async fn kill(&mut self) -> Result<(), Error> {
        self.child
            .kill()
            .await
            .map_err(|e| Error::Runtime(format!("killing process: {}", e)))
    }
}
