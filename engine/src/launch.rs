//! The launch engine (spec.md §4.5): for each container in topological
//! order, resolves dependency IPs, assembles the runtime invocation,
//! spawns the process, attaches monitors, and races them to a verdict.
//!
//! Argv layout and the two `--hosts-entry` formats (two tokens for
//! globally-configured entries, one `--hosts-entry=IP=NAME` token for
//! dependency-chain entries) are carried verbatim from
//! `examples/original_source/container/container.go`'s `getCommandLine`
//! and `GetDepChainIPs`, per SPEC_FULL.md's supplemented-features list.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use regex::Regex;
use shared::model::{Container, HostsEntry, Status, Volume};
use shared::Error;

use crate::color::ColorPicker;
use crate::config;
use crate::monitor::{self, output::OutputMonitor};
use crate::multiplexer;
use crate::runtime::{self, Runtime};

/// Everything the launch engine needs that outlives a single container's
/// race: the project identity, the fully-resolved config, and the runtime
/// collaborator.
pub struct LaunchContext {
    pub project_name: String,
    pub net_config_path: PathBuf,
    pub containers: HashMap<String, Container>,
    pub volumes: HashMap<String, Volume>,
    pub hosts_entries: Vec<HostsEntry>,
    pub runtime: Arc<dyn Runtime>,
}

/// Strips everything but ASCII alphanumerics, per spec.md §6's
/// `[^A-Za-z0-9]+ -> ""` app-name rule.
pub fn app_name(project: &str, container_name: &str) -> String {
    let sanitized: String = container_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    format!("{}-{}", project, sanitized)
}

/// Launches every container in `order`, stopping at (and surfacing) the
/// first failing verdict. Already-launched containers are left running
/// (spec.md §4.5 step 5 — teardown is the operator's job via `clean`).
pub async fn launch_all(ctx: &LaunchContext, order: &[String]) -> Result<(), Error> {
    for volume in ctx.volumes.values() {
        volume.create_dir()?;
    }

    let mut colors = ColorPicker::new();
    for name in order {
        let container = ctx.containers.get(name).expect("order only lists known containers");
        let color = colors.next_color();
        launch_one(ctx, container, color).await?;
    }
    Ok(())
}

async fn launch_one(
    ctx: &LaunchContext,
    container: &Container,
    color: owo_colors::AnsiColors,
) -> Result<(), Error> {
    let name = app_name(&ctx.project_name, &container.name);
    let pods = ctx.runtime.list_pods(&ctx.project_name).await?;

    if let Some(pod) = pods.get(&name) {
        if pod.state == runtime::PodState::Running {
            tracing::info!(container = %container.name, app_name = %name, "reusing already running container");
            return Ok(());
        }
    }

    let dep_ips = dependency_chain_ips(container, &ctx.containers, &pods, &ctx.project_name)?;

    let image_hash = ctx.runtime.fetch(&container.image).await?;
    let mut ports = ctx.runtime.image_manifest(&image_hash).await?;
    for port in &mut ports {
        port.host_port = Some(crate::port::allocate(&port.protocol).await?);
    }

    let argv = assemble_argv(ctx, container, &name, &ports, &dep_ips)?;

    tracing::info!(container = %container.name, app_name = %name, "starting");
    let mut process = ctx.runtime.spawn(&argv).await?;
    let stdout = process.stdout();
    let stderr = process.stderr();

    let monitor_count = 1
        + container.state_conditions.timeout.is_some() as usize
        + container.state_conditions.file_monitors.len()
        + container.state_conditions.outputs.len();

    let stop = monitor::stop_channel(monitor_count);
    let (results_tx, mut results_rx) =
        tokio::sync::mpsc::channel::<monitor::Verdict>(monitor_count.max(1));

    let mut stdout_monitors = Vec::new();
    let mut stderr_monitors = Vec::new();
    for output in &container.state_conditions.outputs {
        let regex = Regex::new(&output.regex)
            .map_err(|e| Error::Config(format!("invalid output regex \"{}\": {}", output.regex, e)))?;
        let monitor = OutputMonitor {
            source: output.source,
            regex,
            status: output.status,
        };
        match output.source {
            shared::model::OutputSource::Stdout => stdout_monitors.push(monitor),
            shared::model::OutputSource::Stderr => stderr_monitors.push(monitor),
        }
    }

    tokio::spawn(multiplexer::run_stream(
        shared::model::OutputSource::Stdout,
        stdout,
        container.name.clone(),
        color,
        stdout_monitors,
        stop.subscribe(),
        results_tx.clone(),
    ));
    tokio::spawn(multiplexer::run_stream(
        shared::model::OutputSource::Stderr,
        stderr,
        container.name.clone(),
        color,
        stderr_monitors,
        stop.subscribe(),
        results_tx.clone(),
    ));

    let (codes, status) = match &container.state_conditions.exit {
        Some(exit) => (exit.codes.clone(), exit.status),
        None => (monitor::exit::default_codes(), Status::Success),
    };
    tokio::spawn(monitor::exit::run(
        process,
        codes,
        status,
        results_tx.clone(),
        stop.subscribe(),
    ));

    if let Some(timeout) = &container.state_conditions.timeout {
        tokio::spawn(monitor::timeout::run(
            timeout.duration_seconds,
            timeout.status,
            results_tx.clone(),
            stop.subscribe(),
        ));
    }

    for file_monitor in &container.state_conditions.file_monitors {
        let host_path = config::resolve_file_monitor_path(container, &ctx.volumes, &file_monitor.file)?;
        let regex = Regex::new(&file_monitor.regex).map_err(|e| {
            Error::Config(format!("invalid file monitor regex \"{}\": {}", file_monitor.regex, e))
        })?;
        tokio::spawn(monitor::file::run(
            host_path.to_string_lossy().to_string(),
            regex,
            file_monitor.status,
            results_tx.clone(),
            stop.subscribe(),
        ));
    }

    drop(results_tx);

    let verdict = results_rx
        .recv()
        .await
        .ok_or_else(|| Error::MonitorFailure("no monitor produced a verdict".to_string()))?;

    monitor::cancel_all(&stop, monitor_count);

    verdict
}

/// Walks the dependency subgraph rooted at `container` depth-first,
/// deduplicating by name (first occurrence wins), collecting every
/// running dependency's network IPs and failing on a missing one that
/// wasn't allowed to exit (spec.md §4.5 step 3).
fn dependency_chain_ips(
    container: &Container,
    containers: &HashMap<String, Container>,
    pods: &HashMap<String, runtime::Pod>,
    project_name: &str,
) -> Result<Vec<(String, String)>, Error> {
    let mut visited = HashSet::new();
    let mut result = Vec::new();
    let mut stack: Vec<String> = container.depends_on.clone();

    while let Some(name) = stack.pop() {
        if !visited.insert(name.clone()) {
            continue;
        }

        let dep = containers.get(&name).ok_or_else(|| Error::Reference {
            from: container.name.clone(),
            to: name.clone(),
        })?;

        let dep_app_name = app_name(project_name, &name);
        match pods.get(&dep_app_name) {
            Some(pod) if pod.state == runtime::PodState::Running => {
                for network in &pod.networks {
                    result.push((name.clone(), network.ip.clone()));
                }
            }
            _ => {
                let allowed_absent = dep
                    .state_conditions
                    .exit
                    .as_ref()
                    .map(|exit| exit.status == Status::Success)
                    .unwrap_or(false);
                if !allowed_absent {
                    return Err(Error::MissingDependency {
                        container: container.name.clone(),
                        dependency: name.clone(),
                    });
                }
                tracing::info!(dependency = %name, "dependency not running but allowed to exit, skipping");
            }
        }

        stack.extend(dep.depends_on.iter().cloned());
    }

    Ok(result)
}

fn assemble_argv(
    ctx: &LaunchContext,
    container: &Container,
    app_name: &str,
    ports: &[shared::model::Port],
    dep_ips: &[(String, String)],
) -> Result<Vec<String>, Error> {
    let mut argv = vec![
        format!("--local-config={}", ctx.net_config_path.display()),
        "--dns=host".to_string(),
    ];

    for volume in ctx.volumes.values() {
        argv.push("--volume".to_string());
        argv.push(format!("{},kind={},source={}", volume.name, volume.kind, volume.path));
    }

    for entry in &ctx.hosts_entries {
        argv.push("--hosts-entry".to_string());
        argv.push(format!("{}={}", entry.ip, entry.name));
    }

    for port in ports {
        let host_port = port
            .host_port
            .ok_or_else(|| Error::Io(format!("port {} was not allocated a host port", port.name)))?;
        argv.push("--port".to_string());
        argv.push(format!("{}:{}", port.name, host_port));
    }

    argv.push(container.image.clone());
    argv.push(format!("--hostname={}", container.name));

    for (key, value) in &container.environment {
        argv.push(format!("--environment={}={}", key, value));
    }

    for mount in &container.mounts {
        argv.push("--mount".to_string());
        argv.push(format!("volume={},target={}", mount.volume, mount.path));
    }

    for (name, ip) in dep_ips {
        argv.push(format!("--hosts-entry={}={}", ip, name));
    }

    argv.push(format!("--name={}", app_name));

    if let Some(exec) = &container.exec {
        let tokens = shell_words::split(exec)
            .map_err(|e| Error::Config(format!("splitting exec \"{}\": {}", exec, e)))?;
        if !tokens.is_empty() {
            argv.push("--exec".to_string());
            argv.push(tokens[0].clone());
            if tokens.len() > 1 {
                argv.push("--".to_string());
                argv.extend(tokens[1..].iter().cloned());
            }
        }
    }

    Ok(argv)
}
