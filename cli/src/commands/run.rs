//! `run`: resolve the config and launch every container in dependency
//! order (spec.md §6 `run` subcommand).

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use engine::config::LoadOptions;
use engine::launch::LaunchContext;
use engine::runtime::docker::DockerRuntime;
use shared::Error;

use crate::config::Config;

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the constellation file
    #[clap(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Project name used to prefix every container's app name
    #[clap(long)]
    pub project: Option<String>,

    /// Directory holding generated network configs
    #[clap(long)]
    pub net_config_path: Option<PathBuf>,

    /// Extra directory searched when resolving `require` entries; repeatable
    #[clap(long = "include-dir")]
    pub include_dirs: Vec<PathBuf>,

    /// `<name>:<source>:<version>`-style image override; repeatable
    #[clap(long = "image")]
    pub image_overrides: Vec<String>,

    /// `<name>:<path>`-style volume path override; repeatable
    #[clap(long = "volume")]
    pub volume_overrides: Vec<String>,

    /// `<ip>=<name>`-style global hosts entry; repeatable
    #[clap(long = "hosts-entry")]
    pub hosts_entries: Vec<String>,
}

pub async fn handle(config: &Config, args: &RunArgs) -> Result<(), Error> {
    let opts = LoadOptions {
        constellation_file: args.file.clone().unwrap_or_else(|| config.constellation_file.clone()),
        include_dirs: merged(&config.include_dirs, &args.include_dirs),
        image_overrides: merged_strings(&config.image_overrides, &args.image_overrides),
        volume_overrides: merged_strings(&config.volume_overrides, &args.volume_overrides),
        hosts_entries: merged_strings(&config.hosts_entries, &args.hosts_entries),
    };

    let resolved = engine::config::load(&opts).await?;
    let order = engine::resolver::topological_order(&resolved.containers)?;

    let project_name = args.project.clone().unwrap_or_else(|| config.project_name.clone());
    let net_config_path = args
        .net_config_path
        .clone()
        .unwrap_or_else(|| config.net_config_path.clone());

    let runtime = DockerRuntime::connect(&config.runtime_bin)?;
    let ctx = LaunchContext {
        project_name,
        net_config_path,
        containers: resolved.containers,
        volumes: resolved.volumes,
        hosts_entries: resolved.hosts_entries,
        runtime: Arc::new(runtime),
    };

    engine::launch::launch_all(&ctx, &order).await
}

fn merged(base: &[PathBuf], extra: &[PathBuf]) -> Vec<PathBuf> {
    base.iter().cloned().chain(extra.iter().cloned()).collect()
}

fn merged_strings(base: &[String], extra: &[String]) -> Vec<String> {
    base.iter().cloned().chain(extra.iter().cloned()).collect()
}
