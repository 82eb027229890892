//! `stop`: stop every running container belonging to a project, without
//! removing it (spec.md §6 `stop` subcommand).

use clap::Parser;
use engine::runtime::docker::DockerRuntime;
use engine::runtime::Runtime;
use shared::Error;

use crate::config::Config;

#[derive(Parser, Debug)]
pub struct StopArgs {
    /// Project name used to find the project's containers
    #[clap(long)]
    pub project: Option<String>,
}

pub async fn handle(config: &Config, args: &StopArgs) -> Result<(), Error> {
    let project_name = args.project.clone().unwrap_or_else(|| config.project_name.clone());
    let runtime = DockerRuntime::connect(&config.runtime_bin)?;

    let pods = runtime.list_pods(&project_name).await?;
    for app_name in pods.keys() {
        tracing::info!(app_name, "stopping");
        runtime.stop(app_name).await?;
    }
    Ok(())
}
