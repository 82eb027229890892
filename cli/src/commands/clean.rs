//! `clean`: stop and remove every container belonging to a project
//! (spec.md §6 `clean` subcommand).

use clap::Parser;
use engine::runtime::docker::DockerRuntime;
use engine::runtime::Runtime;
use shared::Error;

use crate::config::Config;

#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Project name used to find the project's containers
    #[clap(long)]
    pub project: Option<String>,
}

pub async fn handle(config: &Config, args: &CleanArgs) -> Result<(), Error> {
    let project_name = args.project.clone().unwrap_or_else(|| config.project_name.clone());
    let runtime = DockerRuntime::connect(&config.runtime_bin)?;

    let pods = runtime.list_pods(&project_name).await?;
    for app_name in pods.keys() {
        tracing::info!(app_name, "stopping");
        runtime.stop(app_name).await?;
        tracing::info!(app_name, "removing");
        runtime.remove(app_name).await?;
    }
    Ok(())
}
