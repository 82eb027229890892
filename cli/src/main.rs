use clap::{Parser, Subcommand};

mod commands;
mod config;

/// Launches and manages a constellation of dependency-ordered containers.
#[derive(Parser, Debug)]
#[command(name = "constellationctl", version, about, long_about = None)]
struct ConstellationCtl {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the config and launch every container in dependency order
    Run(commands::run::RunArgs),
    /// Stop every running container belonging to a project
    Stop(commands::stop::StopArgs),
    /// Stop and remove every container belonging to a project
    Clean(commands::clean::CleanArgs),
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = ConstellationCtl::parse();
    let config = config::Config::from_env();

    let result = match cli.command {
        Commands::Run(args) => commands::run::handle(&config, &args).await,
        Commands::Stop(args) => commands::stop::handle(&config, &args).await,
        Commands::Clean(args) => commands::clean::handle(&config, &args).await,
    };

    if let Err(err) = result {
        tracing::error!(error = %err, "command failed");
        std::process::exit(1);
    }
}
