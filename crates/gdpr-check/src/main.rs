mod cli;
mod state;

use anyhow::Result;
use clap::Parser;
use gdpr_check_core::client::HttpComplianceApi;

use crate::cli::{Cli, Commands};
use crate::state::StateFile;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = match cli.state {
        Some(path) => StateFile::new(path),
        None => StateFile::default_location()?,
    };

    dispatch(cli.command, &cli.api_url, &store, cli.json).await
}

async fn dispatch(command: Commands, api_url: &str, store: &StateFile, json: bool) -> Result<()> {
    if matches!(command, Commands::Reset) {
        return cli::reset::run(store);
    }

    let api = HttpComplianceApi::new(api_url)?;
    match command {
        Commands::Check { file } => cli::check::run(&api, store, &file, json).await,
        Commands::Resume => cli::resume::run(&api, store, json).await,
        Commands::Health => cli::health::run(&api).await,
        Commands::Models => cli::models::run(&api).await,
        Commands::Reset => cli::reset::run(store),
    }
}
