//! # Transmission RPC command line client
//!
//! ## Usage
//!
//! ```sh,ignore
//! TRANSMISSION_RPC_USERNAME=seeder transmission-rpc --url http://localhost:9091/transmission/rpc list
//! ```

mod cli;
mod commands;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use transmission_rpc_client::RpcClient;

use crate::cli::Cli;
use crate::commands::CliError;

/// Initializes the tracing subscriber. Logs go to stderr so stdout only carries results.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = RpcClient::try_new(cli.config()?)?;
    if let Some(output) = commands::run(&client, &cli.command).await? {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{e}");
        return Err(e.into());
    }

    Ok(())
}
