use std::time::Duration;

use clap::{Parser, Subcommand};
use transmission_rpc_client::{
    ConfigError, Credentials, ENV_RPC_PASSWORD, ENV_RPC_URL, ENV_RPC_USERNAME, RpcConfig,
};
use transmission_rpc_types::{DEFAULT_RPC_URL, args::torrent_get};

/// Fields shown by `list` unless others are requested.
const DEFAULT_FIELDS: &[&str] = &[
    torrent_get::ID,
    torrent_get::NAME,
    torrent_get::STATUS,
    torrent_get::PERCENT_DONE,
    torrent_get::TOTAL_SIZE,
];

/// Top-level CLI struct for the binary.
#[derive(Debug, Parser)]
#[command(name = "transmission-rpc", version, about, long_about = None)]
pub(crate) struct Cli {
    /// The Transmission RPC endpoint.
    #[arg(long, env = ENV_RPC_URL, default_value = DEFAULT_RPC_URL)]
    pub url: String,

    /// RPC username, if the daemon requires authentication.
    #[arg(short, long, env = ENV_RPC_USERNAME)]
    pub username: Option<String>,

    /// RPC password.
    #[arg(short, long, env = ENV_RPC_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// The operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Operations exposed on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub(crate) enum Command {
    /// Show the session settings.
    SessionGet,

    /// Show transfer statistics.
    SessionStats,

    /// List torrents. Lists all of them when no id is given.
    List {
        /// Torrent ids.
        ids: Vec<u64>,

        /// Fields to show (comma-separated).
        #[arg(short, long, value_delimiter = ',', default_values = DEFAULT_FIELDS)]
        fields: Vec<String>,
    },

    /// Add a torrent from a path or URL the daemon can read.
    Add {
        /// Torrent file path or URL.
        filename: String,

        /// Where to store the downloaded data.
        #[arg(long)]
        download_dir: Option<String>,

        /// Add the torrent without starting it.
        #[arg(long, default_value_t = false)]
        paused: bool,
    },

    /// Start torrents. Starts all of them when no id is given.
    Start {
        /// Torrent ids.
        ids: Vec<u64>,
    },

    /// Stop torrents. Stops all of them when no id is given.
    Stop {
        /// Torrent ids.
        ids: Vec<u64>,
    },

    /// Remove torrents.
    Remove {
        /// Torrent ids.
        #[arg(required = true)]
        ids: Vec<u64>,

        /// Also delete the downloaded data.
        #[arg(long, default_value_t = false)]
        delete_local_data: bool,
    },

    /// Check whether the peer port is reachable.
    PortTest,

    /// Show the free space in a directory on the daemon's host.
    FreeSpace {
        /// Directory to check.
        path: String,
    },

    /// Download the blocklist again.
    BlocklistUpdate,
}

impl Cli {
    /// Builds the client configuration. Credentials are only used when a username is given.
    pub(crate) fn config(&self) -> Result<RpcConfig, ConfigError> {
        let mut config = RpcConfig::new(&self.url)?;
        if let Some(username) = &self.username {
            config = config.with_credentials(Credentials::new(
                username.as_str(),
                self.password.clone().unwrap_or_default(),
            ));
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(Duration::from_secs(timeout));
        }
        Ok(config)
    }
}
