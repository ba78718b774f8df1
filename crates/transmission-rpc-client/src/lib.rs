//! # Client for the Transmission RPC protocol.
//!
//! usage:
//!
//! ```rust,ignore
//! use transmission_rpc_client::{RpcClient, RpcConfig, RpcError, TransmissionApi};
//! use transmission_rpc_types::TorrentIdList;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RpcClient::try_new(RpcConfig::from_env()?)?;
//!
//!     // The first call only fetches a session id.
//!     let session_id = match client.session_get("").await {
//!         Err(RpcError::InvalidSession { session_id }) => session_id,
//!         other => {
//!             other?;
//!             String::new()
//!         }
//!     };
//!
//!     let torrents = client
//!         .torrent_get(&session_id, &TorrentIdList::new([42, 1337]), &["id", "name"])
//!         .await?;
//!     println!("{torrents:?}");
//!     Ok(())
//! }
//! ```

mod api;
mod client;
mod codec;
mod config;
mod error;
mod transport;

#[cfg(test)]
mod testutil;

pub use api::TransmissionApi;
pub use client::RpcClient;
pub use codec::{Arguments, RpcResponse, decode_response, encode_request};
pub use config::{ConfigError, ENV_RPC_PASSWORD, ENV_RPC_URL, ENV_RPC_USERNAME, RpcConfig};
pub use error::RpcError;
pub use transport::{
    Credentials, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError,
};

// Only used by the integration tests.
#[cfg(test)]
use httpmock as _;
