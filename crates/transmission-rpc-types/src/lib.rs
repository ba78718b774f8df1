//! # Transmission RPC Types
//!
//! This crate defines the protocol-level types shared by the Transmission RPC client: torrent
//! identifier lists, the torrent descriptors the daemon returns, the RPC method catalogue and the
//! typed argument tables used to validate calls before they are sent.

pub mod args;
mod ids;
mod method;

pub use args::{ArgumentSpec, ValueKind};
pub use ids::{IdListError, TorrentIdList};
pub use method::{RpcMethod, UnknownMethod};

use serde::{Deserialize, Serialize};

/// The header carrying the session token on every request, and the fresh token on a 409.
///
/// Spelled in lowercase; header names are case-insensitive on the wire.
pub const SESSION_ID_HEADER: &str = "x-transmission-session-id";

/// The `result` value the daemon uses for successful calls. Any other value is an error.
pub const RESULT_SUCCESS: &str = "success";

/// Default RPC endpoint of a local daemon.
pub const DEFAULT_RPC_URL: &str = "http://localhost:9091/transmission/rpc";

/// A torrent that was already present when `torrent-add` was called.
///
/// The daemon reports these with `result: "success"` and a `torrent-duplicate` field, so the
/// client surfaces them as a distinct error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateTorrent {
    /// Daemon-local torrent id.
    pub id: u64,
    /// Torrent name.
    pub name: String,
    /// Info hash, hex encoded.
    #[serde(rename = "hashString")]
    pub hash_string: String,
}

/// A torrent freshly queued by `torrent-add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedTorrent {
    /// Daemon-local torrent id.
    pub id: u64,
    /// Torrent name.
    pub name: String,
    /// Info hash, hex encoded.
    #[serde(rename = "hashString")]
    pub hash_string: String,
}

/// The outcome of `torrent-rename-path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedPath {
    /// Torrent id.
    pub id: u64,
    /// New name of the renamed path component.
    pub name: String,
    /// Path that was renamed.
    pub path: String,
}

/// The outcome of `free-space`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSpace {
    /// Directory that was queried.
    pub path: String,
    /// Free bytes available in that directory.
    #[serde(rename = "size-bytes")]
    pub size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_torrent_reads_daemon_field_names() {
        let duplicate: DuplicateTorrent = serde_json::from_str(
            r#"{"id":42,"name":"Fedora.iso","hashString":"deadbeef"}"#,
        )
        .unwrap();

        assert_eq!(
            duplicate,
            DuplicateTorrent {
                id: 42,
                name: "Fedora.iso".into(),
                hash_string: "deadbeef".into(),
            }
        );
    }

    #[test]
    fn free_space_reads_size_bytes() {
        let free: FreeSpace =
            serde_json::from_str(r#"{"path":"/downloads","size-bytes":37738184704}"#).unwrap();
        assert_eq!(free.path, "/downloads");
        assert_eq!(free.size_bytes, 37_738_184_704);
    }
}
