//! The RPC method catalogue.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Error returned when parsing a method name the daemon does not know.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown RPC method: {0}")]
pub struct UnknownMethod(pub String);

/// A named daemon operation, sent as the `method` field of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum RpcMethod {
    TorrentStart,
    TorrentStartNow,
    TorrentStop,
    TorrentVerify,
    TorrentReannounce,
    TorrentSet,
    TorrentGet,
    TorrentAdd,
    TorrentRemove,
    TorrentSetLocation,
    TorrentRenamePath,
    SessionSet,
    SessionGet,
    SessionStats,
    SessionClose,
    BlocklistUpdate,
    PortTest,
    QueueMoveTop,
    QueueMoveUp,
    QueueMoveDown,
    QueueMoveBottom,
    FreeSpace,
}

impl RpcMethod {
    /// Every method, in the order the daemon documents them.
    pub const ALL: [RpcMethod; 22] = [
        Self::TorrentStart,
        Self::TorrentStartNow,
        Self::TorrentStop,
        Self::TorrentVerify,
        Self::TorrentReannounce,
        Self::TorrentSet,
        Self::TorrentGet,
        Self::TorrentAdd,
        Self::TorrentRemove,
        Self::TorrentSetLocation,
        Self::TorrentRenamePath,
        Self::SessionSet,
        Self::SessionGet,
        Self::SessionStats,
        Self::SessionClose,
        Self::BlocklistUpdate,
        Self::PortTest,
        Self::QueueMoveTop,
        Self::QueueMoveUp,
        Self::QueueMoveDown,
        Self::QueueMoveBottom,
        Self::FreeSpace,
    ];

    /// The wire name of the method.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TorrentStart => "torrent-start",
            Self::TorrentStartNow => "torrent-start-now",
            Self::TorrentStop => "torrent-stop",
            Self::TorrentVerify => "torrent-verify",
            Self::TorrentReannounce => "torrent-reannounce",
            Self::TorrentSet => "torrent-set",
            Self::TorrentGet => "torrent-get",
            Self::TorrentAdd => "torrent-add",
            Self::TorrentRemove => "torrent-remove",
            Self::TorrentSetLocation => "torrent-set-location",
            Self::TorrentRenamePath => "torrent-rename-path",
            Self::SessionSet => "session-set",
            Self::SessionGet => "session-get",
            Self::SessionStats => "session-stats",
            Self::SessionClose => "session-close",
            Self::BlocklistUpdate => "blocklist-update",
            Self::PortTest => "port-test",
            Self::QueueMoveTop => "queue-move-top",
            Self::QueueMoveUp => "queue-move-up",
            Self::QueueMoveDown => "queue-move-down",
            Self::QueueMoveBottom => "queue-move-bottom",
            Self::FreeSpace => "free-space",
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RpcMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}
