//! Error taxonomy of the RPC client.

use serde_json::Value;
use thiserror::Error;
use transmission_rpc_types::{DuplicateTorrent, IdListError, ValueKind};

use crate::transport::TransportError;

/// Errors returned by [`RpcClient`](crate::RpcClient) and the per-method API.
#[derive(Error, Debug)]
pub enum RpcError {
    /// The daemon rejected the session token (HTTP 409) and issued a new one. Retry the call with
    /// `session_id`.
    #[error("invalid transmission session id, a new one was issued")]
    InvalidSession {
        /// The fresh token.
        session_id: String,
    },

    /// The daemon could not be reached or failed at the HTTP layer.
    #[error("transmission request failed")]
    RequestFailure(#[source] TransportError),

    /// A 4xx response other than 409, passed through as the transport reported it.
    #[error(transparent)]
    Client(TransportError),

    /// The daemon processed the request but reported a non-success result.
    #[error("transmission returned an error: {result}")]
    Remote {
        /// The literal `result` string.
        result: String,
        /// The raw `arguments` payload, `Null` if absent.
        arguments: Value,
    },

    /// `blocklist-update` could not download the configured blocklist.
    #[error("blocklist not found: {result}")]
    BlocklistNotFound {
        /// The literal `result` string.
        result: String,
    },

    /// `torrent-add` matched a torrent that is already present.
    #[error("torrent already added: {} (id {})", .0.name, .0.id)]
    DuplicateTorrent(DuplicateTorrent),

    /// The response body did not have the expected shape.
    #[error("malformed response: {reason}")]
    MalformedResponse {
        /// What was wrong with it.
        reason: String,
    },

    /// A required argument was missing.
    #[error("{method} requires one of the arguments {expected:?}")]
    MissingArgument {
        /// RPC method.
        method: &'static str,
        /// Acceptable argument names.
        expected: &'static [&'static str],
    },

    /// An argument is not accepted by the method.
    #[error("{method} does not accept the argument \"{argument}\"")]
    UnknownArgument {
        /// RPC method.
        method: &'static str,
        /// Offending argument.
        argument: String,
    },

    /// A read-only session setting was passed to `session-set`.
    #[error("the session setting \"{argument}\" is read-only")]
    ReadOnlyArgument {
        /// Offending argument.
        argument: String,
    },

    /// An argument value has the wrong JSON type.
    #[error("argument \"{argument}\" expects a value of type {expected}, {actual} given")]
    InvalidArgumentType {
        /// Offending argument.
        argument: String,
        /// Expected type.
        expected: ValueKind,
        /// Actual type.
        actual: ValueKind,
    },

    /// The session token cannot be sent as a header value.
    #[error("session id contains characters that are not allowed in a header")]
    InvalidSessionId,

    /// Torrent ids could not be parsed.
    #[error(transparent)]
    InvalidIds(#[from] IdListError),

    /// The request could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

impl RpcError {
    /// The fresh session token, if this is an [`RpcError::InvalidSession`].
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::InvalidSession { session_id } => Some(session_id),
            _ => None,
        }
    }

    /// The daemon's `result` string for remote failures.
    pub fn result(&self) -> Option<&str> {
        match self {
            Self::Remote { result, .. } | Self::BlocklistNotFound { result } => Some(result),
            _ => None,
        }
    }

    /// Whether the failure was detected before anything was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument { .. }
                | Self::UnknownArgument { .. }
                | Self::ReadOnlyArgument { .. }
                | Self::InvalidArgumentType { .. }
                | Self::InvalidSessionId
                | Self::InvalidIds(_)
        )
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use transmission_rpc_types::TorrentIdList;

    use super::*;

    #[test]
    fn session_id_only_for_invalid_session() {
        let err = RpcError::InvalidSession {
            session_id: "abc123".into(),
        };
        assert_eq!(err.session_id(), Some("abc123"));
        assert_eq!(RpcError::InvalidSessionId.session_id(), None);
    }

    #[test]
    fn remote_errors_expose_result() {
        let err = RpcError::Remote {
            result: "No such file or directory".into(),
            arguments: Value::Null,
        };
        assert_eq!(err.result(), Some("No such file or directory"));
        assert_eq!(
            err.to_string(),
            "transmission returned an error: No such file or directory"
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn id_list_errors_convert() {
        fn build(value: Value) -> Result<TorrentIdList, RpcError> {
            Ok(TorrentIdList::try_from(value)?)
        }

        let err = build(json!([42, "x"])).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "the list of IDs can only contain integers, item of type string given at the offset 1"
        );
    }

    #[test]
    fn duplicate_message_names_the_torrent() {
        let err = RpcError::DuplicateTorrent(DuplicateTorrent {
            id: 42,
            name: "Fedora.iso".into(),
            hash_string: "deadbeef".into(),
        });
        assert_eq!(err.to_string(), "torrent already added: Fedora.iso (id 42)");
    }
}
