//! JSON request/response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered argument mapping, as sent in requests and returned by successful calls.
pub type Arguments = Map<String, Value>;

#[derive(Serialize)]
struct Request<'a> {
    method: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    arguments: &'a Arguments,
}

fn is_empty(arguments: &&Arguments) -> bool {
    arguments.is_empty()
}

/// Serializes `{"method": ..., "arguments": {...}}`.
///
/// `arguments` is left out entirely when the mapping is empty, and keeps the insertion order of
/// the mapping otherwise.
pub fn encode_request(method: &str, arguments: &Arguments) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&Request { method, arguments })
}

/// The response envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcResponse {
    /// `"success"` or an error description.
    pub result: String,
    /// Method-specific payload. `Null` when the daemon omitted it.
    #[serde(default)]
    pub arguments: Value,
}

/// Parses a response body.
pub fn decode_response(body: &[u8]) -> Result<RpcResponse, serde_json::Error> {
    serde_json::from_slice(body)
}
