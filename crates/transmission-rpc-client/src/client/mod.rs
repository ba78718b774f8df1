//! The RPC session engine.

use reqwest::{
    StatusCode,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;
use tracing::{debug, error, info};
use transmission_rpc_types::{
    DuplicateTorrent, RESULT_SUCCESS, SESSION_ID_HEADER, ValueKind, args::torrent_add,
};

use crate::codec::{Arguments, decode_response, encode_request};
use crate::config::{ConfigError, RpcConfig};
use crate::error::RpcError;
use crate::transport::{
    Credentials, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError,
};


pub(crate) const SESSION_ID: HeaderName = HeaderName::from_static(SESSION_ID_HEADER);

/// Client for the Transmission RPC endpoint.
///
/// The client only holds its transport and the credentials it was built with. The session token is
/// owned by the caller and passed to every call; when the daemon rejects it, the call fails with
/// [`RpcError::InvalidSession`] carrying the fresh token, and it is up to the caller to retry.
///
/// ```rust,ignore
/// let mut session_id = String::new();
/// let stats = match client.session_stats(&session_id).await {
///     Err(RpcError::InvalidSession { session_id: fresh }) => {
///         session_id = fresh;
///         client.session_stats(&session_id).await?
///     }
///     other => other?,
/// };
/// ```
#[allow(missing_debug_implementations)]
pub struct RpcClient<T: HttpTransport = ReqwestTransport> {
    transport: T,
    credentials: Option<Credentials>,
}

impl RpcClient {
    /// Creates a client posting to the configured endpoint through [`ReqwestTransport`].
    pub fn try_new(config: RpcConfig) -> Result<Self, ConfigError> {
        debug!("Connecting to Transmission RPC at {}", config.url);
        let transport =
            ReqwestTransport::new(config.url, config.timeout).map_err(ConfigError::HttpClient)?;

        Ok(Self::with_transport(transport, config.credentials))
    }
}

impl<T: HttpTransport> RpcClient<T> {
    /// Creates a client on top of a custom transport.
    pub fn with_transport(transport: T, credentials: Option<Credentials>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Encodes `method` and `arguments`, then [`send`](Self::send)s them.
    pub async fn call(
        &self,
        session_id: &str,
        method: &str,
        arguments: &Arguments,
    ) -> Result<Arguments, RpcError> {
        let body = encode_request(method, arguments).map_err(RpcError::Encode)?;
        self.send(session_id, body).await
    }

    /// Sends an encoded request and classifies the outcome.
    ///
    /// Returns the `arguments` of a successful response, or an empty mapping if there were none.
    /// Exactly one request is made; nothing is retried.
    pub async fn send(&self, session_id: &str, body: Vec<u8>) -> Result<Arguments, RpcError> {
        let token = HeaderValue::from_str(session_id).map_err(|_| RpcError::InvalidSessionId)?;
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_ID, token);

        debug!(
            request = %String::from_utf8_lossy(&body),
            "Request sent to the Transmission RPC API"
        );
        let request = HttpRequest {
            body,
            headers,
            credentials: self.credentials.clone(),
        };

        let response = match self.transport.post(request).await {
            Ok(response) => response,
            Err(TransportError::Client(response)) if response.status == StatusCode::CONFLICT => {
                return Err(invalid_session(&response));
            }
            Err(err @ TransportError::Client(_)) => {
                debug!(error = %err, "The Transmission RPC API rejected the request");
                return Err(RpcError::Client(err));
            }
            Err(err) => {
                error!(error = %err, "The Transmission RPC API could not be reached");
                return Err(RpcError::RequestFailure(err));
            }
        };

        classify(&response.body)
    }
}

fn invalid_session(response: &HttpResponse) -> RpcError {
    match response.header(SESSION_ID_HEADER) {
        Some(session_id) => {
            info!("Invalid Transmission session ID. A new ID has been generated.");
            debug!(session_id, "Received a new Transmission session ID");
            RpcError::InvalidSession {
                session_id: session_id.to_string(),
            }
        }
        None => {
            error!("The Transmission RPC API returned 409 without a session ID");
            RpcError::malformed("409 response without a session id header")
        }
    }
}

/// Turns a response body into the call result.
fn classify(body: &[u8]) -> Result<Arguments, RpcError> {
    let response = decode_response(body).map_err(|e| {
        error!(
            error = %e,
            body = %String::from_utf8_lossy(body),
            "The Transmission RPC API returned an unreadable response"
        );
        RpcError::malformed(e.to_string())
    })?;

    if response.result != RESULT_SUCCESS {
        error!(
            result = %response.result,
            arguments = %response.arguments,
            "The Transmission RPC API returned an error"
        );
        return Err(RpcError::Remote {
            result: response.result,
            arguments: response.arguments,
        });
    }

    let arguments = match response.arguments {
        Value::Object(arguments) => arguments,
        Value::Null => Arguments::new(),
        other => {
            return Err(RpcError::malformed(format!(
                "arguments must be an object, got {}",
                ValueKind::of(&other)
            )));
        }
    };

    // The daemon answers "success" when the torrent was already there.
    if let Some(duplicate) = arguments.get(torrent_add::TORRENT_DUPLICATE) {
        let duplicate: DuplicateTorrent = serde_json::from_value(duplicate.clone())
            .map_err(|e| RpcError::malformed(format!("invalid torrent-duplicate: {e}")))?;
        info!(
            id = duplicate.id,
            name = %duplicate.name,
            hash = %duplicate.hash_string,
            "Torrent is already present"
        );
        return Err(RpcError::DuplicateTorrent(duplicate));
    }

    Ok(arguments)
}
