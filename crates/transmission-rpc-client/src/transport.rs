//! HTTP transport abstraction.
//!
//! The session engine only needs to POST a body with some headers and basic auth, then look at
//! the status, headers and body of what came back. [`HttpTransport`] captures exactly that, so any
//! HTTP client can be plugged in, and tests can swap in a mock.

use std::{error::Error as StdError, fmt, time::Duration};

use reqwest::{
    Client, StatusCode,
    header::{HeaderMap, HeaderValue},
    redirect::Policy,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Basic auth credentials sent with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// RPC username.
    pub username: String,
    /// RPC password.
    pub password: String,
}

impl Credentials {
    /// Creates a new set of credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the password.
        write!(
            f,
            "Credentials(username=\"{}\", password=<{}>)",
            self.username,
            if self.password.is_empty() {
                "unset"
            } else {
                "set"
            }
        )
    }
}

/// A POST request handed to the transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Serialized JSON body.
    pub body: Vec<u8>,
    /// Extra request headers.
    pub headers: HeaderMap,
    /// Basic auth credentials, if any.
    pub credentials: Option<Credentials>,
}

/// A response the transport received.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Builds a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Returns a header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Errors a transport can report.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The server answered with a 4xx status.
    #[error("client error response: {}", .0.status)]
    Client(HttpResponse),

    /// No usable response was received: connection failures, timeouts, redirects, 5xx statuses.
    #[error("request failed: {0}")]
    Request(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

impl TransportError {
    /// Wraps any error as a [`TransportError::Request`].
    pub fn request(err: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self::Request(err.into())
    }

    /// The status of a client error response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Client(response) => Some(response.status),
            Self::Request(_) => None,
        }
    }
}

/// Sends the RPC POST request.
#[cfg_attr(test, mockall::automock)]
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    /// POSTs `request` and returns the response, classifying 4xx statuses as
    /// [`TransportError::Client`] and everything that did not produce a usable response as
    /// [`TransportError::Request`].
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// The default transport, backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    url: Url,
}

impl ReqwestTransport {
    /// Creates a transport posting to `url`, with an optional overall request timeout.
    ///
    /// Redirects are never followed: the request must reach the configured endpoint as a POST.
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().redirect(Policy::none());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, url))
    }

    /// Creates a transport posting to `url` with a preconfigured client.
    pub fn with_client(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .post(self.url.clone())
            .headers(request.headers)
            .header(
                reqwest::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )
            .body(request.body);
        if let Some(credentials) = request.credentials {
            builder = builder.basic_auth(credentials.username, Some(credentials.password));
        }

        let response = builder.send().await.map_err(TransportError::request)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(TransportError::request)?;
        debug!(%status, bytes = body.len(), "Received response from {}", self.url);

        let response = HttpResponse::new(status, headers, body.to_vec());
        if status.is_client_error() {
            return Err(TransportError::Client(response));
        }
        // Redirects are not followed, so 3xx fails like 5xx.
        if !status.is_success() {
            return Err(TransportError::request(format!(
                "server responded with {status}"
            )));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials::new("seeder", "p@55w0rD");
        let printed = format!("{credentials:?}");
        assert!(printed.contains("seeder"));
        assert!(!printed.contains("p@55w0rD"));
    }

    #[test]
    fn client_error_exposes_status() {
        let err = TransportError::Client(HttpResponse::new(
            StatusCode::NOT_FOUND,
            HeaderMap::new(),
            "",
        ));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(TransportError::request("boom").status(), None);
    }
}
