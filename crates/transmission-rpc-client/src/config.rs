//! Client configuration.

use std::{env, fmt, time::Duration};

use thiserror::Error;
use transmission_rpc_types::DEFAULT_RPC_URL;
use url::Url;

use crate::transport::Credentials;

/// Environment variable holding the RPC endpoint.
pub const ENV_RPC_URL: &str = "TRANSMISSION_RPC_URL";
/// Environment variable holding the RPC username.
pub const ENV_RPC_USERNAME: &str = "TRANSMISSION_RPC_USERNAME";
/// Environment variable holding the RPC password.
pub const ENV_RPC_PASSWORD: &str = "TRANSMISSION_RPC_PASSWORD";

/// Errors raised while building a client.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The endpoint is not a valid URL.
    #[error("invalid RPC URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The endpoint is not an http(s) URL.
    #[error("unsupported RPC URL scheme: {0}")]
    UnsupportedScheme(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Immutable client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct RpcConfig {
    /// The RPC endpoint.
    pub url: Url,
    /// Basic auth credentials, if the daemon requires them.
    pub credentials: Option<Credentials>,
    /// Overall request timeout, enforced by the transport.
    pub timeout: Option<Duration>,
}

impl RpcConfig {
    /// Creates a configuration for `url` without credentials.
    pub fn new(url: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }
        Ok(Self {
            url,
            credentials: None,
            timeout: None,
        })
    }

    /// Reads the configuration from the environment, defaulting to a local daemon.
    ///
    /// Credentials are only set when a username is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::var(ENV_RPC_URL).unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
        let config = Self::new(&url)?;
        Ok(match env::var(ENV_RPC_USERNAME) {
            Ok(username) => config.with_credentials(Credentials::new(
                username,
                env::var(ENV_RPC_PASSWORD).unwrap_or_default(),
            )),
            Err(_) => config,
        })
    }

    /// Sets basic auth credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_RPC_URL).unwrap_or_else(|_| unreachable!()),
            credentials: None,
            timeout: None,
        }
    }
}

impl fmt::Debug for RpcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RpcConfig(url=\"{}\", credentials={:?}, timeout={:?})",
            self.url, self.credentials, self.timeout
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_daemon() {
        let config = RpcConfig::default();
        assert_eq!(config.url.as_str(), DEFAULT_RPC_URL);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn rejects_invalid_urls() {
        assert!(matches!(
            RpcConfig::new("not a url"),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert!(matches!(
            RpcConfig::new("ftp://localhost/rpc"),
            Err(ConfigError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
    }

    #[test]
    fn debug_never_prints_the_password() {
        let config = RpcConfig::new("http://42.42.42.42:9091/transmission/rpc")
            .unwrap()
            .with_credentials(Credentials::new("transmission", "hunter2"))
            .with_timeout(Duration::from_secs(5));
        let printed = format!("{config:?}");
        assert!(printed.contains("42.42.42.42"));
        assert!(printed.contains("transmission"));
        assert!(!printed.contains("hunter2"));
    }
}
