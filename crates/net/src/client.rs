//! HTTP client setup and error classification

use mailcheck_config::OracleConfig;
use mailcheck_errors::{Error, NetworkError};
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 32,
            user_agent: format!("mailcheck/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&OracleConfig> for NetConfig {
    fn from(config: &OracleConfig) -> Self {
        Self {
            timeout: config.timeout(),
            connect_timeout: config.connect_timeout(),
            ..Self::default()
        }
    }
}

/// HTTP client wrapper
///
/// Deliberately single-shot: a failed request is reported once and never
/// re-attempted here.
#[derive(Clone, Debug)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: &NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ClientSetup(e.to_string()))?;

        Ok(Self { client })
    }

    /// POST a JSON body and require a 2xx answer
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` on transport failure, timeout, or a non-success status.
    pub async fn post_json<B>(&self, url: &str, body: &B) -> Result<Response, NetworkError>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| classify(&e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }
        Ok(response)
    }
}

/// Map a reqwest failure onto the oracle error taxonomy
pub(crate) fn classify(error: &reqwest::Error, url: &str) -> NetworkError {
    if error.is_timeout() {
        NetworkError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_decode() {
        NetworkError::MalformedResponse(error.to_string())
    } else {
        NetworkError::Unreachable(error.to_string())
    }
}
