//! The verification oracle contract and its HTTP implementation

use crate::client::{classify, NetClient, NetConfig};
use async_trait::async_trait;
use mailcheck_config::OracleConfig;
use mailcheck_errors::{Error, NetworkError};
use mailcheck_types::{Verdict, VerdictStatus};
use serde::{Deserialize, Serialize};

/// Categories the oracle itself may answer with.
///
/// `Error` is intentionally absent: it only exists on the mailcheck side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleStatus {
    Good,
    Risky,
    Bad,
}

impl From<OracleStatus> for VerdictStatus {
    fn from(status: OracleStatus) -> Self {
        match status {
            OracleStatus::Good => Self::Good,
            OracleStatus::Risky => Self::Risky,
            OracleStatus::Bad => Self::Bad,
        }
    }
}

/// A successful oracle classification of one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleAnswer {
    pub status: OracleStatus,
    pub reason: String,
}

impl OracleAnswer {
    #[must_use]
    pub fn new(status: OracleStatus, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    /// Attach the answer to the address it was asked about
    #[must_use]
    pub fn into_verdict(self, email: impl Into<String>) -> Verdict {
        Verdict::new(email, self.status.into(), self.reason)
    }
}

/// External capability that classifies a single address
///
/// Implementations report every failure (transport, timeout, non-2xx,
/// unexpected payload) as a `NetworkError`; the caller decides what a
/// failure means for the batch.
#[async_trait]
pub trait VerificationOracle: Send + Sync {
    async fn verify(&self, email: &str) -> Result<OracleAnswer, NetworkError>;
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    email: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponse {
    status: String,
    #[serde(default)]
    reason: Option<String>,
}

impl TryFrom<VerifyResponse> for OracleAnswer {
    type Error = NetworkError;

    fn try_from(response: VerifyResponse) -> Result<Self, Self::Error> {
        let status = match response.status.as_str() {
            "Good" => OracleStatus::Good,
            "Risky" => OracleStatus::Risky,
            "Bad" => OracleStatus::Bad,
            other => {
                return Err(NetworkError::MalformedResponse(format!(
                    "unexpected status {other:?}"
                )))
            }
        };
        Ok(Self::new(status, response.reason.unwrap_or_default()))
    }
}

/// Oracle reached over HTTP: `POST <verify_url>` with `{"email": ...}`,
/// answered by `{"status": "Good"|"Risky"|"Bad", "reason": ...}`.
#[derive(Clone, Debug)]
pub struct HttpOracle {
    client: NetClient,
    verify_url: String,
}

impl HttpOracle {
    /// Build an oracle client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: &OracleConfig) -> Result<Self, Error> {
        let verify_url = crate::parse_url(&config.verify_url())?.to_string();
        let client = NetClient::new(&NetConfig::from(config))?;
        Ok(Self { client, verify_url })
    }

    #[must_use]
    pub fn verify_url(&self) -> &str {
        &self.verify_url
    }
}

#[async_trait]
impl VerificationOracle for HttpOracle {
    async fn verify(&self, email: &str) -> Result<OracleAnswer, NetworkError> {
        let response = self
            .client
            .post_json(&self.verify_url, &VerifyRequest { email })
            .await?;

        let body = response
            .text()
            .await
            .map_err(|e| classify(&e, &self.verify_url))?;

        let parsed: VerifyResponse = serde_json::from_str(&body)
            .map_err(|e| NetworkError::MalformedResponse(e.to_string()))?;

        tracing::trace!(email, status = %parsed.status, "oracle answered");
        parsed.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn oracle_for(server: &MockServer) -> HttpOracle {
        let config = OracleConfig {
            base_url: server.base_url(),
            ..OracleConfig::default()
        };
        HttpOracle::new(&config).unwrap()
    }

    #[tokio::test]
    async fn good_answer_is_parsed() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/email/verify")
                .json_body(json!({ "email": "a@x.com" }));
            then.status(200)
                .json_body(json!({ "status": "Good", "reason": "Valid mailbox" }));
        });

        let answer = oracle_for(&server).verify("a@x.com").await.unwrap();

        mock.assert();
        assert_eq!(answer, OracleAnswer::new(OracleStatus::Good, "Valid mailbox"));
    }

    #[tokio::test]
    async fn missing_reason_defaults_to_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/email/verify");
            then.status(200).json_body(json!({ "status": "Bad" }));
        });

        let answer = oracle_for(&server).verify("x@tempmail.io").await.unwrap();
        assert_eq!(answer.status, OracleStatus::Bad);
        assert!(answer.reason.is_empty());
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/email/verify");
            then.status(503);
        });

        let err = oracle_for(&server).verify("a@x.com").await.unwrap_err();
        assert!(matches!(err, NetworkError::HttpError { status: 503, .. }));
    }

    #[tokio::test]
    async fn unknown_status_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/email/verify");
            then.status(200)
                .json_body(json!({ "status": "Error", "reason": "oops" }));
        });

        let err = oracle_for(&server).verify("a@x.com").await.unwrap_err();
        assert!(matches!(err, NetworkError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/email/verify");
            then.status(200).body("<html>maintenance</html>");
        });

        let err = oracle_for(&server).verify("a@x.com").await.unwrap_err();
        assert!(matches!(err, NetworkError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let config = OracleConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            connect_timeout: 2,
            timeout: 2,
            ..OracleConfig::default()
        };
        let oracle = HttpOracle::new(&config).unwrap();

        let err = oracle.verify("a@x.com").await.unwrap_err();
        assert!(matches!(
            err,
            NetworkError::Unreachable(_) | NetworkError::Timeout { .. }
        ));
    }

    #[test]
    fn answer_becomes_verdict_for_its_address() {
        let verdict = OracleAnswer::new(OracleStatus::Risky, "catch-all").into_verdict("c@x.com");
        assert_eq!(verdict.email, "c@x.com");
        assert_eq!(verdict.status, VerdictStatus::Risky);
        assert_eq!(verdict.reason, "catch-all");
    }
}
