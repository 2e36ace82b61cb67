//! Request/response seam to the configuration API.
//!
//! The engine talks to [`ConfigTransport`]; [`HttpTransport`] is the
//! production implementation over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use engagement_core::{FetchError, HttpError, PartnerKey, PartnerPatch};

/// Path segment of the common record.
pub const COMMON_RESOURCE: &str = "common";

/// Generic request/response client for configuration resources.
///
/// `resource` is the last path segment: [`COMMON_RESOURCE`] or a partner key.
#[async_trait]
pub trait ConfigTransport: Send + Sync {
    async fn get(&self, resource: &str) -> Result<Value, FetchError>;

    async fn patch(&self, key: &PartnerKey, body: &PartnerPatch) -> Result<(), FetchError>;
}

/// HTTP transport rooted at `{configApiPath}`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base: String,
}

impl HttpTransport {
    /// Build a transport for `base` with a per-request `timeout`.
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::transport(e.to_string()))?;
        Ok(Self::with_client(client, base))
    }

    pub fn with_client(client: Client, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { client, base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base, resource)
    }
}

#[async_trait]
impl ConfigTransport for HttpTransport {
    async fn get(&self, resource: &str) -> Result<Value, FetchError> {
        let url = self.url(resource);
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;
        let response = check_status(response)?;
        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))
    }

    async fn patch(&self, key: &PartnerKey, body: &PartnerPatch) -> Result<(), FetchError> {
        let url = self.url(&key.0);
        tracing::debug!(%url, "PATCH");
        let response = self
            .client
            .patch(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;
        check_status(response).map(|_| ())
    }
}

fn check_status(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(http_error(status).into())
    }
}

/// `{statusCode, reasonPhrase}` for a non-2xx status.
pub fn http_error(status: StatusCode) -> HttpError {
    let reason = status
        .canonical_reason()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    HttpError::new(status.as_u16(), reason)
}
