//! reqwest-backed implementation of [`LedgerApi`].

use async_trait::async_trait;
use fintrack_core::{NewTransaction, Transaction, TransactionId, TransactionKind};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;

use crate::api::{Endpoint, LedgerApi};
use crate::config::{ClientConfig, ConfigError};
use crate::error::LedgerError;

/// HTTP client for the ledger API.
#[derive(Debug, Clone)]
pub struct HttpLedgerApi {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

/// Shape of the API's failure bodies: `{"message": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpLedgerApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of `endpoint`; segments are percent-encoded.
    pub fn url(&self, endpoint: &Endpoint) -> Url {
        let mut url = self.base_url.clone();
        // Base URLs are validated http(s) URLs, which always have path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(endpoint.segments());
        }
        url
    }

    fn request(&self, endpoint: &Endpoint) -> RequestBuilder {
        let method = match endpoint {
            Endpoint::List(_) => Method::GET,
            Endpoint::Create(_) => Method::POST,
            Endpoint::Delete(..) => Method::DELETE,
        };
        let mut req = self.client.request(method, self.url(endpoint));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send and turn any non-2xx response into a classified error.
    async fn send(&self, endpoint: &Endpoint, req: RequestBuilder) -> Result<Response, LedgerError> {
        tracing::debug!(method = endpoint.method(), path = %endpoint.path(), "sending request");

        let resp = req.send().await?;
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(LedgerError::from_status(status.as_u16(), failure_message(status, &body)))
    }
}

/// The `message` field of a failure body, falling back to the raw body and
/// then to the status reason phrase.
fn failure_message(status: StatusCode, body: &str) -> String {
    if let Some(message) = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
    {
        return message;
    }
    if !body.trim().is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[async_trait]
impl LedgerApi for HttpLedgerApi {
    async fn list(&self, kind: TransactionKind) -> Result<Vec<Transaction>, LedgerError> {
        let endpoint = Endpoint::List(kind);
        let resp = self.send(&endpoint, self.request(&endpoint)).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| LedgerError::Parse(format!("failed to decode {}: {e}", kind.plural())))
    }

    async fn create(&self, kind: TransactionKind, data: &NewTransaction) -> Result<u16, LedgerError> {
        let endpoint = Endpoint::Create(kind);
        let resp = self.send(&endpoint, self.request(&endpoint).json(data)).await?;
        Ok(resp.status().as_u16())
    }

    async fn delete(&self, kind: TransactionKind, id: &TransactionId) -> Result<u16, LedgerError> {
        let endpoint = Endpoint::Delete(kind, id.clone());
        let resp = self.send(&endpoint, self.request(&endpoint)).await?;
        Ok(resp.status().as_u16())
    }
}
