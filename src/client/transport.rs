//! HTTP delivery of serialized documents.

use super::config::ClientConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};

/// Delivers one JSON body to the document endpoint.
///
/// The client only calls this after a permit was granted; implementations
/// need no rate limiting of their own.
#[async_trait]
pub trait DocumentTransport: Send + Sync {
    /// POSTs `body` with `credential` as a bearer token and returns the
    /// response body of a 2xx answer.
    async fn post_json(&self, body: Vec<u8>, credential: &str) -> Result<String>;
}

/// [`DocumentTransport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Builds a client with the configured timeouts and TLS policy.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if `config` does not validate, or
    /// [`Error::Network`] if the TLS backend cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(concat!("docrate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, config.endpoint.clone()))
    }

    /// Wraps an existing client.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// The URL documents are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DocumentTransport for HttpTransport {
    async fn post_json(&self, body: Vec<u8>, credential: &str) -> Result<String> {
        debug!("POST {} ({} bytes)", self.endpoint, body.len());

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", credential))
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Document endpoint answered {}", status);
            return Err(Error::Server {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}
