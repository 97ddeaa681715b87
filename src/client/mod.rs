//! # Document Client
//!
//! Rate-limited submission of documents to a remote endpoint.
//!
//! ```text
//!     submit(document, credential)
//!          │
//!          ▼
//!     ┌─────────────┐  denied   ┌──────────────────────────────┐
//!     │ try_acquire │ ────────► │ Err(RateLimitExceeded)       │
//!     └──────┬──────┘           │ no serialization, no network │
//!            │ admitted         └──────────────────────────────┘
//!            ▼
//!     ┌─────────────┐
//!     │ serde_json  │ ──► Err(Serialization)
//!     └──────┬──────┘
//!            ▼
//!     ┌─────────────┐
//!     │  Transport  │ ──► Ok(body) | Err(Network) | Err(Server)
//!     └─────────────┘
//! ```
//!
//! A permit is spent the moment a call is admitted. Failed deliveries do not
//! give it back.

mod config;
mod document;
mod transport;

pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use document::{Description, IntroductionDocument, Product, DEFAULT_DOC_TYPE};
pub use transport::{DocumentTransport, HttpTransport};

use crate::error::{Error, Result};
use crate::rate_limiter::RateLimiter;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Submits documents through a shared [`RateLimiter`].
///
/// At most `capacity` submissions per window reach the transport, no matter
/// how many tasks or threads call [`submit`](Self::submit) concurrently.
///
/// ```rust,no_run
/// use docrate::{ClientConfig, DocumentClient, IntroductionDocument};
///
/// # async fn run() -> docrate::Result<()> {
/// let client = DocumentClient::from_config(ClientConfig::default())?;
///
/// let doc = IntroductionDocument::new().with_doc_id("doc-1");
/// match client.create_document(&doc, "signature").await {
///     Ok(body) => println!("accepted: {}", body),
///     Err(err) if err.is_rate_limited() => println!("slow down: {}", err),
///     Err(err) => return Err(err),
/// }
/// # Ok(())
/// # }
/// ```
pub struct DocumentClient<T = HttpTransport> {
    limiter: Arc<RateLimiter>,
    transport: T,
}

impl DocumentClient<HttpTransport> {
    /// Builds the limiter and the HTTP transport from one configuration.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration, a TLS backend that cannot be
    /// initialized, or a replenisher thread that cannot be spawned.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        let limiter = RateLimiter::with_config(config.rate_limit())?;
        Ok(Self::new(Arc::new(limiter), transport))
    }
}

impl<T: DocumentTransport> DocumentClient<T> {
    /// Combines an existing limiter with a transport.
    ///
    /// Several clients may share one limiter; they then share its budget.
    pub fn new(limiter: Arc<RateLimiter>, transport: T) -> Self {
        Self { limiter, transport }
    }

    /// Submits one document.
    ///
    /// Returns the response body of a 2xx answer.
    ///
    /// # Errors
    ///
    /// - [`Error::RateLimitExceeded`] when no permit is left; nothing else
    ///   happens in that case.
    /// - [`Error::Serialization`] when `document` cannot be encoded.
    /// - [`Error::Network`] or [`Error::Server`] from the transport.
    pub async fn submit<D>(&self, document: &D, credential: &str) -> Result<String>
    where
        D: Serialize + ?Sized,
    {
        if !self.limiter.try_acquire() {
            let retry_after = self.limiter.time_until_reset();
            debug!("Submission denied, retry after {:?}", retry_after);
            return Err(Error::RateLimitExceeded { retry_after });
        }

        let body = serde_json::to_vec(document)?;
        self.transport.post_json(body, credential).await
    }

    /// Submits a goods-introduction document signed with `signature`.
    pub async fn create_document(
        &self,
        document: &IntroductionDocument,
        signature: &str,
    ) -> Result<String> {
        self.submit(document, signature).await
    }

    /// The limiter guarding this client.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Stops the limiter's replenisher. Idempotent.
    ///
    /// Submissions keep working until the current window's permits are
    /// spent; after that every call is denied with no retry hint.
    pub fn shutdown(&self) {
        self.limiter.shutdown();
    }
}

impl<T> std::fmt::Debug for DocumentClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentClient")
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}
