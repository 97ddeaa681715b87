//! Configuration for the document client.

use crate::error::{Error, Result};
use crate::rate_limiter::RateLimiterConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoint accepting unsigned goods-introduction documents.
pub const DEFAULT_ENDPOINT: &str =
    "https://dev.edo.crpt.tech/api/v1/incoming-documents/unsigned-events";

/// Settings for [`DocumentClient`](crate::DocumentClient) and its HTTP
/// transport.
///
/// Every field has a default, so a partial document deserializes:
///
/// ```rust
/// use docrate::ClientConfig;
/// use std::time::Duration;
///
/// let config: ClientConfig = serde_json::from_str(
///     r#"{ "request_limit": 5, "period": "1s", "timeout": "3s" }"#,
/// ).unwrap();
///
/// assert_eq!(config.request_limit, 5);
/// assert_eq!(config.timeout, Duration::from_secs(3));
/// assert!(!config.accept_invalid_certs);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// URL every document is POSTed to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Requests admitted per `period` (default: 10)
    #[serde(default = "default_request_limit")]
    pub request_limit: u64,

    /// Rate limiting window (default: 1s)
    #[serde(default = "default_period", with = "humantime_serde")]
    pub period: Duration,

    /// Whole-request timeout (default: 1s)
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Connection establishment timeout (default: 1s)
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Skip TLS certificate verification (default: false)
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_limit: default_request_limit(),
            period: default_period(),
            timeout: default_timeout(),
            connect_timeout: default_timeout(),
            accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    /// Default settings with the given rate limit.
    pub fn new(request_limit: u64, period: Duration) -> Self {
        Self {
            request_limit,
            period,
            ..Default::default()
        }
    }

    /// Replaces the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets both the request and the connect timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = timeout;
        self
    }

    /// The limiter settings derived from this configuration.
    pub fn rate_limit(&self) -> RateLimiterConfig {
        RateLimiterConfig::new(self.request_limit, self.period)
    }

    /// Checks the rate limit, endpoint and timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] describing the first bad field.
    pub fn validate(&self) -> Result<()> {
        self.rate_limit().validate()?;

        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|err| Error::invalid_config(format!("endpoint {:?}: {}", self.endpoint, err)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_config(format!(
                "endpoint scheme must be http or https, got {}",
                url.scheme()
            )));
        }

        if self.timeout.is_zero() || self.connect_timeout.is_zero() {
            return Err(Error::invalid_config("timeouts must be greater than 0"));
        }

        Ok(())
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_request_limit() -> u64 {
    10
}

fn default_period() -> Duration {
    Duration::from_secs(1)
}

fn default_timeout() -> Duration {
    Duration::from_secs(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_limit, 10);
        assert_eq!(config.period, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_deserialize_humantime() {
        let config: ClientConfig = serde_json::from_str(
            r#"{
                "endpoint": "http://localhost:8080/docs",
                "request_limit": 100,
                "period": "1m",
                "timeout": "500ms",
                "connect_timeout": "2s",
                "accept_invalid_certs": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.endpoint, "http://localhost:8080/docs");
        assert_eq!(config.period, Duration::from_secs(60));
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert!(config.accept_invalid_certs);
        assert_eq!(config.rate_limit().capacity, 100);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::new(0, Duration::from_secs(1)).validate().is_err());
        assert!(ClientConfig::new(5, Duration::ZERO).validate().is_err());

        let bad_url = ClientConfig::default().with_endpoint("not a url");
        assert!(matches!(
            bad_url.validate(),
            Err(Error::InvalidConfiguration(_))
        ));

        let bad_scheme = ClientConfig::default().with_endpoint("ftp://example.com/docs");
        assert!(bad_scheme.validate().is_err());

        let no_timeout = ClientConfig::default().with_timeout(Duration::ZERO);
        assert!(no_timeout.validate().is_err());
    }
}
