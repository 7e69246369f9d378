//! Connection configuration for [`InteractionClient`](crate::client::InteractionClient).
//!
//! Timeouts default to unset, which means a call waits as long as the
//! transport does. Operators opt into limits explicitly.
//!
//! # Environment Variables
//!
//! - `CARDPAY_BASE_URL` — Override the API base URL
//! - `CARDPAY_SERVICE_NAME` — Override the service name reported in errors
//! - `CARDPAY_CONNECT_TIMEOUT_MS` — Connect timeout in milliseconds
//! - `CARDPAY_REQUEST_TIMEOUT_MS` — Whole-request timeout in milliseconds

use std::time::Duration;

use crate::constants::{
    BASE_URL_ENV, CONNECT_TIMEOUT_ENV, DEFAULT_BASE_URL, DEFAULT_SERVICE_NAME,
    REQUEST_TIMEOUT_ENV, SERVICE_NAME_ENV,
};

/// Configuration for an interaction client.
#[derive(Clone)]
pub struct ClientConfig {
    /// API base URL. A trailing slash is added if missing.
    pub base_url: String,

    /// Service name reported in [`ServiceError`](crate::error::ServiceError).
    pub service: String,

    /// Time allowed to establish a connection. `None` waits indefinitely.
    /// Ignored when [`Self::http_client`] is set.
    pub connect_timeout: Option<Duration>,

    /// Time allowed for a whole request, from send to the end of the body.
    /// `None` waits indefinitely.
    pub request_timeout: Option<Duration>,

    /// Pre-built reqwest client whose connection pool is shared with other
    /// users. If `None`, the client builds its own pool.
    pub http_client: Option<reqwest::Client>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            service: DEFAULT_SERVICE_NAME.to_owned(),
            connect_timeout: None,
            request_timeout: None,
            http_client: None,
        }
    }
}

impl ClientConfig {
    /// Creates a config with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Loads overrides from the process environment on top of the defaults.
    ///
    /// Unset or unparsable values keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(service) = lookup(SERVICE_NAME_ENV).filter(|v| !v.trim().is_empty()) {
            config.service = service;
        }
        if let Some(ms) = lookup(CONNECT_TIMEOUT_ENV).and_then(|v| v.trim().parse().ok()) {
            config.connect_timeout = Some(Duration::from_millis(ms));
        }
        if let Some(ms) = lookup(REQUEST_TIMEOUT_ENV).and_then(|v| v.trim().parse().ok()) {
            config.request_timeout = Some(Duration::from_millis(ms));
        }
        config
    }

    /// Sets the service name.
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("service", &self.service)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("has_http_client", &self.http_client.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_have_no_timeouts() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.service, DEFAULT_SERVICE_NAME);
        assert!(config.connect_timeout.is_none());
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("https://api.example.com/cards/")
            .with_service("Example")
            .with_connect_timeout(Duration::from_secs(2))
            .with_request_timeout(Duration::from_secs(10));
        assert_eq!(config.base_url, "https://api.example.com/cards/");
        assert_eq!(config.service, "Example");
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_from_vars() {
        let vars = HashMap::from([
            (BASE_URL_ENV, "http://localhost:9000/".to_owned()),
            (CONNECT_TIMEOUT_ENV, "250".to_owned()),
            (REQUEST_TIMEOUT_ENV, "soon".to_owned()),
            (SERVICE_NAME_ENV, "  ".to_owned()),
        ]);
        let config = ClientConfig::from_vars(|key| vars.get(key).cloned());
        assert_eq!(config.base_url, "http://localhost:9000/");
        assert_eq!(config.connect_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.service, DEFAULT_SERVICE_NAME);
    }
}
