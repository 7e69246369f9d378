//! The interaction client.
//!
//! [`InteractionClient`] runs every call through the same steps:
//!
//! 1. Assemble fresh headers (correlation id, Basic credentials, then caller
//!    headers). With `telemetry`, the rest of the call runs in a span tagged
//!    with the correlation id, and every outcome is recorded on it.
//! 2. If the [`Operation`] names a schema, validate the payload. A failure
//!    returns [`InteractionError::Validation`] and nothing is sent.
//! 3. Send the request over the shared connection pool with the configured
//!    timeouts. A failure to complete the exchange, including reading the
//!    response body, returns [`InteractionError::Transport`].
//! 4. Classify the response. A success status yields the parsed JSON body.
//!    Any other status yields [`InteractionError::Service`] with whatever
//!    `Status`/`Message` the body carried.
//!
//! The client is immutable after construction and holds no per-call state,
//! so clones and concurrent calls never interfere. Dropping a call's future
//! cancels it; reqwest discards or returns the connection as appropriate.
//!
//! ## Example
//!
//! ```no_run
//! use cardpay::ChargeRequest;
//! use cardpay_http::client::InteractionClient;
//! use rust_decimal::Decimal;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = InteractionClient::new("pk_public", "api_secret")?;
//! let request = ChargeRequest::new(Decimal::new(100, 0), "203.0.113.7", "cryptogram")
//!     .with_currency("RUB");
//! let body = client.charge_request(&request).await?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use cardpay::charge::{self, ChargeRequest};
use cardpay::schema::{Schema, SchemaError, SchemaRegistry};
use http::HeaderMap;
use serde_json::Value;
use url::Url;

#[cfg(feature = "telemetry")]
use std::fmt::Display;
#[cfg(feature = "telemetry")]
use tracing::{Instrument, Span};

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::{ClientError, InteractionError, ServiceError};
use crate::headers;
use crate::operation::Operation;

/// Client for the card-charging API.
///
/// Cloning is cheap and shares the connection pool and schema registry.
#[derive(Clone, Debug)]
pub struct InteractionClient {
    /// Base URL, always ending in exactly one `/`
    base_url: Url,
    /// Service name reported in errors
    service: String,
    credentials: Credentials,
    /// Shared reqwest client, owning the connection pool
    http: reqwest::Client,
    request_timeout: Option<Duration>,
    schemas: Arc<SchemaRegistry>,
}

impl InteractionClient {
    /// Creates a client for the default endpoint with no timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::EmptyCredential`] if either value is empty.
    pub fn new(
        public_id: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Self::with_config(
            Credentials::new(public_id, api_secret)?,
            ClientConfig::default(),
        )
    }

    /// Creates a client from credentials and configuration read from the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the credentials are missing or empty, or
    /// the configured base URL is invalid.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::with_config(Credentials::from_env()?, ClientConfig::from_env())
    }

    /// Creates a client from explicit configuration.
    ///
    /// The card-charge schemas are registered up front.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(&config.base_url)?;

        let http = match config.http_client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = config.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ClientError::HttpClient)?
            }
        };

        let mut schemas = SchemaRegistry::new();
        charge::register(&mut schemas)?;

        Ok(Self {
            base_url,
            service: config.service,
            credentials,
            http,
            request_timeout: config.request_timeout,
            schemas: Arc::new(schemas),
        })
    }

    /// Adds a schema that custom operations can refer to by name.
    ///
    /// Existing clones keep the registry they were created with.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Schema`] if the name is already registered.
    pub fn with_schema(mut self, schema: Schema) -> Result<Self, ClientError> {
        Arc::make_mut(&mut self.schemas).register(schema)?;
        Ok(self)
    }

    /// The normalized base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The service name reported in errors.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The credentials used to sign requests.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The configured request timeout, if any.
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// The schemas available to operations.
    #[must_use]
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Joins `relative` onto the base URL.
    ///
    /// Leading slashes on `relative` are dropped, so the result never has a
    /// doubled slash at the join.
    #[must_use]
    pub fn endpoint_url(&self, relative: &str) -> String {
        format!("{}{}", self.base_url, relative.trim_start_matches('/'))
    }

    /// Assembles fresh headers for one request.
    #[must_use]
    pub fn build_headers(&self, extra: Option<&HeaderMap>) -> HeaderMap {
        headers::assemble(&self.credentials, extra)
    }

    /// Validates `payload` against a registered schema without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the schema is unknown or the payload
    /// violates it.
    pub fn validate(&self, schema: &str, payload: &Value) -> Result<(), SchemaError> {
        self.schemas.validate(schema, payload)
    }

    /// Sends a card-charge request given as raw JSON.
    ///
    /// # Errors
    ///
    /// See [`Self::call`].
    pub async fn charge(&self, payload: &Value) -> Result<Value, InteractionError> {
        self.call(&Operation::CHARGE, payload).await
    }

    /// Sends a typed card-charge request.
    ///
    /// # Errors
    ///
    /// See [`Self::call`].
    pub async fn charge_request(&self, request: &ChargeRequest) -> Result<Value, InteractionError> {
        let payload = request.to_payload()?;
        self.charge(&payload).await
    }

    /// Invokes a named operation.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::Validation`] if the payload fails its
    /// schema, [`InteractionError::Transport`] if the exchange does not
    /// complete, or [`InteractionError::Service`] if the service answers with
    /// a non-success status.
    pub async fn call(
        &self,
        operation: &Operation,
        payload: &Value,
    ) -> Result<Value, InteractionError> {
        self.call_with_headers(operation, payload, None).await
    }

    /// Invokes a named operation with extra headers, which replace any
    /// generated header of the same name.
    ///
    /// # Errors
    ///
    /// See [`Self::call`].
    pub async fn call_with_headers(
        &self,
        operation: &Operation,
        payload: &Value,
        extra_headers: Option<&HeaderMap>,
    ) -> Result<Value, InteractionError> {
        let headers = self.build_headers(extra_headers);

        #[cfg(feature = "telemetry")]
        let span = call_span(operation, &headers);

        let call = async {
            let result = self.exchange(operation, headers, payload).await;
            record_result_on_span(&result);
            result
        };

        #[cfg(feature = "telemetry")]
        let call = call.instrument(span);

        call.await
    }

    /// Validates, sends and classifies one call.
    async fn exchange(
        &self,
        operation: &Operation,
        headers: HeaderMap,
        payload: &Value,
    ) -> Result<Value, InteractionError> {
        if let Some(schema) = operation.schema() {
            self.schemas.validate(schema, payload)?;
        }

        let method = operation.method();
        let transport = |source: reqwest::Error| InteractionError::Transport {
            operation: operation.name().to_owned(),
            method: method.clone(),
            source,
        };

        let url = self.endpoint_url(operation.path());

        #[cfg(feature = "telemetry")]
        tracing::debug!(%url, "Sending request");

        let mut request = self.http.request(method.clone(), url).headers(headers);
        if operation.sends_body() {
            request = request.json(payload);
        }
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if status.is_success() {
            return response.json::<Value>().await.map_err(transport);
        }

        // An unparseable error body leaves the service fields empty. An unreadable one is transport.
        let body = response.bytes().await.map_err(transport)?;
        Err(ServiceError::from_body(status, method.clone(), &self.service, &body).into())
    }
}

/// Parses a base URL, forcing exactly one trailing slash.
fn normalize_base_url(value: &str) -> Result<Url, ClientError> {
    let mut normalized = value.trim().trim_end_matches('/').to_owned();
    normalized.push('/');
    let url = Url::parse(&normalized).map_err(|source| ClientError::BaseUrl {
        url: value.to_owned(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::OpaqueBaseUrl(value.to_owned()));
    }
    Ok(url)
}

/// Span covering one HTTP exchange. Never records credentials.
#[cfg(feature = "telemetry")]
fn call_span(operation: &Operation, headers: &HeaderMap) -> Span {
    tracing::info_span!(
        "cardpay.client.call",
        operation = operation.name(),
        method = %operation.method(),
        request_id = headers::request_id(headers).unwrap_or_default(),
        otel.status_code = tracing::field::Empty,
        error.message = tracing::field::Empty,
    )
}

/// Records the outcome of a request on the current span.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::event!(tracing::Level::ERROR, error = %err, "Request to payment service failed");
        }
    }
}

/// Records the outcome of a request on the current span.
/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: std::fmt::Display>(_result: &Result<R, E>) {}
