//! Error types for the interaction client.

use std::fmt;

use cardpay::schema::{SchemaError, Violation};
use http::{Method, StatusCode};
use serde_json::Value;

use crate::constants::{ERROR_MESSAGE_FIELD, ERROR_STATUS_FIELD};

/// Errors that can occur while building a client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The public id or the API secret is empty.
    #[error("{0} must not be empty")]
    EmptyCredential(&'static str),

    /// A required environment variable is not set.
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    /// The base URL could not be parsed.
    #[error("invalid base URL `{url}`: {source}")]
    BaseUrl {
        /// The rejected URL.
        url: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// The base URL cannot have paths joined onto it (e.g. `mailto:`).
    #[error("base URL `{0}` cannot carry a path")]
    OpaqueBaseUrl(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// A schema could not be registered.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// The service was reached and answered with a non-success status.
///
/// `response_status` and `message` come from the `Status` and `Message`
/// fields of a JSON error body. Both are `None` when the body is not JSON or
/// lacks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    /// HTTP status code of the response.
    pub status: StatusCode,
    /// HTTP method of the request.
    pub method: Method,
    /// Name of the service that answered.
    pub service: String,
    /// Service-reported status or code.
    pub response_status: Option<String>,
    /// Service-reported human-readable message.
    pub message: Option<String>,
}

impl ServiceError {
    /// Builds an error from a failed response body.
    ///
    /// Never fails: anything that is not a JSON object leaves the service
    /// fields empty.
    #[must_use]
    pub fn from_body(status: StatusCode, method: Method, service: &str, body: &[u8]) -> Self {
        let fields = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Some(fields),
            _ => None,
        };
        let field = |name: &str| {
            fields
                .as_ref()
                .and_then(|fields| fields.get(name))
                .and_then(scalar_text)
        };
        Self {
            status,
            method,
            service: service.to_owned(),
            response_status: field(ERROR_STATUS_FIELD),
            message: field(ERROR_MESSAGE_FIELD),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} responded {} to {}",
            self.service, self.status, self.method
        )?;
        match (&self.response_status, &self.message) {
            (Some(status), Some(message)) => write!(f, ": {status}: {message}"),
            (Some(status), None) => write!(f, ": {status}"),
            (None, Some(message)) => write!(f, ": {message}"),
            (None, None) => Ok(()),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Every way a call can fail.
///
/// Exactly one variant is produced per failed call. Nothing is retried here.
#[derive(Debug, thiserror::Error)]
pub enum InteractionError {
    /// The payload failed local checks. No request was sent.
    #[error("{0}")]
    Validation(#[from] SchemaError),

    /// The HTTP exchange did not complete: connect, DNS, TLS, timeout,
    /// cancellation or an unreadable success body.
    #[error("transport error during {operation} ({method}): {source}")]
    Transport {
        /// Operation name.
        operation: String,
        /// HTTP method of the request.
        method: Method,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{0}")]
    Service(#[from] ServiceError),
}

impl InteractionError {
    /// The schema violations, if the payload was rejected locally.
    #[must_use]
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::Validation(err) => err.violations(),
            _ => None,
        }
    }

    /// The service error, if the service answered with a failure status.
    #[must_use]
    pub const fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if the call failed before the service answered.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` if the call failed because a timeout expired.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// HTTP status of the service response, if there was one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.service_error().map(|err| err.status)
    }
}
