//! Named operations exposed by the service.

use std::borrow::Cow;

use cardpay::charge::CARD_CHARGE_SCHEMA;
use http::Method;

use crate::constants::CHARGE_PATH;

/// Describes one remote operation: its name, HTTP method, path relative to
/// the base URL and, optionally, the schema its payload must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    name: Cow<'static, str>,
    method: Method,
    path: Cow<'static, str>,
    schema: Option<Cow<'static, str>>,
}

impl Operation {
    /// `POST charge`, checked against the card-charge schema.
    pub const CHARGE: Self = Self {
        name: Cow::Borrowed("charge"),
        method: Method::POST,
        path: Cow::Borrowed(CHARGE_PATH),
        schema: Some(Cow::Borrowed(CARD_CHARGE_SCHEMA)),
    };

    /// A `POST` operation without a schema.
    #[must_use]
    pub const fn post(name: &'static str, path: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            method: Method::POST,
            path: Cow::Borrowed(path),
            schema: None,
        }
    }

    /// An operation built at runtime.
    #[must_use]
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        method: Method,
        path: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            schema: None,
        }
    }

    /// Binds the payload to a registered schema.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<Cow<'static, str>>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Operation name, used in errors and telemetry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the client's base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name of the schema the payload is checked against, if any.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Whether the payload travels as a JSON request body.
    #[must_use]
    pub fn sends_body(&self) -> bool {
        self.method != Method::GET && self.method != Method::HEAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_operation() {
        let op = Operation::CHARGE;
        assert_eq!(op.name(), "charge");
        assert_eq!(op.method(), &Method::POST);
        assert_eq!(op.path(), "charge");
        assert_eq!(op.schema(), Some(CARD_CHARGE_SCHEMA));
        assert!(op.sends_body());
    }

    #[test]
    fn test_runtime_operation() {
        let op = Operation::new("find", Method::GET, String::from("find")).with_schema("Find");
        assert_eq!(op.schema(), Some("Find"));
        assert!(!op.sends_body());
    }
}
