//! Declarative payload schemas.
//!
//! A [`Schema`] is a named, immutable table of [`FieldRule`]s. Each rule names
//! one field of a JSON object and states whether it is required, which
//! [`FieldKind`] its value must have, and any extra [`Constraint`]s. A rule of
//! kind [`FieldKind::Nested`] carries another schema for a sub-object.
//!
//! Validation walks the table against a [`serde_json::Value`] and collects
//! every [`Violation`] in declaration order. Fields present in the payload but
//! absent from the table are ignored: a schema states the minimum shape, not
//! the exhaustive one.
//!
//! ```rust
//! use cardpay::schema::{FieldRule, Schema, ViolationKind};
//! use rust_decimal::Decimal;
//!
//! let schema = Schema::new(
//!     "Refund",
//!     [
//!         FieldRule::number("Amount").required().min(Decimal::ONE),
//!         FieldRule::string("Reason").one_of(["duplicate", "fraud"]),
//!     ],
//! );
//!
//! let err = schema
//!     .validate(&serde_json::json!({ "Reason": "other" }))
//!     .unwrap_err();
//! assert_eq!(err.violations()[0].kind, ViolationKind::MissingRequired);
//! assert_eq!(err.violations()[1].kind, ViolationKind::NotAllowed);
//! ```

pub mod format;
mod registry;
mod validate;

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

pub use registry::SchemaRegistry;

/// The primitive type a field value must have.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Any JSON string.
    String,
    /// A JSON number, or a string holding a decimal number.
    Number,
    /// A string holding an IPv4 or IPv6 literal.
    IpAddress,
    /// A string holding an absolute URL (see [`format::is_url`]).
    Url,
    /// A string holding an email address (see [`format::is_email`]).
    Email,
    /// A JSON object validated recursively against the given schema.
    Nested(Schema),
}

/// A value constraint applied after the type check has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Inclusive numeric bounds. Only applies to [`FieldKind::Number`].
    Range {
        /// Smallest accepted value.
        min: Option<Decimal>,
        /// Largest accepted value.
        max: Option<Decimal>,
    },
    /// The string value must be one of these. Applies to string-valued kinds.
    OneOf(Vec<String>),
}

impl Constraint {
    /// Checks a numeric value, returning the violation kind if it fails.
    #[must_use]
    pub fn check_number(&self, value: Decimal) -> Option<ViolationKind> {
        match self {
            Self::Range { min, max } => {
                let below = min.is_some_and(|min| value < min);
                let above = max.is_some_and(|max| value > max);
                (below || above).then_some(ViolationKind::OutOfRange)
            }
            Self::OneOf(_) => None,
        }
    }

    /// Checks a number too large or too small for [`Decimal`], comparing in `f64`.
    #[must_use]
    pub fn check_float(&self, value: f64) -> Option<ViolationKind> {
        match self {
            Self::Range { min, max } => {
                let below = min.and_then(|min| min.to_f64()).is_some_and(|min| value < min);
                let above = max.and_then(|max| max.to_f64()).is_some_and(|max| value > max);
                (below || above).then_some(ViolationKind::OutOfRange)
            }
            Self::OneOf(_) => None,
        }
    }

    /// Checks a string value, returning the violation kind if it fails.
    #[must_use]
    pub fn check_str(&self, value: &str) -> Option<ViolationKind> {
        match self {
            Self::OneOf(allowed) => {
                (!allowed.iter().any(|a| a == value)).then_some(ViolationKind::NotAllowed)
            }
            Self::Range { .. } => None,
        }
    }
}

/// The rule for a single payload field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    name: String,
    kind: FieldKind,
    required: bool,
    constraints: Vec<Constraint>,
}

impl FieldRule {
    /// Creates an optional, unconstrained rule.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            constraints: Vec::new(),
        }
    }

    /// Rule for a string field.
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    /// Rule for a numeric field.
    #[must_use]
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    /// Rule for an IP address field.
    #[must_use]
    pub fn ip_address(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::IpAddress)
    }

    /// Rule for a URL field.
    #[must_use]
    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Url)
    }

    /// Rule for an email field.
    #[must_use]
    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Email)
    }

    /// Rule for a sub-object validated against `schema`.
    #[must_use]
    pub fn nested(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, FieldKind::Nested(schema))
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Adds an inclusive lower bound.
    #[must_use]
    pub fn min(self, min: Decimal) -> Self {
        self.constrain(Constraint::Range {
            min: Some(min),
            max: None,
        })
    }

    /// Adds inclusive lower and upper bounds.
    #[must_use]
    pub fn range(self, min: Decimal, max: Decimal) -> Self {
        self.constrain(Constraint::Range {
            min: Some(min),
            max: Some(max),
        })
    }

    /// Restricts the value to an enumerated set of strings.
    #[must_use]
    pub fn one_of<I, S>(self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constrain(Constraint::OneOf(
            allowed.into_iter().map(Into::into).collect(),
        ))
    }

    /// Adds an arbitrary constraint.
    #[must_use]
    pub fn constrain(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// The field name as it appears in the payload.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The expected value kind.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether the field must be present.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Constraints applied after the type check.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

/// A named, immutable table of field rules.
///
/// Cloning is cheap: the rule table is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: Arc<str>,
    rules: Arc<[FieldRule]>,
}

impl Schema {
    /// Builds a schema from its rules, in the order violations will be reported.
    #[must_use]
    pub fn new(name: impl Into<String>, rules: impl IntoIterator<Item = FieldRule>) -> Self {
        Self {
            name: Arc::from(name.into()),
            rules: rules.into_iter().collect(),
        }
    }

    /// The schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rule table.
    #[must_use]
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Looks up the rule for a field.
    #[must_use]
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|rule| rule.name == field)
    }

    /// Checks `payload` against every rule.
    ///
    /// The result is a pure function of the schema and the payload.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] holding every violation found, in rule
    /// declaration order with nested violations inlined at their parent rule.
    pub fn validate(&self, payload: &Value) -> Result<(), ValidationError> {
        let violations = validate::check_payload(self, payload);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                schema: self.name.to_string(),
                violations,
            })
        }
    }
}

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A required field is absent.
    MissingRequired,
    /// The value has the wrong JSON type, or is `null`.
    WrongType,
    /// A numeric value is outside its configured bounds.
    OutOfRange,
    /// A string value is not in the allowed set.
    NotAllowed,
    /// A string value does not match its IP, URL or email pattern.
    InvalidFormat,
}

impl ViolationKind {
    /// Human-readable message for this kind.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingRequired => "missing required field",
            Self::WrongType => "wrong type",
            Self::OutOfRange => "out of range",
            Self::NotAllowed => "not an allowed value",
            Self::InvalidFormat => "invalid format",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A single field-level problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path from the payload root, e.g. `Payer.FirstName`.
    /// Empty when the payload itself is not an object.
    pub path: String,
    /// What went wrong.
    pub kind: ViolationKind,
}

impl Violation {
    /// Creates a violation.
    #[must_use]
    pub fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Human-readable message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.kind.message()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "<payload>: {}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

/// A payload failed its schema. Always holds at least one violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    schema: String,
    violations: Vec<Violation>,
}

impl ValidationError {
    /// Name of the schema the payload was checked against.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// All violations, in report order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes the error, returning its violations.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Returns the first violation reported for `path`, if any.
    #[must_use]
    pub fn violation_at(&self, path: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.path == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "payload does not match schema `{}`: ", self.schema)?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors from the schema registry.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A schema with this name is already registered.
    #[error("schema `{0}` is already defined")]
    Duplicate(String),

    /// No schema with this name is registered.
    #[error("schema `{0}` is not defined")]
    Unknown(String),

    /// The payload violates the schema.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A typed payload could not be turned into JSON for checking.
    #[error("payload could not be encoded as JSON: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SchemaError {
    /// The violations, when this error came from a failed check.
    #[must_use]
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::Invalid(err) => Some(err.violations()),
            _ => None,
        }
    }
}
