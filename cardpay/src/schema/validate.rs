//! Rule-table traversal.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::{Constraint, FieldKind, FieldRule, Schema, Violation, ViolationKind, format};

/// Checks a payload against a schema and returns every violation found.
pub(super) fn check_payload(schema: &Schema, payload: &Value) -> Vec<Violation> {
    let mut violations = Vec::new();
    match payload.as_object() {
        Some(object) => check_object(schema.rules(), object, "", &mut violations),
        None => violations.push(Violation::new("", ViolationKind::WrongType)),
    }
    violations
}

fn check_object(
    rules: &[FieldRule],
    object: &Map<String, Value>,
    prefix: &str,
    out: &mut Vec<Violation>,
) {
    for rule in rules {
        let path = join_path(prefix, rule.name());
        match object.get(rule.name()) {
            Some(value) => check_value(rule, value, &path, out),
            None if rule.is_required() => {
                out.push(Violation::new(path, ViolationKind::MissingRequired));
            }
            None => {}
        }
    }
}

fn check_value(rule: &FieldRule, value: &Value, path: &str, out: &mut Vec<Violation>) {
    match rule.kind() {
        FieldKind::Nested(schema) => match value.as_object() {
            Some(object) => check_object(schema.rules(), object, path, out),
            None => out.push(Violation::new(path, ViolationKind::WrongType)),
        },
        FieldKind::Number => match as_number(value) {
            Some(number) => out.extend(
                rule.constraints()
                    .iter()
                    .filter_map(|c| number.check(c))
                    .map(|kind| Violation::new(path, kind)),
            ),
            None => out.push(Violation::new(path, ViolationKind::WrongType)),
        },
        kind => match value.as_str() {
            Some(text) if !matches_format(kind, text) => {
                out.push(Violation::new(path, ViolationKind::InvalidFormat));
            }
            Some(text) => out.extend(
                rule.constraints()
                    .iter()
                    .filter_map(|c| c.check_str(text))
                    .map(|kind| Violation::new(path, kind)),
            ),
            None => out.push(Violation::new(path, ViolationKind::WrongType)),
        },
    }
}

/// Plain strings have no format; the pattern kinds must match theirs.
fn matches_format(kind: &FieldKind, text: &str) -> bool {
    match kind {
        FieldKind::IpAddress => format::is_ip_address(text),
        FieldKind::Url => format::is_url(text),
        FieldKind::Email => format::is_email(text),
        FieldKind::String | FieldKind::Number | FieldKind::Nested(_) => true,
    }
}

/// A numeric field value.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Exact(Decimal),
    /// Finite but outside the range [`Decimal`] can hold.
    Approximate(f64),
}

impl Number {
    fn check(self, constraint: &Constraint) -> Option<ViolationKind> {
        match self {
            Self::Exact(value) => constraint.check_number(value),
            Self::Approximate(value) => constraint.check_float(value),
        }
    }
}

/// Reads a JSON number, or a string holding one.
fn as_number(value: &Value) -> Option<Number> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_owned(),
        _ => return None,
    };
    parse_decimal(&text).map(Number::Exact).or_else(|| {
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Number::Approximate)
    })
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_owned()
    } else {
        format!("{prefix}.{field}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_number_accepts_numbers_and_numeric_strings() {
        assert_eq!(as_number(&json!(42)), Some(Number::Exact(Decimal::from(42))));
        assert_eq!(as_number(&json!("0.8")), Some(Number::Exact(Decimal::new(8, 1))));
        assert_eq!(
            as_number(&json!(" 12.50 ")),
            Some(Number::Exact(Decimal::new(1250, 2)))
        );
        assert_eq!(as_number(&json!("1e2")), Some(Number::Exact(Decimal::from(100))));
    }

    #[test]
    fn test_as_number_keeps_values_beyond_decimal_range() {
        assert_eq!(as_number(&json!(1e30)), Some(Number::Approximate(1e30)));
        assert_eq!(as_number(&json!("-2e40")), Some(Number::Approximate(-2e40)));
    }

    #[test]
    fn test_as_number_rejects_non_numbers() {
        assert_eq!(as_number(&json!("")), None);
        assert_eq!(as_number(&json!("abc")), None);
        assert_eq!(as_number(&json!("inf")), None);
        assert_eq!(as_number(&json!("NaN")), None);
        assert_eq!(as_number(&json!(false)), None);
        assert_eq!(as_number(&Value::Null), None);
        assert_eq!(as_number(&json!({ "n": 1 })), None);
    }

    #[test]
    fn test_huge_numbers_are_range_checked() {
        let schema = Schema::new(
            "S",
            [FieldRule::number("Amount")
                .required()
                .range(Decimal::new(1, 2), Decimal::from(1_000_000))],
        );
        let err = schema.validate(&json!({ "Amount": 1e30 })).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].path, "Amount");
        assert_eq!(err.violations()[0].kind, ViolationKind::OutOfRange);

        let err = schema.validate(&json!({ "Amount": "-1e35" })).unwrap_err();
        assert_eq!(err.violations()[0].kind, ViolationKind::OutOfRange);

        let unbounded = Schema::new(
            "S",
            [FieldRule::number("Amount").required().min(Decimal::new(1, 2))],
        );
        assert!(unbounded.validate(&json!({ "Amount": 1e30 })).is_ok());
    }

    #[test]
    fn test_plain_strings_have_no_format() {
        assert!(matches_format(&FieldKind::String, "anything at all"));
        assert!(!matches_format(&FieldKind::Email, "anything at all"));
        assert!(!matches_format(&FieldKind::IpAddress, "999.1.1.1"));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "Amount"), "Amount");
        assert_eq!(join_path("Payer", "FirstName"), "Payer.FirstName");
    }
}
