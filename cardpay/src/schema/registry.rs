//! Named schema registry.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde_json::Value;

use super::{FieldRule, Schema, SchemaError};

/// A set of schemas addressed by name.
///
/// Schemas can be added but never replaced or removed, so anything holding a
/// shared reference to the registry sees a stable set of rule tables.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a schema under `name` from an ordered list of rules.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Duplicate`] if `name` is already taken.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        rules: impl IntoIterator<Item = FieldRule>,
    ) -> Result<&Schema, SchemaError> {
        let name = name.into();
        let schema = Schema::new(name.clone(), rules);
        self.insert(name, schema)
    }

    /// Registers an already-built schema under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Duplicate`] if the name is already taken.
    pub fn register(&mut self, schema: Schema) -> Result<&Schema, SchemaError> {
        self.insert(schema.name().to_owned(), schema)
    }

    fn insert(&mut self, name: String, schema: Schema) -> Result<&Schema, SchemaError> {
        match self.schemas.entry(name) {
            Entry::Occupied(entry) => Err(SchemaError::Duplicate(entry.key().clone())),
            Entry::Vacant(entry) => {
                #[cfg(feature = "telemetry")]
                tracing::debug!(
                    schema = %entry.key(),
                    rules = schema.rules().len(),
                    "Registered payload schema"
                );
                Ok(entry.insert(schema))
            }
        }
    }

    /// Looks up a schema by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Returns `true` if a schema named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Names of all registered schemas, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Checks `payload` against the schema named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Unknown`] if no such schema exists, or
    /// [`SchemaError::Invalid`] with every violation found.
    pub fn validate(&self, name: &str, payload: &Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::Unknown(name.to_owned()))?;
        let result = schema.validate(payload);

        #[cfg(feature = "telemetry")]
        if let Err(err) = &result {
            tracing::debug!(
                schema = name,
                violations = err.violations().len(),
                "Payload failed schema validation"
            );
        }

        result.map_err(SchemaError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ViolationKind;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .define("Ping", [FieldRule::string("Echo").required()])
            .unwrap();
        registry
    }

    #[test]
    fn test_define_and_validate() {
        let registry = registry();
        assert!(registry.contains("Ping"));
        assert!(registry.validate("Ping", &json!({ "Echo": "hi" })).is_ok());

        let err = registry.validate("Ping", &json!({})).unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "Echo");
        assert_eq!(violations[0].kind, ViolationKind::MissingRequired);
    }

    #[test]
    fn test_duplicate_definition_is_rejected() {
        let mut registry = registry();
        let err = registry
            .define("Ping", [FieldRule::number("Other")])
            .unwrap_err();
        assert!(matches!(err, SchemaError::Duplicate(name) if name == "Ping"));

        // The original rules are untouched.
        assert!(registry.get("Ping").unwrap().rule("Echo").is_some());
        assert!(registry.get("Ping").unwrap().rule("Other").is_none());
    }

    #[test]
    fn test_unknown_schema() {
        let err = registry().validate("Pong", &json!({})).unwrap_err();
        assert!(matches!(&err, SchemaError::Unknown(name) if name == "Pong"));
        assert!(err.violations().is_none());
    }

    #[test]
    fn test_register_built_schema() {
        let mut registry = SchemaRegistry::new();
        let schema = Schema::new("Tag", [FieldRule::string("Label")]);
        registry.register(schema.clone()).unwrap();
        assert_eq!(registry.get("Tag"), Some(&schema));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Tag"]);
    }
}
