#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Payload schemas for the card-charging payment API.
//!
//! This crate holds everything that can be decided about an outbound request
//! without touching the network. Payload shapes are declared as immutable rule
//! tables and checked before a request is ever built, so a caller sees every
//! field-level problem at once instead of a single rejection from the service.
//!
//! # Modules
//!
//! - [`schema`] - Declarative field rules, the schema registry and validation
//! - [`charge`] - The card-charge payload: its schemas and typed request structs
//!
//! # Feature Flags
//!
//! - `telemetry` - Emits `tracing` events for schema registration and validation failures

pub mod charge;
pub mod schema;

pub use charge::{ChargeRequest, JsonData, Payer};
pub use schema::{
    Constraint, FieldKind, FieldRule, Schema, SchemaError, SchemaRegistry, ValidationError,
    Violation, ViolationKind,
};
