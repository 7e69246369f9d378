#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP client for the card-charging payment API.
//!
//! Wraps a pooled reqwest client with per-request authentication and
//! correlation headers, validates payloads against the schemas from the
//! [`cardpay`] crate before sending, and sorts every outcome into success,
//! validation error, transport error or service error.
//!
//! # Modules
//!
//! - [`client`] - The [`InteractionClient`] and its call pipeline
//! - [`config`] - Base URL, service name, timeouts and connection pool
//! - [`constants`] - Header names, default URLs and environment variable names
//! - [`credentials`] - Public id and API secret
//! - [`error`] - Construction and call error types
//! - [`headers`] - Basic credential encoding and per-request header assembly
//! - [`operation`] - Named remote operations
//!
//! # Feature Flags
//!
//! - `telemetry` (default) - Wraps each call in a `tracing` span with the
//!   operation, method and correlation id

pub mod client;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod headers;
pub mod operation;

pub use client::InteractionClient;
pub use config::ClientConfig;
pub use credentials::Credentials;
pub use error::{ClientError, InteractionError, ServiceError};
pub use operation::Operation;
