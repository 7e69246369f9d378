//! API credentials.

use std::fmt;
use std::sync::Arc;

use crate::constants::{API_SECRET_ENV, PUBLIC_ID_ENV};
use crate::error::ClientError;

/// Public id and API secret used to sign every request.
///
/// Immutable once built. The secret is never printed: [`fmt::Debug`] redacts
/// it and no error type carries it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    public_id: Arc<str>,
    api_secret: Arc<str>,
}

impl Credentials {
    /// Creates credentials from a public id and an API secret.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::EmptyCredential`] if either value is empty.
    pub fn new(
        public_id: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let public_id = public_id.into();
        let api_secret = api_secret.into();
        if public_id.is_empty() {
            return Err(ClientError::EmptyCredential("public id"));
        }
        if api_secret.is_empty() {
            return Err(ClientError::EmptyCredential("api secret"));
        }
        Ok(Self {
            public_id: Arc::from(public_id),
            api_secret: Arc::from(api_secret),
        })
    }

    /// Reads `CARDPAY_PUBLIC_ID` and `CARDPAY_API_SECRET` from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingEnv`] if a variable is unset, or
    /// [`ClientError::EmptyCredential`] if it is empty.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let public_id = lookup(PUBLIC_ID_ENV).ok_or(ClientError::MissingEnv(PUBLIC_ID_ENV))?;
        let api_secret = lookup(API_SECRET_ENV).ok_or(ClientError::MissingEnv(API_SECRET_ENV))?;
        Self::new(public_id, api_secret)
    }

    /// The public id.
    #[must_use]
    pub fn public_id(&self) -> &str {
        &self.public_id
    }

    /// The API secret.
    #[must_use]
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("public_id", &self.public_id)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
