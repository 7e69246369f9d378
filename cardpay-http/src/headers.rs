//! Per-request header assembly.
//!
//! Every call gets a fresh correlation id under `X-Request-ID` and a fresh
//! `Authentication: Basic <base64(public_id:secret)>` header. Caller-supplied
//! headers are merged last and replace any header with the same name.

use base64::prelude::*;
use http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use crate::constants::{AUTHENTICATION_HEADER, BASIC_SCHEME, REQUEST_ID_HEADER};
use crate::credentials::Credentials;

/// Encodes `login:password` in standard Base64, as used by HTTP Basic auth.
#[must_use]
pub fn encode_basic_credentials(login: &str, password: &str) -> String {
    BASE64_STANDARD.encode(format!("{login}:{password}"))
}

/// Builds the full `Basic <credentials>` header value text.
#[must_use]
pub fn basic_auth_value(credentials: &Credentials) -> String {
    let encoded = encode_basic_credentials(credentials.public_id(), credentials.api_secret());
    format!("{BASIC_SCHEME} {encoded}")
}

/// Generates a new random correlation id.
#[must_use]
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Assembles the headers for one outbound request.
///
/// The authentication value is marked sensitive so it is hidden from
/// `Debug` output.
#[must_use]
pub fn assemble(credentials: &Credentials, extra: Option<&HeaderMap>) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(2 + extra.map_or(0, HeaderMap::len));
    headers.insert(
        HeaderName::from_static("x-request-id"),
        ascii_value(new_request_id()),
    );

    let mut auth = ascii_value(basic_auth_value(credentials));
    auth.set_sensitive(true);
    headers.insert(HeaderName::from_static("authentication"), auth);

    if let Some(extra) = extra {
        for name in extra.keys() {
            headers.remove(name);
        }
        for (name, value) in extra {
            headers.append(name, value.clone());
        }
    }
    headers
}

/// Returns the correlation id carried by `headers`, if any.
#[must_use]
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
}

/// Returns the authentication header value carried by `headers`, if any.
#[must_use]
pub fn authentication(headers: &HeaderMap) -> Option<&HeaderValue> {
    headers.get(AUTHENTICATION_HEADER)
}

/// Base64 output and hyphenated UUIDs are visible ASCII.
fn ascii_value(text: String) -> HeaderValue {
    HeaderValue::try_from(text).expect("generated header text is visible ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn credentials() -> Credentials {
        Credentials::new("pk_abc", "sec_def").unwrap()
    }

    #[test]
    fn test_basic_credentials_encoding() {
        assert_eq!(
            encode_basic_credentials("pk_abc", "sec_def"),
            "cGtfYWJjOnNlY19kZWY="
        );
        assert_eq!(
            basic_auth_value(&credentials()),
            "Basic cGtfYWJjOnNlY19kZWY="
        );
    }

    #[test]
    fn test_assemble_has_exactly_one_of_each() {
        let headers = assemble(&credentials(), None);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get_all(REQUEST_ID_HEADER).iter().count(), 1);
        assert_eq!(headers.get_all(AUTHENTICATION_HEADER).iter().count(), 1);
        assert_eq!(
            authentication(&headers).unwrap(),
            "Basic cGtfYWJjOnNlY19kZWY="
        );
        assert!(authentication(&headers).unwrap().is_sensitive());
    }

    #[test]
    fn test_request_id_is_a_uuid() {
        let headers = assemble(&credentials(), None);
        let id = request_id(&headers).unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_request_ids_are_fresh_per_call() {
        let ids: HashSet<String> = (0..256)
            .map(|_| request_id(&assemble(&credentials(), None)).unwrap().to_owned())
            .collect();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn test_caller_headers_take_precedence() {
        let mut extra = HeaderMap::new();
        extra.insert("x-request-id", HeaderValue::from_static("fixed-id"));
        extra.insert("X-Trace", HeaderValue::from_static("on"));

        let headers = assemble(&credentials(), Some(&extra));
        assert_eq!(request_id(&headers), Some("fixed-id"));
        assert_eq!(headers.get_all(REQUEST_ID_HEADER).iter().count(), 1);
        assert_eq!(headers.get("x-trace").unwrap(), "on");
        assert!(authentication(&headers).is_some());
    }

    #[test]
    fn test_debug_hides_authentication() {
        let headers = assemble(&credentials(), None);
        let printed = format!("{headers:?}");
        assert!(!printed.contains("cGtfYWJjOnNlY19kZWY="));
    }
}
