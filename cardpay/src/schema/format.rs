//! Syntactic checks for format-typed fields.
//!
//! These only look at the text. Nothing here resolves hosts or touches the
//! network.

use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// URL schemes accepted by [`is_url`].
pub const URL_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Returns `true` if `text` is an IPv4 or IPv6 literal.
#[must_use]
pub fn is_ip_address(text: &str) -> bool {
    text.parse::<IpAddr>().is_ok()
}

/// Returns `true` if `text` is an absolute URL with a host and one of the
/// [`URL_SCHEMES`].
#[must_use]
pub fn is_url(text: &str) -> bool {
    Url::parse(text).is_ok_and(|url| URL_SCHEMES.contains(&url.scheme()) && url.host().is_some())
}

/// Returns `true` if `text` looks like `local@domain.tld`.
#[must_use]
pub fn is_email(text: &str) -> bool {
    EMAIL_PATTERN.is_match(text)
}
