//! Wire-level constants for the card-charging API.

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Header carrying the Basic credentials.
///
/// The service reads `Authentication`, not the standard `Authorization`.
pub const AUTHENTICATION_HEADER: &str = "Authentication";

/// Scheme label prefixed to the encoded credentials.
pub const BASIC_SCHEME: &str = "Basic";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudpayments.ru/payments/cards/";

/// Default service name reported in errors.
pub const DEFAULT_SERVICE_NAME: &str = "CloudPayments";

/// Path of the charge operation relative to the base URL.
pub const CHARGE_PATH: &str = "charge";

/// Error-body field holding the service status code.
pub const ERROR_STATUS_FIELD: &str = "Status";

/// Error-body field holding the service message.
pub const ERROR_MESSAGE_FIELD: &str = "Message";

/// Environment variable holding the public id.
pub const PUBLIC_ID_ENV: &str = "CARDPAY_PUBLIC_ID";

/// Environment variable holding the API secret.
pub const API_SECRET_ENV: &str = "CARDPAY_API_SECRET";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "CARDPAY_BASE_URL";

/// Environment variable overriding the service name.
pub const SERVICE_NAME_ENV: &str = "CARDPAY_SERVICE_NAME";

/// Environment variable setting the connect timeout in milliseconds.
pub const CONNECT_TIMEOUT_ENV: &str = "CARDPAY_CONNECT_TIMEOUT_MS";

/// Environment variable setting the request timeout in milliseconds.
pub const REQUEST_TIMEOUT_ENV: &str = "CARDPAY_REQUEST_TIMEOUT_MS";
