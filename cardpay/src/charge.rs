//! The card-charge payload.
//!
//! Provides the schemas a `charge` request is checked against before it is
//! sent, and typed structs that serialize to the same wire shape.
//!
//! Required fields are `Amount` (at least [`MIN_AMOUNT`]), `IpAddress` and
//! `CardCryptogramPacket`. `Currency` and `CultureName` are limited to
//! [`CURRENCY_CHOICES`] and [`CULTURE_NAME_CHOICES`]. `Payer` and `JsonData`
//! are nested objects with optional string fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{FieldRule, Schema, SchemaError, SchemaRegistry};

/// Registry name of the card-charge request schema.
pub const CARD_CHARGE_SCHEMA: &str = "CardChargeRequest";

/// Registry name of the nested payer schema.
pub const PAYER_SCHEMA: &str = "PayerData";

/// Registry name of the nested free-form data schema.
pub const JSON_DATA_SCHEMA: &str = "JsonData";

/// Accepted values for `Currency`.
pub const CURRENCY_CHOICES: [&str; 4] = ["RUB", "USD", "EUR", "GBP"];

/// Accepted values for `CultureName`.
pub const CULTURE_NAME_CHOICES: [&str; 9] =
    ["ru-RU", "en-US", "lv", "az", "kk", "uk", "pl", "vi", "tr"];

/// Smallest chargeable amount, `0.01`.
pub const MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

const PAYER_FIELDS: [&str; 9] = [
    "FirstName",
    "LastName",
    "MiddleName",
    "Address",
    "Birth",
    "City",
    "Country",
    "Phone",
    "Postcode",
];

const JSON_DATA_FIELDS: [&str; 9] = [
    "name",
    "firstName",
    "middleName",
    "lastName",
    "nick",
    "phone",
    "address",
    "comment",
    "birthDate",
];

/// Schema for the `Payer` sub-object.
#[must_use]
pub fn payer_schema() -> Schema {
    Schema::new(PAYER_SCHEMA, PAYER_FIELDS.map(FieldRule::string))
}

/// Schema for the `JsonData` sub-object.
#[must_use]
pub fn json_data_schema() -> Schema {
    Schema::new(JSON_DATA_SCHEMA, JSON_DATA_FIELDS.map(FieldRule::string))
}

/// Schema for a card-charge request.
#[must_use]
pub fn card_charge_schema() -> Schema {
    Schema::new(
        CARD_CHARGE_SCHEMA,
        [
            FieldRule::number("Amount").required().min(MIN_AMOUNT),
            FieldRule::string("Currency").one_of(CURRENCY_CHOICES),
            FieldRule::ip_address("IpAddress").required(),
            FieldRule::string("CardCryptogramPacket").required(),
            FieldRule::string("Name"),
            FieldRule::url("PaymentUrl"),
            FieldRule::string("InvoiceId"),
            FieldRule::string("Description"),
            FieldRule::string("CultureName").one_of(CULTURE_NAME_CHOICES),
            FieldRule::string("AccountId"),
            FieldRule::email("Email"),
            FieldRule::nested("Payer", payer_schema()),
            FieldRule::nested("JsonData", json_data_schema()),
        ],
    )
}

/// Registers the charge schema and its nested schemas.
///
/// # Errors
///
/// Returns [`SchemaError::Duplicate`] if any of the names is already taken.
pub fn register(registry: &mut SchemaRegistry) -> Result<(), SchemaError> {
    registry.register(payer_schema())?;
    registry.register(json_data_schema())?;
    registry.register(card_charge_schema())?;
    Ok(())
}

/// A card-charge request.
///
/// Serializes with the service's field names. The amount goes on the wire as
/// a JSON number.
///
/// ```rust
/// use cardpay::charge::{self, ChargeRequest};
/// use rust_decimal::Decimal;
///
/// let request = ChargeRequest::new(Decimal::new(80, 2), "203.0.113.7", "cryptogram")
///     .with_currency("RUB")
///     .with_email("buyer@example.com");
///
/// let payload = request.to_payload().unwrap();
/// assert!(charge::card_charge_schema().validate(&payload).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChargeRequest {
    /// Amount to charge.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// ISO currency code, one of [`CURRENCY_CHOICES`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Payer IP address.
    pub ip_address: String,
    /// Encrypted card data produced by the checkout script.
    pub card_cryptogram_packet: String,
    /// Cardholder name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Page the payment was made from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    /// Merchant order number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    /// Payment description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Notification language, one of [`CULTURE_NAME_CHOICES`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture_name: Option<String>,
    /// Merchant-side payer identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Payer email for the receipt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Payer details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<Payer>,
    /// Arbitrary extra data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_data: Option<JsonData>,
}

impl ChargeRequest {
    /// Creates a request with only the required fields set.
    #[must_use]
    pub fn new(
        amount: Decimal,
        ip_address: impl Into<String>,
        card_cryptogram_packet: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            currency: None,
            ip_address: ip_address.into(),
            card_cryptogram_packet: card_cryptogram_packet.into(),
            name: None,
            payment_url: None,
            invoice_id: None,
            description: None,
            culture_name: None,
            account_id: None,
            email: None,
            payer: None,
            json_data: None,
        }
    }

    /// Sets the currency.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sets the notification language.
    #[must_use]
    pub fn with_culture_name(mut self, culture_name: impl Into<String>) -> Self {
        self.culture_name = Some(culture_name.into());
        self
    }

    /// Sets the cardholder name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the invoice id.
    #[must_use]
    pub fn with_invoice_id(mut self, invoice_id: impl Into<String>) -> Self {
        self.invoice_id = Some(invoice_id.into());
        self
    }

    /// Sets the page the payment was made from.
    #[must_use]
    pub fn with_payment_url(mut self, payment_url: impl Into<String>) -> Self {
        self.payment_url = Some(payment_url.into());
        self
    }

    /// Sets the payment description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the merchant-side payer identifier.
    #[must_use]
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Sets the receipt email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the payer details.
    #[must_use]
    pub fn with_payer(mut self, payer: Payer) -> Self {
        self.payer = Some(payer);
        self
    }

    /// Sets the extra data block.
    #[must_use]
    pub fn with_json_data(mut self, json_data: JsonData) -> Self {
        self.json_data = Some(json_data);
        self
    }

    /// Converts the request into the JSON payload sent on the wire.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Encode`] if serialization fails.
    pub fn to_payload(&self) -> Result<Value, SchemaError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Payer details attached to a charge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct Payer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
}

/// Free-form data stored with the transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct JsonData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ViolationKind;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "Amount": "0.8",
            "Currency": "RUB",
            "IpAddress": "0.0.0.0",
            "CardCryptogramPacket": "test",
            "Name": "test",
            "CultureName": "ru-RU",
            "Email": "smth@mail.com",
            "Payer": { "FirstName": "test", "LastName": "test" },
        })
    }

    #[test]
    fn test_sample_payload_is_valid() {
        assert!(card_charge_schema().validate(&sample_payload()).is_ok());
    }

    #[test]
    fn test_register_adds_all_schemas() {
        let mut registry = SchemaRegistry::new();
        register(&mut registry).unwrap();
        assert!(registry.contains(CARD_CHARGE_SCHEMA));
        assert!(registry.contains(PAYER_SCHEMA));
        assert!(registry.contains(JSON_DATA_SCHEMA));
        assert!(matches!(
            register(&mut registry),
            Err(SchemaError::Duplicate(_))
        ));
    }

    #[test]
    fn test_each_required_field_is_reported() {
        for field in ["Amount", "IpAddress", "CardCryptogramPacket"] {
            let mut payload = sample_payload();
            payload.as_object_mut().unwrap().remove(field);
            let err = card_charge_schema().validate(&payload).unwrap_err();
            let violation = err.violation_at(field).unwrap();
            assert_eq!(violation.kind, ViolationKind::MissingRequired);
        }
    }

    #[test]
    fn test_enumerations() {
        let mut payload = sample_payload();
        payload["Currency"] = json!("JPY");
        payload["CultureName"] = json!("de-DE");
        let err = card_charge_schema().validate(&payload).unwrap_err();
        let kinds: Vec<_> = err.violations().iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![ViolationKind::NotAllowed; 2]);
    }

    #[test]
    fn test_nested_payer_type_errors() {
        let mut payload = sample_payload();
        payload["Payer"] = json!({ "FirstName": 7 });
        payload["JsonData"] = json!({ "comment": ["a"] });
        let err = card_charge_schema().validate(&payload).unwrap_err();
        let paths: Vec<_> = err.violations().iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["Payer.FirstName", "JsonData.comment"]);
    }

    #[test]
    fn test_typed_request_serializes_to_wire_shape() {
        let request = ChargeRequest::new(Decimal::new(80, 2), "0.0.0.0", "test")
            .with_currency("RUB")
            .with_culture_name("ru-RU")
            .with_payer(Payer {
                first_name: Some("test".into()),
                ..Payer::default()
            })
            .with_json_data(JsonData {
                birth_date: Some("1990-01-01".into()),
                ..JsonData::default()
            });

        let payload = request.to_payload().unwrap();
        assert_eq!(
            payload,
            json!({
                "Amount": 0.8,
                "Currency": "RUB",
                "IpAddress": "0.0.0.0",
                "CardCryptogramPacket": "test",
                "CultureName": "ru-RU",
                "Payer": { "FirstName": "test" },
                "JsonData": { "birthDate": "1990-01-01" },
            })
        );
        assert!(card_charge_schema().validate(&payload).is_ok());
    }

    #[test]
    fn test_typed_request_below_minimum_fails_validation() {
        let payload = ChargeRequest::new(Decimal::ZERO, "0.0.0.0", "test")
            .to_payload()
            .unwrap();
        let err = card_charge_schema().validate(&payload).unwrap_err();
        assert_eq!(
            err.violation_at("Amount").map(|v| v.kind),
            Some(ViolationKind::OutOfRange)
        );
    }

    #[test]
    fn test_optional_string_builders() {
        let request = ChargeRequest::new(Decimal::ONE, "0.0.0.0", "test")
            .with_name("CARDHOLDER")
            .with_invoice_id("1234567")
            .with_description("Order 1234567")
            .with_account_id("user_x")
            .with_payment_url("https://shop.example.com/checkout")
            .with_email("buyer@example.com");

        let payload = request.to_payload().unwrap();
        assert_eq!(payload["Description"], "Order 1234567");
        assert_eq!(payload["AccountId"], "user_x");
        assert_eq!(payload["PaymentUrl"], "https://shop.example.com/checkout");
        assert!(card_charge_schema().validate(&payload).is_ok());

        let bad_url = request
            .with_payment_url("not a url")
            .to_payload()
            .unwrap();
        let err = card_charge_schema().validate(&bad_url).unwrap_err();
        assert_eq!(
            err.violation_at("PaymentUrl").map(|v| v.kind),
            Some(ViolationKind::InvalidFormat)
        );
    }
}
