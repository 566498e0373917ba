//! Push payment result callbacks.
//!
//! Once a subscriber accepts or dismisses a push payment prompt, the gateway
//! POSTs the outcome to the request's callback URL:
//!
//! ```json
//! {"Body":{"stkCallback":{
//!     "MerchantRequestID":"29115-34620561-1",
//!     "CheckoutRequestID":"ws_CO_191220191020363925",
//!     "ResultCode":0,
//!     "ResultDesc":"The service request is processed successfully.",
//!     "CallbackMetadata":{"Item":[
//!         {"Name":"Amount","Value":1.00},
//!         {"Name":"MpesaReceiptNumber","Value":"NLJ7RT61SV"},
//!         {"Name":"TransactionDate","Value":20191219102115},
//!         {"Name":"PhoneNumber","Value":254708374149}]}}}}
//! ```
//!
//! Failed payments carry no `CallbackMetadata`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "Body")]
    body: Body,
}

#[derive(Deserialize)]
struct Body {
    #[serde(rename = "stkCallback")]
    stk_callback: StkCallback,
}

#[derive(Deserialize)]
struct StkCallback {
    #[serde(rename = "MerchantRequestID", default)]
    merchant_request_id: String,
    #[serde(rename = "CheckoutRequestID", default)]
    checkout_request_id: String,
    #[serde(rename = "ResultCode")]
    result_code: i64,
    #[serde(rename = "ResultDesc", default)]
    result_desc: String,
    #[serde(rename = "CallbackMetadata")]
    metadata: Option<Metadata>,
}

#[derive(Deserialize)]
struct Metadata {
    #[serde(rename = "Item", default)]
    items: Vec<Item>,
}

#[derive(Deserialize)]
struct Item {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Value", default)]
    value: Value,
}

/// Flattened push payment outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStkCallback {
    /// Merchant-side identifier of the request.
    pub merchant_request_id: String,
    /// Identifier returned when the push payment was requested.
    pub checkout_request_id: String,
    /// `0` on success; any other value is a failure or cancellation.
    pub result_code: i64,
    /// Human-readable outcome.
    pub result_desc: String,
    /// Amount paid.
    pub amount: Option<Decimal>,
    /// M-Pesa receipt number.
    pub mpesa_receipt_number: Option<String>,
    /// Paying subscriber as an MSISDN.
    pub phone_number: Option<String>,
    /// Completion time as `YYYYMMDDHHMMSS`.
    pub transaction_date: Option<String>,
}

impl ParsedStkCallback {
    /// Returns `true` if the subscriber completed the payment.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result_code == 0
    }
}

/// Renders a metadata value that may arrive as a string or a number.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decodes a push payment callback body.
///
/// Unknown metadata items are ignored, as are values of an unexpected type.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the body is not a callback envelope.
pub fn parse_stk_callback(body: &[u8]) -> Result<ParsedStkCallback, serde_json::Error> {
    let callback = serde_json::from_slice::<Envelope>(body)?.body.stk_callback;
    let mut parsed = ParsedStkCallback {
        merchant_request_id: callback.merchant_request_id,
        checkout_request_id: callback.checkout_request_id,
        result_code: callback.result_code,
        result_desc: callback.result_desc,
        ..ParsedStkCallback::default()
    };
    for item in callback.metadata.into_iter().flat_map(|m| m.items) {
        match item.name.as_str() {
            "Amount" => {
                parsed.amount = scalar(&item.value).and_then(|s| Decimal::from_str(&s).ok());
            }
            "MpesaReceiptNumber" => parsed.mpesa_receipt_number = scalar(&item.value),
            "PhoneNumber" => parsed.phone_number = scalar(&item.value),
            "TransactionDate" => parsed.transaction_date = scalar(&item.value),
            _ => {}
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS: &str = r#"{"Body":{"stkCallback":{
        "MerchantRequestID":"29115-34620561-1",
        "CheckoutRequestID":"ws_CO_191220191020363925",
        "ResultCode":0,
        "ResultDesc":"The service request is processed successfully.",
        "CallbackMetadata":{"Item":[
            {"Name":"Amount","Value":1.00},
            {"Name":"MpesaReceiptNumber","Value":"NLJ7RT61SV"},
            {"Name":"Balance"},
            {"Name":"TransactionDate","Value":20191219102115},
            {"Name":"PhoneNumber","Value":254708374149}]}}}}"#;

    const CANCELLED: &str = r#"{"Body":{"stkCallback":{
        "MerchantRequestID":"29115-34620561-1",
        "CheckoutRequestID":"ws_CO_191220191020363925",
        "ResultCode":1032,
        "ResultDesc":"Request cancelled by user."}}}"#;

    #[test]
    fn test_parse_success() {
        let parsed = parse_stk_callback(SUCCESS.as_bytes()).unwrap();
        assert!(parsed.is_success());
        assert_eq!(parsed.checkout_request_id, "ws_CO_191220191020363925");
        assert_eq!(parsed.amount, Some(Decimal::ONE));
        assert_eq!(parsed.mpesa_receipt_number.as_deref(), Some("NLJ7RT61SV"));
        assert_eq!(parsed.phone_number.as_deref(), Some("254708374149"));
        assert_eq!(parsed.transaction_date.as_deref(), Some("20191219102115"));
    }

    #[test]
    fn test_parse_cancelled() {
        let parsed = parse_stk_callback(CANCELLED.as_bytes()).unwrap();
        assert!(!parsed.is_success());
        assert_eq!(parsed.result_code, 1032);
        assert_eq!(parsed.result_desc, "Request cancelled by user.");
        assert_eq!(parsed.amount, None);
        assert_eq!(parsed.mpesa_receipt_number, None);
    }

    #[test]
    fn test_parse_rejects_other_bodies() {
        assert!(parse_stk_callback(b"{}").is_err());
        assert!(parse_stk_callback(b"not json").is_err());
    }
}
