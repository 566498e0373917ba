//! Wire types exchanged with the Daraja gateway.
//!
//! Field names on the wire are fixed, case-sensitive identifiers from the
//! gateway's schema, so every field carries an explicit `serde` rename.
//! Some of them are misspelled upstream (`Occassion`,
//! `RecieverIdentifierType`, `OriginatorCoversationID`); those spellings are
//! what the live API sends and accepts.
//!
//! # Modules
//!
//! - [`payload`] - Request bodies, one per operation

pub mod payload;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Endpoint paths, relative to the environment base URL.
pub mod paths {
    /// OAuth token endpoint (GET).
    pub const TOKEN: &str = "/oauth/v1/generate?grant_type=client_credentials";
    /// Push payment.
    pub const STK_PUSH: &str = "/mpesa/stkpush/v1/processrequest";
    /// Push payment status.
    pub const STK_QUERY: &str = "/mpesa/stkpushquery/v1/query";
    /// Business-to-customer disbursement.
    pub const B2C: &str = "/mpesa/b2c/v1/paymentrequest";
    /// Account balance query.
    pub const BALANCE: &str = "/mpesa/accountbalance/v1/query";
    /// Transaction status query.
    pub const TRANSACTION_STATUS: &str = "/mpesa/transactionstatus/v1/query";
    /// Transaction reversal.
    pub const REVERSAL: &str = "/mpesa/reversal/v1/request";
    /// Customer-to-business payment simulation.
    pub const C2B_SIMULATE: &str = "/mpesa/c2b/v1/simulate";
    /// Validation / confirmation URL registration.
    pub const REGISTER_URLS: &str = "/mpesa/c2b/v1/registerurl";
}

/// `CommandID` of a balance query.
pub const ACCOUNT_BALANCE: &str = "AccountBalance";

/// `CommandID` of a transaction status query.
pub const TRANSACTION_STATUS_QUERY: &str = "TransactionStatusQuery";

/// `CommandID` of a reversal.
pub const TRANSACTION_REVERSAL: &str = "TransactionReversal";

/// Kind of party taking part in a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IdentifierType {
    /// A subscriber phone number, wire value `"1"`.
    #[serde(rename = "1")]
    Msisdn,
    /// A till number, wire value `"2"`.
    #[serde(rename = "2")]
    TillNumber,
    /// An organization short code, wire value `"4"`.
    #[default]
    #[serde(rename = "4")]
    Organization,
}

impl IdentifierType {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Msisdn => "1",
            Self::TillNumber => "2",
            Self::Organization => "4",
        }
    }

    /// Parses a wire value.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "1" => Some(Self::Msisdn),
            "2" => Some(Self::TillNumber),
            "4" => Some(Self::Organization),
            _ => None,
        }
    }
}

/// `CommandID` of a business-to-customer disbursement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum B2cCommand {
    /// Salary payment to a registered or unregistered customer.
    SalaryPayment,
    /// Ordinary business payment.
    #[default]
    BusinessPayment,
    /// Promotional payment to a registered customer.
    PromotionPayment,
}

impl B2cCommand {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SalaryPayment => "SalaryPayment",
            Self::BusinessPayment => "BusinessPayment",
            Self::PromotionPayment => "PromotionPayment",
        }
    }

    /// Parses a wire value.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "SalaryPayment" => Some(Self::SalaryPayment),
            "BusinessPayment" => Some(Self::BusinessPayment),
            "PromotionPayment" => Some(Self::PromotionPayment),
            _ => None,
        }
    }
}

/// Kind of customer-to-business payment.
///
/// Used as the push-payment `TransactionType` and as the simulation
/// `CommandID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum C2bCommand {
    /// Payment to a paybill number.
    #[default]
    CustomerPayBillOnline,
    /// Payment to a till number.
    CustomerBuyGoodsOnline,
}

impl C2bCommand {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CustomerPayBillOnline => "CustomerPayBillOnline",
            Self::CustomerBuyGoodsOnline => "CustomerBuyGoodsOnline",
        }
    }

    /// Parses a wire value.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "CustomerPayBillOnline" => Some(Self::CustomerPayBillOnline),
            "CustomerBuyGoodsOnline" => Some(Self::CustomerBuyGoodsOnline),
            _ => None,
        }
    }
}

/// What the gateway does when the validation URL cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseType {
    /// Complete the payment.
    Completed,
    /// Cancel the payment.
    Cancelled,
}

impl ResponseType {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Parses a wire value.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "Completed" => Some(Self::Completed),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl Display for IdentifierType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for B2cCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for C2bCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for ResponseType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acknowledgement returned by the asynchronous transaction endpoints.
///
/// Shared by disbursement, balance query, transaction status, reversal and
/// payment simulation. The final result is delivered later to the request's
/// result URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiResponse {
    /// Gateway identifier of the request.
    #[serde(rename = "ConversationID")]
    pub conversation_id: String,

    /// Identifier echoed back in the result callback.
    #[serde(rename = "OriginatorConversationID")]
    pub originator_conversation_id: String,

    /// `"0"` when the request was accepted.
    #[serde(rename = "ResponseCode")]
    pub response_code: String,

    /// Human-readable acceptance status.
    #[serde(rename = "ResponseDescription")]
    pub response_description: String,
}

/// Former name of [`ApiResponse`] for disbursements.
#[deprecated(note = "use `ApiResponse`")]
pub type B2cResponse = ApiResponse;

/// Response to a URL registration.
///
/// Differs from [`ApiResponse`] only in the upstream spelling of
/// `OriginatorCoversationID`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterUrlResponse {
    /// Gateway identifier of the request.
    #[serde(rename = "ConversationID")]
    pub conversation_id: String,

    /// Originator identifier, sent under a misspelled key.
    #[serde(rename = "OriginatorCoversationID")]
    pub originator_conversation_id: String,

    /// `"0"` when the registration was accepted.
    #[serde(rename = "ResponseCode")]
    pub response_code: String,

    /// Human-readable registration status.
    #[serde(rename = "ResponseDescription")]
    pub response_description: String,
}

/// Response to a push payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StkPushResponse {
    /// Merchant-side identifier of the request.
    #[serde(rename = "MerchantRequestID")]
    pub merchant_request_id: String,

    /// Identifier used to query the payment and to match its callback.
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,

    /// `"0"` when the prompt was sent.
    #[serde(rename = "ResponseCode")]
    pub response_code: String,

    /// Human-readable acceptance status.
    #[serde(rename = "ResponseDescription")]
    pub response_description: String,

    /// Message suitable for the paying customer.
    #[serde(rename = "CustomerMessage")]
    pub customer_message: String,
}

/// Response to a push payment status query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StkQueryResponse {
    /// Merchant-side identifier of the original request.
    #[serde(rename = "MerchantRequestID")]
    pub merchant_request_id: String,

    /// Identifier of the queried payment.
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,

    /// `"0"` when the query was accepted.
    #[serde(rename = "ResponseCode")]
    pub response_code: String,

    /// Outcome of the payment, `"0"` on success.
    #[serde(rename = "ResultCode")]
    pub result_code: String,

    /// Human-readable acceptance status.
    #[serde(rename = "ResponseDescription")]
    pub response_description: String,

    /// Human-readable outcome of the payment.
    #[serde(rename = "ResultDesc")]
    pub result_desc: String,

    /// Message suitable for the paying customer.
    #[serde(rename = "CustomerMessage")]
    pub customer_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_type_wire_values() {
        assert_eq!(
            serde_json::to_string(&IdentifierType::Msisdn).unwrap(),
            "\"1\""
        );
        assert_eq!(IdentifierType::from_wire("2"), Some(IdentifierType::TillNumber));
        assert_eq!(IdentifierType::from_wire("3"), None);
        assert_eq!(IdentifierType::default(), IdentifierType::Organization);
    }

    #[test]
    fn test_command_defaults() {
        assert_eq!(B2cCommand::default().as_str(), "BusinessPayment");
        assert_eq!(C2bCommand::default().as_str(), "CustomerPayBillOnline");
        assert_eq!(B2cCommand::from_wire("Refund"), None);
        assert_eq!(ResponseType::from_wire(""), None);
    }

    #[test]
    fn test_api_response_decodes_exact_fields() {
        let json = r#"{
            "ConversationID": "AG_20191219_00005797af5d7d75f652",
            "OriginatorConversationID": "16740-34861180-1",
            "ResponseCode": "0",
            "ResponseDescription": "Accept the service request successfully."
        }"#;
        let res: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(res.conversation_id, "AG_20191219_00005797af5d7d75f652");
        assert_eq!(res.originator_conversation_id, "16740-34861180-1");
        assert_eq!(res.response_code, "0");
        assert_eq!(
            res.response_description,
            "Accept the service request successfully."
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let res: StkQueryResponse = serde_json::from_str(r#"{"ResultCode":"1032"}"#).unwrap();
        assert_eq!(res.result_code, "1032");
        assert!(res.checkout_request_id.is_empty());
    }

    #[test]
    fn test_register_url_response_keeps_upstream_spelling() {
        let json = r#"{"OriginatorCoversationID":"7619-37765134-1","ResponseCode":"0","ResponseDescription":"success"}"#;
        let res: RegisterUrlResponse = serde_json::from_str(json).unwrap();
        assert_eq!(res.originator_conversation_id, "7619-37765134-1");
        let encoded = serde_json::to_string(&res).unwrap();
        assert!(encoded.contains("\"OriginatorCoversationID\""));
    }

    #[test]
    #[allow(deprecated)]
    fn test_b2c_response_alias() {
        let res: B2cResponse = serde_json::from_str(r#"{"ResponseCode":"0"}"#).unwrap();
        assert_eq!(res, ApiResponse {
            response_code: "0".into(),
            ..ApiResponse::default()
        });
    }
}
