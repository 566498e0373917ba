//! Request bodies, one per operation.
//!
//! Payloads are only built from validated requests (see [`crate::request`]);
//! they are plain data with no checks of their own.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::credential::SecurityCredential;
use crate::proto::{B2cCommand, C2bCommand, IdentifierType, ResponseType};

/// Body of a push payment.
#[derive(Debug, Clone, Serialize)]
#[allow(missing_docs)]
pub struct StkPushPayload {
    /// Paybill or till receiving the payment.
    #[serde(rename = "BusinessShortCode")]
    pub business_short_code: String,
    /// `base64(short code + pass key + timestamp)`.
    #[serde(rename = "Password")]
    pub password: String,
    /// Timestamp the password was derived from.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "TransactionType")]
    pub transaction_type: C2bCommand,
    /// Whole shillings, sent as a string.
    #[serde(rename = "Amount")]
    pub amount: String,
    /// Paying subscriber.
    #[serde(rename = "PartyA")]
    pub party_a: String,
    /// Receiving short code.
    #[serde(rename = "PartyB")]
    pub party_b: String,
    /// Subscriber receiving the prompt.
    #[serde(rename = "PhoneNumber")]
    pub phone_number: String,
    #[serde(rename = "CallBackURL")]
    pub callback_url: String,
    #[serde(rename = "AccountReference")]
    pub account_reference: String,
    #[serde(rename = "TransactionDesc")]
    pub transaction_desc: String,
}

/// Body of a push payment status query.
#[derive(Debug, Clone, Serialize)]
#[allow(missing_docs)]
pub struct StkQueryPayload {
    #[serde(rename = "BusinessShortCode")]
    pub business_short_code: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
}

/// Body of a business-to-customer disbursement.
#[derive(Debug, Clone, Serialize)]
#[allow(missing_docs)]
pub struct B2cPayload {
    #[serde(rename = "InitiatorName")]
    pub initiator_name: String,
    #[serde(rename = "SecurityCredential")]
    pub security_credential: SecurityCredential,
    #[serde(rename = "CommandID")]
    pub command_id: B2cCommand,
    /// Whole shillings, sent as a string.
    #[serde(rename = "Amount")]
    pub amount: String,
    /// Paying short code.
    #[serde(rename = "PartyA")]
    pub party_a: String,
    /// Receiving subscriber.
    #[serde(rename = "PartyB")]
    pub party_b: String,
    #[serde(rename = "Remarks")]
    pub remarks: String,
    #[serde(rename = "QueueTimeOutURL")]
    pub queue_timeout_url: String,
    #[serde(rename = "ResultURL")]
    pub result_url: String,
    #[serde(rename = "Occassion")]
    pub occasion: String,
}

/// Body of an account balance query.
#[derive(Debug, Clone, Serialize)]
#[allow(missing_docs)]
pub struct BalancePayload {
    #[serde(rename = "Initiator")]
    pub initiator: String,
    #[serde(rename = "SecurityCredential")]
    pub security_credential: SecurityCredential,
    #[serde(rename = "CommandID")]
    pub command_id: &'static str,
    #[serde(rename = "PartyA")]
    pub party_a: String,
    #[serde(rename = "IdentifierType")]
    pub identifier_type: IdentifierType,
    #[serde(rename = "Remarks")]
    pub remarks: String,
    #[serde(rename = "QueueTimeOutURL")]
    pub queue_timeout_url: String,
    #[serde(rename = "ResultURL")]
    pub result_url: String,
}

/// Body of a transaction status query.
#[derive(Debug, Clone, Serialize)]
#[allow(missing_docs)]
pub struct TransactionStatusPayload {
    #[serde(rename = "CommandID")]
    pub command_id: &'static str,
    /// Organization or subscriber that took part in the transaction.
    #[serde(rename = "PartyA")]
    pub party_a: String,
    #[serde(rename = "IdentifierType")]
    pub identifier_type: IdentifierType,
    #[serde(rename = "Remarks")]
    pub remarks: String,
    #[serde(rename = "Initiator")]
    pub initiator: String,
    #[serde(rename = "SecurityCredential")]
    pub security_credential: SecurityCredential,
    #[serde(rename = "QueueTimeOutURL")]
    pub queue_timeout_url: String,
    #[serde(rename = "ResultURL")]
    pub result_url: String,
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,
    #[serde(rename = "Occasion")]
    pub occasion: String,
}

/// Body of a transaction reversal.
#[derive(Debug, Clone, Serialize)]
#[allow(missing_docs)]
pub struct ReversalPayload {
    #[serde(rename = "Initiator")]
    pub initiator: String,
    #[serde(rename = "SecurityCredential")]
    pub security_credential: SecurityCredential,
    #[serde(rename = "CommandID")]
    pub command_id: &'static str,
    /// Organization or subscriber that received the original transaction.
    #[serde(rename = "ReceiverParty")]
    pub receiver_party: String,
    #[serde(rename = "RecieverIdentifierType")]
    pub receiver_identifier_type: IdentifierType,
    /// Amount to reverse, already rounded to cents, sent as a JSON number.
    #[serde(rename = "Amount", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "Remarks")]
    pub remarks: String,
    #[serde(rename = "QueueTimeOutURL")]
    pub queue_timeout_url: String,
    #[serde(rename = "ResultURL")]
    pub result_url: String,
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,
    #[serde(rename = "Occasion")]
    pub occasion: String,
}

/// Body of a validation / confirmation URL registration.
#[derive(Debug, Clone, Serialize)]
#[allow(missing_docs)]
pub struct RegisterUrlsPayload {
    #[serde(rename = "ValidationURL")]
    pub validation_url: String,
    #[serde(rename = "ConfirmationURL")]
    pub confirmation_url: String,
    #[serde(rename = "ResponseType")]
    pub response_type: ResponseType,
    #[serde(rename = "ShortCode")]
    pub short_code: String,
}

/// Body of a customer-to-business payment simulation.
#[derive(Debug, Clone, Serialize)]
#[allow(missing_docs)]
pub struct C2bSimulatePayload {
    #[serde(rename = "ShortCode")]
    pub short_code: String,
    #[serde(rename = "CommandID")]
    pub command_id: C2bCommand,
    /// Whole shillings, sent as a string.
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Msisdn")]
    pub msisdn: String,
    /// Account number for paybill payments; ignored for till payments.
    #[serde(rename = "BillRefNumber")]
    pub bill_ref_number: String,
}
