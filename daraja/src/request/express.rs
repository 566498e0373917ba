//! Push payment (Lipa Na M-Pesa Online) requests.

use std::fmt;

use crate::error::ValidationError;
use crate::proto::C2bCommand;
use crate::proto::payload::{StkPushPayload, StkQueryPayload};
use crate::request::{
    DEFAULT_ACCOUNT_REFERENCE, DEFAULT_TRANSACTION_DESC, REDACTED, Validate, check_short_code,
    choice, default_if_empty, normalize_phone, require_credential, require_field,
};
use crate::timestamp::{DarajaTimestamp, stk_password};

/// Prompts a subscriber to pay a paybill from their phone.
///
/// # Example
///
/// ```rust
/// use daraja::request::{ExpressRequest, Validate};
///
/// let mut request = ExpressRequest {
///     short_code: "174379".into(),
///     pass_key: "passkey".into(),
///     phone_number: "0712345678".into(),
///     callback_url: "https://example.com/stk".into(),
///     amount: 10,
///     ..Default::default()
/// };
/// request.validate().unwrap();
/// assert_eq!(request.phone_number, "254712345678");
/// assert_eq!(request.account_reference, "account");
/// ```
#[derive(Clone, Default)]
pub struct ExpressRequest {
    /// Paybill receiving the payment.
    pub short_code: String,
    /// Lipa Na M-Pesa Online pass key issued for the short code.
    pub pass_key: String,
    /// Only `CustomerPayBillOnline` is accepted; empty selects it.
    pub transaction_type: String,
    /// Subscriber to prompt; normalized to an MSISDN.
    pub phone_number: String,
    /// URL receiving the payment result.
    pub callback_url: String,
    /// Whole shillings, at least 1.
    pub amount: u64,
    /// Defaults to `"account"`.
    pub account_reference: String,
    /// Defaults to `"empty desc"`.
    pub transaction_desc: String,
}

impl ExpressRequest {
    fn check(&mut self) -> Result<C2bCommand, ValidationError> {
        check_short_code(&self.short_code, "short code")?;
        require_credential(&self.pass_key, "pass key")?;
        let transaction_type = choice(
            &mut self.transaction_type,
            "transaction type",
            C2bCommand::CustomerPayBillOnline,
            |value| {
                (value == C2bCommand::CustomerPayBillOnline.as_str())
                    .then_some(C2bCommand::CustomerPayBillOnline)
            },
            C2bCommand::as_str,
        )?;
        normalize_phone(&mut self.phone_number)?;
        if self.callback_url.is_empty() {
            return Err(ValidationError::MissingCallbackUrl("callback url"));
        }
        if self.amount < 1 {
            return Err(ValidationError::NonPositiveAmount("amount"));
        }
        default_if_empty(&mut self.account_reference, DEFAULT_ACCOUNT_REFERENCE);
        default_if_empty(&mut self.transaction_desc, DEFAULT_TRANSACTION_DESC);
        Ok(transaction_type)
    }

    /// Validates the request and builds its wire payload.
    ///
    /// The payload password is derived from `timestamp`, which is sent
    /// alongside it.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn into_payload(
        mut self,
        timestamp: &DarajaTimestamp,
    ) -> Result<StkPushPayload, ValidationError> {
        let transaction_type = self.check()?;
        Ok(StkPushPayload {
            password: stk_password(&self.short_code, &self.pass_key, timestamp),
            timestamp: timestamp.as_str().to_owned(),
            transaction_type,
            amount: self.amount.to_string(),
            party_a: self.phone_number.clone(),
            party_b: self.short_code.clone(),
            business_short_code: self.short_code,
            phone_number: self.phone_number,
            callback_url: self.callback_url,
            account_reference: self.account_reference,
            transaction_desc: self.transaction_desc,
        })
    }
}

impl Validate for ExpressRequest {
    fn validate(&mut self) -> Result<(), ValidationError> {
        self.check().map(drop)
    }
}

impl fmt::Debug for ExpressRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressRequest")
            .field("short_code", &self.short_code)
            .field("pass_key", &REDACTED)
            .field("transaction_type", &self.transaction_type)
            .field("phone_number", &self.phone_number)
            .field("callback_url", &self.callback_url)
            .field("amount", &self.amount)
            .field("account_reference", &self.account_reference)
            .field("transaction_desc", &self.transaction_desc)
            .finish()
    }
}

/// Queries the outcome of an earlier push payment.
#[derive(Clone, Default)]
pub struct ExpressQuery {
    /// Paybill the payment was made to.
    pub short_code: String,
    /// Lipa Na M-Pesa Online pass key issued for the short code.
    pub pass_key: String,
    /// `CheckoutRequestID` returned by the push payment.
    pub checkout_request_id: String,
}

impl ExpressQuery {
    /// Validates the query and builds its wire payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn into_payload(
        mut self,
        timestamp: &DarajaTimestamp,
    ) -> Result<StkQueryPayload, ValidationError> {
        self.validate()?;
        Ok(StkQueryPayload {
            password: stk_password(&self.short_code, &self.pass_key, timestamp),
            timestamp: timestamp.as_str().to_owned(),
            business_short_code: self.short_code,
            checkout_request_id: self.checkout_request_id,
        })
    }
}

impl Validate for ExpressQuery {
    fn validate(&mut self) -> Result<(), ValidationError> {
        check_short_code(&self.short_code, "short code")?;
        require_credential(&self.pass_key, "pass key")?;
        require_field(&self.checkout_request_id, "checkout request id")
    }
}

impl fmt::Debug for ExpressQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressQuery")
            .field("short_code", &self.short_code)
            .field("pass_key", &REDACTED)
            .field("checkout_request_id", &self.checkout_request_id)
            .finish()
    }
}
