//! Business-to-customer disbursements.

use std::fmt;

use crate::credential::SecurityCredential;
use crate::error::ValidationError;
use crate::proto::B2cCommand;
use crate::proto::payload::B2cPayload;
use crate::request::{
    DEFAULT_REMARKS, REDACTED, Validate, callback_urls, check_short_code, choice,
    default_if_empty, normalize_phone, require_credential,
};

/// Pays a subscriber from an organization's short code.
///
/// # Example
///
/// ```rust
/// use daraja::request::{B2cRequest, Validate};
///
/// let mut request = B2cRequest {
///     initiator_name: "testapi".into(),
///     initiator_password: "Safaricom999!*!".into(),
///     short_code: "600981".into(),
///     phone_number: "0712345678".into(),
///     amount: 100,
///     result_url: "https://example.com/b2c/result".into(),
///     ..Default::default()
/// };
/// request.validate().unwrap();
/// assert_eq!(request.command_id, "BusinessPayment");
/// assert_eq!(request.timeout_url, "https://example.com/b2c/result");
/// ```
#[derive(Clone, Default)]
pub struct B2cRequest {
    /// API operator username.
    pub initiator_name: String,
    /// API operator password, encrypted into the security credential.
    pub initiator_password: String,
    /// Paying short code.
    pub short_code: String,
    /// Receiving subscriber; normalized to an MSISDN.
    pub phone_number: String,
    /// Whole shillings, greater than zero.
    pub amount: u64,
    /// `SalaryPayment`, `BusinessPayment` or `PromotionPayment`; empty
    /// selects `BusinessPayment`.
    pub command_id: String,
    /// URL receiving the transaction result.
    pub result_url: String,
    /// URL notified on queue timeout; defaults to `result_url`.
    pub timeout_url: String,
    /// Defaults to `"empty remarks"`.
    pub remarks: String,
    /// Optional free text.
    pub occasion: String,
}

impl B2cRequest {
    fn check(&mut self) -> Result<B2cCommand, ValidationError> {
        check_short_code(&self.short_code, "short code")?;
        require_credential(&self.initiator_name, "initiator name")?;
        require_credential(&self.initiator_password, "initiator password")?;
        normalize_phone(&mut self.phone_number)?;
        let command = choice(
            &mut self.command_id,
            "command id",
            B2cCommand::BusinessPayment,
            B2cCommand::from_wire,
            B2cCommand::as_str,
        )?;
        if self.amount == 0 {
            return Err(ValidationError::NonPositiveAmount("amount"));
        }
        callback_urls(&self.result_url, &mut self.timeout_url)?;
        default_if_empty(&mut self.remarks, DEFAULT_REMARKS);
        Ok(command)
    }

    /// Validates the request and builds its wire payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn into_payload(
        mut self,
        security_credential: SecurityCredential,
    ) -> Result<B2cPayload, ValidationError> {
        let command_id = self.check()?;
        Ok(B2cPayload {
            initiator_name: self.initiator_name,
            security_credential,
            command_id,
            amount: self.amount.to_string(),
            party_a: self.short_code,
            party_b: self.phone_number,
            remarks: self.remarks,
            queue_timeout_url: self.timeout_url,
            result_url: self.result_url,
            occasion: self.occasion,
        })
    }
}

impl Validate for B2cRequest {
    fn validate(&mut self) -> Result<(), ValidationError> {
        self.check().map(drop)
    }
}

impl fmt::Debug for B2cRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("B2cRequest")
            .field("initiator_name", &self.initiator_name)
            .field("initiator_password", &REDACTED)
            .field("short_code", &self.short_code)
            .field("phone_number", &self.phone_number)
            .field("amount", &self.amount)
            .field("command_id", &self.command_id)
            .field("result_url", &self.result_url)
            .field("timeout_url", &self.timeout_url)
            .field("remarks", &self.remarks)
            .field("occasion", &self.occasion)
            .finish()
    }
}
