//! Account balance queries.

use std::fmt;

use crate::credential::SecurityCredential;
use crate::error::ValidationError;
use crate::proto::payload::BalancePayload;
use crate::proto::{ACCOUNT_BALANCE, IdentifierType};
use crate::request::{
    DEFAULT_REMARKS, REDACTED, Validate, callback_urls, check_short_code, choice,
    default_if_empty, require_credential,
};

/// Requests the balance of a short code.
///
/// The balance itself is delivered to `result_url`.
#[derive(Clone, Default)]
pub struct BalanceQuery {
    /// API operator username.
    pub initiator_name: String,
    /// API operator password, encrypted into the security credential.
    pub initiator_password: String,
    /// Short code whose balance is requested.
    pub short_code: String,
    /// `"1"`, `"2"` or `"4"`; empty selects organization (`"4"`).
    pub identifier_type: String,
    /// URL receiving the balance.
    pub result_url: String,
    /// URL notified on queue timeout; defaults to `result_url`.
    pub timeout_url: String,
    /// Defaults to `"empty remarks"`.
    pub remarks: String,
}

impl BalanceQuery {
    fn check(&mut self) -> Result<IdentifierType, ValidationError> {
        check_short_code(&self.short_code, "short code")?;
        let identifier_type = choice(
            &mut self.identifier_type,
            "identifier type",
            IdentifierType::Organization,
            IdentifierType::from_wire,
            IdentifierType::as_str,
        )?;
        require_credential(&self.initiator_name, "initiator name")?;
        require_credential(&self.initiator_password, "initiator password")?;
        callback_urls(&self.result_url, &mut self.timeout_url)?;
        default_if_empty(&mut self.remarks, DEFAULT_REMARKS);
        Ok(identifier_type)
    }

    /// Validates the query and builds its wire payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn into_payload(
        mut self,
        security_credential: SecurityCredential,
    ) -> Result<BalancePayload, ValidationError> {
        let identifier_type = self.check()?;
        Ok(BalancePayload {
            initiator: self.initiator_name,
            security_credential,
            command_id: ACCOUNT_BALANCE,
            party_a: self.short_code,
            identifier_type,
            remarks: self.remarks,
            queue_timeout_url: self.timeout_url,
            result_url: self.result_url,
        })
    }
}

impl Validate for BalanceQuery {
    fn validate(&mut self) -> Result<(), ValidationError> {
        self.check().map(drop)
    }
}

impl fmt::Debug for BalanceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BalanceQuery")
            .field("initiator_name", &self.initiator_name)
            .field("initiator_password", &REDACTED)
            .field("short_code", &self.short_code)
            .field("identifier_type", &self.identifier_type)
            .field("result_url", &self.result_url)
            .field("timeout_url", &self.timeout_url)
            .field("remarks", &self.remarks)
            .finish()
    }
}
