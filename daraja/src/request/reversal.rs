//! Transaction reversals.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::credential::SecurityCredential;
use crate::error::ValidationError;
use crate::proto::payload::ReversalPayload;
use crate::proto::{IdentifierType, TRANSACTION_REVERSAL};
use crate::request::{
    DEFAULT_REMARKS, Party, REDACTED, Validate, callback_urls, default_if_empty, either,
    exclusive_party, party_identifier, require_credential, require_field,
};

/// Reverses a completed transaction.
///
/// The receiving party of the original transaction is given as exactly one
/// of `short_code` or `phone_number`.
///
/// # Example
///
/// ```rust
/// use daraja::request::{ReversalRequest, Validate};
/// use rust_decimal::Decimal;
///
/// let mut request = ReversalRequest {
///     transaction_id: "OEI2AK4Q16".into(),
///     initiator_name: "testapi".into(),
///     initiator_password: "secret".into(),
///     phone_number: "0712345678".into(),
///     amount: Decimal::new(10005, 3),
///     result_url: "https://example.com/reversal".into(),
///     ..Default::default()
/// };
/// request.validate().unwrap();
/// assert_eq!(request.receiver_party(), Some("254712345678"));
/// assert_eq!(request.amount, Decimal::new(1001, 2));
/// ```
#[derive(Clone, Default)]
pub struct ReversalRequest {
    /// M-Pesa receipt of the transaction to reverse.
    pub transaction_id: String,
    /// API operator username.
    pub initiator_name: String,
    /// API operator password, encrypted into the security credential.
    pub initiator_password: String,
    /// Organization receiver; mutually exclusive with `phone_number`.
    pub short_code: String,
    /// Subscriber receiver; mutually exclusive with `short_code`.
    pub phone_number: String,
    /// Amount to reverse, rounded half away from zero to cents.
    pub amount: Decimal,
    /// `"1"`, `"2"` or `"4"`; empty selects MSISDN for a phone number and
    /// organization otherwise.
    pub receiver_identifier_type: String,
    /// URL receiving the reversal result.
    pub result_url: String,
    /// URL notified on queue timeout; defaults to `result_url`.
    pub timeout_url: String,
    /// Defaults to `"empty remarks"`.
    pub remarks: String,
    /// Optional free text.
    pub occasion: String,
}

impl ReversalRequest {
    /// Returns the `ReceiverParty` value: the short code or the phone
    /// number, whichever is set.
    #[must_use]
    pub fn receiver_party(&self) -> Option<&str> {
        either(&self.short_code, &self.phone_number)
    }

    fn check(&mut self) -> Result<(Party, IdentifierType), ValidationError> {
        let party = exclusive_party(&self.short_code, &mut self.phone_number)?;
        self.amount = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount("amount"));
        }
        require_credential(&self.initiator_name, "initiator name")?;
        require_credential(&self.initiator_password, "initiator password")?;
        require_field(&self.transaction_id, "transaction id")?;
        callback_urls(&self.result_url, &mut self.timeout_url)?;
        default_if_empty(&mut self.remarks, DEFAULT_REMARKS);
        let identifier_type = party_identifier(
            &mut self.receiver_identifier_type,
            "receiver identifier type",
            &party,
        )?;
        Ok((party, identifier_type))
    }

    /// Validates the request and builds its wire payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn into_payload(
        mut self,
        security_credential: SecurityCredential,
    ) -> Result<ReversalPayload, ValidationError> {
        let (party, receiver_identifier_type) = self.check()?;
        Ok(ReversalPayload {
            initiator: self.initiator_name,
            security_credential,
            command_id: TRANSACTION_REVERSAL,
            receiver_party: party.id,
            receiver_identifier_type,
            amount: self.amount,
            remarks: self.remarks,
            queue_timeout_url: self.timeout_url,
            result_url: self.result_url,
            transaction_id: self.transaction_id,
            occasion: self.occasion,
        })
    }
}

impl Validate for ReversalRequest {
    fn validate(&mut self) -> Result<(), ValidationError> {
        self.check().map(drop)
    }
}

impl fmt::Debug for ReversalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReversalRequest")
            .field("transaction_id", &self.transaction_id)
            .field("initiator_name", &self.initiator_name)
            .field("initiator_password", &REDACTED)
            .field("short_code", &self.short_code)
            .field("phone_number", &self.phone_number)
            .field("amount", &self.amount)
            .field("receiver_identifier_type", &self.receiver_identifier_type)
            .field("result_url", &self.result_url)
            .field("timeout_url", &self.timeout_url)
            .field("remarks", &self.remarks)
            .field("occasion", &self.occasion)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CredentialEncryptor;

    fn request() -> ReversalRequest {
        ReversalRequest {
            transaction_id: "OEI2AK4Q16".into(),
            initiator_name: "testapi".into(),
            initiator_password: "secret".into(),
            short_code: "600000".into(),
            amount: Decimal::new(100, 0),
            result_url: "https://x/reversal".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_both_parties_rejected() {
        let mut req = ReversalRequest {
            phone_number: "0712345678".into(),
            ..request()
        };
        assert_eq!(req.validate(), Err(ValidationError::ConflictingParty));
    }

    #[test]
    fn test_phone_only_sets_receiver_and_msisdn() {
        let mut req = ReversalRequest {
            short_code: String::new(),
            phone_number: "0712345678".into(),
            ..request()
        };
        req.validate().unwrap();
        assert_eq!(req.receiver_party(), Some("254712345678"));
        assert_eq!(req.receiver_identifier_type, "1");
    }

    #[test]
    fn test_short_code_defaults_to_organization() {
        let mut req = request();
        req.validate().unwrap();
        assert_eq!(req.receiver_party(), Some("600000"));
        assert_eq!(req.receiver_identifier_type, "4");
    }

    #[test]
    fn test_explicit_identifier_kept() {
        let mut req = ReversalRequest {
            receiver_identifier_type: "2".into(),
            ..request()
        };
        req.validate().unwrap();
        assert_eq!(req.receiver_identifier_type, "2");
    }

    #[test]
    fn test_amount_rounding() {
        let mut req = ReversalRequest {
            amount: Decimal::new(12345, 3),
            ..request()
        };
        req.validate().unwrap();
        assert_eq!(req.amount, Decimal::new(1235, 2));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        for amount in [Decimal::ZERO, Decimal::new(-5, 0), Decimal::new(4, 3)] {
            let mut req = ReversalRequest {
                amount,
                ..request()
            };
            assert_eq!(
                req.validate(),
                Err(ValidationError::NonPositiveAmount("amount")),
                "amount {amount}"
            );
        }
    }

    #[test]
    fn test_invalid_short_code() {
        let mut req = ReversalRequest {
            short_code: "60O000".into(),
            ..request()
        };
        assert_eq!(
            req.validate(),
            Err(ValidationError::InvalidShortCode("short code"))
        );
    }

    #[test]
    fn test_payload_wire_names() {
        let credential = CredentialEncryptor::from_certificate(include_bytes!(
            "../../testdata/rsa_cert.pem"
        ))
        .unwrap()
        .encrypt("secret")
        .unwrap();
        let req = ReversalRequest {
            amount: Decimal::new(1050, 2),
            ..request()
        };
        let json = serde_json::to_value(req.into_payload(credential).unwrap()).unwrap();
        assert_eq!(json["CommandID"], "TransactionReversal");
        assert_eq!(json["ReceiverParty"], "600000");
        assert_eq!(json["RecieverIdentifierType"], "4");
        assert_eq!(json["Amount"], 10.5);
        assert_eq!(json["TransactionID"], "OEI2AK4Q16");
        assert_eq!(json["Remarks"], "empty remarks");
    }
}
