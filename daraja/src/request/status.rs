//! Transaction status queries.

use std::fmt;

use crate::credential::SecurityCredential;
use crate::error::ValidationError;
use crate::proto::payload::TransactionStatusPayload;
use crate::proto::{IdentifierType, TRANSACTION_STATUS_QUERY};
use crate::request::{
    DEFAULT_REMARKS, Party, REDACTED, Validate, callback_urls, default_if_empty, either,
    exclusive_party, party_identifier, require_credential, require_field,
};

/// Looks up the status of a completed transaction.
///
/// The party is given as exactly one of `short_code` or `phone_number`.
///
/// # Example
///
/// ```rust
/// use daraja::request::{TransactionStatusQuery, Validate};
///
/// let mut query = TransactionStatusQuery {
///     transaction_id: "OEI2AK4Q16".into(),
///     initiator_name: "testapi".into(),
///     initiator_password: "secret".into(),
///     phone_number: "0712345678".into(),
///     result_url: "https://example.com/status".into(),
///     ..Default::default()
/// };
/// query.validate().unwrap();
/// assert_eq!(query.party_a(), Some("254712345678"));
/// assert_eq!(query.identifier_type, "1");
/// ```
#[derive(Clone, Default)]
pub struct TransactionStatusQuery {
    /// M-Pesa receipt of the transaction.
    pub transaction_id: String,
    /// API operator username.
    pub initiator_name: String,
    /// API operator password, encrypted into the security credential.
    pub initiator_password: String,
    /// Organization party; mutually exclusive with `phone_number`.
    pub short_code: String,
    /// Subscriber party; mutually exclusive with `short_code`.
    pub phone_number: String,
    /// `"1"`, `"2"` or `"4"`; empty selects MSISDN for a phone number and
    /// organization otherwise.
    pub identifier_type: String,
    /// URL receiving the status.
    pub result_url: String,
    /// URL notified on queue timeout; defaults to `result_url`.
    pub timeout_url: String,
    /// Defaults to `"empty remarks"`.
    pub remarks: String,
    /// Optional free text.
    pub occasion: String,
}

impl TransactionStatusQuery {
    /// Returns the `PartyA` value: the short code or the phone number,
    /// whichever is set.
    #[must_use]
    pub fn party_a(&self) -> Option<&str> {
        either(&self.short_code, &self.phone_number)
    }

    fn check(&mut self) -> Result<(Party, IdentifierType), ValidationError> {
        let party = exclusive_party(&self.short_code, &mut self.phone_number)?;
        require_credential(&self.initiator_name, "initiator name")?;
        require_credential(&self.initiator_password, "initiator password")?;
        require_field(&self.transaction_id, "transaction id")?;
        callback_urls(&self.result_url, &mut self.timeout_url)?;
        default_if_empty(&mut self.remarks, DEFAULT_REMARKS);
        let identifier_type = party_identifier(&mut self.identifier_type, "identifier type", &party)?;
        Ok((party, identifier_type))
    }

    /// Validates the query and builds its wire payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn into_payload(
        mut self,
        security_credential: SecurityCredential,
    ) -> Result<TransactionStatusPayload, ValidationError> {
        let (party, identifier_type) = self.check()?;
        Ok(TransactionStatusPayload {
            command_id: TRANSACTION_STATUS_QUERY,
            party_a: party.id,
            identifier_type,
            remarks: self.remarks,
            initiator: self.initiator_name,
            security_credential,
            queue_timeout_url: self.timeout_url,
            result_url: self.result_url,
            transaction_id: self.transaction_id,
            occasion: self.occasion,
        })
    }
}

impl Validate for TransactionStatusQuery {
    fn validate(&mut self) -> Result<(), ValidationError> {
        self.check().map(drop)
    }
}

impl fmt::Debug for TransactionStatusQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionStatusQuery")
            .field("transaction_id", &self.transaction_id)
            .field("initiator_name", &self.initiator_name)
            .field("initiator_password", &REDACTED)
            .field("short_code", &self.short_code)
            .field("phone_number", &self.phone_number)
            .field("identifier_type", &self.identifier_type)
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

    fn query() -> TransactionStatusQuery {
        TransactionStatusQuery {
            transaction_id: "OEI2AK4Q16".into(),
            initiator_name: "testapi".into(),
            initiator_password: "secret".into(),
            short_code: "600000".into(),
            result_url: "https://x/status".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_short_code_party_defaults_to_organization() {
        let mut q = query();
        q.validate().unwrap();
        assert_eq!(q.party_a(), Some("600000"));
        assert_eq!(q.identifier_type, "4");
    }

    #[test]
    fn test_phone_party_defaults_to_msisdn() {
        let mut q = TransactionStatusQuery {
            short_code: String::new(),
            phone_number: "0712345678".into(),
            ..query()
        };
        q.validate().unwrap();
        assert_eq!(q.party_a(), Some("254712345678"));
        assert_eq!(q.identifier_type, "1");
    }

    #[test]
    fn test_both_parties_rejected() {
        let mut q = TransactionStatusQuery {
            phone_number: "0712345678".into(),
            ..query()
        };
        assert_eq!(q.validate(), Err(ValidationError::ConflictingParty));
    }

    #[test]
    fn test_no_party_rejected() {
        let mut q = TransactionStatusQuery {
            short_code: String::new(),
            ..query()
        };
        assert_eq!(q.validate(), Err(ValidationError::MissingParty));
    }

    #[test]
    fn test_transaction_id_required() {
        let mut q = TransactionStatusQuery {
            transaction_id: String::new(),
            ..query()
        };
        assert_eq!(
            q.validate(),
            Err(ValidationError::MissingField("transaction id"))
        );
    }

    #[test]
    fn test_payload() {
        let credential = CredentialEncryptor::from_certificate(include_bytes!(
            "../../testdata/rsa_cert.pem"
        ))
        .unwrap()
        .encrypt("secret")
        .unwrap();
        let q = TransactionStatusQuery {
            occasion: "audit".into(),
            ..query()
        };
        let json = serde_json::to_value(q.into_payload(credential).unwrap()).unwrap();
        assert_eq!(json["CommandID"], "TransactionStatusQuery");
        assert_eq!(json["PartyA"], "600000");
        assert_eq!(json["IdentifierType"], "4");
        assert_eq!(json["TransactionID"], "OEI2AK4Q16");
        assert_eq!(json["Occasion"], "audit");
        assert_eq!(json["QueueTimeOutURL"], "https://x/status");
    }
}
