//! Error types for the Daraja core crate.
//!
//! Each stage of the request pipeline that can fail before the network is
//! reached has its own error type:
//!
//! - [`ConfigError`] - missing consumer credentials or an unknown environment
//! - [`ValidationError`] - a request field failed validation
//! - [`CredentialError`] - the security credential could not be derived

use crate::environment::Environment;

/// The environment is neither `sandbox` nor `production`.
///
/// Also returned when the environment is not set at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid environment set, options are: sandbox/production")]
pub struct InvalidEnvironment;

/// Configuration is unusable.
///
/// Detected eagerly, once, before any token or transaction request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required setting is empty or absent.
    #[error("{0} not set")]
    NotSet(&'static str),

    /// The environment setting is not recognized.
    #[error(transparent)]
    InvalidEnvironment(#[from] InvalidEnvironment),
}

/// A transaction request failed validation.
///
/// Validators stop at the first failing check, so a request carries at most
/// one of these at a time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A short code is empty or contains non-digit characters.
    #[error("{0} must be a valid numeric string")]
    InvalidShortCode(&'static str),

    /// An initiator name, password or pass key is missing.
    #[error("must provide {0}")]
    MissingCredential(&'static str),

    /// A required non-credential field is missing.
    #[error("must provide {0}")]
    MissingField(&'static str),

    /// An enumerated field holds a value outside its allowed set.
    #[error("invalid {field}: {value:?}")]
    InvalidChoice {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// An amount is zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveAmount(&'static str),

    /// A required callback URL is missing.
    #[error("must provide a {0}")]
    MissingCallbackUrl(&'static str),

    /// Both a short code and a phone number were supplied for the same party.
    #[error("provide either a short code or a phone number, not both")]
    ConflictingParty,

    /// Neither a short code nor a phone number was supplied for the party.
    #[error("provide either a short code or a phone number")]
    MissingParty,

    /// Neither a validation nor a confirmation URL was supplied.
    #[error("must provide a validation url, a confirmation url or both")]
    MissingUrls,

    /// A phone number could not be parsed as a valid mobile number.
    #[error("invalid phone number: {0:?}")]
    InvalidPhoneNumber(String),
}

/// The security credential could not be derived.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The environment is not recognized.
    #[error(transparent)]
    InvalidEnvironment(#[from] InvalidEnvironment),

    /// No certificate is available for the environment.
    #[error("no gateway certificate configured for the {0} environment")]
    MissingCertificate(Environment),

    /// The certificate bytes are not a valid X.509 certificate or public key.
    #[error("failed to parse certificate: {0}")]
    Certificate(#[source] x509_cert::der::Error),

    /// The certificate's public key is not an RSA key.
    #[error("cannot extract an RSA public key from certificate: {0}")]
    KeyExtraction(#[source] rsa::pkcs8::spki::Error),

    /// RSA encryption failed (for example, the password is too long for the key).
    #[error("failed to encrypt password: {0}")]
    Encryption(#[from] rsa::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_environment_message() {
        assert_eq!(
            InvalidEnvironment.to_string(),
            "Invalid environment set, options are: sandbox/production"
        );
    }

    #[test]
    fn test_config_error_not_set_message() {
        assert_eq!(
            ConfigError::NotSet("consumer key").to_string(),
            "consumer key not set"
        );
    }

    #[test]
    fn test_config_error_wraps_invalid_environment() {
        let err: ConfigError = InvalidEnvironment.into();
        assert_eq!(err, ConfigError::InvalidEnvironment(InvalidEnvironment));
        assert_eq!(err.to_string(), InvalidEnvironment.to_string());
    }

    #[test]
    fn test_missing_certificate_message() {
        assert_eq!(
            CredentialError::MissingCertificate(Environment::Production).to_string(),
            "no gateway certificate configured for the production environment"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::InvalidShortCode("short code").to_string(),
            "short code must be a valid numeric string"
        );
        assert_eq!(
            ValidationError::InvalidChoice {
                field: "command id",
                value: "Refund".into(),
            }
            .to_string(),
            "invalid command id: \"Refund\""
        );
    }
}
