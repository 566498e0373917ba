//! Security credential derivation.
//!
//! Several operations (B2C, balance query, transaction status, reversal)
//! require a `SecurityCredential`: the initiator password encrypted with the
//! gateway's RSA public key using PKCS#1 v1.5 padding, then base64-encoded.
//!
//! The public key comes from an X.509 certificate, either bundled for an
//! [`Environment`] or supplied by the caller. Derivation fails with
//! [`CredentialError::MissingCertificate`] when neither is available.
//! Encryption is randomized, so two credentials for the same password
//! differ.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;
use rsa::pkcs8::DecodePublicKey;
use rsa::rand_core::OsRng;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};
use serde::{Serialize, Serializer};
use x509_cert::Certificate;
use x509_cert::der::{Decode, DecodePem, Encode};

use crate::environment::Environment;
use crate::error::CredentialError;

const PEM_CERTIFICATE_LABEL: &[u8] = b"-----BEGIN CERTIFICATE-----";
const PEM_PUBLIC_KEY_LABEL: &[u8] = b"-----BEGIN PUBLIC KEY-----";

/// An encrypted, base64-encoded initiator password.
///
/// Derived fresh for every request and never persisted. `Debug` output
/// hides the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SecurityCredential(String);

impl SecurityCredential {
    /// Returns the base64 ciphertext as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the credential and returns the base64 ciphertext.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SecurityCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecurityCredential(<redacted>)")
    }
}

impl Serialize for SecurityCredential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Encrypts initiator passwords with a gateway public key.
#[derive(Debug, Clone)]
pub struct CredentialEncryptor {
    key: RsaPublicKey,
}

impl CredentialEncryptor {
    /// Creates an encryptor from the certificate bundled for `environment`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::MissingCertificate`] if no certificate is
    /// bundled for `environment`, otherwise the errors of
    /// [`Self::from_certificate`].
    pub fn for_environment(environment: Environment) -> Result<Self, CredentialError> {
        let certificate = environment
            .bundled_certificate()
            .ok_or(CredentialError::MissingCertificate(environment))?;
        Self::from_certificate(certificate)
    }

    /// Creates an encryptor from certificate bytes.
    ///
    /// Accepts a PEM certificate, a DER certificate or a PEM `PUBLIC KEY`
    /// block.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Certificate`] if the bytes cannot be parsed
    /// and [`CredentialError::KeyExtraction`] if the key is not RSA.
    pub fn from_certificate(bytes: &[u8]) -> Result<Self, CredentialError> {
        let trimmed = bytes.trim_ascii_start();
        let key = if trimmed.starts_with(PEM_PUBLIC_KEY_LABEL) {
            let pem = String::from_utf8_lossy(trimmed);
            RsaPublicKey::from_public_key_pem(&pem).map_err(CredentialError::KeyExtraction)?
        } else {
            let certificate = if trimmed.starts_with(PEM_CERTIFICATE_LABEL) {
                Certificate::from_pem(trimmed)
            } else {
                Certificate::from_der(bytes)
            }
            .map_err(CredentialError::Certificate)?;
            let spki = certificate
                .tbs_certificate
                .subject_public_key_info
                .to_der()
                .map_err(CredentialError::Certificate)?;
            RsaPublicKey::from_public_key_der(&spki).map_err(CredentialError::KeyExtraction)?
        };
        Ok(Self { key })
    }

    /// Encrypts `password` and returns the base64-encoded ciphertext.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Encryption`] if the password does not fit
    /// in a single PKCS#1 v1.5 block for this key.
    pub fn encrypt(&self, password: &str) -> Result<SecurityCredential, CredentialError> {
        let ciphertext = self
            .key
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, password.as_bytes())?;
        Ok(SecurityCredential(b64.encode(ciphertext)))
    }
}

/// Encrypts `password` with the certificate bundled for `environment`.
///
/// # Errors
///
/// Returns [`CredentialError`] if the certificate is unusable or encryption
/// fails.
pub fn encrypt_password(
    password: &str,
    environment: Environment,
) -> Result<SecurityCredential, CredentialError> {
    let credential = CredentialEncryptor::for_environment(environment)?.encrypt(password)?;
    #[cfg(feature = "telemetry")]
    tracing::debug!(%environment, "derived security credential");
    Ok(credential)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::RsaPrivateKey;
    use rsa::pkcs8::DecodePrivateKey;

    const TEST_CERT: &[u8] = include_bytes!("../testdata/rsa_cert.pem");
    const TEST_KEY: &str = include_str!("../testdata/rsa_key.pem");
    const EC_CERT: &[u8] = include_bytes!("../testdata/ec_cert.pem");

    fn decrypt(credential: &SecurityCredential) -> String {
        let key = RsaPrivateKey::from_pkcs8_pem(TEST_KEY).unwrap();
        let ciphertext = b64.decode(credential.as_str()).unwrap();
        let plaintext = key.decrypt(Pkcs1v15Encrypt, &ciphertext).unwrap();
        String::from_utf8(plaintext).unwrap()
    }

    #[test]
    fn test_encrypt_roundtrip_with_private_key() {
        let encryptor = CredentialEncryptor::from_certificate(TEST_CERT).unwrap();
        let credential = encryptor.encrypt("Safaricom999!*!").unwrap();
        assert_eq!(decrypt(&credential), "Safaricom999!*!");
    }

    #[test]
    fn test_ciphertext_is_randomized() {
        let encryptor = CredentialEncryptor::from_certificate(TEST_CERT).unwrap();
        let a = encryptor.encrypt("password").unwrap();
        let b = encryptor.encrypt("password").unwrap();
        assert_ne!(a, b);
        assert_eq!(decrypt(&a), decrypt(&b));
    }

    #[test]
    fn test_ciphertext_length_matches_key_size() {
        let encryptor = CredentialEncryptor::from_certificate(TEST_CERT).unwrap();
        let credential = encryptor.encrypt("password").unwrap();
        assert_eq!(b64.decode(credential.as_str()).unwrap().len(), 256);
    }

    #[test]
    fn test_der_certificate_is_accepted() {
        let pem = Certificate::from_pem(TEST_CERT).unwrap();
        let der = pem.to_der().unwrap();
        let credential = CredentialEncryptor::from_certificate(&der)
            .unwrap()
            .encrypt("secret")
            .unwrap();
        assert_eq!(decrypt(&credential), "secret");
    }

    #[test]
    fn test_public_key_pem_is_accepted() {
        let key = RsaPrivateKey::from_pkcs8_pem(TEST_KEY).unwrap();
        let public = rsa::pkcs8::EncodePublicKey::to_public_key_pem(
            &key.to_public_key(),
            rsa::pkcs8::LineEnding::LF,
        )
        .unwrap();
        let credential = CredentialEncryptor::from_certificate(public.as_bytes())
            .unwrap()
            .encrypt("secret")
            .unwrap();
        assert_eq!(decrypt(&credential), "secret");
    }

    #[test]
    fn test_non_rsa_certificate_is_key_extraction_error() {
        let err = CredentialEncryptor::from_certificate(EC_CERT).unwrap_err();
        assert!(matches!(err, CredentialError::KeyExtraction(_)));
    }

    #[test]
    fn test_garbage_certificate_is_rejected() {
        let err = CredentialEncryptor::from_certificate(b"not a certificate").unwrap_err();
        assert!(matches!(err, CredentialError::Certificate(_)));
    }

    #[test]
    fn test_environment_without_certificate_is_rejected() {
        for env in [Environment::Sandbox, Environment::Production] {
            let err = encrypt_password("Safaricom999!*!", env).unwrap_err();
            assert!(matches!(err, CredentialError::MissingCertificate(e) if e == env));
        }
    }

    #[test]
    fn test_debug_hides_credential() {
        let credential = SecurityCredential("c2VjcmV0".into());
        assert_eq!(format!("{credential:?}"), "SecurityCredential(<redacted>)");
        assert_eq!(serde_json::to_string(&credential).unwrap(), "\"c2VjcmV0\"");
    }
}
