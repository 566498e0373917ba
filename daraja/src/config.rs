//! Client configuration.
//!
//! A [`DarajaConfig`] carries the three settings every call needs: the
//! consumer key, the consumer secret and the [`Environment`]. It is created
//! once, validated once and read-only afterwards.
//!
//! # Example Configuration
//!
//! ```toml
//! consumer_key = "..."
//! consumer_secret = "..."
//! environment = "sandbox"
//! ```
//!
//! # Environment Variables
//!
//! - `DARAJA_CONSUMER_KEY` - OAuth consumer key
//! - `DARAJA_CONSUMER_SECRET` - OAuth consumer secret
//! - `DARAJA_ENVIRONMENT` - `sandbox` or `production`
//! - `DARAJA_CERTIFICATE` - optional PEM gateway certificate used to encrypt
//!   initiator passwords

use std::fmt;

use serde::Deserialize;

use crate::credential::{CredentialEncryptor, SecurityCredential};
use crate::environment::{self, Environment};
use crate::error::{ConfigError, CredentialError};

/// Environment variable holding the consumer key.
pub const CONSUMER_KEY_VAR: &str = "DARAJA_CONSUMER_KEY";

/// Environment variable holding the consumer secret.
pub const CONSUMER_SECRET_VAR: &str = "DARAJA_CONSUMER_SECRET";

/// Environment variable holding the environment name.
pub const ENVIRONMENT_VAR: &str = "DARAJA_ENVIRONMENT";

/// Environment variable holding a PEM gateway certificate.
pub const CERTIFICATE_VAR: &str = "DARAJA_CERTIFICATE";

/// Daraja application settings.
///
/// # Example
///
/// ```rust
/// use daraja::{DarajaConfig, Environment};
///
/// let config = DarajaConfig::new("key", "secret", Environment::Sandbox);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Deserialize)]
pub struct DarajaConfig {
    consumer_key: String,
    consumer_secret: String,
    environment: Environment,
    /// Replaces the environment's bundled certificate when set.
    #[serde(default)]
    certificate: Option<Vec<u8>>,
}

impl DarajaConfig {
    /// Creates a configuration from its three required settings.
    #[must_use]
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            environment,
            certificate: None,
        }
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// The returned configuration has already passed [`Self::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is missing or invalid.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = environment::resolve(lookup(ENVIRONMENT_VAR).as_deref())?;
        let mut config = Self::new(
            lookup(CONSUMER_KEY_VAR).unwrap_or_default(),
            lookup(CONSUMER_SECRET_VAR).unwrap_or_default(),
            environment,
        );
        config.certificate = lookup(CERTIFICATE_VAR)
            .filter(|pem| !pem.trim().is_empty())
            .map(String::into_bytes);
        config.validate()?;
        Ok(config)
    }

    /// Sets the gateway certificate used for credential encryption.
    ///
    /// Operations that send a security credential fail with
    /// [`CredentialError::MissingCertificate`] until a certificate is set,
    /// unless one is bundled for the environment.
    ///
    /// Accepts the same encodings as
    /// [`CredentialEncryptor::from_certificate`].
    #[must_use]
    pub fn with_certificate(mut self, certificate: impl Into<Vec<u8>>) -> Self {
        self.certificate = Some(certificate.into());
        self
    }

    /// Checks that the key and secret are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotSet`] naming the first empty setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.consumer_key.is_empty() {
            return Err(ConfigError::NotSet("consumer key"));
        }
        if self.consumer_secret.is_empty() {
            return Err(ConfigError::NotSet("consumer secret"));
        }
        Ok(())
    }

    /// Returns the consumer key.
    #[must_use]
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Returns the consumer secret.
    #[must_use]
    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    /// Returns the configured environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the gateway base URL for the configured environment.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }

    /// Returns the certificate used for credential encryption, if any.
    #[must_use]
    pub fn certificate(&self) -> Option<&[u8]> {
        self.certificate
            .as_deref()
            .or_else(|| self.environment.bundled_certificate())
    }

    /// Derives a security credential from an initiator password.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::MissingCertificate`] if no certificate is
    /// available, or another [`CredentialError`] if the certificate is
    /// unusable or encryption fails.
    pub fn security_credential(&self, password: &str) -> Result<SecurityCredential, CredentialError> {
        let certificate = self
            .certificate()
            .ok_or(CredentialError::MissingCertificate(self.environment))?;
        CredentialEncryptor::from_certificate(certificate)?.encrypt(password)
    }
}

impl fmt::Debug for DarajaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DarajaConfig")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("environment", &self.environment)
            .field("custom_certificate", &self.certificate.is_some())
            .finish()
    }
}
