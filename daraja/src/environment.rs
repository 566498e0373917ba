//! Gateway environment resolution.
//!
//! Daraja runs two fully separate deployments. Each [`Environment`] maps to
//! exactly one base URL and one slot for a public-key certificate; the
//! certificate is only used to encrypt initiator passwords (see
//! [`crate::credential`]).
//!
//! No certificates are compiled into this build, so every slot is empty and
//! credentials can only be derived from a certificate supplied through
//! [`DarajaConfig::with_certificate`](crate::DarajaConfig::with_certificate).
//! Safaricom publishes one certificate per environment on its developer
//! portal; bundling one means pointing its constant at the file with
//! `include_bytes!`.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidEnvironment;

/// Certificate bundled for the sandbox environment.
const SANDBOX_CERTIFICATE: Option<&[u8]> = None;

/// Certificate bundled for the production environment.
const PRODUCTION_CERTIFICATE: Option<&[u8]> = None;

/// A Daraja deployment.
///
/// Serialized as the lowercase strings `"sandbox"` and `"production"`; any
/// other value is rejected with [`InvalidEnvironment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// The test deployment at `sandbox.safaricom.co.ke`.
    Sandbox,
    /// The live deployment at `api.safaricom.co.ke`.
    Production,
}

impl Environment {
    /// Base URL of the sandbox deployment.
    pub const SANDBOX_BASE_URL: &'static str = "https://sandbox.safaricom.co.ke";

    /// Base URL of the production deployment.
    pub const PRODUCTION_BASE_URL: &'static str = "https://api.safaricom.co.ke";

    /// Returns the gateway base URL, without a trailing slash.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => Self::SANDBOX_BASE_URL,
            Self::Production => Self::PRODUCTION_BASE_URL,
        }
    }

    /// Returns the certificate compiled into the crate for this environment,
    /// if any.
    ///
    /// A certificate set through
    /// [`DarajaConfig::with_certificate`](crate::DarajaConfig::with_certificate)
    /// takes precedence.
    #[must_use]
    pub const fn bundled_certificate(self) -> Option<&'static [u8]> {
        match self {
            Self::Sandbox => SANDBOX_CERTIFICATE,
            Self::Production => PRODUCTION_CERTIFICATE,
        }
    }

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = InvalidEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            _ => Err(InvalidEnvironment),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves an optional environment name, treating an absent value the same
/// as an unrecognized one.
///
/// # Errors
///
/// Returns [`InvalidEnvironment`] when `value` is `None` or not one of
/// `sandbox` / `production`.
pub fn resolve(value: Option<&str>) -> Result<Environment, InvalidEnvironment> {
    value.ok_or(InvalidEnvironment)?.parse()
}
