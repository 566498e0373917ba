//! Per-operation request validators.
//!
//! Each request is a plain value object with public fields, so callers build
//! them with struct literals and `..Default::default()`. Before a request is
//! sent, [`Validate::validate`] runs its checks in a fixed order and stops at
//! the first failure. Validation also normalizes the request in place:
//! phone numbers become gateway MSISDNs, empty enumerated fields take their
//! default value and empty optional fields take their placeholder.
//!
//! `into_payload` re-runs validation, so a payload can never be built from
//! an unchecked request.
//!
//! # Modules
//!
//! - [`express`] - Push payment and push payment status
//! - [`b2c`] - Business-to-customer disbursement
//! - [`balance`] - Account balance query
//! - [`status`] - Transaction status query
//! - [`reversal`] - Transaction reversal
//! - [`c2b`] - URL registration and payment simulation

pub mod b2c;
pub mod balance;
pub mod c2b;
pub mod express;
pub mod reversal;
pub mod status;

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::phone;
use crate::proto::IdentifierType;

pub use b2c::B2cRequest;
pub use balance::BalanceQuery;
pub use c2b::{C2bSimulate, RegisterUrls};
pub use express::{ExpressQuery, ExpressRequest};
pub use reversal::ReversalRequest;
pub use status::TransactionStatusQuery;

/// Placeholder sent when no remarks are given.
pub const DEFAULT_REMARKS: &str = "empty remarks";

/// Placeholder push-payment account reference.
pub const DEFAULT_ACCOUNT_REFERENCE: &str = "account";

/// Placeholder push-payment transaction description.
pub const DEFAULT_TRANSACTION_DESC: &str = "empty desc";

/// Shown in place of passwords and pass keys in `Debug` output.
pub(crate) const REDACTED: &str = "<redacted>";

static SHORT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("Invalid short code pattern"));

/// A request that can check and normalize itself before dispatch.
pub trait Validate {
    /// Checks the request, normalizing fields in place.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    fn validate(&mut self) -> Result<(), ValidationError>;
}

/// Checks that `value` is a non-empty string of ASCII digits.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidShortCode`] naming `field`.
pub fn check_short_code(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if SHORT_CODE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidShortCode(field))
    }
}

pub(crate) fn require_credential(value: &str, name: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingCredential(name));
    }
    Ok(())
}

pub(crate) fn require_field(value: &str, name: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingField(name));
    }
    Ok(())
}

/// Requires a phone number and replaces it with its MSISDN form.
pub(crate) fn normalize_phone(value: &mut String) -> Result<(), ValidationError> {
    require_field(value, "phone number")?;
    *value = phone::normalize_msisdn(value)?;
    Ok(())
}

/// Requires a result URL and defaults the timeout URL to it.
pub(crate) fn callback_urls(result_url: &str, timeout_url: &mut String) -> Result<(), ValidationError> {
    if result_url.is_empty() {
        return Err(ValidationError::MissingCallbackUrl("result callback url"));
    }
    if timeout_url.is_empty() {
        result_url.clone_into(timeout_url);
    }
    Ok(())
}

pub(crate) fn default_if_empty(value: &mut String, placeholder: &str) {
    if value.is_empty() {
        placeholder.clone_into(value);
    }
}

/// Resolves an enumerated field.
///
/// An empty value selects `default` and is rewritten to its wire form; any
/// other value must parse.
pub(crate) fn choice<T: Copy>(
    value: &mut String,
    field: &'static str,
    default: T,
    parse: fn(&str) -> Option<T>,
    wire: fn(T) -> &'static str,
) -> Result<T, ValidationError> {
    if value.is_empty() {
        wire(default).clone_into(value);
        return Ok(default);
    }
    parse(value).ok_or_else(|| ValidationError::InvalidChoice {
        field,
        value: value.clone(),
    })
}

/// The party identified by either a short code or a phone number.
pub(crate) struct Party {
    pub(crate) id: String,
    pub(crate) is_phone: bool,
}

/// Resolves a party given as exactly one of a short code or phone number.
///
/// The phone number, if used, is normalized in place.
pub(crate) fn exclusive_party(
    short_code: &str,
    phone_number: &mut String,
) -> Result<Party, ValidationError> {
    match (short_code.is_empty(), phone_number.is_empty()) {
        (false, false) => Err(ValidationError::ConflictingParty),
        (true, true) => Err(ValidationError::MissingParty),
        (false, true) => {
            check_short_code(short_code, "short code")?;
            Ok(Party {
                id: short_code.to_owned(),
                is_phone: false,
            })
        }
        (true, false) => {
            normalize_phone(phone_number)?;
            Ok(Party {
                id: phone_number.clone(),
                is_phone: true,
            })
        }
    }
}

/// Resolves the identifier type of an exclusive party.
///
/// Defaults to MSISDN for phone numbers and to organization otherwise.
pub(crate) fn party_identifier(
    value: &mut String,
    field: &'static str,
    party: &Party,
) -> Result<IdentifierType, ValidationError> {
    let default = if party.is_phone {
        IdentifierType::Msisdn
    } else {
        IdentifierType::Organization
    };
    choice(
        value,
        field,
        default,
        IdentifierType::from_wire,
        IdentifierType::as_str,
    )
}

/// Returns whichever of `short_code` and `phone_number` is set.
pub(crate) fn either<'a>(short_code: &'a str, phone_number: &'a str) -> Option<&'a str> {
    [short_code, phone_number]
        .into_iter()
        .find(|value| !value.is_empty())
}
