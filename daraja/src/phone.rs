//! Phone number normalization for the Kenyan numbering plan.
//!
//! The gateway expects subscriber numbers as country-code-prefixed digits
//! with no leading `+` (`254712345678`). Callers usually have numbers in the
//! local `07...` form, or in E.164 with spaces and punctuation; [`PhoneNumber`]
//! accepts all of those and rejects anything that is not a Kenyan mobile
//! number.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// Kenyan country calling code.
pub const COUNTRY_CODE: &str = "254";

/// Mobile national significant numbers: `7XXXXXXXX`, `10XXXXXXX`, `11XXXXXXX`.
static MOBILE_NSN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:7[0-9]{8}|1[01][0-9]{7})$").expect("Invalid mobile pattern"));

/// Separators tolerated in user input.
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-.()]").expect("Invalid separator pattern"));

/// A validated Kenyan mobile number.
///
/// # Example
///
/// ```rust
/// use daraja::PhoneNumber;
///
/// let phone: PhoneNumber = "0712 345 678".parse().unwrap();
/// assert_eq!(phone.e164(), "+254712345678");
/// assert_eq!(phone.msisdn(), "254712345678");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber {
    nsn: String,
}

impl PhoneNumber {
    /// Parses a phone number in local, international or E.164 form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPhoneNumber`] if the input is not a
    /// Kenyan mobile number.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidPhoneNumber(input.to_owned());
        let cleaned = SEPARATORS.replace_all(input.trim(), "");
        let (explicit_plus, digits) = match cleaned.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, &*cleaned),
        };
        let nsn = if let Some(rest) = digits.strip_prefix(COUNTRY_CODE) {
            // A trunk `0` after the country code is tolerated: `+2540712...`.
            rest.strip_prefix('0').unwrap_or(rest)
        } else if explicit_plus {
            return Err(invalid());
        } else if let Some(rest) = digits.strip_prefix('0') {
            rest
        } else {
            digits
        };
        if !MOBILE_NSN.is_match(nsn) {
            return Err(invalid());
        }
        Ok(Self {
            nsn: nsn.to_owned(),
        })
    }

    /// Returns the number in E.164 form, e.g. `+254712345678`.
    #[must_use]
    pub fn e164(&self) -> String {
        format!("+{COUNTRY_CODE}{}", self.nsn)
    }

    /// Returns the E.164 form without its leading `+`, as the gateway expects.
    #[must_use]
    pub fn msisdn(&self) -> String {
        format!("{COUNTRY_CODE}{}", self.nsn)
    }

    /// Returns the local dialling form, e.g. `0712345678`.
    #[must_use]
    pub fn national(&self) -> String {
        format!("0{}", self.nsn)
    }
}

impl FromStr for PhoneNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "+{COUNTRY_CODE}{}", self.nsn)
    }
}

/// Formats `input` in E.164 form.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidPhoneNumber`] if the input is not a
/// Kenyan mobile number.
pub fn format_e164(input: &str) -> Result<String, ValidationError> {
    PhoneNumber::parse(input).map(|phone| phone.e164())
}

/// Normalizes `input` to the digits-only form the gateway expects.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidPhoneNumber`] if the input is not a
/// Kenyan mobile number.
pub fn normalize_msisdn(input: &str) -> Result<String, ValidationError> {
    PhoneNumber::parse(input).map(|phone| phone.msisdn())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_form_to_e164() {
        assert_eq!(format_e164("0712345678").unwrap(), "+254712345678");
        assert_eq!(normalize_msisdn("0712345678").unwrap(), "254712345678");
    }

    #[test]
    fn test_accepted_forms() {
        for input in [
            "0712345678",
            "712345678",
            "254712345678",
            "+254712345678",
            "+254 712 345 678",
            "(0712) 345-678",
            "0712.345.678",
            "+2540712345678",
            "2540712345678",
        ] {
            assert_eq!(
                normalize_msisdn(input).unwrap(),
                "254712345678",
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_newer_mobile_ranges() {
        assert_eq!(normalize_msisdn("0110123456").unwrap(), "254110123456");
        assert_eq!(normalize_msisdn("+254101234567").unwrap(), "254101234567");
    }

    #[test]
    fn test_rejects_invalid_numbers() {
        for input in [
            "",
            "abc",
            "07123",
            "07123456789",
            "0201234567",
            "+255712345678",
            "+0712345678",
            "0812345678",
            "+25400712345678",
        ] {
            assert_eq!(
                PhoneNumber::parse(input),
                Err(ValidationError::InvalidPhoneNumber(input.to_owned())),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_formats() {
        let phone: PhoneNumber = "+254 700 000 001".parse().unwrap();
        assert_eq!(phone.national(), "0700000001");
        assert_eq!(phone.to_string(), "+254700000001");
    }
}
