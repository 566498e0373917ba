//! Customer-to-business URL registration and payment simulation.

use crate::error::ValidationError;
use crate::proto::payload::{C2bSimulatePayload, RegisterUrlsPayload};
use crate::proto::{C2bCommand, ResponseType};
use crate::request::{Validate, check_short_code, choice, normalize_phone};

/// Registers the URLs the gateway calls for incoming customer payments.
///
/// At least one of `validation_url` and `confirmation_url` is required.
#[derive(Debug, Clone, Default)]
pub struct RegisterUrls {
    /// Short code receiving the payments.
    pub short_code: String,
    /// `Completed` or `Cancelled`; there is no default.
    pub response_type: String,
    /// URL asked to accept or reject each payment.
    pub validation_url: String,
    /// URL notified of each completed payment.
    pub confirmation_url: String,
}

impl RegisterUrls {
    fn check(&self) -> Result<ResponseType, ValidationError> {
        let response_type = ResponseType::from_wire(&self.response_type).ok_or_else(|| {
            ValidationError::InvalidChoice {
                field: "response type",
                value: self.response_type.clone(),
            }
        })?;
        check_short_code(&self.short_code, "short code")?;
        if self.validation_url.is_empty() && self.confirmation_url.is_empty() {
            return Err(ValidationError::MissingUrls);
        }
        Ok(response_type)
    }

    /// Validates the registration and builds its wire payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn into_payload(self) -> Result<RegisterUrlsPayload, ValidationError> {
        let response_type = self.check()?;
        Ok(RegisterUrlsPayload {
            validation_url: self.validation_url,
            confirmation_url: self.confirmation_url,
            response_type,
            short_code: self.short_code,
        })
    }
}

impl Validate for RegisterUrls {
    fn validate(&mut self) -> Result<(), ValidationError> {
        self.check().map(drop)
    }
}

/// Simulates a customer payment to a short code.
///
/// Only available in the sandbox environment.
#[derive(Debug, Clone, Default)]
pub struct C2bSimulate {
    /// Short code receiving the payment.
    pub short_code: String,
    /// `CustomerPayBillOnline` or `CustomerBuyGoodsOnline`; empty selects
    /// `CustomerPayBillOnline`.
    pub command_id: String,
    /// Whole shillings, greater than zero.
    pub amount: u64,
    /// Paying subscriber; normalized to an MSISDN.
    pub phone_number: String,
    /// Account number for paybill payments.
    pub bill_ref_number: String,
}

impl C2bSimulate {
    fn check(&mut self) -> Result<C2bCommand, ValidationError> {
        check_short_code(&self.short_code, "short code")?;
        let command = choice(
            &mut self.command_id,
            "command id",
            C2bCommand::CustomerPayBillOnline,
            C2bCommand::from_wire,
            C2bCommand::as_str,
        )?;
        if self.amount == 0 {
            return Err(ValidationError::NonPositiveAmount("amount"));
        }
        normalize_phone(&mut self.phone_number)?;
        Ok(command)
    }

    /// Validates the simulation and builds its wire payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn into_payload(mut self) -> Result<C2bSimulatePayload, ValidationError> {
        let command_id = self.check()?;
        Ok(C2bSimulatePayload {
            short_code: self.short_code,
            command_id,
            amount: self.amount.to_string(),
            msisdn: self.phone_number,
            bill_ref_number: self.bill_ref_number,
        })
    }
}

impl Validate for C2bSimulate {
    fn validate(&mut self) -> Result<(), ValidationError> {
        self.check().map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegisterUrls {
        RegisterUrls {
            short_code: "600000".into(),
            response_type: "Completed".into(),
            validation_url: "https://x/validate".into(),
            confirmation_url: "https://x/confirm".into(),
        }
    }

    #[test]
    fn test_register_urls_valid() {
        let payload = registration().into_payload().unwrap();
        let json = serde_json::to_value(payload).unwrap();
        assert_eq!(json["ResponseType"], "Completed");
        assert_eq!(json["ShortCode"], "600000");
        assert_eq!(json["ValidationURL"], "https://x/validate");
        assert_eq!(json["ConfirmationURL"], "https://x/confirm");
    }

    #[test]
    fn test_register_urls_requires_response_type() {
        let mut r = RegisterUrls {
            response_type: String::new(),
            ..registration()
        };
        assert_eq!(
            r.validate(),
            Err(ValidationError::InvalidChoice {
                field: "response type",
                value: String::new(),
            })
        );
    }

    #[test]
    fn test_register_urls_one_url_is_enough() {
        let mut r = RegisterUrls {
            validation_url: String::new(),
            ..registration()
        };
        assert!(r.validate().is_ok());

        let mut r = RegisterUrls {
            validation_url: String::new(),
            confirmation_url: String::new(),
            ..registration()
        };
        assert_eq!(r.validate(), Err(ValidationError::MissingUrls));
    }

    #[test]
    fn test_register_urls_short_code() {
        let mut r = RegisterUrls {
            short_code: "ab12".into(),
            ..registration()
        };
        assert_eq!(
            r.validate(),
            Err(ValidationError::InvalidShortCode("short code"))
        );
    }

    #[test]
    fn test_simulate_defaults_and_payload() {
        let sim = C2bSimulate {
            short_code: "600000".into(),
            amount: 50,
            phone_number: "0712345678".into(),
            bill_ref_number: "INV-1".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(sim.into_payload().unwrap()).unwrap();
        assert_eq!(json["CommandID"], "CustomerPayBillOnline");
        assert_eq!(json["Amount"], "50");
        assert_eq!(json["Msisdn"], "254712345678");
        assert_eq!(json["BillRefNumber"], "INV-1");
    }

    #[test]
    fn test_simulate_rejects_zero_amount_and_bad_command() {
        let mut sim = C2bSimulate {
            short_code: "600000".into(),
            phone_number: "0712345678".into(),
            ..Default::default()
        };
        assert_eq!(
            sim.validate(),
            Err(ValidationError::NonPositiveAmount("amount"))
        );

        sim.amount = 10;
        sim.command_id = "BusinessPayment".into();
        assert!(matches!(
            sim.validate(),
            Err(ValidationError::InvalidChoice { field: "command id", .. })
        ));
    }
}
