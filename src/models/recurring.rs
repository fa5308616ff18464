//! Recurring transaction (scheduled repeating charge) model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{RecurringCode, RecurringStatus};
use crate::error::{BackofficeError, Result};

/// A scheduled charge repeated every `frequency_days` days, paid on
/// `payment_day` of the month, together with the stored payment instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTransaction {
    /// Code assigned by the backend on creation.
    #[serde(rename = "codigo", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<RecurringCode>,
    /// Amount charged on every run.
    #[serde(rename = "monto")]
    pub amount: f64,
    /// Card brand.
    #[serde(rename = "marca")]
    pub brand: String,
    /// Current status.
    #[serde(rename = "estado")]
    pub status: RecurringStatus,
    /// First day the charge may run.
    #[serde(rename = "fechaInicio")]
    pub start_date: NaiveDate,
    /// Last day the charge may run.
    #[serde(rename = "fechaFin")]
    pub end_date: NaiveDate,
    /// Day of the month the payment is made (1-31).
    #[serde(rename = "diaMesPago")]
    pub payment_day: u8,
    /// SWIFT code of the paying bank.
    #[serde(rename = "swiftBanco")]
    pub bank_swift: String,
    /// Paying account (IBAN).
    #[serde(rename = "cuentaIban")]
    pub iban: String,
    /// ISO currency code.
    #[serde(rename = "moneda")]
    pub currency: String,
    /// Country of the payment instrument.
    #[serde(rename = "pais")]
    pub country: String,
    /// Card number.
    #[serde(rename = "tarjeta")]
    pub card_number: u64,
    /// Card expiry as printed on the card.
    #[serde(rename = "fechaCaducidad")]
    pub card_expiry: String,
    /// Card verification value.
    #[serde(rename = "cvv")]
    pub cvv: String,
    /// Days between runs.
    #[serde(rename = "frecuenciaDias")]
    pub frequency_days: u32,
}

impl RecurringTransaction {
    /// Checks the schedule and required text fields before creation.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::Validation`] if the currency or brand is
    /// blank, the status is unknown, the payment day is outside 1-31, the
    /// frequency is zero, or the period ends before it starts.
    #[inline]
    pub fn validate(&self) -> Result<()> {
        if self.status == RecurringStatus::Unknown {
            return Err(BackofficeError::Validation(
                "status must be ACT, CAN or PEN".to_owned(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(BackofficeError::Validation("currency is required".to_owned()));
        }
        if self.brand.trim().is_empty() {
            return Err(BackofficeError::Validation("card brand is required".to_owned()));
        }
        if !(1..=31).contains(&self.payment_day) {
            return Err(BackofficeError::Validation(format!(
                "payment day must be between 1 and 31, got {}",
                self.payment_day
            )));
        }
        if self.frequency_days == 0 {
            return Err(BackofficeError::Validation(
                "frequency must be at least one day".to_owned(),
            ));
        }
        if self.end_date < self.start_date {
            return Err(BackofficeError::Validation(
                "period end is before period start".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecurringTransaction {
        RecurringTransaction {
            code: None,
            amount: 19.99,
            brand: "VISA".to_owned(),
            status: RecurringStatus::Pending,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            payment_day: 15,
            bank_swift: "PICHECEQ".to_owned(),
            iban: "EC00".to_owned(),
            currency: "USD".to_owned(),
            country: "EC".to_owned(),
            card_number: 4_111_111_111_111_111,
            card_expiry: "12/27".to_owned(),
            cvv: "123".to_owned(),
            frequency_days: 30,
        }
    }

    #[test]
    fn serialize_uses_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("codigo").is_none());
        assert_eq!(json["diaMesPago"], 15);
        assert_eq!(json["fechaInicio"], "2025-01-01");
        assert_eq!(json["estado"], "PEN");
    }

    #[test]
    fn validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_schedule() {
        let mut tx = sample();
        tx.payment_day = 32;
        assert!(tx.validate().is_err());

        let mut tx = sample();
        tx.frequency_days = 0;
        assert!(tx.validate().is_err());

        let mut tx = sample();
        tx.end_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(tx.validate().is_err());

        let mut tx = sample();
        tx.status = RecurringStatus::Unknown;
        assert!(tx.validate().is_err());
    }
}
