//! Commission (fee rule) model.

use serde::{Deserialize, Serialize};

use super::{CommissionId, CommissionType};
use crate::error::{BackofficeError, Result};

/// A fee rule applied to merchants, either a percentage or a flat amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    /// Storage identifier; absent until the backend creates the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CommissionId>,
    /// Business code of the commission.
    #[serde(rename = "codComision", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// How `base_amount` is interpreted.
    #[serde(rename = "tipo")]
    pub kind: CommissionType,
    /// Percentage (for [`CommissionType::Percentage`]) or flat fee.
    #[serde(rename = "montoBase")]
    pub base_amount: f64,
    /// Number of transactions covered by the base amount.
    #[serde(rename = "transaccionesBase")]
    pub base_transactions: u64,
}

impl Commission {
    /// Creates a commission draft without id or code.
    #[inline]
    #[must_use]
    pub const fn draft(kind: CommissionType, base_amount: f64, base_transactions: u64) -> Self {
        Self {
            id: None,
            code: None,
            kind,
            base_amount,
            base_transactions,
        }
    }

    /// Checks that the type is known and the base amount is a non-negative
    /// number.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::Validation`] if the type is
    /// [`CommissionType::Unknown`], or the amount is negative or not finite.
    #[inline]
    pub fn validate(&self) -> Result<()> {
        if self.kind == CommissionType::Unknown {
            return Err(BackofficeError::Validation(
                "commission type must be POR or FIJ".to_owned(),
            ));
        }
        if !self.base_amount.is_finite() || self.base_amount < 0.0 {
            return Err(BackofficeError::Validation(
                "base amount must be a number greater than or equal to 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Formats the base amount for display: `2.50%`, `$10.00`, or a bare
    /// `10.00` when the type is unknown.
    #[inline]
    #[must_use]
    pub fn formatted_base(&self) -> String {
        match self.kind {
            CommissionType::Percentage => format!("{:.2}%", self.base_amount),
            CommissionType::Fixed => format!("${:.2}", self.base_amount),
            CommissionType::Unknown => format!("{:.2}", self.base_amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_commission() {
        let json = r#"{
            "id": "67c74637",
            "codComision": "STD",
            "tipo": "POR",
            "montoBase": 1.2,
            "transaccionesBase": 100
        }"#;
        let commission: Commission = serde_json::from_str(json).unwrap();
        assert_eq!(commission.id, Some(CommissionId::new("67c74637")));
        assert_eq!(commission.kind, CommissionType::Percentage);
        assert_eq!(commission.base_transactions, 100);
    }

    #[test]
    fn draft_serializes_without_id() {
        let json = serde_json::to_value(Commission::draft(CommissionType::Fixed, 10.0, 5)).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["tipo"], "FIJ");
        assert_eq!(json["transaccionesBase"], 5);
    }

    #[test]
    fn formatted_base_by_type() {
        assert_eq!(
            Commission::draft(CommissionType::Percentage, 2.5, 0).formatted_base(),
            "2.50%"
        );
        assert_eq!(
            Commission::draft(CommissionType::Fixed, 10.0, 0).formatted_base(),
            "$10.00"
        );
        assert_eq!(
            Commission::draft(CommissionType::Unknown, 3.0, 0).formatted_base(),
            "3.00"
        );
    }

    #[test]
    fn unknown_type_from_backend_is_kept_but_not_sendable() {
        let json = r#"{"id":"c-9","tipo":"MIX","montoBase":1.0,"transaccionesBase":1}"#;
        let commission: Commission = serde_json::from_str(json).unwrap();
        assert_eq!(commission.kind, CommissionType::Unknown);
        assert!(commission.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_and_nan() {
        assert!(Commission::draft(CommissionType::Fixed, -1.0, 0).validate().is_err());
        assert!(Commission::draft(CommissionType::Fixed, f64::NAN, 0).validate().is_err());
        assert!(Commission::draft(CommissionType::Fixed, 0.0, 0).validate().is_ok());
    }
}
