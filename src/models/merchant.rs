//! Merchant (affiliated business) model.

use serde::{Deserialize, Serialize};

use super::{MerchantCode, MerchantStatus};
use crate::error::{BackofficeError, Result};

/// An affiliated business that accepts payments through the gateway.
///
/// Timestamps are kept as the raw strings the merchant service returns;
/// the service does not pin a single format for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    /// Unique code, assigned by the backend on creation.
    #[serde(rename = "codigoComercio", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<MerchantCode>,
    /// Internal reference code.
    #[serde(rename = "codigoInterno", default, skip_serializing_if = "Option::is_none")]
    pub internal_code: Option<String>,
    /// Tax identification number (RUC).
    #[serde(rename = "ruc")]
    pub tax_id: String,
    /// Registered legal name.
    #[serde(rename = "razonSocial")]
    pub legal_name: String,
    /// Public trade name.
    #[serde(rename = "nombreComercial")]
    pub trade_name: String,
    /// Creation timestamp.
    #[serde(rename = "fechaCreacion", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Code of the commission rule applied to this merchant.
    #[serde(rename = "codigoComision", default, skip_serializing_if = "Option::is_none")]
    pub commission_code: Option<i64>,
    /// Current status.
    #[serde(rename = "estado")]
    pub status: MerchantStatus,
    /// SWIFT code of the settlement bank.
    #[serde(rename = "swiftBanco", default, skip_serializing_if = "Option::is_none")]
    pub bank_swift: Option<String>,
    /// Settlement account (IBAN).
    #[serde(rename = "cuentaIban")]
    pub iban: String,
    /// Activation timestamp.
    #[serde(rename = "fechaActivacion", default, skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<String>,
    /// Suspension timestamp; `None` while the merchant was never suspended.
    #[serde(rename = "fechaSuspension", default)]
    pub suspended_at: Option<String>,
}

impl Merchant {
    /// Creates an active merchant draft with the fields the creation form
    /// requires. Everything else is left for the backend to fill in.
    #[inline]
    #[must_use]
    pub fn draft<T, L, X, I>(trade_name: T, legal_name: L, tax_id: X, iban: I) -> Self
    where
        T: Into<String>,
        L: Into<String>,
        X: Into<String>,
        I: Into<String>,
    {
        Self {
            code: None,
            internal_code: None,
            tax_id: tax_id.into(),
            legal_name: legal_name.into(),
            trade_name: trade_name.into(),
            created_at: None,
            commission_code: None,
            status: MerchantStatus::Active,
            bank_swift: None,
            iban: iban.into(),
            activated_at: None,
            suspended_at: None,
        }
    }

    /// Checks that every required creation field is present.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::Validation`] naming the first blank field,
    /// or if the status is [`MerchantStatus::Unknown`].
    #[inline]
    pub fn validate(&self) -> Result<()> {
        if self.status == MerchantStatus::Unknown {
            return Err(BackofficeError::Validation("status must be ACT or INA".to_owned()));
        }
        let required = [
            ("trade name", &self.trade_name),
            ("legal name", &self.legal_name),
            ("tax ID", &self.tax_id),
            ("IBAN", &self.iban),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(BackofficeError::Validation(format!("{label} is required")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_merchant() {
        let json = r#"{
            "codigoComercio": "COM1",
            "codigoInterno": "INT-001",
            "ruc": "1790012345001",
            "razonSocial": "Farmacia Moderna S.A.",
            "nombreComercial": "Farmacia Moderna",
            "fechaCreacion": "2024-01-10T09:00:00",
            "codigoComision": 3,
            "estado": "ACT",
            "swiftBanco": "PICHECEQ",
            "cuentaIban": "EC12 3456 7890",
            "fechaActivacion": "2024-01-11T09:00:00",
            "fechaSuspension": null
        }"#;
        let merchant: Merchant = serde_json::from_str(json).unwrap();
        assert_eq!(merchant.code, Some(MerchantCode::new("COM1")));
        assert_eq!(merchant.trade_name, "Farmacia Moderna");
        assert_eq!(merchant.commission_code, Some(3));
        assert_eq!(merchant.status, MerchantStatus::Active);
        assert!(merchant.suspended_at.is_none());
    }

    #[test]
    fn draft_omits_backend_fields() {
        let merchant = Merchant::draft("Cafe", "Cafe S.A.", "123", "EC00");
        let json = serde_json::to_value(&merchant).unwrap();
        assert!(json.get("codigoComercio").is_none());
        assert_eq!(json["estado"], "ACT");
        assert_eq!(json["nombreComercial"], "Cafe");
    }

    #[test]
    fn validate_rejects_blank_fields() {
        let merchant = Merchant::draft("Cafe", " ", "123", "EC00");
        let err = merchant.validate().unwrap_err();
        assert!(err.to_string().contains("legal name"));
        assert!(Merchant::draft("Cafe", "Cafe S.A.", "123", "EC00").validate().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_status() {
        let mut merchant = Merchant::draft("Cafe", "Cafe S.A.", "123", "EC00");
        merchant.status = MerchantStatus::Unknown;
        assert!(merchant.validate().is_err());
    }
}
