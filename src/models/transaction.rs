//! Point-of-sale transaction model.

use serde::{Deserialize, Serialize};

use super::{TransactionCode, TransactionStatus};

/// A single payment event as reported by the transaction service.
///
/// The service omits fields freely, so every field is optional and absent
/// fields deserialize as `None`. Timestamps are kept as the raw strings the
/// service sends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction code.
    #[serde(rename = "codTransaccion", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<TransactionCode>,
    /// Globally unique code.
    #[serde(rename = "codigoUnico", default, skip_serializing_if = "Option::is_none")]
    pub unique_code: Option<String>,
    /// Account number.
    #[serde(rename = "numeroCuenta", default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    /// Card number (usually masked).
    #[serde(rename = "numeroTarjeta", default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    /// Transaction type code, e.g. `PAG` for payments.
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Amount in `currency`.
    #[serde(rename = "monto", default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Settlement currency.
    #[serde(rename = "moneda", default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Exchange rate from the origin currency.
    #[serde(rename = "tasaCambio", default, skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
    /// Amount in the origin currency.
    #[serde(rename = "montoOrigen", default, skip_serializing_if = "Option::is_none")]
    pub origin_amount: Option<f64>,
    /// Origin currency.
    #[serde(rename = "monedaOrigen", default, skip_serializing_if = "Option::is_none")]
    pub origin_currency: Option<String>,
    /// Card brand.
    #[serde(rename = "marca", default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Processing status.
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    /// Free-form description.
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Country code.
    #[serde(rename = "pais", default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Merchant identifier.
    #[serde(rename = "comercio", default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    /// Merchant site identifier.
    #[serde(rename = "sede", default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    /// Terminal identifier.
    #[serde(rename = "terminal", default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    /// Creation timestamp.
    #[serde(rename = "fecha", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Last update timestamp.
    #[serde(rename = "fechaActualizacion", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_transaction() {
        let json = r#"{
            "codTransaccion": "TX-1",
            "codigoUnico": "U-1",
            "numeroCuenta": "001",
            "numeroTarjeta": "4111********1111",
            "tipo": "PAG",
            "monto": 45.99,
            "moneda": "USD",
            "tasaCambio": 1.08,
            "montoOrigen": 42.58,
            "monedaOrigen": "EUR",
            "marca": "VISA",
            "estado": "ACT",
            "descripcion": "Farmacia",
            "pais": "EC",
            "comercio": "COM1",
            "sede": "S1",
            "terminal": "POS001",
            "fecha": "2023-10-15T14:30:25",
            "fechaActualizacion": "2023-10-15T14:31:00"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.code, Some(TransactionCode::new("TX-1")));
        assert_eq!(tx.status, Some(TransactionStatus::Completed));
        assert_eq!(tx.origin_currency.as_deref(), Some("EUR"));
        assert!((tx.amount.unwrap() - 45.99).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_fields_are_none() {
        let tx: Transaction = serde_json::from_str(r#"{"codTransaccion": "TX-2"}"#).unwrap();
        assert!(tx.amount.is_none());
        assert!(tx.status.is_none());
        assert!(tx.timestamp.is_none());
    }
}
