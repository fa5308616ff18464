//! Billing record (periodic merchant invoice) model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BillingId, BillingStatus, MerchantCode};

/// A periodic invoice for a merchant covering its processed transactions
/// and the commission owed for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    /// Storage identifier.
    pub id: BillingId,
    /// Billing code shown to operators.
    #[serde(rename = "codFacturacionComercio")]
    pub code: String,
    /// Billed merchant.
    #[serde(rename = "codComercio")]
    pub merchant: MerchantCode,
    /// First day of the billed period.
    #[serde(rename = "fechaInicio")]
    pub period_start: NaiveDate,
    /// Last day of the billed period.
    #[serde(rename = "fechaFin")]
    pub period_end: NaiveDate,
    /// Transactions processed during the period.
    #[serde(rename = "transaccionesProcesadas")]
    pub processed_transactions: u64,
    /// Commission rule the value was computed with.
    #[serde(rename = "codComision")]
    pub commission_code: String,
    /// Amount owed.
    #[serde(rename = "valor")]
    pub value: f64,
    /// Payment status.
    #[serde(rename = "estado")]
    pub status: BillingStatus,
    /// Date the invoice was issued.
    #[serde(rename = "fechaFacturacion")]
    pub billed_on: NaiveDate,
    /// Date the invoice was paid; `None` while pending.
    #[serde(rename = "fechaPago", default)]
    pub paid_on: Option<NaiveDate>,
}
