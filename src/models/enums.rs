//! Enumeration types for the status and type codes used by the backends.
//!
//! Every code enum except [`SortDirection`] has an `Unknown` variant that
//! absorbs codes the client does not know, so one odd record cannot fail a
//! whole listing. `Unknown` is never a valid value to send.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MerchantStatus {
    /// Merchant can accept payments.
    #[serde(rename = "ACT")]
    Active,
    /// Merchant is disabled.
    #[serde(rename = "INA")]
    Inactive,
    /// Any code not listed above.
    #[serde(rename = "UNKNOWN", other)]
    Unknown,
}

impl MerchantStatus {
    /// Returns the human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Unknown => "Unknown",
        }
    }
}

/// How a commission amount is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CommissionType {
    /// Base amount is a percentage of the transaction value.
    #[serde(rename = "POR")]
    Percentage,
    /// Base amount is a flat fee.
    #[serde(rename = "FIJ")]
    Fixed,
    /// Any code not listed above.
    #[serde(rename = "UNKNOWN", other)]
    Unknown,
}

impl CommissionType {
    /// Returns the wire code (`POR` / `FIJ`).
    #[inline]
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Percentage => "POR",
            Self::Fixed => "FIJ",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns the human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Percentage => "Percentage",
            Self::Fixed => "Fixed",
            Self::Unknown => "Unknown",
        }
    }
}

/// Payment status of a billing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BillingStatus {
    /// Invoice has been paid.
    #[serde(rename = "PAG")]
    Paid,
    /// Invoice is awaiting payment.
    #[serde(rename = "PEN")]
    Pending,
    /// Any code not listed above.
    #[serde(rename = "UNKNOWN", other)]
    Unknown,
}

impl BillingStatus {
    /// Returns the human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Unknown => "Unknown",
        }
    }
}

/// Status of a recurring charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecurringStatus {
    /// Charge is scheduled and running.
    #[serde(rename = "ACT")]
    Active,
    /// Charge was cancelled.
    #[serde(rename = "CAN")]
    Cancelled,
    /// Charge is awaiting activation.
    #[serde(rename = "PEN")]
    Pending,
    /// Any code not listed above.
    #[serde(rename = "UNKNOWN", other)]
    Unknown,
}

impl RecurringStatus {
    /// Returns the human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Cancelled => "Cancelled",
            Self::Pending => "Pending",
            Self::Unknown => "Unknown",
        }
    }
}

/// Processing status of a single transaction.
///
/// Codes the client does not know deserialize as [`TransactionStatus::Unknown`]
/// so one odd record cannot fail a whole page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Completed successfully.
    #[serde(rename = "ACT")]
    Completed,
    /// Inactive / failed.
    #[serde(rename = "INA")]
    Inactive,
    /// Awaiting processing.
    #[serde(rename = "PEN")]
    Pending,
    /// Rejected by the processor.
    #[serde(rename = "REC")]
    Rejected,
    /// Any status code not listed above.
    #[serde(rename = "UNKNOWN", other)]
    Unknown,
}

impl TransactionStatus {
    /// Returns the wire code used in query parameters.
    #[inline]
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Completed => "ACT",
            Self::Inactive => "INA",
            Self::Pending => "PEN",
            Self::Rejected => "REC",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns the human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Inactive => "Inactive",
            Self::Pending => "Pending",
            Self::Rejected => "Rejected",
            Self::Unknown => "Unknown",
        }
    }
}

/// Sort direction for server-side ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    #[default]
    Desc,
}

impl SortDirection {
    /// Returns the upper-case wire value.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merchant_status_codes() {
        let json = serde_json::to_string(&MerchantStatus::Active).unwrap();
        assert_eq!(json, r#""ACT""#);
        let status: MerchantStatus = serde_json::from_str(r#""INA""#).unwrap();
        assert_eq!(status, MerchantStatus::Inactive);
    }

    #[test]
    fn commission_type_codes() {
        let json = serde_json::to_string(&CommissionType::Percentage).unwrap();
        assert_eq!(json, r#""POR""#);
        let kind: CommissionType = serde_json::from_str(r#""FIJ""#).unwrap();
        assert_eq!(kind, CommissionType::Fixed);
        assert_eq!(kind.code(), "FIJ");
    }

    #[test]
    fn billing_status_codes() {
        let status: BillingStatus = serde_json::from_str(r#""PAG""#).unwrap();
        assert_eq!(status, BillingStatus::Paid);
        assert_eq!(BillingStatus::Pending.label(), "Pending");
    }

    #[test]
    fn recurring_status_cancelled() {
        let status: RecurringStatus = serde_json::from_str(r#""CAN""#).unwrap();
        assert_eq!(status, RecurringStatus::Cancelled);
    }

    #[test]
    fn transaction_status_known_and_unknown() {
        let status: TransactionStatus = serde_json::from_str(r#""REC""#).unwrap();
        assert_eq!(status, TransactionStatus::Rejected);
        let status: TransactionStatus = serde_json::from_str(r#""XYZ""#).unwrap();
        assert_eq!(status, TransactionStatus::Unknown);
    }

    #[test]
    fn unrecognized_codes_fall_back_to_unknown() {
        let merchant: MerchantStatus = serde_json::from_str(r#""SUS""#).unwrap();
        assert_eq!(merchant, MerchantStatus::Unknown);
        let kind: CommissionType = serde_json::from_str(r#""MIX""#).unwrap();
        assert_eq!(kind, CommissionType::Unknown);
        let billing: BillingStatus = serde_json::from_str(r#""ANU""#).unwrap();
        assert_eq!(billing, BillingStatus::Unknown);
        let recurring: RecurringStatus = serde_json::from_str(r#""SUS""#).unwrap();
        assert_eq!(recurring, RecurringStatus::Unknown);
    }

    #[test]
    fn non_string_code_still_fails() {
        let result = serde_json::from_str::<MerchantStatus>("42");
        assert!(result.is_err());
    }

    #[test]
    fn sort_direction_wire_value() {
        assert_eq!(SortDirection::default(), SortDirection::Desc);
        assert_eq!(serde_json::to_string(&SortDirection::Asc).unwrap(), r#""ASC""#);
    }
}
