//! Client-side views over loaded records.
//!
//! Searching, sorting, and aggregating happen locally on whatever the
//! containers currently hold; none of these helpers issue requests.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Timelike};

use crate::models::{
    BillingRecord, BillingStatus, Commission, Merchant, MerchantStatus, RecurringStatus,
    RecurringTransaction, SortDirection, Transaction, TransactionStatus,
};

/// Timestamp layouts accepted when no offset is present.
const NAIVE_TIMESTAMP_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Case-insensitive substring test against a lower-cased needle.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Merchants whose trade name, code, tax ID, or legal name contains
/// `term`, ignoring case. An empty term matches everything.
#[inline]
#[must_use]
pub fn search_merchants<'m>(merchants: &'m [Merchant], term: &str) -> Vec<&'m Merchant> {
    let needle = term.trim().to_lowercase();
    merchants
        .iter()
        .filter(|merchant| {
            contains_folded(&merchant.trade_name, &needle)
                || merchant
                    .code
                    .as_ref()
                    .is_some_and(|code| contains_folded(code.as_inner(), &needle))
                || contains_folded(&merchant.tax_id, &needle)
                || contains_folded(&merchant.legal_name, &needle)
        })
        .collect()
}

/// Number of merchants with the given status.
#[inline]
#[must_use]
pub fn count_merchants(merchants: &[Merchant], status: MerchantStatus) -> usize {
    merchants
        .iter()
        .filter(|merchant| merchant.status == status)
        .count()
}

/// Commissions whose type code, type label, or code contains `term`,
/// ignoring case.
#[inline]
#[must_use]
pub fn search_commissions<'c>(commissions: &'c [Commission], term: &str) -> Vec<&'c Commission> {
    let needle = term.trim().to_lowercase();
    commissions
        .iter()
        .filter(|commission| {
            contains_folded(commission.kind.code(), &needle)
                || contains_folded(commission.kind.label(), &needle)
                || commission
                    .code
                    .as_deref()
                    .is_some_and(|code| contains_folded(code, &needle))
        })
        .collect()
}

/// Recurring transactions with the given status.
#[inline]
#[must_use]
pub fn filter_recurring(
    recurring: &[RecurringTransaction],
    status: RecurringStatus,
) -> Vec<&RecurringTransaction> {
    recurring.iter().filter(|item| item.status == status).collect()
}

/// Transactions whose code or card brand contains `term`, ignoring case.
#[inline]
#[must_use]
pub fn search_transactions<'t>(transactions: &'t [Transaction], term: &str) -> Vec<&'t Transaction> {
    let needle = term.trim().to_lowercase();
    transactions
        .iter()
        .filter(|tx| {
            tx.code
                .as_ref()
                .is_some_and(|code| contains_folded(code.as_inner(), &needle))
                || tx
                    .brand
                    .as_deref()
                    .is_some_and(|brand| contains_folded(brand, &needle))
        })
        .collect()
}

// ── Billing ─────────────────────────────────────────────────────────────

/// Column a billing table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BillingSortField {
    /// Billing date.
    #[default]
    BilledOn,
    /// Payment date; unpaid records have none.
    PaidOn,
    /// Start of the billed period.
    PeriodStart,
    /// Billed amount.
    Value,
}

impl BillingSortField {
    /// Command-line name of the field.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BilledOn => "billed-on",
            Self::PaidOn => "paid-on",
            Self::PeriodStart => "period-start",
            Self::Value => "value",
        }
    }
}

impl fmt::Display for BillingSortField {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingSortField {
    type Err = String;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "billed-on" => Ok(Self::BilledOn),
            "paid-on" => Ok(Self::PaidOn),
            "period-start" => Ok(Self::PeriodStart),
            "value" => Ok(Self::Value),
            other => Err(format!(
                "unknown sort field `{other}` (expected billed-on, paid-on, period-start or value)"
            )),
        }
    }
}

/// Billing records narrowed by status and search term.
///
/// The term matches the billing code or merchant code ignoring case, or
/// the decimal rendering of the value.
#[inline]
#[must_use]
pub fn filter_billing<'b>(
    records: &'b [BillingRecord],
    status: Option<BillingStatus>,
    term: &str,
) -> Vec<&'b BillingRecord> {
    let needle = term.trim().to_lowercase();
    records
        .iter()
        .filter(|record| status.is_none_or(|wanted| record.status == wanted))
        .filter(|record| {
            contains_folded(&record.code, &needle)
                || contains_folded(record.merchant.as_inner(), &needle)
                || record.value.to_string().contains(&needle)
        })
        .collect()
}

/// Sorts billing records in place. Missing payment dates go last when
/// ascending and first when descending.
#[inline]
pub fn sort_billing(records: &mut [&BillingRecord], field: BillingSortField, direction: SortDirection) {
    records.sort_by(|left, right| compare_billing(left, right, field, direction));
}

/// Orders two records by one column in one direction.
fn compare_billing(
    left: &BillingRecord,
    right: &BillingRecord,
    field: BillingSortField,
    direction: SortDirection,
) -> Ordering {
    let ordering = match field {
        BillingSortField::BilledOn => left.billed_on.cmp(&right.billed_on),
        BillingSortField::PeriodStart => left.period_start.cmp(&right.period_start),
        BillingSortField::Value => left.value.total_cmp(&right.value),
        BillingSortField::PaidOn => match (left.paid_on, right.paid_on) {
            (Some(a), Some(b)) => a.cmp(&b),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => {
                return match direction {
                    SortDirection::Asc => Ordering::Greater,
                    SortDirection::Desc => Ordering::Less,
                };
            }
            (Some(_), None) => {
                return match direction {
                    SortDirection::Asc => Ordering::Less,
                    SortDirection::Desc => Ordering::Greater,
                };
            }
        },
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Sums of billed values per status.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BillingTotals {
    /// Total of paid records.
    pub paid: f64,
    /// Total of pending records.
    pub pending: f64,
}

/// Sums the paid and pending values over all `records`.
#[inline]
#[must_use]
pub fn billing_totals(records: &[BillingRecord]) -> BillingTotals {
    records
        .iter()
        .fold(BillingTotals::default(), |mut totals, record| {
            match record.status {
                BillingStatus::Paid => totals.paid += record.value,
                BillingStatus::Pending => totals.pending += record.value,
                BillingStatus::Unknown => {}
            }
            totals
        })
}

// ── Transactions ────────────────────────────────────────────────────────

/// Aggregate figures over a page of transactions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionSummary {
    /// Number of transactions.
    pub count: usize,
    /// Sum of amounts; missing amounts count as zero.
    pub total_amount: f64,
    /// Number of completed transactions.
    pub completed: usize,
    /// Share of completed transactions, in percent.
    pub completion_rate: f64,
    /// Transactions per status; missing statuses count as unknown.
    pub by_status: BTreeMap<TransactionStatus, usize>,
    /// Transactions per hour of day, from the timestamp's own clock.
    pub by_hour: [usize; 24],
}

impl TransactionSummary {
    /// Computes the summary of `transactions`.
    #[must_use]
    pub fn of(transactions: &[Transaction]) -> Self {
        let mut summary = Self {
            count: transactions.len(),
            ..Self::default()
        };
        for tx in transactions {
            summary.total_amount += tx.amount.unwrap_or_default();
            let status = tx.status.unwrap_or(TransactionStatus::Unknown);
            if status == TransactionStatus::Completed {
                summary.completed += 1;
            }
            *summary.by_status.entry(status).or_default() += 1;
            if let Some(slot) = tx
                .timestamp
                .as_deref()
                .and_then(hour_of)
                .and_then(|hour| summary.by_hour.get_mut(hour))
            {
                *slot += 1;
            }
        }
        if summary.count > 0 {
            summary.completion_rate = ratio(summary.completed, summary.count) * 100.0;
        }
        summary
    }

    /// Completion rate rounded to one decimal.
    #[inline]
    #[must_use]
    pub fn completion_rate_rounded(&self) -> f64 {
        (self.completion_rate * 10.0).round() / 10.0
    }
}

/// `part / whole` as a float.
#[allow(
    clippy::cast_precision_loss,
    reason = "page-sized counts are far below 2^52"
)]
fn ratio(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64
}

/// Hour of day of a service timestamp, or `None` if it does not parse.
fn hour_of(raw: &str) -> Option<usize> {
    let hour = DateTime::parse_from_rfc3339(raw)
        .map(|stamp| stamp.hour())
        .ok()
        .or_else(|| {
            NAIVE_TIMESTAMP_FORMATS.iter().find_map(|format| {
                NaiveDateTime::parse_from_str(raw, format)
                    .ok()
                    .map(|stamp| stamp.hour())
            })
        })?;
    usize::try_from(hour).ok()
}
