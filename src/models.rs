//! Data models for the back-office services.
//!
//! Strongly-typed DTOs for every entity, newtype ID wrappers, status/type
//! enumerations, and the canonical [`Page`] that collection responses are
//! normalized into.

mod billing;
mod commission;
mod enums;
mod ids;
mod merchant;
mod page;
mod recurring;
mod transaction;

pub use billing::BillingRecord;
pub use chrono::NaiveDate;
pub use commission::Commission;
pub use enums::{
    BillingStatus, CommissionType, MerchantStatus, RecurringStatus, SortDirection,
    TransactionStatus,
};
pub use ids::{BillingId, CommissionId, MerchantCode, RecurringCode, TransactionCode};
pub use merchant::Merchant;
pub use page::{DEFAULT_PAGE_SIZE, Page, Pagination};
pub use recurring::RecurringTransaction;
pub use transaction::Transaction;
