//! Typed client and session state for a payment-gateway back office.
//!
//! The back office talks to four REST services (merchants, commissions,
//! recurring transactions, and transactions). This crate provides:
//!
//! - [`models`]: DTOs for every entity plus the canonical [`models::Page`];
//! - [`query`]: transaction filters and their query-string encoding;
//! - `client`: async and blocking HTTP clients (behind the `async` /
//!   `blocking` features);
//! - `backoffice`: the application-state object that owns one observable
//!   container per resource and discards stale responses;
//! - [`views`]: local search, sort, and summary helpers.
//!
//! ```no_run
//! # #[cfg(feature = "async")]
//! # async fn demo() -> payment_backoffice::error::Result<()> {
//! use payment_backoffice::backoffice::Backoffice;
//! use payment_backoffice::query::TransactionFilters;
//!
//! let backoffice = Backoffice::builder()
//!     .commissions_url("http://localhost:8083/v1/comisiones")
//!     .build()?;
//! backoffice.fetch_commissions().await?;
//! backoffice
//!     .fetch_transactions(Some(&TransactionFilters::new().page(1)))
//!     .await?;
//! let state = backoffice.transactions()?;
//! println!("{} of {} pages", state.pagination.page_number + 1, state.pagination.total_pages);
//! # Ok(())
//! # }
//! ```

#[cfg(any(feature = "async", feature = "blocking"))]
pub mod backoffice;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod state;
pub mod views;
