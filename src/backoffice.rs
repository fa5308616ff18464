//! Application state for the back office.
//!
//! [`Backoffice`] / [`BackofficeBlocking`] own the HTTP client and one
//! observable container per resource. Every operation takes `&self`, issues
//! its request without holding any lock, and then folds the outcome into
//! the container: lists are replaced, created records appended, updated
//! records swapped in and deleted records removed. Failures become the
//! container's error message and are also returned to the caller.

use crate::error::Result;
use crate::models::{Page, Transaction};
use crate::state::{Fenced, Ticket, TransactionState};

/// Error prefix for merchant listing failures.
const MERCHANTS_LOAD_FAILED: &str = "Failed to load merchants";
/// Error prefix for merchant creation failures.
const MERCHANT_CREATE_FAILED: &str = "Failed to create merchant";
/// Error prefix for commission listing failures.
const COMMISSIONS_LOAD_FAILED: &str = "Failed to load commissions";
/// Error prefix for commission creation failures.
const COMMISSION_CREATE_FAILED: &str = "Failed to create commission";
/// Error prefix for commission update failures.
const COMMISSION_UPDATE_FAILED: &str = "Failed to update commission";
/// Error prefix for commission deletion failures.
const COMMISSION_DELETE_FAILED: &str = "Failed to delete commission";
/// Error prefix for recurring listing failures.
const RECURRING_LOAD_FAILED: &str = "Failed to load recurring transactions";
/// Error prefix for recurring creation failures.
const RECURRING_CREATE_FAILED: &str = "Failed to create recurring transaction";
/// Error prefix for transaction listing failures.
const TRANSACTIONS_LOAD_FAILED: &str = "Failed to load transactions";
/// Error prefix for single transaction lookups.
const TRANSACTION_LOAD_FAILED: &str = "Failed to load transaction";

/// Folds a transaction listing outcome into the transaction container.
fn finish_listing(
    transactions: &Fenced<TransactionState>,
    ticket: Ticket,
    outcome: Result<Page<Transaction>>,
) -> Result<Page<Transaction>> {
    transactions.complete(ticket, outcome, TRANSACTIONS_LOAD_FAILED, |state, page| {
        state.items.clone_from(&page.content);
        state.pagination = page.pagination;
    })
}

/// Folds a single transaction lookup into the transaction container.
fn finish_lookup(
    transactions: &Fenced<TransactionState>,
    ticket: Ticket,
    outcome: Result<Transaction>,
) -> Result<Transaction> {
    transactions.complete(ticket, outcome, TRANSACTION_LOAD_FAILED, |state, tx| {
        state.current = Some(tx.clone());
    })
}

/// Generates the application-state object (async or blocking) with its
/// builder.
macro_rules! define_backoffice {
    (
        state_name: $state:ident,
        builder_name: $builder:ident,
        http_client: $http_client:ty,
        http_builder: $http_builder:ty,
        state_doc: $state_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Builder of the underlying HTTP client.
            http: $http_builder,
        }

        impl $builder {
            /// Replaces all base URLs at once.
            #[inline]
            #[must_use]
            pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
                self.http = self.http.endpoints(endpoints);
                self
            }

            /// Overrides the merchant service URL.
            #[inline]
            #[must_use]
            pub fn merchants_url<T: Into<String>>(mut self, url: T) -> Self {
                self.http = self.http.merchants_url(url);
                self
            }

            /// Overrides the commission service URL.
            #[inline]
            #[must_use]
            pub fn commissions_url<T: Into<String>>(mut self, url: T) -> Self {
                self.http = self.http.commissions_url(url);
                self
            }

            /// Overrides the recurring transaction service URL.
            #[inline]
            #[must_use]
            pub fn recurring_url<T: Into<String>>(mut self, url: T) -> Self {
                self.http = self.http.recurring_url(url);
                self
            }

            /// Overrides the transaction service URL.
            #[inline]
            #[must_use]
            pub fn transactions_url<T: Into<String>>(mut self, url: T) -> Self {
                self.http = self.http.transactions_url(url);
                self
            }

            /// Sets a timeout for every request.
            #[inline]
            #[must_use]
            pub fn timeout(mut self, timeout: Duration) -> Self {
                self.http = self.http.timeout(timeout);
                self
            }

            /// Builds the application state with empty containers.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::BackofficeError::InvalidEndpoint`] if a base URL does
            /// not parse.
            /// Returns [`crate::error::BackofficeError::Http`] if the HTTP client fails to build.
            #[inline]
            pub fn build(self) -> Result<$state> {
                Ok($state::with_client(self.http.build()?))
            }
        }

        #[doc = $state_doc]
        #[derive(Debug)]
        pub struct $state {
            /// Low-level HTTP client.
            client: $http_client,
            /// Merchant container.
            merchants: Fenced<ResourceState<Merchant>>,
            /// Commission container.
            commissions: Fenced<ResourceState<Commission>>,
            /// Recurring transaction container.
            recurring: Fenced<ResourceState<RecurringTransaction>>,
            /// Transaction browser.
            transactions: Fenced<TransactionState>,
        }

        impl $state {
            /// Creates a new builder pre-filled with the default endpoints.
            #[inline]
            #[must_use]
            pub fn builder() -> $builder {
                $builder {
                    http: <$http_client>::builder(),
                }
            }

            /// Wraps an already configured HTTP client.
            #[inline]
            #[must_use]
            pub fn with_client(client: $http_client) -> Self {
                Self {
                    client,
                    merchants: Fenced::new(ResourceState::default()),
                    commissions: Fenced::new(ResourceState::default()),
                    recurring: Fenced::new(ResourceState::default()),
                    transactions: Fenced::new(TransactionState::default()),
                }
            }

            /// Returns a snapshot of the merchant container.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::BackofficeError::State`] if the container lock is poisoned.
            #[inline]
            pub fn merchants(&self) -> Result<ResourceState<Merchant>> {
                self.merchants.snapshot()
            }

            /// Returns a snapshot of the commission container.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::BackofficeError::State`] if the container lock is poisoned.
            #[inline]
            pub fn commissions(&self) -> Result<ResourceState<Commission>> {
                self.commissions.snapshot()
            }

            /// Returns a snapshot of the recurring transaction container.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::BackofficeError::State`] if the container lock is poisoned.
            #[inline]
            pub fn recurring(&self) -> Result<ResourceState<RecurringTransaction>> {
                self.recurring.snapshot()
            }

            /// Returns a snapshot of the transaction browser.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::BackofficeError::State`] if the container lock is poisoned.
            #[inline]
            pub fn transactions(&self) -> Result<TransactionState> {
                self.transactions.snapshot()
            }

            // ── Merchants ────────────────────────────────────────────

            /// Reloads the merchant list.
            ///
            /// On failure the previous list is kept and the error is recorded.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the body cannot be parsed.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn fetch_merchants(&self) -> Result<Vec<Merchant>> {
                let ticket = self.merchants.begin(Some(Lane::List), |_| {})?;
                let outcome = self.client.list_merchants() $( .$await_ext )?;
                let page = self.merchants.complete(
                    ticket,
                    outcome,
                    MERCHANTS_LOAD_FAILED,
                    |state, page| state.items.clone_from(&page.content),
                )?;
                tracing::debug!(count = page.content.len(), "merchants loaded");
                Ok(page.content)
            }

            /// Validates and creates a merchant, appending the stored record.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::BackofficeError::Validation`] without sending anything
            /// if a required field is blank, or the request error otherwise.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_merchant(&self, merchant: &Merchant) -> Result<Merchant> {
                if let Err(err) = merchant.validate() {
                    self.merchants.reject(format!("{MERCHANT_CREATE_FAILED}: {err}"))?;
                    return Err(err);
                }
                let ticket = self.merchants.begin(None, |_| {})?;
                let outcome = self.client.create_merchant(merchant) $( .$await_ext )?;
                self.merchants.complete(
                    ticket,
                    outcome,
                    MERCHANT_CREATE_FAILED,
                    |state, created| state.items.push(created.clone()),
                )
            }

            // ── Commissions ──────────────────────────────────────────

            /// Reloads the commission list.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the body cannot be parsed.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn fetch_commissions(&self) -> Result<Vec<Commission>> {
                let ticket = self.commissions.begin(Some(Lane::List), |_| {})?;
                let outcome = self.client.list_commissions() $( .$await_ext )?;
                let page = self.commissions.complete(
                    ticket,
                    outcome,
                    COMMISSIONS_LOAD_FAILED,
                    |state, page| state.items.clone_from(&page.content),
                )?;
                Ok(page.content)
            }

            /// Validates and creates a commission rule.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::BackofficeError::Validation`] without sending anything
            /// if the base amount is invalid, or the request error otherwise.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_commission(&self, commission: &Commission) -> Result<Commission> {
                if let Err(err) = commission.validate() {
                    self.commissions.reject(format!("{COMMISSION_CREATE_FAILED}: {err}"))?;
                    return Err(err);
                }
                let ticket = self.commissions.begin(None, |_| {})?;
                let outcome = self.client.create_commission(commission) $( .$await_ext )?;
                self.commissions.complete(
                    ticket,
                    outcome,
                    COMMISSION_CREATE_FAILED,
                    |state, created| state.items.push(created.clone()),
                )
            }

            /// Replaces the commission stored under `id` and swaps the local
            /// record for the one the server returns.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::BackofficeError::Validation`] without sending anything
            /// if the base amount is invalid, or the request error otherwise.
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn update_commission(
                &self,
                id: &CommissionId,
                commission: &Commission,
            ) -> Result<Commission> {
                if let Err(err) = commission.validate() {
                    self.commissions.reject(format!("{COMMISSION_UPDATE_FAILED}: {err}"))?;
                    return Err(err);
                }
                let ticket = self.commissions.begin(None, |_| {})?;
                let outcome = self.client.update_commission(id, commission) $( .$await_ext )?;
                self.commissions.complete(
                    ticket,
                    outcome,
                    COMMISSION_UPDATE_FAILED,
                    |state, updated| {
                        state
                            .items
                            .iter_mut()
                            .filter(|item| item.id.as_ref() == Some(id))
                            .for_each(|item| item.clone_from(updated));
                    },
                )
            }

            /// Deletes the commission stored under `id` and drops it locally.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails.
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn delete_commission(&self, id: &CommissionId) -> Result<()> {
                let ticket = self.commissions.begin(None, |_| {})?;
                let outcome = self.client.delete_commission(id) $( .$await_ext )?;
                self.commissions.complete(
                    ticket,
                    outcome,
                    COMMISSION_DELETE_FAILED,
                    |state, _| state.items.retain(|item| item.id.as_ref() != Some(id)),
                )
            }

            // ── Recurring transactions ───────────────────────────────

            /// Reloads the recurring transaction list.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the body cannot be parsed.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn fetch_recurring(&self) -> Result<Vec<RecurringTransaction>> {
                let ticket = self.recurring.begin(Some(Lane::List), |_| {})?;
                let outcome = self.client.list_recurring() $( .$await_ext )?;
                let page = self.recurring.complete(
                    ticket,
                    outcome,
                    RECURRING_LOAD_FAILED,
                    |state, page| state.items.clone_from(&page.content),
                )?;
                Ok(page.content)
            }

            /// Validates and creates a recurring transaction.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::BackofficeError::Validation`] without sending anything
            /// if the schedule is inconsistent, or the request error otherwise.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_recurring(
                &self,
                recurring: &RecurringTransaction,
            ) -> Result<RecurringTransaction> {
                if let Err(err) = recurring.validate() {
                    self.recurring.reject(format!("{RECURRING_CREATE_FAILED}: {err}"))?;
                    return Err(err);
                }
                let ticket = self.recurring.begin(None, |_| {})?;
                let outcome = self.client.create_recurring(recurring) $( .$await_ext )?;
                self.recurring.complete(
                    ticket,
                    outcome,
                    RECURRING_CREATE_FAILED,
                    |state, created| state.items.push(created.clone()),
                )
            }

            // ── Transactions ─────────────────────────────────────────

            /// Merges `patch` into the current filters and loads the matching
            /// page. The merged filters become current only on success.
            ///
            /// A patch can only set keys; use
            /// [`fetch_transactions_with`](Self::fetch_transactions_with) to
            /// clear one.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails, times out, or the body
            /// cannot be parsed.
            #[inline]
            pub $($async_kw)? fn fetch_transactions(
                &self,
                patch: Option<&TransactionFilters>,
            ) -> Result<Page<Transaction>> {
                self.fetch_transactions_with(|filters| {
                    if let Some(overrides) = patch {
                        filters.merge(overrides);
                    }
                }) $( .$await_ext )?
            }

            /// Applies `edit` to a copy of the current filters and loads the
            /// matching page. The edit can set or clear any key; the edited
            /// filters become current only on success.
            ///
            /// The copy is taken when the request starts, so no other listing
            /// can slip in between the edit and the fetch.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails, times out, or the body
            /// cannot be parsed.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn fetch_transactions_with<F>(&self, edit: F) -> Result<Page<Transaction>>
            where
                F: FnOnce(&mut TransactionFilters),
            {
                let mut filters = TransactionFilters::new();
                let ticket = self.transactions.begin(Some(Lane::List), |state| {
                    filters.clone_from(&state.filters);
                    edit(&mut filters);
                })?;
                let outcome = self.client.list_transactions(&filters) $( .$await_ext )?;
                self.transactions.complete(
                    ticket,
                    outcome,
                    TRANSACTIONS_LOAD_FAILED,
                    |state, page| {
                        state.items.clone_from(&page.content);
                        state.pagination = page.pagination;
                        state.filters.clone_from(&filters);
                    },
                )
            }

            /// Merges `patch` into the current filters without fetching.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::BackofficeError::State`] if the container lock is poisoned.
            #[inline]
            pub fn set_transaction_filters(&self, patch: &TransactionFilters) -> Result<()> {
                self.transactions.with_state(|state| state.filters.merge(patch))
            }

            /// Edits the current filters in place. Unlike a merge this can
            /// clear a key.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::BackofficeError::State`] if the container lock is poisoned.
            #[inline]
            pub fn edit_transaction_filters<F>(&self, edit: F) -> Result<()>
            where
                F: FnOnce(&mut TransactionFilters),
            {
                self.transactions.with_state(|state| edit(&mut state.filters))
            }

            /// Restores the initial filters.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::BackofficeError::State`] if the container lock is poisoned.
            #[inline]
            pub fn reset_transaction_filters(&self) -> Result<()> {
                self.transactions
                    .with_state(|state| state.filters = TransactionFilters::initial())
            }

            /// Opens a transaction by code. The current record is cleared
            /// while the lookup runs.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the body cannot be parsed.
            #[tracing::instrument(skip_all, fields(code = %code))]
            pub $($async_kw)? fn fetch_transaction(&self, code: &TransactionCode) -> Result<Transaction> {
                let ticket = self
                    .transactions
                    .begin(Some(Lane::Detail), |state| state.current = None)?;
                let outcome = self.client.transaction(code) $( .$await_ext )?;
                finish_lookup(&self.transactions, ticket, outcome)
            }

            /// Opens a transaction by its unique code.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the body cannot be parsed.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn fetch_transaction_by_unique_code(
                &self,
                unique_code: &str,
            ) -> Result<Transaction> {
                let ticket = self
                    .transactions
                    .begin(Some(Lane::Detail), |state| state.current = None)?;
                let outcome = self.client.transaction_by_unique_code(unique_code) $( .$await_ext )?;
                finish_lookup(&self.transactions, ticket, outcome)
            }

            /// Lists the transactions made with one card. Filters are left
            /// untouched.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the body cannot be parsed.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn fetch_transactions_by_card(
                &self,
                card_number: &str,
            ) -> Result<Page<Transaction>> {
                let ticket = self.transactions.begin(Some(Lane::List), |_| {})?;
                let outcome = self.client.transactions_by_card(card_number) $( .$await_ext )?;
                finish_listing(&self.transactions, ticket, outcome)
            }

            /// Lists the transactions settled in one currency.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the body cannot be parsed.
            #[tracing::instrument(skip_all, fields(currency = %currency))]
            pub $($async_kw)? fn fetch_transactions_by_currency(
                &self,
                currency: &str,
            ) -> Result<Page<Transaction>> {
                let ticket = self.transactions.begin(Some(Lane::List), |_| {})?;
                let outcome = self.client.transactions_by_currency(currency) $( .$await_ext )?;
                finish_listing(&self.transactions, ticket, outcome)
            }

            /// Lists the transactions from one country.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the body cannot be parsed.
            #[tracing::instrument(skip_all, fields(country = %country))]
            pub $($async_kw)? fn fetch_transactions_by_country(
                &self,
                country: &str,
            ) -> Result<Page<Transaction>> {
                let ticket = self.transactions.begin(Some(Lane::List), |_| {})?;
                let outcome = self.client.transactions_by_country(country) $( .$await_ext )?;
                finish_listing(&self.transactions, ticket, outcome)
            }

            /// Lists the transactions whose amount lies within `[min, max]`.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the body cannot be parsed.
            #[tracing::instrument(skip_all, fields(min = min, max = max))]
            pub $($async_kw)? fn fetch_transactions_by_amount(
                &self,
                min: f64,
                max: f64,
            ) -> Result<Page<Transaction>> {
                let ticket = self.transactions.begin(Some(Lane::List), |_| {})?;
                let outcome = self.client.transactions_by_amount(min, max) $( .$await_ext )?;
                finish_listing(&self.transactions, ticket, outcome)
            }

            /// Closes the currently opened transaction.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::BackofficeError::State`] if the container lock is poisoned.
            #[inline]
            pub fn reset_current_transaction(&self) -> Result<()> {
                self.transactions.with_state(|state| state.current = None)
            }
        }
    };
}

// ── Async variant ───────────────────────────────────────────────────────

#[cfg(feature = "async")]
mod async_backoffice {
    //! Async application state.

    use core::time::Duration;

    use super::{
        COMMISSION_CREATE_FAILED, COMMISSION_DELETE_FAILED, COMMISSION_UPDATE_FAILED,
        COMMISSIONS_LOAD_FAILED, MERCHANT_CREATE_FAILED, MERCHANTS_LOAD_FAILED,
        RECURRING_CREATE_FAILED, RECURRING_LOAD_FAILED, TRANSACTIONS_LOAD_FAILED, finish_listing,
        finish_lookup,
    };
    use crate::client::{BackofficeClient, BackofficeClientBuilder};
    use crate::config::Endpoints;
    use crate::error::Result;
    use crate::models::{
        Commission, CommissionId, Merchant, Page, RecurringTransaction, Transaction,
        TransactionCode,
    };
    use crate::query::TransactionFilters;
    use crate::state::{Fenced, Lane, ResourceState, TransactionState};

    define_backoffice! {
        state_name: Backoffice,
        builder_name: BackofficeBuilder,
        http_client: BackofficeClient,
        http_builder: BackofficeClientBuilder,
        state_doc: "Async back-office application state.\n\nUse [`Backoffice::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`Backoffice`].",
        async_kw: async,
        await_kw: await,
    }
}

// ── Blocking variant ────────────────────────────────────────────────────

#[cfg(feature = "blocking")]
mod blocking_backoffice {
    //! Blocking application state.

    use core::time::Duration;

    use super::{
        COMMISSION_CREATE_FAILED, COMMISSION_DELETE_FAILED, COMMISSION_UPDATE_FAILED,
        COMMISSIONS_LOAD_FAILED, MERCHANT_CREATE_FAILED, MERCHANTS_LOAD_FAILED,
        RECURRING_CREATE_FAILED, RECURRING_LOAD_FAILED, TRANSACTIONS_LOAD_FAILED, finish_listing,
        finish_lookup,
    };
    use crate::client::{BackofficeBlockingClient, BackofficeBlockingClientBuilder};
    use crate::config::Endpoints;
    use crate::error::Result;
    use crate::models::{
        Commission, CommissionId, Merchant, Page, RecurringTransaction, Transaction,
        TransactionCode,
    };
    use crate::query::TransactionFilters;
    use crate::state::{Fenced, Lane, ResourceState, TransactionState};

    define_backoffice! {
        state_name: BackofficeBlocking,
        builder_name: BackofficeBlockingBuilder,
        http_client: BackofficeBlockingClient,
        http_builder: BackofficeBlockingClientBuilder,
        state_doc: "Blocking back-office application state.\n\nUse [`BackofficeBlocking::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`BackofficeBlocking`].",
    }
}

#[cfg(feature = "async")]
pub use async_backoffice::{Backoffice, BackofficeBuilder};
#[cfg(feature = "blocking")]
pub use blocking_backoffice::{BackofficeBlocking, BackofficeBlockingBuilder};

#[cfg(all(test, feature = "async"))]
mod tests {
    use core::time::Duration;

    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::Backoffice;
    use crate::error::BackofficeError;
    use crate::models::{
        Commission, CommissionId, CommissionType, Merchant, TransactionCode, TransactionStatus,
    };
    use crate::query::TransactionFilters;

    const COMMISSIONS_BODY: &str = r#"[
        {"id":"c-1","codComision":"C1","tipo":"POR","montoBase":2.5,"transaccionesBase":100},
        {"id":"c-2","codComision":"C2","tipo":"FIJ","montoBase":10.0,"transaccionesBase":1}
    ]"#;

    fn backoffice_for(server: &MockServer) -> Backoffice {
        let base = server.uri();
        Backoffice::builder()
            .merchants_url(format!("{base}/v1/comercios"))
            .commissions_url(format!("{base}/v1/comisiones"))
            .recurring_url(format!("{base}/v1/transacciones-recurrentes"))
            .transactions_url(format!("{base}/api/v1/transacciones"))
            .build()
            .unwrap()
    }

    async fn mount_commissions(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/comisiones"))
            .respond_with(ResponseTemplate::new(200).set_body_string(COMMISSIONS_BODY))
            .mount(server)
            .await;
    }

    fn page_body(codes: &[&str], page: u32, total: u64) -> String {
        let content: Vec<String> = codes
            .iter()
            .map(|code| format!(r#"{{"codTransaccion":"{code}","estado":"ACT"}}"#))
            .collect();
        format!(
            r#"{{"content":[{}],"pageNumber":{page},"pageSize":10,"totalElements":{total}}}"#,
            content.join(",")
        )
    }

    #[tokio::test]
    async fn fetch_replaces_list() {
        let server = MockServer::start().await;
        mount_commissions(&server).await;
        let backoffice = backoffice_for(&server);

        let fetched = backoffice.fetch_commissions().await.unwrap();
        assert_eq!(fetched.len(), 2);

        let state = backoffice.commissions().unwrap();
        assert_eq!(state.items, fetched);
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/comisiones"))
            .respond_with(ResponseTemplate::new(200).set_body_string(COMMISSIONS_BODY))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/comisiones"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let _first = backoffice.fetch_commissions().await.unwrap();
        let err = backoffice.fetch_commissions().await.unwrap_err();
        assert!(matches!(err, BackofficeError::Api { status: 500, .. }));

        let state = backoffice.commissions().unwrap();
        assert_eq!(state.items.len(), 2);
        assert!(!state.loading);
        let message = state.error.unwrap();
        assert!(message.starts_with("Failed to load commissions: "));
        assert!(message.contains("database down"));
    }

    #[tokio::test]
    async fn malformed_body_sets_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/comercios"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let err = backoffice.fetch_merchants().await.unwrap_err();
        assert!(matches!(err, BackofficeError::Serialization(_)));
        let state = backoffice.merchants().unwrap();
        assert!(state.items.is_empty());
        assert!(state.error.is_some_and(|message| !message.is_empty()));
    }

    #[tokio::test]
    async fn delete_removes_only_matching_commission() {
        let server = MockServer::start().await;
        mount_commissions(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/v1/comisiones/c-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let _loaded = backoffice.fetch_commissions().await.unwrap();
        backoffice
            .delete_commission(&CommissionId::new("c-1"))
            .await
            .unwrap();

        let ids: Vec<_> = backoffice
            .commissions()
            .unwrap()
            .items
            .into_iter()
            .filter_map(|item| item.id)
            .collect();
        assert_eq!(ids, vec![CommissionId::new("c-2")]);
    }

    #[tokio::test]
    async fn failed_delete_keeps_commission() {
        let server = MockServer::start().await;
        mount_commissions(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/v1/comisiones/c-1"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let _loaded = backoffice.fetch_commissions().await.unwrap();
        let result = backoffice.delete_commission(&CommissionId::new("c-1")).await;
        assert!(result.is_err());
        let state = backoffice.commissions().unwrap();
        assert_eq!(state.items.len(), 2);
        assert!(state
            .error
            .is_some_and(|message| message.starts_with("Failed to delete commission")));
    }

    #[tokio::test]
    async fn update_replaces_matching_commission() {
        let server = MockServer::start().await;
        mount_commissions(&server).await;
        Mock::given(method("PUT"))
            .and(path("/v1/comisiones/c-2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"id":"c-2","codComision":"C2","tipo":"FIJ","montoBase":12.0,"transaccionesBase":1}"#,
            ))
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let _loaded = backoffice.fetch_commissions().await.unwrap();
        let updated = backoffice
            .update_commission(
                &CommissionId::new("c-2"),
                &Commission::draft(CommissionType::Fixed, 12.0, 1),
            )
            .await
            .unwrap();

        let state = backoffice.commissions().unwrap();
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[1], updated);
        assert!((state.items[0].base_amount - 2.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn create_appends_echoed_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/comercios"))
            .respond_with(ResponseTemplate::new(201).set_body_string(
                r#"{"codigoComercio":"M-1","ruc":"179","razonSocial":"Cafe S.A.","nombreComercial":"Cafe","estado":"ACT","cuentaIban":"EC00"}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let created = backoffice
            .create_merchant(&Merchant::draft("Cafe", "Cafe S.A.", "179", "EC00"))
            .await
            .unwrap();
        assert!(created.code.is_some());

        let state = backoffice.merchants().unwrap();
        assert_eq!(state.items, vec![created]);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn invalid_create_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let err = backoffice
            .create_merchant(&Merchant::draft("", "Cafe S.A.", "179", "EC00"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackofficeError::Validation(_)));
        let state = backoffice.merchants().unwrap();
        assert!(state
            .error
            .is_some_and(|message| message.starts_with("Failed to create merchant")));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn unscoped_fetch_sends_default_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transacciones"))
            .and(query_param("tipo", "PAG"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);
        backoffice
            .edit_transaction_filters(|filters| filters.kind = None)
            .unwrap();

        let page = backoffice.fetch_transactions(None).await.unwrap();
        assert!(page.content.is_empty());
    }

    #[tokio::test]
    async fn blank_scoping_values_fall_back_to_default_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transacciones"))
            .and(query_param("tipo", "PAG"))
            .and(query_param_is_missing("marca"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let patch = TransactionFilters::new().kind("").brand("  ");
        let page = backoffice.fetch_transactions(Some(&patch)).await.unwrap();
        assert!(page.content.is_empty());
        assert!(backoffice.transactions().unwrap().error.is_none());
    }

    #[tokio::test]
    async fn fetch_with_clears_a_key_in_one_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transacciones"))
            .and(query_param_is_missing("estado"))
            .and(query_param("tipo", "PAG"))
            .and(query_param("page", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&["T-1"], 0, 1)))
            .expect(1)
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);
        backoffice
            .set_transaction_filters(&TransactionFilters::new().status(TransactionStatus::Pending).page(4))
            .unwrap();

        let _page = backoffice
            .fetch_transactions_with(|filters| {
                filters.status = None;
                filters.page = Some(0);
            })
            .await
            .unwrap();

        let filters = backoffice.transactions().unwrap().filters;
        assert_eq!(filters.status, None);
        assert_eq!(filters.page, Some(0));
        assert_eq!(filters.kind.as_deref(), Some("PAG"));
    }

    #[tokio::test]
    async fn fetch_stores_pagination_and_merged_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transacciones"))
            .and(query_param("page", "1"))
            .and(query_param("size", "10"))
            .and(query_param("moneda", "USD"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(page_body(&["T-11", "T-12"], 1, 25)),
            )
            .expect(1)
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let patch = TransactionFilters::new().page(1).currency("USD");
        let _page = backoffice.fetch_transactions(Some(&patch)).await.unwrap();

        let state = backoffice.transactions().unwrap();
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.pagination.page_number, 1);
        assert_eq!(state.pagination.total_pages, 3);
        assert_eq!(state.pagination.total_elements, 25);
        assert_eq!(state.filters.page, Some(1));
        assert_eq!(state.filters.currency.as_deref(), Some("USD"));
        assert_eq!(state.filters.kind.as_deref(), Some("PAG"));
    }

    #[tokio::test]
    async fn failed_fetch_keeps_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transacciones"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let patch = TransactionFilters::new().status(TransactionStatus::Rejected);
        let result = backoffice.fetch_transactions(Some(&patch)).await;
        assert!(result.is_err());

        let state = backoffice.transactions().unwrap();
        assert_eq!(state.filters, TransactionFilters::initial());
        assert!(!state.loading);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn stale_listing_is_discarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transacciones"))
            .and(query_param("page", "0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(page_body(&["OLD"], 0, 1))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transacciones"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&["NEW"], 1, 11)))
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let first = TransactionFilters::new().page(0);
        let second = TransactionFilters::new().page(1);
        let (older, newer) = tokio::join!(
            backoffice.fetch_transactions(Some(&first)),
            backoffice.fetch_transactions(Some(&second)),
        );
        assert!(older.is_ok());
        assert!(newer.is_ok());

        let state = backoffice.transactions().unwrap();
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].code, Some(TransactionCode::new("NEW")));
        assert_eq!(state.pagination.page_number, 1);
        assert_eq!(state.filters.page, Some(1));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn lookup_sets_current_and_reset_clears_it() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transacciones/T-5"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"codTransaccion":"T-5","monto":40.0,"estado":"PEN"}"#,
            ))
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let tx = backoffice
            .fetch_transaction(&TransactionCode::new("T-5"))
            .await
            .unwrap();
        assert_eq!(backoffice.transactions().unwrap().current, Some(tx));

        backoffice.reset_current_transaction().unwrap();
        assert!(backoffice.transactions().unwrap().current.is_none());
    }

    #[tokio::test]
    async fn failed_lookup_clears_current_and_keeps_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transacciones"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&["T-1", "T-2"], 0, 2)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transacciones/T-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"codTransaccion":"T-1","estado":"ACT"}"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transacciones/T-404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);
        let _page = backoffice.fetch_transactions(None).await.unwrap();
        let _opened = backoffice
            .fetch_transaction(&TransactionCode::new("T-1"))
            .await
            .unwrap();

        let err = backoffice
            .fetch_transaction(&TransactionCode::new("T-404"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackofficeError::Api { status: 404, .. }));

        let state = backoffice.transactions().unwrap();
        assert!(state.current.is_none());
        assert_eq!(state.items.len(), 2);
        assert!(!state.loading);
        assert!(state
            .error
            .is_some_and(|message| message.starts_with("Failed to load transaction: ")));
    }

    #[tokio::test]
    async fn failed_unique_code_lookup_sets_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transacciones/codigo-unico/U-9"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let result = backoffice.fetch_transaction_by_unique_code("U-9").await;
        assert!(result.is_err());

        let state = backoffice.transactions().unwrap();
        assert!(state.current.is_none());
        assert!(state.items.is_empty());
        assert!(state
            .error
            .is_some_and(|message| message.starts_with("Failed to load transaction: ")));
    }

    #[tokio::test]
    async fn lookup_by_currency_leaves_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transacciones/moneda/EUR"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"codTransaccion":"T-1","moneda":"EUR"},{"codTransaccion":"T-2","moneda":"EUR"}]"#,
            ))
            .mount(&server)
            .await;
        let backoffice = backoffice_for(&server);

        let page = backoffice.fetch_transactions_by_currency("EUR").await.unwrap();
        assert_eq!(page.content.len(), 2);

        let state = backoffice.transactions().unwrap();
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.pagination.total_pages, 1);
        assert_eq!(state.filters, TransactionFilters::initial());
    }

    #[tokio::test]
    async fn filter_helpers_merge_edit_and_reset() {
        let server = MockServer::start().await;
        let backoffice = backoffice_for(&server);

        backoffice
            .set_transaction_filters(&TransactionFilters::new().brand("VISA"))
            .unwrap();
        backoffice
            .edit_transaction_filters(|filters| filters.size = Some(50))
            .unwrap();
        let filters = backoffice.transactions().unwrap().filters;
        assert_eq!(filters.brand.as_deref(), Some("VISA"));
        assert_eq!(filters.size, Some(50));
        assert_eq!(filters.sort.as_deref(), Some("fecha"));

        backoffice.reset_transaction_filters().unwrap();
        assert_eq!(
            backoffice.transactions().unwrap().filters,
            TransactionFilters::initial()
        );
    }
}

#[cfg(all(test, feature = "blocking"))]
mod blocking_tests {
    use super::BackofficeBlocking;
    use crate::error::BackofficeError;
    use crate::models::{Commission, CommissionType};

    #[test]
    fn builder_rejects_bad_endpoint() {
        let result = BackofficeBlocking::builder()
            .commissions_url("::not a url::")
            .build();
        assert!(matches!(result, Err(BackofficeError::InvalidEndpoint(_))));
    }

    #[test]
    fn starts_with_empty_containers() {
        let backoffice = BackofficeBlocking::builder().build().unwrap();
        assert!(backoffice.merchants().unwrap().items.is_empty());
        assert!(backoffice.recurring().unwrap().error.is_none());
        assert!(!backoffice.transactions().unwrap().loading);
    }

    #[test]
    fn invalid_commission_is_rejected_locally() {
        let backoffice = BackofficeBlocking::builder()
            .commissions_url("http://127.0.0.1:9/v1/comisiones")
            .build()
            .unwrap();
        let err = backoffice
            .create_commission(&Commission::draft(CommissionType::Percentage, -1.0, 10))
            .unwrap_err();
        assert!(matches!(err, BackofficeError::Validation(_)));
        let state = backoffice.commissions().unwrap();
        assert!(state.items.is_empty());
        assert!(state
            .error
            .is_some_and(|message| message.starts_with("Failed to create commission")));
    }
}
