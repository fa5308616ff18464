//! HTTP client for the back-office REST services.
//!
//! Provides both async and blocking client variants behind feature flags.
//! Collection responses are normalized into [`crate::models::Page`]
//! regardless of the envelope the service uses.

use reqwest::Url;

use crate::config::Endpoints;
use crate::error::{BackofficeError, Result};

/// Path segment for unique-code lookups.
const UNIQUE_CODE_SEGMENT: &str = "codigo-unico";

/// Path segment for card-number lookups.
const CARD_SEGMENT: &str = "tarjeta";

/// Path segment for currency lookups.
const CURRENCY_SEGMENT: &str = "moneda";

/// Path segment for country lookups.
const COUNTRY_SEGMENT: &str = "pais";

/// Path segment for amount-range lookups.
const AMOUNT_SEGMENT: &str = "monto";

/// Base URLs parsed once at build time.
#[derive(Debug, Clone)]
struct Routes {
    /// Merchant collection.
    merchants: Url,
    /// Commission collection.
    commissions: Url,
    /// Recurring transaction collection.
    recurring: Url,
    /// Transaction collection.
    transactions: Url,
}

impl Routes {
    /// Parses and checks every configured base URL.
    fn parse(endpoints: &Endpoints) -> Result<Self> {
        Ok(Self {
            merchants: parse_base(&endpoints.merchants)?,
            commissions: parse_base(&endpoints.commissions)?,
            recurring: parse_base(&endpoints.recurring)?,
            transactions: parse_base(&endpoints.transactions)?,
        })
    }
}

/// Parses a base URL, rejecting URLs that cannot take path segments.
fn parse_base(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|err| BackofficeError::InvalidEndpoint(format!("{raw}: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(BackofficeError::InvalidEndpoint(format!(
            "{raw}: not a hierarchical URL"
        )));
    }
    Ok(url)
}

/// Appends percent-encoded path segments to a base URL.
fn child(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| BackofficeError::InvalidEndpoint(base.to_string()))?;
        _ = path.pop_if_empty().extend(segments);
    }
    Ok(url)
}

/// Generates a back-office client (async or blocking) with builder, methods, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        request_type: $req_type:ty,
        response_type: $resp_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
        $(send_bound: $send_bound:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Base URLs of the resource services.
            endpoints: Endpoints,
            /// Timeout applied to every request, if any.
            timeout: Option<Duration>,
        }

        impl $builder {
            /// Replaces all base URLs at once.
            #[inline]
            #[must_use]
            pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
                self.endpoints = endpoints;
                self
            }

            /// Overrides the merchant service URL.
            #[inline]
            #[must_use]
            pub fn merchants_url<T: Into<String>>(mut self, url: T) -> Self {
                self.endpoints.merchants = url.into();
                self
            }

            /// Overrides the commission service URL.
            #[inline]
            #[must_use]
            pub fn commissions_url<T: Into<String>>(mut self, url: T) -> Self {
                self.endpoints.commissions = url.into();
                self
            }

            /// Overrides the recurring transaction service URL.
            #[inline]
            #[must_use]
            pub fn recurring_url<T: Into<String>>(mut self, url: T) -> Self {
                self.endpoints.recurring = url.into();
                self
            }

            /// Overrides the transaction service URL.
            #[inline]
            #[must_use]
            pub fn transactions_url<T: Into<String>>(mut self, url: T) -> Self {
                self.endpoints.transactions = url.into();
                self
            }

            /// Sets a timeout for every request. Without it only transaction
            /// listings are bounded (by [`TRANSACTION_LIST_TIMEOUT`]).
            #[inline]
            #[must_use]
            pub const fn timeout(mut self, timeout: Duration) -> Self {
                self.timeout = Some(timeout);
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`BackofficeError::InvalidEndpoint`] if a base URL does
            /// not parse.
            /// Returns [`BackofficeError::Http`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let routes = Routes::parse(&self.endpoints)?;
                tracing::debug!(
                    merchants = %routes.merchants,
                    commissions = %routes.commissions,
                    recurring = %routes.recurring,
                    transactions = %routes.transactions,
                    "building client"
                );
                let mut http_builder = <$http_type>::builder();
                if let Some(timeout) = self.timeout {
                    http_builder = http_builder.timeout(timeout);
                }
                let http = http_builder.build()?;

                Ok($client { http, routes })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// Parsed base URLs.
            routes: Routes,
        }

        impl $client {
            /// Creates a new builder pre-filled with the default endpoints.
            #[inline]
            #[must_use]
            pub fn builder() -> $builder {
                $builder {
                    endpoints: Endpoints::default(),
                    timeout: None,
                }
            }

            /// Lists merchants.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn list_merchants(&self) -> Result<Page<Merchant>> {
                tracing::debug!("listing merchants");
                self.get_page(self.routes.merchants.clone(), &[], None) $( .$await_ext )?
            }

            /// Creates a merchant and returns the record the server stored.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_merchant(&self, merchant: &Merchant) -> Result<Merchant> {
                tracing::debug!(trade_name = %merchant.trade_name, "creating merchant");
                self.send_json(Method::POST, self.routes.merchants.clone(), merchant) $( .$await_ext )?
            }

            /// Lists commission rules.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn list_commissions(&self) -> Result<Page<Commission>> {
                tracing::debug!("listing commissions");
                self.get_page(self.routes.commissions.clone(), &[], None) $( .$await_ext )?
            }

            /// Creates a commission rule.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_commission(&self, commission: &Commission) -> Result<Commission> {
                tracing::debug!(kind = commission.kind.code(), "creating commission");
                self.send_json(Method::POST, self.routes.commissions.clone(), commission) $( .$await_ext )?
            }

            /// Replaces the commission rule stored under `id`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn update_commission(
                &self,
                id: &CommissionId,
                commission: &Commission,
            ) -> Result<Commission> {
                let url = child(&self.routes.commissions, &[id.as_inner()])?;
                self.send_json(Method::PUT, url, commission) $( .$await_ext )?
            }

            /// Deletes the commission rule stored under `id`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server returns
            /// a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn delete_commission(&self, id: &CommissionId) -> Result<()> {
                let url = child(&self.routes.commissions, &[id.as_inner()])?;
                let _body = Self::execute(self.http.delete(url), None) $( .$await_ext )? ?;
                Ok(())
            }

            /// Lists recurring transactions.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn list_recurring(&self) -> Result<Page<RecurringTransaction>> {
                tracing::debug!("listing recurring transactions");
                self.get_page(self.routes.recurring.clone(), &[], None) $( .$await_ext )?
            }

            /// Creates a recurring transaction.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_recurring(
                &self,
                recurring: &RecurringTransaction,
            ) -> Result<RecurringTransaction> {
                self.send_json(Method::POST, self.routes.recurring.clone(), recurring) $( .$await_ext )?
            }

            /// Lists transactions with server-side filtering and pagination.
            ///
            /// The request is bounded by [`TRANSACTION_LIST_TIMEOUT`].
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or times out, the
            /// server returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn list_transactions(
                &self,
                filters: &TransactionFilters,
            ) -> Result<Page<Transaction>> {
                let query = filters.to_query();
                tracing::debug!(params = query.len(), "listing transactions");
                self.get_page(
                    self.routes.transactions.clone(),
                    &query,
                    Some(TRANSACTION_LIST_TIMEOUT),
                ) $( .$await_ext )?
            }

            /// Fetches one transaction by its code.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(code = %code))]
            pub $($async_kw)? fn transaction(&self, code: &TransactionCode) -> Result<Transaction> {
                let url = child(&self.routes.transactions, &[code.as_inner()])?;
                self.get_json(url) $( .$await_ext )?
            }

            /// Fetches one transaction by its unique code.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn transaction_by_unique_code(&self, unique_code: &str) -> Result<Transaction> {
                let url = child(&self.routes.transactions, &[UNIQUE_CODE_SEGMENT, unique_code])?;
                self.get_json(url) $( .$await_ext )?
            }

            /// Lists transactions made with one card.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn transactions_by_card(&self, card_number: &str) -> Result<Page<Transaction>> {
                let url = child(&self.routes.transactions, &[CARD_SEGMENT, card_number])?;
                self.get_page(url, &[], None) $( .$await_ext )?
            }

            /// Lists transactions settled in one currency.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(currency = %currency))]
            pub $($async_kw)? fn transactions_by_currency(&self, currency: &str) -> Result<Page<Transaction>> {
                let url = child(&self.routes.transactions, &[CURRENCY_SEGMENT, currency])?;
                self.get_page(url, &[], None) $( .$await_ext )?
            }

            /// Lists transactions from one country.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(country = %country))]
            pub $($async_kw)? fn transactions_by_country(&self, country: &str) -> Result<Page<Transaction>> {
                let url = child(&self.routes.transactions, &[COUNTRY_SEGMENT, country])?;
                self.get_page(url, &[], None) $( .$await_ext )?
            }

            /// Lists transactions whose amount lies within `[min, max]`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(min = min, max = max))]
            pub $($async_kw)? fn transactions_by_amount(&self, min: f64, max: f64) -> Result<Page<Transaction>> {
                let url = child(&self.routes.transactions, &[AMOUNT_SEGMENT])?;
                let query = [("minimo", min.to_string()), ("maximo", max.to_string())];
                self.get_page(url, &query, None) $( .$await_ext )?
            }

            /// Sends a GET request and normalizes the collection envelope.
            #[tracing::instrument(skip_all, fields(url = %url))]
            $($async_kw)? fn get_page<T: DeserializeOwned>(
                &self,
                url: Url,
                query: &[(&'static str, String)],
                timeout: Option<Duration>,
            ) -> Result<Page<T>> {
                let request = self.http.get(url).query(query);
                let body = Self::execute(request, timeout) $( .$await_ext )? ?;
                tracing::trace!(body_len = body.len(), "parsing collection envelope");
                Page::from_body(&body)
            }

            /// Sends a GET request and deserializes a single record.
            #[tracing::instrument(skip_all, fields(url = %url))]
            $($async_kw)? fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
                let body = Self::execute(self.http.get(url), None) $( .$await_ext )? ?;
                serde_json::from_str(&body).map_err(BackofficeError::from)
            }

            /// Sends a JSON body with the given method and deserializes the
            /// response.
            #[tracing::instrument(skip_all, fields(method = %method, url = %url))]
            $($async_kw)? fn send_json<
                Req: serde::Serialize $(+ $send_bound)?,
                Resp: DeserializeOwned,
            >(
                &self,
                method: Method,
                url: Url,
                body: &Req,
            ) -> Result<Resp> {
                let request = self
                    .http
                    .request(method, url)
                    .header(CONTENT_TYPE, "application/json")
                    .json(body);
                let text = Self::execute(request, None) $( .$await_ext )? ?;
                serde_json::from_str(&text).map_err(BackofficeError::from)
            }

            /// Sends a prepared request and returns the body of a successful
            /// response.
            $($async_kw)? fn execute(request: $req_type, timeout: Option<Duration>) -> Result<String> {
                let prepared = match timeout {
                    Some(limit) => request.timeout(limit),
                    None => request,
                };
                let response: $resp_type = prepared
                    .header(ACCEPT, "application/json")
                    .send()
                    $( .$await_ext )?
                    ?;

                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if status.is_success() {
                    Ok(response.text() $( .$await_ext )? ?)
                } else {
                    let message = response
                        .text()
                        $( .$await_ext )?
                        .unwrap_or_else(|_| "unknown error".to_owned());
                    tracing::debug!(status = status.as_u16(), message = %message, "API error");
                    Err(BackofficeError::Api {
                        status: status.as_u16(),
                        message,
                    })
                }
            }
        }

        #[cfg(test)]
        mod tests {
            use super::*;
            use crate::config::DEFAULT_COMMISSIONS_URL;

            #[test]
            fn builder_uses_default_endpoints() {
                let client = $client::builder().build().unwrap();
                assert_eq!(client.routes.commissions.as_str(), DEFAULT_COMMISSIONS_URL);
            }

            #[test]
            fn builder_custom_endpoint() {
                let client = $client::builder()
                    .merchants_url("http://localhost:9999/v1/comercios")
                    .build()
                    .unwrap();
                assert_eq!(
                    client.routes.merchants.as_str(),
                    "http://localhost:9999/v1/comercios"
                );
            }

            #[test]
            fn builder_rejects_invalid_endpoint() {
                let result = $client::builder().transactions_url("not a url").build();
                assert!(matches!(result, Err(BackofficeError::InvalidEndpoint(_))));
            }
        }
    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the back-office services.

    use core::time::Duration;

    use reqwest::header::{ACCEPT, CONTENT_TYPE};
    use reqwest::{Method, Url};
    use serde::de::DeserializeOwned;

    use super::{
        AMOUNT_SEGMENT, CARD_SEGMENT, COUNTRY_SEGMENT, CURRENCY_SEGMENT, Routes,
        UNIQUE_CODE_SEGMENT, child,
    };
    use crate::config::{Endpoints, TRANSACTION_LIST_TIMEOUT};
    use crate::error::{BackofficeError, Result};
    use crate::models::{
        Commission, CommissionId, Merchant, Page, RecurringTransaction, Transaction,
        TransactionCode,
    };
    use crate::query::TransactionFilters;

    define_client! {
        client_name: BackofficeClient,
        builder_name: BackofficeClientBuilder,
        http_type: reqwest::Client,
        request_type: reqwest::RequestBuilder,
        response_type: reqwest::Response,
        client_doc: "Async client for the back-office REST services.\n\nUse [`BackofficeClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`BackofficeClient`].",
        async_kw: async,
        await_kw: await,
        send_bound: Sync,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the back-office services.

    use core::time::Duration;

    use reqwest::header::{ACCEPT, CONTENT_TYPE};
    use reqwest::{Method, Url};
    use serde::de::DeserializeOwned;

    use super::{
        AMOUNT_SEGMENT, CARD_SEGMENT, COUNTRY_SEGMENT, CURRENCY_SEGMENT, Routes,
        UNIQUE_CODE_SEGMENT, child,
    };
    use crate::config::{Endpoints, TRANSACTION_LIST_TIMEOUT};
    use crate::error::{BackofficeError, Result};
    use crate::models::{
        Commission, CommissionId, Merchant, Page, RecurringTransaction, Transaction,
        TransactionCode,
    };
    use crate::query::TransactionFilters;

    define_client! {
        client_name: BackofficeBlockingClient,
        builder_name: BackofficeBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        request_type: reqwest::blocking::RequestBuilder,
        response_type: reqwest::blocking::Response,
        client_doc: "Blocking (synchronous) client for the back-office REST services.\n\nUse [`BackofficeBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`BackofficeBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{BackofficeClient, BackofficeClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{BackofficeBlockingClient, BackofficeBlockingClientBuilder};
