//! Server-side filtering, sorting, and pagination for transaction listings.

use chrono::NaiveDate;

use crate::models::{DEFAULT_PAGE_SIZE, SortDirection, TransactionStatus};

/// Transaction type sent when no other scoping filter is present.
pub const DEFAULT_TRANSACTION_TYPE: &str = "PAG";

/// Field transactions are ordered by unless told otherwise.
pub const DEFAULT_SORT_FIELD: &str = "fecha";

/// Composable set of transaction listing parameters.
///
/// Unset (`None`) fields are not sent. Use [`TransactionFilters::initial`]
/// for the set a fresh transaction view starts with, and
/// [`TransactionFilters::merge`] to layer partial updates on top of it.
///
/// # Examples
///
/// ```
/// use payment_backoffice::models::TransactionStatus;
/// use payment_backoffice::query::TransactionFilters;
///
/// let patch = TransactionFilters::new()
///     .page(2)
///     .status(TransactionStatus::Pending)
///     .currency("USD");
/// let mut filters = TransactionFilters::initial();
/// filters.merge(&patch);
/// assert_eq!(filters.page, Some(2));
/// assert_eq!(filters.size, Some(10));
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilters {
    /// Zero-based page index.
    pub page: Option<u32>,
    /// Page size.
    pub size: Option<u32>,
    /// Sort field; anything after the first `,` is ignored.
    pub sort: Option<String>,
    /// Sort direction.
    pub direction: Option<SortDirection>,
    /// Exact unique code.
    pub unique_code: Option<String>,
    /// Card number.
    pub card_number: Option<String>,
    /// Transaction type code.
    pub kind: Option<String>,
    /// Currency code.
    pub currency: Option<String>,
    /// Card brand.
    pub brand: Option<String>,
    /// Processing status.
    pub status: Option<TransactionStatus>,
    /// Country code.
    pub country: Option<String>,
    /// Merchant identifier.
    pub merchant: Option<String>,
    /// Minimum amount (inclusive).
    pub amount_min: Option<f64>,
    /// Maximum amount (inclusive).
    pub amount_max: Option<f64>,
    /// Start date; only sent together with `date_to`.
    pub date_from: Option<NaiveDate>,
    /// End date; only sent together with `date_from`.
    pub date_to: Option<NaiveDate>,
}

/// Returns the text of a filter value, treating blank text as unset.
fn present(value: Option<&String>) -> Option<&str> {
    value
        .map(String::as_str)
        .filter(|text| !text.trim().is_empty())
}

/// Overwrites `slot` when the patch carries a value.
fn override_with<T: Clone>(slot: &mut Option<T>, patch: Option<&T>) {
    if let Some(value) = patch {
        *slot = Some(value.clone());
    }
}

impl TransactionFilters {
    /// Creates an empty filter set.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The filters a transaction view starts with: first page of 10,
    /// newest first, payments only.
    #[inline]
    #[must_use]
    pub fn initial() -> Self {
        Self {
            page: Some(0),
            size: Some(DEFAULT_PAGE_SIZE),
            sort: Some(DEFAULT_SORT_FIELD.to_owned()),
            direction: Some(SortDirection::Desc),
            kind: Some(DEFAULT_TRANSACTION_TYPE.to_owned()),
            ..Self::default()
        }
    }

    /// Sets the page index.
    #[inline]
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    #[inline]
    #[must_use]
    pub const fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the sort field and direction.
    #[inline]
    #[must_use]
    pub fn sort<T: Into<String>>(mut self, field: T, direction: SortDirection) -> Self {
        self.sort = Some(field.into());
        self.direction = Some(direction);
        self
    }

    /// Restricts to one unique code.
    #[inline]
    #[must_use]
    pub fn unique_code<T: Into<String>>(mut self, code: T) -> Self {
        self.unique_code = Some(code.into());
        self
    }

    /// Restricts to one card number.
    #[inline]
    #[must_use]
    pub fn card_number<T: Into<String>>(mut self, card: T) -> Self {
        self.card_number = Some(card.into());
        self
    }

    /// Restricts to one transaction type.
    #[inline]
    #[must_use]
    pub fn kind<T: Into<String>>(mut self, kind: T) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Restricts to one currency.
    #[inline]
    #[must_use]
    pub fn currency<T: Into<String>>(mut self, currency: T) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Restricts to one card brand.
    #[inline]
    #[must_use]
    pub fn brand<T: Into<String>>(mut self, brand: T) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Restricts to one status.
    #[inline]
    #[must_use]
    pub const fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to one country.
    #[inline]
    #[must_use]
    pub fn country<T: Into<String>>(mut self, country: T) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Restricts to one merchant.
    #[inline]
    #[must_use]
    pub fn merchant<T: Into<String>>(mut self, merchant: T) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    /// Restricts to amounts within `[min, max]`.
    #[inline]
    #[must_use]
    pub const fn amount_range(mut self, min: f64, max: f64) -> Self {
        self.amount_min = Some(min);
        self.amount_max = Some(max);
        self
    }

    /// Restricts to the given date range (inclusive).
    #[inline]
    #[must_use]
    pub const fn date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    /// Layers `patch` on top of `self`: fields set in the patch win, all
    /// other fields are kept.
    #[inline]
    pub fn merge(&mut self, patch: &Self) {
        override_with(&mut self.page, patch.page.as_ref());
        override_with(&mut self.size, patch.size.as_ref());
        override_with(&mut self.sort, patch.sort.as_ref());
        override_with(&mut self.direction, patch.direction.as_ref());
        override_with(&mut self.unique_code, patch.unique_code.as_ref());
        override_with(&mut self.card_number, patch.card_number.as_ref());
        override_with(&mut self.kind, patch.kind.as_ref());
        override_with(&mut self.currency, patch.currency.as_ref());
        override_with(&mut self.brand, patch.brand.as_ref());
        override_with(&mut self.status, patch.status.as_ref());
        override_with(&mut self.country, patch.country.as_ref());
        override_with(&mut self.merchant, patch.merchant.as_ref());
        override_with(&mut self.amount_min, patch.amount_min.as_ref());
        override_with(&mut self.amount_max, patch.amount_max.as_ref());
        override_with(&mut self.date_from, patch.date_from.as_ref());
        override_with(&mut self.date_to, patch.date_to.as_ref());
    }

    /// Returns a copy of `self` with `patch` merged in.
    #[inline]
    #[must_use]
    pub fn merged(&self, patch: Option<&Self>) -> Self {
        let mut filters = self.clone();
        if let Some(overrides) = patch {
            filters.merge(overrides);
        }
        filters
    }

    /// Returns `true` if a filter the backend accepts as a query scope is
    /// present: status, type, brand, or a complete date range. Blank type or
    /// brand text does not count.
    #[inline]
    #[must_use]
    pub fn is_scoped(&self) -> bool {
        self.status.is_some()
            || present(self.kind.as_ref()).is_some()
            || present(self.brand.as_ref()).is_some()
            || (self.date_from.is_some() && self.date_to.is_some())
    }

    /// Serializes the filters as query parameters in the order the
    /// transaction service expects.
    ///
    /// Blank text filters are left out. When no scoping filter is set,
    /// `tipo=PAG` is added so the listing is never unscoped.
    #[inline]
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            params.push(("size", size.to_string()));
        }
        if let Some(field) = self.sort.as_deref().and_then(|sort| sort.split(',').next()) {
            if !field.is_empty() {
                params.push(("sort", field.to_owned()));
            }
        }
        if let Some(direction) = self.direction {
            params.push(("direction", direction.as_str().to_owned()));
        }

        if let Some(status) = self.status {
            params.push(("estado", status.code().to_owned()));
        }
        if let Some(kind) = present(self.kind.as_ref()) {
            params.push(("tipo", kind.to_owned()));
        }
        if let Some(brand) = present(self.brand.as_ref()) {
            params.push(("marca", brand.to_owned()));
        }
        if let Some((from, to)) = self.date_from.zip(self.date_to) {
            params.push(("fechaInicio", from.to_string()));
            params.push(("fechaFin", to.to_string()));
        }
        if !self.is_scoped() {
            params.push(("tipo", DEFAULT_TRANSACTION_TYPE.to_owned()));
        }

        if let Some(code) = present(self.unique_code.as_ref()) {
            params.push(("codigoUnico", code.to_owned()));
        }
        if let Some(card) = present(self.card_number.as_ref()) {
            params.push(("numeroTarjeta", card.to_owned()));
        }
        if let Some(currency) = present(self.currency.as_ref()) {
            params.push(("moneda", currency.to_owned()));
        }
        if let Some(country) = present(self.country.as_ref()) {
            params.push(("pais", country.to_owned()));
        }
        if let Some(merchant) = present(self.merchant.as_ref()) {
            params.push(("comercio", merchant.to_owned()));
        }
        if let Some(min) = self.amount_min {
            params.push(("montoMin", min.to_string()));
        }
        if let Some(max) = self.amount_max {
            params.push(("montoMax", max.to_string()));
        }
        params
    }
}
