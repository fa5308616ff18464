//! Endpoint configuration.
//!
//! Each resource lives behind its own service, so every base URL can be
//! overridden independently. The defaults point at the services the back
//! office was deployed against.

use core::time::Duration;

/// Default base URL of the merchant service.
pub const DEFAULT_MERCHANTS_URL: &str = "http://localhost:8080/v1/comercios";

/// Default base URL of the recurring transaction service.
pub const DEFAULT_RECURRING_URL: &str = "http://localhost:8080/v1/transacciones-recurrentes";

/// Default base URL of the commission service.
pub const DEFAULT_COMMISSIONS_URL: &str = "http://localhost:8083/v1/comisiones";

/// Default base URL of the transaction service.
pub const DEFAULT_TRANSACTIONS_URL: &str =
    "http://transaccionsimple-alb-705840120.us-east-2.elb.amazonaws.com/api/v1/transacciones";

/// Timeout applied to transaction listings.
pub const TRANSACTION_LIST_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable overriding the merchant service URL.
pub const MERCHANTS_URL_ENV: &str = "BACKOFFICE_MERCHANTS_URL";
/// Environment variable overriding the commission service URL.
pub const COMMISSIONS_URL_ENV: &str = "BACKOFFICE_COMMISSIONS_URL";
/// Environment variable overriding the recurring transaction service URL.
pub const RECURRING_URL_ENV: &str = "BACKOFFICE_RECURRING_URL";
/// Environment variable overriding the transaction service URL.
pub const TRANSACTIONS_URL_ENV: &str = "BACKOFFICE_TRANSACTIONS_URL";
/// Environment variable setting a global request timeout, in seconds.
pub const TIMEOUT_SECS_ENV: &str = "BACKOFFICE_TIMEOUT_SECS";

/// Base URLs of the four resource services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Merchant collection URL.
    pub merchants: String,
    /// Commission collection URL.
    pub commissions: String,
    /// Recurring transaction collection URL.
    pub recurring: String,
    /// Transaction collection URL.
    pub transactions: String,
}

impl Default for Endpoints {
    #[inline]
    fn default() -> Self {
        Self {
            merchants: DEFAULT_MERCHANTS_URL.to_owned(),
            commissions: DEFAULT_COMMISSIONS_URL.to_owned(),
            recurring: DEFAULT_RECURRING_URL.to_owned(),
            transactions: DEFAULT_TRANSACTIONS_URL.to_owned(),
        }
    }
}

impl Endpoints {
    /// Builds endpoints from the `BACKOFFICE_*_URL` environment variables,
    /// falling back to the defaults for any that are unset or empty.
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds endpoints from an arbitrary key lookup.
    #[inline]
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |key: &str, fallback: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| fallback.to_owned())
        };
        Self {
            merchants: pick(MERCHANTS_URL_ENV, DEFAULT_MERCHANTS_URL),
            commissions: pick(COMMISSIONS_URL_ENV, DEFAULT_COMMISSIONS_URL),
            recurring: pick(RECURRING_URL_ENV, DEFAULT_RECURRING_URL),
            transactions: pick(TRANSACTIONS_URL_ENV, DEFAULT_TRANSACTIONS_URL),
        }
    }
}

/// Reads the optional global timeout from `BACKOFFICE_TIMEOUT_SECS`.
///
/// Unset, empty, or unparsable values mean "no global timeout".
#[inline]
#[must_use]
pub fn timeout_from_env() -> Option<Duration> {
    std::env::var(TIMEOUT_SECS_ENV)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_services() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.merchants, DEFAULT_MERCHANTS_URL);
        assert!(endpoints.commissions.ends_with("/v1/comisiones"));
        assert!(endpoints.transactions.ends_with("/api/v1/transacciones"));
    }

    #[test]
    fn lookup_overrides_selected_endpoints() {
        let endpoints = Endpoints::from_lookup(|key| match key {
            COMMISSIONS_URL_ENV => Some("http://127.0.0.1:9000/v1/comisiones".to_owned()),
            MERCHANTS_URL_ENV => Some("   ".to_owned()),
            _ => None,
        });
        assert_eq!(endpoints.commissions, "http://127.0.0.1:9000/v1/comisiones");
        assert_eq!(endpoints.merchants, DEFAULT_MERCHANTS_URL);
        assert_eq!(endpoints.recurring, DEFAULT_RECURRING_URL);
    }
}
