//! Newtype wrappers for entity identifiers.
//!
//! Every backend identifies records with opaque strings; wrapping them keeps
//! a merchant code from being passed where a commission id is expected.

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapping a `String` inner type.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from the given string.
            #[inline]
            #[must_use]
            pub fn new<T: Into<String>>(value: T) -> Self {
                Self(value.into())
            }

            /// Returns a reference to the inner string.
            #[inline]
            #[must_use]
            pub fn as_inner(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the inner string.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

define_string_id! {
    /// Backend-assigned merchant code (`codigoComercio`).
    MerchantCode
}

define_string_id! {
    /// Storage identifier of a commission rule.
    CommissionId
}

define_string_id! {
    /// Identifier of a billing record.
    BillingId
}

define_string_id! {
    /// Code of a recurring transaction.
    RecurringCode
}

define_string_id! {
    /// Code of a single transaction (`codTransaccion`).
    TransactionCode
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merchant_code_serde_is_transparent() {
        let id = MerchantCode::new("COM1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""COM1""#);
        let deserialized: MerchantCode = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn display_shows_inner_value() {
        let id = CommissionId::new("67c74637");
        assert_eq!(id.to_string(), "67c74637");
    }

    #[test]
    fn conversions() {
        let id: TransactionCode = "tx-1".into();
        assert_eq!(id.as_inner(), "tx-1");
        let id: BillingId = "b-1".to_owned().into();
        assert_eq!(id.into_inner(), "b-1");
    }
}
