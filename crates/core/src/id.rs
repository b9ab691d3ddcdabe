//! Strongly-typed identifiers used across the billing domain.

use serde::{Deserialize, Serialize};

/// Identifier of a purchasable product.
///
/// Product ids are store-assigned opaque strings compared
/// case-insensitively. The canonical ASCII-lowercase form is fixed at
/// construction, so equality and hashing are plain comparisons on the
/// canonical form everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

macro_rules! impl_opaque_str_newtype {
    ($t:ty) => {
        impl $t {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

/// Token issued by the billing backend for one completed transaction.
///
/// Tokens are compared verbatim; unlike [`ProductId`] they are
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseToken(String);

/// Order reference attached to a transaction by the billing backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl_opaque_str_newtype!(PurchaseToken);
impl_opaque_str_newtype!(OrderId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_is_case_insensitive() {
        assert_eq!(ProductId::new("Premium_Upgrade"), ProductId::new("premium_upgrade"));
        assert_eq!(ProductId::new("PREMIUM_UPGRADE").as_str(), "premium_upgrade");
    }

    #[test]
    fn product_id_trims_surrounding_whitespace() {
        assert_eq!(ProductId::new("  coins_100 "), ProductId::new("coins_100"));
    }

    #[test]
    fn purchase_token_is_case_sensitive() {
        assert_ne!(PurchaseToken::new("AbC"), PurchaseToken::new("abc"));
    }
}
