//! Billing error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure categories reported by the billing client.
///
/// This is the full, flat taxonomy of the billing backend; the set is fixed
/// by the client library and is never extended locally. Only
/// [`ErrorKind::AcknowledgeWarning`] is recoverable (the purchase is valid
/// but still pending, so it cannot be acknowledged yet).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ClientNotReady,
    ClientDisconnected,
    SkuNotExist,
    ConsumeError,
    AcknowledgeError,
    AcknowledgeWarning,
    FetchPurchasedProductsError,
    BillingError,
    UserCanceled,
    ServiceUnavailable,
    BillingUnavailable,
    ItemUnavailable,
    DeveloperError,
    Error,
    ItemAlreadyOwned,
    ItemNotOwned,
}

impl ErrorKind {
    /// Whether the underlying purchase is still valid and may complete later.
    pub fn is_recoverable(self) -> bool {
        matches!(self, ErrorKind::AcknowledgeWarning)
    }

    /// Fixed user-facing description for this failure category.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::ClientNotReady => "billing client is not ready yet",
            ErrorKind::ClientDisconnected => "billing client has disconnected",
            ErrorKind::SkuNotExist => "product does not exist",
            ErrorKind::ConsumeError => "purchase could not be consumed",
            ErrorKind::AcknowledgeError => "purchase could not be acknowledged",
            ErrorKind::AcknowledgeWarning => {
                "purchase is pending; it may take a while until payment completes"
            }
            ErrorKind::FetchPurchasedProductsError => "owned purchases could not be fetched",
            ErrorKind::BillingError => "billing operation failed",
            ErrorKind::UserCanceled => "purchase was canceled",
            ErrorKind::ServiceUnavailable => "network connection is down",
            ErrorKind::BillingUnavailable => "billing is not available on this device",
            ErrorKind::ItemUnavailable => "product is not available for purchase",
            ErrorKind::DeveloperError => "invalid arguments provided to the billing API",
            ErrorKind::Error => "fatal billing error",
            ErrorKind::ItemAlreadyOwned => "product is already owned",
            ErrorKind::ItemNotOwned => "product is not owned",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Wire spelling, e.g. ACKNOWLEDGE_WARNING.
        let name = match self {
            ErrorKind::ClientNotReady => "CLIENT_NOT_READY",
            ErrorKind::ClientDisconnected => "CLIENT_DISCONNECTED",
            ErrorKind::SkuNotExist => "SKU_NOT_EXIST",
            ErrorKind::ConsumeError => "CONSUME_ERROR",
            ErrorKind::AcknowledgeError => "ACKNOWLEDGE_ERROR",
            ErrorKind::AcknowledgeWarning => "ACKNOWLEDGE_WARNING",
            ErrorKind::FetchPurchasedProductsError => "FETCH_PURCHASED_PRODUCTS_ERROR",
            ErrorKind::BillingError => "BILLING_ERROR",
            ErrorKind::UserCanceled => "USER_CANCELED",
            ErrorKind::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorKind::BillingUnavailable => "BILLING_UNAVAILABLE",
            ErrorKind::ItemUnavailable => "ITEM_UNAVAILABLE",
            ErrorKind::DeveloperError => "DEVELOPER_ERROR",
            ErrorKind::Error => "ERROR",
            ErrorKind::ItemAlreadyOwned => "ITEM_ALREADY_OWNED",
            ErrorKind::ItemNotOwned => "ITEM_NOT_OWNED",
        };
        f.write_str(name)
    }
}

/// Failure reported by the billing client.
///
/// Terminal at this layer: it is surfaced to the application (log plus
/// user-visible message) and never retried locally. Reconnection and
/// backoff belong to the billing client.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind} (code {response_code}): {debug_message}")]
pub struct BillingError {
    pub kind: ErrorKind,
    /// Raw response code forwarded from the billing backend.
    pub response_code: i32,
    pub debug_message: String,
}

impl BillingError {
    pub fn new(kind: ErrorKind, response_code: i32, debug_message: impl Into<String>) -> Self {
        Self {
            kind,
            response_code,
            debug_message: debug_message.into(),
        }
    }
}

/// Catalog configuration error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A configured product id was empty after normalization.
    #[error("blank product id in catalog configuration")]
    BlankId,

    /// The same id appeared in more than one product category.
    #[error("product id appears in more than one category: {0}")]
    OverlappingId(crate::id::ProductId),
}

/// Purchase record state transition error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A purchase must never be acknowledged twice.
    #[error("purchase already acknowledged: {0}")]
    AlreadyAcknowledged(crate::id::ProductId),

    /// Only consumable products can be consumed.
    #[error("product is not consumable: {0}")]
    NotConsumable(crate::id::ProductId),

    /// A purchase must not be consumed twice.
    #[error("purchase already consumed: {0}")]
    AlreadyConsumed(crate::id::ProductId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_acknowledge_warning_is_recoverable() {
        let recoverable: Vec<ErrorKind> = [
            ErrorKind::ClientNotReady,
            ErrorKind::ClientDisconnected,
            ErrorKind::SkuNotExist,
            ErrorKind::ConsumeError,
            ErrorKind::AcknowledgeError,
            ErrorKind::AcknowledgeWarning,
            ErrorKind::FetchPurchasedProductsError,
            ErrorKind::BillingError,
            ErrorKind::UserCanceled,
            ErrorKind::ServiceUnavailable,
            ErrorKind::BillingUnavailable,
            ErrorKind::ItemUnavailable,
            ErrorKind::DeveloperError,
            ErrorKind::Error,
            ErrorKind::ItemAlreadyOwned,
            ErrorKind::ItemNotOwned,
        ]
        .into_iter()
        .filter(|kind| kind.is_recoverable())
        .collect();

        assert_eq!(recoverable, vec![ErrorKind::AcknowledgeWarning]);
    }

    #[test]
    fn billing_error_display_includes_kind_code_and_message() {
        let err = BillingError::new(ErrorKind::AcknowledgeWarning, 0, "pending");
        assert_eq!(err.to_string(), "ACKNOWLEDGE_WARNING (code 0): pending");
    }

    #[test]
    fn error_kind_serializes_to_wire_spelling() {
        let json = serde_json::to_string(&ErrorKind::FetchPurchasedProductsError).unwrap();
        assert_eq!(json, "\"FETCH_PURCHASED_PRODUCTS_ERROR\"");
    }
}
