use serde::{Deserialize, Serialize};

use billflow_core::{BillingError, ProductInfo, PurchaseRecord};

/// One lifecycle notification from the billing client.
///
/// The client delivers these to its single registered listener, on one
/// callback thread, in emission order. Events are facts; whatever they
/// report has already happened inside the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingEvent {
    /// Catalog query finished; one entry per configured, purchasable id.
    CatalogFetched { products: Vec<ProductInfo> },

    /// Previously purchased, still-owned, non-consumed items reported at
    /// startup/resume (reinstall and multi-device sync recovery).
    OwnedPurchasesFetched { purchases: Vec<PurchaseRecord> },

    /// New transactions finished.
    PurchasesCompleted { purchases: Vec<PurchaseRecord> },

    /// The backend confirmed a non-consumable/subscription purchase.
    PurchaseAcknowledged { purchase: PurchaseRecord },

    /// A consumable purchase was marked spent.
    PurchaseConsumed { purchase: PurchaseRecord },

    /// Any failure inside the client.
    BillingFailed { error: BillingError },
}

impl BillingEvent {
    /// Stable event name for logging.
    pub fn event_type(&self) -> &'static str {
        match self {
            BillingEvent::CatalogFetched { .. } => "billing.catalog.fetched",
            BillingEvent::OwnedPurchasesFetched { .. } => "billing.owned.fetched",
            BillingEvent::PurchasesCompleted { .. } => "billing.purchase.completed",
            BillingEvent::PurchaseAcknowledged { .. } => "billing.purchase.acknowledged",
            BillingEvent::PurchaseConsumed { .. } => "billing.purchase.consumed",
            BillingEvent::BillingFailed { .. } => "billing.failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billflow_core::{ErrorKind, ProductId};

    #[test]
    fn event_type_names_are_stable() {
        let event = BillingEvent::CatalogFetched {
            products: vec![ProductInfo::new(ProductId::new("coins_100"), "$0.99")],
        };
        assert_eq!(event.event_type(), "billing.catalog.fetched");

        let event = BillingEvent::BillingFailed {
            error: BillingError::new(ErrorKind::UserCanceled, 1, "canceled"),
        };
        assert_eq!(event.event_type(), "billing.failed");
    }
}
