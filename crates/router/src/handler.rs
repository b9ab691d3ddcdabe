use billflow_core::{ProductInfo, PurchaseRecord};

/// One per-product reaction point, as a borrowed view into the event that
/// triggered it.
#[derive(Debug, Clone, Copy)]
pub enum ProductNotice<'a> {
    /// The product appeared in a catalog fetch, with its display price.
    Listed { info: &'a ProductInfo },

    /// A still-owned purchase of the product was reported at
    /// startup/resume; re-grant the entitlement here.
    OwnedRestored { purchase: &'a PurchaseRecord },

    /// A new transaction for the product finished.
    Purchased { purchase: &'a PurchaseRecord },

    /// The purchase was acknowledged with the backend. Authoritative point
    /// for granting durable entitlements: completion without
    /// acknowledgment is refunded after three days.
    Acknowledged { purchase: &'a PurchaseRecord },

    /// The purchase was marked spent. Authoritative point for granting
    /// consumable entitlements.
    Consumed { purchase: &'a PurchaseRecord },
}

/// Application reaction logic for one product id.
///
/// Handlers run synchronously on the dispatching thread. The router does
/// not deduplicate [`ProductNotice::Acknowledged`] or
/// [`ProductNotice::Consumed`]; handlers must check the record's
/// acknowledged/consumed flags (or their own grant bookkeeping) before
/// granting, so repeated delivery never double-grants.
pub trait ProductHandler: Send {
    fn handle(&mut self, notice: ProductNotice<'_>);
}

impl<F> ProductHandler for F
where
    F: FnMut(ProductNotice<'_>) + Send,
{
    fn handle(&mut self, notice: ProductNotice<'_>) {
        self(notice)
    }
}
