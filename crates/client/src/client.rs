use billflow_core::{ProductId, ProductInfo, PurchaseRecord};

/// Device support for subscription products.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SupportState {
    Supported,
    NotSupported,
    /// The client is not connected, so support cannot be determined.
    Disconnected,
}

/// Result of a synchronous ownership check.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PurchasedResult {
    Yes,
    No,
    ClientNotReady,
    PurchasedProductsNotFetchedYet,
}

/// The external billing collaborator.
///
/// All mutating operations are one-way: failures are reported through the
/// emitted event stream (`BillingFailed`), never as return values. The
/// client emits the six lifecycle notifications to its single registered
/// listener, on one callback thread.
pub trait BillingClient {
    /// Connect to the billing backend; emits the catalog fetch and the
    /// owned-purchases fetch once established.
    fn connect(&mut self);

    /// Buy a consumable or non-consumable product.
    fn purchase(&mut self, product_id: &ProductId);

    /// Buy a subscription product.
    fn subscribe(&mut self, product_id: &ProductId);

    /// Cancel a subscription.
    fn unsubscribe(&mut self, product_id: &ProductId);

    fn is_ready(&self) -> bool;

    fn is_subscription_supported(&self) -> SupportState;

    /// Synchronously check whether a catalog product is currently owned.
    fn is_purchased(&self, product: &ProductInfo) -> PurchasedResult;

    /// Mark a consumable purchase as spent, making it purchasable again.
    fn consume_purchase(&mut self, purchase: &PurchaseRecord);

    /// Confirm a non-consumable/subscription purchase with the backend.
    fn acknowledge_purchase(&mut self, purchase: &PurchaseRecord);
}
