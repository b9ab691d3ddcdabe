use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::id::{OrderId, ProductId, PurchaseToken};

/// Product category, fixed per id by the client configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// Purchasable repeatedly; each purchase must be consumed before the
    /// next one.
    Consumable,
    /// Purchasable once, granting a permanent entitlement.
    NonConsumable,
    /// Recurring product requiring renewal and explicit cancellation.
    Subscription,
}

impl ProductKind {
    pub fn is_consumable(self) -> bool {
        matches!(self, ProductKind::Consumable)
    }

    /// Non-consumables and subscriptions must be acknowledged with the
    /// billing backend; unacknowledged purchases are refunded after three
    /// days.
    pub fn requires_acknowledgment(self) -> bool {
        !self.is_consumable()
    }
}

/// One catalog entry: a product id and its localized display price.
///
/// Produced once per catalog fetch and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    product_id: ProductId,
    display_price: String,
}

impl ProductInfo {
    pub fn new(product_id: ProductId, display_price: impl Into<String>) -> Self {
        Self {
            product_id,
            display_price: display_price.into(),
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Localized price string as formatted by the store (e.g. `"$0.99"`).
    pub fn display_price(&self) -> &str {
        &self.display_price
    }
}

/// One completed transaction.
///
/// Owned by the application until consumed (consumables) or indefinitely
/// (entitlements). Mutated in place as acknowledge/consume operations
/// succeed; the flag transitions below are the only legal mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    product_id: ProductId,
    purchase_token: PurchaseToken,
    order_id: Option<OrderId>,
    quantity: u32,
    purchased_at: DateTime<Utc>,
    acknowledged: bool,
    consumed: bool,
}

impl PurchaseRecord {
    pub fn new(
        product_id: ProductId,
        purchase_token: PurchaseToken,
        order_id: Option<OrderId>,
        quantity: u32,
        purchased_at: DateTime<Utc>,
    ) -> Self {
        Self {
            product_id,
            purchase_token,
            order_id,
            quantity,
            purchased_at,
            acknowledged: false,
            consumed: false,
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn purchase_token(&self) -> &PurchaseToken {
        &self.purchase_token
    }

    pub fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn purchased_at(&self) -> DateTime<Utc> {
        self.purchased_at
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Record a successful acknowledgment.
    ///
    /// A purchase must never be acknowledged twice.
    pub fn mark_acknowledged(&mut self) -> Result<(), RecordError> {
        if self.acknowledged {
            return Err(RecordError::AlreadyAcknowledged(self.product_id.clone()));
        }
        self.acknowledged = true;
        Ok(())
    }

    /// Record a successful consumption.
    ///
    /// Only purchases of consumable products can be consumed, and only once.
    pub fn mark_consumed(&mut self, kind: ProductKind) -> Result<(), RecordError> {
        if !kind.is_consumable() {
            return Err(RecordError::NotConsumable(self.product_id.clone()));
        }
        if self.consumed {
            return Err(RecordError::AlreadyConsumed(self.product_id.clone()));
        }
        self.consumed = true;
        Ok(())
    }
}
