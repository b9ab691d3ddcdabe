//! In-memory billing client for tests/dev.

use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use billflow_core::{
    BillingError, ErrorKind, OrderId, ProductId, ProductInfo, ProductKind, PurchaseRecord,
    PurchaseToken,
};
use billflow_events::{BillingEvent, BillingEventListener, EventEnvelope};

use crate::client::{BillingClient, PurchasedResult, SupportState};
use crate::config::ClientConfig;

/// In-memory stand-in for the store billing client.
///
/// - No IO / no async; events are delivered synchronously to the single
///   registered listener, in emission order, with monotonic sequence
///   numbers.
/// - Purchases, the pending-payment state and subscription support are all
///   local state, so each of the real backend's error paths can be
///   provoked on demand in tests.
pub struct InMemoryBillingClient<L> {
    config: ClientConfig,
    listener: L,
    /// Store inventory: configured ids only become purchasable once priced.
    prices: Vec<(ProductId, String)>,
    owned: Vec<PurchaseRecord>,
    pending_tokens: HashSet<PurchaseToken>,
    connected: bool,
    owned_fetched: bool,
    subscription_support: bool,
    simulate_pending: bool,
    sequence: u64,
}

impl<L> InMemoryBillingClient<L>
where
    L: BillingEventListener,
{
    pub fn new(config: ClientConfig, listener: L) -> Self {
        Self {
            config,
            listener,
            prices: Vec::new(),
            owned: Vec::new(),
            pending_tokens: HashSet::new(),
            connected: false,
            owned_fetched: false,
            subscription_support: true,
            simulate_pending: false,
            sequence: 0,
        }
    }

    /// Stock a product in the simulated store with its display price.
    pub fn with_price(mut self, product_id: impl Into<ProductId>, price: impl Into<String>) -> Self {
        self.prices.push((product_id.into(), price.into()));
        self
    }

    /// Seed a previously purchased, still-owned record (reinstall /
    /// multi-device sync scenarios). Reported by the owned-purchases fetch
    /// on connect.
    pub fn with_owned(mut self, record: PurchaseRecord) -> Self {
        self.owned.push(record);
        self
    }

    /// Toggle simulated device support for subscriptions.
    pub fn set_subscription_support(&mut self, supported: bool) {
        self.subscription_support = supported;
    }

    /// When set, new transactions stay in the pending state (as with cash
    /// payments) and cannot be acknowledged or consumed until settled.
    pub fn simulate_pending_payments(&mut self, pending: bool) {
        self.simulate_pending = pending;
    }

    /// Complete all pending transactions, making them acknowledgeable and
    /// consumable.
    pub fn settle_pending_payments(&mut self) {
        let settled = self.pending_tokens.len();
        self.pending_tokens.clear();
        tracing::debug!(settled, "pending transactions settled");
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Records currently owned and not consumed.
    pub fn owned_purchases(&self) -> &[PurchaseRecord] {
        &self.owned
    }

    fn emit(&mut self, event: BillingEvent) {
        self.sequence += 1;
        let envelope = EventEnvelope::new(Uuid::now_v7(), self.sequence, Utc::now(), event);
        self.listener.on_event(envelope);
    }

    fn emit_error(&mut self, kind: ErrorKind, debug_message: impl Into<String>) {
        let error = BillingError::new(kind, response_code(kind), debug_message);
        tracing::debug!(kind = %error.kind, message = %error.debug_message, "emitting billing error");
        self.emit(BillingEvent::BillingFailed { error });
    }

    fn price_of(&self, product_id: &ProductId) -> Option<&str> {
        self.prices
            .iter()
            .find(|(id, _)| id == product_id)
            .map(|(_, price)| price.as_str())
    }

    fn owned_index(&self, token: &PurchaseToken) -> Option<usize> {
        self.owned.iter().position(|r| r.purchase_token() == token)
    }

    fn owns_active(&self, product_id: &ProductId) -> bool {
        self.owned
            .iter()
            .any(|r| r.product_id() == product_id && !r.is_consumed())
    }

    /// Common path for `purchase` and `subscribe`.
    fn start_transaction(&mut self, product_id: &ProductId, via_subscribe: bool) {
        if !self.connected {
            self.emit_error(
                ErrorKind::ClientNotReady,
                format!("cannot buy {product_id} before connect"),
            );
            return;
        }

        let Some(kind) = self.config.catalog().kind_of(product_id) else {
            self.emit_error(ErrorKind::SkuNotExist, format!("unknown product id {product_id}"));
            return;
        };

        let is_subscription = kind == ProductKind::Subscription;
        if is_subscription != via_subscribe {
            let expected = if is_subscription { "subscribe" } else { "purchase" };
            self.emit_error(
                ErrorKind::DeveloperError,
                format!("{product_id} must be bought via {expected}"),
            );
            return;
        }

        if self.price_of(product_id).is_none() {
            self.emit_error(
                ErrorKind::SkuNotExist,
                format!("product id {product_id} is not listed in the store"),
            );
            return;
        }

        if self.owns_active(product_id) {
            self.emit_error(
                ErrorKind::ItemAlreadyOwned,
                format!("{product_id} is already owned"),
            );
            return;
        }

        let record = PurchaseRecord::new(
            product_id.clone(),
            PurchaseToken::new(Uuid::now_v7().to_string()),
            Some(OrderId::new(format!("ORDER.{}", Uuid::now_v7().simple()))),
            1,
            Utc::now(),
        );

        if self.simulate_pending {
            self.pending_tokens.insert(record.purchase_token().clone());
        }

        self.owned.push(record.clone());
        let token = record.purchase_token().clone();
        self.emit(BillingEvent::PurchasesCompleted {
            purchases: vec![record],
        });

        if self.pending_tokens.contains(&token) {
            return;
        }

        if self.config.auto_acknowledge() && kind.requires_acknowledgment() {
            self.acknowledge_by_token(&token);
        }
        if self.config.auto_consume() && kind.is_consumable() {
            self.consume_by_token(&token);
        }
    }

    fn acknowledge_by_token(&mut self, token: &PurchaseToken) {
        if self.pending_tokens.contains(token) {
            self.emit_error(
                ErrorKind::AcknowledgeWarning,
                "purchase is pending and cannot be acknowledged yet",
            );
            return;
        }

        let Some(index) = self.owned_index(token) else {
            self.emit_error(ErrorKind::ItemNotOwned, "no owned purchase for token");
            return;
        };

        match self.owned[index].mark_acknowledged() {
            Ok(()) => {
                let purchase = self.owned[index].clone();
                self.emit(BillingEvent::PurchaseAcknowledged { purchase });
            }
            Err(err) => {
                self.emit_error(ErrorKind::AcknowledgeError, err.to_string());
            }
        }
    }

    fn consume_by_token(&mut self, token: &PurchaseToken) {
        if self.pending_tokens.contains(token) {
            self.emit_error(
                ErrorKind::ConsumeError,
                "purchase is pending and cannot be consumed yet",
            );
            return;
        }

        let Some(index) = self.owned_index(token) else {
            self.emit_error(ErrorKind::ItemNotOwned, "no owned purchase for token");
            return;
        };

        let Some(kind) = self.config.catalog().kind_of(self.owned[index].product_id()) else {
            self.emit_error(ErrorKind::DeveloperError, "purchase is not in the catalog");
            return;
        };

        match self.owned[index].mark_consumed(kind) {
            Ok(()) => {
                // Consumed purchases leave the owned set so the product can
                // be bought again.
                let purchase = self.owned.remove(index);
                self.emit(BillingEvent::PurchaseConsumed { purchase });
            }
            Err(err) if kind.is_consumable() => {
                self.emit_error(ErrorKind::ConsumeError, err.to_string());
            }
            Err(err) => {
                self.emit_error(ErrorKind::DeveloperError, err.to_string());
            }
        }
    }
}

impl<L> BillingClient for InMemoryBillingClient<L>
where
    L: BillingEventListener,
{
    fn connect(&mut self) {
        if self.connected {
            return;
        }
        self.connected = true;
        tracing::info!("billing client connected");

        let mut products = Vec::new();
        for (id, price) in &self.prices {
            if self.config.catalog().contains(id) {
                products.push(ProductInfo::new(id.clone(), price.clone()));
            } else {
                tracing::debug!(product_id = %id, "priced id not configured; skipping");
            }
        }
        self.emit(BillingEvent::CatalogFetched { products });

        let purchases = self.owned.clone();
        self.emit(BillingEvent::OwnedPurchasesFetched { purchases });
        self.owned_fetched = true;
    }

    fn purchase(&mut self, product_id: &ProductId) {
        self.start_transaction(product_id, false);
    }

    fn subscribe(&mut self, product_id: &ProductId) {
        self.start_transaction(product_id, true);
    }

    fn unsubscribe(&mut self, product_id: &ProductId) {
        if !self.connected {
            self.emit_error(
                ErrorKind::ClientNotReady,
                format!("cannot unsubscribe {product_id} before connect"),
            );
            return;
        }

        if self.config.catalog().kind_of(product_id) != Some(ProductKind::Subscription) {
            self.emit_error(
                ErrorKind::DeveloperError,
                format!("{product_id} is not a subscription"),
            );
            return;
        }

        let position = self
            .owned
            .iter()
            .position(|r| r.product_id() == product_id);
        match position {
            Some(index) => {
                let record = self.owned.remove(index);
                self.pending_tokens.remove(record.purchase_token());
                tracing::info!(product_id = %product_id, "subscription canceled");
            }
            None => {
                self.emit_error(
                    ErrorKind::ItemNotOwned,
                    format!("no active subscription for {product_id}"),
                );
            }
        }
    }

    fn is_ready(&self) -> bool {
        self.connected
    }

    fn is_subscription_supported(&self) -> SupportState {
        if !self.connected {
            SupportState::Disconnected
        } else if self.subscription_support {
            SupportState::Supported
        } else {
            SupportState::NotSupported
        }
    }

    fn is_purchased(&self, product: &ProductInfo) -> PurchasedResult {
        if !self.connected {
            return PurchasedResult::ClientNotReady;
        }
        if !self.owned_fetched {
            return PurchasedResult::PurchasedProductsNotFetchedYet;
        }
        if self.owns_active(product.product_id()) {
            PurchasedResult::Yes
        } else {
            PurchasedResult::No
        }
    }

    fn consume_purchase(&mut self, purchase: &PurchaseRecord) {
        if !self.connected {
            self.emit_error(ErrorKind::ClientNotReady, "cannot consume before connect");
            return;
        }
        self.consume_by_token(purchase.purchase_token());
    }

    fn acknowledge_purchase(&mut self, purchase: &PurchaseRecord) {
        if !self.connected {
            self.emit_error(ErrorKind::ClientNotReady, "cannot acknowledge before connect");
            return;
        }
        self.acknowledge_by_token(purchase.purchase_token());
    }
}

/// Raw backend response code forwarded with each error, mirroring the
/// store billing API's numbering; library-local failures use 0.
fn response_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::UserCanceled => 1,
        ErrorKind::ServiceUnavailable => 2,
        ErrorKind::BillingUnavailable => 3,
        ErrorKind::ItemUnavailable => 4,
        ErrorKind::DeveloperError => 5,
        ErrorKind::Error => 6,
        ErrorKind::ItemAlreadyOwned => 7,
        ErrorKind::ItemNotOwned => 8,
        _ => 0,
    }
}
