//! The purchase-event router.
//!
//! Translates the billing client's lifecycle notifications into per-product
//! application reactions. All state lives on the router instance (created
//! with it, cleared by [`PurchaseEventRouter::reset`]); nothing is ambient.

use std::collections::HashMap;

use thiserror::Error;

use billflow_core::{ProductId, ProductInfo, PurchaseRecord};
use billflow_events::{BillingEvent, BillingEventListener, EventEnvelope};

use crate::handler::{ProductHandler, ProductNotice};
use crate::surface::SurfacedMessage;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The client re-delivered or reordered its stream; per its contract,
    /// sequence numbers only move forward.
    #[error("non-monotonic event sequence (last {last}, found {found})")]
    NonMonotonicSequence { last: u64, found: u64 },
}

/// Routes billing lifecycle events to per-product handlers.
///
/// - Handler lookup is by exact match on the case-normalized id, so it is
///   case-insensitive for callers.
/// - An event for an id with no registered handler is recorded in the
///   relevant cache list and then dropped; that is not an error.
/// - Errors reported by the client are terminal here: logged, queued as a
///   [`SurfacedMessage`], never retried.
pub struct PurchaseEventRouter {
    handlers: HashMap<ProductId, Box<dyn ProductHandler>>,
    catalog: Vec<ProductInfo>,
    owned: Vec<PurchaseRecord>,
    pending_actions: Vec<PurchaseRecord>,
    surfaced: Vec<SurfacedMessage>,
    cursor: Option<u64>,
}

impl PurchaseEventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the reaction logic for one product id.
    ///
    /// The id is case-normalized on the way in. Ids must not overlap;
    /// registering the same id twice is a caller error and silently
    /// replaces the earlier handler.
    pub fn register(
        &mut self,
        product_id: impl Into<ProductId>,
        handler: impl ProductHandler + 'static,
    ) {
        self.handlers.insert(product_id.into(), Box::new(handler));
    }

    /// Catalog entries seen so far, in fetch order.
    pub fn catalog(&self) -> &[ProductInfo] {
        &self.catalog
    }

    /// Still-owned purchases reported at startup/resume.
    pub fn owned(&self) -> &[PurchaseRecord] {
        &self.owned
    }

    /// Completed transactions awaiting an application action
    /// (acknowledge, consume, entitlement grant).
    pub fn pending_actions(&self) -> &[PurchaseRecord] {
        &self.pending_actions
    }

    /// User-visible error messages queued for display.
    pub fn surfaced_messages(&self) -> &[SurfacedMessage] {
        &self.surfaced
    }

    /// Hand the queued user-visible messages to the UI layer.
    pub fn drain_surfaced_messages(&mut self) -> Vec<SurfacedMessage> {
        std::mem::take(&mut self.surfaced)
    }

    /// Sequence number of the last envelope accepted, if any.
    pub fn last_sequence_number(&self) -> Option<u64> {
        self.cursor
    }

    /// Clear all routed state (caches, queues, delivery cursor).
    ///
    /// Registered handlers survive; state does not.
    pub fn reset(&mut self) {
        self.catalog.clear();
        self.owned.clear();
        self.pending_actions.clear();
        self.surfaced.clear();
        self.cursor = None;
    }

    /// Dispatch one lifecycle event.
    ///
    /// Never fails and never panics; a failure event is itself routed (to
    /// the log and the surfaced-message queue).
    pub fn dispatch(&mut self, event: BillingEvent) {
        match event {
            BillingEvent::CatalogFetched { products } => {
                for info in products {
                    self.notify(info.product_id().clone(), ProductNotice::Listed { info: &info });
                    self.catalog.push(info);
                }
            }
            BillingEvent::OwnedPurchasesFetched { purchases } => {
                for purchase in purchases {
                    self.notify(
                        purchase.product_id().clone(),
                        ProductNotice::OwnedRestored { purchase: &purchase },
                    );
                    self.owned.push(purchase);
                }
            }
            BillingEvent::PurchasesCompleted { purchases } => {
                for purchase in purchases {
                    self.notify(
                        purchase.product_id().clone(),
                        ProductNotice::Purchased { purchase: &purchase },
                    );
                    self.pending_actions.push(purchase);
                }
            }
            BillingEvent::PurchaseAcknowledged { purchase } => {
                self.notify(
                    purchase.product_id().clone(),
                    ProductNotice::Acknowledged { purchase: &purchase },
                );
            }
            BillingEvent::PurchaseConsumed { purchase } => {
                self.notify(
                    purchase.product_id().clone(),
                    ProductNotice::Consumed { purchase: &purchase },
                );
            }
            BillingEvent::BillingFailed { error } => {
                tracing::warn!(
                    kind = %error.kind,
                    code = error.response_code,
                    message = %error.debug_message,
                    "billing error reported"
                );
                self.surfaced.push(SurfacedMessage::from_error(&error));
            }
        }
    }

    /// Dispatch one enveloped event, enforcing monotonic delivery order.
    pub fn dispatch_envelope(
        &mut self,
        envelope: EventEnvelope<BillingEvent>,
    ) -> Result<(), DispatchError> {
        let found = envelope.sequence_number();
        if let Some(last) = self.cursor {
            if found <= last {
                return Err(DispatchError::NonMonotonicSequence { last, found });
            }
        }
        self.cursor = Some(found);

        tracing::debug!(
            event = envelope.payload().event_type(),
            sequence = found,
            "dispatching billing event"
        );
        self.dispatch(envelope.into_payload());
        Ok(())
    }

    fn notify(&mut self, product_id: ProductId, notice: ProductNotice<'_>) {
        match self.handlers.get_mut(&product_id) {
            Some(handler) => handler.handle(notice),
            None => {
                tracing::debug!(product_id = %product_id, "no handler for product id; dropped");
            }
        }
    }
}

impl Default for PurchaseEventRouter {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            catalog: Vec::new(),
            owned: Vec::new(),
            pending_actions: Vec::new(),
            surfaced: Vec::new(),
            cursor: None,
        }
    }
}

impl core::fmt::Debug for PurchaseEventRouter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PurchaseEventRouter")
            .field("handlers", &self.handlers.keys())
            .field("catalog", &self.catalog.len())
            .field("owned", &self.owned.len())
            .field("pending_actions", &self.pending_actions.len())
            .field("surfaced", &self.surfaced.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl BillingEventListener for PurchaseEventRouter {
    fn on_event(&mut self, envelope: EventEnvelope<BillingEvent>) {
        if let Err(err) = self.dispatch_envelope(envelope) {
            tracing::error!(error = %err, "billing event dropped");
        }
    }
}
