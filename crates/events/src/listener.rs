use crate::{BillingEvent, EventEnvelope};

/// Consumer side of the billing client's callback contract.
///
/// A client holds exactly one listener and invokes it synchronously from a
/// single callback thread, in emission order. Implementations must not
/// block; they only mutate local state and invoke application callbacks.
pub trait BillingEventListener: Send {
    fn on_event(&mut self, envelope: EventEnvelope<BillingEvent>);
}

impl<F> BillingEventListener for F
where
    F: FnMut(EventEnvelope<BillingEvent>) + Send,
{
    fn on_event(&mut self, envelope: EventEnvelope<BillingEvent>) {
        self(envelope)
    }
}
