//! Purchase-event routing: per-product reactions to billing lifecycle
//! events.

pub mod handler;
pub mod router;
pub mod surface;

pub use handler::{ProductHandler, ProductNotice};
pub use router::{DispatchError, PurchaseEventRouter};
pub use surface::SurfacedMessage;
