//! Checkout Module
//!
//! - [`cart`] - cart lines and stock-aware editing
//! - [`session`] - per-actor checkout session and its phases
//! - [`orchestrator`] - pricing, payment validation and the atomic commit

mod cart;
mod orchestrator;
mod session;

pub use cart::Cart;
pub use orchestrator::{CartSummary, CheckoutOrchestrator, CheckoutRequest, PaymentTender};
pub use session::{
    AttachedCustomer, CheckoutPhase, CheckoutSession, PaymentMethod, SessionRegistry,
    WALK_IN_CUSTOMER,
};
