//! Pricing Module
//!
//! Pure, synchronous money arithmetic for checkout.

mod engine;

pub use engine::{PricingEngine, Totals, percent_of};
