//! Data models
//!
//! Shared between pos-server and its clients (via API).
//! Money fields are `i64` in the smallest currency unit. Ids are prefixed
//! strings (see [`crate::util::prefixed_id`]).

pub mod cart;
pub mod customer;
pub mod product;
pub mod promotion;
pub mod saved_order;
pub mod tenant;
pub mod transaction;
pub mod user;

// Re-exports
pub use cart::*;
pub use customer::*;
pub use product::*;
pub use promotion::*;
pub use saved_order::*;
pub use tenant::*;
pub use transaction::*;
pub use user::*;
