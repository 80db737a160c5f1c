//! Saved (parked) order Model

use serde::{Deserialize, Serialize};

use super::{CartItem, OrderType};

/// Parked cart, consumed exactly once on resume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedOrder {
    pub id: String,
    pub vendor_id: String,
    /// Customer name or table label
    pub customer_name: String,
    pub items: Vec<CartItem>,
    pub timestamp: i64,
    pub order_type: OrderType,
}
