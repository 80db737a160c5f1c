//! Transaction Model

use serde::{Deserialize, Serialize};

use super::{CartItem, OrderType};

/// Card network kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Debit,
    Credit,
}

/// Payment details, one variant per payment method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "payment_method", rename_all = "snake_case")]
pub enum Payment {
    Cash { cash_received: i64, change: i64 },
    Card { card_type: CardType, bank_name: String },
    Qr,
}

impl Payment {
    pub fn method_name(&self) -> &'static str {
        match self {
            Payment::Cash { .. } => "cash",
            Payment::Card { .. } => "card",
            Payment::Qr => "qr",
        }
    }
}

/// Committed sale (immutable once created)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub vendor_id: String,
    /// Unix millis
    pub timestamp: i64,
    pub items: Vec<CartItem>,
    pub subtotal: i64,
    pub discount: i64,
    pub service_charge: i64,
    pub tax: i64,
    pub total: i64,
    pub payment: Payment,
    pub customer_name: String,
    pub customer_id: Option<String>,
    pub order_type: OrderType,
    pub promotion_code: Option<String>,
}
