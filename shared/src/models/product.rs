//! Product Model

use serde::{Deserialize, Serialize};

/// Category every tenant falls back to when it has no category set
pub const DEFAULT_CATEGORY: &str = "Umum";

/// Categories seeded for a newly added tenant
pub const SEED_CATEGORIES: [&str; 3] = ["Umum", "Makanan", "Minuman"];

/// Product entity
///
/// `price` and `stock` are integers; price is in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub vendor_id: String,
    pub name: String,
    /// Category name (must exist in the tenant's category set)
    pub category: String,
    pub price: i64,
    pub stock: i64,
    #[serde(default)]
    pub image: String,
    pub description: Option<String>,
    /// Tile color hint for the POS grid
    pub color: Option<String>,
}

/// Create product payload
///
/// A caller-supplied `vendor_id` is accepted but always overwritten with the
/// active tenant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCreate {
    pub vendor_id: Option<String>,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub stock: i64,
    pub image: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}
