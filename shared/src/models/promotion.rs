//! Promotion Model

use serde::{Deserialize, Serialize};

/// Promotion discount kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromotionType {
    /// `value` is a percentage in (0, 100]
    Percentage,
    /// `value` is an amount in the smallest currency unit
    Fixed,
}

/// Promotion / coupon code entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: String,
    pub vendor_id: String,
    /// Unique per tenant, matched case-insensitively
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub promotion_type: PromotionType,
    pub value: i64,
    #[serde(default)]
    pub min_spend: i64,
    pub is_active: bool,
    /// Empty means the promotion applies to the whole cart
    #[serde(default)]
    pub eligible_product_ids: Vec<String>,
}

impl Promotion {
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code.trim())
    }
}

/// Create promotion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionCreate {
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub promotion_type: PromotionType,
    pub value: i64,
    pub min_spend: Option<i64>,
    pub is_active: Option<bool>,
    pub eligible_product_ids: Option<Vec<String>>,
}

/// Update promotion payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromotionUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub promotion_type: Option<PromotionType>,
    pub value: Option<i64>,
    pub min_spend: Option<i64>,
    pub is_active: Option<bool>,
    pub eligible_product_ids: Option<Vec<String>>,
}
