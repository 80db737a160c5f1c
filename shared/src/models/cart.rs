//! Cart line and order type

use serde::{Deserialize, Serialize};

use super::Product;

/// How the order leaves the counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    #[default]
    DineIn,
    TakeAway,
    Online,
}

/// Cart line: product snapshot plus quantity (>= 1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub category: String,
    /// Unit price at the time the line was added
    pub price: i64,
    #[serde(default)]
    pub image: String,
    pub quantity: i64,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }

    /// `price × quantity`; `None` on overflow
    pub fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(self.quantity)
    }
}

/// Sum of `price × quantity` over all lines; `None` on overflow
pub fn cart_subtotal(items: &[CartItem]) -> Option<i64> {
    items
        .iter()
        .try_fold(0i64, |sum, item| sum.checked_add(item.line_total()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: i64, quantity: i64) -> CartItem {
        CartItem {
            product_id: "1".into(),
            name: "Kopi".into(),
            category: "Minuman".into(),
            price,
            image: String::new(),
            quantity,
        }
    }

    #[test]
    fn test_subtotal_sums_lines() {
        assert_eq!(cart_subtotal(&[]), Some(0));
        assert_eq!(cart_subtotal(&[line(28_000, 2), line(5_000, 1)]), Some(61_000));
    }

    #[test]
    fn test_overflowing_line_is_none() {
        assert_eq!(line(i64::MAX, 2).line_total(), None);
        assert_eq!(cart_subtotal(&[line(i64::MAX, 1), line(1, 1)]), None);
    }
}
