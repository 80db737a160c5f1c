//! Cart lines with stock-aware editing

use serde::{Deserialize, Serialize};
use shared::models::{CartItem, Product, cart_subtotal};

use crate::utils::validation::{MAX_ORDER_AMOUNT, MAX_QUANTITY, amount_overflow};
use crate::utils::{AppError, AppResult, ErrorCode};

fn line_not_found(product_id: &str) -> AppError {
    AppError::new(ErrorCode::CartItemNotFound).with_detail("product_id", product_id)
}

fn invalid_quantity(quantity: i64) -> AppError {
    AppError::new(ErrorCode::InvalidQuantity)
        .with_detail("quantity", quantity)
        .with_detail("max", MAX_QUANTITY)
}

/// In-progress set of lines, one per product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Fails with `ValueOutOfRange` above [`MAX_ORDER_AMOUNT`]
    pub fn subtotal(&self) -> AppResult<i64> {
        cart_subtotal(&self.items)
            .filter(|subtotal| *subtotal <= MAX_ORDER_AMOUNT)
            .ok_or_else(|| amount_overflow("subtotal"))
    }

    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map_or(0, |item| item.quantity)
    }

    /// Add one unit of `product`; returns the line's new quantity.
    ///
    /// Fails without touching the cart when the product is out of stock or
    /// one more unit would exceed its stock or [`MAX_QUANTITY`].
    pub fn add_product(&mut self, product: &Product) -> AppResult<i64> {
        if product.stock <= 0 {
            return Err(AppError::new(ErrorCode::ProductOutOfStock)
                .with_detail("product_id", product.id.as_str()));
        }

        match self.items.iter_mut().find(|item| item.product_id == product.id) {
            Some(line) => {
                let wanted = line.quantity + 1;
                if wanted > MAX_QUANTITY {
                    return Err(invalid_quantity(wanted));
                }
                if wanted > product.stock {
                    return Err(AppError::insufficient_stock(&product.id, wanted, product.stock));
                }
                line.quantity = wanted;
                Ok(wanted)
            }
            None => {
                self.items.push(CartItem::from_product(product, 1));
                Ok(1)
            }
        }
    }

    /// Set a line's quantity; the previous quantity is kept on failure
    pub fn update_quantity(&mut self, product: &Product, quantity: i64) -> AppResult<()> {
        if !(1..=MAX_QUANTITY).contains(&quantity) {
            return Err(invalid_quantity(quantity));
        }
        let line = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id)
            .ok_or_else(|| line_not_found(&product.id))?;
        if quantity > product.stock {
            return Err(AppError::insufficient_stock(&product.id, quantity, product.stock));
        }
        line.quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> AppResult<()> {
        let index = self
            .items
            .iter()
            .position(|item| item.product_id == product_id)
            .ok_or_else(|| line_not_found(product_id))?;
        self.items.remove(index);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replace every line (resuming a parked order)
    pub(crate) fn restore(&mut self, items: Vec<CartItem>) {
        self.items = items;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: i64, stock: i64) -> Product {
        Product {
            id: id.into(),
            vendor_id: "v1".into(),
            name: format!("Produk {}", id),
            category: "Umum".into(),
            price,
            stock,
            image: String::new(),
            description: None,
            color: None,
        }
    }

    #[test]
    fn test_add_increments_existing_line() {
        let mut cart = Cart::new();
        let kopi = product("1", 28_000, 50);
        assert_eq!(cart.add_product(&kopi).unwrap(), 1);
        assert_eq!(cart.add_product(&kopi).unwrap(), 2);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.subtotal().unwrap(), 56_000);
    }

    #[test]
    fn test_add_out_of_stock() {
        let mut cart = Cart::new();
        let err = cart.add_product(&product("1", 1_000, 0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductOutOfStock);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_second_add_beyond_stock_keeps_quantity() {
        let mut cart = Cart::new();
        let last_one = product("1", 1_000, 1);
        cart.add_product(&last_one).unwrap();

        let err = cart.add_product(&last_one).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(cart.quantity_of("1"), 1);
    }

    #[test]
    fn test_update_quantity_rules() {
        let mut cart = Cart::new();
        let teh = product("103", 15_000, 5);
        cart.add_product(&teh).unwrap();

        cart.update_quantity(&teh, 4).unwrap();
        assert_eq!(cart.quantity_of("103"), 4);

        let err = cart.update_quantity(&teh, 6).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(cart.quantity_of("103"), 4);

        let err = cart.update_quantity(&teh, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
        assert_eq!(cart.quantity_of("103"), 4);

        let err = cart
            .update_quantity(&product("999", 1, 10), 1)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CartItemNotFound);
    }

    #[test]
    fn test_quantity_capped_per_line() {
        let mut cart = Cart::new();
        let plenty = product("1", 1_000, MAX_QUANTITY * 10);
        cart.add_product(&plenty).unwrap();

        let err = cart.update_quantity(&plenty, MAX_QUANTITY + 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
        assert_eq!(cart.quantity_of("1"), 1);

        cart.update_quantity(&plenty, MAX_QUANTITY).unwrap();
        let err = cart.add_product(&plenty).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
        assert_eq!(cart.quantity_of("1"), MAX_QUANTITY);
    }

    #[test]
    fn test_overflowing_subtotal_is_an_error() {
        let mut cart = Cart::new();
        cart.restore(vec![CartItem::from_product(&product("1", i64::MAX, 5), 3)]);
        let err = cart.subtotal().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_product(&product("1", 1_000, 3)).unwrap();
        cart.remove_item("1").unwrap();
        assert!(cart.is_empty());
        assert_eq!(
            cart.remove_item("1").unwrap_err().code,
            ErrorCode::CartItemNotFound
        );
    }
}
