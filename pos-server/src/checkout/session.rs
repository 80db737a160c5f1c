//! Checkout session state machine
//!
//! ```text
//! CartOpen ──begin_payment──▶ PaymentPending ──commit──▶ Committed
//!    ▲                             │                         │
//!    └──────cancel_payment─────────┘                         │
//!    └────────────────────next cart edit─────────────────────┘
//! ```

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use shared::models::{CartItem, Customer, OrderType, Product};
use tokio::sync::Mutex;

use super::Cart;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Label used on transactions without a customer
pub const WALK_IN_CUSTOMER: &str = "Pelanggan Umum";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Qr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum CheckoutPhase {
    CartOpen,
    PaymentPending { method: PaymentMethod },
    Committed { transaction_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedCustomer {
    pub id: String,
    pub name: String,
}

/// One actor's cart in one tenant
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
    tenant_id: String,
    cart: Cart,
    customer: Option<AttachedCustomer>,
    /// Free-text label typed at the counter (table, name, ...)
    customer_name: String,
    order_type: OrderType,
    promotion_code: Option<String>,
    #[serde(flatten)]
    phase: CheckoutPhase,
}

fn invalid_state(action: &str, phase: &CheckoutPhase) -> AppError {
    AppError::with_message(
        ErrorCode::CheckoutInvalidState,
        format!("Cannot {} in the current checkout phase", action),
    )
    .with_detail("phase", format!("{:?}", phase))
}

impl CheckoutSession {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            cart: Cart::new(),
            customer: None,
            customer_name: String::new(),
            order_type: OrderType::default(),
            promotion_code: None,
            phase: CheckoutPhase::CartOpen,
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    pub fn customer(&self) -> Option<&AttachedCustomer> {
        self.customer.as_ref()
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn promotion_code(&self) -> Option<&str> {
        self.promotion_code.as_deref()
    }

    pub fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    /// Attached customer's name, else the typed label (trimmed, may be empty)
    pub fn label(&self) -> &str {
        match &self.customer {
            Some(customer) => &customer.name,
            None => self.customer_name.trim(),
        }
    }

    /// Cart edits reopen a committed session and are refused while a payment
    /// is pending
    fn ensure_editable(&mut self, action: &str) -> AppResult<()> {
        match self.phase {
            CheckoutPhase::PaymentPending { .. } => Err(invalid_state(action, &self.phase)),
            CheckoutPhase::Committed { .. } => {
                self.phase = CheckoutPhase::CartOpen;
                Ok(())
            }
            CheckoutPhase::CartOpen => Ok(()),
        }
    }

    pub fn add_product(&mut self, product: &Product) -> AppResult<i64> {
        self.ensure_editable("add items")?;
        self.cart.add_product(product)
    }

    pub fn update_quantity(&mut self, product: &Product, quantity: i64) -> AppResult<()> {
        self.ensure_editable("change quantities")?;
        self.cart.update_quantity(product, quantity)
    }

    pub fn remove_item(&mut self, product_id: &str) -> AppResult<()> {
        self.ensure_editable("remove items")?;
        self.cart.remove_item(product_id)
    }

    /// Drop lines, customer, label, order type and promotion
    pub fn clear(&mut self) -> AppResult<()> {
        self.ensure_editable("clear the cart")?;
        self.reset();
        Ok(())
    }

    pub fn set_details(
        &mut self,
        customer_name: Option<String>,
        order_type: Option<OrderType>,
    ) -> AppResult<()> {
        self.ensure_editable("edit order details")?;
        if let Some(name) = customer_name {
            self.customer_name = name;
        }
        if let Some(order_type) = order_type {
            self.order_type = order_type;
        }
        Ok(())
    }

    pub fn attach_customer(&mut self, customer: &Customer) -> AppResult<()> {
        self.ensure_editable("attach a customer")?;
        self.customer = Some(AttachedCustomer {
            id: customer.id.clone(),
            name: customer.name.clone(),
        });
        Ok(())
    }

    pub fn detach_customer(&mut self) -> AppResult<()> {
        self.ensure_editable("detach the customer")?;
        self.customer = None;
        Ok(())
    }

    pub fn set_promotion(&mut self, code: Option<String>) -> AppResult<()> {
        self.ensure_editable("change the promotion")?;
        self.promotion_code = code;
        Ok(())
    }

    pub fn begin_payment(&mut self, method: PaymentMethod) -> AppResult<()> {
        if let CheckoutPhase::Committed { .. } = self.phase {
            self.phase = CheckoutPhase::CartOpen;
        }
        if self.cart.is_empty() {
            return Err(AppError::new(ErrorCode::CartEmpty));
        }
        self.phase = CheckoutPhase::PaymentPending { method };
        Ok(())
    }

    pub fn cancel_payment(&mut self) -> AppResult<()> {
        match self.phase {
            CheckoutPhase::PaymentPending { .. } => {
                self.phase = CheckoutPhase::CartOpen;
                Ok(())
            }
            _ => Err(invalid_state("cancel a payment", &self.phase)),
        }
    }

    pub fn pending_method(&self) -> Option<PaymentMethod> {
        match self.phase {
            CheckoutPhase::PaymentPending { method } => Some(method),
            _ => None,
        }
    }

    pub(crate) fn ensure_idle(&self, action: &str) -> AppResult<()> {
        match self.phase {
            CheckoutPhase::PaymentPending { .. } => Err(invalid_state(action, &self.phase)),
            _ => Ok(()),
        }
    }

    fn reset(&mut self) {
        self.cart.clear();
        self.customer = None;
        self.customer_name.clear();
        self.order_type = OrderType::default();
        self.promotion_code = None;
    }

    /// Called once the transaction is stored
    pub(crate) fn mark_committed(&mut self, transaction_id: String) {
        self.reset();
        self.phase = CheckoutPhase::Committed { transaction_id };
    }

    /// Start fresh after the cart was stored as a parked order
    pub(crate) fn park(&mut self) {
        self.reset();
        self.phase = CheckoutPhase::CartOpen;
    }

    /// Load a parked order into this (empty) session
    pub(crate) fn restore(
        &mut self,
        items: Vec<CartItem>,
        label: String,
        order_type: OrderType,
        customer: Option<&Customer>,
    ) {
        self.reset();
        self.cart.restore(items);
        self.customer_name = label;
        self.order_type = order_type;
        self.customer = customer.map(|c| AttachedCustomer {
            id: c.id.clone(),
            name: c.name.clone(),
        });
        self.phase = CheckoutPhase::CartOpen;
    }
}

/// Live sessions keyed by (username, tenant id)
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<(String, String), Arc<Mutex<CheckoutSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or open the session of an actor in a tenant
    pub fn session(&self, username: &str, tenant_id: &str) -> Arc<Mutex<CheckoutSession>> {
        self.sessions
            .entry((username.to_string(), tenant_id.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(CheckoutSession::new(tenant_id))))
            .clone()
    }

    /// Drop every session of a removed tenant
    pub fn discard_tenant(&self, tenant_id: &str) {
        self.sessions.retain(|(_, tenant), _| tenant != tenant_id);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
