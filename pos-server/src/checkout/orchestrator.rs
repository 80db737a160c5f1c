//! Checkout orchestration
//!
//! The only component that writes stock and transaction history together.
//! Everything before [`TransactionRepository::commit_checkout`] is read-only;
//! the commit itself is all or nothing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::models::{CardType, Payment, Product, Transaction};
use shared::util::{now_millis, prefixed_id};

use super::{CheckoutSession, PaymentMethod, WALK_IN_CUSTOMER};
use crate::db::repository::{
    CheckoutCommit, CustomerRepository, ProductRepository, TransactionRepository,
};
use crate::pricing::{PricingEngine, Totals};
use crate::promotion::{AppliedPromotion, PromotionService};
use crate::tenancy::TenantScope;
use crate::utils::{AppError, AppResult, ErrorCode};

/// What the cashier hands over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "payment_method", rename_all = "snake_case")]
pub enum PaymentTender {
    Cash { cash_received: i64 },
    Card { card_type: CardType, bank_name: String },
    Qr,
}

impl PaymentTender {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentTender::Cash { .. } => PaymentMethod::Cash,
            PaymentTender::Card { .. } => PaymentMethod::Card,
            PaymentTender::Qr => PaymentMethod::Qr,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    #[serde(flatten)]
    pub payment: PaymentTender,
    /// Manual discount on top of the promotion
    #[serde(default)]
    pub discount: Option<i64>,
}

/// Live view of a session with its current totals
#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    #[serde(flatten)]
    pub session: CheckoutSession,
    pub totals: Totals,
    pub promotion: Option<AppliedPromotion>,
    /// Why the selected promotion does not apply right now
    pub promotion_error: Option<String>,
}

#[derive(Clone)]
pub struct CheckoutOrchestrator {
    products: Arc<dyn ProductRepository>,
    customers: Arc<dyn CustomerRepository>,
    transactions: Arc<dyn TransactionRepository>,
    promotions: PromotionService,
    pricing: PricingEngine,
}

fn ensure_same_tenant(tenant: &TenantScope, session: &CheckoutSession) -> AppResult<()> {
    if session.tenant_id() != tenant.tenant_id() {
        return Err(AppError::permission_denied("Checkout session belongs to another tenant"));
    }
    Ok(())
}

impl CheckoutOrchestrator {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        customers: Arc<dyn CustomerRepository>,
        transactions: Arc<dyn TransactionRepository>,
        promotions: PromotionService,
        pricing: PricingEngine,
    ) -> Self {
        Self {
            products,
            customers,
            transactions,
            promotions,
            pricing,
        }
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    async fn product(&self, tenant: &TenantScope, product_id: &str) -> AppResult<Product> {
        self.products
            .find_by_id(tenant.tenant_id(), product_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", product_id)
            })
    }

    /// Add one unit of a catalog product; returns the new line quantity
    pub async fn add_to_cart(
        &self,
        tenant: &TenantScope,
        session: &mut CheckoutSession,
        product_id: &str,
    ) -> AppResult<i64> {
        ensure_same_tenant(tenant, session)?;
        let product = self.product(tenant, product_id).await?;
        session.add_product(&product)
    }

    pub async fn update_quantity(
        &self,
        tenant: &TenantScope,
        session: &mut CheckoutSession,
        product_id: &str,
        quantity: i64,
    ) -> AppResult<()> {
        ensure_same_tenant(tenant, session)?;
        let product = self.product(tenant, product_id).await?;
        session.update_quantity(&product, quantity)
    }

    pub async fn attach_customer(
        &self,
        tenant: &TenantScope,
        session: &mut CheckoutSession,
        customer_id: &str,
    ) -> AppResult<()> {
        ensure_same_tenant(tenant, session)?;
        let customer = self
            .customers
            .find_by_id(tenant.tenant_id(), customer_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::CustomerNotFound).with_detail("customer_id", customer_id)
            })?;
        session.attach_customer(&customer)
    }

    /// Select a promotion code; it is only recorded when it qualifies now
    pub async fn apply_promotion(
        &self,
        tenant: &TenantScope,
        session: &mut CheckoutSession,
        code: &str,
    ) -> AppResult<AppliedPromotion> {
        ensure_same_tenant(tenant, session)?;
        session.ensure_idle("change the promotion")?;
        let applied = self
            .promotions
            .apply_code(tenant, code, session.items())
            .await?;
        session.set_promotion(Some(applied.promotion.code.clone()))?;
        Ok(applied)
    }

    /// Current totals; a selected promotion that stopped qualifying counts as
    /// zero discount here and fails the checkout
    pub async fn summary(
        &self,
        tenant: &TenantScope,
        session: &CheckoutSession,
    ) -> AppResult<CartSummary> {
        ensure_same_tenant(tenant, session)?;

        let (promotion, promotion_error) = match session.promotion_code() {
            Some(code) => match self.promotions.apply_code(tenant, code, session.items()).await {
                Ok(applied) => (Some(applied), None),
                Err(e) => (None, Some(e.message)),
            },
            None => (None, None),
        };
        let discount = promotion.as_ref().map_or(0, |p| p.discount);

        Ok(CartSummary {
            totals: self
                .pricing
                .compute_totals(session.cart().subtotal()?, discount),
            session: session.clone(),
            promotion,
            promotion_error,
        })
    }

    /// Settle a pending payment and commit the sale.
    ///
    /// On any failure the session is left exactly as it was (still
    /// `PaymentPending`) and nothing is stored.
    pub async fn checkout(
        &self,
        tenant: &TenantScope,
        session: &mut CheckoutSession,
        request: CheckoutRequest,
    ) -> AppResult<Transaction> {
        ensure_same_tenant(tenant, session)?;

        let Some(method) = session.pending_method() else {
            return Err(AppError::with_message(
                ErrorCode::CheckoutInvalidState,
                "No payment in progress",
            ));
        };
        if session.cart().is_empty() {
            return Err(AppError::new(ErrorCode::CartEmpty));
        }

        for item in session.items() {
            self.product(tenant, &item.product_id).await?;
        }

        let subtotal = session.cart().subtotal()?;

        let promotion_discount = match session.promotion_code() {
            Some(code) => {
                self.promotions
                    .apply_code(tenant, code, session.items())
                    .await?
                    .discount
            }
            None => 0,
        };
        let manual_discount = request.discount.unwrap_or(0);
        let discount = promotion_discount
            .checked_add(manual_discount)
            .filter(|discount| manual_discount >= 0 && *discount <= subtotal)
            .ok_or_else(|| {
                AppError::new(ErrorCode::InvalidDiscount)
                    .with_detail("discount", manual_discount)
                    .with_detail("subtotal", subtotal)
            })?;

        let totals = self.pricing.compute_totals(subtotal, discount);

        if request.payment.method() != method {
            return Err(AppError::with_message(
                ErrorCode::PaymentInvalidMethod,
                "Tender does not match the pending payment method",
            ));
        }
        let payment = match request.payment {
            PaymentTender::Cash { cash_received } => {
                if cash_received < totals.total {
                    return Err(AppError::new(ErrorCode::PaymentInsufficientAmount)
                        .with_detail("total", totals.total)
                        .with_detail("cash_received", cash_received));
                }
                Payment::Cash {
                    cash_received,
                    change: cash_received - totals.total,
                }
            }
            PaymentTender::Card {
                card_type,
                bank_name,
            } => {
                let bank_name = bank_name.trim().to_string();
                if bank_name.is_empty() {
                    return Err(AppError::with_message(
                        ErrorCode::RequiredField,
                        "bank_name must not be empty",
                    ));
                }
                Payment::Card {
                    card_type,
                    bank_name,
                }
            }
            PaymentTender::Qr => Payment::Qr,
        };

        let customer_name = match session.label() {
            "" => WALK_IN_CUSTOMER.to_string(),
            label => label.to_string(),
        };
        let customer_id = session.customer().map(|c| c.id.clone());

        let transaction = Transaction {
            id: prefixed_id("TXN"),
            vendor_id: tenant.tenant_id().to_string(),
            timestamp: now_millis(),
            items: session.items().to_vec(),
            subtotal: totals.subtotal,
            discount: totals.discount,
            service_charge: totals.service_charge,
            tax: totals.tax,
            total: totals.total,
            payment,
            customer_name,
            customer_id: customer_id.clone(),
            order_type: session.order_type(),
            promotion_code: session.promotion_code().map(str::to_string),
        };

        let transaction = self
            .transactions
            .commit_checkout(CheckoutCommit {
                transaction,
                customer_id,
            })
            .await?;

        session.mark_committed(transaction.id.clone());

        tracing::info!(
            tenant_id = %transaction.vendor_id,
            transaction_id = %transaction.id,
            total = transaction.total,
            payment_method = transaction.payment.method_name(),
            "Checkout committed"
        );
        Ok(transaction)
    }
}
