//! Parking Service - 挂单与取单
//!
//! 取单是"读取并删除"的原子操作, 同一挂单只能被取回一次。

use std::sync::Arc;

use shared::models::SavedOrder;
use shared::util::{now_millis, prefixed_id};

use crate::checkout::CheckoutSession;
use crate::db::repository::{CustomerRepository, SavedOrderRepository};
use crate::tenancy::TenantScope;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct ParkingService {
    saved_orders: Arc<dyn SavedOrderRepository>,
    customers: Arc<dyn CustomerRepository>,
}

impl ParkingService {
    pub fn new(
        saved_orders: Arc<dyn SavedOrderRepository>,
        customers: Arc<dyn CustomerRepository>,
    ) -> Self {
        Self {
            saved_orders,
            customers,
        }
    }

    pub async fn list(&self, tenant: &TenantScope) -> AppResult<Vec<SavedOrder>> {
        Ok(self.saved_orders.find_all(tenant.tenant_id()).await?)
    }

    /// 挂单: 需要非空购物车和标识 (客户名或桌号), 成功后清空会话
    pub async fn save(
        &self,
        tenant: &TenantScope,
        session: &mut CheckoutSession,
    ) -> AppResult<SavedOrder> {
        session.ensure_idle("park the order")?;
        if session.cart().is_empty() {
            return Err(AppError::new(ErrorCode::CartEmpty));
        }
        let label = session.label().to_string();
        if label.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::MissingIdentifier,
                "A customer name or table label is required to park an order",
            ));
        }

        let order = SavedOrder {
            id: prefixed_id("ORD"),
            vendor_id: tenant.tenant_id().to_string(),
            customer_name: label,
            items: session.items().to_vec(),
            timestamp: now_millis(),
            order_type: session.order_type(),
        };
        let order = self.saved_orders.create(order).await?;
        session.park();

        tracing::info!(
            tenant_id = %tenant.tenant_id(),
            order_id = %order.id,
            items = order.items.len(),
            "Order parked"
        );
        Ok(order)
    }

    /// 取单: 删除挂单并恢复到 (空的) 会话; 同名客户会被重新关联
    pub async fn load(
        &self,
        tenant: &TenantScope,
        session: &mut CheckoutSession,
        order_id: &str,
    ) -> AppResult<SavedOrder> {
        session.ensure_idle("resume an order")?;
        if !session.cart().is_empty() {
            return Err(AppError::with_message(
                ErrorCode::CheckoutInvalidState,
                "Clear or park the current cart before resuming an order",
            ));
        }

        let order = self
            .saved_orders
            .take(tenant.tenant_id(), order_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::SavedOrderNotFound).with_detail("order_id", order_id)
            })?;

        let customer = self
            .customers
            .find_all(tenant.tenant_id())
            .await?
            .into_iter()
            .find(|c| c.name == order.customer_name);

        session.restore(
            order.items.clone(),
            order.customer_name.clone(),
            order.order_type,
            customer.as_ref(),
        );

        tracing::info!(tenant_id = %tenant.tenant_id(), order_id = %order.id, "Order resumed");
        Ok(order)
    }
}
