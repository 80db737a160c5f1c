//! Customer Service - 客户管理 (CRM)

use std::sync::Arc;

use shared::models::{Customer, CustomerCreate, CustomerUpdate};
use shared::util::prefixed_id;

use crate::checkout::CheckoutSession;
use crate::db::repository::CustomerRepository;
use crate::tenancy::TenantScope;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
}

fn customer_not_found(id: &str) -> AppError {
    AppError::new(ErrorCode::CustomerNotFound).with_detail("customer_id", id)
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self { customers }
    }

    /// 客户列表; `query` 匹配姓名 (不区分大小写) 或手机号 (子串)
    pub async fn list(&self, tenant: &TenantScope, query: Option<&str>) -> AppResult<Vec<Customer>> {
        let customers = self.customers.find_all(tenant.tenant_id()).await?;
        let query = query.map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return Ok(customers);
        }
        let needle = query.to_lowercase();
        Ok(customers
            .into_iter()
            .filter(|c| c.name.to_lowercase().contains(&needle) || c.phone.contains(query))
            .collect())
    }

    pub async fn get(&self, tenant: &TenantScope, id: &str) -> AppResult<Customer> {
        self.customers
            .find_by_id(tenant.tenant_id(), id)
            .await?
            .ok_or_else(|| customer_not_found(id))
    }

    pub async fn create(&self, tenant: &TenantScope, payload: CustomerCreate) -> AppResult<Customer> {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
        validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

        let customer = Customer {
            id: prefixed_id("CUST"),
            vendor_id: tenant.tenant_id().to_string(),
            name: payload.name.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            email: payload.email.filter(|e| !e.trim().is_empty()),
            notes: payload.notes.filter(|n| !n.trim().is_empty()),
            total_visits: 0,
            last_visit: None,
        };

        let customer = self.customers.create(customer).await?;
        tracing::info!(tenant_id = %tenant.tenant_id(), customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// 快速建档并挂到当前收银会话
    pub async fn quick_create(
        &self,
        tenant: &TenantScope,
        session: &mut CheckoutSession,
        name: String,
        phone: String,
    ) -> AppResult<Customer> {
        session.ensure_idle("attach a customer")?;
        let customer = self
            .create(
                tenant,
                CustomerCreate {
                    name,
                    phone,
                    ..Default::default()
                },
            )
            .await?;
        session.attach_customer(&customer)?;
        Ok(customer)
    }

    /// 更新资料; 到店次数与最近到店时间只由结账更新
    pub async fn update(
        &self,
        tenant: &TenantScope,
        id: &str,
        payload: CustomerUpdate,
    ) -> AppResult<Customer> {
        let mut customer = self.get(tenant, id).await?;

        if let Some(name) = payload.name {
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            customer.name = name.trim().to_string();
        }
        if let Some(phone) = payload.phone {
            validate_required_text(&phone, "phone", MAX_SHORT_TEXT_LEN)?;
            customer.phone = phone.trim().to_string();
        }
        validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
        validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
        if payload.email.is_some() {
            customer.email = payload.email;
        }
        if payload.notes.is_some() {
            customer.notes = payload.notes;
        }

        Ok(self.customers.update(customer).await?)
    }

    pub async fn delete(&self, tenant: &TenantScope, id: &str) -> AppResult<()> {
        if !self.customers.delete(tenant.tenant_id(), id).await? {
            return Err(customer_not_found(id));
        }
        Ok(())
    }
}
