//! Tenant directory
//!
//! Owns the tenant list and turns an [`Actor`] into an [`AccessScope`].

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use shared::models::{
    MAX_COMMISSION_RATE, RemovalPolicy, SEED_CATEGORIES, Tenant, TenantCreate, TenantStatus,
    TenantSummary, TenantUpdate,
};
use shared::util::prefixed_id;

use super::{AccessScope, Actor, TenantScope};
use crate::db::repository::{RepoError, TenantRepository};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_range, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct TenantDirectory {
    tenants: Arc<dyn TenantRepository>,
}

fn tenant_not_found(id: &str) -> AppError {
    AppError::new(ErrorCode::TenantNotFound).with_detail("tenant_id", id)
}

fn validate_commission_rate(rate: Option<u32>) -> AppResult<()> {
    match rate {
        Some(rate) => validate_range(
            i64::from(rate),
            "commission_rate",
            0,
            i64::from(MAX_COMMISSION_RATE),
        ),
        None => Ok(()),
    }
}

impl TenantDirectory {
    pub fn new(tenants: Arc<dyn TenantRepository>) -> Self {
        Self { tenants }
    }

    /// Resolve the tenant an actor works in for this request.
    ///
    /// A super admin works globally unless it explicitly enters a tenant.
    /// Every other role is bound to its own tenant and `explicit` is ignored.
    pub async fn resolve_active_tenant(
        &self,
        actor: &Actor,
        explicit: Option<&str>,
    ) -> AppResult<AccessScope> {
        if actor.is_super_admin() {
            return match explicit.map(str::trim).filter(|id| !id.is_empty()) {
                Some(id) => {
                    let tenant = self
                        .tenants
                        .find_by_id(id)
                        .await?
                        .ok_or_else(|| tenant_not_found(id))?;
                    Ok(AccessScope::Tenant(TenantScope::new(tenant.id)))
                }
                None => Ok(AccessScope::Global),
            };
        }

        let unbound = || {
            AppError::new(ErrorCode::UnboundActor).with_detail("username", actor.username.clone())
        };
        let vendor_id = actor.vendor_id.as_deref().ok_or_else(unbound)?;
        let tenant = self
            .tenants
            .find_by_id(vendor_id)
            .await?
            .ok_or_else(unbound)?;

        if !tenant.is_active() {
            return Err(AppError::new(ErrorCode::TenantInactive).with_detail("tenant_id", tenant.id));
        }

        Ok(AccessScope::Tenant(TenantScope::new(tenant.id)))
    }

    pub async fn list_tenants(&self, today: NaiveDate) -> AppResult<Vec<TenantSummary>> {
        let tenants = self.tenants.find_all().await?;
        Ok(tenants
            .into_iter()
            .map(|tenant| TenantSummary {
                subscription: tenant.subscription_status(today),
                tenant,
            })
            .collect())
    }

    pub async fn get_tenant(&self, id: &str) -> AppResult<Tenant> {
        self.tenants
            .find_by_id(id)
            .await?
            .ok_or_else(|| tenant_not_found(id))
    }

    /// Register a tenant and seed its category set
    pub async fn add_tenant(&self, payload: TenantCreate) -> AppResult<Tenant> {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
        validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&payload.owner_name, "owner_name", MAX_NAME_LEN)?;
        validate_optional_text(&payload.logo, "logo", MAX_URL_LEN)?;
        validate_commission_rate(payload.commission_rate)?;

        let id = payload
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| prefixed_id("VND"));

        let tenant = Tenant {
            id,
            name: payload.name.trim().to_string(),
            status: TenantStatus::Active,
            address: payload.address.unwrap_or_default(),
            phone: payload.phone.unwrap_or_default(),
            owner_name: payload.owner_name.unwrap_or_default(),
            joined_at: Utc::now().date_naive(),
            logo: payload.logo,
            subscription_start: payload.subscription_start,
            subscription_end: payload.subscription_end,
            commission_rate: payload.commission_rate,
        };

        let tenant = self
            .tenants
            .create(tenant, &SEED_CATEGORIES)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => {
                    AppError::with_message(ErrorCode::AlreadyExists, "Tenant id already exists")
                }
                other => other.into(),
            })?;

        tracing::info!(tenant_id = %tenant.id, name = %tenant.name, "Tenant added");
        Ok(tenant)
    }

    pub async fn update_tenant(&self, id: &str, payload: TenantUpdate) -> AppResult<Tenant> {
        let mut tenant = self.get_tenant(id).await?;

        if let Some(name) = payload.name {
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            tenant.name = name.trim().to_string();
        }
        validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
        validate_optional_text(&payload.logo, "logo", MAX_URL_LEN)?;
        validate_commission_rate(payload.commission_rate)?;

        if let Some(status) = payload.status {
            tenant.status = status;
        }
        if let Some(address) = payload.address {
            tenant.address = address;
        }
        if let Some(phone) = payload.phone {
            tenant.phone = phone;
        }
        if let Some(owner_name) = payload.owner_name {
            tenant.owner_name = owner_name;
        }
        if payload.logo.is_some() {
            tenant.logo = payload.logo;
        }
        if let Some(start) = payload.subscription_start {
            tenant.subscription_start = start;
        }
        if let Some(end) = payload.subscription_end {
            tenant.subscription_end = end;
        }
        if payload.commission_rate.is_some() {
            tenant.commission_rate = payload.commission_rate;
        }

        Ok(self.tenants.update(tenant).await?)
    }

    /// Soft-disable: the tenant stays, its actors can no longer resolve it
    pub async fn deactivate_tenant(&self, id: &str) -> AppResult<Tenant> {
        let mut tenant = self.get_tenant(id).await?;
        tenant.status = TenantStatus::Inactive;
        let tenant = self.tenants.update(tenant).await?;
        tracing::info!(tenant_id = %tenant.id, "Tenant deactivated");
        Ok(tenant)
    }

    /// Returns the number of purged records (always 0 under `Restrict`)
    pub async fn remove_tenant(&self, id: &str, policy: RemovalPolicy) -> AppResult<usize> {
        let purged = self.tenants.remove(id, policy).await.map_err(|e| match e {
            RepoError::NotFound(_) => tenant_not_found(id),
            other => other.into(),
        })?;
        tracing::info!(tenant_id = %id, ?policy, purged, "Tenant removed");
        Ok(purged)
    }
}
