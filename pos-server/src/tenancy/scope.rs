//! Actor and access scope
//!
//! Services never take a raw tenant id from a caller. They take an
//! [`AccessScope`] (or the [`TenantScope`] inside it), which can only be
//! produced by [`super::TenantDirectory::resolve_active_tenant`].

use shared::models::{Customer, Product, Promotion, SavedOrder, Transaction, User, UserRole};

use crate::utils::{AppError, AppResult};

/// The authenticated user performing an operation
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub username: String,
    pub role: UserRole,
    /// Bound tenant; `None` only for super admins
    pub vendor_id: Option<String>,
}

impl Actor {
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }
}

/// Records that belong to exactly one tenant (or to none)
pub trait TenantOwned {
    fn owner_id(&self) -> Option<&str>;
}

macro_rules! impl_tenant_owned {
    ($($ty:ty),*) => {
        $(impl TenantOwned for $ty {
            fn owner_id(&self) -> Option<&str> {
                Some(&self.vendor_id)
            }
        })*
    };
}

impl_tenant_owned!(Product, Customer, Promotion, Transaction, SavedOrder);

impl TenantOwned for User {
    fn owner_id(&self) -> Option<&str> {
        self.vendor_id.as_deref()
    }
}

/// A resolved, existing tenant the actor may act in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantScope {
    tenant_id: String,
}

impl TenantScope {
    pub(crate) fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn owns<T: TenantOwned + ?Sized>(&self, record: &T) -> bool {
        record.owner_id() == Some(self.tenant_id.as_str())
    }
}

/// What an actor can see for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// Super admin outside any tenant: tenant-independent admin data only
    Global,
    Tenant(TenantScope),
}

impl AccessScope {
    pub fn tenant(&self) -> Option<&TenantScope> {
        match self {
            AccessScope::Global => None,
            AccessScope::Tenant(scope) => Some(scope),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, AccessScope::Global)
    }

    /// Tenant-bound data (catalog, cart, CRM, promotions, parking, reports)
    /// needs an entered tenant
    pub fn require_tenant(&self) -> AppResult<&TenantScope> {
        self.tenant().ok_or_else(AppError::tenant_not_selected)
    }

    /// Keep only the records visible in this scope
    pub fn filter<T: TenantOwned>(&self, records: Vec<T>) -> Vec<T> {
        match self {
            AccessScope::Global => records,
            AccessScope::Tenant(scope) => records.into_iter().filter(|r| scope.owns(r)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    fn user(username: &str, vendor: Option<&str>) -> User {
        User {
            username: username.into(),
            vendor_id: vendor.map(Into::into),
            role: UserRole::Cashier,
            name: username.into(),
            password_hash: String::new(),
        }
    }

    #[test]
    fn test_filter_by_tenant() {
        let users = vec![
            user("root", None),
            user("kasir1", Some("v1")),
            user("kasir2", Some("v2")),
        ];

        let scoped = AccessScope::Tenant(TenantScope::new("v1")).filter(users.clone());
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].username, "kasir1");

        assert_eq!(AccessScope::Global.filter(users).len(), 3);
    }

    #[test]
    fn test_global_scope_requires_tenant_for_tenant_data() {
        let err = AccessScope::Global.require_tenant().unwrap_err();
        assert_eq!(err.code, ErrorCode::TenantNotSelected);
    }
}
