//! Permission Definitions
//!
//! 角色固定映射到权限：
//! - super_admin: 全部权限 (`all`)
//! - vendor_admin: 本商户的商品、促销、报表与用户管理
//! - cashier: 收银、挂单、客户管理 (无需额外权限)

use shared::models::UserRole;

/// 商户管理 (仅 super_admin)
pub const TENANTS_MANAGE: &str = "tenants:manage";
/// 用户管理
pub const USERS_MANAGE: &str = "users:manage";
/// 商品与分类管理
pub const CATALOG_MANAGE: &str = "catalog:manage";
/// 促销管理
pub const PROMOTIONS_MANAGE: &str = "promotions:manage";
/// 报表查看
pub const REPORTS_VIEW: &str = "reports:view";
/// 报表清空
pub const REPORTS_RESET: &str = "reports:reset";

/// vendor_admin 权限
pub const VENDOR_ADMIN_PERMISSIONS: &[&str] = &[
    USERS_MANAGE,
    CATALOG_MANAGE,
    PROMOTIONS_MANAGE,
    REPORTS_VIEW,
    REPORTS_RESET,
];

/// cashier 权限 (收银功能无需额外权限)
pub const CASHIER_PERMISSIONS: &[&str] = &[];

/// 检查角色是否拥有指定权限
pub fn role_has_permission(role: UserRole, permission: &str) -> bool {
    match role {
        UserRole::SuperAdmin => true,
        UserRole::VendorAdmin => VENDOR_ADMIN_PERMISSIONS.contains(&permission),
        UserRole::Cashier => CASHIER_PERMISSIONS.contains(&permission),
    }
}
