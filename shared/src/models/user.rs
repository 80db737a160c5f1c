//! User Model

use serde::{Deserialize, Serialize};

/// Actor role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    VendorAdmin,
    Cashier,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::VendorAdmin => "vendor_admin",
            UserRole::Cashier => "cashier",
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, UserRole::SuperAdmin)
    }
}

/// User entity
///
/// `vendor_id` is absent only for super admins. The password hash never
/// leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub vendor_id: Option<String>,
    pub role: UserRole,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
    pub vendor_id: Option<String>,
}

/// Update user payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub vendor_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            username: "kasir1".to_string(),
            vendor_id: Some("v1".to_string()),
            role: UserRole::Cashier,
            name: "Kasir".to_string(),
            password_hash: "$argon2id$secret".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"role\":\"cashier\""));
    }
}
