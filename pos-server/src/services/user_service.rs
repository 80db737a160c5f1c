//! User Service - 账号管理与登录校验
//!
//! 规则:
//! - 用户名全局唯一
//! - vendor_admin 只能看到并管理本商户的账号, 且不能创建 super_admin
//! - 在已进入的商户内创建的账号自动归属该商户
//! - 非 super_admin 账号必须关联一个已存在的商户

use std::sync::Arc;

use shared::models::{User, UserCreate, UserRole, UserUpdate};

use crate::auth::{hash_password, verify_password};
use crate::db::repository::UserRepository;
use crate::tenancy::{AccessScope, Actor, TenantDirectory};
use crate::utils::validation::{MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    directory: TenantDirectory,
}

fn user_not_found(username: &str) -> AppError {
    AppError::new(ErrorCode::UserNotFound).with_detail("username", username)
}

fn super_admin_denied() -> AppError {
    AppError::with_message(
        ErrorCode::CannotModifySuperAdmin,
        "Only a super admin can manage super admin accounts",
    )
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, directory: TenantDirectory) -> Self {
        Self { users, directory }
    }

    /// 登录校验; 用户不存在与密码错误返回同一个错误
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self.users.find_by_username(username.trim()).await?;
        match user {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user),
            _ => Err(AppError::invalid_credentials()),
        }
    }

    pub async fn list(&self, scope: &AccessScope) -> AppResult<Vec<User>> {
        Ok(scope.filter(self.users.find_all().await?))
    }

    /// 查找 `scope` 内可见的用户
    pub async fn get(&self, scope: &AccessScope, username: &str) -> AppResult<User> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| user_not_found(username))?;
        match scope.tenant() {
            Some(tenant) if !tenant.owns(&user) => Err(user_not_found(username)),
            _ => Ok(user),
        }
    }

    /// 新建或迁移账号最终所属的商户
    async fn assign_tenant(
        &self,
        scope: &AccessScope,
        role: UserRole,
        requested: Option<String>,
    ) -> AppResult<Option<String>> {
        if role.is_super_admin() {
            return Ok(None);
        }
        let vendor_id = match scope.tenant() {
            Some(tenant) => tenant.tenant_id().to_string(),
            None => requested
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::RequiredField,
                        "vendor_id is required for tenant accounts",
                    )
                    .with_detail("field", "vendor_id")
                })?,
        };
        let tenant = self.directory.get_tenant(&vendor_id).await?;
        Ok(Some(tenant.id))
    }

    pub async fn create(
        &self,
        actor: &Actor,
        scope: &AccessScope,
        payload: UserCreate,
    ) -> AppResult<User> {
        validate_required_text(&payload.username, "username", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        if payload.role.is_super_admin() && !actor.is_super_admin() {
            return Err(super_admin_denied());
        }

        let vendor_id = self
            .assign_tenant(scope, payload.role, payload.vendor_id)
            .await?;
        let user = User {
            username: payload.username.trim().to_string(),
            vendor_id,
            role: payload.role,
            name: payload.name.trim().to_string(),
            password_hash: hash_password(&payload.password)?,
        };

        let user = self.users.create(user).await?;
        tracing::info!(
            username = %user.username,
            role = user.role.as_str(),
            vendor_id = ?user.vendor_id,
            created_by = %actor.username,
            "User created"
        );
        Ok(user)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        scope: &AccessScope,
        username: &str,
        payload: UserUpdate,
    ) -> AppResult<User> {
        let mut user = self.get(scope, username).await?;
        let role = payload.role.unwrap_or(user.role);
        if (user.role.is_super_admin() || role.is_super_admin()) && !actor.is_super_admin() {
            return Err(super_admin_denied());
        }

        if let Some(name) = payload.name {
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            user.name = name.trim().to_string();
        }
        if let Some(password) = payload.password {
            validate_required_text(&password, "password", MAX_PASSWORD_LEN)?;
            user.password_hash = hash_password(&password)?;
        }
        if role != user.role || payload.vendor_id.is_some() {
            let requested = payload.vendor_id.or_else(|| user.vendor_id.clone());
            user.vendor_id = self.assign_tenant(scope, role, requested).await?;
            user.role = role;
        }

        Ok(self.users.update(user).await?)
    }

    pub async fn delete(&self, actor: &Actor, scope: &AccessScope, username: &str) -> AppResult<()> {
        if actor.username == username {
            return Err(AppError::new(ErrorCode::CannotDeleteSelf));
        }
        let user = self.get(scope, username).await?;
        if user.role.is_super_admin() && !actor.is_super_admin() {
            return Err(super_admin_denied());
        }
        if !self.users.delete(&user.username).await? {
            return Err(user_not_found(username));
        }
        tracing::info!(username = %user.username, deleted_by = %actor.username, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::MemoryStore;
    use shared::models::TenantCreate;

    struct Fixture {
        users: UserService,
        directory: TenantDirectory,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let directory = TenantDirectory::new(store.clone());
        for (id, name) in [("v1", "Kopi Senja"), ("v2", "Burger Blenger")] {
            directory
                .add_tenant(TenantCreate {
                    id: Some(id.into()),
                    name: name.into(),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        Fixture {
            users: UserService::new(store, directory.clone()),
            directory,
        }
    }

    fn super_admin() -> Actor {
        Actor {
            username: "superadmin".into(),
            role: UserRole::SuperAdmin,
            vendor_id: None,
        }
    }

    fn owner(vendor: &str) -> Actor {
        Actor {
            username: format!("owner-{}", vendor),
            role: UserRole::VendorAdmin,
            vendor_id: Some(vendor.into()),
        }
    }

    fn payload(username: &str, role: UserRole, vendor_id: Option<&str>) -> UserCreate {
        UserCreate {
            username: username.into(),
            password: "123".into(),
            name: username.to_uppercase(),
            role,
            vendor_id: vendor_id.map(Into::into),
        }
    }

    async fn scope_of(fixture: &Fixture, actor: &Actor, entered: Option<&str>) -> AccessScope {
        fixture
            .directory
            .resolve_active_tenant(actor, entered)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_authenticate() {
        let f = fixture().await;
        let admin = super_admin();
        let global = scope_of(&f, &admin, None).await;
        f.users
            .create(&admin, &global, payload("kasir1", UserRole::Cashier, Some("v1")))
            .await
            .unwrap();

        let user = f.users.authenticate("kasir1", "123").await.unwrap();
        assert_eq!(user.vendor_id.as_deref(), Some("v1"));
        assert_eq!(
            f.users.authenticate("kasir1", "wrong").await.unwrap_err().code,
            ErrorCode::InvalidCredentials
        );
        assert_eq!(
            f.users.authenticate("nobody", "123").await.unwrap_err().code,
            ErrorCode::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn test_entered_tenant_is_inherited() {
        let f = fixture().await;
        let admin = super_admin();
        let in_v2 = scope_of(&f, &admin, Some("v2")).await;

        let user = f
            .users
            .create(&admin, &in_v2, payload("kasir2", UserRole::Cashier, Some("v1")))
            .await
            .unwrap();
        assert_eq!(user.vendor_id.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_tenant_account_needs_existing_tenant() {
        let f = fixture().await;
        let admin = super_admin();
        let global = scope_of(&f, &admin, None).await;

        let err = f
            .users
            .create(&admin, &global, payload("ghost", UserRole::Cashier, Some("v9")))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TenantNotFound);

        let err = f
            .users
            .create(&admin, &global, payload("ghost", UserRole::Cashier, None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
    }

    #[tokio::test]
    async fn test_vendor_admin_limits() {
        let f = fixture().await;
        let admin = super_admin();
        let global = scope_of(&f, &admin, None).await;
        f.users
            .create(&admin, &global, payload("kasir1", UserRole::Cashier, Some("v1")))
            .await
            .unwrap();
        f.users
            .create(&admin, &global, payload("kasir2", UserRole::Cashier, Some("v2")))
            .await
            .unwrap();

        let owner1 = owner("v1");
        let v1 = scope_of(&f, &owner1, Some("v2")).await;

        let err = f
            .users
            .create(&owner1, &v1, payload("root2", UserRole::SuperAdmin, None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CannotModifySuperAdmin);

        let listed = f.users.list(&v1).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].username, "kasir1");

        let err = f.users.delete(&owner1, &v1, "kasir2").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);

        let err = f
            .users
            .create(&owner1, &v1, payload("kasir1", UserRole::Cashier, None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UsernameExists);
    }

    #[tokio::test]
    async fn test_cannot_delete_self() {
        let f = fixture().await;
        let owner1 = owner("v1");
        let v1 = scope_of(&f, &owner1, None).await;
        let err = f
            .users
            .delete(&owner1, &v1, &owner1.username)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CannotDeleteSelf);
    }

    #[tokio::test]
    async fn test_update_password_and_name() {
        let f = fixture().await;
        let admin = super_admin();
        let global = scope_of(&f, &admin, None).await;
        f.users
            .create(&admin, &global, payload("kasir1", UserRole::Cashier, Some("v1")))
            .await
            .unwrap();

        let owner1 = owner("v1");
        let v1 = scope_of(&f, &owner1, None).await;
        let updated = f
            .users
            .update(
                &owner1,
                &v1,
                "kasir1",
                UserUpdate {
                    name: Some("Kasir Pagi".into()),
                    password: Some("rahasia".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Kasir Pagi");
        assert!(f.users.authenticate("kasir1", "rahasia").await.is_ok());

        let err = f
            .users
            .update(
                &owner1,
                &v1,
                "kasir1",
                UserUpdate {
                    role: Some(UserRole::SuperAdmin),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CannotModifySuperAdmin);
    }
}
