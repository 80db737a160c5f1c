//! 认证与授权模块
//!
//! - [`jwt`] - JWT 令牌生成与验证
//! - [`password`] - Argon2 密码哈希
//! - [`permissions`] - 角色权限映射
//! - [`middleware`] - 认证与权限中间件
//! - [`extractor`] - 请求上下文提取器 (解析当前商户)

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;

pub use extractor::RequestContext;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission};
pub use password::{hash_password, verify_password};
