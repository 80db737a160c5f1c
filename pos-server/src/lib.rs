//! POS Server - 多商户收银系统核心
//!
//! # 架构概述
//!
//! - **商户** (`tenancy`): 商户目录、访问作用域解析
//! - **收银** (`checkout`): 购物车、结账状态机、结账提交
//! - **计价** (`pricing`): 服务费与税费计算
//! - **促销** (`promotion`): 促销码评估与管理
//! - **认证** (`auth`): JWT + Argon2 认证, 角色权限
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、权限、请求上下文
//! ├── tenancy/       # 商户目录与作用域
//! ├── checkout/      # 购物车、会话、结账
//! ├── pricing/       # 金额计算
//! ├── promotion/     # 促销
//! ├── services/      # 商品、客户、挂单、报表、账号、AI
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 仓储接口、进程内存储、演示数据
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod pricing;
pub mod promotion;
pub mod services;
pub mod tenancy;
pub mod utils;

// Re-export 公共类型
pub use auth::{JwtService, RequestContext};
pub use core::{Config, Server, ServerState};
pub use tenancy::{AccessScope, Actor, TenantDirectory, TenantScope};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode, ErrorResponse};

pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 进程启动准备: 加载 `.env`, 按配置初始化日志
pub fn setup_environment() -> anyhow::Result<Config> {
    // .env 不存在时忽略
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    let log_dir = config
        .log_dir
        .as_deref()
        .filter(|dir| std::path::Path::new(dir).is_dir());
    init_logger_with_file(&config.log_level, config.is_production(), log_dir)?;

    if config.log_dir.is_some() && log_dir.is_none() {
        tracing::warn!(log_dir = ?config.log_dir, "Log directory does not exist, file logging disabled");
    }
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
    "#
    );
}
