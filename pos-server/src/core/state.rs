use std::sync::Arc;

use crate::auth::JwtService;
use crate::checkout::{CheckoutOrchestrator, SessionRegistry};
use crate::core::Config;
use crate::db::repository::MemoryStore;
use crate::db::seed::seed_demo_data;
use crate::pricing::PricingEngine;
use crate::promotion::PromotionService;
use crate::services::{
    CatalogService, CustomerService, EnrichmentClient, ParkingService, ReportService, UserService,
};
use crate::tenancy::TenantDirectory;
use crate::utils::AppResult;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 所有服务共享同一个 [`MemoryStore`], 使用 Arc 实现浅拷贝。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Arc<Config> | 配置项 (不可变) |
/// | store | Arc<MemoryStore> | 进程内数据存储 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | directory | TenantDirectory | 商户目录与作用域解析 |
/// | catalog | CatalogService | 商品与分类 |
/// | customers | CustomerService | 客户管理 |
/// | promotions | PromotionService | 促销管理 |
/// | checkout | CheckoutOrchestrator | 购物车与结账 |
/// | parking | ParkingService | 挂单 |
/// | reports | ReportService | 报表 |
/// | users | UserService | 账号管理 |
/// | sessions | Arc<SessionRegistry> | 收银会话 (用户 × 商户) |
/// | enrichment | EnrichmentClient | AI 文案/分析 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: Arc<MemoryStore>,
    pub jwt_service: Arc<JwtService>,
    pub directory: TenantDirectory,
    pub catalog: CatalogService,
    pub customers: CustomerService,
    pub promotions: PromotionService,
    pub checkout: CheckoutOrchestrator,
    pub parking: ParkingService,
    pub reports: ReportService,
    pub users: UserService,
    pub sessions: Arc<SessionRegistry>,
    pub enrichment: EnrichmentClient,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("environment", &self.config.environment)
            .field("jwt_service", &self.jwt_service)
            .field("enrichment", &self.enrichment)
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

impl ServerState {
    /// 在给定存储之上组装全部服务
    pub fn with_store(config: Config, store: Arc<MemoryStore>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let enrichment = EnrichmentClient::new(config.ai.clone());
        let directory = TenantDirectory::new(store.clone());
        let promotions = PromotionService::new(store.clone());
        let pricing = PricingEngine::new(config.service_charge_percent, config.tax_percent);

        Self {
            jwt_service,
            catalog: CatalogService::new(store.clone(), store.clone()),
            customers: CustomerService::new(store.clone()),
            checkout: CheckoutOrchestrator::new(
                store.clone(),
                store.clone(),
                store.clone(),
                promotions.clone(),
                pricing,
            ),
            promotions,
            parking: ParkingService::new(store.clone(), store.clone()),
            reports: ReportService::new(store.clone(), store.clone(), enrichment.clone()),
            users: UserService::new(store.clone(), directory.clone()),
            directory,
            sessions: Arc::new(SessionRegistry::new()),
            enrichment,
            store,
            config: Arc::new(config),
        }
    }

    /// 初始化服务器状态
    ///
    /// `seed_demo_data` 开启时加载演示商户、商品和账号。
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let seed = config.seed_demo_data;
        let state = Self::with_store(config, Arc::new(MemoryStore::new()));
        if seed {
            seed_demo_data(&state.store).await?;
            tracing::info!("Demo data loaded");
        }
        Ok(state)
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
