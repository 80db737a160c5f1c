//! 服务层 - 业务服务
//!
//! # 服务列表
//!
//! - [`CatalogService`] - 商品与分类管理
//! - [`CustomerService`] - 客户管理 (CRM)
//! - [`ParkingService`] - 挂单与取单
//! - [`ReportService`] - 交易记录、销售汇总与 AI 分析
//! - [`UserService`] - 账号管理与登录校验
//! - [`EnrichmentClient`] - AI 商品文案与销售分析

pub mod catalog_service;
pub mod customer_service;
pub mod enrichment;
pub mod parking_service;
pub mod report_service;
pub mod user_service;

pub use catalog_service::CatalogService;
pub use customer_service::CustomerService;
pub use enrichment::EnrichmentClient;
pub use parking_service::ParkingService;
pub use report_service::{CategorySales, DateRange, ReportService, SalesSummary};
pub use user_service::UserService;
