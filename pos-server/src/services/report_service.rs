//! Report Service - 交易记录与销售报表
//!
//! 日期范围按 UTC 日历日计算, 两端都包含。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use shared::models::{DEFAULT_CATEGORY, Transaction};

use super::enrichment::{EnrichmentClient, INSIGHT_WINDOW};
use crate::db::repository::{CategoryRepository, TransactionRepository};
use crate::tenancy::TenantScope;
use crate::utils::{AppError, AppResult, ErrorCode};

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`, 两端均可省略
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, timestamp_ms: i64) -> bool {
        let Some(date) = DateTime::from_timestamp_millis(timestamp_ms).map(|dt| dt.date_naive())
        else {
            return false;
        };
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    fn validate(&self) -> AppResult<()> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "`from` must not be after `to`",
            )
            .with_detail("from", from.to_string())
            .with_detail("to", to.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySales {
    pub category: String,
    pub sales: i64,
}

/// 销售汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    pub total_sales: i64,
    pub transaction_count: usize,
    pub average_order_value: i64,
    /// 销量 (件数) 最高的分类
    pub top_category: Option<String>,
    pub sales_by_category: Vec<CategorySales>,
}

fn average(total: i64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }
    (Decimal::from(total) / Decimal::from(count as u64))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}

/// 按商户的 `categories` 汇总 `transactions`
pub fn summarize(transactions: &[Transaction], categories: &[String]) -> SalesSummary {
    let total_sales = transactions
        .iter()
        .fold(0i64, |sum, t| sum.saturating_add(t.total));

    let mut units: HashMap<&str, i64> = HashMap::new();
    let mut sales: HashMap<&str, i64> = HashMap::new();
    for item in transactions.iter().flat_map(|t| &t.items) {
        let unit_count = units.entry(&item.category).or_default();
        *unit_count = unit_count.saturating_add(item.quantity);
        let category_sales = sales.entry(&item.category).or_default();
        *category_sales = category_sales.saturating_add(item.line_total().unwrap_or(i64::MAX));
    }

    // 件数相同时取名称排序靠前者
    let top_category = units
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(name, _)| name.to_string());

    let sales_by_category = categories
        .iter()
        .map(|category| CategorySales {
            category: category.clone(),
            sales: sales.get(category.as_str()).copied().unwrap_or_default(),
        })
        .collect();

    SalesSummary {
        total_sales,
        transaction_count: transactions.len(),
        average_order_value: average(total_sales, transactions.len()),
        top_category,
        sales_by_category,
    }
}

#[derive(Clone)]
pub struct ReportService {
    transactions: Arc<dyn TransactionRepository>,
    categories: Arc<dyn CategoryRepository>,
    enrichment: EnrichmentClient,
}

impl ReportService {
    pub fn new(
        transactions: Arc<dyn TransactionRepository>,
        categories: Arc<dyn CategoryRepository>,
        enrichment: EnrichmentClient,
    ) -> Self {
        Self {
            transactions,
            categories,
            enrichment,
        }
    }

    /// 交易记录 (新的在前)
    pub async fn list_transactions(
        &self,
        tenant: &TenantScope,
        range: DateRange,
    ) -> AppResult<Vec<Transaction>> {
        range.validate()?;
        let transactions = self.transactions.find_all(tenant.tenant_id()).await?;
        Ok(transactions
            .into_iter()
            .filter(|t| range.contains(t.timestamp))
            .collect())
    }

    pub async fn summary(&self, tenant: &TenantScope, range: DateRange) -> AppResult<SalesSummary> {
        let transactions = self.list_transactions(tenant, range).await?;
        let mut categories = self.categories.find_all(tenant.tenant_id()).await?;
        if categories.is_empty() {
            categories.push(DEFAULT_CATEGORY.to_string());
        }
        Ok(summarize(&transactions, &categories))
    }

    /// AI 销售分析 (最近 20 笔)
    pub async fn insight(&self, tenant: &TenantScope, range: DateRange) -> AppResult<String> {
        let mut transactions = self.list_transactions(tenant, range).await?;
        transactions.truncate(INSIGHT_WINDOW);
        Ok(self.enrichment.sales_insight(&transactions).await)
    }

    /// 清空本商户的全部交易记录, 返回删除条数
    pub async fn reset(&self, tenant: &TenantScope) -> AppResult<usize> {
        let removed = self.transactions.delete_all(tenant.tenant_id()).await?;
        tracing::warn!(tenant_id = %tenant.tenant_id(), removed, "Transaction history reset");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AiConfig;
    use crate::db::repository::{CheckoutCommit, MemoryStore, ProductRepository};
    use crate::services::enrichment::INSIGHT_NO_DATA;
    use shared::models::{CartItem, OrderType, Payment, Product, cart_subtotal};

    // 2024-03-10T12:00:00Z
    const MAR_10: i64 = 1_710_072_000_000;
    const DAY_MS: i64 = 86_400_000;

    fn item(id: &str, category: &str, price: i64, quantity: i64) -> CartItem {
        CartItem {
            product_id: id.into(),
            name: format!("Produk {}", id),
            category: category.into(),
            price,
            image: String::new(),
            quantity,
        }
    }

    fn transaction(id: &str, timestamp: i64, items: Vec<CartItem>, total: i64) -> Transaction {
        Transaction {
            id: id.into(),
            vendor_id: "v1".into(),
            timestamp,
            subtotal: cart_subtotal(&items).unwrap(),
            items,
            discount: 0,
            service_charge: 0,
            tax: 0,
            total,
            payment: Payment::Qr,
            customer_name: "Pelanggan Umum".into(),
            customer_id: None,
            order_type: OrderType::DineIn,
            promotion_code: None,
        }
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 3, 10),
            to: NaiveDate::from_ymd_opt(2024, 3, 10),
        };
        assert!(range.contains(MAR_10));
        assert!(range.contains(MAR_10 + 11 * 3_600_000));
        assert!(!range.contains(MAR_10 + DAY_MS));
        assert!(!range.contains(MAR_10 - DAY_MS));
        assert!(DateRange::default().contains(0));
    }

    #[test]
    fn test_summarize() {
        let transactions = vec![
            transaction(
                "T1",
                MAR_10,
                vec![item("1", "Kopi", 28_000, 1), item("3", "Cemilan", 22_000, 3)],
                100_001,
            ),
            transaction("T2", MAR_10, vec![item("2", "Kopi", 18_000, 1)], 20_000),
        ];
        let categories = vec!["Kopi".to_string(), "Non-Kopi".to_string(), "Cemilan".to_string()];

        let summary = summarize(&transactions, &categories);
        assert_eq!(summary.total_sales, 120_001);
        assert_eq!(summary.transaction_count, 2);
        // 60000.5 rounds away from zero
        assert_eq!(summary.average_order_value, 60_001);
        assert_eq!(summary.top_category.as_deref(), Some("Cemilan"));
        assert_eq!(
            summary.sales_by_category,
            vec![
                CategorySales { category: "Kopi".into(), sales: 46_000 },
                CategorySales { category: "Non-Kopi".into(), sales: 0 },
                CategorySales { category: "Cemilan".into(), sales: 66_000 },
            ]
        );
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[], &["Umum".to_string()]);
        assert_eq!(summary.average_order_value, 0);
        assert_eq!(summary.top_category, None);
        assert_eq!(summary.sales_by_category.len(), 1);
    }

    async fn service_with_sale() -> (ReportService, TenantScope) {
        let store = Arc::new(MemoryStore::new());
        ProductRepository::create(
            store.as_ref(),
            Product {
                id: "1".into(),
                vendor_id: "v1".into(),
                name: "Kopi".into(),
                category: "Umum".into(),
                price: 10_000,
                stock: 5,
                image: String::new(),
                description: None,
                color: None,
            },
        )
        .await
        .unwrap();
        store
            .commit_checkout(CheckoutCommit {
                transaction: transaction("T1", MAR_10, vec![item("1", "Umum", 10_000, 1)], 11_550),
                customer_id: None,
            })
            .await
            .unwrap();

        let service = ReportService::new(
            store.clone(),
            store,
            EnrichmentClient::new(AiConfig::default()),
        );
        (service, TenantScope::new("v1"))
    }

    #[tokio::test]
    async fn test_reset_only_touches_tenant() {
        let (service, v1) = service_with_sale().await;
        let v2 = TenantScope::new("v2");

        assert_eq!(service.reset(&v2).await.unwrap(), 0);
        assert_eq!(service.reset(&v1).await.unwrap(), 1);
        assert!(
            service
                .list_transactions(&v1, DateRange::default())
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            service.insight(&v1, DateRange::default()).await.unwrap(),
            INSIGHT_NO_DATA
        );
    }

    #[tokio::test]
    async fn test_reversed_range_rejected() {
        let (service, v1) = service_with_sale().await;
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 3, 11),
            to: NaiveDate::from_ymd_opt(2024, 3, 10),
        };
        let err = service.summary(&v1, range).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);

        let summary = service.summary(&v1, DateRange::default()).await.unwrap();
        assert_eq!(summary.total_sales, 11_550);
        assert_eq!(summary.top_category.as_deref(), Some("Umum"));
    }
}
