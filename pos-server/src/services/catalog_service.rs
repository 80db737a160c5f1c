//! Catalog Service - 商品与分类管理 (按商户隔离)

use std::sync::Arc;

use shared::models::{DEFAULT_CATEGORY, Product, ProductCreate, ProductUpdate};
use shared::util::prefixed_id;

use crate::db::repository::{CategoryRepository, ProductRepository};
use crate::tenancy::TenantScope;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_PRICE, MAX_SHORT_TEXT_LEN, MAX_STOCK, MAX_URL_LEN,
    validate_optional_text, validate_range, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
}

fn product_not_found(id: &str) -> AppError {
    AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", id)
}

fn validate_price(price: i64) -> AppResult<()> {
    if !(0..=MAX_PRICE).contains(&price) {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice)
            .with_detail("price", price)
            .with_detail("max", MAX_PRICE));
    }
    Ok(())
}

fn normalize_category(category: &str) -> String {
    match category.trim() {
        "" => DEFAULT_CATEGORY.to_string(),
        name => name.to_string(),
    }
}

impl CatalogService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// 商品列表, `query` 按名称模糊匹配 (不区分大小写)
    pub async fn list_products(
        &self,
        tenant: &TenantScope,
        query: Option<&str>,
    ) -> AppResult<Vec<Product>> {
        let products = self.products.find_all(tenant.tenant_id()).await?;
        let needle = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
        if needle.is_empty() {
            return Ok(products);
        }
        Ok(products
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect())
    }

    pub async fn get_product(&self, tenant: &TenantScope, id: &str) -> AppResult<Product> {
        self.products
            .find_by_id(tenant.tenant_id(), id)
            .await?
            .ok_or_else(|| product_not_found(id))
    }

    /// 新建商品: 生成新 ID, `vendor_id` 强制为当前商户
    pub async fn add_product(
        &self,
        tenant: &TenantScope,
        payload: ProductCreate,
    ) -> AppResult<Product> {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_price(payload.price)?;
        validate_range(payload.stock, "stock", 0, MAX_STOCK)?;
        validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&payload.color, "color", MAX_SHORT_TEXT_LEN)?;

        if let Some(claimed) = payload.vendor_id.as_deref()
            && claimed != tenant.tenant_id()
        {
            tracing::debug!(
                tenant_id = %tenant.tenant_id(),
                claimed_vendor = %claimed,
                "Ignoring vendor_id in product payload"
            );
        }

        let product = Product {
            id: prefixed_id("PRD"),
            vendor_id: tenant.tenant_id().to_string(),
            name: payload.name.trim().to_string(),
            category: normalize_category(&payload.category),
            price: payload.price,
            stock: payload.stock,
            image: payload.image.unwrap_or_default(),
            description: payload.description,
            color: payload.color,
        };

        let product = self.products.create(product).await?;
        tracing::info!(tenant_id = %tenant.tenant_id(), product_id = %product.id, "Product created");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        tenant: &TenantScope,
        id: &str,
        payload: ProductUpdate,
    ) -> AppResult<Product> {
        let mut product = self.get_product(tenant, id).await?;

        if let Some(name) = payload.name {
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            product.name = name.trim().to_string();
        }
        if let Some(category) = payload.category {
            product.category = normalize_category(&category);
        }
        if let Some(price) = payload.price {
            validate_price(price)?;
            product.price = price;
        }
        if let Some(stock) = payload.stock {
            validate_range(stock, "stock", 0, MAX_STOCK)?;
        }
        validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
        if let Some(image) = payload.image {
            product.image = image;
        }
        if payload.description.is_some() {
            product.description = payload.description;
        }
        if payload.color.is_some() {
            product.color = payload.color;
        }

        // 仅当请求显式设置库存时才写入库存
        let product = self.products.update(product).await?;
        match payload.stock {
            Some(stock) => Ok(self
                .products
                .set_stock(tenant.tenant_id(), id, stock)
                .await?),
            None => Ok(product),
        }
    }

    pub async fn remove_product(&self, tenant: &TenantScope, id: &str) -> AppResult<()> {
        if !self.products.delete(tenant.tenant_id(), id).await? {
            return Err(product_not_found(id));
        }
        tracing::info!(tenant_id = %tenant.tenant_id(), product_id = %id, "Product removed");
        Ok(())
    }

    /// 分类列表; 未配置分类的商户返回 `["Umum"]`
    pub async fn list_categories(&self, tenant: &TenantScope) -> AppResult<Vec<String>> {
        let categories = self.categories.find_all(tenant.tenant_id()).await?;
        if categories.is_empty() {
            return Ok(vec![DEFAULT_CATEGORY.to_string()]);
        }
        Ok(categories)
    }

    /// 新增分类 (幂等)
    pub async fn add_category(&self, tenant: &TenantScope, name: &str) -> AppResult<Vec<String>> {
        let name = name.trim();
        validate_required_text(name, "category", MAX_SHORT_TEXT_LEN)?;
        if self.categories.add(tenant.tenant_id(), name).await? {
            tracing::info!(tenant_id = %tenant.tenant_id(), category = %name, "Category added");
        }
        self.list_categories(tenant).await
    }

    /// 删除分类; 仍被商品使用时返回 `CategoryInUse`
    pub async fn remove_category(
        &self,
        tenant: &TenantScope,
        name: &str,
    ) -> AppResult<Vec<String>> {
        self.categories.remove(tenant.tenant_id(), name.trim()).await?;
        tracing::info!(tenant_id = %tenant.tenant_id(), category = %name, "Category removed");
        self.list_categories(tenant).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::MemoryStore;

    fn service() -> CatalogService {
        let store = Arc::new(MemoryStore::new());
        CatalogService::new(store.clone(), store)
    }

    fn draft(name: &str, category: &str) -> ProductCreate {
        ProductCreate {
            name: name.into(),
            category: category.into(),
            price: 10_000,
            stock: 5,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_default_category_set() {
        let catalog = service();
        let v1 = TenantScope::new("v1");
        assert_eq!(catalog.list_categories(&v1).await.unwrap(), vec!["Umum"]);

        // Products can use the implicit default category
        catalog.add_product(&v1, draft("Air Mineral", "")).await.unwrap();
    }

    #[tokio::test]
    async fn test_add_category_idempotent() {
        let catalog = service();
        let v1 = TenantScope::new("v1");
        catalog.add_category(&v1, "Snack").await.unwrap();
        let categories = catalog.add_category(&v1, " Snack ").await.unwrap();
        assert_eq!(categories, vec!["Umum", "Snack"]);
    }

    #[tokio::test]
    async fn test_vendor_id_forced_to_tenant() {
        let catalog = service();
        let v1 = TenantScope::new("v1");
        let mut payload = draft("Kopi", "Umum");
        payload.vendor_id = Some("v2".into());

        let product = catalog.add_product(&v1, payload).await.unwrap();
        assert_eq!(product.vendor_id, "v1");
        assert!(product.id.starts_with("PRD-"));

        let other = TenantScope::new("v2");
        assert!(catalog.list_products(&other, None).await.unwrap().is_empty());
        assert_eq!(
            catalog.get_product(&other, &product.id).await.unwrap_err().code,
            ErrorCode::ProductNotFound
        );
    }

    #[tokio::test]
    async fn test_remove_category_in_use() {
        let catalog = service();
        let v1 = TenantScope::new("v1");
        catalog.add_category(&v1, "Kopi").await.unwrap();
        let product = catalog.add_product(&v1, draft("Latte", "Kopi")).await.unwrap();

        let err = catalog.remove_category(&v1, "Kopi").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CategoryInUse);

        catalog.remove_product(&v1, &product.id).await.unwrap();
        let categories = catalog.remove_category(&v1, "Kopi").await.unwrap();
        assert_eq!(categories, vec!["Umum"]);
    }

    #[tokio::test]
    async fn test_unknown_category_and_bad_price() {
        let catalog = service();
        let v1 = TenantScope::new("v1");
        assert_eq!(
            catalog
                .add_product(&v1, draft("Donat", "Roti"))
                .await
                .unwrap_err()
                .code,
            ErrorCode::CategoryNotFound
        );

        let mut payload = draft("Donat", "Umum");
        payload.price = -1;
        assert_eq!(
            catalog.add_product(&v1, payload).await.unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );

        let mut payload = draft("Donat", "Umum");
        payload.price = MAX_PRICE + 1;
        assert_eq!(
            catalog.add_product(&v1, payload).await.unwrap_err().code,
            ErrorCode::ProductInvalidPrice
        );

        let mut payload = draft("Donat", "Umum");
        payload.stock = MAX_STOCK + 1;
        assert_eq!(
            catalog.add_product(&v1, payload).await.unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }

    #[tokio::test]
    async fn test_update_writes_stock_only_when_set() {
        let catalog = service();
        let v1 = TenantScope::new("v1");
        let product = catalog.add_product(&v1, draft("Kopi", "Umum")).await.unwrap();

        let renamed = catalog
            .update_product(
                &v1,
                &product.id,
                ProductUpdate {
                    name: Some("Kopi Tubruk".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Kopi Tubruk");
        assert_eq!(renamed.stock, 5);

        let restocked = catalog
            .update_product(
                &v1,
                &product.id,
                ProductUpdate {
                    price: Some(12_000),
                    stock: Some(30),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!((restocked.price, restocked.stock), (12_000, 30));

        let err = catalog
            .update_product(
                &v1,
                &product.id,
                ProductUpdate {
                    price: Some(MAX_PRICE + 1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductInvalidPrice);
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let catalog = service();
        let v1 = TenantScope::new("v1");
        catalog.add_product(&v1, draft("Kopi Susu", "Umum")).await.unwrap();
        catalog.add_product(&v1, draft("Teh Manis", "Umum")).await.unwrap();

        let found = catalog.list_products(&v1, Some("kopi")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Kopi Susu");
    }
}
