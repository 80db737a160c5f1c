//! In-process store
//!
//! Every table lives behind one `parking_lot::RwLock`, so each write below is a
//! single critical section: rule checks and the mutation they guard cannot
//! interleave with another writer.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Customer, DEFAULT_CATEGORY, Product, Promotion, RemovalPolicy, SavedOrder, Tenant,
    Transaction, User,
};

use super::{
    CategoryRepository, CheckoutCommit, CustomerRepository, ProductRepository,
    PromotionRepository, RepoError, RepoResult, SavedOrderRepository, TenantRepository,
    TransactionRepository, UserRepository,
};

#[derive(Debug, Default)]
struct Tables {
    tenants: Vec<Tenant>,
    categories: HashMap<String, Vec<String>>,
    products: Vec<Product>,
    promotions: Vec<Promotion>,
    customers: Vec<Customer>,
    saved_orders: Vec<SavedOrder>,
    /// Oldest first
    transactions: Vec<Transaction>,
    users: Vec<User>,
}

impl Tables {
    fn has_category(&self, tenant_id: &str, name: &str) -> bool {
        match self.categories.get(tenant_id) {
            Some(list) if !list.is_empty() => list.iter().any(|c| c == name),
            _ => name == DEFAULT_CATEGORY,
        }
    }

    fn owned_records(&self, tenant_id: &str) -> usize {
        self.products.iter().filter(|p| p.vendor_id == tenant_id).count()
            + self.promotions.iter().filter(|p| p.vendor_id == tenant_id).count()
            + self.customers.iter().filter(|c| c.vendor_id == tenant_id).count()
            + self.saved_orders.iter().filter(|o| o.vendor_id == tenant_id).count()
            + self.transactions.iter().filter(|t| t.vendor_id == tenant_id).count()
            + self
                .users
                .iter()
                .filter(|u| u.vendor_id.as_deref() == Some(tenant_id))
                .count()
    }

    fn purge(&mut self, tenant_id: &str) -> usize {
        let before = self.owned_records(tenant_id);
        self.products.retain(|p| p.vendor_id != tenant_id);
        self.promotions.retain(|p| p.vendor_id != tenant_id);
        self.customers.retain(|c| c.vendor_id != tenant_id);
        self.saved_orders.retain(|o| o.vendor_id != tenant_id);
        self.transactions.retain(|t| t.vendor_id != tenant_id);
        self.users.retain(|u| u.vendor_id.as_deref() != Some(tenant_id));
        self.categories.remove(tenant_id);
        before
    }

    fn promotion_code_taken(&self, promotion: &Promotion) -> bool {
        self.promotions.iter().any(|p| {
            p.vendor_id == promotion.vendor_id
                && p.id != promotion.id
                && p.code.eq_ignore_ascii_case(&promotion.code)
        })
    }
}

fn unknown_category(name: &str) -> RepoError {
    RepoError::Rejected(
        AppError::with_message(
            ErrorCode::CategoryNotFound,
            format!("Category '{}' does not exist", name),
        )
        .with_detail("category", name),
    )
}

/// Process-local implementation of every repository trait
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantRepository for MemoryStore {
    async fn find_all(&self) -> RepoResult<Vec<Tenant>> {
        Ok(self.tables.read().tenants.clone())
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Tenant>> {
        Ok(self.tables.read().tenants.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, tenant: Tenant, categories: &[&str]) -> RepoResult<Tenant> {
        let mut tables = self.tables.write();
        if tables.tenants.iter().any(|t| t.id == tenant.id) {
            return Err(RepoError::Duplicate(format!("tenant {}", tenant.id)));
        }
        tables.categories.insert(
            tenant.id.clone(),
            categories.iter().map(|c| c.to_string()).collect(),
        );
        tables.tenants.push(tenant.clone());
        Ok(tenant)
    }

    async fn update(&self, tenant: Tenant) -> RepoResult<Tenant> {
        let mut tables = self.tables.write();
        let slot = tables
            .tenants
            .iter_mut()
            .find(|t| t.id == tenant.id)
            .ok_or_else(|| RepoError::NotFound(format!("tenant {}", tenant.id)))?;
        *slot = tenant.clone();
        Ok(tenant)
    }

    async fn remove(&self, id: &str, policy: RemovalPolicy) -> RepoResult<usize> {
        let mut tables = self.tables.write();
        let index = tables
            .tenants
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| RepoError::NotFound(format!("tenant {}", id)))?;

        let purged = match policy {
            RemovalPolicy::Restrict => {
                let owned = tables.owned_records(id);
                if owned > 0 {
                    return Err(RepoError::Rejected(
                        AppError::new(ErrorCode::TenantHasData)
                            .with_detail("tenant_id", id)
                            .with_detail("records", owned),
                    ));
                }
                tables.categories.remove(id);
                0
            }
            RemovalPolicy::Cascade => tables.purge(id),
        };

        tables.tenants.remove(index);
        Ok(purged)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn find_all(&self, tenant_id: &str) -> RepoResult<Vec<String>> {
        Ok(self
            .tables
            .read()
            .categories
            .get(tenant_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add(&self, tenant_id: &str, name: &str) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        let list = tables.categories.entry(tenant_id.to_string()).or_default();
        // The implicit default category becomes explicit once the set is edited
        if list.is_empty() {
            list.push(DEFAULT_CATEGORY.to_string());
        }
        if list.iter().any(|c| c == name) {
            return Ok(false);
        }
        list.push(name.to_string());
        Ok(true)
    }

    async fn remove(&self, tenant_id: &str, name: &str) -> RepoResult<()> {
        let mut tables = self.tables.write();

        let in_use = tables
            .products
            .iter()
            .filter(|p| p.vendor_id == tenant_id && p.category == name)
            .count();
        if in_use > 0 {
            return Err(RepoError::Rejected(
                AppError::new(ErrorCode::CategoryInUse)
                    .with_detail("category", name)
                    .with_detail("products", in_use),
            ));
        }

        let list = tables.categories.entry(tenant_id.to_string()).or_default();
        match list.iter().position(|c| c == name) {
            Some(index) => {
                list.remove(index);
                Ok(())
            }
            None => Err(unknown_category(name)),
        }
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn find_all(&self, tenant_id: &str) -> RepoResult<Vec<Product>> {
        Ok(self
            .tables
            .read()
            .products
            .iter()
            .filter(|p| p.vendor_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> RepoResult<Option<Product>> {
        Ok(self
            .tables
            .read()
            .products
            .iter()
            .find(|p| p.vendor_id == tenant_id && p.id == id)
            .cloned())
    }

    async fn create(&self, product: Product) -> RepoResult<Product> {
        let mut tables = self.tables.write();
        if !tables.has_category(&product.vendor_id, &product.category) {
            return Err(unknown_category(&product.category));
        }
        if tables.products.iter().any(|p| p.id == product.id) {
            return Err(RepoError::Duplicate(format!("product {}", product.id)));
        }
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, product: Product) -> RepoResult<Product> {
        let mut tables = self.tables.write();
        if !tables.has_category(&product.vendor_id, &product.category) {
            return Err(unknown_category(&product.category));
        }
        let slot = tables
            .products
            .iter_mut()
            .find(|p| p.vendor_id == product.vendor_id && p.id == product.id)
            .ok_or_else(|| RepoError::NotFound(format!("product {}", product.id)))?;
        // Stock belongs to checkout and inventory set
        let stock = slot.stock;
        *slot = Product { stock, ..product };
        Ok(slot.clone())
    }

    async fn set_stock(&self, tenant_id: &str, id: &str, stock: i64) -> RepoResult<Product> {
        let mut tables = self.tables.write();
        let slot = tables
            .products
            .iter_mut()
            .find(|p| p.vendor_id == tenant_id && p.id == id)
            .ok_or_else(|| RepoError::NotFound(format!("product {}", id)))?;
        slot.stock = stock;
        Ok(slot.clone())
    }

    async fn delete(&self, tenant_id: &str, id: &str) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.products.len();
        tables
            .products
            .retain(|p| !(p.vendor_id == tenant_id && p.id == id));
        Ok(tables.products.len() != before)
    }
}

#[async_trait]
impl PromotionRepository for MemoryStore {
    async fn find_all(&self, tenant_id: &str) -> RepoResult<Vec<Promotion>> {
        Ok(self
            .tables
            .read()
            .promotions
            .iter()
            .filter(|p| p.vendor_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> RepoResult<Option<Promotion>> {
        Ok(self
            .tables
            .read()
            .promotions
            .iter()
            .find(|p| p.vendor_id == tenant_id && p.id == id)
            .cloned())
    }

    async fn find_by_code(&self, tenant_id: &str, code: &str) -> RepoResult<Option<Promotion>> {
        Ok(self
            .tables
            .read()
            .promotions
            .iter()
            .find(|p| p.vendor_id == tenant_id && p.matches_code(code))
            .cloned())
    }

    async fn create(&self, promotion: Promotion) -> RepoResult<Promotion> {
        let mut tables = self.tables.write();
        if tables.promotion_code_taken(&promotion) {
            return Err(RepoError::Rejected(
                AppError::new(ErrorCode::PromotionCodeExists).with_detail("code", promotion.code),
            ));
        }
        tables.promotions.push(promotion.clone());
        Ok(promotion)
    }

    async fn update(&self, promotion: Promotion) -> RepoResult<Promotion> {
        let mut tables = self.tables.write();
        if tables.promotion_code_taken(&promotion) {
            return Err(RepoError::Rejected(
                AppError::new(ErrorCode::PromotionCodeExists).with_detail("code", promotion.code),
            ));
        }
        let slot = tables
            .promotions
            .iter_mut()
            .find(|p| p.vendor_id == promotion.vendor_id && p.id == promotion.id)
            .ok_or_else(|| RepoError::NotFound(format!("promotion {}", promotion.id)))?;
        *slot = promotion.clone();
        Ok(promotion)
    }

    async fn delete(&self, tenant_id: &str, id: &str) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.promotions.len();
        tables
            .promotions
            .retain(|p| !(p.vendor_id == tenant_id && p.id == id));
        Ok(tables.promotions.len() != before)
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn find_all(&self, tenant_id: &str) -> RepoResult<Vec<Customer>> {
        Ok(self
            .tables
            .read()
            .customers
            .iter()
            .filter(|c| c.vendor_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> RepoResult<Option<Customer>> {
        Ok(self
            .tables
            .read()
            .customers
            .iter()
            .find(|c| c.vendor_id == tenant_id && c.id == id)
            .cloned())
    }

    async fn create(&self, customer: Customer) -> RepoResult<Customer> {
        let mut tables = self.tables.write();
        if tables.customers.iter().any(|c| c.id == customer.id) {
            return Err(RepoError::Duplicate(format!("customer {}", customer.id)));
        }
        tables.customers.push(customer.clone());
        Ok(customer)
    }

    async fn update(&self, customer: Customer) -> RepoResult<Customer> {
        let mut tables = self.tables.write();
        let slot = tables
            .customers
            .iter_mut()
            .find(|c| c.vendor_id == customer.vendor_id && c.id == customer.id)
            .ok_or_else(|| RepoError::NotFound(format!("customer {}", customer.id)))?;
        // Visit counters belong to checkout
        let (total_visits, last_visit) = (slot.total_visits, slot.last_visit);
        *slot = Customer {
            total_visits,
            last_visit,
            ..customer
        };
        Ok(slot.clone())
    }

    async fn delete(&self, tenant_id: &str, id: &str) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.customers.len();
        tables
            .customers
            .retain(|c| !(c.vendor_id == tenant_id && c.id == id));
        Ok(tables.customers.len() != before)
    }
}

#[async_trait]
impl SavedOrderRepository for MemoryStore {
    async fn find_all(&self, tenant_id: &str) -> RepoResult<Vec<SavedOrder>> {
        Ok(self
            .tables
            .read()
            .saved_orders
            .iter()
            .filter(|o| o.vendor_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn create(&self, order: SavedOrder) -> RepoResult<SavedOrder> {
        self.tables.write().saved_orders.push(order.clone());
        Ok(order)
    }

    async fn take(&self, tenant_id: &str, id: &str) -> RepoResult<Option<SavedOrder>> {
        let mut tables = self.tables.write();
        let index = tables
            .saved_orders
            .iter()
            .position(|o| o.vendor_id == tenant_id && o.id == id);
        Ok(index.map(|i| tables.saved_orders.remove(i)))
    }
}

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn find_all(&self, tenant_id: &str) -> RepoResult<Vec<Transaction>> {
        Ok(self
            .tables
            .read()
            .transactions
            .iter()
            .rev()
            .filter(|t| t.vendor_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn commit_checkout(&self, commit: CheckoutCommit) -> RepoResult<Transaction> {
        let CheckoutCommit {
            transaction,
            customer_id,
        } = commit;
        let tenant_id = transaction.vendor_id.as_str();

        // Same product on several lines is checked against its combined quantity
        let mut wanted: Vec<(&str, i64)> = Vec::new();
        for item in &transaction.items {
            match wanted.iter_mut().find(|(id, _)| *id == item.product_id) {
                Some((_, qty)) => *qty += item.quantity,
                None => wanted.push((item.product_id.as_str(), item.quantity)),
            }
        }

        let mut tables = self.tables.write();

        for (product_id, qty) in &wanted {
            let product = tables
                .products
                .iter()
                .find(|p| p.vendor_id == tenant_id && p.id == *product_id)
                .ok_or_else(|| {
                    RepoError::Rejected(
                        AppError::new(ErrorCode::ProductNotFound)
                            .with_detail("product_id", *product_id),
                    )
                })?;
            if product.stock < *qty {
                return Err(RepoError::Rejected(AppError::insufficient_stock(
                    product_id,
                    *qty,
                    product.stock,
                )));
            }
        }

        for (product_id, qty) in &wanted {
            if let Some(product) = tables
                .products
                .iter_mut()
                .find(|p| p.vendor_id == tenant_id && p.id == *product_id)
            {
                product.stock = (product.stock - qty).max(0);
            }
        }

        if let Some(customer_id) = customer_id.as_deref()
            && let Some(customer) = tables
                .customers
                .iter_mut()
                .find(|c| c.vendor_id == tenant_id && c.id == customer_id)
        {
            customer.total_visits = customer.total_visits.saturating_add(1);
            customer.last_visit = Some(transaction.timestamp);
        }

        tables.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn delete_all(&self, tenant_id: &str) -> RepoResult<usize> {
        let mut tables = self.tables.write();
        let before = tables.transactions.len();
        tables.transactions.retain(|t| t.vendor_id != tenant_id);
        Ok(before - tables.transactions.len())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        Ok(self.tables.read().users.clone())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, user: User) -> RepoResult<User> {
        let mut tables = self.tables.write();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::Rejected(
                AppError::new(ErrorCode::UsernameExists).with_detail("username", user.username),
            ));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> RepoResult<User> {
        let mut tables = self.tables.write();
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.username == user.username)
            .ok_or_else(|| RepoError::NotFound(format!("user {}", user.username)))?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, username: &str) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.users.len();
        tables.users.retain(|u| u.username != username);
        Ok(tables.users.len() != before)
    }
}
