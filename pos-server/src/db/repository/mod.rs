//! Repository Module
//!
//! One trait per entity. Services receive `Arc<dyn ...Repository>` and never
//! assume a storage technology. Repositories take raw tenant ids; tenant
//! resolution and scoping happen one layer up.
//!
//! Writes that must check a cross-entity rule (category in use, stock
//! available, tenant still owning data) do the check and the mutation in one
//! critical section of the store and report a rule violation as
//! [`RepoError::Rejected`].

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Customer, Product, Promotion, RemovalPolicy, SavedOrder, Tenant, Transaction, User,
};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A domain rule rejected the write inside the storage critical section
    #[error("{0}")]
    Rejected(AppError),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Rejected(err) => err,
        }
    }
}

/// Everything a checkout commits in one step
#[derive(Debug, Clone)]
pub struct CheckoutCommit {
    pub transaction: Transaction,
    /// Customer whose visit counter is bumped
    pub customer_id: Option<String>,
}

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<Tenant>>;
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Tenant>>;
    /// Insert a tenant together with its initial category set
    async fn create(&self, tenant: Tenant, categories: &[&str]) -> RepoResult<Tenant>;
    async fn update(&self, tenant: Tenant) -> RepoResult<Tenant>;
    /// Remove a tenant; returns how many owned records were purged
    async fn remove(&self, id: &str, policy: RemovalPolicy) -> RepoResult<usize>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Category names in insertion order (empty when the tenant has none)
    async fn find_all(&self, tenant_id: &str) -> RepoResult<Vec<String>>;
    /// Returns false when the name already existed
    async fn add(&self, tenant_id: &str, name: &str) -> RepoResult<bool>;
    /// Fails with `CategoryInUse` while a product of the tenant uses it
    async fn remove(&self, tenant_id: &str, name: &str) -> RepoResult<()>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_all(&self, tenant_id: &str) -> RepoResult<Vec<Product>>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> RepoResult<Option<Product>>;
    /// Fails with `CategoryNotFound` unless the category belongs to the tenant
    async fn create(&self, product: Product) -> RepoResult<Product>;
    /// Same category rule as `create`. The stored stock is kept; use
    /// `set_stock` to change it
    async fn update(&self, product: Product) -> RepoResult<Product>;
    /// Inventory set (the only stock write outside checkout)
    async fn set_stock(&self, tenant_id: &str, id: &str, stock: i64) -> RepoResult<Product>;
    async fn delete(&self, tenant_id: &str, id: &str) -> RepoResult<bool>;
}

#[async_trait]
pub trait PromotionRepository: Send + Sync {
    async fn find_all(&self, tenant_id: &str) -> RepoResult<Vec<Promotion>>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> RepoResult<Option<Promotion>>;
    /// Case-insensitive code lookup within one tenant
    async fn find_by_code(&self, tenant_id: &str, code: &str) -> RepoResult<Option<Promotion>>;
    /// Fails with `PromotionCodeExists` on a case-insensitive code clash
    async fn create(&self, promotion: Promotion) -> RepoResult<Promotion>;
    /// Same code rule as `create`
    async fn update(&self, promotion: Promotion) -> RepoResult<Promotion>;
    async fn delete(&self, tenant_id: &str, id: &str) -> RepoResult<bool>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_all(&self, tenant_id: &str) -> RepoResult<Vec<Customer>>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> RepoResult<Option<Customer>>;
    async fn create(&self, customer: Customer) -> RepoResult<Customer>;
    async fn update(&self, customer: Customer) -> RepoResult<Customer>;
    async fn delete(&self, tenant_id: &str, id: &str) -> RepoResult<bool>;
}

#[async_trait]
pub trait SavedOrderRepository: Send + Sync {
    async fn find_all(&self, tenant_id: &str) -> RepoResult<Vec<SavedOrder>>;
    async fn create(&self, order: SavedOrder) -> RepoResult<SavedOrder>;
    /// Load-and-delete; `None` when the order does not exist (or was taken)
    async fn take(&self, tenant_id: &str, id: &str) -> RepoResult<Option<SavedOrder>>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Newest first
    async fn find_all(&self, tenant_id: &str) -> RepoResult<Vec<Transaction>>;
    /// Re-check stock, decrement it, store the transaction and bump the
    /// customer's visits, all or nothing
    async fn commit_checkout(&self, commit: CheckoutCommit) -> RepoResult<Transaction>;
    /// Delete every transaction of a tenant; returns the count
    async fn delete_all(&self, tenant_id: &str) -> RepoResult<usize>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<User>>;
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    /// Fails with `UsernameExists` when the username is taken
    async fn create(&self, user: User) -> RepoResult<User>;
    async fn update(&self, user: User) -> RepoResult<User>;
    async fn delete(&self, username: &str) -> RepoResult<bool>;
}
