//! 演示数据
//!
//! 两个商户 (`v1` 咖啡店, `v2` 汉堡店) 及其分类、商品、客户、促销、用户和两笔历史交易。
//! 仅在 `SEED_DEMO_DATA` 开启时加载。

use chrono::{Datelike, Duration, NaiveDate, Utc};
use shared::models::{
    CardType, CartItem, Customer, OrderType, Payment, Product, Promotion, PromotionType, Tenant,
    TenantStatus, Transaction, User, UserRole,
};
use shared::util::now_millis;

use super::repository::{
    CheckoutCommit, CustomerRepository, MemoryStore, ProductRepository, PromotionRepository,
    TenantRepository, TransactionRepository, UserRepository,
};
use crate::auth::hash_password;
use crate::utils::AppResult;

const DAY_MS: i64 = 86_400_000;

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn tenants() -> Vec<Tenant> {
    let today = Utc::now().date_naive();
    let epoch = NaiveDate::default();

    vec![
        Tenant {
            id: "v1".into(),
            name: "Kopi Senja Utama".into(),
            status: TenantStatus::Active,
            address: "Jl. Sudirman No. 10, Jakarta".into(),
            phone: "08123456789".into(),
            owner_name: "Bapak Budi".into(),
            joined_at: date(2023, 1, 1).unwrap_or(epoch),
            logo: Some("https://cdn-icons-png.flaticon.com/512/2935/2935413.png".into()),
            subscription_start: date(2023, 1, 1),
            subscription_end: date(today.year() + 1, 1, 1),
            commission_rate: Some(5),
        },
        Tenant {
            id: "v2".into(),
            name: "Burger Blenger Cabang 2".into(),
            status: TenantStatus::Active,
            address: "Jl. Kemang Raya No. 55, Jakarta".into(),
            phone: "08198765432".into(),
            owner_name: "Ibu Susi".into(),
            joined_at: date(2023, 6, 15).unwrap_or(epoch),
            logo: Some("https://cdn-icons-png.flaticon.com/512/3075/3075977.png".into()),
            subscription_start: date(2023, 6, 15),
            // Shows up as "expiring soon"
            subscription_end: Some(today + Duration::days(5)),
            commission_rate: Some(8),
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    vendor: &str,
    name: &str,
    category: &str,
    price: i64,
    stock: i64,
    description: &str,
    color: &str,
) -> Product {
    Product {
        id: id.into(),
        vendor_id: vendor.into(),
        name: name.into(),
        category: category.into(),
        price,
        stock,
        image: format!("https://picsum.photos/200/200?random={}", id),
        description: Some(description.into()),
        color: Some(color.into()),
    }
}

fn products() -> Vec<Product> {
    vec![
        product(
            "1",
            "v1",
            "Kopi Susu Gula Aren",
            "Kopi",
            28_000,
            50,
            "Espresso house blend dipadukan dengan susu segar dan gula aren asli yang legit.",
            "bg-amber-100",
        ),
        product(
            "2",
            "v1",
            "Americano Dingin",
            "Kopi",
            22_000,
            80,
            "Espresso double shot dengan air mineral dingin dan es batu kristal.",
            "bg-stone-200",
        ),
        product(
            "3",
            "v1",
            "Matcha Latte Premium",
            "Non-Kopi",
            32_000,
            30,
            "Bubuk matcha premium Jepang diaduk sempurna dengan susu steam yang creamy.",
            "bg-green-100",
        ),
        product(
            "101",
            "v2",
            "Cheeseburger Deluxe",
            "Makanan Berat",
            45_000,
            20,
            "Daging sapi australia dengan keju cheddar leleh.",
            "bg-yellow-100",
        ),
        product(
            "102",
            "v2",
            "Kentang Goreng BBQ",
            "Cemilan",
            25_000,
            50,
            "Kentang goreng renyah dengan bumbu BBQ spesial.",
            "bg-orange-50",
        ),
        product(
            "103",
            "v2",
            "Lemon Tea Jumbo",
            "Minuman",
            15_000,
            100,
            "Teh lemon segar ukuran jumbo.",
            "bg-blue-100",
        ),
    ]
}

fn customers(now: i64) -> Vec<Customer> {
    vec![
        Customer {
            id: "CUST-001".into(),
            vendor_id: "v1".into(),
            name: "Budi Santoso".into(),
            phone: "081234567890".into(),
            email: Some("budi@example.com".into()),
            notes: Some("Suka kopi tidak terlalu manis".into()),
            total_visits: 12,
            last_visit: Some(now - DAY_MS),
        },
        Customer {
            id: "CUST-002".into(),
            vendor_id: "v2".into(),
            name: "Siti Aminah".into(),
            phone: "089876543210".into(),
            email: Some("siti@example.com".into()),
            notes: Some("Member VIP Burger".into()),
            total_visits: 5,
            last_visit: Some(now - 2 * DAY_MS),
        },
    ]
}

fn promotions() -> Vec<Promotion> {
    vec![
        Promotion {
            id: "PROMO-001".into(),
            vendor_id: "v1".into(),
            code: "HEMAT10".into(),
            name: "Diskon 10%".into(),
            promotion_type: PromotionType::Percentage,
            value: 10,
            min_spend: 50_000,
            is_active: true,
            eligible_product_ids: vec![],
        },
        Promotion {
            id: "PROMO-002".into(),
            vendor_id: "v2".into(),
            code: "BURGER5RB".into(),
            name: "Potongan 5 Ribu".into(),
            promotion_type: PromotionType::Fixed,
            value: 5_000,
            min_spend: 30_000,
            is_active: true,
            eligible_product_ids: vec![],
        },
    ]
}

/// (username, tenant, role, name, password)
const USERS: [(&str, Option<&str>, UserRole, &str, &str); 4] = [
    ("superadmin", None, UserRole::SuperAdmin, "System Owner", "admin"),
    ("owner1", Some("v1"), UserRole::VendorAdmin, "Owner Kopi", "123"),
    ("kasir1", Some("v1"), UserRole::Cashier, "Kasir Kopi", "123"),
    ("owner2", Some("v2"), UserRole::VendorAdmin, "Owner Burger", "123"),
];

fn history(products: &[Product], now: i64) -> Vec<Transaction> {
    let line = |id: &str, qty: i64| {
        products
            .iter()
            .find(|p| p.id == id)
            .map(|p| CartItem::from_product(p, qty))
    };

    let mut history = Vec::new();
    if let (Some(kopi), Some(matcha)) = (line("1", 2), line("3", 1)) {
        history.push(Transaction {
            id: "TXN-1001".into(),
            vendor_id: "v1".into(),
            timestamp: now - DAY_MS,
            items: vec![kopi, matcha],
            subtotal: 88_000,
            discount: 0,
            service_charge: 4_400,
            tax: 9_240,
            total: 101_640,
            payment: Payment::Card {
                card_type: CardType::Debit,
                bank_name: "BCA".into(),
            },
            customer_name: "Budi Santoso".into(),
            customer_id: Some("CUST-001".into()),
            order_type: OrderType::DineIn,
            promotion_code: None,
        });
    }
    if let Some(burger) = line("101", 5) {
        history.push(Transaction {
            id: "TXN-1002".into(),
            vendor_id: "v2".into(),
            timestamp: now - 2 * DAY_MS,
            items: vec![burger],
            subtotal: 225_000,
            discount: 0,
            service_charge: 11_250,
            tax: 23_625,
            total: 259_875,
            payment: Payment::Qr,
            customer_name: "Pelanggan Umum".into(),
            customer_id: None,
            order_type: OrderType::TakeAway,
            promotion_code: None,
        });
    }
    // Oldest first so listings come back newest first
    history.reverse();
    history
}

/// 加载演示数据
pub async fn seed_demo_data(store: &MemoryStore) -> AppResult<()> {
    let now = now_millis();

    for tenant in tenants() {
        let categories: &[&str] = match tenant.id.as_str() {
            "v1" => &["Kopi", "Non-Kopi", "Cemilan"],
            _ => &["Makanan Berat", "Cemilan", "Minuman"],
        };
        TenantRepository::create(store, tenant, categories).await?;
    }

    let products = products();
    for product in products.iter().cloned() {
        ProductRepository::create(store, product).await?;
    }
    for customer in customers(now) {
        CustomerRepository::create(store, customer).await?;
    }
    for promotion in promotions() {
        PromotionRepository::create(store, promotion).await?;
    }
    for (username, vendor_id, role, name, password) in USERS {
        UserRepository::create(
            store,
            User {
                username: username.into(),
                vendor_id: vendor_id.map(Into::into),
                role,
                name: name.into(),
                password_hash: hash_password(password)?,
            },
        )
        .await?;
    }
    for transaction in history(&products, now) {
        store
            .commit_checkout(CheckoutCommit {
                transaction,
                customer_id: None,
            })
            .await?;
    }

    tracing::info!(tenants = 2, users = USERS.len(), "Demo data loaded");
    Ok(())
}
