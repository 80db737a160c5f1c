//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity (CRM)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub vendor_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
    /// Incremented only by a committed checkout
    pub total_visits: u32,
    /// Unix millis of the last committed checkout
    pub last_visit: Option<i64>,
}

/// Create customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
}

/// Update customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}
