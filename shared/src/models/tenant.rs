//! Tenant Model

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Days before `subscription_end` at which a tenant is reported as expiring
pub const EXPIRING_SOON_DAYS: i64 = 7;

/// Highest commission a tenant can be charged (percent)
pub const MAX_COMMISSION_RATE: u32 = 100;

/// Tenant lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    Active,
    Inactive,
}

/// Tenant entity (商户)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub status: TenantStatus,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub owner_name: String,
    pub joined_at: NaiveDate,
    pub logo: Option<String>,
    pub subscription_start: Option<NaiveDate>,
    pub subscription_end: Option<NaiveDate>,
    /// Commission in percentage (e.g., 5 = 5%)
    pub commission_rate: Option<u32>,
}

impl Tenant {
    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active
    }

    /// Subscription state relative to `today`
    pub fn subscription_status(&self, today: NaiveDate) -> SubscriptionStatus {
        let Some(end) = self.subscription_end else {
            return SubscriptionStatus::Unknown;
        };
        let days_left = (end - today).num_days();
        if days_left < 0 {
            SubscriptionStatus::Expired
        } else if days_left < EXPIRING_SOON_DAYS {
            SubscriptionStatus::ExpiringSoon { days_left }
        } else {
            SubscriptionStatus::Active
        }
    }
}

/// Derived subscription state shown in the tenant list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Unknown,
    Expired,
    ExpiringSoon { days_left: i64 },
    Active,
}

/// Tenant with its derived subscription state (list view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSummary {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub subscription: SubscriptionStatus,
}

/// Create tenant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantCreate {
    /// Optional explicit id; generated when absent
    pub id: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub owner_name: Option<String>,
    pub logo: Option<String>,
    pub subscription_start: Option<NaiveDate>,
    pub subscription_end: Option<NaiveDate>,
    pub commission_rate: Option<u32>,
}

/// Update tenant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantUpdate {
    pub name: Option<String>,
    pub status: Option<TenantStatus>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub owner_name: Option<String>,
    pub logo: Option<String>,
    /// `Some(Some(date))` = set, `Some(None)` (JSON `null`) = clear, absent = no change
    #[serde(default, deserialize_with = "present_or_null")]
    pub subscription_start: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub subscription_end: Option<Option<NaiveDate>>,
    pub commission_rate: Option<u32>,
}

/// A present field becomes `Some`, even when its value is `null`
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// What happens to a tenant's records when the tenant is removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Refuse removal while the tenant still owns records
    #[default]
    Restrict,
    /// Delete every record owned by the tenant together with it
    Cascade,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant_ending(end: Option<NaiveDate>) -> Tenant {
        Tenant {
            id: "v1".to_string(),
            name: "Kopi".to_string(),
            status: TenantStatus::Active,
            address: String::new(),
            phone: String::new(),
            owner_name: String::new(),
            joined_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            logo: None,
            subscription_start: None,
            subscription_end: end,
            commission_rate: None,
        }
    }

    #[test]
    fn test_subscription_status() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        assert_eq!(
            tenant_ending(None).subscription_status(today),
            SubscriptionStatus::Unknown
        );
        assert_eq!(
            tenant_ending(NaiveDate::from_ymd_opt(2025, 6, 9)).subscription_status(today),
            SubscriptionStatus::Expired
        );
        assert_eq!(
            tenant_ending(NaiveDate::from_ymd_opt(2025, 6, 13)).subscription_status(today),
            SubscriptionStatus::ExpiringSoon { days_left: 3 }
        );
        assert_eq!(
            tenant_ending(NaiveDate::from_ymd_opt(2025, 6, 10)).subscription_status(today),
            SubscriptionStatus::ExpiringSoon { days_left: 0 }
        );
        assert_eq!(
            tenant_ending(NaiveDate::from_ymd_opt(2025, 7, 10)).subscription_status(today),
            SubscriptionStatus::Active
        );
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let update: TenantUpdate =
            serde_json::from_str(r#"{"subscription_end": null}"#).unwrap();
        assert_eq!(update.subscription_end, Some(None));
        assert_eq!(update.subscription_start, None);

        let update: TenantUpdate =
            serde_json::from_str(r#"{"subscription_end": "2026-01-31"}"#).unwrap();
        assert_eq!(
            update.subscription_end,
            Some(NaiveDate::from_ymd_opt(2026, 1, 31))
        );
    }

    #[test]
    fn test_removal_policy_default_is_restrict() {
        assert_eq!(RemovalPolicy::default(), RemovalPolicy::Restrict);
        let policy: RemovalPolicy = serde_json::from_str("\"cascade\"").unwrap();
        assert_eq!(policy, RemovalPolicy::Cascade);
    }
}
