//! Checkout totals
//!
//! All amounts are `i64` in the smallest currency unit. Intermediate
//! percentages are computed with `rust_decimal` and rounded once per charge to
//! whole units, half away from zero.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// `amount × percent / 100`, rounded half away from zero
pub fn percent_of(amount: i64, percent: i64) -> i64 {
    let value = Decimal::from(amount) * Decimal::from(percent) / Decimal::ONE_HUNDRED;
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Breakdown of one checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: i64,
    pub discount: i64,
    pub service_charge: i64,
    pub tax_base: i64,
    pub tax: i64,
    pub total: i64,
}

/// Service charge and tax rates of a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingEngine {
    pub service_charge_percent: u32,
    pub tax_percent: u32,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self {
            service_charge_percent: 5,
            tax_percent: 10,
        }
    }
}

impl PricingEngine {
    pub fn new(service_charge_percent: u32, tax_percent: u32) -> Self {
        Self {
            service_charge_percent,
            tax_percent,
        }
    }

    /// Fixed order: discount, then service charge on the discounted base, then
    /// tax on base plus service charge.
    ///
    /// `discount` is clamped into `[0, subtotal]`; callers validate it first.
    pub fn compute_totals(&self, subtotal: i64, discount: i64) -> Totals {
        let subtotal = subtotal.max(0);
        let discount = discount.clamp(0, subtotal);

        let base = subtotal - discount;
        let service_charge = percent_of(base, i64::from(self.service_charge_percent));
        let tax_base = base.saturating_add(service_charge);
        let tax = percent_of(tax_base, i64::from(self.tax_percent));

        Totals {
            subtotal,
            discount,
            service_charge,
            tax_base,
            tax,
            total: tax_base.saturating_add(tax),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_without_discount() {
        let totals = PricingEngine::default().compute_totals(56_000, 0);
        assert_eq!(
            totals,
            Totals {
                subtotal: 56_000,
                discount: 0,
                service_charge: 2_800,
                tax_base: 58_800,
                tax: 5_880,
                total: 64_680,
            }
        );
    }

    #[test]
    fn test_totals_with_discount() {
        let totals = PricingEngine::default().compute_totals(56_000, 5_600);
        assert_eq!(totals.service_charge, 2_520);
        assert_eq!(totals.tax_base, 52_920);
        assert_eq!(totals.tax, 5_292);
        assert_eq!(totals.total, 58_212);
    }

    #[test]
    fn test_totals_reconcile() {
        let engine = PricingEngine::default();
        for (subtotal, discount) in [(0, 0), (1, 0), (9, 0), (15_555, 1_234), (99_999, 99_999)] {
            let first = engine.compute_totals(subtotal, discount);
            assert_eq!(first, engine.compute_totals(subtotal, discount));
            assert_eq!(
                first.total,
                first.subtotal - first.discount + first.service_charge + first.tax
            );
        }
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 5% of 10 = 0.5 -> 1; 10% of 11 = 1.1 -> 1
        let totals = PricingEngine::default().compute_totals(10, 0);
        assert_eq!(totals.service_charge, 1);
        assert_eq!(totals.tax, 1);
        assert_eq!(percent_of(25, 10), 3);
    }

    #[test]
    fn test_discount_clamped() {
        let totals = PricingEngine::default().compute_totals(1_000, 5_000);
        assert_eq!(totals.discount, 1_000);
        assert_eq!(totals.total, 0);
    }
}
