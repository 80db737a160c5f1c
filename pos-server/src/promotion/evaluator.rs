//! Promotion evaluation
//!
//! [`evaluate`] is pure: the same cart and promotion always give the same
//! result, and nothing is mutated. It only fails when the cart amounts
//! overflow.

use serde::Serialize;
use shared::models::{CartItem, Promotion, PromotionType, cart_subtotal};

use crate::pricing::percent_of;
use crate::utils::validation::amount_overflow;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Why a promotion does not apply to a cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    BelowMinSpend { min_spend: i64, subtotal: i64 },
    NoEligibleItems,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Evaluation {
    Qualified { discount: i64, eligible_subtotal: i64 },
    Rejected(Rejection),
}

impl Evaluation {
    pub fn discount(&self) -> i64 {
        match self {
            Evaluation::Qualified { discount, .. } => *discount,
            Evaluation::Rejected(_) => 0,
        }
    }
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::BelowMinSpend {
                min_spend,
                subtotal,
            } => AppError::new(ErrorCode::PromotionBelowMinSpend)
                .with_detail("min_spend", min_spend)
                .with_detail("subtotal", subtotal),
            Rejection::NoEligibleItems => AppError::new(ErrorCode::PromotionNotApplicable),
        }
    }
}

/// Evaluate a promotion against cart lines.
///
/// Minimum spend is checked against the whole cart. A product restriction
/// narrows the discounted amount to the matching lines.
pub fn evaluate(items: &[CartItem], promotion: &Promotion) -> AppResult<Evaluation> {
    let subtotal = cart_subtotal(items).ok_or_else(|| amount_overflow("subtotal"))?;
    if subtotal < promotion.min_spend {
        return Ok(Evaluation::Rejected(Rejection::BelowMinSpend {
            min_spend: promotion.min_spend,
            subtotal,
        }));
    }

    let eligible_subtotal = if promotion.eligible_product_ids.is_empty() {
        subtotal
    } else {
        let mut matched = items
            .iter()
            .filter(|item| promotion.eligible_product_ids.contains(&item.product_id))
            .peekable();
        if matched.peek().is_none() {
            return Ok(Evaluation::Rejected(Rejection::NoEligibleItems));
        }
        matched
            .try_fold(0i64, |sum, item| sum.checked_add(item.line_total()?))
            .ok_or_else(|| amount_overflow("subtotal"))?
    };

    let discount = if eligible_subtotal <= 0 {
        0
    } else {
        match promotion.promotion_type {
            PromotionType::Percentage => percent_of(eligible_subtotal, promotion.value),
            PromotionType::Fixed => promotion.value.min(eligible_subtotal),
        }
    };

    Ok(Evaluation::Qualified {
        discount,
        eligible_subtotal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: &str, price: i64, quantity: i64) -> CartItem {
        CartItem {
            product_id: product_id.into(),
            name: product_id.into(),
            category: "Umum".into(),
            price,
            image: String::new(),
            quantity,
        }
    }

    fn make_promotion(promotion_type: PromotionType, value: i64, min_spend: i64) -> Promotion {
        Promotion {
            id: "PROMO-1".into(),
            vendor_id: "v1".into(),
            code: "TEST".into(),
            name: "Test".into(),
            promotion_type,
            value,
            min_spend,
            is_active: true,
            eligible_product_ids: vec![],
        }
    }

    #[test]
    fn test_percentage_promotion() {
        let promo = make_promotion(PromotionType::Percentage, 10, 50_000);
        let result = evaluate(&[item("1", 28_000, 2)], &promo).unwrap();
        assert_eq!(
            result,
            Evaluation::Qualified {
                discount: 5_600,
                eligible_subtotal: 56_000
            }
        );
    }

    #[test]
    fn test_below_min_spend_rejected() {
        let promo = make_promotion(PromotionType::Fixed, 5_000, 30_000);
        let result = evaluate(&[item("102", 25_000, 1)], &promo).unwrap();
        assert_eq!(
            result,
            Evaluation::Rejected(Rejection::BelowMinSpend {
                min_spend: 30_000,
                subtotal: 25_000
            })
        );
        assert_eq!(result.discount(), 0);
    }

    #[test]
    fn test_fixed_discount_capped_at_eligible_subtotal() {
        let promo = make_promotion(PromotionType::Fixed, i64::MAX / 2, 0);
        let result = evaluate(&[item("1", 7_000, 3)], &promo).unwrap();
        assert_eq!(result.discount(), 21_000);

        let small = make_promotion(PromotionType::Fixed, 1, 0);
        assert_eq!(evaluate(&[item("1", 7_000, 3)], &small).unwrap().discount(), 1);
    }

    #[test]
    fn test_eligible_products_only() {
        let mut promo = make_promotion(PromotionType::Percentage, 50, 0);
        promo.eligible_product_ids = vec!["2".into()];

        let cart = [item("1", 10_000, 1), item("2", 4_000, 2)];
        assert_eq!(
            evaluate(&cart, &promo).unwrap(),
            Evaluation::Qualified {
                discount: 4_000,
                eligible_subtotal: 8_000
            }
        );

        assert_eq!(
            evaluate(&[item("1", 10_000, 1)], &promo).unwrap(),
            Evaluation::Rejected(Rejection::NoEligibleItems)
        );
    }

    #[test]
    fn test_min_spend_uses_whole_cart() {
        let mut promo = make_promotion(PromotionType::Fixed, 1_000, 15_000);
        promo.eligible_product_ids = vec!["2".into()];

        let cart = [item("1", 10_000, 1), item("2", 5_000, 1)];
        assert_eq!(evaluate(&cart, &promo).unwrap().discount(), 1_000);
    }

    #[test]
    fn test_overflowing_cart_is_an_error() {
        let promo = make_promotion(PromotionType::Percentage, 10, 0);
        let err = evaluate(&[item("1", i64::MAX, 2)], &promo).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_zero_priced_cart_gives_zero_discount() {
        let promo = make_promotion(PromotionType::Fixed, 5_000, 0);
        assert_eq!(
            evaluate(&[item("free", 0, 3)], &promo).unwrap(),
            Evaluation::Qualified {
                discount: 0,
                eligible_subtotal: 0
            }
        );
    }
}
