//! Promotion management and code lookup

use std::sync::Arc;

use serde::Serialize;
use shared::models::{
    CartItem, Promotion, PromotionCreate, PromotionType, PromotionUpdate,
};
use shared::util::prefixed_id;

use super::{Evaluation, evaluate};
use crate::db::repository::PromotionRepository;
use crate::tenancy::TenantScope;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// A promotion that qualified for a cart
#[derive(Debug, Clone, Serialize)]
pub struct AppliedPromotion {
    pub promotion: Promotion,
    pub discount: i64,
    pub eligible_subtotal: i64,
}

#[derive(Clone)]
pub struct PromotionService {
    promotions: Arc<dyn PromotionRepository>,
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn validate_terms(promotion_type: PromotionType, value: i64, min_spend: i64) -> AppResult<()> {
    let value_ok = match promotion_type {
        PromotionType::Percentage => value > 0 && value <= 100,
        PromotionType::Fixed => value > 0,
    };
    if !value_ok {
        return Err(AppError::new(ErrorCode::PromotionInvalidValue).with_detail("value", value));
    }
    if min_spend < 0 {
        return Err(AppError::new(ErrorCode::PromotionInvalidValue)
            .with_detail("min_spend", min_spend));
    }
    Ok(())
}

impl PromotionService {
    pub fn new(promotions: Arc<dyn PromotionRepository>) -> Self {
        Self { promotions }
    }

    pub async fn list(&self, tenant: &TenantScope) -> AppResult<Vec<Promotion>> {
        Ok(self.promotions.find_all(tenant.tenant_id()).await?)
    }

    async fn get(&self, tenant: &TenantScope, id: &str) -> AppResult<Promotion> {
        self.promotions
            .find_by_id(tenant.tenant_id(), id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::PromotionNotFound).with_detail("id", id))
    }

    pub async fn create(&self, tenant: &TenantScope, payload: PromotionCreate) -> AppResult<Promotion> {
        let code = normalize_code(&payload.code);
        validate_required_text(&code, "code", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        let min_spend = payload.min_spend.unwrap_or(0);
        validate_terms(payload.promotion_type, payload.value, min_spend)?;

        let promotion = Promotion {
            id: prefixed_id("PROMO"),
            vendor_id: tenant.tenant_id().to_string(),
            code,
            name: payload.name.trim().to_string(),
            promotion_type: payload.promotion_type,
            value: payload.value,
            min_spend,
            is_active: payload.is_active.unwrap_or(true),
            eligible_product_ids: payload.eligible_product_ids.unwrap_or_default(),
        };

        let promotion = self.promotions.create(promotion).await?;
        tracing::info!(tenant_id = %tenant.tenant_id(), code = %promotion.code, "Promotion created");
        Ok(promotion)
    }

    pub async fn update(
        &self,
        tenant: &TenantScope,
        id: &str,
        payload: PromotionUpdate,
    ) -> AppResult<Promotion> {
        let mut promotion = self.get(tenant, id).await?;

        if let Some(code) = payload.code {
            let code = normalize_code(&code);
            validate_required_text(&code, "code", MAX_SHORT_TEXT_LEN)?;
            promotion.code = code;
        }
        if let Some(name) = payload.name {
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            promotion.name = name.trim().to_string();
        }
        if let Some(promotion_type) = payload.promotion_type {
            promotion.promotion_type = promotion_type;
        }
        if let Some(value) = payload.value {
            promotion.value = value;
        }
        if let Some(min_spend) = payload.min_spend {
            promotion.min_spend = min_spend;
        }
        if let Some(is_active) = payload.is_active {
            promotion.is_active = is_active;
        }
        if let Some(ids) = payload.eligible_product_ids {
            promotion.eligible_product_ids = ids;
        }
        validate_terms(promotion.promotion_type, promotion.value, promotion.min_spend)?;

        Ok(self.promotions.update(promotion).await?)
    }

    pub async fn delete(&self, tenant: &TenantScope, id: &str) -> AppResult<()> {
        if !self.promotions.delete(tenant.tenant_id(), id).await? {
            return Err(AppError::new(ErrorCode::PromotionNotFound).with_detail("id", id));
        }
        Ok(())
    }

    /// Flip `is_active`
    pub async fn toggle(&self, tenant: &TenantScope, id: &str) -> AppResult<Promotion> {
        let mut promotion = self.get(tenant, id).await?;
        promotion.is_active = !promotion.is_active;
        Ok(self.promotions.update(promotion).await?)
    }

    /// Look up an active promotion by code within the tenant and evaluate it
    /// against the cart lines
    pub async fn apply_code(
        &self,
        tenant: &TenantScope,
        code: &str,
        items: &[CartItem],
    ) -> AppResult<AppliedPromotion> {
        let code = code.trim();
        let promotion = self
            .promotions
            .find_by_code(tenant.tenant_id(), code)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::PromotionNotFound).with_detail("code", code))?;

        if !promotion.is_active {
            return Err(AppError::new(ErrorCode::PromotionInactive).with_detail("code", code));
        }

        match evaluate(items, &promotion)? {
            Evaluation::Qualified {
                discount,
                eligible_subtotal,
            } => Ok(AppliedPromotion {
                promotion,
                discount,
                eligible_subtotal,
            }),
            Evaluation::Rejected(rejection) => Err(rejection.into()),
        }
    }
}
