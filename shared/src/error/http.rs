//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound
            | Self::TenantNotFound
            | Self::SavedOrderNotFound
            | Self::CartItemNotFound
            | Self::ProductNotFound
            | Self::CategoryNotFound
            | Self::PromotionNotFound
            | Self::CustomerNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::TenantHasData
            | Self::InsufficientStock
            | Self::ProductOutOfStock
            | Self::CategoryInUse
            | Self::PromotionCodeExists
            | Self::UsernameExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::CannotModifySuperAdmin
            | Self::CannotDeleteSelf
            | Self::TenantNotSelected
            | Self::UnboundActor
            | Self::TenantInactive => StatusCode::FORBIDDEN,

            // 402 Payment Required
            Self::PaymentInsufficientAmount => StatusCode::PAYMENT_REQUIRED,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
