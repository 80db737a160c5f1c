//! [`AppError`] and the JSON body it renders to

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by every service and handler
///
/// `details` carries the values a client needs to explain the failure
/// (requested vs available stock, the offending field).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Operation needs an entered tenant (super admin in global scope)
    pub fn tenant_not_selected() -> Self {
        Self::new(ErrorCode::TenantNotSelected)
    }

    /// A cart or checkout asked for more units than the product holds
    pub fn insufficient_stock(product_id: &str, requested: i64, available: i64) -> Self {
        Self::new(ErrorCode::InsufficientStock)
            .with_detail("product_id", product_id)
            .with_detail("requested", requested)
            .with_detail("available", available)
    }
}

/// JSON body of every failed request
///
/// Successful handlers return their payload directly; only errors are
/// wrapped so clients can branch on the numeric `code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::response::IntoResponse;

        let status = self.http_status();

        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, axum::Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_message() {
        let err = AppError::with_message(ErrorCode::ValidationFailed, "Invalid email format");
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Invalid email format");
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "email")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "email");
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_app_error_http_status() {
        assert_eq!(
            AppError::new(ErrorCode::NotFound).http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::new(ErrorCode::NotAuthenticated).http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::new(ErrorCode::PermissionDenied).http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_app_error_convenience_constructors() {
        let err = AppError::validation("Invalid input");
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Invalid input");

        assert_eq!(AppError::not_authenticated().code, ErrorCode::NotAuthenticated);
        assert_eq!(AppError::token_expired().http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::tenant_not_selected().http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::database("Connection failed").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::NotFound, "Saved order not found");
        assert_eq!(format!("{}", err), "Saved order not found");
    }

    #[test]
    fn test_insufficient_stock_details() {
        let err = AppError::insufficient_stock("P-1", 5, 2);
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
        let details = err.details.unwrap();
        assert_eq!(details.get("requested").unwrap(), 5);
        assert_eq!(details.get("available").unwrap(), 2);
    }

    #[test]
    fn test_error_response_body() {
        let err = AppError::insufficient_stock("P-1", 2, 1);
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(json["code"], 6004);
        assert_eq!(json["message"], "Insufficient stock");
        assert_eq!(json["details"]["product_id"], "P-1");

        let json = serde_json::to_value(ErrorResponse::from(&AppError::new(ErrorCode::CartEmpty)))
            .unwrap();
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_error_response_deserialize() {
        let json = r#"{"code":4007,"message":"Cart is empty"}"#;
        let body: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(ErrorCode::try_from(body.code), Ok(ErrorCode::CartEmpty));
        assert!(body.details.is_none());
    }
}
