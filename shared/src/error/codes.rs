//! Unified error codes for the POS workspace
//!
//! This module defines all error codes used by the server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Tenant errors
//! - 4xxx: Cart / order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product / catalog errors
//! - 7xxx: Promotion errors
//! - 8xxx: Customer / user errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Super admin accounts cannot be managed from a tenant context
    CannotModifySuperAdmin = 2004,

    // ==================== 3xxx: Tenant ====================
    /// Operation needs an active tenant but none was entered
    TenantNotSelected = 3001,
    /// Tenant not found
    TenantNotFound = 3002,
    /// Actor is bound to a tenant that cannot be resolved
    UnboundActor = 3003,
    /// Tenant has been deactivated
    TenantInactive = 3004,
    /// Tenant still owns records and the removal policy is restrict
    TenantHasData = 3005,

    // ==================== 4xxx: Cart / Order ====================
    /// Saved order not found (or already resumed)
    SavedOrderNotFound = 4001,
    /// Cart is empty
    CartEmpty = 4007,
    /// Parked order needs a customer name or table label
    MissingIdentifier = 4101,
    /// Checkout step is not valid in the current state
    CheckoutInvalidState = 4102,
    /// Quantity must be at least one
    InvalidQuantity = 4103,
    /// Cart line not found
    CartItemNotFound = 4104,

    // ==================== 5xxx: Payment ====================
    /// Cash received is less than the total
    PaymentInsufficientAmount = 5002,
    /// Invalid payment method
    PaymentInvalidMethod = 5003,
    /// Manual discount outside [0, subtotal]
    InvalidDiscount = 5004,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product price is invalid
    ProductInvalidPrice = 6002,
    /// Product has no stock left
    ProductOutOfStock = 6003,
    /// Requested quantity exceeds available stock
    InsufficientStock = 6004,
    /// Category not found in the tenant's category set
    CategoryNotFound = 6101,
    /// Category is still assigned to products
    CategoryInUse = 6102,

    // ==================== 7xxx: Promotion ====================
    /// Promotion not found
    PromotionNotFound = 7001,
    /// Promotion code already used in this tenant
    PromotionCodeExists = 7002,
    /// Promotion is not active
    PromotionInactive = 7003,
    /// Cart subtotal is below the promotion's minimum spend
    PromotionBelowMinSpend = 7004,
    /// Cart has no item the promotion applies to
    PromotionNotApplicable = 7005,
    /// Promotion value is out of range
    PromotionInvalidValue = 7006,

    // ==================== 8xxx: Customer / User ====================
    /// Customer not found
    CustomerNotFound = 8001,
    /// User not found
    UserNotFound = 8101,
    /// Username already taken
    UsernameExists = 8102,
    /// Users cannot delete their own account
    CannotDeleteSelf = 8103,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Storage error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Token expired",
            ErrorCode::TokenInvalid => "Invalid token",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::CannotModifySuperAdmin => "Cannot modify super admin",

            // Tenant
            ErrorCode::TenantNotSelected => "No tenant selected",
            ErrorCode::TenantNotFound => "Tenant not found",
            ErrorCode::UnboundActor => "User is not linked to an active tenant",
            ErrorCode::TenantInactive => "Tenant is inactive",
            ErrorCode::TenantHasData => "Tenant still owns data",

            // Cart / Order
            ErrorCode::SavedOrderNotFound => "Saved order not found",
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::MissingIdentifier => "Customer name or table label is required",
            ErrorCode::CheckoutInvalidState => "Invalid checkout state",
            ErrorCode::InvalidQuantity => "Invalid quantity",
            ErrorCode::CartItemNotFound => "Cart item not found",

            // Payment
            ErrorCode::PaymentInsufficientAmount => "Insufficient cash received",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::InvalidDiscount => "Invalid discount",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Invalid product price",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::InsufficientStock => "Insufficient stock",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryInUse => "Category is used by products",

            // Promotion
            ErrorCode::PromotionNotFound => "Promotion code is invalid or expired",
            ErrorCode::PromotionCodeExists => "Promotion code already exists",
            ErrorCode::PromotionInactive => "Promotion is not active",
            ErrorCode::PromotionBelowMinSpend => "Cart is below the promotion minimum spend",
            ErrorCode::PromotionNotApplicable => "Promotion does not apply to items in the cart",
            ErrorCode::PromotionInvalidValue => "Invalid promotion value",

            // Customer / User
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::CannotDeleteSelf => "Cannot delete your own account",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2004 => Ok(ErrorCode::CannotModifySuperAdmin),

            // Tenant
            3001 => Ok(ErrorCode::TenantNotSelected),
            3002 => Ok(ErrorCode::TenantNotFound),
            3003 => Ok(ErrorCode::UnboundActor),
            3004 => Ok(ErrorCode::TenantInactive),
            3005 => Ok(ErrorCode::TenantHasData),

            // Cart / Order
            4001 => Ok(ErrorCode::SavedOrderNotFound),
            4007 => Ok(ErrorCode::CartEmpty),
            4101 => Ok(ErrorCode::MissingIdentifier),
            4102 => Ok(ErrorCode::CheckoutInvalidState),
            4103 => Ok(ErrorCode::InvalidQuantity),
            4104 => Ok(ErrorCode::CartItemNotFound),

            // Payment
            5002 => Ok(ErrorCode::PaymentInsufficientAmount),
            5003 => Ok(ErrorCode::PaymentInvalidMethod),
            5004 => Ok(ErrorCode::InvalidDiscount),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductOutOfStock),
            6004 => Ok(ErrorCode::InsufficientStock),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryInUse),

            // Promotion
            7001 => Ok(ErrorCode::PromotionNotFound),
            7002 => Ok(ErrorCode::PromotionCodeExists),
            7003 => Ok(ErrorCode::PromotionInactive),
            7004 => Ok(ErrorCode::PromotionBelowMinSpend),
            7005 => Ok(ErrorCode::PromotionNotApplicable),
            7006 => Ok(ErrorCode::PromotionInvalidValue),

            // Customer / User
            8001 => Ok(ErrorCode::CustomerNotFound),
            8101 => Ok(ErrorCode::UserNotFound),
            8102 => Ok(ErrorCode::UsernameExists),
            8103 => Ok(ErrorCode::CannotDeleteSelf),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValueOutOfRange.code(), 8);
        assert_eq!(ErrorCode::UnboundActor.code(), 3003);
        assert_eq!(ErrorCode::CartEmpty.code(), 4007);
        assert_eq!(ErrorCode::PaymentInsufficientAmount.code(), 5002);
        assert_eq!(ErrorCode::CategoryInUse.code(), 6102);
        assert_eq!(ErrorCode::PromotionBelowMinSpend.code(), 7004);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(6004), Ok(ErrorCode::InsufficientStock));
        assert_eq!(ErrorCode::try_from(4001), Ok(ErrorCode::SavedOrderNotFound));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(0), Err(InvalidErrorCode(0)));
        assert_eq!(ErrorCode::try_from(4002), Err(InvalidErrorCode(4002)));
        assert_eq!(ErrorCode::try_from(65535), Err(InvalidErrorCode(65535)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::ProductOutOfStock).unwrap();
        assert_eq!(json, "6003");
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("4242");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::TenantNotSelected), "3001");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::CartEmpty.message(), "Cart is empty");
        assert_eq!(
            ErrorCode::PromotionNotApplicable.message(),
            "Promotion does not apply to items in the cart"
        );
    }
}
