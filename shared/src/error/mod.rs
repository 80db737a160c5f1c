//! Unified error system for the POS workspace
//!
//! This module provides a comprehensive error handling system with:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorResponse`]: JSON body of a failed request
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Tenant errors
//! - 4xxx: Cart / order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product errors
//! - 7xxx: Promotion errors
//! - 8xxx: Customer / user errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorResponse};
//!
//! let err = AppError::new(ErrorCode::CartEmpty);
//!
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "Product name is required");
//!
//! let err = AppError::validation("Quantity must be positive")
//!     .with_detail("field", "quantity");
//!
//! let body = ErrorResponse::from(&err);
//! assert_eq!(body.code, 2);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorResponse};
