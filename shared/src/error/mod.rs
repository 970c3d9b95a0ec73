//! Unified error system for the Matelli storefront
//!
//! - [`ErrorCode`]: standardized numeric codes
//! - [`ErrorCategory`]: classification by code range
//! - [`AppError`]: error carrying code, message and details
//! - [`ApiResponse`]: response envelope shared by every endpoint
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 7xxx: Tracker errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::KitIncomplete).with_detail("filled", 20);
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(4003));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
