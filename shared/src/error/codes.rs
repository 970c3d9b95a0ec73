//! Unified error codes for the Matelli storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors (admin gate)
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 7xxx: Tracker errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so the storefront frontend can switch on
/// the numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Admin passphrase missing
    NotAuthenticated = 1001,
    /// Admin passphrase wrong
    InvalidCredentials = 1002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Cart or kit has nothing to order
    OrderEmpty = 4002,
    /// Kit checkout with fewer than 35 slots filled
    KitIncomplete = 4003,
    /// No free order code could be drawn
    OrderIdExhausted = 4004,
    /// Unknown order status
    InvalidOrderStatus = 4005,

    // ==================== 6xxx: Catalog ====================
    /// Meal not found
    MealNotFound = 6001,
    /// Meal price is negative or not finite
    MealInvalidPrice = 6002,
    /// Meal placed in a slot of another category
    MealCategoryMismatch = 6003,
    /// Initial catalog sync failed
    CatalogSeedFailed = 6101,

    // ==================== 7xxx: Tracker ====================
    /// QR tracker not found
    TrackerNotFound = 7001,
    /// Redirect target is not an http(s) URL
    InvalidOutlink = 7002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timed out
    TimeoutError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Admin passphrase required",
            ErrorCode::InvalidCredentials => "Invalid admin passphrase",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::KitIncomplete => "Weekly kit is not complete",
            ErrorCode::OrderIdExhausted => "Could not allocate an order code",
            ErrorCode::InvalidOrderStatus => "Invalid order status",

            // Catalog
            ErrorCode::MealNotFound => "Meal not found",
            ErrorCode::MealInvalidPrice => "Meal price is invalid",
            ErrorCode::MealCategoryMismatch => "Meal does not belong to this category",
            ErrorCode::CatalogSeedFailed => "Initial catalog sync failed",

            // Tracker
            ErrorCode::TrackerNotFound => "QR tracker not found",
            ErrorCode::InvalidOutlink => "Redirect target is invalid",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
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
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::KitIncomplete),
            4004 => Ok(ErrorCode::OrderIdExhausted),
            4005 => Ok(ErrorCode::InvalidOrderStatus),

            // Catalog
            6001 => Ok(ErrorCode::MealNotFound),
            6002 => Ok(ErrorCode::MealInvalidPrice),
            6003 => Ok(ErrorCode::MealCategoryMismatch),
            6101 => Ok(ErrorCode::CatalogSeedFailed),

            // Tracker
            7001 => Ok(ErrorCode::TrackerNotFound),
            7002 => Ok(ErrorCode::InvalidOutlink),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
