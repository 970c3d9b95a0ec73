//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::OrderNotFound | Self::MealNotFound | Self::TrackerNotFound => {
                StatusCode::NOT_FOUND
            }

            // 401 Unauthorized
            Self::NotAuthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,

            // 422 Unprocessable: well-formed but not orderable
            Self::KitIncomplete | Self::MealCategoryMismatch => StatusCode::UNPROCESSABLE_ENTITY,

            // 503 Service Unavailable
            Self::TimeoutError | Self::OrderIdExhausted => StatusCode::SERVICE_UNAVAILABLE,

            // 502 Bad Gateway: the store refused the initial sync
            Self::CatalogSeedFailed => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::ValueOutOfRange
            | Self::OrderEmpty
            | Self::InvalidOrderStatus
            | Self::MealInvalidPrice
            | Self::InvalidOutlink => StatusCode::BAD_REQUEST,
        }
    }
}
