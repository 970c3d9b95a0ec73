//! Admin gate middleware
//!
//! Admin routes require the shared passphrase in the `x-admin-passphrase`
//! header. This keeps the storefront's admin screens apart from customers; it
//! is not an access-control system.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::core::ServerState;
use crate::utils::AppError;

pub const ADMIN_HEADER: &str = "x-admin-passphrase";

/// Constant-time comparison on equal-length inputs
pub fn passphrase_matches(expected: &str, given: &str) -> bool {
    let (a, b) = (expected.as_bytes(), given.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Reject requests without the admin passphrase
///
/// | Case | Status |
/// |------|--------|
/// | Header missing | 401 NotAuthenticated |
/// | Header wrong | 401 InvalidCredentials |
pub async fn require_admin(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let given = req
        .headers()
        .get(ADMIN_HEADER)
        .and_then(|h| h.to_str().ok());

    match given {
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "Admin header missing");
            Err(AppError::not_authenticated())
        }
        Some(pass) if !passphrase_matches(&state.config.admin_passphrase, pass) => {
            tracing::warn!(target: "security", uri = %req.uri(), "Admin passphrase rejected");
            Err(AppError::invalid_credentials())
        }
        Some(_) => Ok(next.run(req).await),
    }
}
