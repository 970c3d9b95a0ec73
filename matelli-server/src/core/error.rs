use thiserror::Error;

use crate::store::StorageError;

/// Startup and serve failures
///
/// Request-level failures are [`shared::error::AppError`]; this type only
/// covers what can stop the process.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Storage initialization failed: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
