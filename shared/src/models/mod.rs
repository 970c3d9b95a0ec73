//! Data models
//!
//! Shared between matelli-server and the storefront frontend (via API).
//! Wire names follow the storefront: Portuguese enum values, camelCase fields.

pub mod meal;
pub mod order;
pub mod selection;
pub mod tracker;

// Re-exports
pub use meal::*;
pub use order::*;
pub use selection::*;
pub use tracker::*;
