//! Admin passphrase gate

pub mod middleware;

pub use middleware::{ADMIN_HEADER, passphrase_matches, require_admin};
