//! Matelli Congelados storefront server
//!
//! Weekly 35-meal kits and à la carte orders, handed off to WhatsApp, plus the
//! admin side: catalog, orders, a consolidated shopping list and QR visit
//! tracking.
//!
//! ```text
//! matelli-server/src/
//! ├── core/          # config, state, server, background tasks
//! ├── store/         # redb documents, change feed, subscriptions
//! ├── services/      # catalog, checkout, shopping list, trackers, insight
//! ├── api/           # HTTP routes and handlers
//! ├── auth/          # admin passphrase gate
//! ├── aggregation.rs # kit and cart totals
//! └── utils/         # logging, error re-exports
//! ```

pub mod aggregation;
pub mod api;
pub mod auth;
pub mod core;
pub mod services;
pub mod store;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use store::Store;
pub use utils::{AppError, AppResult, init_logger, init_logger_with_file};

/// Start logging as configured
pub fn setup_environment(config: &Config) {
    init_logger_with_file(&config.log_level, config.log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
  __  __       _       _ _ _
 |  \/  | __ _| |_ ___| | (_)
 | |\/| |/ _` | __/ _ \ | | |
 | |  | | (_| | ||  __/ | | |
 |_|  |_|\__,_|\__\___|_|_|_|
          Congelados
    "#
    );
}
