//! Service layer
//!
//! - [`CatalogService`] - meal CRUD, live catalog and the initial seed
//! - [`OrderService`] - checkout and order administration
//! - [`ShoppingService`] - consolidated shopping list over active orders
//! - [`TrackerService`] - QR visit counters
//! - [`InsightService`] - nutrition feedback on a weekly kit
//! - [`ChatLink`] - WhatsApp hand-off links

pub mod catalog;
pub mod chat;
pub mod default_menu;
pub mod insight;
pub mod order_compiler;
pub mod orders;
pub mod shopping;
pub mod tracker;

pub use catalog::{CatalogService, SeedReport};
pub use chat::ChatLink;
pub use insight::{GeminiProvider, InsightProvider, InsightService};
pub use orders::{CheckoutPreview, CheckoutRequest, CheckoutResponse, OrderService};
pub use shopping::{ShoppingService, ShoppingView};
pub use tracker::{TrackerService, VisitorInfo};
