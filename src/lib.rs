//! Validade - product expiration tracker
//!
//! Stores product batches behind a small REST API and e-mails a fixed
//! recipient when a batch is 45 or 15 days from expiring.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod scanner;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use scanner::{ExpirationScanner, ScanReport};
pub use tasks::spawn_expiry_task;
