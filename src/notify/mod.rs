//! Notify Module
//!
//! Delivery of expiry notices for products nearing their expiration date.
//!
//! # Notifiers
//! - `SmtpNotifier`: e-mails the notice to a fixed recipient
//! - `LogNotifier`: writes the notice to the log when mail is not configured

mod log;
mod notice;
mod smtp;

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::models::Product;

pub use self::log::LogNotifier;
pub use notice::ExpiryNotice;
pub use smtp::SmtpNotifier;

/// Sends one expiry notice per call.
///
/// Failures are returned as values; the caller decides whether to log and
/// carry on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, product: &Product, days_remaining: i64) -> Result<(), NotifyError>;
}
