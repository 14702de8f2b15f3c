//! Log-only notifier

use async_trait::async_trait;
use tracing::info;

use super::{ExpiryNotice, Notifier};
use crate::error::NotifyError;
use crate::models::Product;

/// Writes notices to the log instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, product: &Product, days_remaining: i64) -> Result<(), NotifyError> {
        let notice = ExpiryNotice::new(product, days_remaining);
        info!(
            barcode = %product.barcode,
            days_remaining,
            "Mail not configured, expiry notice: {}",
            notice.text
        );
        Ok(())
    }
}
