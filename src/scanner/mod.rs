//! Expiration Scanner
//!
//! Finds products that are exactly 45 or 15 days from expiring and sends one
//! notice for each of them.
//!
//! A product is notified on exactly two calendar days of its life. A day on
//! which no scan runs is not caught up later, and scanning twice on the same
//! day notifies twice.


use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::error::{NotifyError, ScanError};
use crate::notify::Notifier;
use crate::store::ProductStore;

// == Public Constants ==
/// Length of the look-ahead window, in days
pub const SCAN_WINDOW_DAYS: u64 = 45;

/// Day counts that trigger a notice
pub const NOTIFY_THRESHOLDS: [i64; 2] = [45, 15];

/// Whole calendar days from `today` until `expiration` (negative once past).
pub fn days_remaining(today: NaiveDate, expiration: NaiveDate) -> i64 {
    expiration.signed_duration_since(today).num_days()
}

/// True if a product `days` away from expiring gets a notice.
pub fn is_threshold(days: i64) -> bool {
    NOTIFY_THRESHOLDS.contains(&days)
}

/// Outcome of one scan run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Products found inside the window
    pub scanned: usize,
    /// Notices delivered
    pub notified: usize,
    /// Notices that failed or timed out
    pub failed: usize,
}

// == Expiration Scanner ==
/// Reads the store and notifies on threshold matches.
///
/// Only one scan runs at a time; a second caller gets
/// [`ScanError::AlreadyRunning`] instead of waiting.
pub struct ExpirationScanner {
    store: Arc<dyn ProductStore>,
    notifier: Arc<dyn Notifier>,
    send_timeout: Duration,
    running: Mutex<()>,
}

impl ExpirationScanner {
    pub fn new(
        store: Arc<dyn ProductStore>,
        notifier: Arc<dyn Notifier>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            store,
            notifier,
            send_timeout,
            running: Mutex::new(()),
        }
    }

    /// Scans the window `[today, today + 45 days]` and sends due notices.
    ///
    /// Notices go out one at a time, each bounded by the send timeout. A
    /// failed send is logged and counted; the remaining products are still
    /// processed. A store failure aborts the run before any send.
    pub async fn scan(&self, today: NaiveDate) -> Result<ScanReport, ScanError> {
        let Ok(_running) = self.running.try_lock() else {
            warn!("Expiration scan for {} skipped: previous scan still running", today);
            return Err(ScanError::AlreadyRunning);
        };

        let window_end = today
            .checked_add_days(Days::new(SCAN_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);

        let candidates = match self.store.find_in_range(today, window_end).await {
            Ok(products) => products,
            Err(err) => {
                error!("Expiration scan for {} aborted: {}", today, err);
                return Err(err.into());
            }
        };

        let mut report = ScanReport {
            scanned: candidates.len(),
            ..ScanReport::default()
        };

        for product in &candidates {
            let days = days_remaining(today, product.expiration_date);
            if !is_threshold(days) {
                continue;
            }

            debug!(barcode = %product.barcode, days, "Sending expiry notice");
            let sent = match timeout(self.send_timeout, self.notifier.notify(product, days)).await {
                Ok(result) => result,
                Err(_) => Err(NotifyError::Timeout(self.send_timeout)),
            };
            match sent {
                Ok(()) => report.notified += 1,
                Err(err) => {
                    report.failed += 1;
                    warn!(barcode = %product.barcode, days, "Expiry notice failed: {}", err);
                }
            }
        }

        info!(
            "Expiration scan for {}: {} in window, {} notified, {} failed",
            today, report.scanned, report.notified, report.failed
        );
        Ok(report)
    }
}
