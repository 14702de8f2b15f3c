//! Daily Expiration Scan Task
//!
//! Background task that runs the expiration scanner once a day at a fixed
//! local wall-clock time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::scanner::{ExpirationScanner, ScanReport};

/// How late a wake-up may be, in minutes, before the trigger counts as missed.
pub const MISSED_TRIGGER_GRACE_MINUTES: i64 = 60;

/// Returns the first instant strictly after `now` whose local time is `at`.
///
/// If `at` falls into a DST gap on some day, that day's trigger moves an
/// hour later. On an ambiguous (repeated) hour the earlier instant wins.
pub fn next_trigger<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let mut date = now.date_naive();

    // Two days always suffice; the third covers a gap on the second.
    for _ in 0..3 {
        if let Some(candidate) = resolve_local(&tz, date.and_time(at)) {
            if candidate > *now {
                return candidate;
            }
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    now.clone() + TimeDelta::days(1)
}

/// Next trigger after both `now` and the previous trigger `last`.
///
/// A wall clock set back while the task slept must not bring the same
/// trigger round again.
pub fn schedule_after<Tz: TimeZone>(
    now: &DateTime<Tz>,
    last: Option<&DateTime<Tz>>,
    at: NaiveTime,
) -> DateTime<Tz> {
    match last {
        Some(last) if last > now => next_trigger(last, at),
        _ => next_trigger(now, at),
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => Some(t),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest(),
    }
}

/// Runs the scan for a trigger scheduled at `scheduled`, observed at `now`.
///
/// Wake-ups later than [`MISSED_TRIGGER_GRACE_MINUTES`] are skipped: a missed day is
/// not replayed. Scan failures are already logged by the scanner.
pub async fn fire_trigger<Tz: TimeZone>(
    scanner: &ExpirationScanner,
    scheduled: &DateTime<Tz>,
    now: &DateTime<Tz>,
) -> Option<ScanReport> {
    let lateness = now.clone().signed_duration_since(scheduled.clone());
    if lateness > TimeDelta::minutes(MISSED_TRIGGER_GRACE_MINUTES) {
        warn!(
            "Expiration scan scheduled for {} missed by {} minutes, skipping",
            scheduled.naive_local(),
            lateness.num_minutes()
        );
        return None;
    }

    scanner.scan(scheduled.date_naive()).await.ok()
}

/// Spawns a background task that scans for expiring products every day.
///
/// The task sleeps until the next local occurrence of `at`, runs the scan
/// and waits for it to finish before scheduling the following day, so runs
/// never overlap.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_expiry_task(scanner: Arc<ExpirationScanner>, at: NaiveTime) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expiration scan task, daily at {}", at);

        let mut last_scheduled: Option<DateTime<Local>> = None;
        loop {
            let now = Local::now();
            let scheduled = schedule_after(&now, last_scheduled.as_ref(), at);
            let wait = (scheduled.clone() - now).to_std().unwrap_or(Duration::ZERO);
            debug!("Next expiration scan at {}", scheduled);

            tokio::time::sleep(wait).await;

            fire_trigger(&scanner, &scheduled, &Local::now()).await;
            last_scheduled = Some(scheduled);
        }
    })
}
