//! Night audit scheduler
//!
//! Fires the audit once a day at the configured hotel-local hour, with a
//! bounded number of attempts per firing.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use innkeep_core::{night_audit, Database};

use crate::config::NightAuditConfig;

/// Delay between attempts of one firing
const RETRY_DELAY: Duration = Duration::from_secs(30);

/// Compute the next firing instant strictly after `now`.
///
/// `hour` is interpreted on the wall clock at `utc_offset_minutes` from
/// UTC; the offset is fixed, so every day has exactly one firing.
pub fn next_run_after(now: DateTime<Utc>, hour: u32, utc_offset_minutes: i32) -> DateTime<Utc> {
    let offset = ChronoDuration::minutes(i64::from(utc_offset_minutes));
    let local = (now + offset).naive_utc();

    let today_target = local
        .date()
        .and_hms_opt(hour, 0, 0)
        .expect("hour is clamped below 24");

    let target = if today_target > local {
        today_target
    } else {
        today_target + ChronoDuration::days(1)
    };

    DateTime::from_naive_utc_and_offset(target - offset, Utc)
}

/// Daily night audit driver
pub struct NightAuditScheduler {
    db: Arc<Mutex<Database>>,
    hour: u32,
    utc_offset_minutes: i32,
    max_attempts: u32,
}

impl NightAuditScheduler {
    pub fn new(db: Arc<Mutex<Database>>, config: &NightAuditConfig) -> Self {
        let mut hour = config.hour;
        if hour >= 24 {
            warn!(hour, "night audit hour out of range, using 5");
            hour = 5;
        }

        let mut utc_offset_minutes = config.utc_offset_minutes;
        if utc_offset_minutes.abs() >= 24 * 60 {
            warn!(
                utc_offset_minutes,
                "night audit offset out of range, using 0"
            );
            utc_offset_minutes = 0;
        }

        Self {
            db,
            hour,
            utc_offset_minutes,
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Run forever, firing once per day
    pub async fn run(self) {
        loop {
            let now = Utc::now();
            let next = next_run_after(now, self.hour, self.utc_offset_minutes);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);

            info!(next = %next, "Night audit scheduled");
            tokio::time::sleep(wait).await;

            self.fire().await;
        }
    }

    /// One firing: up to `max_attempts` tries, then give up until tomorrow
    async fn fire(&self) {
        for attempt in 1..=self.max_attempts {
            let result = {
                let db = self.db.lock().await;
                night_audit::run_night_audit(&db)
            };

            match result {
                Ok(report) => {
                    info!(
                        hotels = report.hotels_processed,
                        failed = report.hotels_failed,
                        rooms = report.rooms_updated,
                        "Night audit fired"
                    );
                    self.sweep_sessions().await;
                    return;
                }
                Err(e) => {
                    error!(attempt, error = %e, "Night audit attempt failed");
                    if attempt < self.max_attempts {
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
            }
        }

        error!("Night audit giving up until the next scheduled run");
    }

    /// Expired staff sessions are dropped in the same nightly window
    async fn sweep_sessions(&self) {
        let db = self.db.lock().await;
        match db.sessions().cleanup_expired() {
            Ok(0) => {}
            Ok(removed) => info!(removed, "Expired sessions cleaned up"),
            Err(e) => error!(error = %e, "Session cleanup failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_next_run_later_today() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 2, 30, 0).unwrap();
        let next = next_run_after(now, 5, 0);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 10, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_next_run_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 5, 0, 0).unwrap();
        let next = next_run_after(now, 5, 0);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 11, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_next_run_respects_offset() {
        // 05:00 at UTC+2 is 03:00 UTC
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        let next = next_run_after(now, 5, 120);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 10, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_next_run_negative_offset() {
        // 05:00 at UTC-5 is 10:00 UTC; at 11:00 UTC that is tomorrow
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 11, 0, 0).unwrap();
        let next = next_run_after(now, 5, -300);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 11, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_scheduler_clamps_bad_config() {
        let db = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
        let scheduler = NightAuditScheduler::new(
            db,
            &NightAuditConfig {
                hour: 30,
                utc_offset_minutes: 100_000,
                max_attempts: 0,
            },
        );
        assert_eq!(scheduler.hour, 5);
        assert_eq!(scheduler.utc_offset_minutes, 0);
        assert_eq!(scheduler.max_attempts, 1);
    }
}
