//! Time utilities for owlet
//!
//! All budget accounting is done against absolute UTC instants; the
//! viewing day rolls over at UTC midnight regardless of the kiosk's
//! local timezone.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `OWLET_MOCK_TIME` environment variable can be set
//! to override the system clock for all time-sensitive operations. This is
//! useful for exercising day rollover and wind-down behavior by hand.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (interpreted as UTC, e.g.
//! `2026-01-15 19:45:00`)

use chrono::{DateTime, Days, NaiveDateTime, TimeZone, Utc};
use std::sync::OnceLock;
use std::time::Duration;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "OWLET_MOCK_TIME";

/// Cached mock time offset from the real time when the process started.
/// This allows mock time to advance naturally.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                match NaiveDateTime::parse_from_str(&mock_time_str, "%Y-%m-%d %H:%M:%S") {
                    Ok(naive_dt) => {
                        let mock_dt = Utc.from_utc_datetime(&naive_dt);
                        let offset = mock_dt.signed_duration_since(Utc::now());
                        tracing::info!(
                            mock_time = %mock_time_str,
                            offset_secs = offset.num_seconds(),
                            "Mock time enabled"
                        );
                        return Some(offset);
                    }
                    Err(_) => {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            expected_format = "%Y-%m-%d %H:%M:%S",
                            "Invalid mock time format"
                        );
                    }
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current UTC time, respecting mock time settings in debug builds.
///
/// In release builds, this always returns the real system time.
/// In debug builds, if `OWLET_MOCK_TIME` is set, this returns a time
/// that advances from the mock time at the same rate as real time.
pub fn now() -> DateTime<Utc> {
    let real_now = Utc::now();

    if let Some(offset) = get_mock_time_offset() {
        real_now + offset
    } else {
        real_now
    }
}

/// The UTC midnight that started the day containing `at`.
pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&at.date_naive().and_hms_opt(0, 0, 0).unwrap())
}

/// The next UTC midnight after `at`, when the viewing budget resets.
pub fn next_midnight(at: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = at.date_naive().checked_add_days(Days::new(1)).unwrap();
    Utc.from_utc_datetime(&tomorrow.and_hms_opt(0, 0, 0).unwrap())
}

/// Helper to format durations in human-readable form
pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
