//! Daily limit calculator
//!
//! `compute_status` is a pure function of the ledger contents, the
//! settings, and the caller's instant. There is no cached session object
//! and no explicit reset: at UTC midnight the day filter simply stops
//! matching yesterday's rows.

use chrono::{DateTime, Utc};
use owlet_api::{BudgetStatus, ViewerState};
use owlet_config::Settings;
use owlet_store::Ledger;
use owlet_util::{next_midnight, OwletResult};

/// Remaining-minutes boundary at which wind-down begins
pub const WINDDOWN_THRESHOLD_MINS: u32 = 10;

/// Derive today's budget position from the ledger.
///
/// Sums `seconds_watched` over today's countable events (UTC day of
/// `now`; manual and grace plays excluded), truncates to whole minutes,
/// and maps the remainder onto the state machine.
pub fn compute_status(
    ledger: &dyn Ledger,
    settings: &Settings,
    now: DateTime<Utc>,
) -> OwletResult<BudgetStatus> {
    let today = now.date_naive();

    let seconds = ledger.countable_seconds(today)?;
    let minutes_watched = (seconds.max(0) / 60) as u32;
    let minutes_remaining = settings.daily_limit_minutes.saturating_sub(minutes_watched);

    let state = if minutes_remaining > WINDDOWN_THRESHOLD_MINS {
        ViewerState::Normal
    } else if minutes_remaining > 0 {
        ViewerState::WindDown
    } else if ledger.grace_played_on(today)? {
        ViewerState::Locked
    } else {
        ViewerState::Grace
    };

    Ok(BudgetStatus {
        minutes_watched,
        minutes_remaining,
        state,
        resets_at: next_midnight(now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use owlet_store::{NewWatchEvent, SqliteLedger};
    use owlet_util::ItemId;

    fn settings(daily_limit_minutes: u32) -> Settings {
        Settings {
            daily_limit_minutes,
            grid_size: 9,
        }
    }

    fn watch(seconds: u32, at: DateTime<Utc>) -> NewWatchEvent {
        NewWatchEvent {
            item_id: ItemId::new("vid-1"),
            channel: "Science for Kids".into(),
            watched_at: at,
            seconds_watched: seconds,
            completed: true,
            manual_play: false,
            grace_play: false,
        }
    }

    #[test]
    fn fresh_day_is_normal() {
        let ledger = SqliteLedger::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();

        let status = compute_status(&ledger, &settings(30), now).unwrap();
        assert_eq!(status.minutes_watched, 0);
        assert_eq!(status.minutes_remaining, 30);
        assert_eq!(status.state, ViewerState::Normal);
        assert_eq!(
            status.resets_at,
            Utc.with_ymd_and_hms(2026, 1, 16, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn partial_minutes_truncate_consistently() {
        let ledger = SqliteLedger::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();

        // 299 seconds is 4 whole minutes, not 5
        ledger.append_watch(&watch(299, now)).unwrap();

        let status = compute_status(&ledger, &settings(30), now).unwrap();
        assert_eq!(status.minutes_watched, 4);
        assert_eq!(status.minutes_remaining, 26);
    }

    #[test]
    fn winddown_starts_at_ten_remaining() {
        let ledger = SqliteLedger::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();

        ledger.append_watch(&watch(19 * 60, now)).unwrap();
        let status = compute_status(&ledger, &settings(30), now).unwrap();
        assert_eq!(status.minutes_remaining, 11);
        assert_eq!(status.state, ViewerState::Normal);

        ledger.append_watch(&watch(60, now)).unwrap();
        let status = compute_status(&ledger, &settings(30), now).unwrap();
        assert_eq!(status.minutes_remaining, 10);
        assert_eq!(status.state, ViewerState::WindDown);
    }

    #[test]
    fn exhausted_budget_offers_grace_then_locks() {
        let ledger = SqliteLedger::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();

        // Overshoot: 32 minutes against a 30 minute budget
        ledger.append_watch(&watch(32 * 60, now)).unwrap();
        let status = compute_status(&ledger, &settings(30), now).unwrap();
        assert_eq!(status.minutes_remaining, 0);
        assert_eq!(status.state, ViewerState::Grace);

        // A grace play flips the same remaining-zero day to locked
        ledger
            .append_watch(&NewWatchEvent {
                grace_play: true,
                ..watch(4 * 60, now)
            })
            .unwrap();
        let status = compute_status(&ledger, &settings(30), now).unwrap();
        assert_eq!(status.minutes_remaining, 0);
        assert_eq!(status.state, ViewerState::Locked);
    }

    #[test]
    fn manual_and_grace_plays_do_not_count() {
        let ledger = SqliteLedger::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();

        ledger
            .append_watch(&NewWatchEvent {
                manual_play: true,
                ..watch(45 * 60, now)
            })
            .unwrap();

        let status = compute_status(&ledger, &settings(30), now).unwrap();
        assert_eq!(status.minutes_watched, 0);
        assert_eq!(status.state, ViewerState::Normal);
    }

    #[test]
    fn status_query_is_idempotent() {
        let ledger = SqliteLedger::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 14, 30, 0).unwrap();
        ledger.append_watch(&watch(12 * 60, now)).unwrap();

        let first = compute_status(&ledger, &settings(30), now).unwrap();
        let second = compute_status(&ledger, &settings(30), now).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn minutes_watched_is_monotonic_within_a_day() {
        let ledger = SqliteLedger::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();

        let mut previous = 0;
        for chunk in [120u32, 45, 300, 600, 59] {
            ledger.append_watch(&watch(chunk, now)).unwrap();
            let status = compute_status(&ledger, &settings(60), now).unwrap();
            assert!(status.minutes_watched >= previous);
            previous = status.minutes_watched;
        }
    }

    #[test]
    fn day_boundary_resets_without_any_reset_call() {
        let ledger = SqliteLedger::in_memory().unwrap();
        let late = Utc.with_ymd_and_hms(2026, 1, 15, 23, 50, 0).unwrap();
        ledger.append_watch(&watch(32 * 60, late)).unwrap();

        let before = compute_status(&ledger, &settings(30), late).unwrap();
        assert_eq!(before.state, ViewerState::Grace);

        // Cross UTC midnight: yesterday's rows fall out of the filter
        let after_midnight = Utc.with_ymd_and_hms(2026, 1, 16, 0, 1, 0).unwrap();
        let fresh = compute_status(&ledger, &settings(30), after_midnight).unwrap();
        assert_eq!(fresh.minutes_watched, 0);
        assert_eq!(fresh.minutes_remaining, 30);
        assert_eq!(fresh.state, ViewerState::Normal);
    }

    #[test]
    fn small_limit_starts_in_winddown() {
        let ledger = SqliteLedger::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();

        // An 8 minute budget is inside the wind-down band from the start
        let status = compute_status(&ledger, &settings(8), now).unwrap();
        assert_eq!(status.minutes_remaining, 8);
        assert_eq!(status.state, ViewerState::WindDown);
    }
}
