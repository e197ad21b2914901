//! Ledger trait definitions

use chrono::{DateTime, NaiveDate, Utc};
use owlet_api::WarningTier;
use owlet_util::ItemId;
use std::collections::HashMap;

use crate::{ItemStats, NewWatchEvent, StoreResult, WarningEvent, WatchEvent};

/// The append-only viewing ledger and warning audit trail.
///
/// Everything the engine derives (budget state, grace eligibility,
/// selection weights) is a projection over these queries for a given
/// instant. Implementations only ever add rows.
pub trait Ledger: Send + Sync {
    // Watch ledger

    /// Append a viewing event; returns the assigned row id
    fn append_watch(&self, event: &NewWatchEvent) -> StoreResult<i64>;

    /// All events whose watched-at date (UTC) equals `day`, oldest first
    fn events_for_day(&self, day: NaiveDate) -> StoreResult<Vec<WatchEvent>>;

    /// Total countable seconds for `day`: excludes manual and grace plays
    fn countable_seconds(&self, day: NaiveDate) -> StoreResult<i64>;

    /// Whether a grace play was already recorded on `day`
    fn grace_played_on(&self, day: NaiveDate) -> StoreResult<bool>;

    /// Per-item play/completion counts and newest watch instant,
    /// across the whole ledger
    fn engagement_stats(&self) -> StoreResult<HashMap<ItemId, ItemStats>>;

    // Warning audit trail

    /// Record that a warning was shown; returns the assigned row id
    fn append_warning(&self, tier: WarningTier, shown_at: DateTime<Utc>) -> StoreResult<i64>;

    /// Most recent warning displays, newest first (admin inspection only;
    /// the calculator never reads these back)
    fn recent_warnings(&self, limit: usize) -> StoreResult<Vec<WarningEvent>>;

    // Health

    /// Check if the store is reachable
    fn is_healthy(&self) -> bool;
}
