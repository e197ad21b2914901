//! Ledger row types

use chrono::{DateTime, Utc};
use owlet_api::WarningTier;
use owlet_util::ItemId;
use serde::{Deserialize, Serialize};

/// One viewing event, exactly as stored.
///
/// Immutable once written. `manual_play` and `grace_play` rows are kept in
/// the same ledger but excluded from budget accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEvent {
    /// Ledger row id
    pub id: i64,

    pub item_id: ItemId,

    /// Channel label at playback time; survives catalog deletion
    pub channel: String,

    /// Server-assigned UTC instant
    pub watched_at: DateTime<Utc>,

    pub seconds_watched: u32,

    pub completed: bool,

    pub manual_play: bool,

    pub grace_play: bool,
}

/// A viewing event about to be appended; the store assigns the row id.
#[derive(Debug, Clone)]
pub struct NewWatchEvent {
    pub item_id: ItemId,
    pub channel: String,
    pub watched_at: DateTime<Utc>,
    pub seconds_watched: u32,
    pub completed: bool,
    pub manual_play: bool,
    pub grace_play: bool,
}

/// One progressive-warning display, as recorded for the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningEvent {
    pub id: i64,
    pub tier: WarningTier,
    pub shown_at: DateTime<Utc>,
}

/// Aggregated viewing history for one item, feeding the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemStats {
    /// How many times the item was played, in any mode
    pub plays: u32,

    /// How many of those plays ran to completion
    pub completions: u32,

    /// Newest ledger row for the item, if any
    pub last_watched_at: Option<DateTime<Utc>>,
}

impl ItemStats {
    /// Fraction of plays that completed; zero when never played.
    pub fn completion_rate(&self) -> f64 {
        if self.plays == 0 {
            0.0
        } else {
            f64::from(self.completions) / f64::from(self.plays)
        }
    }
}
