//! Shared types for the owlet boundary

use chrono::{DateTime, Utc};
use owlet_util::{ItemId, OwletError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the viewer currently stands against today's budget.
///
/// Derived fresh from the ledger on every computation; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerState {
    /// More than ten minutes of budget left
    Normal,
    /// Ten minutes or less remaining; content is duration-filtered
    WindDown,
    /// Budget exhausted, today's bonus item not yet used
    Grace,
    /// Budget exhausted and the bonus item already played
    Locked,
}

/// The three progressive warning boundaries, in minutes remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningTier {
    TenMinutes,
    FiveMinutes,
    TwoMinutes,
}

impl WarningTier {
    /// All tiers, highest boundary first.
    pub const ALL: [WarningTier; 3] = [
        WarningTier::TenMinutes,
        WarningTier::FiveMinutes,
        WarningTier::TwoMinutes,
    ];

    /// The remaining-minutes boundary this tier fires at.
    pub fn minutes(self) -> u32 {
        match self {
            WarningTier::TenMinutes => 10,
            WarningTier::FiveMinutes => 5,
            WarningTier::TwoMinutes => 2,
        }
    }

    /// Parse a boundary value from the wire; anything outside the
    /// three-value enumeration is rejected.
    pub fn from_minutes(minutes: u32) -> Result<Self, OwletError> {
        match minutes {
            10 => Ok(WarningTier::TenMinutes),
            5 => Ok(WarningTier::FiveMinutes),
            2 => Ok(WarningTier::TwoMinutes),
            other => Err(OwletError::validation(format!(
                "unknown warning tier: {} (valid tiers are 10, 5, 2)",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WarningTier::TenMinutes => "ten_minutes",
            WarningTier::FiveMinutes => "five_minutes",
            WarningTier::TwoMinutes => "two_minutes",
        }
    }

    pub fn from_str_tag(s: &str) -> Option<Self> {
        match s {
            "ten_minutes" => Some(WarningTier::TenMinutes),
            "five_minutes" => Some(WarningTier::FiveMinutes),
            "two_minutes" => Some(WarningTier::TwoMinutes),
            _ => None,
        }
    }
}

/// Derived daily budget state, recomputed from the ledger on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    /// Whole countable minutes watched today (partial minutes truncated)
    pub minutes_watched: u32,

    /// Whole minutes left of today's budget, floored at zero
    pub minutes_remaining: u32,

    /// Current position in the state machine
    pub state: ViewerState,

    /// The next UTC midnight, when the day filter rolls over
    pub resets_at: DateTime<Utc>,
}

/// A presentable catalog item, as assembled by the host from the
/// external content source and its ban list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub title: String,
    /// Channel label, denormalized so history survives catalog deletion
    pub channel: String,
    pub duration: Duration,
    /// False when banned or otherwise unavailable; such items are
    /// hard-filtered before any selection weighting
    pub available: bool,
}

impl CatalogItem {
    pub fn new(
        id: impl Into<ItemId>,
        title: impl Into<String>,
        channel: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            channel: channel.into(),
            duration,
            available: true,
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

/// A watch-completion report from the player.
///
/// `seconds_watched` is signed on the wire so that absent or negative
/// values can be rejected with a proper validation error instead of
/// silently wrapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchRequest {
    pub item_id: ItemId,
    /// Channel label at the time of playback
    pub channel: String,
    pub seconds_watched: i64,
    pub completed: bool,
    /// Parent-initiated playback, exempt from the budget
    #[serde(default)]
    pub manual_play: bool,
    /// The once-per-day bonus item, exempt from the budget
    #[serde(default)]
    pub grace_play: bool,
}
