//! Session engine
//!
//! The request-scoped facade the host calls into: status queries, watch
//! completions, warning displays, playback starts, and grid selection.
//! The engine owns nothing but a handle to the ledger; settings arrive
//! fresh with every call so admin changes take effect immediately, and
//! every answer is re-derived from the ledger rather than cached.

use chrono::{DateTime, Utc};
use owlet_api::{BudgetStatus, CatalogItem, ViewerState, WarningTier, WatchRequest};
use owlet_config::Settings;
use owlet_store::{Ledger, NewWatchEvent};
use owlet_util::{OwletError, OwletResult, PlaybackId};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{
    allows_finish_out, compute_status, fit_remaining, offer_grace, select, warnings_crossed,
    GraceDecision,
};

/// Longest watch report a single event may carry
const MAX_WATCH_SECONDS: i64 = 24 * 3600;

/// Result of recording a watch completion
#[derive(Debug, Clone)]
pub struct WatchOutcome {
    /// Ledger row id of the appended event
    pub event_id: i64,

    /// Budget state recomputed after the append; the caller routes to
    /// the next screen (grid / wind-down / grace offer / locked) from
    /// `status.state`
    pub status: BudgetStatus,

    /// Warning boundaries this completion just crossed, highest first
    pub warnings_due: Vec<WarningTier>,
}

/// Decision made when an item starts playing
#[derive(Debug, Clone)]
pub struct PlaybackPlan {
    pub playback_id: PlaybackId,

    /// When true the item may run to completion even if the budget runs
    /// out mid-stream; decided once at start, never re-evaluated
    pub finish_out: bool,
}

/// The core engine: a thin, stateless facade over the ledger.
pub struct SessionEngine {
    ledger: Arc<dyn Ledger>,
}

impl SessionEngine {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        info!("Session engine initialized");
        Self { ledger }
    }

    /// The periodic status query: where the viewer stands right now.
    pub fn budget_status(
        &self,
        settings: &Settings,
        now: DateTime<Utc>,
    ) -> OwletResult<BudgetStatus> {
        compute_status(self.ledger.as_ref(), settings, now)
    }

    /// Record a watch completion and return the freshly recomputed state.
    ///
    /// The append is safety-critical: a ledger failure propagates to the
    /// caller rather than failing open, since a dropped row would corrupt
    /// the budget.
    pub fn record_watch(
        &self,
        req: &WatchRequest,
        settings: &Settings,
        now: DateTime<Utc>,
    ) -> OwletResult<WatchOutcome> {
        validate_watch(req)?;

        let before = compute_status(self.ledger.as_ref(), settings, now)?;

        let event = NewWatchEvent {
            item_id: req.item_id.clone(),
            channel: req.channel.clone(),
            watched_at: now,
            seconds_watched: req.seconds_watched as u32,
            completed: req.completed,
            manual_play: req.manual_play,
            grace_play: req.grace_play,
        };
        let event_id = self.ledger.append_watch(&event)?;

        let status = compute_status(self.ledger.as_ref(), settings, now)?;
        let warnings_due = warnings_crossed(
            before.minutes_remaining,
            status.minutes_remaining,
            settings.daily_limit_minutes,
        );

        info!(
            event_id,
            item_id = %req.item_id,
            seconds = req.seconds_watched,
            state = ?status.state,
            remaining = status.minutes_remaining,
            "Watch completion recorded"
        );

        Ok(WatchOutcome {
            event_id,
            status,
            warnings_due,
        })
    }

    /// Record that a progressive warning was shown to the viewer.
    ///
    /// The tier is validated strictly, but the write itself is
    /// best-effort: the audit trail must never block or delay playback,
    /// so a store failure is logged and swallowed.
    pub fn record_warning(
        &self,
        tier_minutes: u32,
        shown_at: DateTime<Utc>,
    ) -> OwletResult<WarningTier> {
        let tier = WarningTier::from_minutes(tier_minutes)?;

        if let Err(e) = self.ledger.append_warning(tier, shown_at) {
            warn!(
                tier = tier.as_str(),
                error = %e,
                "Failed to record warning display, continuing"
            );
        }

        Ok(tier)
    }

    /// Build the on-screen grid for the current state.
    ///
    /// Normal plays the full catalog; wind-down narrows it to items that
    /// fit the remaining budget; grace narrows it to the bonus shortlist;
    /// locked presents nothing. An explicit `max_duration` from the
    /// caller narrows the catalog before any of that (a hard constraint,
    /// with no fallback).
    pub fn select_grid<R: Rng>(
        &self,
        rng: &mut R,
        catalog: &[CatalogItem],
        settings: &Settings,
        now: DateTime<Utc>,
        max_duration: Option<Duration>,
    ) -> OwletResult<Vec<CatalogItem>> {
        let status = self.budget_status(settings, now)?;

        let capped: Vec<CatalogItem> = match max_duration {
            Some(cap) => catalog
                .iter()
                .filter(|item| item.duration <= cap)
                .cloned()
                .collect(),
            None => catalog.to_vec(),
        };

        let pool = match status.state {
            ViewerState::Normal => capped,
            ViewerState::WindDown => fit_remaining(&capped, status.minutes_remaining),
            ViewerState::Grace => {
                match offer_grace(self.ledger.as_ref(), &capped, now, settings.grid_size)? {
                    GraceDecision::Offer(items) => items,
                    GraceDecision::AlreadyUsed => Vec::new(),
                }
            }
            ViewerState::Locked => Vec::new(),
        };

        let stats = self.ledger.engagement_stats()?;
        let picked = select(rng, &pool, &stats, now, settings.grid_size);

        debug!(
            state = ?status.state,
            pool_len = pool.len(),
            picked = picked.len(),
            "Grid selected"
        );

        Ok(picked)
    }

    /// Offer today's grace shortlist, or reject if the bonus is spent.
    pub fn offer_grace(
        &self,
        catalog: &[CatalogItem],
        settings: &Settings,
        now: DateTime<Utc>,
    ) -> OwletResult<GraceDecision> {
        offer_grace(self.ledger.as_ref(), catalog, now, settings.grid_size)
    }

    /// Start playback of an item: assign a playback id and decide, once,
    /// whether the item may finish out past budget exhaustion.
    pub fn begin_playback(
        &self,
        item: &CatalogItem,
        settings: &Settings,
        now: DateTime<Utc>,
    ) -> OwletResult<PlaybackPlan> {
        let status = self.budget_status(settings, now)?;
        let remaining = Duration::from_secs(u64::from(status.minutes_remaining) * 60);
        let finish_out = allows_finish_out(item.duration, remaining);

        let plan = PlaybackPlan {
            playback_id: PlaybackId::new(),
            finish_out,
        };

        info!(
            playback_id = %plan.playback_id,
            item_id = %item.id,
            item_secs = item.duration.as_secs(),
            remaining_mins = status.minutes_remaining,
            finish_out,
            "Playback started"
        );

        Ok(plan)
    }
}

fn validate_watch(req: &WatchRequest) -> OwletResult<()> {
    if req.item_id.is_empty() {
        return Err(OwletError::validation("item_id must not be empty"));
    }
    if req.seconds_watched <= 0 {
        return Err(OwletError::validation(format!(
            "seconds_watched must be positive, got {}",
            req.seconds_watched
        )));
    }
    if req.seconds_watched > MAX_WATCH_SECONDS {
        return Err(OwletError::validation(format!(
            "seconds_watched exceeds one day: {}",
            req.seconds_watched
        )));
    }
    if req.grace_play && req.manual_play {
        return Err(OwletError::validation(
            "a play cannot be both grace and manual",
        ));
    }
    Ok(())
}
