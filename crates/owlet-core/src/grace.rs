//! Grace gate
//!
//! Once the budget is exhausted the viewer may play exactly one bonus
//! item per UTC day. The gate is derived from the ledger (a `grace_play`
//! row for today means the bonus is spent), so it survives restarts the
//! same way the budget does.

use chrono::{DateTime, Utc};
use owlet_api::CatalogItem;
use owlet_store::Ledger;
use owlet_util::OwletResult;
use std::time::Duration;
use tracing::debug;

/// Longest item the grace shortlist offers outright
pub const GRACE_MAX_SECS: u64 = 300;

/// How far past budget exhaustion an in-progress item may run before the
/// lock takes effect, measured at item start
pub const FINISH_OUT_WINDOW_SECS: u64 = 300;

/// Outcome of a grace offer request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraceDecision {
    /// Bonus still available; the shortlist to present
    Offer(Vec<CatalogItem>),
    /// Today's bonus item was already played
    AlreadyUsed,
}

/// Offer today's bonus shortlist, or reject if the bonus is spent.
///
/// The shortlist is the available items no longer than
/// [`GRACE_MAX_SECS`]; when none qualify it falls back to the
/// `shortlist_len` shortest available items so the presentation is never
/// empty.
pub fn offer_grace(
    ledger: &dyn Ledger,
    catalog: &[CatalogItem],
    now: DateTime<Utc>,
    shortlist_len: usize,
) -> OwletResult<GraceDecision> {
    if ledger.grace_played_on(now.date_naive())? {
        debug!("Grace already played today, rejecting offer");
        return Ok(GraceDecision::AlreadyUsed);
    }

    let available: Vec<&CatalogItem> = catalog.iter().filter(|item| item.available).collect();

    let short: Vec<CatalogItem> = available
        .iter()
        .filter(|item| item.duration.as_secs() <= GRACE_MAX_SECS)
        .map(|item| (*item).clone())
        .collect();

    if !short.is_empty() {
        return Ok(GraceDecision::Offer(short));
    }

    // Nothing under the ceiling: offer the shortest items instead
    let mut fallback: Vec<CatalogItem> = available.into_iter().cloned().collect();
    fallback.sort_by_key(|item| item.duration);
    fallback.truncate(shortlist_len);

    debug!(
        offered = fallback.len(),
        "No item under the grace ceiling, offering shortest available"
    );
    Ok(GraceDecision::Offer(fallback))
}

/// Whether an item started with `remaining` budget may finish out past
/// exhaustion instead of being interrupted.
///
/// The window is measured from item start: playback that would complete
/// no more than [`FINISH_OUT_WINDOW_SECS`] after the budget runs out is
/// allowed to finish. Evaluated once when the item starts, never
/// re-evaluated mid-stream.
pub fn allows_finish_out(item_duration: Duration, remaining: Duration) -> bool {
    item_duration <= remaining + Duration::from_secs(FINISH_OUT_WINDOW_SECS)
}
