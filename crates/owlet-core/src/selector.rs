//! Engagement-weighted, novelty-biased selection
//!
//! Each eligible item gets a weight: an engagement base derived from its
//! completion rate and replay count, dampened when the item was watched
//! in the last 24 hours. The dampener reduces but never zeroes a weight,
//! so every eligible item keeps a positive selection probability no
//! matter its history. Sampling is weighted and without replacement.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use owlet_api::CatalogItem;
use owlet_store::ItemStats;
use owlet_util::ItemId;
use rand::Rng;
use std::collections::HashMap;

/// How strongly the historical completion rate lifts an item
const COMPLETION_WEIGHT: f64 = 2.0;

/// Per-play replay bonus
const REPLAY_BONUS: f64 = 0.1;

/// Ceiling on the accumulated replay bonus
const REPLAY_BONUS_CAP: f64 = 1.0;

/// Multiplier applied to items watched within the recency window
pub const RECENT_DAMPENER: f64 = 0.25;

/// Floor below which no eligible item's weight may fall
pub const WEIGHT_FLOOR: f64 = 0.05;

/// Recency window for the dampener
pub const RECENCY_WINDOW_HOURS: i64 = 24;

fn base_weight(stats: &ItemStats) -> f64 {
    let replay_bonus = (f64::from(stats.plays) * REPLAY_BONUS).min(REPLAY_BONUS_CAP);
    1.0 + COMPLETION_WEIGHT * stats.completion_rate() + replay_bonus
}

fn watched_since(stats: Option<&ItemStats>, cutoff: DateTime<Utc>) -> bool {
    stats
        .and_then(|s| s.last_watched_at)
        .map(|at| at > cutoff)
        .unwrap_or(false)
}

/// Weigh the eligible (available) portion of the catalog for sampling.
///
/// When every eligible item falls inside the recency window the weights
/// collapse to uniform: with nothing novel to bias toward, plain random
/// rotation is the defined behavior rather than an error.
fn weigh(
    catalog: &[CatalogItem],
    stats: &HashMap<ItemId, ItemStats>,
    now: DateTime<Utc>,
) -> Vec<(CatalogItem, f64)> {
    let cutoff = now - ChronoDuration::hours(RECENCY_WINDOW_HOURS);

    let eligible: Vec<&CatalogItem> = catalog.iter().filter(|item| item.available).collect();

    let all_recent = !eligible.is_empty()
        && eligible
            .iter()
            .all(|item| watched_since(stats.get(&item.id), cutoff));

    eligible
        .into_iter()
        .map(|item| {
            let weight = if all_recent {
                1.0
            } else {
                let item_stats = stats.get(&item.id).copied().unwrap_or_default();
                let mut weight = base_weight(&item_stats);
                if watched_since(Some(&item_stats), cutoff) {
                    weight *= RECENT_DAMPENER;
                }
                weight.max(WEIGHT_FLOOR)
            };
            (item.clone(), weight)
        })
        .collect()
}

/// Pick up to `grid_size` items by weighted sampling without replacement.
///
/// Banned and unavailable items are excluded before weighting. Returns
/// the picks in selection order; fewer than `grid_size` when the eligible
/// catalog is smaller.
pub fn select<R: Rng>(
    rng: &mut R,
    catalog: &[CatalogItem],
    stats: &HashMap<ItemId, ItemStats>,
    now: DateTime<Utc>,
    grid_size: usize,
) -> Vec<CatalogItem> {
    let mut pool = weigh(catalog, stats, now);
    let mut picked = Vec::with_capacity(grid_size.min(pool.len()));

    while picked.len() < grid_size && !pool.is_empty() {
        let total: f64 = pool.iter().map(|(_, weight)| *weight).sum();
        let mut roll = rng.gen_range(0.0..total);

        let mut chosen = pool.len() - 1;
        for (index, (_, weight)) in pool.iter().enumerate() {
            if roll < *weight {
                chosen = index;
                break;
            }
            roll -= *weight;
        }

        picked.push(pool.swap_remove(chosen).0);
    }

    picked
}
