//! Wind-down content filter
//!
//! Once the remaining budget drops into the wind-down band, the grid only
//! offers items short enough to finish in time.

use owlet_api::CatalogItem;
use std::time::Duration;
use tracing::debug;

/// Keep only items whose duration fits the remaining budget.
///
/// If nothing fits, the unfiltered catalog is returned instead: an empty
/// grid is a worse failure than offering an item that runs long.
pub fn fit_remaining(catalog: &[CatalogItem], minutes_remaining: u32) -> Vec<CatalogItem> {
    let cap = Duration::from_secs(u64::from(minutes_remaining) * 60);

    let fitting: Vec<CatalogItem> = catalog
        .iter()
        .filter(|item| item.duration <= cap)
        .cloned()
        .collect();

    if fitting.is_empty() {
        debug!(
            minutes_remaining,
            catalog_len = catalog.len(),
            "No item fits the remaining budget, falling back to full catalog"
        );
        return catalog.to_vec();
    }

    fitting
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, secs: u64) -> CatalogItem {
        CatalogItem::new(id, format!("Item {}", id), "Cartoons", Duration::from_secs(secs))
    }

    #[test]
    fn keeps_items_that_fit() {
        let catalog = vec![item("a", 120), item("b", 400), item("c", 300)];

        let filtered = fit_remaining(&catalog, 5);
        let ids: Vec<&str> = filtered.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn boundary_duration_still_fits() {
        // Exactly the remaining budget counts as fitting
        let catalog = vec![item("a", 300)];
        assert_eq!(fit_remaining(&catalog, 5).len(), 1);
    }

    #[test]
    fn falls_back_to_full_catalog_when_nothing_fits() {
        let catalog = vec![item("a", 900), item("b", 1200)];

        let filtered = fit_remaining(&catalog, 2);
        assert_eq!(filtered.len(), catalog.len());
    }

    #[test]
    fn never_empty_for_any_positive_remaining() {
        let catalog = vec![item("a", 10_000)];
        for minutes in 1..=10 {
            assert!(
                !fit_remaining(&catalog, minutes).is_empty(),
                "empty grid at {} minutes remaining",
                minutes
            );
        }
    }

    #[test]
    fn empty_catalog_stays_empty() {
        assert!(fit_remaining(&[], 5).is_empty());
    }
}
