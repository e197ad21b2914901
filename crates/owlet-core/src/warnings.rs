//! Warning threshold detector
//!
//! Stateless with respect to the calculator: the caller supplies the
//! remaining minutes from the previous and current computation, and the
//! detector reports which boundaries were just crossed downward. Firing
//! is idempotent per boundary by construction: polling again with an
//! unchanged remaining value crosses nothing.

use owlet_api::WarningTier;

/// Which of the {10, 5, 2} minute boundaries were crossed between two
/// consecutive readings of the remaining budget.
///
/// Only boundaries strictly below the configured daily limit are valid:
/// with an 8 minute limit the ten-minute tier is unreachable and must
/// never be emitted. Returned highest boundary first, matching the order
/// a player would display them if a single event crossed several at once.
pub fn warnings_crossed(
    prev_remaining: u32,
    remaining: u32,
    daily_limit: u32,
) -> Vec<WarningTier> {
    WarningTier::ALL
        .iter()
        .copied()
        .filter(|tier| tier.minutes() < daily_limit)
        .filter(|tier| prev_remaining > tier.minutes() && remaining <= tier.minutes())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_a_boundary_fires_once() {
        let fired = warnings_crossed(12, 9, 30);
        assert_eq!(fired, vec![WarningTier::TenMinutes]);
    }

    #[test]
    fn landing_exactly_on_a_boundary_fires() {
        let fired = warnings_crossed(12, 10, 30);
        assert_eq!(fired, vec![WarningTier::TenMinutes]);
    }

    #[test]
    fn polling_without_decrease_fires_nothing() {
        assert!(warnings_crossed(9, 9, 30).is_empty());
        assert!(warnings_crossed(10, 10, 30).is_empty());
        assert!(warnings_crossed(2, 2, 30).is_empty());
    }

    #[test]
    fn staying_inside_a_band_fires_nothing() {
        // 9 -> 6 stays between the 10 and 5 boundaries
        assert!(warnings_crossed(9, 6, 30).is_empty());
    }

    #[test]
    fn one_event_can_cross_several_boundaries() {
        let fired = warnings_crossed(12, 1, 30);
        assert_eq!(
            fired,
            vec![
                WarningTier::TenMinutes,
                WarningTier::FiveMinutes,
                WarningTier::TwoMinutes
            ]
        );
    }

    #[test]
    fn boundaries_at_or_above_the_limit_never_fire() {
        // Limit of 8: the day starts at 8 remaining, so a drop from 8 to 4
        // may only fire the five-minute tier, never the ten
        let fired = warnings_crossed(8, 4, 8);
        assert_eq!(fired, vec![WarningTier::FiveMinutes]);

        let fired = warnings_crossed(4, 0, 8);
        assert_eq!(fired, vec![WarningTier::TwoMinutes]);
    }

    #[test]
    fn eight_minute_limit_fires_exactly_five_and_two() {
        // Walk a whole 8 minute day down in steps and collect everything
        let mut fired = Vec::new();
        let steps = [8u32, 7, 5, 3, 1, 0];
        for pair in steps.windows(2) {
            fired.extend(warnings_crossed(pair[0], pair[1], 8));
        }
        assert_eq!(fired, vec![WarningTier::FiveMinutes, WarningTier::TwoMinutes]);
    }

    #[test]
    fn tiny_limit_fires_nothing_above_it() {
        // A 2 minute limit leaves no valid boundary at all
        assert!(warnings_crossed(2, 0, 2).is_empty());
    }
}
