use crate::types::ScratchResult;

/// Guaranteed minimum payout when any user number matches a lucky number.
pub const PRIZE_MIN: u64 = 1_000;

/// Tier thresholds for the uniform roll, rarest first. A roll below the
/// threshold selects the tier; anything past the last threshold falls
/// through to the guaranteed minimum.
const TIERS: [(f64, u64); 4] = [
    (0.000_000_2, 500_000_000),
    (0.000_001, 20_000_000),
    (0.0055, 10_000),
    (0.025, 5_000),
];

/// Score a scratch ticket. A match is a user number equal to any lucky
/// number; any match guarantees a nonzero prize, no match pays nothing.
pub fn score(user_numbers: &[u8], lucky_numbers: &[u8], roll: f64) -> ScratchResult {
    let matching: Vec<u8> = user_numbers
        .iter()
        .copied()
        .filter(|n| lucky_numbers.contains(n))
        .collect();

    let prize = if matching.is_empty() {
        0
    } else {
        TIERS
            .iter()
            .find(|(threshold, _)| roll < *threshold)
            .map(|(_, prize)| *prize)
            .unwrap_or(PRIZE_MIN)
    };

    ScratchResult {
        matching_numbers: matching,
        prize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_match_pays_nothing_for_any_roll() {
        for roll in [0.0, 0.000_000_1, 0.01, 0.5, 0.999] {
            let result = score(&[1, 2, 3, 4, 5, 6], &[7], roll);
            assert!(result.matching_numbers.is_empty());
            assert_eq!(result.prize, 0);
        }
    }

    #[test]
    fn any_match_guarantees_the_minimum() {
        for roll in [0.0, 0.0054, 0.025, 0.5, 0.999_999] {
            let result = score(&[1, 2, 3, 4, 5, 7], &[7], roll);
            assert_eq!(result.matching_numbers, vec![7]);
            assert!(result.prize >= PRIZE_MIN, "roll {} paid {}", roll, result.prize);
        }
    }

    #[test]
    fn roll_thresholds_select_tiers() {
        let user = [1, 2, 3, 4, 5, 9];
        let lucky = [9];

        assert_eq!(score(&user, &lucky, 0.000_000_1).prize, 500_000_000);
        assert_eq!(score(&user, &lucky, 0.000_000_5).prize, 20_000_000);
        assert_eq!(score(&user, &lucky, 0.003).prize, 10_000);
        assert_eq!(score(&user, &lucky, 0.01).prize, 5_000);
        assert_eq!(score(&user, &lucky, 0.9).prize, PRIZE_MIN);
    }

    #[test]
    fn multiple_matches_are_all_reported() {
        let result = score(&[3, 5, 7, 8, 9, 2], &[5, 9], 0.5);
        assert_eq!(result.matching_numbers, vec![5, 9]);
        assert_eq!(result.prize, PRIZE_MIN);
    }
}
