use super::PrizePolicy;
use crate::types::{LottoNumbers, LottoResult};

pub const PRIZE_RANK_1: u64 = 2_000_000_000;
pub const PRIZE_RANK_2: u64 = 30_000_000;
pub const PRIZE_RANK_3: u64 = 1_500_000;
pub const PRIZE_RANK_4: u64 = 50_000;
pub const PRIZE_RANK_5: u64 = 5_000;

/// Official per-tier drawing odds, used by the probability-weighted policy.
const TIER_ODDS: [f64; 5] = [
    1.0 / 8_145_060.0,
    1.0 / 1_357_510.0,
    1.0 / 35_724.0,
    1.0 / 733.0,
    1.0 / 45.0,
];

/// Score player numbers against a drawn set.
///
/// Tiers are checked highest first; exactly one applies. The bonus number
/// only matters for rank 2 and matches when it belongs to the drawn main
/// set. `roll` is ignored under the strict policy.
pub fn score(
    player: &LottoNumbers,
    drawn: &LottoNumbers,
    policy: PrizePolicy,
    roll: f64,
) -> LottoResult {
    let mut matching: Vec<u8> = player
        .main
        .iter()
        .copied()
        .filter(|n| drawn.main.contains(n))
        .collect();
    matching.sort_unstable();

    let bonus_match = player.bonus.map_or(false, |b| drawn.main.contains(&b));

    let (rank, prize) = match (matching.len(), bonus_match) {
        (6, _) => (1u8, PRIZE_RANK_1),
        (5, true) => (2, PRIZE_RANK_2),
        (5, false) => (3, PRIZE_RANK_3),
        (4, _) => (4, PRIZE_RANK_4),
        (3, _) => (5, PRIZE_RANK_5),
        _ => (0, 0),
    };

    let (rank, prize) = match policy {
        PrizePolicy::Strict => (rank, prize),
        PrizePolicy::ProbabilityWeighted => {
            if rank > 0 && roll < TIER_ODDS[(rank - 1) as usize] {
                (rank, prize)
            } else {
                (0, 0)
            }
        }
    };

    LottoResult {
        winning_numbers: drawn.clone(),
        rank,
        prize,
        matching_numbers: matching,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(main: [u8; 6], bonus: Option<u8>) -> LottoNumbers {
        LottoNumbers {
            main: main.to_vec(),
            bonus,
        }
    }

    #[test]
    fn six_matches_is_rank_one() {
        let drawn = numbers([1, 2, 3, 4, 5, 6], Some(7));
        let result = score(
            &numbers([1, 2, 3, 4, 5, 6], None),
            &drawn,
            PrizePolicy::Strict,
            0.99,
        );
        assert_eq!(result.rank, 1);
        assert_eq!(result.prize, PRIZE_RANK_1);
        assert_eq!(result.matching_numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn five_matches_with_bonus_in_drawn_main_is_rank_two() {
        // Player misses 7 but holds bonus 7, which sits in the drawn main set.
        let drawn = numbers([1, 2, 3, 4, 5, 7], Some(20));
        let result = score(
            &numbers([1, 2, 3, 4, 5, 6], Some(7)),
            &drawn,
            PrizePolicy::Strict,
            0.0,
        );
        assert_eq!(result.rank, 2);
        assert_eq!(result.prize, PRIZE_RANK_2);
        assert_eq!(result.matching_numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn five_matches_without_bonus_is_rank_three() {
        let drawn = numbers([1, 2, 3, 4, 5, 7], Some(20));
        let result = score(
            &numbers([1, 2, 3, 4, 5, 6], Some(40)),
            &drawn,
            PrizePolicy::Strict,
            0.0,
        );
        assert_eq!(result.rank, 3);
        assert_eq!(result.prize, PRIZE_RANK_3);
    }

    #[test]
    fn four_and_three_matches() {
        let drawn = numbers([1, 2, 3, 4, 5, 6], None);

        let four = score(
            &numbers([1, 2, 3, 4, 40, 41], None),
            &drawn,
            PrizePolicy::Strict,
            0.0,
        );
        assert_eq!((four.rank, four.prize), (4, PRIZE_RANK_4));

        let three = score(
            &numbers([1, 2, 3, 39, 40, 41], None),
            &drawn,
            PrizePolicy::Strict,
            0.0,
        );
        assert_eq!((three.rank, three.prize), (5, PRIZE_RANK_5));
    }

    #[test]
    fn two_or_fewer_matches_is_no_win() {
        let drawn = numbers([1, 2, 3, 4, 5, 6], None);
        let result = score(
            &numbers([1, 2, 38, 39, 40, 41], Some(6)),
            &drawn,
            PrizePolicy::Strict,
            0.0,
        );
        assert_eq!(result.rank, 0);
        assert_eq!(result.prize, 0);
        assert_eq!(result.matching_numbers, vec![1, 2]);
    }

    #[test]
    fn weighted_policy_gates_matched_tiers() {
        let drawn = numbers([1, 2, 3, 4, 5, 6], None);
        let player = numbers([1, 2, 3, 39, 40, 41], None);

        // Roll inside the 1/45 gate pays rank 5.
        let paid = score(&player, &drawn, PrizePolicy::ProbabilityWeighted, 0.001);
        assert_eq!((paid.rank, paid.prize), (5, PRIZE_RANK_5));

        // Roll outside the gate scores nothing despite the matches.
        let gated = score(&player, &drawn, PrizePolicy::ProbabilityWeighted, 0.5);
        assert_eq!((gated.rank, gated.prize), (0, 0));
    }

    #[test]
    fn weighted_policy_never_pays_without_matches() {
        let drawn = numbers([1, 2, 3, 4, 5, 6], None);
        let player = numbers([10, 20, 30, 39, 40, 41], None);
        let result = score(&player, &drawn, PrizePolicy::ProbabilityWeighted, 0.0);
        assert_eq!((result.rank, result.prize), (0, 0));
    }
}
