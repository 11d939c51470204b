use crate::types::{PensionNumbers, PensionResult};

pub const MONTHLY_RANK_1: u64 = 7_000_000;
pub const MONTHLY_RANK_2: u64 = 1_000_000;
pub const YEARS_RANK_1: u64 = 20;
pub const YEARS_RANK_2: u64 = 10;

/// Count digits matching from the last position backward, stopping at the
/// first mismatch. Comparison is lexical per digit, so leading zeros are
/// significant.
pub fn trailing_match_count(player: &str, drawn: &str) -> usize {
    player
        .bytes()
        .rev()
        .zip(drawn.bytes().rev())
        .take_while(|(p, d)| p == d)
        .count()
}

/// Score a pension ticket against the drawn numbers.
///
/// Run lengths 6 and 5 pay a monthly annuity (20 and 10 years); 4 down to
/// 1 pay lump sums; a full miss still pays rank 7 when the group digit
/// matches.
pub fn score(player: &PensionNumbers, drawn: &PensionNumbers) -> PensionResult {
    let match_count = trailing_match_count(&player.number, &drawn.number);

    let (rank, monthly_prize, total_prize) = match match_count {
        6 => (1u8, MONTHLY_RANK_1, MONTHLY_RANK_1 * 12 * YEARS_RANK_1),
        5 => (2, MONTHLY_RANK_2, MONTHLY_RANK_2 * 12 * YEARS_RANK_2),
        4 => (3, 0, 10_000_000),
        3 => (4, 0, 5_000_000),
        2 => (5, 0, 1_000_000),
        1 => (6, 0, 100_000),
        _ => {
            if player.group == drawn.group {
                (7, 0, 10_000)
            } else {
                (0, 0, 0)
            }
        }
    };

    PensionResult {
        winning_numbers: drawn.clone(),
        rank,
        monthly_prize,
        total_prize,
    }
}
