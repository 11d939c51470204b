//! Pure prize-tier resolution for the three games.
//!
//! Scoring is deterministic given its inputs; any randomness (the uniform
//! tier roll) is drawn by the caller beforehand and passed in.

pub mod lotto;
pub mod pension;
pub mod scratch;

use serde::{Deserialize, Serialize};

/// Which lotto payout policy applies.
///
/// `Strict` pays the fixed tier amount whenever the numbers match the tier.
/// `ProbabilityWeighted` additionally gates each matched tier behind its
/// real-world drawing probability, applied to the supplied uniform roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrizePolicy {
    Strict,
    ProbabilityWeighted,
}

impl Default for PrizePolicy {
    fn default() -> Self {
        PrizePolicy::Strict
    }
}
