use crate::error::{LotteryError, Result};
use crate::rules::PrizePolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub prize_policy: PrizePolicy,
    /// Purchases above this count go through the chunked batch path.
    pub batch_threshold: usize,
    /// Tickets generated and persisted per chunk.
    pub chunk_size: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            prize_policy: PrizePolicy::Strict,
            batch_threshold: 50,
            chunk_size: 50,
        }
    }
}

impl SimConfig {
    pub fn new(prize_policy: PrizePolicy) -> Self {
        Self {
            prize_policy,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(LotteryError::config("Chunk size must be greater than 0"));
        }

        if self.batch_threshold == 0 {
            return Err(LotteryError::config(
                "Batch threshold must be greater than 0",
            ));
        }

        Ok(())
    }
}
