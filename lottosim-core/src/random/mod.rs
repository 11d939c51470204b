//! Unbiased random sampling from a cryptographically secure byte source.
//!
//! Integers are drawn with rejection sampling so that no modulo bias is
//! introduced; the byte source is injectable so tests can substitute a
//! seeded generator.

use crate::error::{LotteryError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

pub struct SecureRandom {
    source: Box<dyn RngCore + Send>,
}

impl SecureRandom {
    /// Production generator backed by the operating-system CSPRNG.
    pub fn new() -> Self {
        Self::with_source(OsRng)
    }

    /// Generator with an explicit byte source, e.g. a seeded `StdRng`.
    pub fn with_source(source: impl RngCore + Send + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Uniform integer in `[min, max]` inclusive.
    ///
    /// Draws the minimal number of bytes covering the range and rejects
    /// values at or above the largest representable multiple of the range.
    pub fn random_int(&mut self, min: u32, max: u32) -> Result<u32> {
        if min > max {
            return Err(LotteryError::invalid_range(format!(
                "empty range {}..={}",
                min, max
            )));
        }

        let range = (max - min) as u64 + 1;
        if range == 1 {
            return Ok(min);
        }

        let bits = 64 - (range - 1).leading_zeros() as u64;
        let bytes_needed = ((bits + 7) / 8) as usize;
        let max_value = 1u64 << (bytes_needed as u64 * 8);
        let threshold = max_value - (max_value % range);

        let mut buf = [0u8; 8];
        loop {
            self.source.fill_bytes(&mut buf[..bytes_needed]);

            let mut value = 0u64;
            for &byte in &buf[..bytes_needed] {
                value = (value << 8) | byte as u64;
            }

            if value < threshold {
                return Ok(min + (value % range) as u32);
            }
        }
    }

    /// `count` distinct values from `[min, max]`, sorted ascending.
    pub fn unique_random_ints(&mut self, count: usize, min: u32, max: u32) -> Result<Vec<u32>> {
        if min > max {
            return Err(LotteryError::invalid_range(format!(
                "empty range {}..={}",
                min, max
            )));
        }

        let available = (max - min) as u64 + 1;
        if count as u64 > available {
            return Err(LotteryError::invalid_range(format!(
                "cannot draw {} unique values from {}..={}",
                count, min, max
            )));
        }

        let mut numbers = BTreeSet::new();
        while numbers.len() < count {
            numbers.insert(self.random_int(min, max)?);
        }

        Ok(numbers.into_iter().collect())
    }

    /// Fisher-Yates shuffle; returns a new sequence, the input is untouched.
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Result<Vec<T>> {
        let mut shuffled = items.to_vec();
        for i in (1..shuffled.len()).rev() {
            let j = self.random_int(0, i as u32)? as usize;
            shuffled.swap(i, j);
        }
        Ok(shuffled)
    }

    /// Uniform value in `[0, 1)` with 53 bits of precision. Used as the
    /// tier roll consumed by scoring, drawn before scoring runs.
    pub fn random_unit(&mut self) -> f64 {
        let mut buf = [0u8; 8];
        self.source.fill_bytes(&mut buf);
        let value = u64::from_be_bytes(buf) >> 11;
        value as f64 / (1u64 << 53) as f64
    }

    /// Hex SHA-256 over 32 fresh random bytes, for auditability display.
    pub fn seed_fingerprint(&mut self) -> String {
        let mut seed = [0u8; 32];
        self.source.fill_bytes(&mut seed);
        hex::encode(Sha256::digest(seed))
    }
}

impl Default for SecureRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SecureRandom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureRandom").finish_non_exhaustive()
    }
}
