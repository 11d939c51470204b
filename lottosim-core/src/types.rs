use crate::error::{LotteryError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// The three simulated games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Game {
    Lotto645,
    Speetto1000,
    Pension720,
}

impl Game {
    pub const ALL: [Game; 3] = [Game::Lotto645, Game::Speetto1000, Game::Pension720];

    /// Fixed price per ticket, in won.
    pub fn unit_price(&self) -> u64 {
        match self {
            Game::Lotto645 => 1000,
            Game::Speetto1000 => 1000,
            Game::Pension720 => 720,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Game::Lotto645 => "lotto645",
            Game::Speetto1000 => "speetto1000",
            Game::Pension720 => "pension720",
        }
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const LOTTO_MAIN_COUNT: usize = 6;
pub const LOTTO_MIN: u8 = 1;
pub const LOTTO_MAX: u8 = 45;

pub const SCRATCH_USER_COUNT: usize = 6;
pub const SCRATCH_MIN: u8 = 1;
pub const SCRATCH_MAX: u8 = 9;

pub const PENSION_GROUP_MIN: u8 = 1;
pub const PENSION_GROUP_MAX: u8 = 5;
pub const PENSION_DIGITS: usize = 6;

/// 6 main numbers plus a bonus number, all in 1..=45.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LottoNumbers {
    pub main: Vec<u8>,
    pub bonus: Option<u8>,
}

impl LottoNumbers {
    /// Shape check for manually selected numbers: exactly 6 unique values
    /// in range, bonus in range when present.
    pub fn validate(&self) -> Result<()> {
        if self.main.len() != LOTTO_MAIN_COUNT {
            return Err(LotteryError::invalid_selection(format!(
                "expected {} main numbers, got {}",
                LOTTO_MAIN_COUNT,
                self.main.len()
            )));
        }

        let mut seen = HashSet::new();
        for &n in &self.main {
            if !(LOTTO_MIN..=LOTTO_MAX).contains(&n) {
                return Err(LotteryError::invalid_selection(format!(
                    "main number {} out of range {}-{}",
                    n, LOTTO_MIN, LOTTO_MAX
                )));
            }
            if !seen.insert(n) {
                return Err(LotteryError::invalid_selection(format!(
                    "duplicate main number {}",
                    n
                )));
            }
        }

        if let Some(bonus) = self.bonus {
            if !(LOTTO_MIN..=LOTTO_MAX).contains(&bonus) {
                return Err(LotteryError::invalid_selection(format!(
                    "bonus number {} out of range {}-{}",
                    bonus, LOTTO_MIN, LOTTO_MAX
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LottoResult {
    pub winning_numbers: LottoNumbers,
    pub rank: u8,
    pub prize: u64,
    pub matching_numbers: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LottoTicket {
    pub id: Uuid,
    pub numbers: LottoNumbers,
    pub is_auto: bool,
    pub purchase_date: DateTime<Utc>,
    pub draw_date: DateTime<Utc>,
    pub result: Option<LottoResult>,
}

impl LottoTicket {
    pub fn prize_value(&self) -> u64 {
        self.result.as_ref().map_or(0, |r| r.prize)
    }

    pub fn is_winner(&self) -> bool {
        self.result.as_ref().map_or(false, |r| r.rank > 0)
    }
}

/// A single scratch field on a ticket. With eager reveal every symbol is
/// created already revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScratchSymbol {
    pub number: u8,
    pub revealed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScratchResult {
    pub matching_numbers: Vec<u8>,
    pub prize: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScratchTicket {
    pub id: Uuid,
    pub symbols: Vec<ScratchSymbol>,
    pub lucky_numbers: Vec<u8>,
    pub purchase_date: DateTime<Utc>,
    pub is_complete: bool,
    pub result: Option<ScratchResult>,
}

impl ScratchTicket {
    pub fn user_numbers(&self) -> Vec<u8> {
        self.symbols.iter().map(|s| s.number).collect()
    }

    pub fn prize_value(&self) -> u64 {
        self.result.as_ref().map_or(0, |r| r.prize)
    }

    pub fn is_winner(&self) -> bool {
        self.prize_value() > 0
    }
}

/// Group digit "1"-"5" plus a 6-digit number string. Leading zeros are
/// significant, so the number is kept as a string and compared per digit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionNumbers {
    pub group: String,
    pub number: String,
}

impl PensionNumbers {
    pub fn validate(&self) -> Result<()> {
        let group_ok = self.group.len() == 1
            && self.group.bytes().all(|b| {
                (b'0' + PENSION_GROUP_MIN..=b'0' + PENSION_GROUP_MAX).contains(&b)
            });
        if !group_ok {
            return Err(LotteryError::invalid_selection(format!(
                "group must be a single digit {}-{}, got {:?}",
                PENSION_GROUP_MIN, PENSION_GROUP_MAX, self.group
            )));
        }

        if self.number.len() != PENSION_DIGITS
            || !self.number.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(LotteryError::invalid_selection(format!(
                "number must be exactly {} digits, got {:?}",
                PENSION_DIGITS, self.number
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionResult {
    pub winning_numbers: PensionNumbers,
    pub rank: u8,
    pub monthly_prize: u64,
    pub total_prize: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PensionTicket {
    pub id: Uuid,
    pub numbers: PensionNumbers,
    pub is_auto: bool,
    pub purchase_date: DateTime<Utc>,
    pub draw_date: DateTime<Utc>,
    pub result: Option<PensionResult>,
}

impl PensionTicket {
    pub fn prize_value(&self) -> u64 {
        self.result.as_ref().map_or(0, |r| r.total_prize)
    }

    pub fn is_winner(&self) -> bool {
        self.result.as_ref().map_or(false, |r| r.rank > 0)
    }
}
