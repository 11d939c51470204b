//! Aggregate purchase statistics.
//!
//! Stats are derived only: they are recomputed from the full ticket
//! collection after every change and never mutated independently. The
//! reductions are commutative, so recomputation is order-independent and
//! idempotent.

use crate::types::{Game, LottoTicket, PensionTicket, ScratchTicket};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PurchaseStats {
    pub total_spent: u64,
    pub total_won: u64,
    pub total_tickets: usize,
    pub win_count: usize,
    /// Winning tickets as a percentage of all tickets.
    pub win_rate: f64,
    /// Net return as a percentage of spend.
    pub roi: f64,
}

impl PurchaseStats {
    fn from_totals(total_tickets: usize, win_count: usize, total_spent: u64, total_won: u64) -> Self {
        let win_rate = if total_tickets > 0 {
            win_count as f64 / total_tickets as f64 * 100.0
        } else {
            0.0
        };

        let roi = if total_spent > 0 {
            (total_won as f64 - total_spent as f64) / total_spent as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_spent,
            total_won,
            total_tickets,
            win_count,
            win_rate,
            roi,
        }
    }
}

pub struct StatsAggregator;

impl StatsAggregator {
    pub fn lotto(tickets: &[LottoTicket]) -> PurchaseStats {
        PurchaseStats::from_totals(
            tickets.len(),
            tickets.iter().filter(|t| t.is_winner()).count(),
            tickets.len() as u64 * Game::Lotto645.unit_price(),
            tickets.iter().map(|t| t.prize_value()).sum(),
        )
    }

    pub fn scratch(tickets: &[ScratchTicket]) -> PurchaseStats {
        PurchaseStats::from_totals(
            tickets.len(),
            tickets.iter().filter(|t| t.is_winner()).count(),
            tickets.len() as u64 * Game::Speetto1000.unit_price(),
            tickets.iter().map(|t| t.prize_value()).sum(),
        )
    }

    pub fn pension(tickets: &[PensionTicket]) -> PurchaseStats {
        PurchaseStats::from_totals(
            tickets.len(),
            tickets.iter().filter(|t| t.is_winner()).count(),
            tickets.len() as u64 * Game::Pension720.unit_price(),
            tickets.iter().map(|t| t.prize_value()).sum(),
        )
    }

    /// Rollup across games. Raw totals are summed and the rates re-derived
    /// from the sums; percentages are never averaged.
    pub fn combined<'a>(stats: impl IntoIterator<Item = &'a PurchaseStats>) -> PurchaseStats {
        let mut total_tickets = 0;
        let mut win_count = 0;
        let mut total_spent = 0;
        let mut total_won = 0;

        for s in stats {
            total_tickets += s.total_tickets;
            win_count += s.win_count;
            total_spent += s.total_spent;
            total_won += s.total_won;
        }

        PurchaseStats::from_totals(total_tickets, win_count, total_spent, total_won)
    }
}
