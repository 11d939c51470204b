//! Session facade over the repository and factory.
//!
//! Keeps the in-memory ticket collections most-recent-first, recomputes
//! statistics from the full collections on demand, and owns the
//! export/import snapshot round-trip.

use crate::batch::BatchAbort;
use crate::config::SimConfig;
use crate::error::Result;
use crate::factory::TicketFactory;
use crate::stats::{PurchaseStats, StatsAggregator};
use crate::storage::{Storage, TicketRepository, TicketStore};
use crate::types::{
    Game, LottoNumbers, LottoTicket, PensionNumbers, PensionTicket, ScratchTicket,
};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Serializable snapshot of every ticket, for export and re-import.
/// Dates serialize as ISO-8601 strings.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataSnapshot {
    pub lotto_tickets: Vec<LottoTicket>,
    pub scratch_tickets: Vec<ScratchTicket>,
    pub pension_tickets: Vec<PensionTicket>,
    pub export_date: DateTime<Utc>,
}

pub struct LotteryManager {
    factory: TicketFactory,
    repository: Arc<dyn TicketRepository>,
    lotto: RwLock<Vec<LottoTicket>>,
    scratch: RwLock<Vec<ScratchTicket>>,
    pension: RwLock<Vec<PensionTicket>>,
}

impl LotteryManager {
    /// SQLite-backed manager with the default configuration.
    pub async fn new(data_dir: &Path) -> Result<Self> {
        let db_path = data_dir.join("lottosim.db");
        let storage = Arc::new(Storage::new(&db_path).await?);
        let repository: Arc<dyn TicketRepository> = Arc::new(TicketStore::new(storage));

        Self::with_repository(repository, SimConfig::default())
    }

    /// Manager over an explicit repository handle.
    pub fn with_repository(
        repository: Arc<dyn TicketRepository>,
        config: SimConfig,
    ) -> Result<Self> {
        let factory = TicketFactory::new(repository.clone(), config)?;

        Ok(Self {
            factory,
            repository,
            lotto: RwLock::new(Vec::new()),
            scratch: RwLock::new(Vec::new()),
            pension: RwLock::new(Vec::new()),
        })
    }

    /// Populate the in-memory collections from the repository,
    /// most-recent-first.
    pub async fn load_tickets(&self) -> Result<()> {
        let (lotto, scratch, pension) = tokio::try_join!(
            self.repository.lotto_tickets(),
            self.repository.scratch_tickets(),
            self.repository.pension_tickets(),
        )?;

        *self.lotto.write() = lotto;
        *self.scratch.write() = scratch;
        *self.pension.write() = pension;

        Ok(())
    }

    pub async fn purchase_lotto(
        &self,
        manual: Option<&LottoNumbers>,
        count: usize,
    ) -> Result<Vec<LottoTicket>> {
        let tickets = self.factory.purchase_lotto(manual, count).await?;
        prepend(&self.lotto, &tickets);
        Ok(tickets)
    }

    pub async fn purchase_lotto_batch<P>(
        &self,
        manual: Option<&LottoNumbers>,
        count: usize,
        on_progress: P,
        abort: Option<BatchAbort>,
    ) -> Result<Vec<LottoTicket>>
    where
        P: FnMut(usize, usize),
    {
        let tickets = self
            .factory
            .purchase_lotto_batch(manual, count, on_progress, abort)
            .await?;
        prepend(&self.lotto, &tickets);
        Ok(tickets)
    }

    pub async fn purchase_scratch(&self, count: usize) -> Result<Vec<ScratchTicket>> {
        let tickets = self.factory.purchase_scratch(count).await?;
        prepend(&self.scratch, &tickets);
        Ok(tickets)
    }

    pub async fn purchase_scratch_batch<P>(
        &self,
        count: usize,
        on_progress: P,
        abort: Option<BatchAbort>,
    ) -> Result<Vec<ScratchTicket>>
    where
        P: FnMut(usize, usize),
    {
        let tickets = self
            .factory
            .purchase_scratch_batch(count, on_progress, abort)
            .await?;
        prepend(&self.scratch, &tickets);
        Ok(tickets)
    }

    pub async fn purchase_pension(
        &self,
        manual: Option<&PensionNumbers>,
        count: usize,
    ) -> Result<Vec<PensionTicket>> {
        let tickets = self.factory.purchase_pension(manual, count).await?;
        prepend(&self.pension, &tickets);
        Ok(tickets)
    }

    pub async fn purchase_pension_batch<P>(
        &self,
        manual: Option<&PensionNumbers>,
        count: usize,
        on_progress: P,
        abort: Option<BatchAbort>,
    ) -> Result<Vec<PensionTicket>>
    where
        P: FnMut(usize, usize),
    {
        let tickets = self
            .factory
            .purchase_pension_batch(manual, count, on_progress, abort)
            .await?;
        prepend(&self.pension, &tickets);
        Ok(tickets)
    }

    /// Statistics for one game, recomputed from the full collection.
    pub fn stats(&self, game: Game) -> PurchaseStats {
        match game {
            Game::Lotto645 => StatsAggregator::lotto(&self.lotto.read()),
            Game::Speetto1000 => StatsAggregator::scratch(&self.scratch.read()),
            Game::Pension720 => StatsAggregator::pension(&self.pension.read()),
        }
    }

    /// Rollup across all three games.
    pub fn combined_stats(&self) -> PurchaseStats {
        let per_game: Vec<PurchaseStats> = Game::ALL.iter().map(|g| self.stats(*g)).collect();
        StatsAggregator::combined(per_game.iter())
    }

    pub fn lotto_tickets(&self) -> Vec<LottoTicket> {
        self.lotto.read().clone()
    }

    pub fn scratch_tickets(&self) -> Vec<ScratchTicket> {
        self.scratch.read().clone()
    }

    pub fn pension_tickets(&self) -> Vec<PensionTicket> {
        self.pension.read().clone()
    }

    /// Wipe the repository and the in-memory collections in one operation.
    pub async fn clear_all(&self) -> Result<()> {
        self.repository.clear_all().await?;

        self.lotto.write().clear();
        self.scratch.write().clear();
        self.pension.write().clear();

        tracing::info!("Cleared all ticket data");
        Ok(())
    }

    /// Pretty-JSON snapshot of every stored ticket.
    pub async fn export_data(&self) -> Result<String> {
        let (lotto_tickets, scratch_tickets, pension_tickets) = tokio::try_join!(
            self.repository.lotto_tickets(),
            self.repository.scratch_tickets(),
            self.repository.pension_tickets(),
        )?;

        let snapshot = DataSnapshot {
            lotto_tickets,
            scratch_tickets,
            pension_tickets,
            export_date: Utc::now(),
        };

        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Persist a snapshot's tickets and reload the collections. Importing
    /// an export into an empty store reproduces identical statistics.
    pub async fn import_data(&self, json: &str) -> Result<()> {
        let snapshot: DataSnapshot = serde_json::from_str(json)?;

        for ticket in &snapshot.lotto_tickets {
            self.repository.save_lotto(ticket).await?;
        }
        for ticket in &snapshot.scratch_tickets {
            self.repository.save_scratch(ticket).await?;
        }
        for ticket in &snapshot.pension_tickets {
            self.repository.save_pension(ticket).await?;
        }

        tracing::info!(
            "Imported {} lotto, {} scratch, {} pension ticket(s)",
            snapshot.lotto_tickets.len(),
            snapshot.scratch_tickets.len(),
            snapshot.pension_tickets.len()
        );

        self.load_tickets().await
    }

    pub fn seed_fingerprint(&self) -> String {
        self.factory.seed_fingerprint()
    }
}

/// Merge freshly created tickets in front of the cached collection: batch
/// in creation order, batch before everything older.
fn prepend<T: Clone>(cache: &RwLock<Vec<T>>, tickets: &[T]) {
    let mut cache = cache.write();
    let mut merged = Vec::with_capacity(tickets.len() + cache.len());
    merged.extend_from_slice(tickets);
    merged.append(&mut cache);
    *cache = merged;
}
