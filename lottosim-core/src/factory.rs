//! Ticket construction and purchase flows.
//!
//! The factory generates (or validates) player numbers, draws winning
//! numbers independently from the same secure source, scores the outcome,
//! and persists each ticket through the repository handle. Validation runs
//! before any random draw or write, so invalid requests have no side
//! effects.

use crate::batch::{BatchAbort, BatchScheduler};
use crate::config::SimConfig;
use crate::error::{LotteryError, Result};
use crate::random::SecureRandom;
use crate::rules;
use crate::storage::TicketRepository;
use crate::types::{
    LottoNumbers, LottoTicket, PensionNumbers, PensionTicket, ScratchSymbol, ScratchTicket,
    LOTTO_MAIN_COUNT, LOTTO_MAX, LOTTO_MIN, PENSION_GROUP_MAX, PENSION_GROUP_MIN,
    SCRATCH_MAX, SCRATCH_MIN, SCRATCH_USER_COUNT,
};
use chrono::{Duration, Utc};
use futures::future::try_join_all;
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

pub struct TicketFactory {
    random: Mutex<SecureRandom>,
    config: SimConfig,
    repository: Arc<dyn TicketRepository>,
}

impl TicketFactory {
    pub fn new(repository: Arc<dyn TicketRepository>, config: SimConfig) -> Result<Self> {
        Self::with_random(repository, config, SecureRandom::new())
    }

    /// Factory with an explicit random source, the testing seam for
    /// deterministic draws.
    pub fn with_random(
        repository: Arc<dyn TicketRepository>,
        config: SimConfig,
        random: SecureRandom,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            random: Mutex::new(random),
            config,
            repository,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed_fingerprint(&self) -> String {
        self.random.lock().seed_fingerprint()
    }

    pub fn generate_lotto_numbers(&self) -> Result<LottoNumbers> {
        let mut random = self.random.lock();
        let main = random
            .unique_random_ints(LOTTO_MAIN_COUNT, LOTTO_MIN as u32, LOTTO_MAX as u32)?
            .into_iter()
            .map(|n| n as u8)
            .collect();
        let bonus = random.random_int(LOTTO_MIN as u32, LOTTO_MAX as u32)? as u8;

        Ok(LottoNumbers {
            main,
            bonus: Some(bonus),
        })
    }

    pub fn generate_scratch_numbers(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        let mut random = self.random.lock();
        let user_numbers = random
            .unique_random_ints(SCRATCH_USER_COUNT, SCRATCH_MIN as u32, SCRATCH_MAX as u32)?
            .into_iter()
            .map(|n| n as u8)
            .collect();
        let lucky_numbers = vec![random.random_int(SCRATCH_MIN as u32, SCRATCH_MAX as u32)? as u8];

        Ok((user_numbers, lucky_numbers))
    }

    pub fn generate_pension_numbers(&self) -> Result<PensionNumbers> {
        let mut random = self.random.lock();
        let group = random
            .random_int(PENSION_GROUP_MIN as u32, PENSION_GROUP_MAX as u32)?
            .to_string();
        let number = random.random_int(100_000, 999_999)?.to_string();

        Ok(PensionNumbers { group, number })
    }

    fn build_lotto_ticket(&self, manual: Option<&LottoNumbers>) -> Result<LottoTicket> {
        let numbers = match manual {
            Some(numbers) => numbers.clone(),
            None => self.generate_lotto_numbers()?,
        };

        // The draw is simulated immediately, independent of the player's
        // selection.
        let winning_numbers = self.generate_lotto_numbers()?;
        let roll = self.random.lock().random_unit();
        let result = rules::lotto::score(&numbers, &winning_numbers, self.config.prize_policy, roll);

        let now = Utc::now();
        Ok(LottoTicket {
            id: Uuid::new_v4(),
            numbers,
            is_auto: manual.is_none(),
            purchase_date: now,
            draw_date: now + Duration::days(7),
            result: Some(result),
        })
    }

    fn build_scratch_ticket(&self) -> Result<ScratchTicket> {
        let (user_numbers, lucky_numbers) = self.generate_scratch_numbers()?;
        let roll = self.random.lock().random_unit();
        let result = rules::scratch::score(&user_numbers, &lucky_numbers, roll);

        // Eager reveal: the outcome is fixed at generation, so every symbol
        // starts revealed and the ticket is complete.
        Ok(ScratchTicket {
            id: Uuid::new_v4(),
            symbols: user_numbers
                .into_iter()
                .map(|number| ScratchSymbol {
                    number,
                    revealed: true,
                })
                .collect(),
            lucky_numbers,
            purchase_date: Utc::now(),
            is_complete: true,
            result: Some(result),
        })
    }

    fn build_pension_ticket(&self, manual: Option<&PensionNumbers>) -> Result<PensionTicket> {
        let numbers = match manual {
            Some(numbers) => numbers.clone(),
            None => self.generate_pension_numbers()?,
        };

        let winning_numbers = self.generate_pension_numbers()?;
        let result = rules::pension::score(&numbers, &winning_numbers);

        let now = Utc::now();
        Ok(PensionTicket {
            id: Uuid::new_v4(),
            numbers,
            is_auto: manual.is_none(),
            purchase_date: now,
            draw_date: now + Duration::days(7),
            result: Some(result),
        })
    }

    fn validate_count(count: usize) -> Result<()> {
        if count == 0 {
            return Err(LotteryError::invalid_selection("count must be at least 1"));
        }
        Ok(())
    }

    pub async fn purchase_lotto(
        &self,
        manual: Option<&LottoNumbers>,
        count: usize,
    ) -> Result<Vec<LottoTicket>> {
        Self::validate_count(count)?;
        if let Some(numbers) = manual {
            numbers.validate()?;
        }

        let mut tickets = Vec::with_capacity(count);
        for _ in 0..count {
            let ticket = self.build_lotto_ticket(manual)?;
            self.repository.save_lotto(&ticket).await?;
            tickets.push(ticket);
        }

        tracing::info!("Purchased {} lotto ticket(s)", tickets.len());
        Ok(tickets)
    }

    pub async fn purchase_lotto_batch<P>(
        &self,
        manual: Option<&LottoNumbers>,
        count: usize,
        mut on_progress: P,
        abort: Option<BatchAbort>,
    ) -> Result<Vec<LottoTicket>>
    where
        P: FnMut(usize, usize),
    {
        Self::validate_count(count)?;
        if let Some(numbers) = manual {
            numbers.validate()?;
        }

        if count <= self.config.batch_threshold {
            let tickets = self.purchase_lotto(manual, count).await?;
            on_progress(count, count);
            return Ok(tickets);
        }

        let scheduler = BatchScheduler::new(self.config.chunk_size);
        let tickets = scheduler
            .run(
                count,
                abort,
                |chunk| self.lotto_chunk(manual, chunk.len),
                on_progress,
            )
            .await?;

        tracing::info!("Purchased {} lotto ticket(s) in batch", tickets.len());
        Ok(tickets)
    }

    async fn lotto_chunk(
        &self,
        manual: Option<&LottoNumbers>,
        len: usize,
    ) -> Result<Vec<LottoTicket>> {
        let mut tickets = Vec::with_capacity(len);
        for _ in 0..len {
            tickets.push(self.build_lotto_ticket(manual)?);
        }

        // Chunk-member writes run concurrently, awaited together.
        try_join_all(tickets.iter().map(|t| self.repository.save_lotto(t))).await?;
        Ok(tickets)
    }

    pub async fn purchase_scratch(&self, count: usize) -> Result<Vec<ScratchTicket>> {
        Self::validate_count(count)?;

        let mut tickets = Vec::with_capacity(count);
        for _ in 0..count {
            let ticket = self.build_scratch_ticket()?;
            self.repository.save_scratch(&ticket).await?;
            tickets.push(ticket);
        }

        tracing::info!("Purchased {} scratch ticket(s)", tickets.len());
        Ok(tickets)
    }

    pub async fn purchase_scratch_batch<P>(
        &self,
        count: usize,
        mut on_progress: P,
        abort: Option<BatchAbort>,
    ) -> Result<Vec<ScratchTicket>>
    where
        P: FnMut(usize, usize),
    {
        Self::validate_count(count)?;

        if count <= self.config.batch_threshold {
            let tickets = self.purchase_scratch(count).await?;
            on_progress(count, count);
            return Ok(tickets);
        }

        let scheduler = BatchScheduler::new(self.config.chunk_size);
        let tickets = scheduler
            .run(count, abort, |chunk| self.scratch_chunk(chunk.len), on_progress)
            .await?;

        tracing::info!("Purchased {} scratch ticket(s) in batch", tickets.len());
        Ok(tickets)
    }

    async fn scratch_chunk(&self, len: usize) -> Result<Vec<ScratchTicket>> {
        let mut tickets = Vec::with_capacity(len);
        for _ in 0..len {
            tickets.push(self.build_scratch_ticket()?);
        }

        try_join_all(tickets.iter().map(|t| self.repository.save_scratch(t))).await?;
        Ok(tickets)
    }

    pub async fn purchase_pension(
        &self,
        manual: Option<&PensionNumbers>,
        count: usize,
    ) -> Result<Vec<PensionTicket>> {
        Self::validate_count(count)?;
        if let Some(numbers) = manual {
            numbers.validate()?;
        }

        let mut tickets = Vec::with_capacity(count);
        for _ in 0..count {
            let ticket = self.build_pension_ticket(manual)?;
            self.repository.save_pension(&ticket).await?;
            tickets.push(ticket);
        }

        tracing::info!("Purchased {} pension ticket(s)", tickets.len());
        Ok(tickets)
    }

    pub async fn purchase_pension_batch<P>(
        &self,
        manual: Option<&PensionNumbers>,
        count: usize,
        mut on_progress: P,
        abort: Option<BatchAbort>,
    ) -> Result<Vec<PensionTicket>>
    where
        P: FnMut(usize, usize),
    {
        Self::validate_count(count)?;
        if let Some(numbers) = manual {
            numbers.validate()?;
        }

        if count <= self.config.batch_threshold {
            let tickets = self.purchase_pension(manual, count).await?;
            on_progress(count, count);
            return Ok(tickets);
        }

        let scheduler = BatchScheduler::new(self.config.chunk_size);
        let tickets = scheduler
            .run(
                count,
                abort,
                |chunk| self.pension_chunk(manual, chunk.len),
                on_progress,
            )
            .await?;

        tracing::info!("Purchased {} pension ticket(s) in batch", tickets.len());
        Ok(tickets)
    }

    async fn pension_chunk(
        &self,
        manual: Option<&PensionNumbers>,
        len: usize,
    ) -> Result<Vec<PensionTicket>> {
        let mut tickets = Vec::with_capacity(len);
        for _ in 0..len {
            tickets.push(self.build_pension_ticket(manual)?);
        }

        try_join_all(tickets.iter().map(|t| self.repository.save_pension(t))).await?;
        Ok(tickets)
    }
}

impl std::fmt::Debug for TicketFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn factory(repository: Arc<dyn TicketRepository>) -> TicketFactory {
        TicketFactory::new(repository, SimConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn auto_lotto_tickets_have_valid_shapes() {
        let store = Arc::new(MemoryStore::new());
        let factory = factory(store.clone());

        let tickets = factory.purchase_lotto(None, 5).await.unwrap();
        assert_eq!(tickets.len(), 5);

        for ticket in &tickets {
            assert!(ticket.is_auto);
            assert!(ticket.numbers.validate().is_ok());
            let result = ticket.result.as_ref().unwrap();
            assert!(result.winning_numbers.validate().is_ok());
        }

        assert_eq!(store.lotto_tickets().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn manual_lotto_keeps_the_selection() {
        let store = Arc::new(MemoryStore::new());
        let factory = factory(store);

        let manual = LottoNumbers {
            main: vec![1, 2, 3, 4, 5, 6],
            bonus: Some(7),
        };
        let tickets = factory.purchase_lotto(Some(&manual), 2).await.unwrap();

        assert!(tickets.iter().all(|t| !t.is_auto && t.numbers == manual));
    }

    #[tokio::test]
    async fn invalid_selection_fails_before_any_write() {
        let store = Arc::new(MemoryStore::new());
        let factory = factory(store.clone());

        let manual = LottoNumbers {
            main: vec![1, 2, 3, 4, 5, 5],
            bonus: None,
        };
        let result = factory.purchase_lotto(Some(&manual), 3).await;

        assert!(matches!(result, Err(LotteryError::InvalidSelection(_))));
        assert!(store.lotto_tickets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_count_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let factory = factory(store);
        assert!(factory.purchase_lotto(None, 0).await.is_err());
    }

    #[tokio::test]
    async fn scratch_tickets_are_eagerly_revealed() {
        let store = Arc::new(MemoryStore::new());
        let factory = factory(store);

        let tickets = factory.purchase_scratch(10).await.unwrap();
        for ticket in &tickets {
            assert!(ticket.is_complete);
            assert!(ticket.symbols.iter().all(|s| s.revealed));
            assert_eq!(ticket.symbols.len(), SCRATCH_USER_COUNT);
            assert_eq!(ticket.lucky_numbers.len(), 1);

            let result = ticket.result.as_ref().unwrap();
            let has_match = !result.matching_numbers.is_empty();
            assert_eq!(has_match, result.prize > 0);
        }
    }

    #[tokio::test]
    async fn pension_numbers_have_the_right_shape() {
        let store = Arc::new(MemoryStore::new());
        let factory = factory(store);

        let tickets = factory.purchase_pension(None, 5).await.unwrap();
        for ticket in &tickets {
            assert!(ticket.numbers.validate().is_ok());
            assert!(ticket.result.is_some());
        }
    }

    #[tokio::test]
    async fn batch_reports_progress_at_chunk_boundaries() {
        let store = Arc::new(MemoryStore::new());
        let factory = factory(store.clone());

        let mut progress = Vec::new();
        let tickets = factory
            .purchase_lotto_batch(None, 237, |completed, total| progress.push((completed, total)), None)
            .await
            .unwrap();

        assert_eq!(tickets.len(), 237);
        assert_eq!(
            progress,
            vec![(50, 237), (100, 237), (150, 237), (200, 237), (237, 237)]
        );
        assert_eq!(store.lotto_tickets().await.unwrap().len(), 237);
    }

    #[tokio::test]
    async fn small_batch_falls_through_with_a_single_progress_call() {
        let store = Arc::new(MemoryStore::new());
        let factory = factory(store);

        let mut progress = Vec::new();
        let tickets = factory
            .purchase_scratch_batch(7, |completed, total| progress.push((completed, total)), None)
            .await
            .unwrap();

        assert_eq!(tickets.len(), 7);
        assert_eq!(progress, vec![(7, 7)]);
    }

    #[tokio::test]
    async fn abort_keeps_already_persisted_chunks() {
        let store = Arc::new(MemoryStore::new());
        let factory = factory(store.clone());

        let abort = BatchAbort::new();
        let abort_handle = abort.clone();
        let result = factory
            .purchase_lotto_batch(
                None,
                237,
                move |completed, _| {
                    if completed == 100 {
                        abort_handle.abort();
                    }
                },
                Some(abort),
            )
            .await;

        match result {
            Err(LotteryError::BatchAborted { completed, total }) => {
                assert_eq!(completed, 100);
                assert_eq!(total, 237);
            }
            other => panic!("expected BatchAborted, got {:?}", other.map(|t| t.len())),
        }

        assert_eq!(store.lotto_tickets().await.unwrap().len(), 100);
    }

    /// Repository that starts failing after a fixed number of writes.
    struct FlakyStore {
        inner: MemoryStore,
        saves: AtomicUsize,
        fail_after: usize,
    }

    impl FlakyStore {
        fn new(fail_after: usize) -> Self {
            Self {
                inner: MemoryStore::new(),
                saves: AtomicUsize::new(0),
                fail_after,
            }
        }

        fn check(&self) -> Result<()> {
            if self.saves.fetch_add(1, Ordering::SeqCst) >= self.fail_after {
                return Err(LotteryError::internal("storage full"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl TicketRepository for FlakyStore {
        async fn save_lotto(&self, ticket: &LottoTicket) -> Result<()> {
            self.check()?;
            self.inner.save_lotto(ticket).await
        }

        async fn save_scratch(&self, ticket: &ScratchTicket) -> Result<()> {
            self.check()?;
            self.inner.save_scratch(ticket).await
        }

        async fn save_pension(&self, ticket: &PensionTicket) -> Result<()> {
            self.check()?;
            self.inner.save_pension(ticket).await
        }

        async fn lotto_tickets(&self) -> Result<Vec<LottoTicket>> {
            self.inner.lotto_tickets().await
        }

        async fn scratch_tickets(&self) -> Result<Vec<ScratchTicket>> {
            self.inner.scratch_tickets().await
        }

        async fn pension_tickets(&self) -> Result<Vec<PensionTicket>> {
            self.inner.pension_tickets().await
        }

        async fn clear_all(&self) -> Result<()> {
            self.inner.clear_all().await
        }
    }

    #[tokio::test]
    async fn storage_failure_aborts_the_remaining_batch() {
        let store = Arc::new(FlakyStore::new(60));
        let factory = factory(store.clone());

        let result = factory.purchase_lotto_batch(None, 237, |_, _| {}, None).await;
        assert!(result.is_err());

        // The first chunk landed in full; the failing chunk stays partial
        // and nothing later was attempted.
        let persisted = store.lotto_tickets().await.unwrap().len();
        assert!((50..=60).contains(&persisted), "persisted {}", persisted);
    }

    #[tokio::test]
    async fn seeded_factories_draw_identical_numbers() {
        let a = TicketFactory::with_random(
            Arc::new(MemoryStore::new()),
            SimConfig::default(),
            SecureRandom::with_source(StdRng::seed_from_u64(99)),
        )
        .unwrap();
        let b = TicketFactory::with_random(
            Arc::new(MemoryStore::new()),
            SimConfig::default(),
            SecureRandom::with_source(StdRng::seed_from_u64(99)),
        )
        .unwrap();

        for _ in 0..10 {
            assert_eq!(
                a.generate_lotto_numbers().unwrap(),
                b.generate_lotto_numbers().unwrap()
            );
        }
    }
}
