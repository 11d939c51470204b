//! lottosim - client-only lottery simulator engine
//!
//! This library provides ticket generation, outcome scoring, and statistics
//! aggregation for three simulated games, backed by a cryptographically
//! secure random source and a pluggable local ticket store.

pub mod batch;
pub mod config;
pub mod error;
pub mod factory;
pub mod manager;
pub mod random;
pub mod rules;
pub mod stats;
pub mod storage;
pub mod types;

pub use batch::{BatchAbort, BatchScheduler};
pub use config::SimConfig;
pub use error::{LotteryError, Result};
pub use factory::TicketFactory;
pub use manager::{DataSnapshot, LotteryManager};
pub use random::SecureRandom;
pub use rules::PrizePolicy;
pub use stats::{PurchaseStats, StatsAggregator};
pub use storage::{MemoryStore, TicketRepository, TicketStore};
pub use types::{
    Game, LottoNumbers, LottoResult, LottoTicket, PensionNumbers, PensionResult, PensionTicket,
    ScratchResult, ScratchSymbol, ScratchTicket,
};
