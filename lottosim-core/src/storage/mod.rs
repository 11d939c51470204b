pub mod memory;
pub mod ticket_store;

pub use memory::MemoryStore;
pub use ticket_store::TicketStore;

use crate::error::{LotteryError, Result};
use crate::types::{LottoTicket, PensionTicket, ScratchTicket};
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::Mutex;

/// Persistence boundary for the engine. Implementations upsert by ticket id
/// and list tickets ordered by purchase date descending. The core never
/// retries a failed call; errors bubble to the purchase caller.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn save_lotto(&self, ticket: &LottoTicket) -> Result<()>;
    async fn save_scratch(&self, ticket: &ScratchTicket) -> Result<()>;
    async fn save_pension(&self, ticket: &PensionTicket) -> Result<()>;

    async fn lotto_tickets(&self) -> Result<Vec<LottoTicket>>;
    async fn scratch_tickets(&self) -> Result<Vec<ScratchTicket>>;
    async fn pension_tickets(&self) -> Result<Vec<PensionTicket>>;

    async fn clear_all(&self) -> Result<()>;
}

pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub async fn new(db_path: &Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LotteryError::internal(format!("Failed to create directory: {}", e)))?;
        }

        let conn = Connection::open(db_path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };

        storage.init_schema().await?;
        Ok(storage)
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS lotto_tickets (
                id TEXT PRIMARY KEY,
                numbers TEXT NOT NULL,
                is_auto INTEGER NOT NULL,
                purchase_date INTEGER NOT NULL,
                draw_date INTEGER NOT NULL,
                result TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS scratch_tickets (
                id TEXT PRIMARY KEY,
                symbols TEXT NOT NULL,
                lucky_numbers TEXT NOT NULL,
                purchase_date INTEGER NOT NULL,
                is_complete INTEGER NOT NULL,
                result TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS pension_tickets (
                id TEXT PRIMARY KEY,
                numbers TEXT NOT NULL,
                is_auto INTEGER NOT NULL,
                purchase_date INTEGER NOT NULL,
                draw_date INTEGER NOT NULL,
                result TEXT
            )",
            [],
        )?;

        Ok(())
    }

    pub async fn get_connection(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}
