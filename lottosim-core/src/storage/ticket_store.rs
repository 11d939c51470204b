use crate::error::{LotteryError, Result};
use crate::storage::{Storage, TicketRepository};
use crate::types::{LottoTicket, PensionTicket, ScratchTicket};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::params;
use std::sync::Arc;
use uuid::Uuid;

/// SQLite-backed ticket repository. Structured fields are stored as JSON
/// text columns, timestamps as integer milliseconds.
pub struct TicketStore {
    storage: Arc<Storage>,
}

impl TicketStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|e| LotteryError::internal(format!("Invalid ticket id: {}", e)))
}

fn parse_timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}

#[async_trait]
impl TicketRepository for TicketStore {
    async fn save_lotto(&self, ticket: &LottoTicket) -> Result<()> {
        let conn = self.storage.get_connection().await;

        conn.execute(
            "INSERT OR REPLACE INTO lotto_tickets
                (id, numbers, is_auto, purchase_date, draw_date, result)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                ticket.id.to_string(),
                serde_json::to_string(&ticket.numbers)?,
                ticket.is_auto,
                ticket.purchase_date.timestamp_millis(),
                ticket.draw_date.timestamp_millis(),
                ticket
                    .result
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
            ],
        )?;

        Ok(())
    }

    async fn save_scratch(&self, ticket: &ScratchTicket) -> Result<()> {
        let conn = self.storage.get_connection().await;

        conn.execute(
            "INSERT OR REPLACE INTO scratch_tickets
                (id, symbols, lucky_numbers, purchase_date, is_complete, result)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                ticket.id.to_string(),
                serde_json::to_string(&ticket.symbols)?,
                serde_json::to_string(&ticket.lucky_numbers)?,
                ticket.purchase_date.timestamp_millis(),
                ticket.is_complete,
                ticket
                    .result
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
            ],
        )?;

        Ok(())
    }

    async fn save_pension(&self, ticket: &PensionTicket) -> Result<()> {
        let conn = self.storage.get_connection().await;

        conn.execute(
            "INSERT OR REPLACE INTO pension_tickets
                (id, numbers, is_auto, purchase_date, draw_date, result)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                ticket.id.to_string(),
                serde_json::to_string(&ticket.numbers)?,
                ticket.is_auto,
                ticket.purchase_date.timestamp_millis(),
                ticket.draw_date.timestamp_millis(),
                ticket
                    .result
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
            ],
        )?;

        Ok(())
    }

    async fn lotto_tickets(&self) -> Result<Vec<LottoTicket>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT id, numbers, is_auto, purchase_date, draw_date, result
             FROM lotto_tickets ORDER BY purchase_date DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;

        let mut tickets = Vec::new();
        for row in rows {
            let (id, numbers, is_auto, purchase_date, draw_date, result) = row?;
            tickets.push(LottoTicket {
                id: parse_id(&id)?,
                numbers: serde_json::from_str(&numbers)?,
                is_auto,
                purchase_date: parse_timestamp(purchase_date),
                draw_date: parse_timestamp(draw_date),
                result: result.as_deref().map(serde_json::from_str).transpose()?,
            });
        }

        Ok(tickets)
    }

    async fn scratch_tickets(&self) -> Result<Vec<ScratchTicket>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT id, symbols, lucky_numbers, purchase_date, is_complete, result
             FROM scratch_tickets ORDER BY purchase_date DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, bool>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;

        let mut tickets = Vec::new();
        for row in rows {
            let (id, symbols, lucky_numbers, purchase_date, is_complete, result) = row?;
            tickets.push(ScratchTicket {
                id: parse_id(&id)?,
                symbols: serde_json::from_str(&symbols)?,
                lucky_numbers: serde_json::from_str(&lucky_numbers)?,
                purchase_date: parse_timestamp(purchase_date),
                is_complete,
                result: result.as_deref().map(serde_json::from_str).transpose()?,
            });
        }

        Ok(tickets)
    }

    async fn pension_tickets(&self) -> Result<Vec<PensionTicket>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT id, numbers, is_auto, purchase_date, draw_date, result
             FROM pension_tickets ORDER BY purchase_date DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;

        let mut tickets = Vec::new();
        for row in rows {
            let (id, numbers, is_auto, purchase_date, draw_date, result) = row?;
            tickets.push(PensionTicket {
                id: parse_id(&id)?,
                numbers: serde_json::from_str(&numbers)?,
                is_auto,
                purchase_date: parse_timestamp(purchase_date),
                draw_date: parse_timestamp(draw_date),
                result: result.as_deref().map(serde_json::from_str).transpose()?,
            });
        }

        Ok(tickets)
    }

    async fn clear_all(&self) -> Result<()> {
        let conn = self.storage.get_connection().await;

        conn.execute("DELETE FROM lotto_tickets", [])?;
        conn.execute("DELETE FROM scratch_tickets", [])?;
        conn.execute("DELETE FROM pension_tickets", [])?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LottoNumbers, LottoResult};
    use tempfile::tempdir;

    fn sample_ticket() -> LottoTicket {
        let numbers = LottoNumbers {
            main: vec![3, 11, 17, 23, 31, 42],
            bonus: Some(8),
        };
        LottoTicket {
            id: Uuid::new_v4(),
            numbers: numbers.clone(),
            is_auto: true,
            purchase_date: Utc::now(),
            draw_date: Utc::now(),
            result: Some(LottoResult {
                winning_numbers: numbers,
                rank: 0,
                prize: 0,
                matching_numbers: vec![],
            }),
        }
    }

    #[tokio::test]
    async fn save_and_reload_round_trips() {
        let temp_dir = tempdir().unwrap();
        let storage = Arc::new(Storage::new(&temp_dir.path().join("test.db")).await.unwrap());
        let store = TicketStore::new(storage);

        let ticket = sample_ticket();
        store.save_lotto(&ticket).await.unwrap();

        let loaded = store.lotto_tickets().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, ticket.id);
        assert_eq!(loaded[0].numbers, ticket.numbers);
        assert_eq!(loaded[0].result, ticket.result);
    }

    #[tokio::test]
    async fn save_is_an_upsert() {
        let temp_dir = tempdir().unwrap();
        let storage = Arc::new(Storage::new(&temp_dir.path().join("test.db")).await.unwrap());
        let store = TicketStore::new(storage);

        let ticket = sample_ticket();
        store.save_lotto(&ticket).await.unwrap();
        store.save_lotto(&ticket).await.unwrap();

        assert_eq!(store.lotto_tickets().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clear_all_empties_every_table() {
        let temp_dir = tempdir().unwrap();
        let storage = Arc::new(Storage::new(&temp_dir.path().join("test.db")).await.unwrap());
        let store = TicketStore::new(storage);

        store.save_lotto(&sample_ticket()).await.unwrap();
        store.clear_all().await.unwrap();

        assert!(store.lotto_tickets().await.unwrap().is_empty());
    }
}
