use crate::error::Result;
use crate::storage::TicketRepository;
use crate::types::{LottoTicket, PensionTicket, ScratchTicket};
use async_trait::async_trait;
use parking_lot::RwLock;

/// In-memory ticket repository for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    lotto: Vec<LottoTicket>,
    scratch: Vec<ScratchTicket>,
    pension: Vec<PensionTicket>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn upsert<T, F>(tickets: &mut Vec<T>, ticket: T, same_id: F)
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    match tickets.iter_mut().find(|t| same_id(t)) {
        Some(existing) => *existing = ticket,
        None => tickets.push(ticket),
    }
}

#[async_trait]
impl TicketRepository for MemoryStore {
    async fn save_lotto(&self, ticket: &LottoTicket) -> Result<()> {
        let mut inner = self.inner.write();
        upsert(&mut inner.lotto, ticket.clone(), |t| t.id == ticket.id);
        Ok(())
    }

    async fn save_scratch(&self, ticket: &ScratchTicket) -> Result<()> {
        let mut inner = self.inner.write();
        upsert(&mut inner.scratch, ticket.clone(), |t| t.id == ticket.id);
        Ok(())
    }

    async fn save_pension(&self, ticket: &PensionTicket) -> Result<()> {
        let mut inner = self.inner.write();
        upsert(&mut inner.pension, ticket.clone(), |t| t.id == ticket.id);
        Ok(())
    }

    async fn lotto_tickets(&self) -> Result<Vec<LottoTicket>> {
        let mut tickets = self.inner.read().lotto.clone();
        tickets.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        Ok(tickets)
    }

    async fn scratch_tickets(&self) -> Result<Vec<ScratchTicket>> {
        let mut tickets = self.inner.read().scratch.clone();
        tickets.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        Ok(tickets)
    }

    async fn pension_tickets(&self) -> Result<Vec<PensionTicket>> {
        let mut tickets = self.inner.read().pension.clone();
        tickets.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        Ok(tickets)
    }

    async fn clear_all(&self) -> Result<()> {
        let mut inner = self.inner.write();
        inner.lotto.clear();
        inner.scratch.clear();
        inner.pension.clear();
        Ok(())
    }
}
