//! Port interfaces for backend collaborators
//!
//! These traits define the boundaries between core business logic and
//! infrastructure implementations. The REST adapter in `tpedesk-infra`
//! implements them; tests substitute in-memory fakes.

use async_trait::async_trait;
use tpedesk_domain::{
    ActorContext, Client, DeadStockItem, PendingUpload, Result, StockLevels, Ticket, TicketPatch,
};

/// Operations on tickets and their attachments
#[async_trait]
pub trait TicketGateway: Send + Sync {
    /// Fetch a ticket; supplies the initial confirmed snapshot of a session
    async fn fetch_ticket(&self, id: &str) -> Result<Ticket>;

    /// Persist a draft session's working snapshot as a new ticket
    async fn create_ticket(&self, actor: &ActorContext, draft: &Ticket) -> Result<Ticket>;

    /// Apply a minimal field patch plus staged uploads in one logical
    /// submission; idempotent under identical patches. Returns the
    /// refreshed ticket.
    async fn update_ticket(
        &self,
        actor: &ActorContext,
        id: &str,
        patch: &TicketPatch,
        files: &[PendingUpload],
    ) -> Result<Ticket>;

    /// Irreversibly complete a ticket; the server stamps the completion
    /// date. Distinct from the general update path.
    async fn close_ticket(&self, actor: &ActorContext, id: &str) -> Result<()>;

    /// Assign an owning bank; returns the refreshed ticket
    async fn assign_bank(&self, actor: &ActorContext, ticket_id: &str, bank_id: &str)
        -> Result<Ticket>;

    /// Delete a confirmed attachment
    async fn delete_attachment(&self, ticket_id: &str, attachment_id: &str) -> Result<()>;

    /// Download a confirmed attachment's content
    async fn download_attachment(&self, ticket_id: &str, attachment_id: &str) -> Result<Vec<u8>>;
}

/// Read-only inventory lookups
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    /// Known consumable stock; feeds the validator's soft check
    async fn fetch_known_stock(&self) -> Result<StockLevels>;

    /// Existing clients of a bank; feeds reference-mode client selection
    /// for deblocking orders
    async fn fetch_clients_for_bank(&self, bank_id: &str) -> Result<Vec<Client>>;

    /// Decommissioned terminal inventory
    async fn fetch_dead_stock(&self) -> Result<Vec<DeadStockItem>>;
}
