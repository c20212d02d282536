//! Shared test support: an in-memory programmable gateway and ticket
//! builders used across the session integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tpedesk_core::{InventoryGateway, TicketGateway};
use tpedesk_domain::patch::keys;
use tpedesk_domain::{
    ActorContext, ActorRole, Attachment, Client, ClientLink, ConsumableLine, DeadStockItem,
    Location, NoticeConfig, PendingUpload, Result, StockLevels, Terminal, Ticket, TicketDetails,
    TicketPatch, TicketStatus, TpeDeskError,
};

/// In-memory gateway with programmable failures and call recording
#[derive(Default)]
pub struct MockGateway {
    pub ticket: Mutex<Option<Ticket>>,
    pub stock: Mutex<StockLevels>,
    pub update_calls: AtomicUsize,
    pub fail_update: Mutex<Option<TpeDeskError>>,
    pub fail_delete: Mutex<Option<TpeDeskError>>,
    pub last_patch: Mutex<Option<TicketPatch>>,
    pub last_filenames: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn with_ticket(ticket: Ticket) -> Arc<Self> {
        let gateway = Self::default();
        *gateway.ticket.lock().unwrap() = Some(ticket);
        Arc::new(gateway)
    }

    pub fn set_stock(&self, kind: &str, available: u32) {
        self.stock.lock().unwrap().set(kind, available);
    }

    pub fn fail_next_update(&self, err: TpeDeskError) {
        *self.fail_update.lock().unwrap() = Some(err);
    }

    pub fn fail_next_delete(&self, err: TpeDeskError) {
        *self.fail_delete.lock().unwrap() = Some(err);
    }

    fn stored_ticket(&self) -> Result<Ticket> {
        self.ticket
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TpeDeskError::NotFound("no ticket configured".into()))
    }

    /// Naive server-side patch application, enough for tests to observe
    /// the refreshed snapshot
    fn apply_patch(ticket: &mut Ticket, patch: &TicketPatch, files: &[PendingUpload]) {
        if let Some(notes) = patch.get(keys::NOTES).and_then(|v| v.as_str()) {
            ticket.notes = notes.to_string();
        }
        if let Some(status) = patch.get(keys::STATUS) {
            if let Ok(status) = serde_json::from_value(status.clone()) {
                ticket.status = status;
            }
        }
        for file in files {
            ticket.attachments.push(Attachment {
                id: format!("att-{}", file.filename),
                filename: file.filename.clone(),
                size: file.content.len() as u64,
            });
        }
    }
}

#[async_trait]
impl TicketGateway for MockGateway {
    async fn fetch_ticket(&self, _id: &str) -> Result<Ticket> {
        self.stored_ticket()
    }

    async fn create_ticket(&self, _actor: &ActorContext, draft: &Ticket) -> Result<Ticket> {
        let mut created = draft.clone();
        created.id = "tk-created".into();
        *self.ticket.lock().unwrap() = Some(created.clone());
        Ok(created)
    }

    async fn update_ticket(
        &self,
        _actor: &ActorContext,
        _id: &str,
        patch: &TicketPatch,
        files: &[PendingUpload],
    ) -> Result<Ticket> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_patch.lock().unwrap() = Some(patch.clone());
        *self.last_filenames.lock().unwrap() =
            files.iter().map(|f| f.filename.clone()).collect();

        if let Some(err) = self.fail_update.lock().unwrap().take() {
            return Err(err);
        }

        let mut ticket = self.stored_ticket()?;
        Self::apply_patch(&mut ticket, patch, files);
        *self.ticket.lock().unwrap() = Some(ticket.clone());
        Ok(ticket)
    }

    async fn close_ticket(&self, _actor: &ActorContext, _id: &str) -> Result<()> {
        if let Some(ticket) = self.ticket.lock().unwrap().as_mut() {
            ticket.status = TicketStatus::Completed;
            ticket.completed_date = Some(chrono::Utc::now());
        }
        Ok(())
    }

    async fn assign_bank(
        &self,
        _actor: &ActorContext,
        _ticket_id: &str,
        bank_id: &str,
    ) -> Result<Ticket> {
        let mut ticket = self.stored_ticket()?;
        ticket.bank = Some(tpedesk_domain::Bank { id: bank_id.into(), name: "Bank".into() });
        *self.ticket.lock().unwrap() = Some(ticket.clone());
        Ok(ticket)
    }

    async fn delete_attachment(&self, _ticket_id: &str, attachment_id: &str) -> Result<()> {
        if let Some(err) = self.fail_delete.lock().unwrap().take() {
            return Err(err);
        }
        if let Some(ticket) = self.ticket.lock().unwrap().as_mut() {
            ticket.attachments.retain(|a| a.id != attachment_id);
        }
        Ok(())
    }

    async fn download_attachment(&self, _ticket_id: &str, _attachment_id: &str) -> Result<Vec<u8>> {
        Ok(b"content".to_vec())
    }
}

#[async_trait]
impl InventoryGateway for MockGateway {
    async fn fetch_known_stock(&self) -> Result<StockLevels> {
        Ok(self.stock.lock().unwrap().clone())
    }

    async fn fetch_clients_for_bank(&self, _bank_id: &str) -> Result<Vec<Client>> {
        Ok(vec![sample_client()])
    }

    async fn fetch_dead_stock(&self) -> Result<Vec<DeadStockItem>> {
        Ok(vec![])
    }
}

pub fn actor() -> ActorContext {
    ActorContext::new("u-1", ActorRole::Agent)
}

pub fn fast_notices() -> NoticeConfig {
    NoticeConfig { success_ms: 5, error_ms: 5 }
}

pub fn sample_client() -> Client {
    Client {
        id: Some("cl-7".into()),
        name: "Boulangerie Amine".into(),
        brand: "Amine".into(),
        phone: "0215554433".into(),
        mobile: "0661234567".into(),
        location: Location {
            wilaya: "Alger".into(),
            daira: "Bab El Oued".into(),
            address: "12 rue des Frères".into(),
        },
    }
}

pub fn sample_terminal() -> Terminal {
    Terminal {
        manufacturer: "Ingenico".into(),
        model: "iWL250".into(),
        serial_number: "SN-0042".into(),
    }
}

pub fn network_check_ticket() -> Ticket {
    let mut ticket =
        Ticket::draft(ClientLink::Inline(sample_client()), TicketDetails::NetworkCheck);
    ticket.id = "tk-1".into();
    ticket.notes = "line drops at noon".into();
    ticket
}

pub fn consumable_ticket() -> Ticket {
    let mut ticket = Ticket::draft(
        ClientLink::Inline(sample_client()),
        TicketDetails::Consumable {
            terminal: sample_terminal(),
            items: vec![ConsumableLine::new("thermal_paper", 4)],
        },
    );
    ticket.id = "tk-2".into();
    ticket
}

pub fn ticket_with_attachments() -> Ticket {
    let mut ticket = network_check_ticket();
    ticket.attachments = vec![
        Attachment { id: "att-1".into(), filename: "contract.pdf".into(), size: 2048 },
        Attachment { id: "att-2".into(), filename: "photo.jpg".into(), size: 4096 },
    ];
    ticket
}
