//! Editing session
//!
//! A session owns the snapshot pair (confirmed vs working), the attachment
//! overlay, the unsaved-change guard and the session's scheduled tasks.
//! Sessions are never reused: opening a ticket always constructs a fresh
//! session around a freshly fetched confirmed snapshot.
//!
//! Every recoverable failure is caught at the operation boundary and
//! converted to session state; nothing escapes the session and nothing is
//! fatal. A failed operation always leaves the session resumable with the
//! working snapshot and overlay untouched.

mod notice;
mod overlay;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tpedesk_common::{DelayedTask, FieldError};
use tpedesk_domain::patch::keys;
use tpedesk_domain::{
    offered_transitions, ActorContext, Attachment, Client, ClientLink, ConsumableLine,
    NoticeConfig, StatusChoice, StockLevels, StockShortage, Terminal, Ticket, TicketDetails,
    TicketKind, TicketStatus, TpeDeskError,
};
use tracing::{info, warn};

use crate::diff::compute_diff;
use crate::ports::{InventoryGateway, TicketGateway};
use crate::validate::{parse_stock_shortage, validate, ValidationReport};

pub use notice::{Notice, NoticeKind};
pub use overlay::AttachmentOverlay;

/// Unsaved-change guard state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Working snapshot matches the confirmed snapshot; nothing staged
    Clean,
    /// Unsaved changes exist
    Dirty,
    /// A close was requested while dirty; awaiting save/discard/continue
    ConfirmDiscard,
}

/// Result of asking the session to close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseRequest {
    /// The session closed immediately
    Closed,
    /// Unsaved changes exist; the caller must resolve the confirmation
    ConfirmRequired,
}

/// Why a dispatched operation did not succeed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveFailure {
    /// Another operation is in flight; refused without side effects
    #[error("another operation is already in flight")]
    Busy,
    /// Backend-confirmed stock shortage, parsed from the canonical message
    #[error("not enough stock for \"{}\": {} available, {} requested", .0.item, .0.available, .0.requested)]
    StockShortage(StockShortage),
    /// The ticket was deleted or modified elsewhere (HTTP 404/409/410)
    #[error("{0}")]
    ConflictOrNotFound(String),
    /// Any other failed request, surfaced verbatim
    #[error("{0}")]
    Transient(String),
}

impl SaveFailure {
    /// Field-addressable rendering for shortage failures, `None` otherwise
    pub fn field_error(&self) -> Option<FieldError> {
        match self {
            Self::StockShortage(_) => {
                Some(FieldError::with_code(keys::CONSUMABLE_ITEMS, self.to_string(), "stock_shortage"))
            }
            _ => None,
        }
    }
}

/// Outcome of a save attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The patch (and any staged files) were persisted
    Saved,
    /// Empty diff and empty overlay; no network call was made
    NothingToSave,
    /// Local validation failed; submission was blocked entirely
    Invalid(ValidationReport),
    /// The backend rejected the submission or the request failed
    Failed(SaveFailure),
}

/// Events emitted by the session's scheduled tasks.
///
/// The driver owning the session receives these from
/// [`EditingSession::take_events`] and feeds them back through
/// [`EditingSession::handle_event`]. Stale events (a seq that no longer
/// matches) are ignored, so a timer can never mutate state it was not
/// scheduled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The transient notice with this seq should be dismissed
    NoticeExpired { seq: u64 },
    /// The auto-close delay after a successful save-and-close elapsed
    AutoCloseElapsed { seq: u64 },
}

/// Classify a gateway error into the save-failure taxonomy.
///
/// A rejected request whose message matches the canonical shortage format
/// becomes a structured [`SaveFailure::StockShortage`]; an unrecognized
/// rejection falls back to verbatim display.
pub fn classify_failure(err: TpeDeskError) -> SaveFailure {
    match err {
        TpeDeskError::Rejected(message) => match parse_stock_shortage(&message) {
            Some(shortage) => SaveFailure::StockShortage(shortage),
            None => SaveFailure::Transient(message),
        },
        TpeDeskError::NotFound(message) | TpeDeskError::Conflict(message) => {
            SaveFailure::ConflictOrNotFound(message)
        }
        other => SaveFailure::Transient(other.to_string()),
    }
}

/// One logical editing session over a single ticket
pub struct EditingSession {
    gateway: Arc<dyn TicketGateway>,
    inventory: Arc<dyn InventoryGateway>,
    actor: ActorContext,
    confirmed: Ticket,
    working: Ticket,
    overlay: AttachmentOverlay,
    stock: StockLevels,
    notices: NoticeConfig,
    state: SessionState,
    busy: bool,
    closed: bool,
    notice: Option<Notice>,
    seq: u64,
    auto_close_seq: Option<u64>,
    tasks: Vec<DelayedTask>,
    events_tx: UnboundedSender<SessionEvent>,
    events_rx: Option<UnboundedReceiver<SessionEvent>>,
}

impl EditingSession {
    /// Open a session for an existing ticket.
    ///
    /// Fetches a fresh confirmed snapshot and the known stock levels. A
    /// stock fetch failure only disables the soft check; it never blocks
    /// the session.
    pub async fn open(
        gateway: Arc<dyn TicketGateway>,
        inventory: Arc<dyn InventoryGateway>,
        actor: ActorContext,
        ticket_id: &str,
        notices: NoticeConfig,
    ) -> tpedesk_domain::Result<Self> {
        let ticket = gateway.fetch_ticket(ticket_id).await?;
        let stock = Self::fetch_stock(inventory.as_ref()).await;
        Ok(Self::build(gateway, inventory, actor, ticket, stock, notices))
    }

    /// Open a session around an unsaved draft; saving creates the ticket
    pub async fn open_draft(
        gateway: Arc<dyn TicketGateway>,
        inventory: Arc<dyn InventoryGateway>,
        actor: ActorContext,
        draft: Ticket,
        notices: NoticeConfig,
    ) -> Self {
        let stock = Self::fetch_stock(inventory.as_ref()).await;
        Self::build(gateway, inventory, actor, draft, stock, notices)
    }

    async fn fetch_stock(inventory: &dyn InventoryGateway) -> StockLevels {
        match inventory.fetch_known_stock().await {
            Ok(stock) => stock,
            Err(err) => {
                warn!(error = %err, "stock levels unavailable; soft check disabled");
                StockLevels::new()
            }
        }
    }

    fn build(
        gateway: Arc<dyn TicketGateway>,
        inventory: Arc<dyn InventoryGateway>,
        actor: ActorContext,
        ticket: Ticket,
        stock: StockLevels,
        notices: NoticeConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let overlay = AttachmentOverlay::new(ticket.attachments.clone());
        Self {
            gateway,
            inventory,
            actor,
            confirmed: ticket.clone(),
            working: ticket,
            overlay,
            stock,
            notices,
            state: SessionState::Clean,
            busy: false,
            closed: false,
            notice: None,
            seq: 0,
            auto_close_seq: None,
            tasks: Vec::new(),
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Snapshot under active edit
    pub fn working(&self) -> &Ticket {
        &self.working
    }

    /// Last snapshot known to match the server
    pub fn confirmed(&self) -> &Ticket {
        &self.confirmed
    }

    /// Current guard state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a mutating operation is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the session has closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The currently visible transient notice, if any
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Known stock levels feeding the soft check
    pub fn stock(&self) -> &StockLevels {
        &self.stock
    }

    /// Confirmed attachments minus those with a delete in flight
    pub fn visible_attachments(&self) -> Vec<&Attachment> {
        self.overlay.visible()
    }

    /// Files staged for the next save
    pub fn staged_uploads(&self) -> &[tpedesk_domain::PendingUpload] {
        self.overlay.staged()
    }

    /// Validate the working snapshot as it stands
    pub fn validation(&self) -> ValidationReport {
        validate(&self.working, &self.stock)
    }

    /// Legal status targets for the edit dropdown, computed from the
    /// confirmed status so a completed ticket only ever offers `Completed`
    pub fn offered_statuses(&self) -> Vec<StatusChoice> {
        offered_transitions(self.confirmed.status)
    }

    /// Take the receiving end of the session's event stream (once)
    pub fn take_events(&mut self) -> Option<UnboundedReceiver<SessionEvent>> {
        self.events_rx.take()
    }

    // ------------------------------------------------------------------
    // Working-snapshot mutators
    //
    // Each mutator refreshes the guard; there is deliberately no mutator
    // for the kind tag, the bank or the server-assigned timestamps.
    // ------------------------------------------------------------------

    /// Replace the free-text notes
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.working.notes = notes.into();
        self.refresh_guard();
    }

    /// Apply a status choice obtained from [`Self::offered_statuses`]
    pub fn set_status(&mut self, choice: StatusChoice) {
        self.working.status = choice.target();
        self.refresh_guard();
    }

    /// Enter inline client data
    pub fn set_client(&mut self, client: Client) {
        self.working.client = ClientLink::Inline(client);
        self.refresh_guard();
    }

    /// Select an existing client by reference; deblocking orders only
    pub fn link_client(&mut self, client_id: impl Into<String>) -> tpedesk_domain::Result<()> {
        if self.working.kind() != TicketKind::DeblockingOrder {
            return Err(TpeDeskError::InvalidInput(
                "existing-client selection is only available for deblocking orders".into(),
            ));
        }
        self.working.client = ClientLink::Linked { client_id: client_id.into() };
        self.refresh_guard();
        Ok(())
    }

    /// Replace the terminal reference; illegal for network checks
    pub fn set_terminal(&mut self, terminal: Terminal) -> tpedesk_domain::Result<()> {
        match &mut self.working.details {
            TicketDetails::NetworkCheck => {
                Err(TpeDeskError::InvalidInput("network checks have no terminal".into()))
            }
            TicketDetails::Intervention { terminal: slot, .. }
            | TicketDetails::Consumable { terminal: slot, .. }
            | TicketDetails::DeblockingOrder { terminal: slot } => {
                *slot = terminal;
                self.refresh_guard();
                Ok(())
            }
        }
    }

    /// Replace the intervention problem description
    pub fn set_intervention_problem(
        &mut self,
        problem: impl Into<String>,
    ) -> tpedesk_domain::Result<()> {
        match &mut self.working.details {
            TicketDetails::Intervention { problem: slot, .. } => {
                *slot = problem.into();
                self.refresh_guard();
                Ok(())
            }
            _ => Err(TpeDeskError::InvalidInput(
                "only intervention tickets carry a problem description".into(),
            )),
        }
    }

    /// Replace the consumable request lines
    pub fn set_consumable_items(&mut self, items: Vec<ConsumableLine>) -> tpedesk_domain::Result<()> {
        match &mut self.working.details {
            TicketDetails::Consumable { items: slot, .. } => {
                *slot = items;
                self.refresh_guard();
                Ok(())
            }
            _ => Err(TpeDeskError::InvalidInput(
                "only consumable tickets carry request lines".into(),
            )),
        }
    }

    // ------------------------------------------------------------------
    // Attachment staging
    // ------------------------------------------------------------------

    /// Stage a file for the next save; staging alone makes the session
    /// dirty
    pub fn stage_upload(&mut self, filename: impl Into<String>, content: Vec<u8>) -> uuid::Uuid {
        let id = self.overlay.stage(filename, content);
        self.refresh_guard();
        id
    }

    /// Drop a staged file before it was transmitted
    pub fn unstage_upload(&mut self, upload_id: uuid::Uuid) -> bool {
        let removed = self.overlay.unstage(upload_id);
        self.refresh_guard();
        removed
    }

    // ------------------------------------------------------------------
    // Unsaved-change guard
    // ------------------------------------------------------------------

    /// Ask the session to close. Clean sessions close immediately; dirty
    /// sessions move to the confirmation state instead.
    pub fn request_close(&mut self) -> CloseRequest {
        match self.state {
            SessionState::Clean => {
                self.teardown_close();
                CloseRequest::Closed
            }
            SessionState::Dirty | SessionState::ConfirmDiscard => {
                self.state = SessionState::ConfirmDiscard;
                CloseRequest::ConfirmRequired
            }
        }
    }

    /// Resolve the confirmation by returning to editing; nothing is lost
    pub fn continue_editing(&mut self) {
        if self.state == SessionState::ConfirmDiscard {
            self.state = SessionState::Dirty;
        }
    }

    /// Resolve the confirmation by discarding: the working snapshot
    /// reverts to the confirmed snapshot, the overlay is dropped and the
    /// session closes unconditionally.
    pub fn discard_and_close(&mut self) {
        self.working = self.confirmed.clone();
        self.overlay.discard();
        self.state = SessionState::Clean;
        self.teardown_close();
    }

    /// Resolve the confirmation by saving. On success an auto-close task
    /// is scheduled strictly after the commit; on failure the session
    /// stays open with the error surfaced.
    pub async fn save_and_close(&mut self) -> SaveOutcome {
        let outcome = self.save().await;
        match outcome {
            SaveOutcome::Saved => {
                // Commit already happened inside save(); only now may the
                // auto-close timer exist, so a close can never race ahead
                // of the snapshot swap.
                self.schedule_auto_close(self.notices.success_duration());
            }
            SaveOutcome::NothingToSave => self.teardown_close(),
            SaveOutcome::Invalid(_) | SaveOutcome::Failed(_) => {}
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Persistence operations
    // ------------------------------------------------------------------

    /// Validate, diff and submit the working snapshot.
    ///
    /// An empty diff with an empty overlay short-circuits to
    /// [`SaveOutcome::NothingToSave`] without any network call. On success
    /// the confirmed snapshot is replaced and the overlay committed; on
    /// failure both are preserved unchanged so the user can retry.
    pub async fn save(&mut self) -> SaveOutcome {
        if self.busy {
            return SaveOutcome::Failed(SaveFailure::Busy);
        }

        let report = self.validation();
        if !report.is_submittable() {
            if self.state == SessionState::ConfirmDiscard {
                self.state = SessionState::Dirty;
            }
            return SaveOutcome::Invalid(report);
        }

        let patch = compute_diff(&self.confirmed, &self.working);
        if patch.is_empty() && !self.overlay.has_staged() && self.working.is_persisted() {
            return SaveOutcome::NothingToSave;
        }

        self.busy = true;
        let result = if self.working.is_persisted() {
            self.gateway
                .update_ticket(&self.actor, &self.confirmed.id, &patch, self.overlay.staged())
                .await
        } else {
            self.gateway.create_ticket(&self.actor, &self.working).await
        };
        self.busy = false;

        match result {
            Ok(refreshed) => {
                self.overlay.commit(refreshed.attachments.clone());
                self.confirmed = refreshed.clone();
                self.working = refreshed;
                self.state = SessionState::Clean;
                info!(ticket_id = %self.confirmed.id, fields = patch.len(), "ticket saved");
                self.schedule_notice(NoticeKind::Success, "saved", self.notices.success_duration());
                SaveOutcome::Saved
            }
            Err(err) => {
                let failure = classify_failure(err);
                warn!(ticket_id = %self.confirmed.id, error = %failure, "save failed");
                self.state = SessionState::Dirty;
                self.schedule_notice(
                    NoticeKind::Error,
                    failure.to_string(),
                    self.notices.error_duration(),
                );
                SaveOutcome::Failed(failure)
            }
        }
    }

    /// Irreversibly complete the ticket. Distinct from the edit path; the
    /// server stamps the completion date.
    pub async fn close_ticket(&mut self) -> Result<(), SaveFailure> {
        if self.busy {
            return Err(SaveFailure::Busy);
        }
        if !self.working.is_persisted() {
            return Err(SaveFailure::Transient("ticket has not been created yet".into()));
        }

        self.busy = true;
        let result = self.gateway.close_ticket(&self.actor, &self.confirmed.id).await;
        self.busy = false;

        match result {
            Ok(()) => {
                // The server stamps the completion date; re-fetch so both
                // snapshots carry it instead of diverging until reopen.
                match self.gateway.fetch_ticket(&self.confirmed.id).await {
                    Ok(refreshed) => {
                        self.confirmed = refreshed.clone();
                        self.working = refreshed;
                    }
                    Err(err) => {
                        warn!(ticket_id = %self.confirmed.id, error = %err, "re-fetch after close failed");
                        self.confirmed.status = TicketStatus::Completed;
                        self.working.status = TicketStatus::Completed;
                    }
                }
                self.refresh_guard();
                info!(ticket_id = %self.confirmed.id, "ticket completed");
                self.schedule_notice(
                    NoticeKind::Success,
                    "ticket completed",
                    self.notices.success_duration(),
                );
                Ok(())
            }
            Err(err) => {
                let failure = classify_failure(err);
                warn!(ticket_id = %self.confirmed.id, error = %failure, "close failed");
                self.schedule_notice(
                    NoticeKind::Error,
                    failure.to_string(),
                    self.notices.error_duration(),
                );
                Err(failure)
            }
        }
    }

    /// Assign an owning bank; both snapshots pick up the refreshed bank
    pub async fn assign_bank(&mut self, bank_id: &str) -> Result<(), SaveFailure> {
        if self.busy {
            return Err(SaveFailure::Busy);
        }

        self.busy = true;
        let result = self.gateway.assign_bank(&self.actor, &self.confirmed.id, bank_id).await;
        self.busy = false;

        match result {
            Ok(refreshed) => {
                // The bank is read-only in the session, so it changes on
                // both snapshots without touching the dirty computation.
                self.confirmed.bank.clone_from(&refreshed.bank);
                self.working.bank = refreshed.bank;
                self.schedule_notice(
                    NoticeKind::Success,
                    "bank assigned",
                    self.notices.success_duration(),
                );
                Ok(())
            }
            Err(err) => {
                let failure = classify_failure(err);
                self.schedule_notice(
                    NoticeKind::Error,
                    failure.to_string(),
                    self.notices.error_duration(),
                );
                Err(failure)
            }
        }
    }

    /// Delete a confirmed attachment immediately (not staged). The item is
    /// hidden while the request is in flight and restored if it fails.
    pub async fn delete_attachment(&mut self, attachment_id: &str) -> Result<(), SaveFailure> {
        if self.busy {
            return Err(SaveFailure::Busy);
        }
        if !self.overlay.begin_removal(attachment_id) {
            return Err(SaveFailure::Transient(format!("unknown attachment {attachment_id}")));
        }

        self.busy = true;
        let result = self.gateway.delete_attachment(&self.confirmed.id, attachment_id).await;
        self.busy = false;

        match result {
            Ok(()) => {
                self.overlay.confirm_removal(attachment_id);
                self.schedule_notice(
                    NoticeKind::Success,
                    "attachment deleted",
                    self.notices.success_duration(),
                );
                Ok(())
            }
            Err(err) => {
                self.overlay.abort_removal(attachment_id);
                let failure = classify_failure(err);
                self.schedule_notice(
                    NoticeKind::Error,
                    failure.to_string(),
                    self.notices.error_duration(),
                );
                Err(failure)
            }
        }
    }

    /// Download a confirmed attachment's content
    pub async fn download_attachment(&mut self, attachment_id: &str) -> Result<Vec<u8>, SaveFailure> {
        match self.gateway.download_attachment(&self.confirmed.id, attachment_id).await {
            Ok(bytes) => Ok(bytes),
            Err(err) => {
                let failure = classify_failure(err);
                self.schedule_notice(
                    NoticeKind::Error,
                    failure.to_string(),
                    self.notices.error_duration(),
                );
                Err(failure)
            }
        }
    }

    /// Existing clients of a bank, for reference-mode selection
    pub async fn clients_for_bank(&self, bank_id: &str) -> Result<Vec<Client>, SaveFailure> {
        self.inventory.fetch_clients_for_bank(bank_id).await.map_err(classify_failure)
    }

    // ------------------------------------------------------------------
    // Scheduled-task plumbing
    // ------------------------------------------------------------------

    /// Apply an event emitted by one of the session's scheduled tasks
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::NoticeExpired { seq } => {
                if self.notice.as_ref().is_some_and(|n| n.seq == seq) {
                    self.notice = None;
                }
            }
            SessionEvent::AutoCloseElapsed { seq } => {
                if self.auto_close_seq == Some(seq) && !self.closed {
                    self.teardown_close();
                }
            }
        }
    }

    fn refresh_guard(&mut self) {
        if self.state == SessionState::ConfirmDiscard {
            return;
        }
        let dirty =
            self.overlay.has_staged() || !compute_diff(&self.confirmed, &self.working).is_empty();
        self.state = if dirty { SessionState::Dirty } else { SessionState::Clean };
    }

    fn schedule_notice(&mut self, kind: NoticeKind, message: impl Into<String>, after: Duration) {
        self.seq += 1;
        let seq = self.seq;
        self.notice = Some(Notice::new(kind, message, seq));
        let tx = self.events_tx.clone();
        self.spawn_task(after, move || {
            let _ = tx.send(SessionEvent::NoticeExpired { seq });
        });
    }

    fn schedule_auto_close(&mut self, after: Duration) {
        self.seq += 1;
        let seq = self.seq;
        self.auto_close_seq = Some(seq);
        let tx = self.events_tx.clone();
        self.spawn_task(after, move || {
            let _ = tx.send(SessionEvent::AutoCloseElapsed { seq });
        });
    }

    fn spawn_task<F>(&mut self, after: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(DelayedTask::spawn(after, callback));
    }

    /// Close the session and cancel every pending scheduled task so no
    /// timer fires into a closed session
    fn teardown_close(&mut self) {
        self.closed = true;
        self.notice = None;
        self.auto_close_seq = None;
        self.tasks.clear();
    }
}
