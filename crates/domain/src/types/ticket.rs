//! Ticket entity
//!
//! The ticket kind is a tagged union: each variant carries only the fields
//! that exist for that kind, so the diff engine and validator dispatch on
//! the tag instead of sniffing optional fields. The tag is immutable after
//! creation; no session operation rewrites it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attachment::Attachment;
use super::client::ClientLink;
use super::inventory::Bank;
use super::terminal::Terminal;
use crate::status::TicketStatus;

/// One consumable request line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableLine {
    /// Backend-defined consumable kind (thermal paper, ink ribbon, ...)
    pub kind: String,
    /// Requested quantity; must be a positive integer
    pub quantity: u32,
}

impl ConsumableLine {
    /// Create a request line
    pub fn new(kind: impl Into<String>, quantity: u32) -> Self {
        Self { kind: kind.into(), quantity }
    }
}

/// Discriminant of [`TicketDetails`], without the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketKind {
    NetworkCheck,
    Intervention,
    Consumable,
    DeblockingOrder,
}

/// Kind-specific ticket payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketDetails {
    /// Network connectivity check at the client site; no terminal involved
    NetworkCheck,
    /// On-site intervention on a specific terminal
    Intervention { terminal: Terminal, problem: String },
    /// Consumable restocking for a specific terminal
    Consumable { terminal: Terminal, items: Vec<ConsumableLine> },
    /// Unblocking order for a specific terminal
    DeblockingOrder { terminal: Terminal },
}

impl TicketDetails {
    /// The kind tag of this payload
    pub const fn kind(&self) -> TicketKind {
        match self {
            Self::NetworkCheck => TicketKind::NetworkCheck,
            Self::Intervention { .. } => TicketKind::Intervention,
            Self::Consumable { .. } => TicketKind::Consumable,
            Self::DeblockingOrder { .. } => TicketKind::DeblockingOrder,
        }
    }

    /// The terminal this ticket concerns, when the kind has one
    pub const fn terminal(&self) -> Option<&Terminal> {
        match self {
            Self::NetworkCheck => None,
            Self::Intervention { terminal, .. }
            | Self::Consumable { terminal, .. }
            | Self::DeblockingOrder { terminal } => Some(terminal),
        }
    }
}

/// A maintenance/service request record for a payment terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Opaque stable identifier; empty only while the ticket is an unsaved
    /// draft
    pub id: String,
    pub status: TicketStatus,
    pub notes: String,
    pub client: ClientLink,
    /// Owning bank; read-only inside an editing session
    pub bank: Option<Bank>,
    /// Server-assigned; never client-writable, never diffed
    pub request_date: Option<DateTime<Utc>>,
    /// Server-assigned; never client-writable, never diffed
    pub delivered_date: Option<DateTime<Utc>>,
    /// Server-assigned when the ticket is closed; never client-writable
    pub completed_date: Option<DateTime<Utc>>,
    /// Server-confirmed attachment list
    pub attachments: Vec<Attachment>,
    #[serde(flatten)]
    pub details: TicketDetails,
}

impl Ticket {
    /// Create an unsaved draft with the initial status
    pub fn draft(client: ClientLink, details: TicketDetails) -> Self {
        Self {
            id: String::new(),
            status: TicketStatus::initial(),
            notes: String::new(),
            client,
            bank: None,
            request_date: None,
            delivered_date: None,
            completed_date: None,
            attachments: Vec::new(),
            details,
        }
    }

    /// The kind tag, immutable after creation
    pub const fn kind(&self) -> TicketKind {
        self.details.kind()
    }

    /// The terminal this ticket concerns, when the kind has one
    pub const fn terminal(&self) -> Option<&Terminal> {
        self.details.terminal()
    }

    /// Whether the ticket exists on the server yet
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }
}
