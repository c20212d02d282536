//! Client types
//!
//! A ticket's client is either fully inline (client data entered with the
//! request) or fully reference-based (an existing client record selected by
//! id). The two modes are mutually exclusive by construction of
//! [`ClientLink`]; partially-mixed records cannot be expressed.

use serde::{Deserialize, Serialize};

/// Geographic location of a client site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub wilaya: String,
    pub daira: String,
    pub address: String,
}

/// A client record as entered with a request or fetched from the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Server-side id when the record is already known, `None` for a new
    /// inline client
    pub id: Option<String>,
    pub name: String,
    pub brand: String,
    pub phone: String,
    pub mobile: String,
    pub location: Location,
}

/// Inline client data vs reference to an existing client record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ClientLink {
    /// Full client data carried by the ticket (optionally with a known id)
    Inline(Client),
    /// Reference to an existing client record; legal for deblocking orders
    /// only
    Linked { client_id: String },
}

impl ClientLink {
    /// Whether this link carries inline client data
    pub const fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }

    /// The inline client data, if any
    pub const fn client(&self) -> Option<&Client> {
        match self {
            Self::Inline(client) => Some(client),
            Self::Linked { .. } => None,
        }
    }

    /// The referenced client id: the link target in `Linked` mode, the known
    /// server id in `Inline` mode
    pub fn client_id(&self) -> Option<&str> {
        match self {
            Self::Inline(client) => client.id.as_deref(),
            Self::Linked { client_id } => Some(client_id),
        }
    }
}

impl Default for ClientLink {
    fn default() -> Self {
        Self::Inline(Client::default())
    }
}
