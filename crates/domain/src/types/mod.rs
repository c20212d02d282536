//! Domain types and models
//!
//! Plain serde-serializable value types; behavior lives in the core crate.

pub mod actor;
pub mod attachment;
pub mod client;
pub mod inventory;
pub mod terminal;
pub mod ticket;

pub use actor::{ActorContext, ActorRole};
pub use attachment::{Attachment, PendingUpload};
pub use client::{Client, ClientLink, Location};
pub use inventory::{Bank, DeadStockItem, StockLevels, StockShortage};
pub use terminal::Terminal;
pub use ticket::{ConsumableLine, Ticket, TicketDetails, TicketKind};
