//! # TpeDesk Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The minimal-diff engine comparing snapshot pairs
//! - The stock-aware validator and shortage-message parsing
//! - The editing session: unsaved-change guard, attachment overlay,
//!   save flow and transient notices
//! - Port/adapter interfaces (traits) for every external collaborator
//!
//! ## Architecture Principles
//! - Only depends on `tpedesk-common` and `tpedesk-domain`
//! - No HTTP, no filesystem, no platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod diff;
pub mod ports;
pub mod session;
pub mod validate;

// Re-export specific items to avoid ambiguity
pub use diff::compute_diff;
pub use ports::{InventoryGateway, TicketGateway};
pub use session::{
    CloseRequest, EditingSession, Notice, NoticeKind, SaveFailure, SaveOutcome, SessionEvent,
    SessionState,
};
pub use validate::{parse_stock_shortage, validate, ValidationReport};
