//! # TpeDesk Domain
//!
//! Business domain types and models for TpeDesk.
//!
//! This crate contains:
//! - Domain data types (Ticket, Client, Terminal, etc.)
//! - The ticket status state machine
//! - The minimal update patch vocabulary
//! - Domain error types and Result definitions
//! - Configuration structures and domain constants
//!
//! ## Architecture
//! - No dependencies on other TpeDesk crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod patch;
pub mod status;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use patch::TicketPatch;
pub use status::{offered_transitions, StatusChoice, TicketStatus};
pub use types::*;
