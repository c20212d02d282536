//! # TpeDesk Common
//!
//! Cross-cutting utilities shared by every TpeDesk crate.
//!
//! This crate contains:
//! - Field-addressable validation vocabulary ([`validation`])
//! - Cancellable one-shot scheduled tasks ([`time`])
//!
//! ## Architecture
//! - No dependencies on other TpeDesk crates
//! - No domain knowledge; only reusable building blocks

pub mod time;
pub mod validation;

pub use time::DelayedTask;
pub use validation::FieldError;
