//! # TpeDesk Infra
//!
//! Infrastructure adapters behind the core's ports.
//!
//! This crate contains:
//! - The reqwest-based REST gateway implementing [`tpedesk_core::TicketGateway`]
//!   and [`tpedesk_core::InventoryGateway`]
//! - HTTP status -> domain error mapping
//! - Configuration loading (environment variables with file fallback)
//!
//! ## Architecture
//! - Depends on `tpedesk-core` and `tpedesk-domain`
//! - All transport detail stays here; the core never sees HTTP

pub mod config;
pub mod errors;
pub mod http;
pub mod rest;

pub use errors::InfraError;
pub use http::HttpClient;
pub use rest::RestGateway;
