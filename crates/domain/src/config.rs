//! Configuration structures
//!
//! Loaded by the infra layer from environment variables or a config file;
//! the structures themselves live here so every layer shares one shape.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{ERROR_NOTICE_MS, SUCCESS_NOTICE_MS};

/// How the backend should treat an inline client on submission.
///
/// Whether the backend deduplicates inline clients by phone number or
/// creates a record per submission is deployment policy; the core forwards
/// the configured choice as a request parameter instead of guessing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewClientPolicy {
    /// Create a client record on every inline submission
    #[default]
    AlwaysCreate,
    /// Reuse an existing client record with the same phone number
    DedupeByPhone,
}

/// REST backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `https://tpedesk.example.com/api`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

/// Durations for transient, auto-dismissing notices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeConfig {
    /// How long a success notice stays visible (milliseconds)
    pub success_ms: u64,
    /// How long an error notice stays visible (milliseconds)
    pub error_ms: u64,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self { success_ms: SUCCESS_NOTICE_MS, error_ms: ERROR_NOTICE_MS }
    }
}

impl NoticeConfig {
    /// Success notice duration
    pub const fn success_duration(&self) -> Duration {
        Duration::from_millis(self.success_ms)
    }

    /// Error notice duration
    pub const fn error_duration(&self) -> Duration {
        Duration::from_millis(self.error_ms)
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TpeDeskConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub notices: NoticeConfig,
    #[serde(default)]
    pub client_policy: NewClientPolicy,
}
