//! Transient session notices

use serde::{Deserialize, Serialize};

/// Visual flavor of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient, auto-dismissing message surfaced by a session.
///
/// `seq` ties the notice to the scheduled dismissal task that will expire
/// it; a stale expiry event whose seq no longer matches is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub(crate) seq: u64,
}

impl Notice {
    pub(crate) fn new(kind: NoticeKind, message: impl Into<String>, seq: u64) -> Self {
        Self { kind, message: message.into(), seq }
    }
}
