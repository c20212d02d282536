//! Attachment types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A server-confirmed attachment on a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    /// Size in bytes as reported by the server
    pub size: u64,
}

/// A file staged in an editing session, not yet transmitted
///
/// `upload_id` is session-local; the server assigns the real attachment id
/// once the upload rides along with a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub upload_id: Uuid,
    pub filename: String,
    pub content: Vec<u8>,
}

impl PendingUpload {
    /// Stage file content under a fresh session-local id
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self { upload_id: Uuid::new_v4(), filename: filename.into(), content }
    }
}
