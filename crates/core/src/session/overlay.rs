//! Session-local attachment overlay
//!
//! Tracks staged additions and in-flight removals on top of the
//! server-confirmed attachment list. Staged additions only reach the
//! backend with the next successful save; removals are immediate
//! operations whose item is hidden while the delete request is in flight
//! and restored if it fails.

use std::collections::HashSet;

use tpedesk_domain::{Attachment, PendingUpload};
use uuid::Uuid;

/// Staged attachment changes not yet committed to the server
#[derive(Debug, Default)]
pub struct AttachmentOverlay {
    confirmed: Vec<Attachment>,
    pending_additions: Vec<PendingUpload>,
    pending_removals: HashSet<String>,
}

impl AttachmentOverlay {
    /// Create an overlay over the attachments fetched with the ticket
    pub fn new(confirmed: Vec<Attachment>) -> Self {
        Self { confirmed, pending_additions: Vec::new(), pending_removals: HashSet::new() }
    }

    /// Server-confirmed attachments, including any hidden by an in-flight
    /// delete
    pub fn confirmed(&self) -> &[Attachment] {
        &self.confirmed
    }

    /// Confirmed attachments minus those with a delete in flight
    pub fn visible(&self) -> Vec<&Attachment> {
        self.confirmed.iter().filter(|a| !self.pending_removals.contains(&a.id)).collect()
    }

    /// Files staged for the next save
    pub fn staged(&self) -> &[PendingUpload] {
        &self.pending_additions
    }

    /// Whether any file is staged; staged files alone make a session dirty
    pub fn has_staged(&self) -> bool {
        !self.pending_additions.is_empty()
    }

    /// Stage a file for the next save; returns its session-local id
    pub fn stage(&mut self, filename: impl Into<String>, content: Vec<u8>) -> Uuid {
        let upload = PendingUpload::new(filename, content);
        let id = upload.upload_id;
        self.pending_additions.push(upload);
        id
    }

    /// Remove a staged file before it was ever transmitted
    pub fn unstage(&mut self, upload_id: Uuid) -> bool {
        let before = self.pending_additions.len();
        self.pending_additions.retain(|u| u.upload_id != upload_id);
        self.pending_additions.len() != before
    }

    /// Hide a confirmed attachment while its delete request is in flight.
    /// Returns false when the id is unknown or already being removed.
    pub fn begin_removal(&mut self, attachment_id: &str) -> bool {
        if !self.confirmed.iter().any(|a| a.id == attachment_id) {
            return false;
        }
        self.pending_removals.insert(attachment_id.to_string())
    }

    /// Commit a removal the backend confirmed
    pub fn confirm_removal(&mut self, attachment_id: &str) {
        self.pending_removals.remove(attachment_id);
        self.confirmed.retain(|a| a.id != attachment_id);
    }

    /// Restore an item whose delete request failed
    pub fn abort_removal(&mut self, attachment_id: &str) {
        self.pending_removals.remove(attachment_id);
    }

    /// Replace the confirmed list from a save response and clear every
    /// staged set
    pub fn commit(&mut self, confirmed: Vec<Attachment>) {
        self.confirmed = confirmed;
        self.pending_additions.clear();
        self.pending_removals.clear();
    }

    /// Drop all staged changes, keeping the confirmed list
    pub fn discard(&mut self) {
        self.pending_additions.clear();
        self.pending_removals.clear();
    }
}
