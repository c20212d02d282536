//! Acting user context
//!
//! The backend differentiates some operations by role, so every mutating
//! call takes an explicit [`ActorContext`] instead of reading ambient user
//! state. This keeps the diff engine and validator pure functions of their
//! inputs.

use serde::{Deserialize, Serialize};

/// Role of the user driving a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    /// Client-facing staff opening and editing requests
    Agent,
    /// Back-office manager triaging, assigning and closing requests
    BackOffice,
}

/// The user on whose behalf a mutating operation runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub user_id: String,
    pub role: ActorRole,
}

impl ActorContext {
    /// Create an actor context
    pub fn new(user_id: impl Into<String>, role: ActorRole) -> Self {
        Self { user_id: user_id.into(), role }
    }
}
