//! Field-addressable validation vocabulary
//!
//! Errors carry the path of the field that produced them so a caller can
//! route each message to the exact control it belongs to. Field paths use
//! the same flattened key convention as update patches
//! (`client_phone`, `consumable_items[2].quantity`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single message attached to one field path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Flattened field path the message belongs to
    pub field: String,
    /// Human-readable message
    pub message: String,
    /// Optional machine-readable code
    pub code: Option<String>,
}

impl FieldError {
    /// Create a field error without a code
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into(), code: None }
    }

    /// Create a field error with a machine-readable code
    pub fn with_code(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self { field: field.into(), message: message.into(), code: Some(code.into()) }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_records_path_and_message_without_code() {
        let err = FieldError::new("client_phone", "invalid phone number");
        assert_eq!(err.field, "client_phone");
        assert_eq!(err.message, "invalid phone number");
        assert!(err.code.is_none());
    }

    #[test]
    fn with_code_records_machine_readable_code() {
        let err = FieldError::with_code("consumable_items", "not enough stock", "stock_shortage");
        assert_eq!(err.code.as_deref(), Some("stock_shortage"));
    }

    #[test]
    fn display_joins_path_and_message() {
        let err = FieldError::new("client_name", "name is required");
        assert_eq!(err.to_string(), "client_name: name is required");
    }

    #[test]
    fn round_trips_through_serde() {
        let err = FieldError::with_code("client_mobile", "invalid mobile number", "format");
        let json = serde_json::to_string(&err).unwrap();
        let back: FieldError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
