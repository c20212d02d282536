//! Minimal update patch vocabulary
//!
//! A [`TicketPatch`] is the smallest set of changed fields computed by the
//! diff engine, keyed by the backend's flattened field convention
//! (`client_phone`, `terminal_serial_number`, ...). It is exactly what gets
//! submitted on save; nothing else is sent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flattened field keys shared by the diff engine, the validator and the
/// REST adapter.
pub mod keys {
    pub const STATUS: &str = "status";
    pub const NOTES: &str = "notes";
    pub const IS_NEW_CLIENT: &str = "is_new_client";
    pub const CLIENT_ID: &str = "client_id";
    pub const CLIENT_NAME: &str = "client_name";
    pub const CLIENT_BRAND: &str = "client_brand";
    pub const CLIENT_PHONE: &str = "client_phone";
    pub const CLIENT_MOBILE: &str = "client_mobile";
    pub const CLIENT_WILAYA: &str = "client_wilaya";
    pub const CLIENT_DAIRA: &str = "client_daira";
    pub const CLIENT_ADDRESS: &str = "client_address";
    pub const TERMINAL_MANUFACTURER: &str = "terminal_manufacturer";
    pub const TERMINAL_MODEL: &str = "terminal_model";
    pub const TERMINAL_SERIAL_NUMBER: &str = "terminal_serial_number";
    pub const INTERVENTION_PROBLEM: &str = "intervention_problem";
    pub const CONSUMABLE_ITEMS: &str = "consumable_items";
}

/// Minimal set of changed fields, keyed by flattened field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketPatch {
    fields: BTreeMap<String, Value>,
}

impl TicketPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a changed field
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Whether no field changed
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of changed fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the patch contains `key`
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// The value recorded for `key`, if any
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Iterate over changed fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// All changed keys in order
    pub fn field_keys(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }
}
