//! Bank, stock and dead-stock inventory types

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An owning bank; read-only inside an editing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub id: String,
    pub name: String,
}

/// Known consumable stock, keyed by consumable kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockLevels {
    levels: HashMap<String, u32>,
}

impl StockLevels {
    /// Empty stock map (every kind unknown)
    pub fn new() -> Self {
        Self::default()
    }

    /// Available quantity for `kind`, `None` when the kind is unknown
    pub fn available(&self, kind: &str) -> Option<u32> {
        self.levels.get(kind).copied()
    }

    /// Record the available quantity for a kind
    pub fn set(&mut self, kind: impl Into<String>, available: u32) {
        self.levels.insert(kind.into(), available);
    }

    /// Whether no stock information is known
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl FromIterator<(String, u32)> for StockLevels {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self { levels: iter.into_iter().collect() }
    }
}

/// A backend-confirmed stock shortage, parsed from the canonical rejection
/// message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockShortage {
    /// Consumable item name as the backend reported it
    pub item: String,
    pub available: u32,
    pub requested: u32,
}

/// A decommissioned terminal inventory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadStockItem {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub entry_date: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}
