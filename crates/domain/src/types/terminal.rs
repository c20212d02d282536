//! Payment terminal (TPE) reference

use serde::{Deserialize, Serialize};

/// A physical payment terminal identified by make, model and serial number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
}
