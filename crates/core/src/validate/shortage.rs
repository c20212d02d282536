//! Backend stock-shortage message parsing
//!
//! The backend rejects an unsatisfiable consumable request with a canonical
//! message of the form:
//!
//! ```text
//! Not enough stock for "Papier thermique" (have 3, requested 10)
//! ```
//!
//! A recognized message is re-rendered as a structured, field-addressable
//! shortage; anything else falls back to verbatim display.

use once_cell::sync::Lazy;
use regex::Regex;
use tpedesk_domain::StockShortage;

static SHORTAGE_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"^Not enough stock for "(?P<item>.+)" \(have (?P<have>\d+), requested (?P<requested>\d+)\)$"#)
        .expect("shortage pattern is a valid regex")
});

/// Parse a canonical shortage message, `None` when the format is not
/// recognized.
pub fn parse_stock_shortage(message: &str) -> Option<StockShortage> {
    let captures = SHORTAGE_RE.captures(message.trim())?;
    let item = captures.name("item")?.as_str().to_string();
    let available = captures.name("have")?.as_str().parse().ok()?;
    let requested = captures.name("requested")?.as_str().parse().ok()?;
    Some(StockShortage { item, available, requested })
}
