//! Stock-aware validation
//!
//! Structural rules per ticket kind plus a soft stock-sufficiency check.
//! Hard errors block submission entirely; warnings are advisory and the
//! backend stays authoritative. Field paths mirror the patch's flattened
//! key convention so every message routes to the exact control that
//! produced it.

mod shortage;

use once_cell::sync::Lazy;
use regex::Regex;
use tpedesk_common::FieldError;
use tpedesk_domain::constants::PHONE_PATTERN;
use tpedesk_domain::patch::keys;
use tpedesk_domain::{
    Client, ClientLink, StockLevels, Terminal, Ticket, TicketDetails, TicketKind,
};

pub use shortage::parse_stock_shortage;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex")
});

/// Outcome of validating a working snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
    warnings: Vec<FieldError>,
}

impl ValidationReport {
    /// Whether the snapshot may be submitted (no hard errors; warnings do
    /// not block)
    pub fn is_submittable(&self) -> bool {
        self.errors.is_empty()
    }

    /// Hard errors that block submission
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Advisory warnings; submission stays allowed
    pub fn warnings(&self) -> &[FieldError] {
        &self.warnings
    }

    fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(FieldError::new(field, message));
    }
}

/// Validate a working snapshot against the known stock levels.
///
/// Pure function of its inputs; no ambient state is consulted.
pub fn validate(working: &Ticket, stock: &StockLevels) -> ValidationReport {
    let mut report = ValidationReport::default();

    validate_client(&working.client, working.kind(), &mut report);

    match &working.details {
        TicketDetails::NetworkCheck => {}
        TicketDetails::Intervention { terminal, problem } => {
            validate_terminal(terminal, &mut report);
            if problem.trim().is_empty() {
                report.error(keys::INTERVENTION_PROBLEM, "problem description is required");
            }
        }
        TicketDetails::Consumable { terminal, items } => {
            validate_terminal(terminal, &mut report);
            validate_consumables(items, stock, &mut report);
        }
        TicketDetails::DeblockingOrder { terminal } => {
            validate_terminal(terminal, &mut report);
        }
    }

    report
}

fn validate_client(link: &ClientLink, kind: TicketKind, report: &mut ValidationReport) {
    match link {
        ClientLink::Inline(client) => validate_inline_client(client, report),
        ClientLink::Linked { client_id } => {
            if kind != TicketKind::DeblockingOrder {
                report.error(
                    keys::CLIENT_ID,
                    "existing-client selection is only available for deblocking orders",
                );
            }
            if client_id.trim().is_empty() {
                report.error(keys::CLIENT_ID, "an existing client must be selected");
            }
        }
    }
}

fn validate_inline_client(client: &Client, report: &mut ValidationReport) {
    if client.name.trim().is_empty() {
        report.error(keys::CLIENT_NAME, "client name is required");
    }
    if client.phone.trim().is_empty() {
        report.error(keys::CLIENT_PHONE, "phone number is required");
    } else if !PHONE_RE.is_match(&client.phone) {
        report.error(keys::CLIENT_PHONE, "invalid phone number");
    }
    // Mobile is optional but must be well-formed when present
    if !client.mobile.is_empty() && !PHONE_RE.is_match(&client.mobile) {
        report.error(keys::CLIENT_MOBILE, "invalid mobile number");
    }
    if client.location.wilaya.trim().is_empty() {
        report.error(keys::CLIENT_WILAYA, "wilaya is required");
    }
}

fn validate_terminal(terminal: &Terminal, report: &mut ValidationReport) {
    if terminal.manufacturer.trim().is_empty() {
        report.error(keys::TERMINAL_MANUFACTURER, "terminal manufacturer is required");
    }
    if terminal.serial_number.trim().is_empty() {
        report.error(keys::TERMINAL_SERIAL_NUMBER, "terminal serial number is required");
    }
}

fn validate_consumables(
    items: &[tpedesk_domain::ConsumableLine],
    stock: &StockLevels,
    report: &mut ValidationReport,
) {
    if items.is_empty() {
        report.error(keys::CONSUMABLE_ITEMS, "at least one consumable item is required");
        return;
    }

    for (index, line) in items.iter().enumerate() {
        let kind_field = format!("{}[{index}].kind", keys::CONSUMABLE_ITEMS);
        let quantity_field = format!("{}[{index}].quantity", keys::CONSUMABLE_ITEMS);

        if line.kind.trim().is_empty() {
            report.error(kind_field.clone(), "consumable type is required");
        }
        if line.quantity == 0 {
            report.error(quantity_field.clone(), "quantity must be at least 1");
        }

        // Duplicate types are an error, never silently merged
        if items[..index].iter().any(|earlier| earlier.kind == line.kind) {
            report.error(
                kind_field,
                format!("duplicate consumable type \"{}\"", line.kind),
            );
        }

        // Soft check only; the backend remains authoritative
        if let Some(available) = stock.available(&line.kind) {
            if line.quantity > available {
                report.warning(
                    quantity_field,
                    format!(
                        "only {available} × {} in stock ({} requested)",
                        line.kind, line.quantity
                    ),
                );
            }
        }
    }
}
