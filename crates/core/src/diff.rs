//! Minimal-diff engine
//!
//! Compares an edited working snapshot against the last-confirmed snapshot
//! and produces the smallest patch describing only changed fields. Nested
//! client/terminal objects are compared leaf by leaf under flattened keys;
//! the consumable list is compared as a whole because partial list updates
//! are not a backend operation. Server-assigned timestamps and attachments
//! are never part of the patch; attachments are reconciled separately by
//! the session.

use serde_json::json;
use tpedesk_domain::patch::keys;
use tpedesk_domain::{Client, ClientLink, Terminal, Ticket, TicketDetails, TicketPatch};

/// Compute the minimal patch turning `confirmed` into `working`.
///
/// Law: `compute_diff(x, x)` is empty for any snapshot `x`.
pub fn compute_diff(confirmed: &Ticket, working: &Ticket) -> TicketPatch {
    let mut patch = TicketPatch::new();

    if working.status != confirmed.status {
        patch.set(keys::STATUS, json!(working.status));
    }
    if working.notes != confirmed.notes {
        patch.set(keys::NOTES, json!(working.notes));
    }

    diff_client(&confirmed.client, &working.client, &mut patch);
    diff_details(&confirmed.details, &working.details, &mut patch);

    patch
}

fn set_if_changed(patch: &mut TicketPatch, key: &str, old: &str, new: &str) {
    if old != new {
        patch.set(key, json!(new));
    }
}

fn diff_client(confirmed: &ClientLink, working: &ClientLink, patch: &mut TicketPatch) {
    match (confirmed, working) {
        (ClientLink::Inline(old), ClientLink::Inline(new)) => {
            if old.id != new.id {
                patch.set(keys::CLIENT_ID, json!(new.id));
            }
            diff_client_fields(old, new, patch);
        }
        (ClientLink::Linked { client_id: old }, ClientLink::Linked { client_id: new }) => {
            set_if_changed(patch, keys::CLIENT_ID, old, new);
        }
        // Mode switches always produce a patch, even when the visible text
        // coincides: the mode itself changed.
        (ClientLink::Linked { .. }, ClientLink::Inline(new)) => {
            patch.set(keys::IS_NEW_CLIENT, json!(true));
            if new.id.is_some() {
                patch.set(keys::CLIENT_ID, json!(new.id));
            }
            emit_client_fields(new, patch);
        }
        (ClientLink::Inline(_), ClientLink::Linked { client_id }) => {
            patch.set(keys::IS_NEW_CLIENT, json!(false));
            patch.set(keys::CLIENT_ID, json!(client_id));
        }
    }
}

fn diff_client_fields(old: &Client, new: &Client, patch: &mut TicketPatch) {
    set_if_changed(patch, keys::CLIENT_NAME, &old.name, &new.name);
    set_if_changed(patch, keys::CLIENT_BRAND, &old.brand, &new.brand);
    set_if_changed(patch, keys::CLIENT_PHONE, &old.phone, &new.phone);
    set_if_changed(patch, keys::CLIENT_MOBILE, &old.mobile, &new.mobile);
    set_if_changed(patch, keys::CLIENT_WILAYA, &old.location.wilaya, &new.location.wilaya);
    set_if_changed(patch, keys::CLIENT_DAIRA, &old.location.daira, &new.location.daira);
    set_if_changed(patch, keys::CLIENT_ADDRESS, &old.location.address, &new.location.address);
}

fn emit_client_fields(client: &Client, patch: &mut TicketPatch) {
    patch.set(keys::CLIENT_NAME, json!(client.name));
    patch.set(keys::CLIENT_BRAND, json!(client.brand));
    patch.set(keys::CLIENT_PHONE, json!(client.phone));
    patch.set(keys::CLIENT_MOBILE, json!(client.mobile));
    patch.set(keys::CLIENT_WILAYA, json!(client.location.wilaya));
    patch.set(keys::CLIENT_DAIRA, json!(client.location.daira));
    patch.set(keys::CLIENT_ADDRESS, json!(client.location.address));
}

fn diff_terminal(old: &Terminal, new: &Terminal, patch: &mut TicketPatch) {
    set_if_changed(patch, keys::TERMINAL_MANUFACTURER, &old.manufacturer, &new.manufacturer);
    set_if_changed(patch, keys::TERMINAL_MODEL, &old.model, &new.model);
    set_if_changed(patch, keys::TERMINAL_SERIAL_NUMBER, &old.serial_number, &new.serial_number);
}

fn diff_details(confirmed: &TicketDetails, working: &TicketDetails, patch: &mut TicketPatch) {
    match (confirmed, working) {
        (TicketDetails::NetworkCheck, TicketDetails::NetworkCheck) => {}
        (
            TicketDetails::Intervention { terminal: old_t, problem: old_p },
            TicketDetails::Intervention { terminal: new_t, problem: new_p },
        ) => {
            diff_terminal(old_t, new_t, patch);
            set_if_changed(patch, keys::INTERVENTION_PROBLEM, old_p, new_p);
        }
        (
            TicketDetails::Consumable { terminal: old_t, items: old_items },
            TicketDetails::Consumable { terminal: new_t, items: new_items },
        ) => {
            diff_terminal(old_t, new_t, patch);
            if old_items != new_items {
                patch.set(keys::CONSUMABLE_ITEMS, json!(new_items));
            }
        }
        (
            TicketDetails::DeblockingOrder { terminal: old_t },
            TicketDetails::DeblockingOrder { terminal: new_t },
        ) => {
            diff_terminal(old_t, new_t, patch);
        }
        // The kind tag is immutable after creation; a mismatched pair only
        // arises from misuse and contributes nothing to the patch.
        _ => {}
    }
}
