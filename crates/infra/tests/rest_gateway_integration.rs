//! Integration tests for the REST gateway against a WireMock server
//!
//! Coverage:
//! - Happy path: fetch -> patch -> refreshed ticket decode
//! - Status mapping: 404/410 -> NotFound, 409 -> Conflict, 4xx ->
//!   Rejected (verbatim backend message), 5xx -> Network
//! - Retry on server error for replayable requests
//! - Actor headers and client-policy forwarding

use std::time::Duration;

use serde_json::json;
use tpedesk_core::{InventoryGateway, TicketGateway};
use tpedesk_domain::patch::keys;
use tpedesk_domain::{
    ActorContext, ActorRole, Client, ClientLink, NewClientPolicy, PendingUpload, Ticket,
    TicketDetails, TicketPatch, TpeDeskError,
};
use tpedesk_infra::{HttpClient, RestGateway};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server_uri: &str, attempts: usize) -> RestGateway {
    let http = HttpClient::builder()
        .timeout(Duration::from_secs(5))
        .max_attempts(attempts)
        .base_backoff(Duration::from_millis(1))
        .build()
        .expect("client builds");
    RestGateway::from_parts(http, server_uri, NewClientPolicy::DedupeByPhone)
        .expect("gateway builds")
}

fn actor() -> ActorContext {
    ActorContext::new("u-9", ActorRole::BackOffice)
}

fn sample_ticket() -> Ticket {
    let mut client = Client::default();
    client.name = "Client".into();
    client.phone = "0215554433".into();
    let mut ticket = Ticket::draft(ClientLink::Inline(client), TicketDetails::NetworkCheck);
    ticket.id = "tk-1".into();
    ticket.notes = "line drops".into();
    ticket
}

fn ticket_body(ticket: &Ticket) -> serde_json::Value {
    serde_json::to_value(ticket).expect("ticket serializes")
}

#[tokio::test]
async fn fetch_ticket_decodes_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets/tk-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ticket_body(&sample_ticket())))
        .mount(&server)
        .await;

    let ticket = gateway(&server.uri(), 1).fetch_ticket("tk-1").await.expect("fetch succeeds");
    assert_eq!(ticket.id, "tk-1");
    assert_eq!(ticket.notes, "line drops");
}

#[tokio::test]
async fn update_sends_exact_patch_and_actor_headers() {
    let server = MockServer::start().await;
    let mut refreshed = sample_ticket();
    refreshed.notes = "antenna replaced".into();

    let mut patch = TicketPatch::new();
    patch.set(keys::NOTES, json!("antenna replaced"));

    Mock::given(method("PATCH"))
        .and(path("/tickets/tk-1"))
        .and(header("X-Actor-Id", "u-9"))
        .and(header("X-Actor-Role", "BACK_OFFICE"))
        .and(body_json(json!({ "notes": "antenna replaced" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ticket_body(&refreshed)))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = gateway(&server.uri(), 1)
        .update_ticket(&actor(), "tk-1", &patch, &[])
        .await
        .expect("update succeeds");
    assert_eq!(ticket.notes, "antenna replaced");
}

#[tokio::test]
async fn multipart_update_carries_staged_files() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/tickets/tk-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ticket_body(&sample_ticket())))
        .expect(1)
        .mount(&server)
        .await;

    let files = vec![PendingUpload::new("scan.pdf", vec![0x25, 0x50, 0x44, 0x46])];
    let patch = TicketPatch::new();
    gateway(&server.uri(), 1)
        .update_ticket(&actor(), "tk-1", &patch, &files)
        .await
        .expect("multipart update succeeds");
}

#[tokio::test]
async fn missing_ticket_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets/gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "ticket not found" })),
        )
        .mount(&server)
        .await;

    let err = gateway(&server.uri(), 1).fetch_ticket("gone").await.expect_err("404 maps");
    assert_eq!(err, TpeDeskError::NotFound("ticket not found".into()));
}

#[tokio::test]
async fn conflict_maps_to_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/tickets/tk-1"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "modified elsewhere" })),
        )
        .mount(&server)
        .await;

    let err = gateway(&server.uri(), 1)
        .update_ticket(&actor(), "tk-1", &TicketPatch::new(), &[])
        .await
        .expect_err("409 maps");
    assert_eq!(err, TpeDeskError::Conflict("modified elsewhere".into()));
}

#[tokio::test]
async fn shortage_rejection_surfaces_backend_message_verbatim() {
    let server = MockServer::start().await;
    let message = r#"Not enough stock for "Papier thermique" (have 3, requested 10)"#;
    Mock::given(method("PATCH"))
        .and(path("/tickets/tk-1"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "message": message })))
        .mount(&server)
        .await;

    let err = gateway(&server.uri(), 1)
        .update_ticket(&actor(), "tk-1", &TicketPatch::new(), &[])
        .await
        .expect_err("422 maps");
    assert_eq!(err, TpeDeskError::Rejected(message.into()));
}

#[tokio::test]
async fn server_errors_map_to_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets/tk-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = gateway(&server.uri(), 1).fetch_ticket("tk-1").await.expect_err("500 maps");
    assert_eq!(err, TpeDeskError::Network("boom".into()));
}

#[tokio::test]
async fn server_errors_are_retried_for_replayable_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets/tk-1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tickets/tk-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ticket_body(&sample_ticket())))
        .mount(&server)
        .await;

    let ticket =
        gateway(&server.uri(), 3).fetch_ticket("tk-1").await.expect("retry then succeed");
    assert_eq!(ticket.id, "tk-1");
}

#[tokio::test]
async fn create_forwards_the_client_policy() {
    let server = MockServer::start().await;
    let mut created = sample_ticket();
    created.id = "tk-new".into();

    Mock::given(method("POST"))
        .and(path("/tickets"))
        .and(query_param("client_policy", "dedupe_by_phone"))
        .respond_with(ResponseTemplate::new(201).set_body_json(ticket_body(&created)))
        .expect(1)
        .mount(&server)
        .await;

    let draft = Ticket::draft(ClientLink::default(), TicketDetails::NetworkCheck);
    let ticket =
        gateway(&server.uri(), 1).create_ticket(&actor(), &draft).await.expect("create succeeds");
    assert_eq!(ticket.id, "tk-new");
}

#[tokio::test]
async fn close_ticket_posts_to_the_close_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tickets/tk-1/close"))
        .and(header("X-Actor-Role", "BACK_OFFICE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server.uri(), 1).close_ticket(&actor(), "tk-1").await.expect("close succeeds");
}

#[tokio::test]
async fn download_returns_raw_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets/tk-1/attachments/att-1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&server)
        .await;

    let bytes = gateway(&server.uri(), 1)
        .download_attachment("tk-1", "att-1")
        .await
        .expect("download succeeds");
    assert_eq!(bytes, vec![1, 2, 3]);
}

#[tokio::test]
async fn delete_attachment_hits_the_attachment_resource() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tickets/tk-1/attachments/att-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server.uri(), 1)
        .delete_attachment("tk-1", "att-1")
        .await
        .expect("delete succeeds");
}

#[tokio::test]
async fn stock_levels_decode_from_a_flat_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stock"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "thermal_paper": 12, "ink_ribbon": 0 })),
        )
        .mount(&server)
        .await;

    let stock = gateway(&server.uri(), 1).fetch_known_stock().await.expect("stock fetch");
    assert_eq!(stock.available("thermal_paper"), Some(12));
    assert_eq!(stock.available("ink_ribbon"), Some(0));
    assert_eq!(stock.available("unknown"), None);
}

#[tokio::test]
async fn clients_for_bank_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/banks/bk-1/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "cl-1",
                "name": "Pharmacie Centrale",
                "brand": "PC",
                "phone": "0215554433",
                "mobile": "",
                "location": { "wilaya": "Alger", "daira": "", "address": "" }
            }
        ])))
        .mount(&server)
        .await;

    let clients =
        gateway(&server.uri(), 1).fetch_clients_for_bank("bk-1").await.expect("clients fetch");
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].id.as_deref(), Some("cl-1"));
}

#[tokio::test]
async fn dead_stock_entries_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dead-stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "manufacturer": "Ingenico",
                "model": "iCT220",
                "serial_number": "SN-9001",
                "entry_date": "2024-11-03T10:00:00Z",
                "reason": "water damage"
            },
            {
                "manufacturer": "Verifone",
                "model": "VX520",
                "serial_number": "VF-0007",
                "entry_date": null,
                "reason": null
            }
        ])))
        .mount(&server)
        .await;

    let items = gateway(&server.uri(), 1).fetch_dead_stock().await.expect("dead stock fetch");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].serial_number, "SN-9001");
    assert_eq!(items[0].reason.as_deref(), Some("water damage"));
    assert!(items[0].entry_date.is_some());
    assert!(items[1].entry_date.is_none());
}
