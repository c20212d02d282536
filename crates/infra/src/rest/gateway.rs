//! Reqwest-based gateway behind the core ports
//!
//! Endpoint layout:
//! - `GET    /tickets/{id}`
//! - `POST   /tickets?client_policy=...`
//! - `PATCH  /tickets/{id}` (JSON patch, or multipart when files ride along)
//! - `POST   /tickets/{id}/close`
//! - `POST   /tickets/{id}/bank`
//! - `DELETE /tickets/{id}/attachments/{attachment_id}`
//! - `GET    /tickets/{id}/attachments/{attachment_id}`
//! - `GET    /stock`
//! - `GET    /banks/{bank_id}/clients`
//! - `GET    /dead-stock`
//!
//! HTTP status mapping: 404/410 -> `NotFound`, 409 -> `Conflict`, other
//! 4xx -> `Rejected` (carrying the backend message so shortage parsing can
//! run on it), 5xx and transport failures -> `Network`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tpedesk_core::{InventoryGateway, TicketGateway};
use tpedesk_domain::{
    ActorContext, ActorRole, ApiConfig, Client, DeadStockItem, NewClientPolicy, PendingUpload,
    Result, StockLevels, Ticket, TicketPatch, TpeDeskError,
};
use url::Url;

use crate::errors::InfraError;
use crate::http::HttpClient;

/// REST implementation of the core gateways
pub struct RestGateway {
    http: HttpClient,
    base_url: Url,
    policy: NewClientPolicy,
}

impl RestGateway {
    /// Build a gateway from configuration
    pub fn new(config: &ApiConfig, policy: NewClientPolicy) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Self::from_parts(http, &config.base_url, policy)
    }

    /// Build a gateway around an already-configured HTTP client
    pub fn from_parts(http: HttpClient, base_url: &str, policy: NewClientPolicy) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| TpeDeskError::from(InfraError::InvalidUrl(err.to_string())))?;
        Ok(Self { http, base_url, policy })
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                TpeDeskError::from(InfraError::InvalidUrl("base URL cannot be a base".into()))
            })?
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    fn authed(&self, method: Method, url: Url, actor: &ActorContext) -> RequestBuilder {
        self.request(method, url)
            .header("X-Actor-Id", &actor.user_id)
            .header("X-Actor-Role", role_header(actor.role))
    }
}

const fn role_header(role: ActorRole) -> &'static str {
    match role {
        ActorRole::Agent => "AGENT",
        ActorRole::BackOffice => "BACK_OFFICE",
    }
}

const fn policy_param(policy: NewClientPolicy) -> &'static str {
    match policy {
        NewClientPolicy::AlwaysCreate => "always_create",
        NewClientPolicy::DedupeByPhone => "dedupe_by_phone",
    }
}

fn extract_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.to_string()
            } else {
                trimmed.to_string()
            }
        })
}

async fn into_domain_error(response: Response) -> TpeDeskError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body, status);
    match status.as_u16() {
        404 | 410 => TpeDeskError::NotFound(message),
        409 => TpeDeskError::Conflict(message),
        400..=499 => TpeDeskError::Rejected(message),
        _ => TpeDeskError::Network(message),
    }
}

async fn expect_ok(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(into_domain_error(response).await)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    response.json().await.map_err(|err| TpeDeskError::from(InfraError::from(err)))
}

#[async_trait]
impl TicketGateway for RestGateway {
    async fn fetch_ticket(&self, id: &str) -> Result<Ticket> {
        let url = self.url(&["tickets", id])?;
        let response = self.http.send(self.request(Method::GET, url)).await?;
        decode(expect_ok(response).await?).await
    }

    async fn create_ticket(&self, actor: &ActorContext, draft: &Ticket) -> Result<Ticket> {
        let mut url = self.url(&["tickets"])?;
        url.query_pairs_mut().append_pair("client_policy", policy_param(self.policy));
        let builder = self.authed(Method::POST, url, actor).json(draft);
        let response = self.http.send(builder).await?;
        decode(expect_ok(response).await?).await
    }

    async fn update_ticket(
        &self,
        actor: &ActorContext,
        id: &str,
        patch: &TicketPatch,
        files: &[PendingUpload],
    ) -> Result<Ticket> {
        let url = self.url(&["tickets", id])?;

        let response = if files.is_empty() {
            let builder = self.authed(Method::PATCH, url, actor).json(patch);
            self.http.send(builder).await?
        } else {
            let patch_json = serde_json::to_string(patch)
                .map_err(|err| TpeDeskError::from(InfraError::from(err)))?;
            let mut form = Form::new().part(
                "patch",
                Part::text(patch_json)
                    .mime_str("application/json")
                    .map_err(|err| TpeDeskError::from(InfraError::from(err)))?,
            );
            for file in files {
                form = form.part(
                    "files",
                    Part::bytes(file.content.clone()).file_name(file.filename.clone()),
                );
            }
            let builder = self.authed(Method::PATCH, url, actor).multipart(form);
            self.http.send_once(builder).await?
        };

        decode(expect_ok(response).await?).await
    }

    async fn close_ticket(&self, actor: &ActorContext, id: &str) -> Result<()> {
        let url = self.url(&["tickets", id, "close"])?;
        let response = self.http.send(self.authed(Method::POST, url, actor)).await?;
        expect_ok(response).await?;
        Ok(())
    }

    async fn assign_bank(
        &self,
        actor: &ActorContext,
        ticket_id: &str,
        bank_id: &str,
    ) -> Result<Ticket> {
        let url = self.url(&["tickets", ticket_id, "bank"])?;
        let builder = self.authed(Method::POST, url, actor).json(&json!({ "bank_id": bank_id }));
        let response = self.http.send(builder).await?;
        decode(expect_ok(response).await?).await
    }

    async fn delete_attachment(&self, ticket_id: &str, attachment_id: &str) -> Result<()> {
        let url = self.url(&["tickets", ticket_id, "attachments", attachment_id])?;
        let response = self.http.send(self.request(Method::DELETE, url)).await?;
        expect_ok(response).await?;
        Ok(())
    }

    async fn download_attachment(&self, ticket_id: &str, attachment_id: &str) -> Result<Vec<u8>> {
        let url = self.url(&["tickets", ticket_id, "attachments", attachment_id])?;
        let response = self.http.send(self.request(Method::GET, url)).await?;
        let response = expect_ok(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| TpeDeskError::from(InfraError::from(err)))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl InventoryGateway for RestGateway {
    async fn fetch_known_stock(&self) -> Result<StockLevels> {
        let url = self.url(&["stock"])?;
        let response = self.http.send(self.request(Method::GET, url)).await?;
        decode(expect_ok(response).await?).await
    }

    async fn fetch_clients_for_bank(&self, bank_id: &str) -> Result<Vec<Client>> {
        let url = self.url(&["banks", bank_id, "clients"])?;
        let response = self.http.send(self.request(Method::GET, url)).await?;
        decode(expect_ok(response).await?).await
    }

    async fn fetch_dead_stock(&self) -> Result<Vec<DeadStockItem>> {
        let url = self.url(&["dead-stock"])?;
        let response = self.http.send(self.request(Method::GET, url)).await?;
        decode(expect_ok(response).await?).await
    }
}
