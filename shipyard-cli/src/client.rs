//! HTTP client for the Shipyard REST API.

use crate::CliResult;
use reqwest::{Client, Response};
use serde::Deserialize;
use shipyard_core::{PageRequest, Ship, ShipDraft, ShipFilter};
use std::future::Future;
use std::pin::Pin;

/// Server used when neither `--server-url` nor `SHIPYARD_API_URL` is given.
pub(crate) const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Remote ship operations used by the CLI commands.
pub(crate) trait ShipyardClient {
    fn list_ships<'a>(
        &'a self,
        filter: &'a ShipFilter,
        page: &'a PageRequest,
    ) -> Pin<Box<dyn Future<Output = CliResult<Vec<Ship>>> + Send + 'a>>;

    fn count_ships<'a>(
        &'a self,
        filter: &'a ShipFilter,
    ) -> Pin<Box<dyn Future<Output = CliResult<u64>> + Send + 'a>>;

    fn get_ship<'a>(&'a self, id: i64) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>>;

    fn create_ship<'a>(
        &'a self,
        draft: &'a ShipDraft,
    ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>>;

    fn update_ship<'a>(
        &'a self,
        id: i64,
        patch: &'a ShipDraft,
    ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>>;

    fn delete_ship<'a>(&'a self, id: i64) -> Pin<Box<dyn Future<Output = CliResult<()>> + Send + 'a>>;
}

/// Reqwest-backed Shipyard client.
pub(crate) struct ReqwestShipyardClient {
    client: Client,
    server_url: String,
}

impl ReqwestShipyardClient {
    /// Build a client for `server_url`.
    pub(crate) fn new(server_url: &str) -> CliResult<Self> {
        let server_url = normalize_server_url(server_url)?;
        let client = Client::builder().user_agent("shipyard-cli").build()?;
        Ok(Self { client, server_url })
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Normalize the server URL for consistent API requests.
fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Turn non-success responses into errors carrying the server's message.
async fn check_status(response: Response) -> CliResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|error| error.message)
        .unwrap_or(body);
    Err(format!("server returned {status}: {message}").into())
}

async fn list_ships(
    client: &Client,
    server_url: &str,
    filter: &ShipFilter,
    page: &PageRequest,
) -> CliResult<Vec<Ship>> {
    let response = client
        .get(format!("{server_url}/rest/ships"))
        .query(filter)
        .query(page)
        .send()
        .await?;
    Ok(check_status(response).await?.json::<Vec<Ship>>().await?)
}

async fn count_ships(client: &Client, server_url: &str, filter: &ShipFilter) -> CliResult<u64> {
    let response = client
        .get(format!("{server_url}/rest/ships/count"))
        .query(filter)
        .send()
        .await?;
    Ok(check_status(response).await?.json::<u64>().await?)
}

async fn get_ship(client: &Client, server_url: &str, id: i64) -> CliResult<Ship> {
    let response = client
        .get(format!("{server_url}/rest/ships/{id}"))
        .send()
        .await?;
    Ok(check_status(response).await?.json::<Ship>().await?)
}

async fn create_ship(client: &Client, server_url: &str, draft: &ShipDraft) -> CliResult<Ship> {
    let response = client
        .post(format!("{server_url}/rest/ships"))
        .json(draft)
        .send()
        .await?;
    Ok(check_status(response).await?.json::<Ship>().await?)
}

async fn update_ship(
    client: &Client,
    server_url: &str,
    id: i64,
    patch: &ShipDraft,
) -> CliResult<Ship> {
    let response = client
        .post(format!("{server_url}/rest/ships/{id}"))
        .json(patch)
        .send()
        .await?;
    Ok(check_status(response).await?.json::<Ship>().await?)
}

async fn delete_ship(client: &Client, server_url: &str, id: i64) -> CliResult<()> {
    let response = client
        .delete(format!("{server_url}/rest/ships/{id}"))
        .send()
        .await?;
    check_status(response).await?;
    Ok(())
}

impl ShipyardClient for ReqwestShipyardClient {
    fn list_ships<'a>(
        &'a self,
        filter: &'a ShipFilter,
        page: &'a PageRequest,
    ) -> Pin<Box<dyn Future<Output = CliResult<Vec<Ship>>> + Send + 'a>> {
        Box::pin(list_ships(&self.client, &self.server_url, filter, page))
    }

    fn count_ships<'a>(
        &'a self,
        filter: &'a ShipFilter,
    ) -> Pin<Box<dyn Future<Output = CliResult<u64>> + Send + 'a>> {
        Box::pin(count_ships(&self.client, &self.server_url, filter))
    }

    fn get_ship<'a>(&'a self, id: i64) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>> {
        Box::pin(get_ship(&self.client, &self.server_url, id))
    }

    fn create_ship<'a>(
        &'a self,
        draft: &'a ShipDraft,
    ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>> {
        Box::pin(create_ship(&self.client, &self.server_url, draft))
    }

    fn update_ship<'a>(
        &'a self,
        id: i64,
        patch: &'a ShipDraft,
    ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>> {
        Box::pin(update_ship(&self.client, &self.server_url, id, patch))
    }

    fn delete_ship<'a>(&'a self, id: i64) -> Pin<Box<dyn Future<Output = CliResult<()>> + Send + 'a>> {
        Box::pin(delete_ship(&self.client, &self.server_url, id))
    }
}
