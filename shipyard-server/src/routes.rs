//! HTTP handlers for Shipyard server.

use std::sync::Arc;

use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, web};
use serde::{Deserialize, Serialize};
use shipyard_core::{
    PageRequest, Ship, ShipDraft, ShipFilter, ShipOrder, ShipService, ShipStore, ShipType,
    ShipyardError,
};
use utoipa::{OpenApi, ToSchema};

use crate::openapi::ApiDoc;

/// Store handle shared by every worker.
pub type SharedStore = Arc<dyn ShipStore + Send + Sync>;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Ship operations over the configured store.
    pub ships: ShipService<SharedStore>,
}

/// Error payload returned for rejected requests.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub message: String,
}

/// Query parameters accepted by the listing endpoint.
///
/// Filter and paging fields are spelled out rather than flattened because
/// urlencoded flattening loses numeric and boolean types.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipListQuery {
    name: Option<String>,
    planet: Option<String>,
    ship_type: Option<ShipType>,
    after: Option<i64>,
    before: Option<i64>,
    is_used: Option<bool>,
    min_speed: Option<f64>,
    max_speed: Option<f64>,
    min_crew_size: Option<i32>,
    max_crew_size: Option<i32>,
    min_rating: Option<f64>,
    max_rating: Option<f64>,
    order: Option<ShipOrder>,
    page_number: Option<i32>,
    page_size: Option<i32>,
}

impl ShipListQuery {
    fn into_parts(self) -> (ShipFilter, PageRequest) {
        let filter = ShipFilter {
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            after: self.after,
            before: self.before,
            is_used: self.is_used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        };
        let page = PageRequest {
            order: self.order,
            page_number: self.page_number,
            page_size: self.page_size,
        };
        (filter, page)
    }
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse { message })
}

/// Translate a core error into its HTTP response.
pub fn error_response(err: ShipyardError) -> HttpResponse {
    match &err {
        ShipyardError::InvalidInput(_) | ShipyardError::InvalidIdentifier(_) => {
            log::warn!("rejected request: {err}");
            bad_request(err.to_string())
        }
        ShipyardError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            message: err.to_string(),
        }),
        ShipyardError::Storage(_) => {
            log::error!("{err}");
            HttpResponse::InternalServerError().json(ErrorResponse {
                message: err.to_string(),
            })
        }
    }
}

async fn run_blocking<T, F>(state: &web::Data<AppState>, op: F) -> Result<T, HttpResponse>
where
    T: Send + 'static,
    F: FnOnce(&ShipService<SharedStore>) -> shipyard_core::Result<T> + Send + 'static,
{
    let ships = state.ships.clone();
    match web::block(move || op(&ships)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(error_response(err)),
        Err(err) => {
            log::error!("ship task failed: {err}");
            Err(HttpResponse::InternalServerError().json(ErrorResponse {
                message: format!("ship task failed: {err}"),
            }))
        }
    }
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(format!("invalid ship payload: {err}"));
    InternalError::from_response(err, response).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(format!("invalid query parameters: {err}"));
    InternalError::from_response(err, response).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(format!("invalid ship id: {err}"));
    InternalError::from_response(err, response).into()
}

/// Register ship routes and extractor error handlers.
///
/// `/rest/ships/count` is registered before `/rest/ships/{id}` so the literal
/// segment wins.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(list_ships)
        .service(ships_count)
        .service(create_ship)
        .service(openapi_json)
        .service(get_ship)
        .service(update_ship)
        .service(delete_ship);
}

#[utoipa::path(
    get,
    path = "/rest/ships",
    params(ShipFilter, PageRequest),
    responses(
        (status = 200, description = "One page of matching ships", body = [Ship]),
        (status = 400, description = "Invalid filter or paging", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships")]
/// List ships matching the filters, sorted and paged.
pub async fn list_ships(
    state: web::Data<AppState>,
    query: web::Query<ShipListQuery>,
) -> impl Responder {
    let (filter, page) = query.into_inner().into_parts();
    match run_blocking(&state, move |ships| ships.get_all_ships(&filter, &page)).await {
        Ok(ships) => HttpResponse::Ok().json(ships),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships/count",
    params(ShipFilter),
    responses(
        (status = 200, description = "Number of matching ships", body = u64),
        (status = 400, description = "Invalid filter", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/count")]
/// Count ships matching the filters.
pub async fn ships_count(
    state: web::Data<AppState>,
    query: web::Query<ShipFilter>,
) -> impl Responder {
    let filter = query.into_inner();
    match run_blocking(&state, move |ships| ships.ships_count(&filter)).await {
        Ok(count) => HttpResponse::Ok().json(count),
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/rest/ships",
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Created ship", body = Ship),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships")]
/// Create a ship; the rating is computed server-side.
pub async fn create_ship(
    state: web::Data<AppState>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let draft = payload.into_inner();
    match run_blocking(&state, move |ships| ships.create(&draft)).await {
        Ok(ship) => {
            log::info!("created ship {} ({})", ship.id, ship.name);
            HttpResponse::Ok().json(ship)
        }
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship", body = Ship),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Unknown ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/{id}")]
/// Fetch a ship by id.
pub async fn get_ship(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match run_blocking(&state, move |ships| ships.get_ship(id)).await {
        Ok(ship) => HttpResponse::Ok().json(ship),
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Updated ship", body = Ship),
        (status = 400, description = "Invalid identifier or field", body = ErrorResponse),
        (status = 404, description = "Unknown ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships/{id}")]
/// Update the fields present in the payload and re-rate the ship.
pub async fn update_ship(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let id = path.into_inner();
    let patch = payload.into_inner();
    match run_blocking(&state, move |ships| ships.update(id, &patch)).await {
        Ok(ship) => {
            log::info!("updated ship {}", ship.id);
            HttpResponse::Ok().json(ship)
        }
        Err(response) => response,
    }
}

#[utoipa::path(
    delete,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Unknown ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/rest/ships/{id}")]
/// Delete a ship by id.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match run_blocking(&state, move |ships| ships.delete(id)).await {
        Ok(()) => {
            log::info!("deleted ship {id}");
            HttpResponse::Ok().finish()
        }
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/rest/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
