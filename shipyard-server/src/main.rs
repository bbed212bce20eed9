#![deny(missing_docs)]
//! Shipyard server executable.
//!
//! Hosts the ship registry REST endpoints over PostgreSQL.

mod config;
mod db;
mod models;
mod openapi;
mod routes;
mod schema;
mod store;

#[cfg(not(test))]
use std::sync::Arc;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;
#[cfg(not(test))]
use shipyard_core::ShipService;

#[cfg(not(test))]
use crate::config::ServerConfig;
#[cfg(not(test))]
use crate::db::init_pool;
#[cfg(not(test))]
use crate::routes::{AppState, SharedStore, configure};
#[cfg(not(test))]
use crate::store::PgShipStore;

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    let pool = init_pool(&config.database_url).map_err(std::io::Error::other)?;
    let store: SharedStore = Arc::new(PgShipStore::new(pool));
    let state = web::Data::new(AppState {
        ships: ShipService::with_defaults(store, config.listing),
    });

    let ServerConfig {
        host,
        port,
        ui_origins,
        ..
    } = config;
    log::info!("listening on {host}:{port}");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &ui_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
