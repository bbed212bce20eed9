//! Server configuration loaded from the environment.

use std::str::FromStr;

use shipyard_core::{ListingDefaults, ShipOrder};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UI_ORIGINS: &str = "http://127.0.0.1:4200,http://localhost:4200";

/// Runtime settings for the Shipyard server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Origins allowed by CORS.
    pub ui_origins: Vec<String>,
    /// Listing defaults for order and paging.
    pub listing: ListingDefaults,
}

impl ServerConfig {
    /// Build the config from process environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                "DATABASE_URL must be set to a PostgreSQL connection string".to_string()
            })?;
        let host = lookup("SHIPYARD_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("SHIPYARD_PORT") {
            Some(raw) => u16::from_str(raw.trim())
                .map_err(|_| format!("SHIPYARD_PORT must be a u16 number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };
        let origins = lookup("SHIPYARD_UI_ORIGINS").unwrap_or_else(|| DEFAULT_UI_ORIGINS.to_string());
        let ui_origins = origins
            .split(',')
            .map(|value| value.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let mut listing = ListingDefaults::STANDARD;
        if let Some(raw) = lookup("SHIPYARD_PAGE_SIZE") {
            listing.page_size = i32::from_str(raw.trim())
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| format!("SHIPYARD_PAGE_SIZE must be a positive number, got {raw:?}"))?;
        }
        if let Some(raw) = lookup("SHIPYARD_ORDER") {
            listing.order = ShipOrder::from_str(raw.trim())
                .map_err(|_| format!("SHIPYARD_ORDER must be ID, SPEED, DATE or RATING, got {raw:?}"))?;
        }

        Ok(Self {
            database_url,
            host,
            port,
            ui_origins,
            listing,
        })
    }
}
