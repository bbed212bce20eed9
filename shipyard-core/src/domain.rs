//! Domain entities for Shipyard.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ShipyardError;

/// Category of a ship.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    /// Cargo and passenger transport.
    Transport,
    /// Armed vessel.
    Military,
    /// Trading vessel.
    Merchant,
}

impl ShipType {
    /// All ship types in declaration order.
    pub const ALL: [ShipType; 3] = [ShipType::Transport, ShipType::Military, ShipType::Merchant];

    /// Stable wire and storage label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipType::Transport => "TRANSPORT",
            ShipType::Military => "MILITARY",
            ShipType::Merchant => "MERCHANT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = ShipyardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "TRANSPORT" => Ok(ShipType::Transport),
            "MILITARY" => Ok(ShipType::Military),
            "MERCHANT" => Ok(ShipType::Merchant),
            other => Err(ShipyardError::invalid(format!("unknown ship type: {other}"))),
        }
    }
}

/// Sort key applied to ship listings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipOrder {
    /// Ship identifier.
    Id,
    /// Ship speed.
    Speed,
    /// Production date.
    Date,
    /// Derived rating.
    Rating,
}

impl ShipOrder {
    /// Stable wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipOrder::Id => "ID",
            ShipOrder::Speed => "SPEED",
            ShipOrder::Date => "DATE",
            ShipOrder::Rating => "RATING",
        }
    }
}

impl fmt::Display for ShipOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ShipOrder {
    type Err = ShipyardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ID" => Ok(ShipOrder::Id),
            "SPEED" => Ok(ShipOrder::Speed),
            "DATE" => Ok(ShipOrder::Date),
            "RATING" => Ok(ShipOrder::Rating),
            other => Err(ShipyardError::invalid(format!("unknown order: {other}"))),
        }
    }
}

/// A persisted ship record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship category.
    pub ship_type: ShipType,
    /// Production date, serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub prod_date: DateTime<Utc>,
    /// Whether the ship has had a previous owner.
    pub is_used: bool,
    /// Cruising speed.
    pub speed: f64,
    /// Crew headcount.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

/// A validated ship that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShip {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship category.
    pub ship_type: ShipType,
    /// Production date.
    pub prod_date: DateTime<Utc>,
    /// Whether the ship has had a previous owner.
    pub is_used: bool,
    /// Cruising speed.
    pub speed: f64,
    /// Crew headcount.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl NewShip {
    /// Attach a storage identifier.
    pub fn with_id(self, id: i64) -> Ship {
        Ship {
            id,
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            prod_date: self.prod_date,
            is_used: self.is_used,
            speed: self.speed,
            crew_size: self.crew_size,
            rating: self.rating,
        }
    }
}

/// Client-supplied ship payload for create and update requests.
///
/// Every field is optional; `id` and `rating` are never read from clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipDraft {
    /// Ship name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Home planet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Ship category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    /// Production date as epoch milliseconds.
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub prod_date: Option<DateTime<Utc>>,
    /// Whether the ship has had a previous owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_used: Option<bool>,
    /// Cruising speed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Crew headcount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crew_size: Option<i32>,
}

impl ShipDraft {
    /// Whether no field is present.
    pub fn is_empty(&self) -> bool {
        self == &ShipDraft::default()
    }
}
