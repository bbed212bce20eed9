#![deny(missing_docs)]
//! Shipyard core library.
//!
//! Ship records, their validation and rating rules, and the
//! filter/sort/paginate pipeline behind the Shipyard service.

pub mod domain;
pub mod error;
pub mod filter;
pub mod listing;
pub mod rating;
pub mod report;
pub mod service;
pub mod store;
pub mod update;
pub mod validation;

pub use domain::{NewShip, Ship, ShipDraft, ShipOrder, ShipType};
pub use error::{Result, ShipyardError};
pub use filter::ShipFilter;
pub use listing::{ListingDefaults, PageRequest, ResolvedPage, count_ships, list_ships};
pub use rating::{compute_rating, rating};
pub use report::{render_json, render_ships_markdown, render_ships_text};
pub use service::ShipService;
pub use store::{InMemoryShipStore, ShipStore};
pub use update::apply_update;
pub use validation::{is_valid, is_valid_id};
