//! Ship operations exposed to request handlers.

use crate::domain::{Ship, ShipDraft};
use crate::error::{Result, ShipyardError};
use crate::filter::ShipFilter;
use crate::listing::{ListingDefaults, PageRequest, count_ships, list_ships};
use crate::rating::refresh_rating;
use crate::store::ShipStore;
use crate::update::apply_update;
use crate::validation::{ensure_valid_id, validate_draft};

/// Validates, rates and lists ships on top of a [`ShipStore`].
#[derive(Debug, Clone)]
pub struct ShipService<S: ShipStore> {
    store: S,
    defaults: ListingDefaults,
}

impl<S: ShipStore> ShipService<S> {
    /// Create a service with the standard listing defaults.
    pub fn new(store: S) -> Self {
        Self::with_defaults(store, ListingDefaults::STANDARD)
    }

    /// Create a service with custom listing defaults.
    pub fn with_defaults(store: S, defaults: ListingDefaults) -> Self {
        Self { store, defaults }
    }

    /// Listing defaults in effect.
    pub fn defaults(&self) -> &ListingDefaults {
        &self.defaults
    }

    /// One page of ships matching `filter`.
    pub fn get_all_ships(&self, filter: &ShipFilter, page: &PageRequest) -> Result<Vec<Ship>> {
        list_ships(self.store.find_all()?, filter, page, &self.defaults)
    }

    /// Number of ships matching `filter`.
    pub fn ships_count(&self, filter: &ShipFilter) -> Result<usize> {
        Ok(count_ships(&self.store.find_all()?, filter))
    }

    /// Validate, rate and store a new ship.
    pub fn create(&self, draft: &ShipDraft) -> Result<Ship> {
        let ship = validate_draft(draft)?;
        self.store.create(ship)
    }

    /// Fetch one ship.
    pub fn get_ship(&self, id: i64) -> Result<Ship> {
        ensure_valid_id(id)?;
        self.store
            .find_by_id(id)?
            .ok_or(ShipyardError::NotFound(id))
    }

    /// Apply a partial update and store the re-rated ship.
    ///
    /// Nothing is written when any present field is invalid.
    pub fn update(&self, id: i64, patch: &ShipDraft) -> Result<Ship> {
        let mut ship = self.get_ship(id)?;
        apply_update(&mut ship, patch)?;
        refresh_rating(&mut ship);
        self.store.save(ship)
    }

    /// Remove one ship.
    pub fn delete(&self, id: i64) -> Result<()> {
        let ship = self.get_ship(id)?;
        self.store.delete_by_id(ship.id)
    }
}
