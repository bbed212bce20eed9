//! Partial updates of stored ships.

use crate::domain::{Ship, ShipDraft};
use crate::error::{Result, ShipyardError};
use crate::validation::{is_valid_crew_size, is_valid_name, is_valid_prod_date, is_valid_speed};

/// Apply every present field of `patch` to `existing`.
///
/// Fields are checked and assigned one at a time in the order name, planet,
/// ship type, production date, is-used, speed, crew size. The first invalid
/// field stops the update with [`ShipyardError::InvalidInput`]; fields before
/// it have already been written to `existing` and fields after it are left
/// untouched, so callers must throw the working copy away on error.
///
/// The rating is not refreshed here.
pub fn apply_update(existing: &mut Ship, patch: &ShipDraft) -> Result<()> {
    if let Some(name) = &patch.name {
        if !is_valid_name(name) {
            return Err(ShipyardError::invalid("name must be 1-50 characters"));
        }
        existing.name = name.clone();
    }
    if let Some(planet) = &patch.planet {
        if !is_valid_name(planet) {
            return Err(ShipyardError::invalid("planet must be 1-50 characters"));
        }
        existing.planet = planet.clone();
    }
    if let Some(ship_type) = patch.ship_type {
        existing.ship_type = ship_type;
    }
    if let Some(prod_date) = patch.prod_date {
        if !is_valid_prod_date(&prod_date) {
            return Err(ShipyardError::invalid(
                "production year must be within 2800-3019",
            ));
        }
        existing.prod_date = prod_date;
    }
    if let Some(is_used) = patch.is_used {
        existing.is_used = is_used;
    }
    if let Some(speed) = patch.speed {
        if !is_valid_speed(speed) {
            return Err(ShipyardError::invalid("speed must be within 0.01-0.99"));
        }
        existing.speed = speed;
    }
    if let Some(crew_size) = patch.crew_size {
        if !is_valid_crew_size(crew_size) {
            return Err(ShipyardError::invalid("crew size must be within 1-9999"));
        }
        existing.crew_size = crew_size;
    }
    Ok(())
}
