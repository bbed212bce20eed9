//! Field and record validation rules for ship records.

use chrono::{DateTime, Datelike, Utc};

use crate::domain::{NewShip, ShipDraft, ShipType};
use crate::error::{Result, ShipyardError};
use crate::rating::compute_rating;

/// Lowest accepted speed.
pub const MIN_SPEED: f64 = 0.01;
/// Highest accepted speed.
pub const MAX_SPEED: f64 = 0.99;
/// Smallest accepted crew.
pub const MIN_CREW_SIZE: i32 = 1;
/// Largest accepted crew.
pub const MAX_CREW_SIZE: i32 = 9999;
/// Earliest accepted production year.
pub const MIN_PROD_YEAR: i32 = 2800;
/// The in-universe current year; latest accepted production year.
pub const CURRENT_YEAR: i32 = 3019;
/// Maximum length of names and planets, in characters.
pub const MAX_TEXT_LENGTH: usize = 50;

/// Whether a name or planet is non-empty and at most 50 characters.
pub fn is_valid_name(value: &str) -> bool {
    !value.is_empty() && value.chars().count() <= MAX_TEXT_LENGTH
}

/// Whether a speed lies in `[0.01, 0.99]`.
pub fn is_valid_speed(speed: f64) -> bool {
    (MIN_SPEED..=MAX_SPEED).contains(&speed)
}

/// Whether a crew size lies in `[1, 9999]`.
pub fn is_valid_crew_size(crew_size: i32) -> bool {
    (MIN_CREW_SIZE..=MAX_CREW_SIZE).contains(&crew_size)
}

/// Whether a production date is not before the epoch and falls in years 2800..=3019.
pub fn is_valid_prod_date(prod_date: &DateTime<Utc>) -> bool {
    if prod_date.timestamp_millis() < 0 {
        return false;
    }
    (MIN_PROD_YEAR..=CURRENT_YEAR).contains(&prod_date.year())
}

/// Whether an identifier is strictly positive.
pub fn is_valid_id(id: i64) -> bool {
    id > 0
}

struct RequiredFields<'a> {
    name: &'a str,
    planet: &'a str,
    ship_type: ShipType,
    prod_date: DateTime<Utc>,
    speed: f64,
    crew_size: i32,
}

fn required_fields(draft: &ShipDraft) -> Option<RequiredFields<'_>> {
    Some(RequiredFields {
        name: draft.name.as_deref()?,
        planet: draft.planet.as_deref()?,
        ship_type: draft.ship_type?,
        prod_date: draft.prod_date?,
        speed: draft.speed?,
        crew_size: draft.crew_size?,
    })
}

fn fields_in_range(fields: &RequiredFields<'_>) -> bool {
    is_valid_name(fields.name)
        && is_valid_name(fields.planet)
        && is_valid_speed(fields.speed)
        && is_valid_crew_size(fields.crew_size)
        && is_valid_prod_date(&fields.prod_date)
}

/// Whether a draft carries every required field and each field passes its check.
///
/// `is_used` is optional and never makes a draft invalid.
pub fn is_valid(draft: &ShipDraft) -> bool {
    required_fields(draft).is_some_and(|fields| fields_in_range(&fields))
}

/// Reject non-positive identifiers.
pub fn ensure_valid_id(id: i64) -> Result<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(ShipyardError::InvalidIdentifier(id))
    }
}

/// Turn a complete, valid draft into a ship ready for storage.
///
/// Defaults `is_used` to `false` and computes the rating.
pub fn validate_draft(draft: &ShipDraft) -> Result<NewShip> {
    let fields = required_fields(draft)
        .filter(fields_in_range)
        .ok_or_else(|| ShipyardError::invalid("ship is missing fields or out of range"))?;
    let is_used = draft.is_used.unwrap_or(false);
    Ok(NewShip {
        name: fields.name.to_string(),
        planet: fields.planet.to_string(),
        ship_type: fields.ship_type,
        prod_date: fields.prod_date,
        is_used,
        speed: fields.speed,
        crew_size: fields.crew_size,
        rating: compute_rating(fields.speed, is_used, &fields.prod_date),
    })
}
