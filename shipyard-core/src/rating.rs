//! Ship rating calculation.

use chrono::{DateTime, Datelike, Utc};

use crate::domain::Ship;
use crate::validation::CURRENT_YEAR;

const RATING_SCALE: f64 = 80.0;
const NEW_EFFICIENCY: f64 = 1.0;
const USED_EFFICIENCY: f64 = 0.5;

/// Compute the rating for a ship's speed, ownership history and production date.
///
/// `round(80 * v * k / (3019 - year + 1) * 100) / 100`, where `k` is 0.5 for
/// used ships and 1.0 otherwise.
pub fn compute_rating(speed: f64, is_used: bool, prod_date: &DateTime<Utc>) -> f64 {
    let efficiency = if is_used {
        USED_EFFICIENCY
    } else {
        NEW_EFFICIENCY
    };
    let age = f64::from(CURRENT_YEAR - prod_date.year() + 1);
    round_to_hundredths(RATING_SCALE * speed * efficiency / age)
}

/// Rating derived from the ship's current fields.
pub fn rating(ship: &Ship) -> f64 {
    compute_rating(ship.speed, ship.is_used, &ship.prod_date)
}

/// Overwrite the stored rating with one derived from the ship's current fields.
pub fn refresh_rating(ship: &mut Ship) {
    ship.rating = rating(ship);
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
