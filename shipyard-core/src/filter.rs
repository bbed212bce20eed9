//! Optional, conjunctive ship predicates.

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::{Ship, ShipType};

/// Optional constraints on a ship listing.
///
/// Every present field must hold for a ship to match; absent fields are
/// ignored. Range bounds are inclusive, `after`/`before` are epoch
/// milliseconds and the text fields match case-sensitive substrings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct ShipFilter {
    /// Substring of the ship name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Substring of the planet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Exact ship type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    /// Earliest production instant, epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<i64>,
    /// Latest production instant, epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<i64>,
    /// Exact used flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_used: Option<bool>,
    /// Lowest speed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_speed: Option<f64>,
    /// Highest speed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
    /// Smallest crew.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_crew_size: Option<i32>,
    /// Largest crew.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_crew_size: Option<i32>,
    /// Lowest rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    /// Highest rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<f64>,
}

impl ShipFilter {
    /// Whether `ship` satisfies every present constraint.
    pub fn matches(&self, ship: &Ship) -> bool {
        let prod_millis = ship.prod_date.timestamp_millis();
        contains(self.name.as_deref(), &ship.name)
            && contains(self.planet.as_deref(), &ship.planet)
            && equals(self.ship_type, ship.ship_type)
            && at_least(self.after, prod_millis)
            && at_most(self.before, prod_millis)
            && equals(self.is_used, ship.is_used)
            && at_least(self.min_speed, ship.speed)
            && at_most(self.max_speed, ship.speed)
            && at_least(self.min_crew_size, ship.crew_size)
            && at_most(self.max_crew_size, ship.crew_size)
            && at_least(self.min_rating, ship.rating)
            && at_most(self.max_rating, ship.rating)
    }

    /// Keep the ships that match, preserving their order.
    pub fn apply(&self, ships: Vec<Ship>) -> Vec<Ship> {
        ships.into_iter().filter(|ship| self.matches(ship)).collect()
    }

    /// Number of matching ships.
    pub fn count(&self, ships: &[Ship]) -> usize {
        ships.iter().filter(|ship| self.matches(ship)).count()
    }
}

fn contains(needle: Option<&str>, haystack: &str) -> bool {
    needle.is_none_or(|needle| haystack.contains(needle))
}

fn equals<T: PartialEq>(expected: Option<T>, actual: T) -> bool {
    expected.is_none_or(|expected| expected == actual)
}

fn at_least<T: PartialOrd>(bound: Option<T>, value: T) -> bool {
    bound.is_none_or(|bound| value >= bound)
}

fn at_most<T: PartialOrd>(bound: Option<T>, value: T) -> bool {
    bound.is_none_or(|bound| value <= bound)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::rating::rating;
    use crate::validation::tests::year_start;

    pub(crate) fn fleet() -> Vec<Ship> {
        let rows = [
            (1, "Orion", "Mars", ShipType::Military, 3010, false, 0.82, 200),
            (2, "Daedalus", "Earth", ShipType::Transport, 2900, true, 0.25, 15),
            (3, "Nostromo", "Earth", ShipType::Merchant, 3019, false, 0.55, 7),
            (4, "Orion II", "Jupiter", ShipType::Military, 2850, true, 0.61, 350),
            (5, "Serenity", "Mars Colony", ShipType::Transport, 3015, false, 0.5, 9),
            (6, "Rocinante", "Ceres", ShipType::Military, 3018, true, 0.95, 4),
            (7, "Bebop", "Mars", ShipType::Merchant, 2999, false, 0.33, 4),
        ];
        rows.into_iter()
            .map(
                |(id, name, planet, ship_type, year, is_used, speed, crew_size)| {
                    let mut ship = Ship {
                        id,
                        name: name.to_string(),
                        planet: planet.to_string(),
                        ship_type,
                        prod_date: year_start(year),
                        is_used,
                        speed,
                        crew_size,
                        rating: 0.0,
                    };
                    ship.rating = rating(&ship);
                    ship
                },
            )
            .collect()
    }

    fn ids(ships: &[Ship]) -> Vec<i64> {
        ships.iter().map(|ship| ship.id).collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let ships = fleet();
        assert_eq!(ShipFilter::default().apply(ships.clone()), ships);
    }

    #[test]
    fn name_and_planet_match_case_sensitive_substrings() {
        let filter = ShipFilter {
            name: Some("Orion".to_string()),
            ..ShipFilter::default()
        };
        assert_eq!(ids(&filter.apply(fleet())), vec![1, 4]);

        let filter = ShipFilter {
            planet: Some("Mars".to_string()),
            ..ShipFilter::default()
        };
        assert_eq!(ids(&filter.apply(fleet())), vec![1, 5, 7]);

        let filter = ShipFilter {
            planet: Some("mars".to_string()),
            ..ShipFilter::default()
        };
        assert!(filter.apply(fleet()).is_empty());
    }

    #[test]
    fn ship_type_and_used_match_exactly() {
        let filter = ShipFilter {
            ship_type: Some(ShipType::Military),
            is_used: Some(true),
            ..ShipFilter::default()
        };
        assert_eq!(ids(&filter.apply(fleet())), vec![4, 6]);
    }

    #[test]
    fn date_bounds_are_inclusive_millis() {
        let filter = ShipFilter {
            after: Some(year_start(2999).timestamp_millis()),
            before: Some(year_start(3015).timestamp_millis()),
            ..ShipFilter::default()
        };
        assert_eq!(ids(&filter.apply(fleet())), vec![1, 5, 7]);
    }

    #[test]
    fn speed_range_is_conjunctive_and_order_invariant() {
        let filter = ShipFilter {
            min_speed: Some(0.5),
            max_speed: Some(0.8),
            ..ShipFilter::default()
        };
        let matched = filter.apply(fleet());
        assert_eq!(ids(&matched), vec![3, 4, 5]);
        assert!(
            matched
                .iter()
                .all(|ship| ship.speed >= 0.5 && ship.speed <= 0.8)
        );

        let min_first = ShipFilter {
            min_speed: Some(0.5),
            ..ShipFilter::default()
        }
        .apply(fleet());
        let then_max = ShipFilter {
            max_speed: Some(0.8),
            ..ShipFilter::default()
        }
        .apply(min_first);
        let max_first = ShipFilter {
            max_speed: Some(0.8),
            ..ShipFilter::default()
        }
        .apply(fleet());
        let then_min = ShipFilter {
            min_speed: Some(0.5),
            ..ShipFilter::default()
        }
        .apply(max_first);
        assert_eq!(then_max, matched);
        assert_eq!(then_min, matched);
    }

    #[test]
    fn crew_and_rating_bounds_are_inclusive() {
        let filter = ShipFilter {
            min_crew_size: Some(4),
            max_crew_size: Some(9),
            ..ShipFilter::default()
        };
        assert_eq!(ids(&filter.apply(fleet())), vec![3, 5, 6, 7]);

        let nostromo_rating = fleet()[2].rating;
        let filter = ShipFilter {
            min_rating: Some(nostromo_rating),
            max_rating: Some(nostromo_rating),
            ..ShipFilter::default()
        };
        assert_eq!(ids(&filter.apply(fleet())), vec![3]);
    }

    #[test]
    fn count_matches_apply_length() {
        let filter = ShipFilter {
            ship_type: Some(ShipType::Merchant),
            ..ShipFilter::default()
        };
        let ships = fleet();
        assert_eq!(filter.count(&ships), filter.apply(ships.clone()).len());
        assert_eq!(filter.count(&ships), 2);
    }

    #[test]
    fn deserializes_camel_case_query_fields() {
        let filter: ShipFilter = serde_json::from_str(
            r#"{"shipType":"TRANSPORT","minCrewSize":3,"isUsed":false,"after":0}"#,
        )
        .expect("parse");
        assert_eq!(filter.ship_type, Some(ShipType::Transport));
        assert_eq!(filter.min_crew_size, Some(3));
        assert_eq!(filter.is_used, Some(false));
        assert_eq!(filter.after, Some(0));
    }
}
