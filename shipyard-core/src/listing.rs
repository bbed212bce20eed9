//! Sorting and pagination of filtered ship listings.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::{Ship, ShipOrder};
use crate::error::{Result, ShipyardError};
use crate::filter::ShipFilter;

/// Values used when a listing request leaves order or paging unspecified.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ListingDefaults {
    /// Zero-based page index.
    pub page_number: i32,
    /// Ships per page.
    pub page_size: i32,
    /// Sort key.
    pub order: ShipOrder,
}

impl ListingDefaults {
    /// Page 0, three ships per page, ordered by id.
    pub const STANDARD: ListingDefaults = ListingDefaults {
        page_number: 0,
        page_size: 3,
        order: ShipOrder::Id,
    };
}

impl Default for ListingDefaults {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Requested order and page of a listing; absent values fall back to [`ListingDefaults`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Sort key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<ShipOrder>,
    /// Zero-based page index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i32>,
    /// Ships per page; must be positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i32>,
}

/// A page request with defaults applied and bounds checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPage {
    /// Sort key.
    pub order: ShipOrder,
    /// Zero-based page index.
    pub page_number: usize,
    /// Ships per page.
    pub page_size: usize,
}

impl ResolvedPage {
    /// Number of sorted ships before this page.
    pub fn offset(&self) -> usize {
        self.page_number.saturating_mul(self.page_size)
    }
}

impl PageRequest {
    /// Fill absent values from `defaults`.
    ///
    /// A negative page number or a page size below one is rejected.
    pub fn resolve(&self, defaults: &ListingDefaults) -> Result<ResolvedPage> {
        let page_number = self.page_number.unwrap_or(defaults.page_number);
        let page_size = self.page_size.unwrap_or(defaults.page_size);
        let page_number = usize::try_from(page_number).map_err(|_| {
            ShipyardError::invalid(format!("pageNumber must not be negative: {page_number}"))
        })?;
        let page_size = usize::try_from(page_size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| {
                ShipyardError::invalid(format!("pageSize must be positive: {page_size}"))
            })?;
        Ok(ResolvedPage {
            order: self.order.unwrap_or(defaults.order),
            page_number,
            page_size,
        })
    }
}

/// Ascending comparison of two ships by `order`.
pub fn compare_by(order: ShipOrder, left: &Ship, right: &Ship) -> Ordering {
    match order {
        ShipOrder::Id => left.id.cmp(&right.id),
        ShipOrder::Speed => left.speed.total_cmp(&right.speed),
        ShipOrder::Date => left.prod_date.cmp(&right.prod_date),
        ShipOrder::Rating => left.rating.total_cmp(&right.rating),
    }
}

/// Stable ascending sort; ties keep their incoming order.
pub fn sort_ships(ships: &mut [Ship], order: ShipOrder) {
    ships.sort_by(|left, right| compare_by(order, left, right));
}

/// Filter, sort and slice one page out of `ships`.
///
/// Pages past the end are empty rather than an error.
pub fn list_ships(
    ships: Vec<Ship>,
    filter: &ShipFilter,
    page: &PageRequest,
    defaults: &ListingDefaults,
) -> Result<Vec<Ship>> {
    let page = page.resolve(defaults)?;
    let mut matched = filter.apply(ships);
    sort_ships(&mut matched, page.order);
    Ok(matched
        .into_iter()
        .skip(page.offset())
        .take(page.page_size)
        .collect())
}

/// Number of ships matching `filter`, before sorting and paging.
pub fn count_ships(ships: &[Ship], filter: &ShipFilter) -> usize {
    filter.count(ships)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShipType;
    use crate::filter::tests::fleet;

    fn ids(ships: &[Ship]) -> Vec<i64> {
        ships.iter().map(|ship| ship.id).collect()
    }

    fn page(order: Option<ShipOrder>, page_number: Option<i32>, page_size: Option<i32>) -> PageRequest {
        PageRequest {
            order,
            page_number,
            page_size,
        }
    }

    fn list(filter: &ShipFilter, request: PageRequest) -> Vec<Ship> {
        list_ships(fleet(), filter, &request, &ListingDefaults::STANDARD).expect("list")
    }

    #[test]
    fn defaults_return_first_three_by_id() {
        let ships = list(&ShipFilter::default(), PageRequest::default());
        assert_eq!(ids(&ships), vec![1, 2, 3]);
    }

    #[test]
    fn second_page_holds_positions_three_to_five() {
        let ships = list(&ShipFilter::default(), page(Some(ShipOrder::Id), Some(1), Some(3)));
        assert_eq!(ids(&ships), vec![4, 5, 6]);
    }

    #[test]
    fn last_page_may_be_short() {
        let ships = list(&ShipFilter::default(), page(None, Some(2), Some(3)));
        assert_eq!(ids(&ships), vec![7]);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let ships = list(&ShipFilter::default(), page(None, Some(40), Some(3)));
        assert!(ships.is_empty());
    }

    #[test]
    fn sorts_by_speed_ascending() {
        let ships = list(&ShipFilter::default(), page(Some(ShipOrder::Speed), None, Some(10)));
        assert_eq!(ids(&ships), vec![2, 7, 5, 3, 4, 1, 6]);
    }

    #[test]
    fn sorts_by_production_date() {
        let ships = list(&ShipFilter::default(), page(Some(ShipOrder::Date), None, Some(10)));
        assert_eq!(ids(&ships), vec![4, 2, 7, 1, 5, 6, 3]);
    }

    #[test]
    fn sorts_by_rating() {
        let ships = list(&ShipFilter::default(), page(Some(ShipOrder::Rating), None, Some(10)));
        let ratings: Vec<f64> = ships.iter().map(|ship| ship.rating).collect();
        let mut sorted = ratings.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(ratings, sorted);
        assert_eq!(ships.len(), 7);
    }

    #[test]
    fn ties_keep_incoming_order() {
        let mut ships = fleet();
        for ship in &mut ships {
            ship.speed = 0.5;
        }
        ships.reverse();
        sort_ships(&mut ships, ShipOrder::Speed);
        assert_eq!(ids(&ships), vec![7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn filters_before_paging() {
        let filter = ShipFilter {
            ship_type: Some(ShipType::Military),
            ..ShipFilter::default()
        };
        let ships = list(&filter, page(Some(ShipOrder::Speed), Some(0), Some(2)));
        assert_eq!(ids(&ships), vec![4, 1]);
    }

    #[test]
    fn count_equals_unbounded_listing_length() {
        let filters = [
            ShipFilter::default(),
            ShipFilter {
                planet: Some("Earth".to_string()),
                ..ShipFilter::default()
            },
            ShipFilter {
                min_speed: Some(0.5),
                is_used: Some(false),
                ..ShipFilter::default()
            },
        ];
        for filter in filters {
            let listed = list(&filter, page(None, Some(0), Some(i32::MAX)));
            assert_eq!(count_ships(&fleet(), &filter), listed.len());
        }
    }

    #[test]
    fn rejects_non_positive_page_size() {
        for size in [0, -3] {
            let result = list_ships(
                fleet(),
                &ShipFilter::default(),
                &page(None, None, Some(size)),
                &ListingDefaults::STANDARD,
            );
            assert!(matches!(result, Err(ShipyardError::InvalidInput(_))));
        }
    }

    #[test]
    fn rejects_negative_page_number() {
        let result = page(None, Some(-1), None).resolve(&ListingDefaults::STANDARD);
        assert!(matches!(result, Err(ShipyardError::InvalidInput(_))));
    }

    #[test]
    fn custom_defaults_are_used_when_absent() {
        let defaults = ListingDefaults {
            page_number: 1,
            page_size: 2,
            order: ShipOrder::Speed,
        };
        let resolved = PageRequest::default().resolve(&defaults).expect("resolve");
        assert_eq!(resolved.order, ShipOrder::Speed);
        assert_eq!(resolved.offset(), 2);
        let ships = list_ships(fleet(), &ShipFilter::default(), &PageRequest::default(), &defaults)
            .expect("list");
        assert_eq!(ids(&ships), vec![5, 3]);
    }
}
