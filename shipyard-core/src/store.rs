//! Record access abstraction for ship storage.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{NewShip, Ship};
use crate::error::{Result, ShipyardError};

/// Storage of ship records keyed by identifier.
///
/// Each call is expected to be atomic and immediately visible to the next.
#[cfg_attr(test, mockall::automock)]
pub trait ShipStore {
    /// Every stored ship in ascending id order.
    fn find_all(&self) -> Result<Vec<Ship>>;
    /// The ship with `id`, if any.
    fn find_by_id(&self, id: i64) -> Result<Option<Ship>>;
    /// Persist a new ship, assigning its identifier.
    fn create(&self, ship: NewShip) -> Result<Ship>;
    /// Overwrite the stored ship that has the same identifier.
    fn save(&self, ship: Ship) -> Result<Ship>;
    /// Remove the ship with `id`.
    fn delete_by_id(&self, id: i64) -> Result<()>;
}

impl<S: ShipStore + ?Sized> ShipStore for Arc<S> {
    fn find_all(&self) -> Result<Vec<Ship>> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        (**self).find_by_id(id)
    }

    fn create(&self, ship: NewShip) -> Result<Ship> {
        (**self).create(ship)
    }

    fn save(&self, ship: Ship) -> Result<Ship> {
        (**self).save(ship)
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        (**self).delete_by_id(id)
    }
}

/// Process-local store backed by an ordered map.
#[derive(Debug, Default)]
pub struct InMemoryShipStore {
    state: Mutex<InMemoryState>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    next_id: i64,
    ships: BTreeMap<i64, Ship>,
}

impl InMemoryShipStore {
    /// Create an empty store; the first ship receives id 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `ships`; new ids continue after the largest one.
    pub fn with_ships(ships: impl IntoIterator<Item = Ship>) -> Self {
        let ships: BTreeMap<i64, Ship> = ships.into_iter().map(|ship| (ship.id, ship)).collect();
        let next_id = ships.keys().next_back().copied().unwrap_or(0);
        Self {
            state: Mutex::new(InMemoryState { next_id, ships }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, InMemoryState>> {
        self.state
            .lock()
            .map_err(|_| ShipyardError::Storage("in-memory store lock poisoned".to_string()))
    }
}

impl ShipStore for InMemoryShipStore {
    fn find_all(&self) -> Result<Vec<Ship>> {
        Ok(self.lock()?.ships.values().cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        Ok(self.lock()?.ships.get(&id).cloned())
    }

    fn create(&self, ship: NewShip) -> Result<Ship> {
        let mut state = self.lock()?;
        state.next_id += 1;
        let ship = ship.with_id(state.next_id);
        state.ships.insert(ship.id, ship.clone());
        Ok(ship)
    }

    fn save(&self, ship: Ship) -> Result<Ship> {
        let mut state = self.lock()?;
        let Some(slot) = state.ships.get_mut(&ship.id) else {
            return Err(ShipyardError::NotFound(ship.id));
        };
        *slot = ship.clone();
        Ok(ship)
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        self.lock()?.ships.remove(&id);
        Ok(())
    }
}
