//! PostgreSQL-backed ship storage.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use shipyard_core::{NewShip, Result, Ship, ShipStore, ShipyardError};

use crate::db::DbPool;
use crate::models::{NewShipRow, ShipChangeset, ShipRow};
use crate::schema::ships;

/// [`ShipStore`] over a Diesel connection pool.
#[derive(Clone)]
pub struct PgShipStore {
    pool: DbPool,
}

impl PgShipStore {
    /// Wrap an initialized pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>> {
        self.pool.get().map_err(ShipyardError::storage)
    }
}

impl ShipStore for PgShipStore {
    fn find_all(&self) -> Result<Vec<Ship>> {
        let mut conn = self.conn()?;
        ships::table
            .order(ships::id.asc())
            .select(ShipRow::as_select())
            .load(&mut conn)
            .map_err(ShipyardError::storage)?
            .into_iter()
            .map(Ship::try_from)
            .collect()
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        let mut conn = self.conn()?;
        ships::table
            .find(id)
            .select(ShipRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(ShipyardError::storage)?
            .map(Ship::try_from)
            .transpose()
    }

    fn create(&self, ship: NewShip) -> Result<Ship> {
        let mut conn = self.conn()?;
        let row = diesel::insert_into(ships::table)
            .values(NewShipRow::from(ship))
            .returning(ShipRow::as_returning())
            .get_result(&mut conn)
            .map_err(ShipyardError::storage)?;
        Ship::try_from(row)
    }

    fn save(&self, ship: Ship) -> Result<Ship> {
        let mut conn = self.conn()?;
        let row = diesel::update(ships::table.find(ship.id))
            .set(ShipChangeset::from(&ship))
            .returning(ShipRow::as_returning())
            .get_result(&mut conn)
            .optional()
            .map_err(ShipyardError::storage)?
            .ok_or(ShipyardError::NotFound(ship.id))?;
        Ship::try_from(row)
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::delete(ships::table.find(id))
            .execute(&mut conn)
            .map_err(ShipyardError::storage)?;
        Ok(())
    }
}
