use super::CountRecord;
use crate::error::DBError;

pub const STATUS_RENTED: &str = "rented";

#[derive(sqlx::FromRow, Debug)]
pub struct MachineDao {
    pub(crate) machine_id: i32,
    pub(crate) asset_type: String,
    pub(crate) manufacturer: Option<String>,
    pub(crate) year: Option<i32>,
    pub(crate) current_location_lat: Option<f64>,
    pub(crate) current_location_lon: Option<f64>,
    pub(crate) status: String,
}

impl MachineDao {
    pub fn machine_id(&self) -> i32 {
        self.machine_id
    }

    /// Display name, e.g. "Excavator #3".
    pub fn name(&self) -> String {
        format!("{} #{}", self.asset_type, self.machine_id)
    }
}

/// READ machines
pub async fn read(conn: &sqlx::PgPool) -> Result<Vec<MachineDao>, DBError> {
    Ok(
        sqlx::query_as::<_, MachineDao>("SELECT * FROM machines ORDER BY machine_id")
            .fetch_all(conn)
            .await?,
    )
}

/// READ machines in "rented" status, the only ones the simulation feeds.
pub async fn read_rented_ids(conn: &sqlx::PgPool) -> Result<Vec<i32>, DBError> {
    Ok(sqlx::query_scalar::<_, i32>(
        "SELECT machine_id FROM machines WHERE status = $1 ORDER BY machine_id",
    )
    .bind(STATUS_RENTED)
    .fetch_all(conn)
    .await?)
}

pub async fn exists(conn: &sqlx::PgPool, machine_id: i32) -> bool {
    let count = sqlx::query_as::<_, CountRecord>(
        "SELECT count(*) as count FROM machines WHERE machine_id = $1",
    )
    .bind(machine_id)
    .fetch_one(conn)
    .await
    .unwrap_or(CountRecord { count: Some(0) });

    count.count() == 1
}

pub async fn count(conn: &sqlx::PgPool) -> Result<i64, DBError> {
    let count =
        sqlx::query_as::<_, CountRecord>("SELECT count(*) as count FROM machines")
            .fetch_one(conn)
            .await?;
    Ok(count.count())
}

pub async fn count_rented(conn: &sqlx::PgPool) -> Result<i64, DBError> {
    let count = sqlx::query_as::<_, CountRecord>(
        "SELECT count(*) as count FROM machines WHERE status = $1",
    )
    .bind(STATUS_RENTED)
    .fetch_one(conn)
    .await?;
    Ok(count.count())
}

// Fixture helpers, the rental lifecycle owns machine rows in production.
#[cfg(test)]
pub async fn insert(
    conn: &sqlx::PgPool,
    asset_type: &str,
    status: &str,
) -> Result<MachineDao, DBError> {
    Ok(sqlx::query_as::<_, MachineDao>(
        "INSERT INTO machines (asset_type, status) VALUES ($1, $2) RETURNING *",
    )
    .bind(asset_type)
    .bind(status)
    .fetch_one(conn)
    .await?)
}

#[cfg(test)]
pub async fn delete(conn: &sqlx::PgPool, machine_id: i32) -> Result<(), DBError> {
    sqlx::query("DELETE FROM machine_health_analytics WHERE machine_id = $1")
        .bind(machine_id)
        .execute(conn)
        .await?;
    sqlx::query("DELETE FROM machine_sensor_data WHERE machine_id = $1")
        .bind(machine_id)
        .execute(conn)
        .await?;
    sqlx::query("DELETE FROM machines WHERE machine_id = $1")
        .bind(machine_id)
        .execute(conn)
        .await?;
    Ok(())
}
