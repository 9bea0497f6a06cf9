use crate::config::CONFIG;
use crate::error::DBError;

pub async fn establish_db_connection() -> Option<sqlx::PgPool> {
    let database_url = CONFIG.database_url();
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(8)
        .connect(&database_url)
        .await
        .ok()
}

/// Applies the embedded migrations.
pub async fn migrate(conn: &sqlx::PgPool) -> Result<(), DBError> {
    sqlx::migrate!("./migrations").run(conn).await?;
    Ok(())
}

pub async fn check_schema(conn: &sqlx::PgPool) -> Result<(), DBError> {
    sqlx::query("SELECT count(*) as count FROM machines")
        .fetch_one(conn)
        .await?;
    Ok(())
}

/// Aligns the serial sequences with the highest persisted ids, so inserts
/// keep working after an out-of-band import restored old rows.
pub async fn sync_sequences(conn: &sqlx::PgPool) -> Result<(), DBError> {
    sqlx::query(
        r#"SELECT setval(pg_get_serial_sequence('machine_sensor_data', 'reading_id'),
            COALESCE((SELECT MAX(reading_id) FROM machine_sensor_data), 0) + 1, false)"#,
    )
    .execute(conn)
    .await?;
    sqlx::query(
        r#"SELECT setval(pg_get_serial_sequence('machine_health_analytics', 'analytics_id'),
            COALESCE((SELECT MAX(analytics_id) FROM machine_health_analytics), 0) + 1, false)"#,
    )
    .execute(conn)
    .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
pub(crate) struct CountRecord {
    pub count: Option<i64>,
}

impl CountRecord {
    pub fn count(self) -> i64 {
        self.count.unwrap_or(0)
    }
}

pub mod health;
pub mod machine;
pub mod sensor_data;

#[cfg(test)]
mod test;
