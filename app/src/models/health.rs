use chrono::{DateTime, NaiveDateTime, Utc};
use fleet_core::HealthAnalyticsMessage;

use crate::error::DBError;

#[derive(sqlx::FromRow)]
pub struct HealthAnalyticsDao {
    // pub(crate) analytics_id: i32,
    // pub(crate) machine_id: i32,
    pub(crate) log_timestamp: NaiveDateTime,
    pub(crate) fuel_efficiency_score: f64,
    pub(crate) engine_stability_score: f64,
    pub(crate) utilization_ratio: f64,
    pub(crate) wear_and_tear_index: f64,
    pub(crate) safety_score: f64,
    pub(crate) downtime_risk_pct: f64,
}

impl From<HealthAnalyticsDao> for HealthAnalyticsMessage {
    fn from(val: HealthAnalyticsDao) -> Self {
        HealthAnalyticsMessage {
            timestamp: DateTime::<Utc>::from_naive_utc_and_offset(val.log_timestamp, Utc),
            fuel_efficiency_score: val.fuel_efficiency_score,
            engine_stability_score: val.engine_stability_score,
            utilization_ratio: val.utilization_ratio,
            wear_and_tear_index: val.wear_and_tear_index,
            safety_score: val.safety_score,
            downtime_risk_pct: val.downtime_risk_pct,
        }
    }
}

const SELECT_COLUMNS: &str = r#"log_timestamp, fuel_efficiency_score, engine_stability_score,
    utilization_ratio, wear_and_tear_index, safety_score, downtime_risk_pct"#;

/// Appends one derived analytics row. Runs on a connection so a simulation
/// cycle can stage it in the same transaction as its reading.
pub async fn insert(
    conn: &mut sqlx::PgConnection,
    machine_id: i32,
    dto: &HealthAnalyticsMessage,
) -> Result<(), DBError> {
    sqlx::query(
        r#"INSERT INTO machine_health_analytics
            (machine_id, log_timestamp, fuel_efficiency_score, engine_stability_score,
             utilization_ratio, wear_and_tear_index, safety_score, downtime_risk_pct)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
    )
    .bind(machine_id)
    .bind(dto.timestamp.naive_utc())
    .bind(dto.fuel_efficiency_score)
    .bind(dto.engine_stability_score)
    .bind(dto.utilization_ratio)
    .bind(dto.wear_and_tear_index)
    .bind(dto.safety_score)
    .bind(dto.downtime_risk_pct)
    .execute(conn)
    .await?;
    Ok(())
}

/// READ the latest analytics row of one machine
pub async fn get_latest(
    conn: &sqlx::PgPool,
    machine_id: i32,
) -> Result<Option<HealthAnalyticsDao>, DBError> {
    Ok(sqlx::query_as::<_, HealthAnalyticsDao>(&format!(
        r#"SELECT {} FROM machine_health_analytics
            WHERE machine_id = $1
            ORDER BY log_timestamp DESC LIMIT 1"#,
        SELECT_COLUMNS
    ))
    .bind(machine_id)
    .fetch_optional(conn)
    .await?)
}

/// READ a time-ordered analytics window of one machine
pub async fn get(
    conn: &sqlx::PgPool,
    machine_id: i32,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<HealthAnalyticsDao>, DBError> {
    Ok(sqlx::query_as::<_, HealthAnalyticsDao>(&format!(
        r#"SELECT {} FROM machine_health_analytics
            WHERE machine_id = $1
            AND log_timestamp >= $2 AND log_timestamp < $3
            ORDER BY log_timestamp ASC"#,
        SELECT_COLUMNS
    ))
    .bind(machine_id)
    .bind(from.naive_utc())
    .bind(until.naive_utc())
    .fetch_all(conn)
    .await?)
}
