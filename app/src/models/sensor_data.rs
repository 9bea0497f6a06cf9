use chrono::{DateTime, NaiveDateTime, Utc};
use fleet_core::SensorReadingMessage;

use crate::error::DBError;

#[derive(sqlx::FromRow)]
pub struct SensorReadingDao {
    // pub(crate) reading_id: i32,
    pub(crate) machine_id: i32,
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) avg_fuel_consumption_rate: Option<f64>,
    pub(crate) idle_fuel_consumption_pct: Option<f64>,
    pub(crate) rpm_variance: Option<f64>,
    pub(crate) coolant_temp_anomalies: Option<i32>,
    pub(crate) productive_time_mins: Option<i32>,
    pub(crate) idle_time_mins: Option<i32>,
    pub(crate) vibration_anomalies: Option<i32>,
    pub(crate) overload_cycles: Option<i32>,
    pub(crate) over_speed_events: Option<i32>,
    pub(crate) tire_pressure_deviations: Option<i32>,
    pub(crate) error_code_frequency: Option<i32>,
    pub(crate) battery_low_voltage_events: Option<i32>,
}

impl SensorReadingDao {
    pub fn machine_id(&self) -> i32 {
        self.machine_id
    }
}

impl From<SensorReadingDao> for SensorReadingMessage {
    fn from(val: SensorReadingDao) -> Self {
        SensorReadingMessage {
            timestamp: DateTime::<Utc>::from_naive_utc_and_offset(val.timestamp, Utc),
            avg_fuel_consumption_rate: val.avg_fuel_consumption_rate,
            idle_fuel_consumption_pct: val.idle_fuel_consumption_pct,
            rpm_variance: val.rpm_variance,
            coolant_temp_anomalies: val.coolant_temp_anomalies,
            productive_time_mins: val.productive_time_mins,
            idle_time_mins: val.idle_time_mins,
            vibration_anomalies: val.vibration_anomalies,
            overload_cycles: val.overload_cycles,
            over_speed_events: val.over_speed_events,
            tire_pressure_deviations: val.tire_pressure_deviations,
            error_code_frequency: val.error_code_frequency,
            battery_low_voltage_events: val.battery_low_voltage_events,
        }
    }
}

const SELECT_COLUMNS: &str = r#"machine_id, timestamp, avg_fuel_consumption_rate,
    idle_fuel_consumption_pct, rpm_variance, coolant_temp_anomalies, productive_time_mins,
    idle_time_mins, vibration_anomalies, overload_cycles, over_speed_events,
    tire_pressure_deviations, error_code_frequency, battery_low_voltage_events"#;

/// Appends one reading. Runs on a connection so a simulation cycle can
/// stage all of its inserts inside one transaction.
pub async fn insert(
    conn: &mut sqlx::PgConnection,
    machine_id: i32,
    dto: &SensorReadingMessage,
) -> Result<(), DBError> {
    sqlx::query(
        r#"INSERT INTO machine_sensor_data
            (machine_id, timestamp, avg_fuel_consumption_rate, idle_fuel_consumption_pct,
             rpm_variance, coolant_temp_anomalies, productive_time_mins, idle_time_mins,
             vibration_anomalies, overload_cycles, over_speed_events, tire_pressure_deviations,
             error_code_frequency, battery_low_voltage_events)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"#,
    )
    .bind(machine_id)
    .bind(dto.timestamp.naive_utc())
    .bind(dto.avg_fuel_consumption_rate)
    .bind(dto.idle_fuel_consumption_pct)
    .bind(dto.rpm_variance)
    .bind(dto.coolant_temp_anomalies)
    .bind(dto.productive_time_mins)
    .bind(dto.idle_time_mins)
    .bind(dto.vibration_anomalies)
    .bind(dto.overload_cycles)
    .bind(dto.over_speed_events)
    .bind(dto.tire_pressure_deviations)
    .bind(dto.error_code_frequency)
    .bind(dto.battery_low_voltage_events)
    .execute(conn)
    .await?;
    Ok(())
}

/// READ the latest reading of one machine
pub async fn get_latest(
    conn: &sqlx::PgPool,
    machine_id: i32,
) -> Result<Option<SensorReadingDao>, DBError> {
    Ok(sqlx::query_as::<_, SensorReadingDao>(&format!(
        r#"SELECT {} FROM machine_sensor_data
            WHERE machine_id = $1
            ORDER BY timestamp DESC LIMIT 1"#,
        SELECT_COLUMNS
    ))
    .bind(machine_id)
    .fetch_optional(conn)
    .await?)
}

/// READ the latest reading of every machine that has one
pub async fn get_latest_per_machine(conn: &sqlx::PgPool) -> Result<Vec<SensorReadingDao>, DBError> {
    Ok(sqlx::query_as::<_, SensorReadingDao>(&format!(
        r#"SELECT DISTINCT ON (machine_id) {} FROM machine_sensor_data
            ORDER BY machine_id, timestamp DESC"#,
        SELECT_COLUMNS
    ))
    .fetch_all(conn)
    .await?)
}

/// READ a time-ordered reading window of one machine
pub async fn get(
    conn: &sqlx::PgPool,
    machine_id: i32,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<SensorReadingDao>, DBError> {
    Ok(sqlx::query_as::<_, SensorReadingDao>(&format!(
        r#"SELECT {} FROM machine_sensor_data
            WHERE machine_id = $1
            AND timestamp >= $2 AND timestamp < $3
            ORDER BY timestamp ASC"#,
        SELECT_COLUMNS
    ))
    .bind(machine_id)
    .bind(from.naive_utc())
    .bind(until.naive_utc())
    .fetch_all(conn)
    .await?)
}
