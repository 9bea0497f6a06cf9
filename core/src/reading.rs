use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One timestamped telemetry snapshot of a machine.
///
/// Every signal is optional on the wire and in storage. A missing signal is
/// read as 0 by all consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SensorReadingMessage {
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub avg_fuel_consumption_rate: Option<f64>,
    pub idle_fuel_consumption_pct: Option<f64>,
    pub rpm_variance: Option<f64>,
    pub coolant_temp_anomalies: Option<i32>,
    pub productive_time_mins: Option<i32>,
    pub idle_time_mins: Option<i32>,
    pub vibration_anomalies: Option<i32>,
    pub overload_cycles: Option<i32>,
    pub over_speed_events: Option<i32>,
    pub tire_pressure_deviations: Option<i32>,
    pub error_code_frequency: Option<i32>,
    pub battery_low_voltage_events: Option<i32>,
}

impl std::default::Default for SensorReadingMessage {
    fn default() -> Self {
        SensorReadingMessage {
            timestamp: Utc::now(),
            avg_fuel_consumption_rate: None,
            idle_fuel_consumption_pct: None,
            rpm_variance: None,
            coolant_temp_anomalies: None,
            productive_time_mins: None,
            idle_time_mins: None,
            vibration_anomalies: None,
            overload_cycles: None,
            over_speed_events: None,
            tire_pressure_deviations: None,
            error_code_frequency: None,
            battery_low_voltage_events: None,
        }
    }
}
