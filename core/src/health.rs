use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::reading::SensorReadingMessage;

/// Derived health scores for one sensor reading.
///
/// Always recomputed fresh from a single reading, never updated
/// incrementally. `timestamp` is the timestamp of the reading the scores
/// were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthAnalyticsMessage {
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub fuel_efficiency_score: f64,
    pub engine_stability_score: f64,
    pub utilization_ratio: f64,
    pub wear_and_tear_index: f64,
    pub safety_score: f64,
    pub downtime_risk_pct: f64,
}

/// Derives health analytics from a reading.
///
/// Pure function: missing signals count as 0, every score is clamped into
/// its documented interval and rounded to two decimals.
pub fn derive_analytics(reading: &SensorReadingMessage) -> HealthAnalyticsMessage {
    let idle_fuel_pct = reading.idle_fuel_consumption_pct.unwrap_or(0.0);
    let rpm_variance = reading.rpm_variance.unwrap_or(0.0);
    let productive_mins = reading.productive_time_mins.unwrap_or(0) as f64;
    let idle_mins = reading.idle_time_mins.unwrap_or(0) as f64;
    let vibration_anomalies = reading.vibration_anomalies.unwrap_or(0) as f64;
    let overload_cycles = reading.overload_cycles.unwrap_or(0) as f64;
    let over_speed_events = reading.over_speed_events.unwrap_or(0) as f64;
    let coolant_anomalies = reading.coolant_temp_anomalies.unwrap_or(0);
    let error_codes = reading.error_code_frequency.unwrap_or(0);
    let battery_events = reading.battery_low_voltage_events.unwrap_or(0);

    let risk_factor = if coolant_anomalies + error_codes > 0 {
        1.5
    } else {
        1.0
    };
    let total_mins = productive_mins + idle_mins;
    let utilization_ratio = if total_mins > 0.0 {
        productive_mins / total_mins
    } else {
        0.0
    };

    HealthAnalyticsMessage {
        timestamp: reading.timestamp,
        fuel_efficiency_score: round2((95.0 - (idle_fuel_pct - 20.0)).clamp(50.0, 95.0)),
        engine_stability_score: round2((98.0 - rpm_variance / 50.0).clamp(50.0, 98.0)),
        utilization_ratio: round2(utilization_ratio),
        wear_and_tear_index: round2(
            (15.0 + vibration_anomalies * 5.0 + overload_cycles * 2.0).clamp(15.0, 100.0),
        ),
        safety_score: round2((99.0 - over_speed_events * 10.0).clamp(0.0, 99.0)),
        downtime_risk_pct: round2(
            (5.0 + (error_codes + battery_events) as f64 * 10.0 * risk_factor).clamp(5.0, 100.0),
        ),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
