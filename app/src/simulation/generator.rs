use chrono::{DateTime, Utc};
use rand::Rng;

use fleet_core::SensorReadingMessage;

/// Synthesizes one plausible reading for a rented machine.
///
/// Bounds mirror the physical envelope of the fleet: a short productive
/// burst per interval, fuel rates of 18-23 l/h and rare fault events.
pub fn generate_reading<R: Rng>(rng: &mut R, timestamp: DateTime<Utc>) -> SensorReadingMessage {
    SensorReadingMessage {
        timestamp,
        avg_fuel_consumption_rate: Some(round2(rng.gen_range(18.0..23.0))),
        idle_fuel_consumption_pct: Some(round2(rng.gen_range(20.0..30.0))),
        rpm_variance: Some(round2(rng.gen_range(150.0..250.0))),
        coolant_temp_anomalies: Some(occurrence(rng, 0.05)),
        productive_time_mins: Some(rng.gen_range(1..=8)),
        idle_time_mins: Some(rng.gen_range(0..=1)),
        vibration_anomalies: Some(occurrence(rng, 0.10)),
        overload_cycles: Some(if rng.gen_bool(0.20) {
            rng.gen_range(0..=2)
        } else {
            0
        }),
        over_speed_events: Some(occurrence(rng, 0.02)),
        tire_pressure_deviations: Some(0), // reserved signal
        error_code_frequency: Some(occurrence(rng, 0.03)),
        battery_low_voltage_events: Some(occurrence(rng, 0.04)),
    }
}

fn occurrence<R: Rng>(rng: &mut R, probability: f64) -> i32 {
    if rng.gen_bool(probability) {
        1
    } else {
        0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
