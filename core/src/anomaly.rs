use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::reading::SensorReadingMessage;

/// Named anomaly category detected in a machine's latest reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AnomalyChip {
    #[serde(rename = "Idle spike")]
    IdleSpike,
    #[serde(rename = "Engine instability")]
    EngineInstability,
    #[serde(rename = "Wear burst")]
    WearBurst,
    #[serde(rename = "Misuse")]
    Misuse,
    #[serde(rename = "Electrical")]
    Electrical,
}

impl std::fmt::Display for AnomalyChip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnomalyChip::IdleSpike => write!(f, "Idle spike"),
            AnomalyChip::EngineInstability => write!(f, "Engine instability"),
            AnomalyChip::WearBurst => write!(f, "Wear burst"),
            AnomalyChip::Misuse => write!(f, "Misuse"),
            AnomalyChip::Electrical => write!(f, "Electrical"),
        }
    }
}

/// Tags the latest reading of a time-ordered series with anomaly chips.
///
/// Rules are independent of each other and only look at the last element;
/// the returned order is the rule order, not the trigger order. An empty
/// series yields no chips.
pub fn compute_anomalies(readings: &[SensorReadingMessage]) -> Vec<AnomalyChip> {
    let latest = match readings.last() {
        Some(reading) => reading,
        None => return Vec::new(),
    };

    let idle_spike = latest.idle_time_mins.unwrap_or(0) == 15
        || latest.idle_fuel_consumption_pct.unwrap_or(0.0) >= 60.0;
    let engine_instability = latest.rpm_variance.unwrap_or(0.0) >= 220.0
        || latest.coolant_temp_anomalies.unwrap_or(0) >= 4;
    let wear_burst = latest.vibration_anomalies.unwrap_or(0) >= 8
        || latest.overload_cycles.unwrap_or(0) >= 6;
    let misuse = latest.over_speed_events.unwrap_or(0) >= 8
        || latest.tire_pressure_deviations.unwrap_or(0) >= 6;
    let electrical = latest.error_code_frequency.unwrap_or(0) >= 8
        || latest.battery_low_voltage_events.unwrap_or(0) >= 5;

    let mut chips = Vec::new();
    if idle_spike {
        chips.push(AnomalyChip::IdleSpike);
    }
    if engine_instability {
        chips.push(AnomalyChip::EngineInstability);
    }
    if wear_burst {
        chips.push(AnomalyChip::WearBurst);
    }
    if misuse {
        chips.push(AnomalyChip::Misuse);
    }
    if electrical {
        chips.push(AnomalyChip::Electrical);
    }
    chips
}

#[cfg(test)]
mod test {
    use super::*;

    fn zeroed_reading() -> SensorReadingMessage {
        SensorReadingMessage {
            avg_fuel_consumption_rate: Some(0.0),
            idle_fuel_consumption_pct: Some(0.0),
            rpm_variance: Some(0.0),
            coolant_temp_anomalies: Some(0),
            productive_time_mins: Some(0),
            idle_time_mins: Some(0),
            vibration_anomalies: Some(0),
            overload_cycles: Some(0),
            over_speed_events: Some(0),
            tire_pressure_deviations: Some(0),
            error_code_frequency: Some(0),
            battery_low_voltage_events: Some(0),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_series() {
        assert!(compute_anomalies(&[]).is_empty());
    }

    #[test]
    fn test_zeroed_reading_has_no_chips() {
        assert!(compute_anomalies(&[zeroed_reading()]).is_empty());
    }

    #[test]
    fn test_idle_spike() {
        // prepare
        let mut reading = zeroed_reading();
        reading.idle_time_mins = Some(15);

        // execute
        let chips = compute_anomalies(&[reading]);

        // validate
        assert!(chips.contains(&AnomalyChip::IdleSpike));
    }

    #[test]
    fn test_engine_instability() {
        // prepare
        let mut reading = zeroed_reading();
        reading.rpm_variance = Some(225.0);

        // execute
        let chips = compute_anomalies(&[reading]);

        // validate
        assert_eq!(vec![AnomalyChip::EngineInstability], chips);
    }

    #[test]
    fn test_only_latest_reading_counts() {
        // prepare - the spiked reading is not the latest one
        let mut spiked = zeroed_reading();
        spiked.idle_time_mins = Some(15);

        // execute
        let chips = compute_anomalies(&[spiked, zeroed_reading()]);

        // validate
        assert!(chips.is_empty());
    }

    #[test]
    fn test_chip_order_is_rule_order() {
        // prepare - trigger electrical and idle spike in reverse rule order
        let mut reading = zeroed_reading();
        reading.battery_low_voltage_events = Some(5);
        reading.idle_fuel_consumption_pct = Some(60.0);

        // execute
        let chips = compute_anomalies(&[reading]);

        // validate
        assert_eq!(
            vec![AnomalyChip::IdleSpike, AnomalyChip::Electrical],
            chips
        );
    }

    #[test]
    fn test_chip_wire_names() {
        let serialized = serde_json::to_string(&AnomalyChip::IdleSpike).unwrap();
        assert_eq!("\"Idle spike\"", serialized);
    }
}
