use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::error::ScorerError;
use fleet_core::SensorReadingMessage;

pub mod cache;

#[cfg(test)]
mod test;

/// Feature vector sent to the remote scorer.
///
/// Field set and naming follow the scorer's training contract; missing
/// signals are coerced to 0. `overload_cycles` is not part of the contract.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct AnomalyFeatures {
    pub avg_fuel_consumption_rate: f64,
    pub idle_fuel_consumption_pct: f64,
    pub rpm_variance: f64,
    pub coolant_temp_anomalies: f64,
    pub productive_time_mins: f64,
    pub idle_time_mins: f64,
    pub vibration_anomalies: f64,
    pub over_speed_events: f64,
    pub tire_pressure_deviations: f64,
    pub error_code_frequency: f64,
    pub battery_low_voltage_events: f64,
}

impl From<&SensorReadingMessage> for AnomalyFeatures {
    fn from(reading: &SensorReadingMessage) -> Self {
        AnomalyFeatures {
            avg_fuel_consumption_rate: reading.avg_fuel_consumption_rate.unwrap_or(0.0),
            idle_fuel_consumption_pct: reading.idle_fuel_consumption_pct.unwrap_or(0.0),
            rpm_variance: reading.rpm_variance.unwrap_or(0.0),
            coolant_temp_anomalies: reading.coolant_temp_anomalies.unwrap_or(0) as f64,
            productive_time_mins: reading.productive_time_mins.unwrap_or(0) as f64,
            idle_time_mins: reading.idle_time_mins.unwrap_or(0) as f64,
            vibration_anomalies: reading.vibration_anomalies.unwrap_or(0) as f64,
            over_speed_events: reading.over_speed_events.unwrap_or(0) as f64,
            tire_pressure_deviations: reading.tire_pressure_deviations.unwrap_or(0) as f64,
            error_code_frequency: reading.error_code_frequency.unwrap_or(0) as f64,
            battery_low_voltage_events: reading.battery_low_voltage_events.unwrap_or(0) as f64,
        }
    }
}

/// Verdict of the remote scorer for one feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AnomalyVerdict {
    pub is_anomaly: bool,
    #[serde(default)]
    pub score: Option<f64>,
}

pub struct ScorerClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScorerClient {
    pub fn new() -> Self {
        Self::with_base_url(CONFIG.anomaly_api_url())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(CONFIG.scorer_timeout_ms()))
            .build()
            .expect("Failed building scorer http client");
        ScorerClient { http, base_url }
    }

    /// Scores one feature vector.
    ///
    /// `learn` tells the remote model to fold the sample into its online
    /// state; the model internals stay opaque here. Any non-2xx reply is
    /// an error.
    pub async fn score(
        &self,
        features: &AnomalyFeatures,
        learn: bool,
    ) -> Result<AnomalyVerdict, ScorerError> {
        let response = self
            .http
            .post(&self.base_url)
            .query(&[("learn", learn)])
            .json(features)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScorerError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}
