use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::reading::SensorReadingMessage;

/// Utilization label of a machine's latest reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UtilizationStatus {
    Normal,
    Underutilized,
    Overutilized,
}

impl std::fmt::Display for UtilizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UtilizationStatus::Normal => write!(f, "Normal"),
            UtilizationStatus::Underutilized => write!(f, "Underutilized"),
            UtilizationStatus::Overutilized => write!(f, "Overutilized"),
        }
    }
}

/// Labels a reading's utilization state.
///
/// Rules are evaluated in order and the later rule wins: an idle ratio
/// above 0.4 marks "Underutilized", more than 500 productive minutes marks
/// "Overutilized" even if the idle rule also triggered. A reading without
/// any minutes stays "Normal".
pub fn classify_utilization(reading: &SensorReadingMessage) -> UtilizationStatus {
    let productive_mins = reading.productive_time_mins.unwrap_or(0) as f64;
    let idle_mins = reading.idle_time_mins.unwrap_or(0) as f64;
    let total_mins = productive_mins + idle_mins;

    let mut status = UtilizationStatus::Normal;
    if total_mins > 0.0 {
        if idle_mins / total_mins > 0.4 {
            status = UtilizationStatus::Underutilized;
        }
        if productive_mins > 500.0 {
            status = UtilizationStatus::Overutilized;
        }
    }
    status
}

#[cfg(test)]
mod test {
    use super::*;

    fn reading(productive_mins: i32, idle_mins: i32) -> SensorReadingMessage {
        SensorReadingMessage {
            productive_time_mins: Some(productive_mins),
            idle_time_mins: Some(idle_mins),
            ..Default::default()
        }
    }

    #[test]
    fn test_normal_usage() {
        assert_eq!(
            UtilizationStatus::Normal,
            classify_utilization(&reading(50, 10))
        );
    }

    #[test]
    fn test_underutilized() {
        assert_eq!(
            UtilizationStatus::Underutilized,
            classify_utilization(&reading(10, 20))
        );
    }

    #[test]
    fn test_overutilized() {
        assert_eq!(
            UtilizationStatus::Overutilized,
            classify_utilization(&reading(600, 0))
        );
    }

    #[test]
    fn test_overutilized_wins_over_underutilized() {
        // 501 productive with 400 idle triggers both rules
        assert_eq!(
            UtilizationStatus::Overutilized,
            classify_utilization(&reading(501, 400))
        );
    }

    #[test]
    fn test_no_minutes_is_normal() {
        assert_eq!(
            UtilizationStatus::Normal,
            classify_utilization(&reading(0, 0))
        );
        assert_eq!(
            UtilizationStatus::Normal,
            classify_utilization(&SensorReadingMessage::default())
        );
    }
}
