use chrono::Utc;

use super::generator::generate_reading;
use crate::models::{
    establish_db_connection,
    machine::{self, STATUS_RENTED},
    sensor_data,
};
use crate::observer::ConcurrentObserver;

#[test]
fn test_generated_signal_bounds() {
    let mut rng = rand::thread_rng();
    let timestamp = Utc::now();

    for _ in 0..1_000 {
        let reading = generate_reading(&mut rng, timestamp);

        assert!((1..=8).contains(&reading.productive_time_mins.unwrap()));
        assert!((0..=1).contains(&reading.idle_time_mins.unwrap()));

        let fuel_rate = reading.avg_fuel_consumption_rate.unwrap();
        assert!((18.0..=23.0).contains(&fuel_rate));
        let idle_fuel_pct = reading.idle_fuel_consumption_pct.unwrap();
        assert!((20.0..=30.0).contains(&idle_fuel_pct));
        let rpm_variance = reading.rpm_variance.unwrap();
        assert!((150.0..=250.0).contains(&rpm_variance));

        assert!((0..=1).contains(&reading.coolant_temp_anomalies.unwrap()));
        assert!((0..=1).contains(&reading.vibration_anomalies.unwrap()));
        assert!((0..=2).contains(&reading.overload_cycles.unwrap()));
        assert!((0..=1).contains(&reading.over_speed_events.unwrap()));
        assert_eq!(0, reading.tire_pressure_deviations.unwrap());
        assert!((0..=1).contains(&reading.error_code_frequency.unwrap()));
        assert!((0..=1).contains(&reading.battery_low_voltage_events.unwrap()));
    }
}

#[test]
fn test_generated_readings_are_scorable() {
    // any generated reading must keep the derived scores in bounds
    let mut rng = rand::thread_rng();
    for _ in 0..1_000 {
        let reading = generate_reading(&mut rng, Utc::now());
        let analytics = fleet_core::derive_analytics(&reading);

        assert!((50.0..=95.0).contains(&analytics.fuel_efficiency_score));
        assert!((50.0..=98.0).contains(&analytics.engine_stability_score));
        assert!((0.0..=1.0).contains(&analytics.utilization_ratio));
        assert!((15.0..=100.0).contains(&analytics.wear_and_tear_index));
        assert!((0.0..=99.0).contains(&analytics.safety_score));
        assert!((5.0..=100.0).contains(&analytics.downtime_risk_pct));
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_cycle_persists_reading_and_analytics() {
    // prepare
    let conn = establish_db_connection().await.unwrap();
    let observer = ConcurrentObserver::new(conn.clone());
    observer.init().await;
    let fixture = machine::insert(&conn, "Excavator", STATUS_RENTED)
        .await
        .unwrap();

    // execute
    let simulated = observer.run_simulation_cycle().await.unwrap();

    // validate - the fixture got one reading and one matching analytics row
    assert!(simulated >= 1);
    let reading = sensor_data::get_latest(&conn, fixture.machine_id())
        .await
        .unwrap();
    assert!(reading.is_some());
    let analytics = crate::models::health::get_latest(&conn, fixture.machine_id())
        .await
        .unwrap();
    assert!(analytics.is_some());

    machine::delete(&conn, fixture.machine_id()).await.unwrap();
}
