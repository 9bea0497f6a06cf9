use chrono::Utc;
use fleet_core::{derive_analytics, SensorReadingMessage};

use super::health;
use super::machine;
use super::sensor_data;
use super::*;

async fn connect() -> sqlx::PgPool {
    establish_db_connection().await.unwrap()
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_db_connection() {
    let conn = connect().await;
    migrate(&conn).await.unwrap();
    check_schema(&conn).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_sync_sequences() {
    let conn = connect().await;
    migrate(&conn).await.unwrap();

    sync_sequences(&conn).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn crud_machines() {
    let conn = connect().await;
    migrate(&conn).await.unwrap();

    // create
    let dao = machine::insert(&conn, "Excavator", machine::STATUS_RENTED)
        .await
        .unwrap();
    assert_eq!(format!("Excavator #{}", dao.machine_id()), dao.name());

    // read
    assert_ne!(machine::read(&conn).await.unwrap().is_empty(), true);
    assert!(machine::exists(&conn, dao.machine_id()).await);
    assert!(machine::read_rented_ids(&conn)
        .await
        .unwrap()
        .contains(&dao.machine_id()));
    assert!(machine::count_rented(&conn).await.unwrap() >= 1);

    // delete
    machine::delete(&conn, dao.machine_id()).await.unwrap();
    assert!(!machine::exists(&conn, dao.machine_id()).await);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn crud_sensor_data() {
    let conn = connect().await;
    migrate(&conn).await.unwrap();
    let machine = machine::insert(&conn, "Crane", machine::STATUS_RENTED)
        .await
        .unwrap();

    // create
    let dto = SensorReadingMessage {
        timestamp: Utc::now() - chrono::Duration::minutes(5),
        productive_time_mins: Some(6),
        idle_time_mins: Some(1),
        rpm_variance: Some(180.5),
        ..Default::default()
    };
    {
        let mut tx = conn.begin().await.unwrap();
        sensor_data::insert(&mut tx, machine.machine_id(), &dto)
            .await
            .unwrap();
        tx.commit().await.unwrap();
    }

    // read
    let latest = sensor_data::get_latest(&conn, machine.machine_id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(machine.machine_id(), latest.machine_id());
    let restored: SensorReadingMessage = latest.into();
    assert_eq!(dto.productive_time_mins, restored.productive_time_mins);
    assert_eq!(dto.rpm_variance, restored.rpm_variance);

    let window = sensor_data::get(
        &conn,
        machine.machine_id(),
        Utc::now() - chrono::Duration::hours(1),
        Utc::now(),
    )
    .await
    .unwrap();
    assert_eq!(1, window.len());

    let latest_all = sensor_data::get_latest_per_machine(&conn).await.unwrap();
    assert!(latest_all
        .iter()
        .any(|dao| dao.machine_id() == machine.machine_id()));

    // delete
    machine::delete(&conn, machine.machine_id()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn crud_health_analytics() {
    let conn = connect().await;
    migrate(&conn).await.unwrap();
    let machine = machine::insert(&conn, "Loader", machine::STATUS_RENTED)
        .await
        .unwrap();

    // create - derived from a reading like a simulation cycle does
    let reading = SensorReadingMessage {
        timestamp: Utc::now() - chrono::Duration::minutes(5),
        idle_fuel_consumption_pct: Some(25.0),
        productive_time_mins: Some(6),
        idle_time_mins: Some(2),
        ..Default::default()
    };
    let dto = derive_analytics(&reading);
    {
        let mut tx = conn.begin().await.unwrap();
        health::insert(&mut tx, machine.machine_id(), &dto)
            .await
            .unwrap();
        tx.commit().await.unwrap();
    }

    // read
    let latest = health::get_latest(&conn, machine.machine_id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dto.utilization_ratio, latest.utilization_ratio);

    let window = health::get(
        &conn,
        machine.machine_id(),
        Utc::now() - chrono::Duration::hours(1),
        Utc::now(),
    )
    .await
    .unwrap();
    assert_eq!(1, window.len());

    // delete
    machine::delete(&conn, machine.machine_id()).await.unwrap();
}
