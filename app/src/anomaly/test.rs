use warp::Filter;

use super::cache::{AnomalyCache, AnomalyState};
use super::*;
use fleet_core::SensorReadingMessage;

#[tokio::test]
async fn test_cache_checks_only_unchecked() {
    // prepare
    let cache = AnomalyCache::new();
    assert_eq!(AnomalyState::Unchecked, cache.state(1).await);

    // execute
    let first = cache.begin_check(1).await;
    let second = cache.begin_check(1).await;

    // validate - a loading machine is not checked again
    assert!(first);
    assert!(!second);
    assert_eq!(AnomalyState::Loading, cache.state(1).await);

    // a settled machine is not checked again either
    cache
        .settle(
            1,
            AnomalyState::Classified {
                is_anomaly: false,
                score: Some(0.1),
            },
        )
        .await;
    assert!(!cache.begin_check(1).await);
}

#[tokio::test]
async fn test_cache_does_not_retry_errors() {
    // prepare
    let cache = AnomalyCache::new();
    assert!(cache.begin_check(7).await);
    cache
        .settle(
            7,
            AnomalyState::Errored {
                message: "boom".to_owned(),
            },
        )
        .await;

    // execute
    let rechecked = cache.begin_check(7).await;

    // validate - an error keeps the machine settled
    assert!(!rechecked);
    assert_eq!(
        AnomalyState::Errored {
            message: "boom".to_owned()
        },
        cache.state(7).await
    );
}

#[test]
fn test_features_coerce_missing_signals() {
    // prepare
    let reading = SensorReadingMessage {
        rpm_variance: Some(180.0),
        ..Default::default()
    };

    // execute
    let features = AnomalyFeatures::from(&reading);

    // validate
    assert_eq!(180.0, features.rpm_variance);
    assert_eq!(0.0, features.idle_fuel_consumption_pct);
    assert_eq!(0.0, features.battery_low_voltage_events);
}

#[tokio::test]
async fn test_scorer_client_verdict() {
    // prepare - a stub scorer replying with a fixed verdict
    let route = warp::post().and(warp::path!("predict")).map(|| {
        warp::reply::json(&serde_json::json!({ "is_anomaly": true, "score": 0.93 }))
    });
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    let client = ScorerClient::with_base_url(format!("http://{}/predict", addr));

    // execute
    let verdict = client
        .score(&AnomalyFeatures::default(), false)
        .await
        .unwrap();

    // validate
    assert!(verdict.is_anomaly);
    assert_eq!(Some(0.93), verdict.score);
}

#[tokio::test]
async fn test_scorer_client_http_error() {
    // prepare - a stub scorer that always fails
    let route = warp::post().and(warp::path!("predict")).map(|| {
        warp::reply::with_status("boom", warp::http::StatusCode::INTERNAL_SERVER_ERROR)
    });
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    let client = ScorerClient::with_base_url(format!("http://{}/predict", addr));

    // execute
    let result = client.score(&AnomalyFeatures::default(), true).await;

    // validate - a non-2xx reply is an error, never a verdict
    match result {
        Err(crate::error::ScorerError::Status(status)) => assert_eq!(500, status.as_u16()),
        other => panic!("Expected status error, got {:?}", other.map(|v| v.is_anomaly)),
    }
}
