use std::sync::Arc;

use utoipa::OpenApi;
use warp::Filter;

use super::dto::ErrorResponseDto;
use super::query::LearnQuery;
use super::{build_response, SwaggerHostDefinition};
use crate::anomaly::cache::AnomalyState;
use crate::observer::ConcurrentObserver;

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    check_anomaly(observer.clone()).or(anomaly_state(observer.clone()))
}

pub fn doc() -> SwaggerHostDefinition {
    #[derive(OpenApi)]
    #[openapi(
        paths(check_anomaly, anomaly_state),
        components(schemas(AnomalyState, ErrorResponseDto))
    )]
    struct ApiDoc;

    SwaggerHostDefinition {
        url: "/api/doc/anomaly-api.json".to_owned(),
        openApi: ApiDoc::openapi(),
    }
}

/// POST api/anomaly/check/:id?learn=false
///
/// Check a machine against the remote scorer, if unchecked
///
/// Scores the machine's latest reading. A machine that is loading,
/// classified or errored keeps its cached state; there is no automatic
/// re-check
#[utoipa::path(
    post,
    path = "/api/anomaly/check/{id}",
    params(
        ("id" = i32, Path, description = "Machine id"),
        ("learn" = bool, Query, description = "Let the remote model learn from this sample")
    ),
    responses(
        (status = 200, description = "Verdict state after the check", body = AnomalyState),
        (status = 400, description = "Unknown machine", body = ErrorResponseDto)
    )
)]
fn check_anomaly(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::post())
        .and(warp::path!("api" / "anomaly" / "check" / i32))
        .and(warp::query::<LearnQuery>())
        .and_then(
            |observer: Arc<ConcurrentObserver>, machine_id: i32, query: LearnQuery| async move {
                let resp = observer.check_anomaly(machine_id, query.learn()).await;
                build_response(resp)
            },
        )
        .boxed()
}

/// GET api/anomaly/:id
///
/// Fetch the cached verdict state of a machine without triggering a check
#[utoipa::path(
    get,
    path = "/api/anomaly/{id}",
    params(("id" = i32, Path, description = "Machine id")),
    responses((status = 200, description = "Cached verdict state", body = AnomalyState))
)]
fn anomaly_state(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "anomaly" / i32))
        .and_then(|observer: Arc<ConcurrentObserver>, machine_id: i32| async move {
            let state = observer.anomaly_state(machine_id).await;
            build_response(Ok(state))
        })
        .boxed()
}
