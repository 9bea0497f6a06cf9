use std::sync::Arc;

use utoipa::OpenApi;
use warp::Filter;

use self::dto::MachineDto;
use super::dto::ErrorResponseDto;
use super::query::DateQuery;
use super::{build_response, SwaggerHostDefinition};
use crate::error::ApiError;
use crate::observer::ConcurrentObserver;
use fleet_core::{HealthAnalyticsMessage, SensorReadingMessage};

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    machines(observer.clone())
        .or(machine_data(observer.clone()))
        .or(machine_analytics(observer.clone()))
        .or(machine_analytics_latest(observer.clone()))
}

pub fn doc() -> SwaggerHostDefinition {
    #[derive(OpenApi)]
    #[openapi(
        paths(machines, machine_data, machine_analytics, machine_analytics_latest),
        components(schemas(
            MachineDto,
            SensorReadingMessage,
            HealthAnalyticsMessage,
            ErrorResponseDto
        ))
    )]
    struct ApiDoc;

    SwaggerHostDefinition {
        url: "/api/doc/machine-api.json".to_owned(),
        openApi: ApiDoc::openapi(),
    }
}

/// GET api/machine
///
/// Fetch all machines of the fleet
#[utoipa::path(
    get,
    path = "/api/machine",
    responses((status = 200, description = "All machines", body = [MachineDto]))
)]
fn machines(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "machine"))
        .and_then(|observer: Arc<ConcurrentObserver>| async move {
            let resp = observer
                .machines()
                .await
                .map(|mut daos| daos.drain(..).map(MachineDto::from).collect::<Vec<_>>());
            build_response(resp)
        })
        .boxed()
}

/// GET api/machine/:id/data?from=..&until=..
///
/// Fetch a time-ordered reading window of one machine
///
/// The window must be well ordered and at most 7 days wide
#[utoipa::path(
    get,
    path = "/api/machine/{id}/data",
    params(
        ("id" = i32, Path, description = "Machine id"),
        ("from" = String, Query, description = "Window start, RFC 3339"),
        ("until" = String, Query, description = "Window end, RFC 3339")
    ),
    responses(
        (status = 200, description = "Readings in the window", body = [SensorReadingMessage]),
        (status = 400, description = "Invalid window or unknown machine", body = ErrorResponseDto)
    )
)]
fn machine_data(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "machine" / i32 / "data"))
        .and(warp::query::<DateQuery>())
        .and_then(
            |observer: Arc<ConcurrentObserver>, machine_id: i32, query: DateQuery| async move {
                if !query.is_valid() || query.is_larger_than(chrono::Duration::days(7)) {
                    return build_response::<()>(Err(ApiError::ArgumentError().into()));
                }
                let resp = observer
                    .machine_data(machine_id, query.from(), query.until())
                    .await;
                build_response(resp)
            },
        )
        .boxed()
}

/// GET api/machine/:id/analytics?from=..&until=..
///
/// Fetch a time-ordered health-analytics window of one machine
///
/// The window must be well ordered and at most 7 days wide
#[utoipa::path(
    get,
    path = "/api/machine/{id}/analytics",
    params(
        ("id" = i32, Path, description = "Machine id"),
        ("from" = String, Query, description = "Window start, RFC 3339"),
        ("until" = String, Query, description = "Window end, RFC 3339")
    ),
    responses(
        (status = 200, description = "Analytics in the window", body = [HealthAnalyticsMessage]),
        (status = 400, description = "Invalid window or unknown machine", body = ErrorResponseDto)
    )
)]
fn machine_analytics(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "machine" / i32 / "analytics"))
        .and(warp::query::<DateQuery>())
        .and_then(
            |observer: Arc<ConcurrentObserver>, machine_id: i32, query: DateQuery| async move {
                if !query.is_valid() || query.is_larger_than(chrono::Duration::days(7)) {
                    return build_response::<()>(Err(ApiError::ArgumentError().into()));
                }
                let resp = observer
                    .machine_analytics(machine_id, query.from(), query.until())
                    .await;
                build_response(resp)
            },
        )
        .boxed()
}

/// GET api/machine/:id/analytics/latest
///
/// Fetch the latest derived health scores of one machine
///
/// Returns null while no simulation cycle has scored the machine yet
#[utoipa::path(
    get,
    path = "/api/machine/{id}/analytics/latest",
    params(("id" = i32, Path, description = "Machine id")),
    responses(
        (status = 200, description = "Latest health scores", body = HealthAnalyticsMessage),
        (status = 400, description = "Unknown machine", body = ErrorResponseDto)
    )
)]
fn machine_analytics_latest(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "machine" / i32 / "analytics" / "latest"))
        .and_then(|observer: Arc<ConcurrentObserver>, machine_id: i32| async move {
            let resp = observer.machine_analytics_latest(machine_id).await;
            build_response(resp)
        })
        .boxed()
}

///
/// DTO
///
pub mod dto {
    use crate::models::machine::MachineDao;
    use serde::Serialize;
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, ToSchema)]
    pub struct MachineDto {
        pub machine_id: i32,
        pub name: String,
        pub asset_type: String,
        pub manufacturer: Option<String>,
        pub year: Option<i32>,
        pub location_lat: Option<f64>,
        pub location_lon: Option<f64>,
        pub status: String,
    }

    impl From<MachineDao> for MachineDto {
        fn from(dao: MachineDao) -> Self {
            MachineDto {
                machine_id: dao.machine_id(),
                name: dao.name(),
                asset_type: dao.asset_type,
                manufacturer: dao.manufacturer,
                year: dao.year,
                location_lat: dao.current_location_lat,
                location_lon: dao.current_location_lon,
                status: dao.status,
            }
        }
    }
}
