use std::sync::Arc;

use utoipa::OpenApi;
use warp::Filter;

use self::dto::UsageRowDto;
use super::{build_response, SwaggerHostDefinition};
use crate::observer::ConcurrentObserver;

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    usage(observer.clone())
}

pub fn doc() -> SwaggerHostDefinition {
    #[derive(OpenApi)]
    #[openapi(paths(usage), components(schemas(UsageRowDto)))]
    struct ApiDoc;

    SwaggerHostDefinition {
        url: "/api/doc/usage-api.json".to_owned(),
        openApi: ApiDoc::openapi(),
    }
}

/// GET api/usage
///
/// Fetch the fleet usage overview
///
/// Returns one row per machine with its latest reading, the utilization
/// status and the anomaly chips of that reading
#[utoipa::path(
    get,
    path = "/api/usage",
    responses((status = 200, description = "Usage overview", body = [UsageRowDto]))
)]
fn usage(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "usage"))
        .and_then(|observer: Arc<ConcurrentObserver>| async move {
            let resp = observer
                .usage_overview()
                .await
                .map(|mut rows| rows.drain(..).map(UsageRowDto::from).collect::<Vec<_>>());
            build_response(resp)
        })
        .boxed()
}

///
/// DTO
///
pub mod dto {
    use crate::observer::UsageRow;
    use fleet_core::{AnomalyChip, SensorReadingMessage, UtilizationStatus};
    use serde::Serialize;
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, ToSchema)]
    pub struct UsageRowDto {
        pub machine_id: i32,
        pub name: String,
        pub location_lat: Option<f64>,
        pub location_lon: Option<f64>,
        pub reading: Option<SensorReadingMessage>,
        pub utilization_status: UtilizationStatus,
        pub anomalies: Vec<AnomalyChip>,
    }

    impl From<UsageRow> for UsageRowDto {
        fn from(row: UsageRow) -> Self {
            UsageRowDto {
                machine_id: row.machine.machine_id(),
                name: row.machine.name(),
                location_lat: row.machine.current_location_lat,
                location_lon: row.machine.current_location_lon,
                reading: row.reading,
                utilization_status: row.utilization_status,
                anomalies: row.anomalies,
            }
        }
    }
}
