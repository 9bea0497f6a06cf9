use std::sync::Arc;

use utoipa::OpenApi;
use warp::Filter;

use self::dto::HealthyDto;
use super::{build_response, SwaggerHostDefinition};
use crate::observer::ConcurrentObserver;

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    health(observer.clone())
}

pub fn doc() -> SwaggerHostDefinition {
    #[derive(OpenApi)]
    #[openapi(paths(health), components(schemas(HealthyDto)))]
    struct ApiDoc;

    SwaggerHostDefinition {
        url: "/api/doc/metric-api.json".to_owned(),
        openApi: ApiDoc::openapi(),
    }
}

/// GET api/health
///
/// Fetch the service health
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service health", body = HealthyDto))
)]
fn health(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "health"))
        .and_then(|observer: Arc<ConcurrentObserver>| async move {
            let ret = HealthyDto {
                healthy: true,
                database_state: observer.check_db().await,
                machine_count: observer.machine_count().await,
                rented_machine_count: observer.rented_machine_count().await,
            };
            build_response(Ok(ret))
        })
        .boxed()
}

mod dto {
    use serde::Serialize;
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, ToSchema)]
    pub struct HealthyDto {
        pub healthy: bool,
        pub database_state: String,
        pub machine_count: i64,
        pub rented_machine_count: i64,
    }
}
