use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::Filter;

use crate::config::CONFIG;
use crate::error::ObserverError;
use crate::observer::ConcurrentObserver;

mod anomaly_routes;
mod doc_routes;
mod machine_routes;
mod metric_routes;
mod query;
mod usage_routes;


#[allow(non_snake_case)]
pub struct SwaggerHostDefinition {
    pub url: String,
    pub openApi: utoipa::openapi::OpenApi,
}

fn build_response<T: serde::Serialize>(
    resp: Result<T, ObserverError>,
) -> Result<Box<dyn warp::Reply>, warp::Rejection> {
    match resp {
        Ok(data) => Ok(Box::new(warp::reply::json(&data))),
        Err(ObserverError::User(err)) => {
            warn!("{}", err);
            let body = warp::reply::json(&dto::ErrorResponseDto {
                error: format!("{}", err),
            });
            Ok(Box::new(warp::reply::with_status(
                body,
                StatusCode::BAD_REQUEST,
            )))
        }
        Err(ObserverError::Internal(err)) => {
            error!("{}", err);
            Ok(Box::new(StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

pub(crate) mod dto {
    use serde::Serialize;
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, ToSchema)]
    pub struct ErrorResponseDto {
        pub error: String,
    }
}

fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    machine_routes::routes(observer)
        .or(usage_routes::routes(observer))
        .or(anomaly_routes::routes(observer))
        .or(metric_routes::routes(observer))
        .or(doc_routes::swagger(vec![
            machine_routes::doc(),
            usage_routes::doc(),
            anomaly_routes::doc(),
            metric_routes::doc(),
        ]))
}

/// Serves the REST API until the shutdown signal fires.
pub async fn dispatch_server(
    observer: Arc<ConcurrentObserver>,
    mut shutdown: watch::Receiver<bool>,
) {
    let bind_addr: std::net::SocketAddr =
        CONFIG.bind_addr().parse().expect("Invalid BIND_ADDR");

    info!("Starting webserver at: {}", bind_addr);
    let (_, server) =
        warp::serve(routes(&observer)).bind_with_graceful_shutdown(bind_addr, async move {
            let _ = shutdown.changed().await;
        });
    server.await;
    info!("Stopped webserver");
}
