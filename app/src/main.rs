mod anomaly;
mod config;
mod error;
mod logging;
mod models;
mod observer;
mod rest;
mod simulation;

use tracing::info;

#[tokio::main]
pub async fn main() -> std::io::Result<()> {
    logging::init();

    let db_conn = models::establish_db_connection()
        .await
        .expect("Failed connecting to the database");
    let observer = observer::ConcurrentObserver::new(db_conn);
    observer.init().await;

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(true);
    })
    .expect("Failed registering termination handler");

    let simulation_loop = observer.clone().dispatch_simulation_loop(shutdown_rx.clone());
    let server_daemon = rest::dispatch_server(observer.clone(), shutdown_rx);
    let _ = tokio::join!(simulation_loop, server_daemon);

    observer.close().await;
    info!("Shutdown complete");
    Ok(())
}
