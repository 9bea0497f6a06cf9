use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::CONFIG;
use crate::error::DBError;
use crate::models::{
    health::{self as health_model},
    machine::{self as machine_model},
    sensor_data::{self as sensor_data_model},
};
use crate::observer::ConcurrentObserver;
use fleet_core::derive_analytics;

pub(crate) mod generator;

#[cfg(test)]
mod test;

impl ConcurrentObserver {
    /// Runs one telemetry cycle: one generated reading and one derived
    /// analytics row per rented machine, committed as a single transaction.
    /// A cycle with no rented machines is a no-op.
    ///
    /// Returns the number of simulated machines. The cycle guard keeps an
    /// overrunning cycle from overlapping with the next tick.
    pub async fn run_simulation_cycle(&self) -> Result<usize, DBError> {
        let _guard = self.cycle_guard.lock().await;

        let machine_ids = machine_model::read_rented_ids(&self.db_conn).await?;
        if machine_ids.is_empty() {
            debug!("No rented machines to simulate");
            return Ok(0);
        }

        let cycle_id = Uuid::new_v4();
        let timestamp = Utc::now();
        let mut rows = Vec::with_capacity(machine_ids.len());
        {
            let mut rng = rand::thread_rng();
            for machine_id in &machine_ids {
                let reading = generator::generate_reading(&mut rng, timestamp);
                let analytics = derive_analytics(&reading);
                rows.push((*machine_id, reading, analytics));
            }
        }

        let mut tx = self.db_conn.begin().await?;
        for (machine_id, reading, analytics) in &rows {
            sensor_data_model::insert(&mut tx, *machine_id, reading).await?;
            health_model::insert(&mut tx, *machine_id, analytics).await?;
        }
        tx.commit().await?;

        info!(
            cycle_id = %cycle_id,
            machines = rows.len(),
            "Simulation cycle complete"
        );
        Ok(rows.len())
    }

    /// Dispatches the periodic simulation loop: an immediate first cycle,
    /// then one cycle per configured interval until the shutdown signal
    /// fires. A failed cycle is rolled back by its transaction, logged,
    /// and the loop resumes on the next tick.
    pub async fn dispatch_simulation_loop(
        self: Arc<ConcurrentObserver>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let period = Duration::from_secs(CONFIG.simulation_interval_secs());
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Start simulating telemetry every {}s", period.as_secs());
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_simulation_cycle().await {
                        error!("Simulation cycle failed: {}", e);
                    }
                }
                _ = shutdown.changed() => {
                    info!("Stopping simulation loop");
                    return;
                }
            }
        }
    }
}
