use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::anomaly::cache::{AnomalyCache, AnomalyState};
use crate::anomaly::{AnomalyFeatures, ScorerClient};
use crate::error::{DBError, ObserverError};
use crate::models::{
    self,
    health::{self as health_model},
    machine::{self as machine_model, MachineDao},
    sensor_data::{self as sensor_data_model},
};
use fleet_core::{
    classify_utilization, compute_anomalies, AnomalyChip, HealthAnalyticsMessage,
    SensorReadingMessage, UtilizationStatus,
};

/// One row of the fleet usage overview.
pub struct UsageRow {
    pub machine: MachineDao,
    pub reading: Option<SensorReadingMessage>,
    pub utilization_status: UtilizationStatus,
    pub anomalies: Vec<AnomalyChip>,
}

/// Owns the shared state of the process: the store handle created by the
/// entry point, the remote scorer client, the verdict cache and the
/// simulation cycle guard.
pub struct ConcurrentObserver {
    pub(crate) db_conn: PgPool,
    pub(crate) scorer: ScorerClient,
    pub(crate) verdicts: AnomalyCache,
    pub(crate) cycle_guard: Mutex<()>,
}

impl Debug for ConcurrentObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentObserver").finish()
    }
}

impl ConcurrentObserver {
    pub fn new(db_conn: PgPool) -> Arc<Self> {
        Arc::new(ConcurrentObserver {
            db_conn,
            scorer: ScorerClient::new(),
            verdicts: AnomalyCache::new(),
            cycle_guard: Mutex::new(()),
        })
    }

    /// Prepares the store: applies migrations and aligns the serial
    /// sequences with the highest persisted ids.
    #[tracing::instrument]
    pub async fn init(&self) {
        if let Err(e) = models::migrate(&self.db_conn).await {
            error!("Failed applying migrations: {}", e);
            panic!();
        }
        if let Err(e) = models::sync_sequences(&self.db_conn).await {
            warn!("Failed synchronizing serial sequences: {}", e);
        } else {
            info!("Synchronized serial sequences");
        }
    }

    /// Flushes and closes the store handle.
    pub async fn close(&self) {
        self.db_conn.close().await;
    }

    pub async fn check_db(&self) -> String {
        match models::check_schema(&self.db_conn).await {
            Ok(_) => "healthy".to_owned(),
            Err(e) => format!("error: {}", e),
        }
    }

    pub async fn machine_count(&self) -> i64 {
        machine_model::count(&self.db_conn).await.unwrap_or(0)
    }

    pub async fn rented_machine_count(&self) -> i64 {
        machine_model::count_rented(&self.db_conn).await.unwrap_or(0)
    }

    pub async fn machines(&self) -> Result<Vec<MachineDao>, ObserverError> {
        Ok(machine_model::read(&self.db_conn).await?)
    }

    /// Fetches a time-ordered reading window of one machine.
    pub async fn machine_data(
        &self,
        machine_id: i32,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<SensorReadingMessage>, ObserverError> {
        if !machine_model::exists(&self.db_conn, machine_id).await {
            return Err(DBError::MachineNotFound(machine_id).into());
        }

        let mut daos = sensor_data_model::get(&self.db_conn, machine_id, from, until).await?;
        Ok(daos.drain(..).map(|dao| dao.into()).collect())
    }

    /// Fetches a time-ordered health-analytics window of one machine.
    pub async fn machine_analytics(
        &self,
        machine_id: i32,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<HealthAnalyticsMessage>, ObserverError> {
        if !machine_model::exists(&self.db_conn, machine_id).await {
            return Err(DBError::MachineNotFound(machine_id).into());
        }

        let mut daos = health_model::get(&self.db_conn, machine_id, from, until).await?;
        Ok(daos.drain(..).map(|dao| dao.into()).collect())
    }

    /// Fetches the latest derived health scores of one machine, if any
    /// cycle produced them yet.
    pub async fn machine_analytics_latest(
        &self,
        machine_id: i32,
    ) -> Result<Option<HealthAnalyticsMessage>, ObserverError> {
        if !machine_model::exists(&self.db_conn, machine_id).await {
            return Err(DBError::MachineNotFound(machine_id).into());
        }

        let dao = health_model::get_latest(&self.db_conn, machine_id).await?;
        Ok(dao.map(|dao| dao.into()))
    }

    /// Builds the usage overview: every machine joined with its latest
    /// reading, classified on the fly. Machines without readings stay
    /// "Normal" with no anomaly chips.
    pub async fn usage_overview(&self) -> Result<Vec<UsageRow>, ObserverError> {
        let machines = machine_model::read(&self.db_conn).await?;
        let mut latest = sensor_data_model::get_latest_per_machine(&self.db_conn).await?;
        let mut latest_by_id: HashMap<i32, SensorReadingMessage> = latest
            .drain(..)
            .map(|dao| (dao.machine_id(), dao.into()))
            .collect();

        let rows = machines
            .into_iter()
            .map(|machine| {
                let reading = latest_by_id.remove(&machine.machine_id());
                let (utilization_status, anomalies) = match &reading {
                    Some(reading) => (
                        classify_utilization(reading),
                        compute_anomalies(std::slice::from_ref(reading)),
                    ),
                    None => (UtilizationStatus::Normal, Vec::new()),
                };
                UsageRow {
                    machine,
                    reading,
                    utilization_status,
                    anomalies,
                }
            })
            .collect();
        Ok(rows)
    }

    /// Runs the remote scorer for a machine that was not checked yet.
    ///
    /// A machine that is loading, classified or errored keeps its cached
    /// state (no automatic retry); a fresh check settles to classified or
    /// errored exactly once. The feature vector is the machine's latest
    /// reading, missing signals coerced to 0.
    pub async fn check_anomaly(
        &self,
        machine_id: i32,
        learn: bool,
    ) -> Result<AnomalyState, ObserverError> {
        if !machine_model::exists(&self.db_conn, machine_id).await {
            return Err(DBError::MachineNotFound(machine_id).into());
        }
        if !self.verdicts.begin_check(machine_id).await {
            return Ok(self.verdicts.state(machine_id).await);
        }

        let features = match sensor_data_model::get_latest(&self.db_conn, machine_id).await {
            Ok(Some(dao)) => AnomalyFeatures::from(&SensorReadingMessage::from(dao)),
            Ok(None) => AnomalyFeatures::default(),
            Err(e) => {
                let state = AnomalyState::Errored {
                    message: e.to_string(),
                };
                self.verdicts.settle(machine_id, state.clone()).await;
                return Ok(state);
            }
        };

        let state = match self.scorer.score(&features, learn).await {
            Ok(verdict) => {
                info!(
                    machine_id = machine_id,
                    is_anomaly = verdict.is_anomaly,
                    "Scored machine"
                );
                verdict.into()
            }
            Err(e) => {
                warn!(machine_id = machine_id, "Scoring failed: {}", e);
                AnomalyState::Errored {
                    message: e.to_string(),
                }
            }
        };
        self.verdicts.settle(machine_id, state.clone()).await;
        Ok(state)
    }

    pub async fn anomaly_state(&self, machine_id: i32) -> AnomalyState {
        self.verdicts.state(machine_id).await
    }
}
