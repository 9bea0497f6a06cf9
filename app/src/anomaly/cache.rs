use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use super::AnomalyVerdict;

/// Classification state of one machine against the remote scorer.
///
/// `Errored` is distinct from a non-anomalous verdict and from `Loading`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnomalyState {
    Unchecked,
    Loading,
    Classified { is_anomaly: bool, score: Option<f64> },
    Errored { message: String },
}

impl From<AnomalyVerdict> for AnomalyState {
    fn from(verdict: AnomalyVerdict) -> Self {
        AnomalyState::Classified {
            is_anomaly: verdict.is_anomaly,
            score: verdict.score,
        }
    }
}

/// Per-machine scorer verdicts.
///
/// The only externally triggered mutation is `begin_check`: a machine that
/// is loading or already carries a verdict or error is never re-checked.
/// Every begun check settles exactly once.
pub struct AnomalyCache {
    inner: RwLock<HashMap<i32, AnomalyState>>,
}

impl AnomalyCache {
    pub fn new() -> Self {
        AnomalyCache {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub async fn state(&self, machine_id: i32) -> AnomalyState {
        self.inner
            .read()
            .await
            .get(&machine_id)
            .cloned()
            .unwrap_or(AnomalyState::Unchecked)
    }

    /// Transitions unchecked → loading. Returns false if the machine is
    /// already loading, classified or errored.
    pub async fn begin_check(&self, machine_id: i32) -> bool {
        let mut inner = self.inner.write().await;
        match inner.get(&machine_id) {
            None | Some(AnomalyState::Unchecked) => {
                inner.insert(machine_id, AnomalyState::Loading);
                true
            }
            _ => false,
        }
    }

    /// Settles a begun check with its verdict or error.
    pub async fn settle(&self, machine_id: i32, state: AnomalyState) {
        self.inner.write().await.insert(machine_id, state);
    }
}
