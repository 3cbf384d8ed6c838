use serde::{Deserialize, Serialize};

use crate::metrics::{MinuteRecord, RunSummary};

/// Read-only view of the engine at one instant.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub sim_time: f64,
    pub queue_length: usize,
    pub talking: usize,
    pub in_acw: usize,
    pub done: u64,
    pub staff_active: usize,
    pub ticks: u64,
    pub running: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub log: Vec<MinuteRecord>,
    pub summary: RunSummary,
}
