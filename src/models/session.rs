use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WorkerPhase {
    /// Sleeping through the initial stagger delay.
    Waiting,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerInfo {
    pub city: String,
    pub stagger_ms: u64,
    pub phase: WorkerPhase,
}

/// Serializable view of the controller's current session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Option<String>,
    pub running: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub worker_count: usize,
    pub workers: Vec<WorkerInfo>,
}

impl SessionSnapshot {
    pub fn idle() -> Self {
        Self {
            session_id: None,
            running: false,
            started_at: None,
            worker_count: 0,
            workers: Vec::new(),
        }
    }
}

/// Result of a successful `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartSummary {
    pub session_id: String,
    pub city_count: usize,
    pub worker_count: usize,
}

/// Result of `stop`: how many workers finished in time and how many were
/// abandoned after the join timeout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopSummary {
    pub joined: usize,
    pub abandoned: usize,
}
