use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc::UnboundedSender, watch};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::models::{
    Reading, SessionSnapshot, StartSummary, StopSummary, WorkerInfo, WorkerPhase,
};
use crate::settings::{CollectorSettings, MAX_DELAY, MAX_WORKER_COUNT, MIN_WORKER_COUNT};

use super::worker::{collection_loop, WorkerTiming};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

pub const NO_CITIES_MESSAGE: &str = "Please select at least one city!";

struct WorkerHandle {
    city: String,
    stagger: Duration,
    phase: watch::Receiver<WorkerPhase>,
    handle: JoinHandle<()>,
}

/// One start..stop cycle. Dropped as a whole on stop.
struct CollectionSession {
    id: String,
    started_at: DateTime<Utc>,
    worker_count: usize,
    join_timeout: Duration,
    cancel_token: CancellationToken,
    workers: Vec<WorkerHandle>,
}

/// Owns the collection session and the producer side of the reading queue.
pub struct CollectionController {
    settings: CollectorSettings,
    tx: UnboundedSender<Reading>,
    session: Option<CollectionSession>,
}

/// Initial delay for the worker at `index`: `(index mod worker_count) * step`.
pub fn stagger_delay(index: usize, worker_count: usize, step: Duration) -> Duration {
    let slot = index % worker_count.max(1);
    step.checked_mul(slot as u32).unwrap_or(MAX_DELAY).min(MAX_DELAY)
}

/// Wait up to `timeout` for `handle`. On timeout the task is aborted and
/// `false` is returned; the caller does not wait for the abort to land.
pub async fn join_or_abandon(handle: &mut JoinHandle<()>, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, &mut *handle).await {
        Ok(_) => true,
        Err(_) => {
            handle.abort();
            false
        }
    }
}

impl CollectionController {
    pub fn new(settings: CollectorSettings, tx: UnboundedSender<Reading>) -> Self {
        Self {
            settings,
            tx,
            session: None,
        }
    }

    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.session
            .as_ref()
            .map(|session| !session.cancel_token.is_cancelled())
            .unwrap_or(false)
    }

    pub fn active_workers(&self) -> usize {
        self.session
            .as_ref()
            .map(|session| session.workers.len())
            .unwrap_or(0)
    }

    /// Spawn one worker per city. Must be called from within a tokio runtime.
    pub fn start(&mut self, cities: &[String], worker_count: usize) -> Result<StartSummary> {
        if cities.is_empty() {
            bail!(NO_CITIES_MESSAGE);
        }
        if !(MIN_WORKER_COUNT..=MAX_WORKER_COUNT).contains(&worker_count) {
            bail!(
                "Thread count must be between {} and {}",
                MIN_WORKER_COUNT,
                MAX_WORKER_COUNT
            );
        }
        if self.session.is_some() {
            bail!("Collection already running");
        }

        let timing = WorkerTiming::from_settings(&self.settings)?;
        let step = self.settings.units(self.settings.stagger_step_units)?;
        let join_timeout = self.settings.join_timeout()?;

        let session_id = Uuid::new_v4().to_string();
        let cancel_token = CancellationToken::new();

        let workers = cities
            .iter()
            .enumerate()
            .map(|(index, city)| {
                let stagger = stagger_delay(index, worker_count, step);
                let (phase_tx, phase_rx) = watch::channel(WorkerPhase::Waiting);
                let handle = tokio::spawn(collection_loop(
                    city.clone(),
                    stagger,
                    timing,
                    self.tx.clone(),
                    phase_tx,
                    cancel_token.clone(),
                ));
                WorkerHandle {
                    city: city.clone(),
                    stagger,
                    phase: phase_rx,
                    handle,
                }
            })
            .collect::<Vec<_>>();

        log_info!(
            "session {}: started {} workers across {} thread slots",
            session_id,
            workers.len(),
            worker_count
        );

        self.session = Some(CollectionSession {
            id: session_id.clone(),
            started_at: Utc::now(),
            worker_count,
            join_timeout,
            cancel_token,
            workers,
        });

        Ok(StartSummary {
            session_id,
            city_count: cities.len(),
            worker_count,
        })
    }

    /// Cancel every worker and wait up to the join timeout for each one.
    /// Workers that miss the deadline are aborted and left behind.
    pub async fn stop(&mut self) -> StopSummary {
        let Some(session) = self.session.take() else {
            return StopSummary::default();
        };

        session.cancel_token.cancel();

        let timeout = session.join_timeout;
        let mut summary = StopSummary::default();

        for mut worker in session.workers {
            if join_or_abandon(&mut worker.handle, timeout).await {
                summary.joined += 1;
            } else {
                log_warn!(
                    "session {}: worker {} did not stop within {}ms, abandoning",
                    session.id,
                    worker.city,
                    timeout.as_millis()
                );
                summary.abandoned += 1;
            }
        }

        log_info!(
            "session {}: stopped ({} joined, {} abandoned)",
            session.id,
            summary.joined,
            summary.abandoned
        );

        summary
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let Some(session) = &self.session else {
            return SessionSnapshot::idle();
        };

        SessionSnapshot {
            session_id: Some(session.id.clone()),
            running: !session.cancel_token.is_cancelled(),
            started_at: Some(session.started_at),
            worker_count: session.worker_count,
            workers: session
                .workers
                .iter()
                .map(|worker| WorkerInfo {
                    city: worker.city.clone(),
                    stagger_ms: worker.stagger.as_millis() as u64,
                    phase: *worker.phase.borrow(),
                })
                .collect(),
        }
    }
}

impl Drop for CollectionController {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel_token.cancel();
        }
    }
}
