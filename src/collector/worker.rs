use anyhow::Result;
use rand::Rng;
use tokio::sync::{mpsc::UnboundedSender, watch};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::models::{Reading, WorkerPhase};
use crate::settings::CollectorSettings;

use super::generator::MockDataGenerator;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Pause bounds between two readings of the same worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkerTiming {
    pub min_interval: Duration,
    pub max_interval: Duration,
}

impl WorkerTiming {
    pub fn from_settings(settings: &CollectorSettings) -> Result<Self> {
        Ok(Self {
            min_interval: settings.units(settings.min_interval_units)?,
            max_interval: settings.units(settings.max_interval_units)?,
        })
    }

    pub fn next_interval<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_interval <= self.min_interval {
            return self.min_interval;
        }
        rng.gen_range(self.min_interval..=self.max_interval)
    }
}

/// Produces readings for `city` until `cancel_token` fires or the queue
/// consumer goes away. Both the stagger delay and the pause between
/// readings end early on cancellation.
pub async fn collection_loop(
    city: String,
    stagger: Duration,
    timing: WorkerTiming,
    tx: UnboundedSender<Reading>,
    phase: watch::Sender<WorkerPhase>,
    cancel_token: CancellationToken,
) {
    log_debug!("worker {city}: waiting {}ms before first reading", stagger.as_millis());

    tokio::select! {
        _ = tokio::time::sleep(stagger) => {}
        _ = cancel_token.cancelled() => {
            let _ = phase.send(WorkerPhase::Stopped);
            log_debug!("worker {city}: cancelled during stagger");
            return;
        }
    }

    let _ = phase.send(WorkerPhase::Running);
    let mut generator = MockDataGenerator::new();
    let mut produced: u64 = 0;

    while !cancel_token.is_cancelled() {
        let reading = generator.generate(&city);
        if tx.send(reading).is_err() {
            log_info!("worker {city}: queue closed, stopping");
            break;
        }
        produced += 1;

        // ThreadRng is not Send; keep it out of the await below.
        let pause = timing.next_interval(&mut rand::thread_rng());

        tokio::select! {
            _ = tokio::time::sleep(pause) => {}
            _ = cancel_token.cancelled() => break,
        }
    }

    let _ = phase.send(WorkerPhase::Stopped);
    log_debug!("worker {city}: stopped after {produced} readings");
}
