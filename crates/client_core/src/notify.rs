//! Fire-and-forget delivery of swipe decisions to the job board.

use std::sync::{Arc, Mutex};

use futures::future::join_all;
use shared::domain::{JobId, SwipeAction};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, warn};

use crate::board::JobBoard;

/// Receives every resolved decision. Implementations must return
/// immediately; delivery happens out of band and failures stay inside.
pub trait DecisionNotifier: Send + Sync {
    fn notify_decision(&self, job_id: JobId, action: SwipeAction);
}

/// Drops every decision. Used when no backend is reachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl DecisionNotifier for SilentNotifier {
    fn notify_decision(&self, job_id: JobId, action: SwipeAction) {
        debug!(%job_id, %action, "decision not delivered: no job board");
    }
}

/// Spawns one `record_swipe` call per decision on a tokio runtime.
///
/// Failures are logged at `warn` and discarded. Nothing is retried.
pub struct SpawnedDecisionNotifier {
    board: Arc<dyn JobBoard>,
    runtime: Handle,
    inflight: Mutex<Vec<JoinHandle<()>>>,
}

impl SpawnedDecisionNotifier {
    pub fn new(board: Arc<dyn JobBoard>, runtime: Handle) -> Self {
        Self {
            board,
            runtime,
            inflight: Mutex::new(Vec::new()),
        }
    }

    pub fn pending(&self) -> usize {
        match self.inflight.lock() {
            Ok(mut inflight) => {
                inflight.retain(|task| !task.is_finished());
                inflight.len()
            }
            Err(_) => 0,
        }
    }

    /// Waits for every notification spawned so far. Used by short-lived
    /// front-ends before they exit.
    pub async fn flush(&self) {
        let tasks = match self.inflight.lock() {
            Ok(mut inflight) => std::mem::take(&mut *inflight),
            Err(_) => return,
        };
        if tasks.is_empty() {
            return;
        }
        debug!(count = tasks.len(), "flushing decision notifications");
        for result in join_all(tasks).await {
            if let Err(err) = result {
                warn!("decision notification task failed: {err}");
            }
        }
    }
}

impl DecisionNotifier for SpawnedDecisionNotifier {
    fn notify_decision(&self, job_id: JobId, action: SwipeAction) {
        let board = Arc::clone(&self.board);
        let task = self.runtime.spawn(async move {
            match board.record_swipe(job_id, action).await {
                Ok(()) => debug!(%job_id, %action, "decision recorded"),
                Err(err) => warn!(%job_id, %action, "failed to record decision: {err}"),
            }
        });
        if let Ok(mut inflight) = self.inflight.lock() {
            inflight.retain(|task| !task.is_finished());
            inflight.push(task);
        }
    }
}

#[cfg(test)]
#[path = "tests/notify_tests.rs"]
mod tests;
