//! Command orchestration helpers from UI actions to backend command queue.

use client_core::notify::DecisionNotifier;
use crossbeam_channel::{Sender, TrySendError};
use shared::domain::{JobId, SwipeAction};
use tracing::{debug, warn};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend command processor disconnected; restart the app".to_string();
        }
    }
}

/// Forwards deck decisions to the backend worker, which records them.
pub struct QueuedDecisionNotifier {
    cmd_tx: Sender<BackendCommand>,
}

impl QueuedDecisionNotifier {
    pub fn new(cmd_tx: Sender<BackendCommand>) -> Self {
        Self { cmd_tx }
    }
}

impl DecisionNotifier for QueuedDecisionNotifier {
    fn notify_decision(&self, job_id: JobId, action: SwipeAction) {
        if let Err(err) = self
            .cmd_tx
            .try_send(BackendCommand::RecordSwipe { job_id, action })
        {
            warn!(%job_id, %action, "decision dropped: {err}");
        }
    }
}
