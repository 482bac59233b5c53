use std::{ops::ControlFlow, sync::Arc, time::Duration};

use shared::{domain::JobId, protocol::ChatMessage};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tokio_stream::{wrappers::IntervalStream, StreamExt};
use tracing::{debug, warn};

use crate::{
    board::JobBoard,
    error::{BoardError, BoardResult},
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Conversation with the employer for one applied job.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatThread {
    job_id: JobId,
    messages: Vec<ChatMessage>,
}

impl ChatThread {
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            messages: Vec::new(),
        }
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn replace(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    /// Takes a polled snapshot only when it holds more messages than shown.
    pub fn refresh(&mut self, messages: Vec<ChatMessage>) -> bool {
        if messages.len() > self.messages.len() {
            self.messages = messages;
            true
        } else {
            false
        }
    }
}

pub fn prepare_message(draft: &str) -> Option<String> {
    let text = draft.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub async fn load_thread(board: &dyn JobBoard, thread: &mut ChatThread) -> BoardResult<()> {
    let messages = board.chat_messages(thread.job_id).await?;
    thread.replace(messages);
    Ok(())
}

/// Sends the draft and reloads the thread.
///
/// Blank drafts are refused with `Ok(false)`. The draft is cleared while
/// sending and put back if the board rejects the message.
pub async fn send_message(
    board: &dyn JobBoard,
    thread: &mut ChatThread,
    draft: &mut String,
) -> BoardResult<bool> {
    let Some(text) = prepare_message(draft) else {
        return Ok(false);
    };
    let original = std::mem::take(draft);
    if let Err(err) = board.send_chat_message(thread.job_id, &text).await {
        *draft = original;
        return Err(err);
    }
    load_thread(board, thread).await?;
    Ok(true)
}

#[derive(Debug)]
pub enum ChatUpdate {
    Messages(Vec<ChatMessage>),
    Failed(BoardError),
}

/// Background refresh of one chat thread. Dropping the poller stops it.
#[derive(Debug)]
pub struct ChatPoller {
    job_id: JobId,
    task: JoinHandle<()>,
}

impl ChatPoller {
    /// Polls every `period`, starting one period from now. `on_update`
    /// returning `Break` ends the loop. Rejected sessions are skipped rather
    /// than reported: a background refresh never forces a sign-in.
    pub fn spawn<F>(
        runtime: &Handle,
        board: Arc<dyn JobBoard>,
        job_id: JobId,
        period: Duration,
        mut on_update: F,
    ) -> Self
    where
        F: FnMut(ChatUpdate) -> ControlFlow<()> + Send + 'static,
    {
        let task = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut ticks = IntervalStream::new(interval);
            while ticks.next().await.is_some() {
                let update = match board.chat_messages(job_id).await {
                    Ok(messages) => ChatUpdate::Messages(messages),
                    Err(err) if err.requires_reauth() => {
                        debug!(%job_id, "chat poll skipped: {err}");
                        continue;
                    }
                    Err(err) => {
                        warn!(%job_id, "chat poll failed: {err}");
                        ChatUpdate::Failed(err)
                    }
                };
                if on_update(update).is_break() {
                    break;
                }
            }
            debug!(%job_id, "chat poller stopped");
        });
        Self { job_id, task }
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for ChatPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "tests/chat_tests.rs"]
mod tests;
