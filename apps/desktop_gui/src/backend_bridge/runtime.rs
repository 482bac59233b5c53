//! Backend worker: owns the tokio runtime and the job board client, and turns
//! queued UI commands into UI events.

use std::{ops::ControlFlow, sync::Arc, thread};

use client_core::{
    card::{fetch_explanation_within, EXPLANATION_WAIT},
    chat::{send_message, ChatPoller, ChatThread, ChatUpdate},
    config::ClientSettings,
    dashboard::load_dashboard,
    error::BoardError,
    feed::load_feed,
    notify::{DecisionNotifier, SpawnedDecisionNotifier},
    JobSwipeClient,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::domain::JobId;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{classify_login_failure, UiError, UiErrorContext, UiEvent},
};

pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match JobSwipeClient::from_settings(settings) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err:#}"),
                    )));
                    error!("failed to build job board client: {err:#}");
                    return;
                }
            };
            let mut worker = BackendWorker {
                notifier: client.decision_notifier(Handle::current()),
                client,
                ui_tx,
                chat_poller: None,
            };
            info!("backend worker ready");
            while let Ok(cmd) = cmd_rx.recv() {
                worker.handle(cmd).await;
            }
            worker.notifier.flush().await;
        });
    });
}

struct BackendWorker {
    client: JobSwipeClient,
    notifier: Arc<SpawnedDecisionNotifier>,
    ui_tx: Sender<UiEvent>,
    chat_poller: Option<ChatPoller>,
}

impl BackendWorker {
    fn emit(&self, event: UiEvent) {
        if self.ui_tx.try_send(event).is_err() {
            warn!("ui event queue full or closed; event dropped");
        }
    }

    /// Reports a board failure. A rejected session also signs the user out.
    async fn report(&mut self, context: UiErrorContext, err: &BoardError) {
        let ui_error = UiError::from_board(context, err);
        if ui_error.requires_reauth() {
            self.client.drop_rejected_session().await;
            self.chat_poller = None;
            self.emit(UiEvent::SignedOut);
        }
        self.emit(UiEvent::Error(ui_error));
    }

    async fn handle(&mut self, cmd: BackendCommand) {
        match cmd {
            BackendCommand::RestoreSession => {
                if self.client.is_authenticated().await {
                    let email = self
                        .client
                        .session()
                        .credential()
                        .await
                        .and_then(|credential| credential.email);
                    self.emit(UiEvent::SignedIn { email });
                } else {
                    self.emit(UiEvent::SignedOut);
                }
            }
            BackendCommand::Login { email, password } => {
                match self.client.login(&email, &password).await {
                    Ok(_) => self.emit(UiEvent::SignedIn { email: Some(email) }),
                    Err(err) => self.emit(UiEvent::Error(UiError::from_message(
                        UiErrorContext::Login,
                        classify_login_failure(&format!("{err:#}")),
                    ))),
                }
            }
            BackendCommand::Register {
                email,
                password,
                name,
            } => match self.client.register(&email, &password, name.as_deref()).await {
                Ok(_) => self.emit(UiEvent::SignedIn { email: Some(email) }),
                Err(err) => self.emit(UiEvent::Error(UiError::from_message(
                    UiErrorContext::Login,
                    classify_login_failure(&format!("{err:#}")),
                ))),
            },
            BackendCommand::Logout => {
                self.chat_poller = None;
                if let Err(err) = self.client.logout().await {
                    warn!("failed to clear session file: {err:#}");
                }
                self.emit(UiEvent::SignedOut);
            }
            BackendCommand::LoadFeed => {
                let board = self.client.board();
                match load_feed(board.as_ref()).await {
                    Ok(feed) => self.emit(UiEvent::Feed(feed)),
                    Err(err) => self.report(UiErrorContext::Feed, &err).await,
                }
            }
            BackendCommand::FetchExplanation { job_id } => {
                let board = self.client.board();
                let view =
                    fetch_explanation_within(board.as_ref(), job_id, EXPLANATION_WAIT).await;
                self.emit(UiEvent::Explanation { job_id, view });
            }
            BackendCommand::RecordSwipe { job_id, action } => {
                self.notifier.notify_decision(job_id, action);
                if let Err(err) = self.client.record_viewed(1) {
                    warn!("failed to record viewed total: {err:#}");
                }
            }
            BackendCommand::LoadApplied => {
                let board = self.client.board();
                match board.applied_jobs().await {
                    Ok(jobs) => self.emit(UiEvent::Applied(jobs)),
                    Err(err) => self.report(UiErrorContext::General, &err).await,
                }
            }
            BackendCommand::LoadDashboard => {
                let board = self.client.board();
                match load_dashboard(board.as_ref(), self.client.viewed_total()).await {
                    Ok(summary) => self.emit(UiEvent::Dashboard(summary)),
                    Err(err) => self.report(UiErrorContext::General, &err).await,
                }
            }
            BackendCommand::OpenChat { job_id } => self.open_chat(job_id).await,
            BackendCommand::SendChat { job_id, text } => {
                let board = self.client.board();
                let mut thread = ChatThread::new(job_id);
                let mut draft = text;
                match send_message(board.as_ref(), &mut thread, &mut draft).await {
                    Ok(_) => self.emit(UiEvent::ChatMessages {
                        job_id,
                        messages: thread.messages().to_vec(),
                    }),
                    Err(err) => {
                        let error = UiError::from_board(UiErrorContext::Chat, &err);
                        if error.requires_reauth() {
                            self.report(UiErrorContext::Chat, &err).await;
                        }
                        self.emit(UiEvent::ChatSendFailed {
                            job_id,
                            draft,
                            error,
                        });
                    }
                }
            }
            BackendCommand::CloseChat => {
                self.chat_poller = None;
            }
            BackendCommand::LoadProfile => {
                let board = self.client.board();
                match board.current_user().await {
                    Ok(user) => self.emit(UiEvent::Profile(user)),
                    Err(err) => self.report(UiErrorContext::Profile, &err).await,
                }
            }
            BackendCommand::SaveProfile(update) => {
                let board = self.client.board();
                match board.update_profile(&update).await {
                    Ok(()) => self.emit(UiEvent::ProfileSaved),
                    Err(err) => self.report(UiErrorContext::Profile, &err).await,
                }
            }
            BackendCommand::UploadResume { path } => {
                let board = self.client.board();
                match board.upload_resume(&path).await {
                    Ok(response) => self.emit(UiEvent::ResumeParsed(response.parsed_data)),
                    Err(err) => self.report(UiErrorContext::Profile, &err).await,
                }
            }
        }
    }

    async fn open_chat(&mut self, job_id: JobId) {
        self.chat_poller = None;
        let board = self.client.board();
        match board.chat_messages(job_id).await {
            Ok(messages) => self.emit(UiEvent::ChatMessages { job_id, messages }),
            Err(err) => {
                self.report(UiErrorContext::Chat, &err).await;
                return;
            }
        }

        let ui_tx = self.ui_tx.clone();
        self.chat_poller = Some(ChatPoller::spawn(
            &Handle::current(),
            board,
            job_id,
            self.client.settings().chat_poll_interval(),
            move |update| {
                let event = match update {
                    ChatUpdate::Messages(messages) => UiEvent::ChatMessages { job_id, messages },
                    ChatUpdate::Failed(err) => {
                        UiEvent::Error(UiError::from_board(UiErrorContext::Chat, &err))
                    }
                };
                match ui_tx.try_send(event) {
                    Err(TrySendError::Disconnected(_)) => ControlFlow::Break(()),
                    _ => ControlFlow::Continue(()),
                }
            },
        ));
    }
}
