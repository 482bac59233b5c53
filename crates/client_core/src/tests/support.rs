//! In-memory job board shared by the unit tests.

use std::{
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{ChatSender, JobId, SwipeAction},
    protocol::{
        ChatMessage, JobPosting, MatchExplanation, ProfileUpdate, ResumeUploadResponse,
        SendChatMessageResponse, TokenResponse, UserProfile,
    },
};

use crate::{
    board::JobBoard,
    error::{BoardError, BoardResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Failure {
    Unauthorized,
    Unavailable,
}

impl Failure {
    fn to_error(self) -> BoardError {
        match self {
            Self::Unauthorized => BoardError::Unauthorized("token expired".to_string()),
            Self::Unavailable => BoardError::Unavailable("scripted outage".to_string()),
        }
    }
}

fn check(failure: Option<Failure>) -> BoardResult<()> {
    match failure {
        Some(failure) => Err(failure.to_error()),
        None => Ok(()),
    }
}

#[derive(Default)]
pub(crate) struct ScriptedBoard {
    pub feed: Vec<JobPosting>,
    pub feed_failure: Option<Failure>,
    pub swipe_failure: Option<Failure>,
    pub swipes: Mutex<Vec<(JobId, SwipeAction)>>,
    pub applied: Vec<JobPosting>,
    pub saved: Vec<JobPosting>,
    pub list_failure: Option<Failure>,
    pub user: UserProfile,
    pub explanation: Option<MatchExplanation>,
    pub explanation_delay: Duration,
    pub chat: Mutex<Vec<ChatMessage>>,
    pub chat_failure: Mutex<Option<Failure>>,
    pub chat_fetches: AtomicUsize,
    pub sent: Mutex<Vec<String>>,
    pub profile_updates: Mutex<Vec<ProfileUpdate>>,
}

impl ScriptedBoard {
    pub fn recorded_swipes(&self) -> Vec<(JobId, SwipeAction)> {
        self.swipes.lock().expect("swipes lock").clone()
    }

    pub fn push_chat(&self, sender: ChatSender, text: &str) {
        self.chat.lock().expect("chat lock").push(ChatMessage {
            id: None,
            sender_type: sender,
            message: text.to_string(),
            created_at: None,
        });
    }

    pub fn fail_chat(&self, failure: Option<Failure>) {
        *self.chat_failure.lock().expect("chat failure lock") = failure;
    }
}

pub(crate) fn posting(id: i64, company: &str) -> JobPosting {
    JobPosting {
        id: JobId(id),
        title: format!("Engineer {id}"),
        company: company.to_string(),
        location: None,
        seniority: None,
        skills: Vec::new(),
        description: None,
        source_url: None,
        match_score: None,
        match_explanation: None,
        logo_emoji: None,
    }
}

#[async_trait]
impl JobBoard for ScriptedBoard {
    async fn login(&self, _email: &str, _password: &str) -> BoardResult<TokenResponse> {
        Err(Failure::Unavailable.to_error())
    }

    async fn register(
        &self,
        _email: &str,
        _password: &str,
        _name: Option<&str>,
    ) -> BoardResult<TokenResponse> {
        Err(Failure::Unavailable.to_error())
    }

    async fn fetch_feed(&self) -> BoardResult<Vec<JobPosting>> {
        check(self.feed_failure)?;
        Ok(self.feed.clone())
    }

    async fn record_swipe(&self, job_id: JobId, action: SwipeAction) -> BoardResult<()> {
        self.swipes
            .lock()
            .expect("swipes lock")
            .push((job_id, action));
        check(self.swipe_failure)
    }

    async fn applied_jobs(&self) -> BoardResult<Vec<JobPosting>> {
        check(self.list_failure)?;
        Ok(self.applied.clone())
    }

    async fn saved_jobs(&self) -> BoardResult<Vec<JobPosting>> {
        check(self.list_failure)?;
        Ok(self.saved.clone())
    }

    async fn match_explanation(&self, _job_id: JobId) -> BoardResult<MatchExplanation> {
        if !self.explanation_delay.is_zero() {
            tokio::time::sleep(self.explanation_delay).await;
        }
        self.explanation
            .clone()
            .ok_or_else(|| Failure::Unavailable.to_error())
    }

    async fn current_user(&self) -> BoardResult<UserProfile> {
        check(self.list_failure)?;
        Ok(self.user.clone())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> BoardResult<()> {
        self.profile_updates
            .lock()
            .expect("profile lock")
            .push(update.clone());
        Ok(())
    }

    async fn upload_resume(&self, _path: &Path) -> BoardResult<ResumeUploadResponse> {
        Err(Failure::Unavailable.to_error())
    }

    async fn chat_messages(&self, _job_id: JobId) -> BoardResult<Vec<ChatMessage>> {
        self.chat_fetches.fetch_add(1, Ordering::SeqCst);
        check(*self.chat_failure.lock().expect("chat failure lock"))?;
        Ok(self.chat.lock().expect("chat lock").clone())
    }

    async fn send_chat_message(
        &self,
        _job_id: JobId,
        text: &str,
    ) -> BoardResult<SendChatMessageResponse> {
        check(*self.chat_failure.lock().expect("chat failure lock"))?;
        self.sent.lock().expect("sent lock").push(text.to_string());
        self.push_chat(ChatSender::User, text);
        self.push_chat(ChatSender::Employer, "Thanks, we will be in touch.");
        Ok(SendChatMessageResponse {
            message: "sent".to_string(),
            employer_response: Some("Thanks, we will be in touch.".to_string()),
        })
    }
}
