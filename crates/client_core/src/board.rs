//! The job board backend, reached over HTTP.

use std::{path::Path, time::Duration};

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::{JobId, SwipeAction},
    protocol::{
        ChatHistoryResponse, ChatMessage, JobListResponse, JobPosting, LoginRequest,
        MatchExplanation, MessageResponse, ProfileUpdate, RegisterRequest, ResumeUploadResponse,
        SendChatMessageRequest, SendChatMessageResponse, SwipeRequest, TokenResponse, UserProfile,
    },
};
use tracing::debug;

use crate::{
    error::{BoardError, BoardResult},
    profile::validate_resume_file,
    session::{Credential, SessionContext},
};

const LOGIN_ENDPOINT: &str = "/auth/login";
const REGISTER_ENDPOINT: &str = "/auth/register";
const ME_ENDPOINT: &str = "/auth/me";
const PROFILE_UPDATE_ENDPOINT: &str = "/auth/profile/update";
const RESUME_UPLOAD_ENDPOINT: &str = "/resume/upload";
const FEED_ENDPOINT: &str = "/jobs/feed";
const APPLIED_ENDPOINT: &str = "/jobs/applied";
const SAVED_ENDPOINT: &str = "/jobs/saved";
const SWIPE_ENDPOINT: &str = "/swipe";

/// Operations the client needs from the backend.
///
/// `login` and `register` establish the session they return; every other call
/// carries the session's bearer credential.
#[async_trait]
pub trait JobBoard: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> BoardResult<TokenResponse>;
    async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> BoardResult<TokenResponse>;
    async fn fetch_feed(&self) -> BoardResult<Vec<JobPosting>>;
    async fn record_swipe(&self, job_id: JobId, action: SwipeAction) -> BoardResult<()>;
    async fn applied_jobs(&self) -> BoardResult<Vec<JobPosting>>;
    async fn saved_jobs(&self) -> BoardResult<Vec<JobPosting>>;
    async fn match_explanation(&self, job_id: JobId) -> BoardResult<MatchExplanation>;
    async fn current_user(&self) -> BoardResult<UserProfile>;
    async fn update_profile(&self, update: &ProfileUpdate) -> BoardResult<()>;
    async fn upload_resume(&self, path: &Path) -> BoardResult<ResumeUploadResponse>;
    async fn chat_messages(&self, job_id: JobId) -> BoardResult<Vec<ChatMessage>>;
    async fn send_chat_message(
        &self,
        job_id: JobId,
        text: &str,
    ) -> BoardResult<SendChatMessageResponse>;
}

pub struct HttpJobBoard {
    http: Client,
    base_url: String,
    session: SessionContext,
}

impl HttpJobBoard {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: SessionContext,
    ) -> BoardResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorized(&self, request: RequestBuilder) -> BoardResult<RequestBuilder> {
        let token = self
            .session
            .bearer_token()
            .await
            .ok_or(BoardError::MissingCredential)?;
        Ok(request.bearer_auth(token))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> BoardResult<T> {
        let body = self.send(request, endpoint).await?;
        serde_json::from_str(&body).map_err(|source| BoardError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> BoardResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(endpoint, status = status.as_u16(), "job board response");
        if !status.is_success() {
            return Err(BoardError::from_status(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn get_authorized<T: DeserializeOwned>(&self, endpoint: &str) -> BoardResult<T> {
        let request = self.authorized(self.http.get(self.url(endpoint))).await?;
        self.send_json(request, endpoint).await
    }

    async fn establish(&self, email: &str, token: &TokenResponse) {
        self.session
            .establish(Credential {
                token: token.access_token.clone(),
                email: Some(email.to_string()),
            })
            .await;
    }
}

#[async_trait]
impl JobBoard for HttpJobBoard {
    async fn login(&self, email: &str, password: &str) -> BoardResult<TokenResponse> {
        let request = self.http.post(self.url(LOGIN_ENDPOINT)).json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        });
        let token: TokenResponse = self.send_json(request, LOGIN_ENDPOINT).await?;
        self.establish(email, &token).await;
        Ok(token)
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> BoardResult<TokenResponse> {
        let request = self
            .http
            .post(self.url(REGISTER_ENDPOINT))
            .json(&RegisterRequest {
                email: email.to_string(),
                password: password.to_string(),
                name: name.map(str::to_string),
            });
        let token: TokenResponse = self.send_json(request, REGISTER_ENDPOINT).await?;
        self.establish(email, &token).await;
        Ok(token)
    }

    async fn fetch_feed(&self) -> BoardResult<Vec<JobPosting>> {
        let body: JobListResponse = self.get_authorized(FEED_ENDPOINT).await?;
        Ok(body.jobs)
    }

    async fn record_swipe(&self, job_id: JobId, action: SwipeAction) -> BoardResult<()> {
        let request = self
            .authorized(
                self.http
                    .post(self.url(SWIPE_ENDPOINT))
                    .json(&SwipeRequest { job_id, action }),
            )
            .await?;
        self.send(request, SWIPE_ENDPOINT).await?;
        Ok(())
    }

    async fn applied_jobs(&self) -> BoardResult<Vec<JobPosting>> {
        let body: JobListResponse = self.get_authorized(APPLIED_ENDPOINT).await?;
        Ok(body.jobs)
    }

    async fn saved_jobs(&self) -> BoardResult<Vec<JobPosting>> {
        let body: JobListResponse = self.get_authorized(SAVED_ENDPOINT).await?;
        Ok(body.jobs)
    }

    async fn match_explanation(&self, job_id: JobId) -> BoardResult<MatchExplanation> {
        self.get_authorized(&format!("/jobs/{job_id}/explanation"))
            .await
    }

    async fn current_user(&self) -> BoardResult<UserProfile> {
        self.get_authorized(ME_ENDPOINT).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> BoardResult<()> {
        let request = self
            .authorized(self.http.put(self.url(PROFILE_UPDATE_ENDPOINT)).json(update))
            .await?;
        let response: MessageResponse = self.send_json(request, PROFILE_UPDATE_ENDPOINT).await?;
        debug!(message = %response.message, "profile updated");
        Ok(())
    }

    async fn upload_resume(&self, path: &Path) -> BoardResult<ResumeUploadResponse> {
        let resume = validate_resume_file(path)?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| BoardError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("resume")
            .to_string();
        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str(resume.mime_type())?;
        let request = self
            .authorized(
                self.http
                    .post(self.url(RESUME_UPLOAD_ENDPOINT))
                    .multipart(Form::new().part("file", part)),
            )
            .await?;
        self.send_json(request, RESUME_UPLOAD_ENDPOINT).await
    }

    async fn chat_messages(&self, job_id: JobId) -> BoardResult<Vec<ChatMessage>> {
        let body: ChatHistoryResponse = self.get_authorized(&format!("/chat/{job_id}")).await?;
        Ok(body.messages)
    }

    async fn send_chat_message(
        &self,
        job_id: JobId,
        text: &str,
    ) -> BoardResult<SendChatMessageResponse> {
        let endpoint = format!("/chat/{job_id}");
        let request = self
            .authorized(
                self.http
                    .post(self.url(&endpoint))
                    .json(&SendChatMessageRequest {
                        message: text.to_string(),
                    }),
            )
            .await?;
        self.send_json(request, &endpoint).await
    }
}

/// Stand-in used when no backend has been configured yet.
pub struct MissingJobBoard;

impl MissingJobBoard {
    fn unavailable<T>() -> BoardResult<T> {
        Err(BoardError::Unavailable(
            "no job board has been configured".to_string(),
        ))
    }
}

#[async_trait]
impl JobBoard for MissingJobBoard {
    async fn login(&self, _email: &str, _password: &str) -> BoardResult<TokenResponse> {
        Self::unavailable()
    }

    async fn register(
        &self,
        _email: &str,
        _password: &str,
        _name: Option<&str>,
    ) -> BoardResult<TokenResponse> {
        Self::unavailable()
    }

    async fn fetch_feed(&self) -> BoardResult<Vec<JobPosting>> {
        Self::unavailable()
    }

    async fn record_swipe(&self, _job_id: JobId, _action: SwipeAction) -> BoardResult<()> {
        Self::unavailable()
    }

    async fn applied_jobs(&self) -> BoardResult<Vec<JobPosting>> {
        Self::unavailable()
    }

    async fn saved_jobs(&self) -> BoardResult<Vec<JobPosting>> {
        Self::unavailable()
    }

    async fn match_explanation(&self, _job_id: JobId) -> BoardResult<MatchExplanation> {
        Self::unavailable()
    }

    async fn current_user(&self) -> BoardResult<UserProfile> {
        Self::unavailable()
    }

    async fn update_profile(&self, _update: &ProfileUpdate) -> BoardResult<()> {
        Self::unavailable()
    }

    async fn upload_resume(&self, _path: &Path) -> BoardResult<ResumeUploadResponse> {
        Self::unavailable()
    }

    async fn chat_messages(&self, _job_id: JobId) -> BoardResult<Vec<ChatMessage>> {
        Self::unavailable()
    }

    async fn send_chat_message(
        &self,
        _job_id: JobId,
        _text: &str,
    ) -> BoardResult<SendChatMessageResponse> {
        Self::unavailable()
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
