//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{card::ExplanationView, dashboard::DashboardSummary, error::BoardError, feed::FeedLoad};
use shared::{
    domain::JobId,
    protocol::{ChatMessage, JobPosting, ParsedResume, UserProfile},
};

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    SignedIn { email: Option<String> },
    SignedOut,
    Feed(FeedLoad),
    Explanation { job_id: JobId, view: ExplanationView },
    Applied(Vec<JobPosting>),
    Dashboard(DashboardSummary),
    ChatMessages { job_id: JobId, messages: Vec<ChatMessage> },
    ChatSendFailed { job_id: JobId, draft: String, error: UiError },
    Profile(UserProfile),
    ProfileSaved,
    ResumeParsed(ParsedResume),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Login,
    Feed,
    Chat,
    Profile,
    General,
}

pub fn classify_login_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("backend worker startup failure") {
        "Backend worker startup failure; check the settings file and relaunch.".to_string()
    } else if lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
        || lower.contains("transport failure")
    {
        "Job board unreachable; check the API URL and network, then retry.".to_string()
    } else {
        format!("Sign-in failed: {message}")
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("401")
            || lower.contains("unauthorized")
            || lower.contains("not signed in")
            || lower.contains("session rejected")
            || lower.contains("incorrect email or password")
        {
            UiErrorCategory::Auth
        } else if lower.contains("invalid")
            || lower.contains("unsupported")
            || lower.contains("missing")
            || lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("connection")
            || lower.contains("transport")
            || lower.contains("unavailable")
            || lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };
        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_board(context: UiErrorContext, err: &BoardError) -> Self {
        let category = match err {
            _ if err.requires_reauth() => UiErrorCategory::Auth,
            BoardError::Transport(_) | BoardError::Unavailable(_) => UiErrorCategory::Transport,
            BoardError::InvalidResume { .. } | BoardError::Decode { .. } => {
                UiErrorCategory::Validation
            }
            BoardError::Status { status, .. } if (400..500).contains(status) => {
                UiErrorCategory::Validation
            }
            _ => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Auth => "Authentication",
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ApiError;

    #[test]
    fn board_errors_keep_their_category() {
        let err = UiError::from_board(
            UiErrorContext::Feed,
            &BoardError::Unauthorized("token expired".to_string()),
        );
        assert!(err.requires_reauth());
        assert_eq!(err.context(), UiErrorContext::Feed);

        let err = UiError::from_board(
            UiErrorContext::Profile,
            &BoardError::InvalidResume {
                path: "cv.png".into(),
            },
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);

        let err = UiError::from_board(
            UiErrorContext::General,
            &BoardError::Unavailable("offline".to_string()),
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);

        let err = UiError::from_board(
            UiErrorContext::General,
            &BoardError::Status {
                status: 500,
                error: ApiError::from_response(500, "boom"),
            },
        );
        assert_eq!(err.category(), UiErrorCategory::Unknown);
    }

    #[test]
    fn classifies_backend_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "Backend command processor disconnected; restart the app",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(!err.requires_reauth());
    }

    #[test]
    fn login_failures_get_actionable_text() {
        assert_eq!(
            classify_login_failure("transport failure: error sending request"),
            "Job board unreachable; check the API URL and network, then retry."
        );
        assert_eq!(
            classify_login_failure("Incorrect email or password"),
            "Sign-in failed: Incorrect email or password"
        );
    }
}
