//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use shared::{
    domain::{JobId, SwipeAction},
    protocol::ProfileUpdate,
};

#[derive(Debug)]
pub enum BackendCommand {
    RestoreSession,
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        name: Option<String>,
    },
    Logout,
    LoadFeed,
    FetchExplanation {
        job_id: JobId,
    },
    RecordSwipe {
        job_id: JobId,
        action: SwipeAction,
    },
    LoadApplied,
    LoadDashboard,
    OpenChat {
        job_id: JobId,
    },
    SendChat {
        job_id: JobId,
        text: String,
    },
    CloseChat,
    LoadProfile,
    SaveProfile(ProfileUpdate),
    UploadResume {
        path: PathBuf,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RestoreSession => "restore_session",
            Self::Login { .. } => "login",
            Self::Register { .. } => "register",
            Self::Logout => "logout",
            Self::LoadFeed => "load_feed",
            Self::FetchExplanation { .. } => "fetch_explanation",
            Self::RecordSwipe { .. } => "record_swipe",
            Self::LoadApplied => "load_applied",
            Self::LoadDashboard => "load_dashboard",
            Self::OpenChat { .. } => "open_chat",
            Self::SendChat { .. } => "send_chat",
            Self::CloseChat => "close_chat",
            Self::LoadProfile => "load_profile",
            Self::SaveProfile(_) => "save_profile",
            Self::UploadResume { .. } => "upload_resume",
        }
    }
}
