use std::path::PathBuf;

use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("not signed in")]
    MissingCredential,
    #[error("session rejected by the job board: {0}")]
    Unauthorized(String),
    #[error("job board returned HTTP {status}: {error}")]
    Status { status: u16, error: ApiError },
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
    #[error("unsupported resume file {path}: expected a PDF or DOCX document")]
    InvalidResume { path: PathBuf },
    #[error("io failure on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("job board unavailable: {0}")]
    Unavailable(String),
}

impl BoardError {
    /// Missing or rejected credentials cannot be recovered in place; the caller
    /// has to send the user back through sign-in.
    pub fn requires_reauth(&self) -> bool {
        match self {
            Self::MissingCredential | Self::Unauthorized(_) => true,
            Self::Status { error, .. } => matches!(error.code, ErrorCode::Unauthorized),
            _ => false,
        }
    }

    pub fn from_status(status: u16, body: &str) -> Self {
        let error = ApiError::from_response(status, body);
        if status == 401 {
            Self::Unauthorized(error.message)
        } else {
            Self::Status { status, error }
        }
    }
}

pub type BoardResult<T> = std::result::Result<T, BoardError>;
