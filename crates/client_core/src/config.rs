use std::{fs, path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::{
    chat::DEFAULT_POLL_INTERVAL, deck::DEFAULT_WINDOW_SIZE, gesture::GestureConfig,
    session::default_session_path,
};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const SETTINGS_FILE: &str = "jobswipe.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub chat_poll_secs: u64,
    pub window_size: usize,
    pub session_file: PathBuf,
    pub gesture: GestureConfig,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            request_timeout_secs: 30,
            chat_poll_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            window_size: DEFAULT_WINDOW_SIZE,
            session_file: default_session_path(),
            gesture: GestureConfig::default(),
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn chat_poll_interval(&self) -> Duration {
        Duration::from_secs(self.chat_poll_secs.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    chat_poll_secs: Option<u64>,
    window_size: Option<usize>,
    session_file: Option<PathBuf>,
    gesture: Option<GestureConfig>,
}

/// Defaults, then `jobswipe.toml` in the working directory, then the
/// environment.
pub fn load_settings() -> ClientSettings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_url {
                    settings.api_url = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = v;
                }
                if let Some(v) = file_cfg.chat_poll_secs {
                    settings.chat_poll_secs = v;
                }
                if let Some(v) = file_cfg.window_size {
                    settings.window_size = v;
                }
                if let Some(v) = file_cfg.session_file {
                    settings.session_file = v;
                }
                if let Some(v) = file_cfg.gesture {
                    settings.gesture = v;
                }
            }
            Err(err) => warn!("ignoring malformed {SETTINGS_FILE}: {err}"),
        }
    }

    if let Some(v) = env("JOBSWIPE_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
    if let Some(v) = env("APP__CHAT_POLL_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.chat_poll_secs = parsed;
        }
    }
    if let Some(v) = env("APP__WINDOW_SIZE") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.window_size = parsed;
        }
    }
    if let Some(v) = env("APP__SESSION_FILE") {
        settings.session_file = PathBuf::from(v);
    }

    settings
}

/// Checks the API base URL and strips trailing slashes. Blank input falls
/// back to [`DEFAULT_API_URL`].
pub fn normalize_api_url(raw_api_url: &str) -> anyhow::Result<String> {
    let raw_api_url = raw_api_url.trim();
    if raw_api_url.is_empty() {
        return Ok(DEFAULT_API_URL.to_string());
    }

    let parsed =
        Url::parse(raw_api_url).with_context(|| format!("invalid api url '{raw_api_url}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("api url '{raw_api_url}' must use http or https");
    }

    Ok(raw_api_url.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
