//! UI layer for desktop GUI: app shell, views, and card painting.

pub mod app;
pub mod card;

pub use app::{DesktopGuiApp, PersistedDesktopSettings, SETTINGS_STORAGE_KEY};
