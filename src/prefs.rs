//! Persisted UI preferences.
//!
//! Each flag lives under its own store key, separate from the note
//! collection. Reads never fail: a missing or unreadable value falls back to
//! the default and a warning is logged.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::error::NoteError;
use crate::store::{LocalStore, DARK_MODE_KEY, INSTALL_PROMPT_DISMISSED_KEY, LANDING_DISMISSED_KEY};

/// How long a dismissed install prompt stays hidden.
pub const INSTALL_PROMPT_SNOOZE_HOURS: i64 = 24;

pub struct Preferences<S: LocalStore> {
    store: S,
    system_dark: bool,
}

impl<S: LocalStore> Preferences<S> {
    /// `system_dark` is used when no dark-mode choice has been stored.
    pub fn new(store: S, system_dark: bool) -> Self {
        Self { store, system_dark }
    }

    pub fn dark_mode(&self) -> bool {
        self.read_bool(DARK_MODE_KEY).unwrap_or(self.system_dark)
    }

    pub fn set_dark_mode(&self, dark: bool) -> Result<(), NoteError> {
        self.store.save(DARK_MODE_KEY, &dark.to_string())
    }

    /// Flip dark mode and return the new value.
    pub fn toggle_dark_mode(&self) -> Result<bool, NoteError> {
        let dark = !self.dark_mode();
        self.set_dark_mode(dark)?;
        Ok(dark)
    }

    pub fn landing_dismissed(&self) -> bool {
        self.read_bool(LANDING_DISMISSED_KEY).unwrap_or(false)
    }

    pub fn dismiss_landing(&self) -> Result<(), NoteError> {
        self.store.save(LANDING_DISMISSED_KEY, "true")
    }

    /// True unless the prompt was dismissed within the snooze window.
    pub fn install_prompt_due(&self, now: DateTime<Utc>) -> bool {
        let Some(raw) = self.read(INSTALL_PROMPT_DISMISSED_KEY) else {
            return true;
        };
        let Some(dismissed) = raw
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
        else {
            return true;
        };
        now - dismissed >= Duration::hours(INSTALL_PROMPT_SNOOZE_HOURS)
    }

    pub fn dismiss_install_prompt(&self, now: DateTime<Utc>) -> Result<(), NoteError> {
        self.store
            .save(INSTALL_PROMPT_DISMISSED_KEY, &now.timestamp_millis().to_string())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.load(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "could not read preference");
                None
            }
        }
    }

    fn read_bool(&self, key: &str) -> Option<bool> {
        let raw = self.read(key)?;
        match serde_json::from_str::<bool>(raw.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(key, value = %raw, "ignoring malformed preference");
                None
            }
        }
    }
}
