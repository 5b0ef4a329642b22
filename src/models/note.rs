use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::NoteError;

/// Title given to freshly created notes.
pub const DEFAULT_TITLE: &str = "Untitled Note";

/// A single note. `content` is an HTML string owned by the editor; nothing
/// in the core interprets it except for search and text export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

impl Note {
    /// A new empty note stamped with `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            content: String::new(),
            created: now,
            last_edited: now,
        }
    }

    /// Check the invariants an imported note must satisfy.
    pub fn validate(&self) -> Result<(), NoteError> {
        if self.id.trim().is_empty() {
            return Err(NoteError::ValidationFailed("id is required and cannot be empty".into()));
        }
        if self.last_edited < self.created {
            return Err(NoteError::ValidationFailed(format!(
                "lastEdited ({}) is earlier than created ({})",
                self.last_edited.to_rfc3339(),
                self.created.to_rfc3339()
            )));
        }
        Ok(())
    }

    /// Title shown in lists; blank titles fall back to the default.
    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            DEFAULT_TITLE
        } else {
            title
        }
    }
}
