//! Interactive view state on top of the repository.
//!
//! A session tracks which note is active, the current search and sort, and
//! buffers edits to the active note so they reach the store after a quiet
//! period instead of on every keystroke. Anything that moves away from the
//! active note (selecting, creating, deleting, importing, exporting,
//! closing) commits the buffered edit first.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::debounce::Debouncer;
use crate::error::NoteError;
use crate::models::{Note, SortOrder};
use crate::repo::NoteRepository;
use crate::store::LocalStore;
use crate::transfer::ImportReport;

/// Default quiet period before an edit is saved.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);

/// Uncommitted title/content of a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub note_id: String,
    pub title: String,
    pub content: String,
}

pub struct Session<S: LocalStore> {
    repo: NoteRepository<S>,
    active: Option<String>,
    autosave: Debouncer<Draft>,
    query: String,
    sort: SortOrder,
    zen_mode: bool,
}

impl<S: LocalStore> Session<S> {
    /// Start a session with the most recently edited note active.
    pub fn new(repo: NoteRepository<S>, autosave_delay: Duration) -> Self {
        let active = repo.most_recent().map(|n| n.id.clone());
        Self {
            repo,
            active,
            autosave: Debouncer::new(autosave_delay),
            query: String::new(),
            sort: SortOrder::default(),
            zen_mode: false,
        }
    }

    pub fn repo(&self) -> &NoteRepository<S> {
        &self.repo
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The active note as the user currently sees it, including any edit
    /// that has not been saved yet.
    pub fn active_note(&self) -> Option<Note> {
        let id = self.active.as_deref()?;
        let mut note = self.repo.get(id)?.clone();
        if let Some(draft) = self.autosave.pending().filter(|d| d.note_id == id) {
            note.title = draft.title.clone();
            note.content = draft.content.clone();
        }
        Some(note)
    }

    pub fn has_unsaved_edit(&self) -> bool {
        self.autosave.is_pending()
    }

    pub fn create_note(&mut self) -> Result<Note, NoteError> {
        self.flush()?;
        let note = self.repo.create();
        self.active = Some(note.id.clone());
        Ok(note)
    }

    pub fn select_note(&mut self, id: &str) -> Result<(), NoteError> {
        self.flush()?;
        if self.repo.get(id).is_none() {
            return Err(NoteError::NotFound(id.to_string()));
        }
        self.active = Some(id.to_string());
        Ok(())
    }

    pub fn edit_title(&mut self, title: &str, now: Instant) -> Result<(), NoteError> {
        let mut draft = self.current_draft()?;
        draft.title = title.to_string();
        self.autosave.schedule(draft, now);
        Ok(())
    }

    pub fn edit_content(&mut self, content: &str, now: Instant) -> Result<(), NoteError> {
        let mut draft = self.current_draft()?;
        draft.content = content.to_string();
        self.autosave.schedule(draft, now);
        Ok(())
    }

    /// Time left before the buffered edit is due, if there is one.
    pub fn autosave_remaining(&self, now: Instant) -> Option<Duration> {
        self.autosave.remaining(now)
    }

    /// Save the buffered edit if its quiet period has elapsed.
    pub fn tick(&mut self, now: Instant) -> Result<Option<Note>, NoteError> {
        match self.autosave.poll(now) {
            Some(draft) => self.commit(draft).map(Some),
            None => Ok(None),
        }
    }

    /// Save the buffered edit now.
    pub fn flush(&mut self) -> Result<Option<Note>, NoteError> {
        match self.autosave.take() {
            Some(draft) => self.commit(draft).map(Some),
            None => Ok(None),
        }
    }

    /// Delete a note. If it was active, the most recently edited remaining
    /// note becomes active, or none if the collection is now empty.
    pub fn delete_note(&mut self, id: &str) -> Result<Note, NoteError> {
        self.flush()?;
        let removed = self.repo.delete(id)?;
        if self.active.as_deref() == Some(id) {
            self.active = self.repo.most_recent().map(|n| n.id.clone());
        }
        Ok(removed)
    }

    pub fn import(&mut self, document: &str) -> Result<ImportReport, NoteError> {
        self.flush()?;
        let report = self.repo.import(document)?;
        if self.active.is_none() {
            self.active = self.repo.most_recent().map(|n| n.id.clone());
        }
        Ok(report)
    }

    pub fn export(&mut self) -> Result<String, NoteError> {
        self.flush()?;
        self.repo.export()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub fn zen_mode(&self) -> bool {
        self.zen_mode
    }

    pub fn toggle_zen_mode(&mut self) -> bool {
        self.zen_mode = !self.zen_mode;
        self.zen_mode
    }

    /// Notes matching the current search, in the current order.
    pub fn visible_notes(&self) -> Vec<&Note> {
        self.repo.list(Some(&self.query), self.sort)
    }

    /// Set when the store is behind the in-memory notes.
    pub fn storage_warning(&self) -> Option<&NoteError> {
        self.repo.persist_error()
    }

    pub fn retry_storage(&mut self) -> Result<(), NoteError> {
        self.repo.retry_persist()
    }

    /// Commit pending edits and hand back the repository.
    pub fn close(mut self) -> Result<NoteRepository<S>, NoteError> {
        self.flush()?;
        Ok(self.repo)
    }

    fn current_draft(&self) -> Result<Draft, NoteError> {
        let id = self
            .active
            .as_deref()
            .ok_or_else(|| NoteError::ValidationFailed("no note is selected".into()))?;

        if let Some(draft) = self.autosave.pending().filter(|d| d.note_id == id) {
            return Ok(draft.clone());
        }

        let note = self
            .repo
            .get(id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;
        Ok(Draft {
            note_id: note.id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
        })
    }

    fn commit(&mut self, draft: Draft) -> Result<Note, NoteError> {
        debug!(id = %draft.note_id, "saving edit");
        self.repo.update(&draft.note_id, &draft.title, &draft.content)
    }
}
