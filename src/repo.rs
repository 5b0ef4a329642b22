//! The note collection for the current session.
//!
//! `NoteRepository` owns the notes in memory and writes the whole collection
//! back to its store after every mutation. The in-memory copy is
//! authoritative: when a write fails the change still stands, the failure is
//! remembered for the caller to report, and the next successful write brings
//! the store back in line. A store that could not be read at load time is
//! never written until it reads back, so stored notes are not replaced by a
//! collection that never saw them.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::NoteError;
use crate::html;
use crate::models::{Note, SortOrder};
use crate::store::{LocalStore, NOTES_KEY};
use crate::transfer::{self, ImportReport};

pub type Clock = Box<dyn Fn() -> DateTime<Utc>>;

pub struct NoteRepository<S: LocalStore> {
    store: S,
    notes: Vec<Note>,
    clock: Clock,
    persist_error: Option<NoteError>,
    load_error: Option<NoteError>,
}

impl<S: LocalStore> NoteRepository<S> {
    /// Load the stored collection. Missing, unreadable or malformed data
    /// yields an empty collection; it never fails.
    pub fn load(store: S) -> Self {
        Self::with_clock(store, Box::new(Utc::now))
    }

    pub fn with_clock(store: S, clock: Clock) -> Self {
        let (notes, load_error) = match store.load(NOTES_KEY) {
            Ok(raw) => (decode_stored(raw), None),
            Err(e) => {
                warn!(error = %e, "could not read stored notes, starting empty");
                (Vec::new(), Some(e))
            }
        };
        debug!(count = notes.len(), "loaded notes");

        Self {
            store,
            notes,
            clock,
            persist_error: load_error.clone(),
            load_error,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All notes in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Note with the latest `lastEdited`; the first one wins on ties.
    pub fn most_recent(&self) -> Option<&Note> {
        self.notes
            .iter()
            .reduce(|best, n| if n.last_edited > best.last_edited { n } else { best })
    }

    /// Create an empty note and persist the collection.
    pub fn create(&mut self) -> Note {
        let mut note = Note::new((self.clock)());
        while self.get(&note.id).is_some() {
            note = Note::new(note.created);
        }

        self.notes.push(note.clone());
        self.persist();
        debug!(id = %note.id, "created note");
        note
    }

    /// Replace title and content and refresh `lastEdited`.
    pub fn update(&mut self, id: &str, title: &str, content: &str) -> Result<Note, NoteError> {
        let now = (self.clock)();
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;

        note.title = title.to_string();
        note.content = content.to_string();
        // A clock stepping backwards must not break created <= lastEdited
        note.last_edited = now.max(note.created);
        let updated = note.clone();

        self.persist();
        Ok(updated)
    }

    /// Remove a note. Unknown ids give `NotFound` and change nothing.
    pub fn delete(&mut self, id: &str) -> Result<Note, NoteError> {
        let pos = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;

        let removed = self.notes.remove(pos);
        self.persist();
        debug!(id = %removed.id, "deleted note");
        Ok(removed)
    }

    /// Filter and order notes for display. A blank filter matches all.
    pub fn list(&self, filter: Option<&str>, sort: SortOrder) -> Vec<&Note> {
        let query = filter.map(str::trim).filter(|q| !q.is_empty());

        let mut notes: Vec<&Note> = match query {
            Some(q) => {
                let needle = q.to_lowercase();
                self.notes
                    .iter()
                    .filter(|n| {
                        n.title.to_lowercase().contains(&needle)
                            || html::contains_text(&n.content, &needle)
                    })
                    .collect()
            }
            None => self.notes.iter().collect(),
        };

        sort.sort(&mut notes);
        notes
    }

    /// The collection as a backup document.
    pub fn export(&self) -> Result<String, NoteError> {
        transfer::export_notes(&self.notes)
            .map_err(|e| NoteError::ValidationFailed(format!("could not serialize notes: {}", e)))
    }

    /// Merge a backup document. A document that is not a JSON array is
    /// rejected without touching the collection.
    pub fn import(&mut self, document: &str) -> Result<ImportReport, NoteError> {
        let candidates = transfer::parse_document(document)?;
        let report = transfer::merge_notes(&mut self.notes, candidates);

        if report.added > 0 {
            self.persist();
        }
        debug!(
            added = report.added,
            duplicates = report.duplicates,
            rejected = report.rejected.len(),
            "imported notes"
        );
        Ok(report)
    }

    /// The last write failure, if the store is behind the in-memory state.
    /// After an unreadable load this is the read error until the store
    /// reads back.
    pub fn persist_error(&self) -> Option<&NoteError> {
        self.persist_error.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.persist_error.is_some()
    }

    /// Try again to write the collection. Returns the outcome.
    pub fn retry_persist(&mut self) -> Result<(), NoteError> {
        self.persist();
        match &self.persist_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Whether the initial load failed and the store has not been read since.
    pub fn load_failed(&self) -> bool {
        self.load_error.is_some()
    }

    /// Re-read a store that failed at load time. Stored notes come first,
    /// in-memory versions replace stored ones with the same id, and notes
    /// created since are appended.
    fn reconcile(&mut self) -> Result<(), NoteError> {
        if self.load_error.is_none() {
            return Ok(());
        }

        let raw = match self.store.load(NOTES_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                self.load_error = Some(e.clone());
                return Err(e);
            }
        };

        let mut merged = decode_stored(raw);
        for note in std::mem::take(&mut self.notes) {
            match merged.iter_mut().find(|n| n.id == note.id) {
                Some(existing) => *existing = note,
                None => merged.push(note),
            }
        }
        debug!(count = merged.len(), "store readable again, merged stored notes");
        self.notes = merged;
        self.load_error = None;
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(e) = self.reconcile() {
            warn!(error = %e, "store still unreadable, not overwriting stored notes");
            self.persist_error = Some(e);
            return;
        }

        let result = serde_json::to_string(&self.notes)
            .map_err(|e| NoteError::ValidationFailed(format!("could not serialize notes: {}", e)))
            .and_then(|raw| self.store.save(NOTES_KEY, &raw));

        match result {
            Ok(()) => {
                if self.persist_error.take().is_some() {
                    debug!("store caught up with in-memory notes");
                }
            }
            Err(e) => {
                warn!(error = %e, "could not save notes, keeping changes in memory");
                self.persist_error = Some(e);
            }
        }
    }
}

/// Stored value to notes; absent or malformed data is an empty collection.
fn decode_stored(raw: Option<String>) -> Vec<Note> {
    match raw.as_deref().map(parse_collection) {
        Some(Ok(notes)) => notes,
        Some(Err(e)) => {
            warn!(error = %e, "ignoring stored notes");
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Parse the stored array, dropping notes that fail validation and repeats
/// of an id already seen.
fn parse_collection(raw: &str) -> Result<Vec<Note>, NoteError> {
    let parsed: Vec<Note> =
        serde_json::from_str(raw).map_err(|e| NoteError::MalformedPersistedData(e.to_string()))?;

    let mut notes: Vec<Note> = Vec::with_capacity(parsed.len());
    for (index, note) in parsed.into_iter().enumerate() {
        if let Err(e) = note.validate() {
            warn!(index, error = %e, "dropping invalid stored note");
            continue;
        }
        if notes.iter().any(|n| n.id == note.id) {
            warn!(index, id = %note.id, "dropping stored note with duplicate id");
            continue;
        }
        notes.push(note);
    }
    Ok(notes)
}
