//! Local key/value persistence.
//!
//! Everything the app keeps on disk is a string under one of a handful of
//! keys. `Database` is the production store; `MemoryStore` backs tests and
//! can be told to fail writes the way a full disk would.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::db::Database;
use crate::error::NoteError;

/// Serialized note collection.
pub const NOTES_KEY: &str = "notes";
/// JSON boolean dark-mode preference.
pub const DARK_MODE_KEY: &str = "darkMode";
/// JSON boolean set once the welcome screen has been dismissed.
pub const LANDING_DISMISSED_KEY: &str = "landingDismissed";
/// Milliseconds since the epoch when the install prompt was last dismissed.
pub const INSTALL_PROMPT_DISMISSED_KEY: &str = "pwaPromptDismissed";

pub trait LocalStore {
    /// Raw stored value, or `None` if the key was never written.
    fn load(&self, key: &str) -> Result<Option<String>, NoteError>;

    /// Overwrite the value for `key`.
    fn save(&self, key: &str, value: &str) -> Result<(), NoteError>;
}

impl LocalStore for Database {
    fn load(&self, key: &str) -> Result<Option<String>, NoteError> {
        self.get_setting(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), NoteError> {
        self.set_setting(key, value)
    }
}

impl<S: LocalStore + ?Sized> LocalStore for &S {
    fn load(&self, key: &str) -> Result<Option<String>, NoteError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), NoteError> {
        (**self).save(key, value)
    }
}

/// In-process store. Values are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
    fail_reads: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save` fail with `StorageUnavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Make every subsequent `load` fail with `StorageUnavailable`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl LocalStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, NoteError> {
        if self.fail_reads.get() {
            return Err(NoteError::StorageUnavailable("store is not readable".into()));
        }
        Ok(self.values.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), NoteError> {
        if self.fail_writes.get() {
            return Err(NoteError::StorageUnavailable("store is full".into()));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.load(NOTES_KEY).unwrap(), None);

        store.save(NOTES_KEY, "[]").unwrap();
        assert_eq!(store.load(NOTES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_store_failed_write_keeps_old_value() {
        let store = MemoryStore::new();
        store.save(DARK_MODE_KEY, "false").unwrap();

        store.set_fail_writes(true);
        let err = store.save(DARK_MODE_KEY, "true").unwrap_err();
        assert!(matches!(err, NoteError::StorageUnavailable(_)));
        assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn test_database_store() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.load(NOTES_KEY).unwrap(), None);

        db.save(NOTES_KEY, "[]").unwrap();
        db.save(NOTES_KEY, "[{}]").unwrap();
        assert_eq!(db.load(NOTES_KEY).unwrap().as_deref(), Some("[{}]"));
    }

    #[test]
    fn test_store_by_reference() {
        let store = MemoryStore::new();
        let by_ref: &MemoryStore = &store;
        by_ref.save(LANDING_DISMISSED_KEY, "true").unwrap();
        assert_eq!(store.get(LANDING_DISMISSED_KEY).as_deref(), Some("true"));
    }
}
