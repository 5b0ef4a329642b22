//! Key/value access to the `app_settings` table.

use rusqlite::params;

use super::Database;
use crate::error::NoteError;

impl Database {
    /// Read a setting. Returns `None` if the key was never written.
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, NoteError> {
        let result = self.conn.query_row(
            "SELECT value FROM app_settings WHERE key = ?",
            [key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a setting, replacing any previous value.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), NoteError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO app_settings (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a setting. Returns true if a value was removed.
    pub fn delete_setting(&self, key: &str) -> Result<bool, NoteError> {
        let rows = self
            .conn
            .execute("DELETE FROM app_settings WHERE key = ?", [key])?;
        Ok(rows > 0)
    }
}
