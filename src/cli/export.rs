use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::Database;
use crate::repo::NoteRepository;
use crate::transfer::backup_file_name;

/// Execute the export command. Returns the path written.
pub fn run_export(db: &Database, export_dir: &Path, output: Option<PathBuf>) -> Result<PathBuf> {
    let repo = NoteRepository::load(db);
    let document = repo.export()?;

    let path = output.unwrap_or_else(|| export_dir.join(backup_file_name(Local::now().date_naive())));
    write_file(&path, &document)?;

    println!("Exported {} to {}", repo.len(), path.display());
    Ok(path)
}

/// Write `contents`, creating parent directories as needed.
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Could not write {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Note;

    #[test]
    fn test_export_default_name() {
        let db = Database::open_memory().unwrap();
        NoteRepository::load(&db).create();
        let dir = tempfile::tempdir().unwrap();

        let path = run_export(&db, dir.path(), None).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("notecmd-backup-"));
        assert!(name.ends_with(".json"));

        let notes: Vec<Note> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_export_explicit_path_creates_dirs() {
        let db = Database::open_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("all.json");

        let path = run_export(&db, dir.path(), Some(target.clone())).unwrap();
        assert_eq!(path, target);
        assert_eq!(fs::read_to_string(&target).unwrap().trim(), "[]");
    }
}
