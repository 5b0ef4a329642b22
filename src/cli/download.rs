use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cli::export::write_file;
use crate::cli::ui::find_note;
use crate::db::Database;
use crate::html::TextFormat;
use crate::repo::NoteRepository;
use crate::transfer::{note_file_name, render_note};

/// Execute the download command. Returns the path written, if any.
pub fn run_download(
    db: &Database,
    identifier: &str,
    format: TextFormat,
    export_dir: &Path,
    output: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    let repo = NoteRepository::load(db);

    let Some(note) = find_note(&repo, identifier)? else {
        println!("No matches.");
        return Ok(None);
    };

    let path = output.unwrap_or_else(|| export_dir.join(note_file_name(&note, format)));
    write_file(&path, &render_note(&note, format))?;

    println!("Saved {}", path.display());
    Ok(Some(path))
}
