//! Create a note from the command line

use anyhow::Result;

use crate::cli::editor::NoteEditor;
use crate::cli::ui::short_id;
use crate::cli::{body_from_arg, ensure_saved};
use crate::db::Database;
use crate::models::{Note, DEFAULT_TITLE};
use crate::repo::NoteRepository;

/// Execute the new command
pub fn run_new(
    db: &Database,
    title: Option<String>,
    text: Option<String>,
    is_html: bool,
    editor: Option<&mut dyn NoteEditor>,
) -> Result<Note> {
    let mut repo = NoteRepository::load(db);

    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let mut content = text.map(|t| body_from_arg(&t, is_html)).unwrap_or_default();

    if let Some(editor) = editor {
        if let Some(edited) = editor.edit(&title, &content)? {
            content = edited;
        }
    }

    let created = repo.create();
    let note = if title != created.title || !content.is_empty() {
        repo.update(&created.id, &title, &content)?
    } else {
        created
    };
    ensure_saved(&repo)?;

    println!("Created {}.", short_id(&note.id));
    Ok(note)
}
