use anyhow::{anyhow, Result};

use crate::cli::display::preview;
use crate::cli::ensure_saved;
use crate::cli::ui::{confirm, find_note, short_id};
use crate::db::Database;
use crate::models::Note;
use crate::repo::NoteRepository;

/// Execute the delete command
pub fn run_delete(db: &Database, identifier: &str, force: bool) -> Result<()> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(anyhow!("Identifier cannot be empty."));
    }

    let mut repo = NoteRepository::load(db);

    let Some(note) = find_note(&repo, identifier)? else {
        println!("No matches.");
        return Ok(());
    };

    print_note_summary(&note);
    println!();

    if !force && !confirm(&format!("Delete {}?", note.display_title()))? {
        return Ok(());
    }

    repo.delete(&note.id)?;
    ensure_saved(&repo)?;
    println!("Deleted.");

    Ok(())
}

fn print_note_summary(note: &Note) {
    println!("{}", note.display_title());
    println!("  {}", short_id(&note.id));
    let text = preview(note);
    if !text.is_empty() {
        println!("  {}", text);
    }
}
