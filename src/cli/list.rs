use anyhow::Result;
use chrono::Local;

use crate::cli::display::{format_note_row, preview};
use crate::cli::ui::term_size;
use crate::db::Database;
use crate::models::{Note, SortOrder};
use crate::repo::NoteRepository;

/// Execute the list command
pub fn run_list(db: &Database, search: Option<&str>, sort: SortOrder, limit: Option<usize>) -> Result<()> {
    let repo = NoteRepository::load(db);

    if repo.is_empty() {
        println!("No notes.");
        return Ok(());
    }

    let notes = select_notes(&repo, search, sort, limit);
    if notes.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    let (width, _) = term_size();
    let now = Local::now();
    for note in notes {
        println!("{}", format_note_row(note, now, width));
        let text = preview(note);
        if !text.is_empty() {
            println!("          {}", text);
        }
    }

    Ok(())
}

/// Filtered, sorted and capped view of the collection
pub fn select_notes<'a, S: crate::store::LocalStore>(
    repo: &'a NoteRepository<S>,
    search: Option<&str>,
    sort: SortOrder,
    limit: Option<usize>,
) -> Vec<&'a Note> {
    let mut notes = repo.list(search, sort);
    if let Some(limit) = limit {
        notes.truncate(limit);
    }
    notes
}
