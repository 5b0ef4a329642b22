use anyhow::Result;

use crate::cli::display::print_note;
use crate::cli::ui::find_note;
use crate::cli::ShowFormat;
use crate::db::Database;
use crate::html::TextFormat;
use crate::repo::NoteRepository;

/// Execute the show command
pub fn run_show(db: &Database, identifier: &str, format: ShowFormat) -> Result<()> {
    let repo = NoteRepository::load(db);

    let Some(note) = find_note(&repo, identifier)? else {
        println!("No matches.");
        return Ok(());
    };

    match format {
        ShowFormat::Md => print_note(&note, TextFormat::Markdown),
        ShowFormat::Txt => print_note(&note, TextFormat::PlainText),
        ShowFormat::Html => println!("{}", note.content),
    }

    Ok(())
}
