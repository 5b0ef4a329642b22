//! Edit an existing note from the command line
//!
//! With `--title`/`--text` the change is applied directly. Without either,
//! the title is prompted for and the body opens in the editor.

use anyhow::Result;

use crate::cli::editor::NoteEditor;
use crate::cli::ui::{find_note, text_input};
use crate::cli::{body_from_arg, ensure_saved};
use crate::db::Database;
use crate::models::Note;
use crate::repo::NoteRepository;

/// Execute the edit command
pub fn run_edit(
    db: &Database,
    identifier: &str,
    title: Option<String>,
    text: Option<String>,
    is_html: bool,
    editor: &mut dyn NoteEditor,
) -> Result<Option<Note>> {
    let mut repo = NoteRepository::load(db);

    let Some(note) = find_note(&repo, identifier)? else {
        println!("No matches.");
        return Ok(None);
    };

    let (new_title, new_content) = if title.is_some() || text.is_some() {
        (
            title.unwrap_or_else(|| note.title.clone()),
            text.map(|t| body_from_arg(&t, is_html))
                .unwrap_or_else(|| note.content.clone()),
        )
    } else {
        let Some(new_title) = text_input("title: ", Some(&note.title))? else {
            return Ok(None);
        };
        let new_content = editor
            .edit(&new_title, &note.content)?
            .unwrap_or_else(|| note.content.clone());
        (new_title, new_content)
    };

    apply_edit(&mut repo, &note, &new_title, &new_content)
}

/// Save the change unless nothing differs.
fn apply_edit(
    repo: &mut NoteRepository<&Database>,
    note: &Note,
    title: &str,
    content: &str,
) -> Result<Option<Note>> {
    let title = title.trim();
    if title == note.title && content == note.content {
        println!("No changes.");
        return Ok(None);
    }

    let updated = repo.update(&note.id, title, content)?;
    ensure_saved(repo)?;
    println!("Saved.");
    Ok(Some(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::editor::ScriptedEditor;

    fn setup_test_db() -> (Database, String) {
        let db = Database::open_memory().unwrap();
        let id = {
            let mut repo = NoteRepository::load(&db);
            let note = repo.create();
            repo.update(&note.id, "Draft", "<p>old</p>").unwrap();
            note.id
        };
        (db, id)
    }

    #[test]
    fn test_edit_title_only() {
        let (db, id) = setup_test_db();
        let mut editor = ScriptedEditor::new(vec![]);
        let updated = run_edit(&db, &id, Some("Final".into()), None, false, &mut editor)
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Final");
        assert_eq!(updated.content, "<p>old</p>");
        assert!(editor.seen.is_empty());
        assert_eq!(NoteRepository::load(&db).get(&id).unwrap().title, "Final");
    }

    #[test]
    fn test_edit_text_only() {
        let (db, id) = setup_test_db();
        let mut editor = ScriptedEditor::new(vec![]);
        let updated = run_edit(&db, "draft", None, Some("new body".into()), false, &mut editor)
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Draft");
        assert_eq!(updated.content, "<p>new body</p>");
        assert!(updated.last_edited >= updated.created);
        assert_eq!(updated.id, id);
    }

    #[test]
    fn test_edit_unchanged_is_noop() {
        let (db, id) = setup_test_db();
        let before = NoteRepository::load(&db).get(&id).unwrap().clone();
        let mut editor = ScriptedEditor::new(vec![]);

        let result = run_edit(&db, &id, Some("Draft".into()), None, false, &mut editor).unwrap();
        assert!(result.is_none());
        assert_eq!(NoteRepository::load(&db).get(&id), Some(&before));
    }

    #[test]
    fn test_edit_no_match() {
        let (db, _) = setup_test_db();
        let mut editor = ScriptedEditor::new(vec![]);
        assert!(run_edit(&db, "zzz", Some("x".into()), None, false, &mut editor)
            .unwrap()
            .is_none());
    }
}
