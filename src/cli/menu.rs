//! Interactive mode for notecmd
//!
//! Uses inquire for clean, reliable terminal interaction. Edits go through a
//! `Session`, so they are saved after the autosave delay or as soon as the
//! user moves on to another note or action.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, Utc};
use crossterm::event;
use inquire::Select;
use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};
use tracing::warn;

use crate::cli::display::{format_note_row, preview};
use crate::cli::editor::NoteEditor;
use crate::cli::export::write_file;
use crate::cli::import::print_report;
use crate::cli::theme::theme_name;
use crate::cli::ui::{
    clear_screen, confirm, heading, render_config, select, set_dark_theme, term_size, text_input, truncate,
    wait_for_continue, warning,
};
use crate::config::Config;
use crate::db::Database;
use crate::html::{self, TextFormat};
use crate::models::SortOrder;
use crate::prefs::Preferences;
use crate::repo::NoteRepository;
use crate::session::Session;
use crate::store::LocalStore;
use crate::transfer::{backup_file_name, note_file_name, render_note};

/// Notes listed above the menu when zen mode is off
const LIST_ROWS: usize = 8;

/// Menu options with type-safe variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    Open,
    New,
    EditTitle,
    EditContent,
    Search,
    Sort,
    Delete,
    Download,
    Export,
    Import,
    Zen,
    Theme,
    Quit,
}

impl MenuOption {
    const ALL: &'static [MenuOption] = &[
        MenuOption::Open,
        MenuOption::New,
        MenuOption::EditTitle,
        MenuOption::EditContent,
        MenuOption::Search,
        MenuOption::Sort,
        MenuOption::Delete,
        MenuOption::Download,
        MenuOption::Export,
        MenuOption::Import,
        MenuOption::Zen,
        MenuOption::Theme,
        MenuOption::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuOption::Open => "Open",
            MenuOption::New => "New",
            MenuOption::EditTitle => "Edit Title",
            MenuOption::EditContent => "Edit Content",
            MenuOption::Search => "Search",
            MenuOption::Sort => "Sort",
            MenuOption::Delete => "Delete",
            MenuOption::Download => "Download",
            MenuOption::Export => "Export",
            MenuOption::Import => "Import",
            MenuOption::Zen => "Zen Mode",
            MenuOption::Theme => "Theme",
            MenuOption::Quit => "Quit",
        }
    }

    fn from_label(s: &str) -> Option<MenuOption> {
        MenuOption::ALL.iter().find(|opt| opt.label() == s).copied()
    }

    /// Options that act on the active note
    fn needs_active_note(self) -> bool {
        matches!(
            self,
            MenuOption::EditTitle | MenuOption::EditContent | MenuOption::Delete | MenuOption::Download
        )
    }
}

/// Labels offered for the current state
fn available_labels(has_active: bool) -> Vec<&'static str> {
    MenuOption::ALL
        .iter()
        .filter(|opt| has_active || !opt.needs_active_note())
        .map(|opt| opt.label())
        .collect()
}

/// Run the interactive menu
pub fn run_menu(db: &Database, config: &Config, editor: &mut dyn NoteEditor) -> Result<()> {
    // TTY check: interactive menu requires a terminal
    if !io::stdin().is_terminal() {
        return Err(anyhow!(
            "Interactive mode requires a terminal. Use subcommands for non-interactive use:\n  \
            notecmd new --title <title> --text <text>\n  \
            notecmd list\n  \
            notecmd show <note>\n  \
            Run 'notecmd --help' for all options."
        ));
    }

    let prefs = Preferences::new(db, config.system_dark);
    if !prefs.landing_dismissed() && !show_welcome(&prefs)? {
        return Ok(());
    }

    let mut session = Session::new(NoteRepository::load(db), config.autosave_delay);
    let result = menu_loop(&mut session, &prefs, config, editor);

    // Whatever happened, don't lose the last edit
    if let Err(e) = session.flush() {
        warning(&format!("last edit was not saved: {}", e));
    }
    result
}

fn menu_loop(
    session: &mut Session<&Database>,
    prefs: &Preferences<&Database>,
    config: &Config,
    editor: &mut dyn NoteEditor,
) -> Result<()> {
    loop {
        if let Err(e) = session.tick(Instant::now()) {
            warning(&e.to_string());
        }

        set_dark_theme(prefs.dark_mode());

        // Clear screen - if this fails, continue anyway (degraded but functional)
        let _ = clear_screen();
        print_header(session, prefs);

        // A pending edit is saved while the user is idle, before the prompt blocks
        match settle_autosave(session, event::poll) {
            Ok(true) => {
                let _ = clear_screen();
                print_header(session, prefs);
            }
            Ok(false) => {}
            Err(e) => warning(&e.to_string()),
        }

        let labels = available_labels(session.active_id().is_some());
        let selection = Select::new("notecmd", labels.clone())
            .with_render_config(render_config())
            .with_page_size(labels.len())
            .with_vim_mode(true)
            .prompt_skippable();

        // Handle prompt errors (Ctrl+C, terminal issues) - exit gracefully
        let Ok(Some(choice_label)) = selection else {
            return Ok(());
        };

        let Some(choice) = MenuOption::from_label(choice_label) else {
            continue;
        };

        if choice == MenuOption::Quit {
            return Ok(());
        }

        // Execute command - all errors caught and displayed
        if let Err(e) = execute_command(session, prefs, config, editor, choice) {
            eprintln!("\nError: {}", e);
            wait_for_continue();
        }
    }
}

/// Wait out the autosave delay of a pending edit, saving it when the delay
/// passes with no input. `wait` blocks up to the given time and reports
/// whether input arrived. Returns true if an edit was saved.
fn settle_autosave<S, W>(session: &mut Session<S>, mut wait: W) -> Result<bool>
where
    S: LocalStore,
    W: FnMut(Duration) -> io::Result<bool>,
{
    while let Some(remaining) = session.autosave_remaining(Instant::now()) {
        if wait(remaining)? {
            return Ok(false);
        }
        if session.tick(Instant::now())?.is_some() {
            return Ok(true);
        }
    }
    Ok(false)
}

fn execute_command(
    session: &mut Session<&Database>,
    prefs: &Preferences<&Database>,
    config: &Config,
    editor: &mut dyn NoteEditor,
    choice: MenuOption,
) -> Result<()> {
    match choice {
        MenuOption::Open => {
            let notes = session.visible_notes();
            if notes.is_empty() {
                println!("No notes.");
                wait_for_continue();
                return Ok(());
            }
            let (width, _) = term_size();
            let now = Local::now();
            let rows: Vec<String> = notes.iter().map(|n| format_note_row(n, now, width)).collect();
            let ids: Vec<String> = notes.iter().map(|n| n.id.clone()).collect();
            if let Some(idx) = select("open: ", &rows)? {
                session.select_note(&ids[idx])?;
            }
        }
        MenuOption::New => {
            session.create_note()?;
            if let Some(title) = text_input("title: ", None)? {
                if !title.trim().is_empty() {
                    session.edit_title(title.trim(), Instant::now())?;
                }
            }
        }
        MenuOption::EditTitle => {
            if let Some(note) = session.active_note() {
                if let Some(title) = text_input("title: ", Some(&note.title))? {
                    session.edit_title(title.trim(), Instant::now())?;
                }
            }
        }
        MenuOption::EditContent => {
            if let Some(note) = session.active_note() {
                if let Some(content) = editor.edit(note.display_title(), &note.content)? {
                    session.edit_content(&content, Instant::now())?;
                }
            }
        }
        MenuOption::Search => {
            let query = text_input("search: ", Some(session.query()))?.unwrap_or_default();
            session.set_query(&query);
        }
        MenuOption::Sort => {
            let labels: Vec<&str> = SortOrder::ALL.iter().map(|o| o.label()).collect();
            if let Some(idx) = select("sort: ", &labels)? {
                session.set_sort(SortOrder::ALL[idx]);
            }
        }
        MenuOption::Delete => {
            if let Some(note) = session.active_note() {
                if confirm(&format!("Delete {}?", note.display_title()))? {
                    session.delete_note(&note.id)?;
                    println!("Deleted.");
                }
            }
        }
        MenuOption::Download => {
            session.flush()?;
            if let Some(note) = session.active_note() {
                let formats = ["Markdown (.md)", "Plain text (.txt)"];
                let format = match select("format: ", &formats)? {
                    Some(0) => TextFormat::Markdown,
                    Some(_) => TextFormat::PlainText,
                    None => return Ok(()),
                };
                let path = config.export_dir.join(note_file_name(&note, format));
                write_file(&path, &render_note(&note, format))?;
                println!("Saved {}", path.display());
                wait_for_continue();
            }
        }
        MenuOption::Export => {
            let document = session.export()?;
            let path = config.export_dir.join(backup_file_name(Local::now().date_naive()));
            write_file(&path, &document)?;
            println!("Exported {} to {}", session.repo().len(), path.display());
            wait_for_continue();
        }
        MenuOption::Import => {
            let Some(input) = text_input("file: ", None)? else {
                return Ok(());
            };
            let input = input.trim();
            if input.is_empty() {
                return Ok(());
            }
            let document = std::fs::read_to_string(input)
                .map_err(|e| anyhow!("Could not read {}: {}", input, e))?;
            let report = session.import(&document)?;
            print_report(&report);
            wait_for_continue();
        }
        MenuOption::Zen => {
            session.toggle_zen_mode();
        }
        MenuOption::Theme => {
            prefs.toggle_dark_mode()?;
        }
        MenuOption::Quit => {}
    }

    if let Some(e) = session.storage_warning() {
        warning(&format!("{} (changes kept in memory)", e));
    }
    Ok(())
}

fn print_header(session: &Session<&Database>, prefs: &Preferences<&Database>) {
    let (width, _) = term_size();

    if let Some(e) = session.storage_warning() {
        warning(&format!("not saved: {}", e));
    }
    if install_tip_due(prefs, Utc::now()) {
        println!("Tip: put notecmd on your PATH to start it from anywhere.\n");
    }

    match session.active_note() {
        Some(note) => {
            let marker = if session.has_unsaved_edit() { " *" } else { "" };
            println!("{}{}", heading(&truncate(note.display_title(), width.saturating_sub(2))), marker);
            if session.zen_mode() {
                println!();
                println!("{}", html::to_plain_text(&note.content));
            } else {
                let text = preview(&note);
                if !text.is_empty() {
                    println!("  {}", text);
                }
            }
        }
        None => println!("No note selected."),
    }

    if !session.zen_mode() {
        println!();
        let notes = session.visible_notes();
        let now = Local::now();
        for note in notes.iter().take(LIST_ROWS) {
            let marker = if session.active_id() == Some(note.id.as_str()) { "> " } else { "  " };
            println!("{}{}", marker, format_note_row(note, now, width.saturating_sub(2)));
        }
        if notes.len() > LIST_ROWS {
            println!("  … {} more", notes.len() - LIST_ROWS);
        }

        let mut status = vec![format!("{} notes", session.repo().len()), session.sort().label().to_string()];
        if !session.query().is_empty() {
            status.push(format!("search: {}", session.query()));
        }
        status.push(theme_name(prefs.dark_mode()).to_string());
        println!("\n{}", status.join("  ·  "));
    }
    println!();
}

/// Whether to show the install tip now. Showing it snoozes it; a failed
/// snooze is logged and the tip is shown anyway.
fn install_tip_due<S: LocalStore>(prefs: &Preferences<S>, now: DateTime<Utc>) -> bool {
    if !prefs.install_prompt_due(now) {
        return false;
    }
    if let Err(e) = prefs.dismiss_install_prompt(now) {
        warn!(error = %e, "could not snooze the install tip");
    }
    true
}

/// First-run screen. Returns false if the user backed out.
fn show_welcome(prefs: &Preferences<&Database>) -> Result<bool> {
    let _ = clear_screen();
    println!("notecmd\n");
    println!("Notes stay on this computer. Nothing is sent anywhere.");
    println!("Edits save automatically after a short pause.");
    println!("Use Export to keep a backup file.\n");

    let start = text_input("[enter] to start", None)?;
    if start.is_none() {
        return Ok(false);
    }
    prefs.dismiss_landing()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NOTES_KEY};
    use crate::models::Note;

    #[test]
    fn test_menu_option_roundtrip() {
        for opt in MenuOption::ALL {
            let label = opt.label();
            let recovered = MenuOption::from_label(label);
            assert_eq!(recovered, Some(*opt), "Failed roundtrip for {:?}", opt);
        }
    }

    #[test]
    fn test_menu_option_from_invalid_label() {
        assert_eq!(MenuOption::from_label("Invalid"), None);
        assert_eq!(MenuOption::from_label(""), None);
    }

    #[test]
    fn test_labels_without_active_note() {
        let labels = available_labels(false);
        assert!(labels.contains(&"New"));
        assert!(labels.contains(&"Quit"));
        assert!(!labels.contains(&"Delete"));
        assert!(!labels.contains(&"Edit Content"));
        assert_eq!(available_labels(true).len(), MenuOption::ALL.len());
    }

    fn stored_titles(store: &MemoryStore) -> Vec<String> {
        let notes: Vec<Note> = serde_json::from_str(&store.get(NOTES_KEY).unwrap()).unwrap();
        notes.into_iter().map(|n| n.title).collect()
    }

    #[test]
    fn test_install_tip_snoozes_after_showing() {
        let store = MemoryStore::new();
        let prefs = Preferences::new(&store, false);
        let now = Utc::now();
        assert!(install_tip_due(&prefs, now));
        assert!(!install_tip_due(&prefs, now + chrono::Duration::hours(1)));
        assert!(install_tip_due(&prefs, now + chrono::Duration::hours(25)));
    }

    #[test]
    fn test_install_tip_shown_when_snooze_cannot_be_saved() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let prefs = Preferences::new(&store, false);
        let now = Utc::now();
        assert!(install_tip_due(&prefs, now));
        assert!(install_tip_due(&prefs, now));
    }

    #[test]
    fn test_idle_menu_saves_pending_edit() {
        let store = MemoryStore::new();
        let mut session = Session::new(NoteRepository::load(&store), Duration::from_millis(20));
        session.create_note().unwrap();
        session.edit_title("Idle edit", Instant::now()).unwrap();

        let mut waits = 0;
        let saved = settle_autosave(&mut session, |timeout| {
            waits += 1;
            std::thread::sleep(timeout);
            Ok(false)
        })
        .unwrap();

        assert!(saved);
        assert!(waits >= 1);
        assert!(!session.has_unsaved_edit());
        assert_eq!(stored_titles(&store), vec!["Idle edit"]);
    }

    #[test]
    fn test_input_during_wait_leaves_edit_pending() {
        let store = MemoryStore::new();
        let mut session = Session::new(NoteRepository::load(&store), Duration::from_secs(60));
        session.create_note().unwrap();
        session.edit_title("Still typing", Instant::now()).unwrap();

        let saved = settle_autosave(&mut session, |_| Ok(true)).unwrap();
        assert!(!saved);
        assert!(session.has_unsaved_edit());
        assert_eq!(stored_titles(&store), vec!["Untitled Note"]);
    }

    #[test]
    fn test_nothing_pending_does_not_wait() {
        let store = MemoryStore::new();
        let mut session = Session::new(NoteRepository::load(&store), Duration::from_secs(60));
        let saved = settle_autosave(&mut session, |_| -> io::Result<bool> {
            panic!("no edit is pending")
        })
        .unwrap();
        assert!(!saved);
    }
}
