//! Shared UI primitives for notecmd
//!
//! Conventions:
//! - Prompts: lowercase with colon and space: `search: `
//! - Feedback: single word when possible: `Saved.`
//! - Errors and warnings go to stderr

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Color as TermColor, Stylize},
    terminal::{Clear, ClearType},
    ExecutableCommand,
};
use inquire::{
    ui::{Color, RenderConfig, StyleSheet, Styled},
    Confirm, Select, Text,
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::models::Note;
use crate::repo::NoteRepository;
use crate::store::LocalStore;

/// Characters of an id shown in lists and accepted as a prefix.
pub const SHORT_ID_LEN: usize = 8;

// ============================================================================
// Layout Primitives
// ============================================================================

/// Truncate a string to max_chars, adding ellipsis if needed.
/// Result will be at most max_chars characters (including ellipsis if truncated).
pub fn truncate(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars - 1).collect();
    format!("{}…", kept.trim_end())
}

/// Leading characters of a note id
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

// ============================================================================
// Message Functions
// ============================================================================

/// Print a warning message to stderr
#[inline]
pub fn warning(msg: &str) {
    eprintln!("Warning: {}", msg);
}

// ============================================================================
// Terminal
// ============================================================================

/// Clear the terminal screen and move cursor to top-left
pub fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(Clear(ClearType::All))?;
    stdout.execute(cursor::MoveTo(0, 0))?;
    stdout.flush()?;
    Ok(())
}

/// Get terminal dimensions, defaulting to 80x24 if unavailable
pub fn term_size() -> (usize, usize) {
    crossterm::terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or((80, 24))
}

/// Number of rows a selection list may use
pub fn visible_lines() -> usize {
    let (_, height) = term_size();
    height.saturating_sub(4).max(5)
}

// ============================================================================
// Theme
// ============================================================================

static DARK_THEME: AtomicBool = AtomicBool::new(false);

/// Colours for one theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub accent: Color,
    pub answer: Color,
    pub help: Color,
    pub title: TermColor,
}

/// Dark terminals get the light colour variants, light terminals the dark ones
pub fn palette(dark: bool) -> Palette {
    if dark {
        Palette {
            accent: Color::LightCyan,
            answer: Color::LightGreen,
            help: Color::Grey,
            title: TermColor::Cyan,
        }
    } else {
        Palette {
            accent: Color::DarkBlue,
            answer: Color::DarkGreen,
            help: Color::DarkGrey,
            title: TermColor::DarkBlue,
        }
    }
}

/// Switch the theme used by every prompt and heading
pub fn set_dark_theme(dark: bool) {
    DARK_THEME.store(dark, Ordering::Relaxed);
}

pub fn dark_theme() -> bool {
    DARK_THEME.load(Ordering::Relaxed)
}

/// Get a minimal render config for inquire prompts in the given theme
pub fn minimal_render_config(dark: bool) -> RenderConfig<'static> {
    let colors = palette(dark);
    RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new(""))
        .with_answered_prompt_prefix(Styled::new(""))
        .with_highlighted_option_prefix(Styled::new(">").with_fg(colors.accent))
        .with_selected_option(Some(StyleSheet::new().with_fg(colors.accent)))
        .with_answer(StyleSheet::new().with_fg(colors.answer))
        .with_help_message(StyleSheet::new().with_fg(colors.help))
}

/// Render config for the current theme
pub fn render_config() -> RenderConfig<'static> {
    minimal_render_config(dark_theme())
}

/// A heading line in the current theme's title colour
pub fn heading(text: &str) -> String {
    text.with(palette(dark_theme()).title).bold().to_string()
}

// ============================================================================
// Prompts
// ============================================================================

/// Display a selection menu and return the chosen index
pub fn select<T: ToString>(prompt: &str, options: &[T]) -> Result<Option<usize>> {
    if options.is_empty() {
        return Ok(None);
    }

    let items: Vec<String> = options.iter().map(|o| o.to_string()).collect();

    let result = Select::new(prompt, items.clone())
        .with_render_config(render_config())
        .with_page_size(visible_lines())
        .with_vim_mode(true)
        .prompt_skippable()?;

    Ok(result.and_then(|selected| items.iter().position(|i| *i == selected)))
}

/// Prompt for text input with optional default value
pub fn text_input(prompt: &str, default: Option<&str>) -> Result<Option<String>> {
    let mut builder = Text::new(prompt).with_render_config(render_config());

    if let Some(d) = default {
        if !d.is_empty() {
            builder = builder.with_default(d);
        }
    }

    Ok(builder.prompt_skippable()?)
}

/// Prompt for yes/no confirmation (default: no)
pub fn confirm(prompt: &str) -> Result<bool> {
    let result = Confirm::new(prompt)
        .with_render_config(render_config())
        .with_default(false)
        .prompt_skippable()?;
    Ok(result.unwrap_or(false))
}

/// Wait for user to press enter to continue
pub fn wait_for_continue() {
    println!();
    let _ = Text::new("[enter]")
        .with_render_config(render_config())
        .prompt_skippable();
}

// ============================================================================
// Note Lookup
// ============================================================================

/// Notes an identifier could refer to, best match kind first:
/// exact id, id prefix, exact title (any case), then title or body text.
pub fn match_notes<'a>(notes: &'a [Note], identifier: &str) -> Vec<&'a Note> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Vec::new();
    }

    if let Some(note) = notes.iter().find(|n| n.id == identifier) {
        return vec![note];
    }

    let by_prefix: Vec<&Note> = notes.iter().filter(|n| n.id.starts_with(identifier)).collect();
    if !by_prefix.is_empty() {
        return by_prefix;
    }

    let lowered = identifier.to_lowercase();
    let by_title: Vec<&Note> = notes
        .iter()
        .filter(|n| n.title.to_lowercase() == lowered)
        .collect();
    if !by_title.is_empty() {
        return by_title;
    }

    notes
        .iter()
        .filter(|n| {
            n.title.to_lowercase().contains(&lowered) || crate::html::contains_text(&n.content, identifier)
        })
        .collect()
}

/// Format a note for selection display: "Title (abcd1234)"
pub fn format_note_for_select(note: &Note) -> String {
    format!("{} ({})", truncate(note.display_title(), 50), short_id(&note.id))
}

/// Find a note by id, id prefix or title.
/// Prompts for a choice when several notes match.
/// Returns None if nothing matches or the selection was cancelled.
pub fn find_note<S: LocalStore>(repo: &NoteRepository<S>, identifier: &str) -> Result<Option<Note>> {
    let matches = match_notes(repo.notes(), identifier);

    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0].clone())),
        _ => {
            let options: Vec<String> = matches.iter().map(|n| format_note_for_select(n)).collect();
            Ok(select("", &options)?.map(|idx| matches[idx].clone()))
        }
    }
}
