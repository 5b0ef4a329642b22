//! Backup and download formats.
//!
//! A backup is the full note collection as a pretty-printed JSON array,
//! the same shape the store keeps. Importing merges a backup into an
//! existing collection by id: notes already present win, malformed entries
//! are skipped and reported. Per-note downloads are one-way Markdown or
//! plain-text renderings.

use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::NoteError;
use crate::html::{self, TextFormat};
use crate::models::Note;

pub const BACKUP_PREFIX: &str = "notecmd-backup";
const MAX_SLUG_CHARS: usize = 80;

/// Outcome of merging an import document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub duplicates: usize,
    pub rejected: Vec<RejectedNote>,
}

/// An array element that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedNote {
    /// Zero-based position in the imported array
    pub index: usize,
    pub reason: String,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.added + self.duplicates + self.rejected.len()
    }
}

/// Serialize notes as a human-readable backup document.
pub fn export_notes(notes: &[Note]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(notes)
}

/// Parse an import document. The document as a whole must be a JSON
/// array; each element is parsed and validated on its own.
pub fn parse_document(document: &str) -> Result<Vec<Result<Note, NoteError>>, NoteError> {
    let value: serde_json::Value = serde_json::from_str(document)
        .map_err(|e| NoteError::InvalidImportFormat(format!("not valid JSON: {}", e)))?;

    let serde_json::Value::Array(items) = value else {
        return Err(NoteError::InvalidImportFormat(
            "expected a JSON array of notes".into(),
        ));
    };

    Ok(items.into_iter().map(parse_element).collect())
}

fn parse_element(item: serde_json::Value) -> Result<Note, NoteError> {
    let note: Note =
        serde_json::from_value(item).map_err(|e| NoteError::ValidationFailed(e.to_string()))?;
    note.validate()?;
    Ok(note)
}

/// Append candidates whose id is not yet taken. Ids seen earlier in the same
/// document count as taken.
pub fn merge_notes(existing: &mut Vec<Note>, candidates: Vec<Result<Note, NoteError>>) -> ImportReport {
    let mut ids: HashSet<String> = existing.iter().map(|n| n.id.clone()).collect();
    let mut report = ImportReport::default();

    for (index, candidate) in candidates.into_iter().enumerate() {
        match candidate {
            Ok(note) => {
                if ids.insert(note.id.clone()) {
                    existing.push(note);
                    report.added += 1;
                } else {
                    report.duplicates += 1;
                }
            }
            Err(e) => report.rejected.push(RejectedNote {
                index,
                reason: e.to_string(),
            }),
        }
    }

    report
}

/// `notecmd-backup-2024-05-01.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("{}-{}.json", BACKUP_PREFIX, date.format("%Y-%m-%d"))
}

fn slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"))
}

/// Lower-case, filesystem-safe form of a title.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let slug = slug_re().replace_all(&lowered, "-");
    let slug: String = slug.trim_matches('-').chars().take(MAX_SLUG_CHARS).collect();
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        "untitled-note".to_string()
    } else {
        slug.to_string()
    }
}

pub fn file_extension(format: TextFormat) -> &'static str {
    match format {
        TextFormat::Markdown => "md",
        TextFormat::PlainText => "txt",
    }
}

/// `shopping-list.md`
pub fn note_file_name(note: &Note, format: TextFormat) -> String {
    format!("{}.{}", slugify(&note.title), file_extension(format))
}

/// Render a single note for download.
pub fn render_note(note: &Note, format: TextFormat) -> String {
    let body = html::render(&note.content, format);
    let heading = match format {
        TextFormat::Markdown => format!("# {}", note.display_title()),
        TextFormat::PlainText => note.display_title().to_string(),
    };

    if body.is_empty() {
        format!("{}\n", heading)
    } else {
        format!("{}\n\n{}\n", heading, body)
    }
}
