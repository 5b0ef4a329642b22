use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::cli::display::format_import_summary;
use crate::cli::ensure_saved;
use crate::cli::ui::warning;
use crate::db::Database;
use crate::repo::NoteRepository;
use crate::transfer::ImportReport;

/// Execute the import command
pub fn run_import(db: &Database, path: &Path) -> Result<ImportReport> {
    let document =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;

    let mut repo = NoteRepository::load(db);
    let report = repo
        .import(&document)
        .with_context(|| format!("Could not import {}", path.display()))?;
    ensure_saved(&repo)?;

    print_report(&report);
    Ok(report)
}

pub(crate) fn print_report(report: &ImportReport) {
    for rejected in &report.rejected {
        warning(&format!("entry {} skipped: {}", rejected.index + 1, rejected.reason));
    }
    println!(
        "{}",
        format_import_summary(report.added, report.duplicates, report.rejected.len())
    );
}
