use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::html::TextFormat;
use crate::models::SortOrder;
use crate::repo::NoteRepository;
use crate::store::LocalStore;

pub mod delete;
pub mod display;
pub mod download;
pub mod edit;
pub mod editor;
pub mod export;
pub mod import;
pub mod list;
pub mod menu;
pub mod new;
pub mod show;
pub mod theme;
pub mod ui;

pub use delete::run_delete;
pub use download::run_download;
pub use edit::run_edit;
pub use editor::{ExternalEditor, NoteEditor};
pub use export::run_export;
pub use import::run_import;
pub use list::run_list;
pub use menu::run_menu;
pub use new::run_new;
pub use show::run_show;
pub use theme::run_theme;

#[derive(Parser)]
#[command(name = "notecmd")]
#[command(about = "Private, local-only notes for the command line")]
#[command(version)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a note
    New(NewArgs),
    /// List notes, optionally filtered
    List(ListArgs),
    /// Print a note
    Show(ShowArgs),
    /// Change a note's title or body
    Edit(EditArgs),
    /// Delete a note
    Delete(DeleteArgs),
    /// Write a JSON backup of every note
    Export(ExportArgs),
    /// Merge notes from a JSON backup
    Import(ImportArgs),
    /// Save one note as Markdown or plain text
    Download(DownloadArgs),
    /// Show or change the color theme
    Theme(ThemeArgs),
}

#[derive(Args)]
pub struct NewArgs {
    #[arg(short, long)]
    pub title: Option<String>,
    /// Body as plain text; blank lines separate paragraphs
    #[arg(short = 'x', long)]
    pub text: Option<String>,
    /// Treat --text as HTML
    #[arg(long)]
    pub html: bool,
    /// Open $EDITOR on the body
    #[arg(short, long)]
    pub edit: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only notes whose title or text contains this
    #[arg(short, long)]
    pub search: Option<String>,
    /// created, edited, title or title-desc
    #[arg(short = 'o', long, default_value = "edited", value_parser = parse_sort)]
    pub sort: SortOrder,
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Note id, id prefix or title
    pub identifier: String,
    #[arg(short, long, value_enum, default_value_t = ShowFormat::Md)]
    pub format: ShowFormat,
}

#[derive(Args)]
pub struct EditArgs {
    /// Note id, id prefix or title
    pub identifier: String,
    #[arg(short, long)]
    pub title: Option<String>,
    /// Replace the body with this plain text
    #[arg(short = 'x', long)]
    pub text: Option<String>,
    /// Treat --text as HTML
    #[arg(long)]
    pub html: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Note id, id prefix or title
    pub identifier: String,
    /// Skip confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// File to write (default: notecmd-backup-<date>.json in the export directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// JSON backup file
    pub path: PathBuf,
}

#[derive(Args)]
pub struct DownloadArgs {
    /// Note id, id prefix or title
    pub identifier: String,
    #[arg(short, long, value_enum, default_value_t = DownloadFormat::Md)]
    pub format: DownloadFormat,
    /// File to write (default: <title>.<ext> in the export directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// Leave empty to print the current theme
    #[arg(value_enum)]
    pub mode: Option<ThemeMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    /// Markdown
    Md,
    /// Plain text
    Txt,
    /// Stored HTML
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DownloadFormat {
    Md,
    Txt,
}

impl From<DownloadFormat> for TextFormat {
    fn from(format: DownloadFormat) -> Self {
        match format {
            DownloadFormat::Md => TextFormat::Markdown,
            DownloadFormat::Txt => TextFormat::PlainText,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeMode {
    Dark,
    Light,
    Toggle,
}

fn parse_sort(s: &str) -> Result<SortOrder, String> {
    SortOrder::parse(s).ok_or_else(|| {
        let names: Vec<&str> = SortOrder::ALL.iter().map(|o| o.as_str()).collect();
        format!("unknown sort '{}', expected one of: {}", s, names.join(", "))
    })
}

/// Turn command-line text into note HTML.
pub(crate) fn body_from_arg(text: &str, is_html: bool) -> String {
    if is_html {
        text.to_string()
    } else {
        crate::html::from_plain_text(text)
    }
}

/// Fail if the last change only reached memory.
pub(crate) fn ensure_saved<S: LocalStore>(repo: &NoteRepository<S>) -> Result<()> {
    match repo.persist_error() {
        Some(e) => Err(anyhow!("Changes were not saved: {}", e)),
        None => Ok(()),
    }
}
