use chrono::{DateTime, Datelike, Local, Timelike};

use crate::cli::ui::{short_id, truncate};
use crate::html::{self, TextFormat};
use crate::models::Note;

/// Characters of body text shown in list rows
const PREVIEW_CHARS: usize = 60;

/// Print a note: title, edit time, then the body rendered as text.
pub fn print_note(note: &Note, format: TextFormat) {
    println!("{}", note.display_title());
    println!("  {}\n", format_edited_date(&note.last_edited.with_timezone(&Local), Local::now()));

    let body = html::render(&note.content, format);
    if body.is_empty() {
        println!("  (empty)");
    } else {
        println!("{}", body);
    }
}

/// One line per note: short id, title, when it was edited.
pub fn format_note_row(note: &Note, now: DateTime<Local>, width: usize) -> String {
    let when = format_edited_date(&note.last_edited.with_timezone(&Local), now);
    let id = short_id(&note.id);
    let title_width = width.saturating_sub(id.chars().count() + when.chars().count() + 4).max(10);
    let title = truncate(note.display_title(), title_width);
    format!("{:<8}  {:<tw$}  {}", id, title, when, tw = title_width)
}

/// First line of the body as plain text
pub fn preview(note: &Note) -> String {
    let text = html::to_plain_text(&note.content);
    let first_line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    truncate(first_line, PREVIEW_CHARS)
}

/// Format an edit time relative to `now`
pub fn format_edited_date(date: &DateTime<Local>, now: DateTime<Local>) -> String {
    let today = now.date_naive();
    let day = date.date_naive();
    let time = format!(
        "{}:{:02}{}",
        date.hour12().1,
        date.minute(),
        if date.hour12().0 { "pm" } else { "am" }
    );

    if day == today {
        format!("Today at {}", time)
    } else if Some(day) == today.pred_opt() {
        format!("Yesterday at {}", time)
    } else if date.year() == now.year() {
        format!("{} {} at {}", month_abbrev(date.month()), date.day(), time)
    } else {
        format!("{} {}, {}", month_abbrev(date.month()), date.day(), date.year())
    }
}

/// Get month abbreviation
fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
}

/// Summary line for a finished import
pub fn format_import_summary(added: usize, duplicates: usize, rejected: usize) -> String {
    let mut parts = vec![format!("Imported {}.", added)];
    if duplicates > 0 {
        parts.push(format!("{} already present.", duplicates));
    }
    if rejected > 0 {
        parts.push(format!("{} skipped.", rejected));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn note(title: &str, content: &str) -> Note {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        Note {
            id: "0b5d2f7e-1c1a-4f0e-9d4b-3a3c9a8d1e11".into(),
            title: title.into(),
            content: content.into(),
            created: at,
            last_edited: at,
        }
    }

    #[test]
    fn test_format_today_and_yesterday() {
        let now = local(2024, 6, 10, 18, 0);
        assert_eq!(format_edited_date(&local(2024, 6, 10, 9, 5), now), "Today at 9:05am");
        assert_eq!(format_edited_date(&local(2024, 6, 9, 13, 30), now), "Yesterday at 1:30pm");
    }

    #[test]
    fn test_format_older_dates() {
        let now = local(2024, 6, 10, 18, 0);
        assert_eq!(format_edited_date(&local(2024, 2, 3, 0, 15), now), "Feb 3 at 12:15am");
        assert_eq!(format_edited_date(&local(2022, 12, 25, 8, 0), now), "Dec 25, 2022");
    }

    #[test]
    fn test_note_row_contains_parts() {
        let row = format_note_row(&note("Shopping", ""), Local::now(), 80);
        assert!(row.starts_with("0b5d2f7e  Shopping"));
    }

    #[test]
    fn test_note_row_truncates_long_title() {
        let long = "x".repeat(200);
        let row = format_note_row(&note(&long, ""), Local::now(), 60);
        assert!(row.contains('…'));
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview(&note("t", "<h1></h1><p>  first  </p><p>second</p>")), "first");
        assert_eq!(preview(&note("t", "")), "");
    }

    #[test]
    fn test_import_summary() {
        assert_eq!(format_import_summary(3, 0, 0), "Imported 3.");
        assert_eq!(format_import_summary(0, 2, 1), "Imported 0. 2 already present. 1 skipped.");
    }

    #[test]
    fn test_print_note_does_not_panic() {
        print_note(&note("t", "<p>body</p>"), TextFormat::Markdown);
        print_note(&note("", ""), TextFormat::PlainText);
    }
}
