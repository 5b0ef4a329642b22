use anyhow::Result;

use crate::cli::ThemeMode;
use crate::db::Database;
use crate::prefs::Preferences;

pub fn theme_name(dark: bool) -> &'static str {
    if dark {
        "dark"
    } else {
        "light"
    }
}

/// Execute the theme command. Returns whether dark mode is on afterwards.
pub fn run_theme(db: &Database, system_dark: bool, mode: Option<ThemeMode>) -> Result<bool> {
    let prefs = Preferences::new(db, system_dark);

    let dark = match mode {
        None => prefs.dark_mode(),
        Some(ThemeMode::Dark) => {
            prefs.set_dark_mode(true)?;
            true
        }
        Some(ThemeMode::Light) => {
            prefs.set_dark_mode(false)?;
            false
        }
        Some(ThemeMode::Toggle) => prefs.toggle_dark_mode()?,
    };

    println!("{}", theme_name(dark));
    Ok(dark)
}
