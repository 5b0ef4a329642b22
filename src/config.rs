//! Runtime configuration
//!
//! Resolved once at startup from environment variables. Unset variables take
//! their defaults; values that don't parse also take the default, with a
//! warning.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::db::Database;
use crate::session::DEFAULT_AUTOSAVE_DELAY;

// Environment variable names
pub const ENV_DB: &str = "NOTECMD_DB";
pub const ENV_DEBOUNCE_MS: &str = "NOTECMD_DEBOUNCE_MS";
pub const ENV_EXPORT_DIR: &str = "NOTECMD_EXPORT_DIR";
pub const ENV_DARK: &str = "NOTECMD_DARK";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite database holding notes and preferences
    pub db_path: PathBuf,
    /// Quiet period before an edit is saved
    pub autosave_delay: Duration,
    /// Where backups and downloads are written
    pub export_dir: PathBuf,
    /// Dark mode when the user hasn't chosen
    pub system_dark: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: Database::default_path().unwrap_or_else(|_| PathBuf::from("notes.db")),
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            export_dir: PathBuf::from("."),
            system_dark: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve using `lookup` in place of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_DB) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(raw) = get(ENV_DEBOUNCE_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.autosave_delay = Duration::from_millis(ms),
                Err(_) => warn!(var = ENV_DEBOUNCE_MS, value = %raw, "not a number of milliseconds, using default"),
            }
        }

        if let Some(dir) = get(ENV_EXPORT_DIR) {
            config.export_dir = PathBuf::from(dir);
        }

        if let Some(raw) = get(ENV_DARK) {
            match parse_flag(&raw) {
                Some(dark) => config.system_dark = dark,
                None => warn!(var = ENV_DARK, value = %raw, "not a boolean, using default"),
            }
        }

        config
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "dark" => Some(true),
        "0" | "false" | "no" | "off" | "light" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]);
        assert_eq!(config.autosave_delay, Duration::from_millis(1000));
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert!(!config.system_dark);
        assert!(config.db_path.ends_with("notes.db"));
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            (ENV_DB, "/tmp/n.db"),
            (ENV_DEBOUNCE_MS, "250"),
            (ENV_EXPORT_DIR, "/tmp/out"),
            (ENV_DARK, "yes"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/tmp/n.db"));
        assert_eq!(config.autosave_delay, Duration::from_millis(250));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert!(config.system_dark);
    }

    #[test]
    fn test_invalid_values_use_defaults() {
        let config = config_with(&[(ENV_DEBOUNCE_MS, "soon"), (ENV_DARK, "sometimes"), (ENV_DB, "  ")]);
        assert_eq!(config.autosave_delay, DEFAULT_AUTOSAVE_DELAY);
        assert!(!config.system_dark);
        assert_eq!(config.db_path, Config::default().db_path);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("dark"), Some(true));
        assert_eq!(parse_flag(""), None);
    }
}
