//! Persisted light/dark theme preference.
//!
//! The preference lives in a small TOML file in the state directory and
//! is carried around as an explicit [`ThemeContext`] object rather than
//! ambient global state. A context starts uninitialized; callers load it
//! once before reading, so nothing renders off an unknown preference.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use thiserror::Error;

/// User-selected theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the OS preference.
    #[default]
    System,
}

impl ThemePreference {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" => Ok(ThemePreference::System),
            other => Err(format!(
                "unknown theme '{other}' (expected light, dark, or system)"
            )),
        }
    }
}

/// The two concrete appearances a `System` preference resolves into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to access theme state: {0}")]
    Io(#[from] io::Error),

    #[error("theme state file is not valid TOML: {0}")]
    Parse(String),

    #[error("could not determine a state directory for theme persistence")]
    NoStateDir,
}

/// Explicit carrier of the theme preference.
#[derive(Debug)]
pub struct ThemeContext {
    path: PathBuf,
    preference: Option<ThemePreference>,
}

impl ThemeContext {
    /// Context backed by the default state file
    /// (`$XDG_STATE_HOME/memento/theme.toml` on Linux).
    pub fn new() -> Result<Self, ThemeError> {
        let dirs = ProjectDirs::from("", "", "memento").ok_or(ThemeError::NoStateDir)?;
        let state_dir = dirs
            .state_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dirs.data_dir().to_path_buf());
        Ok(Self::at(state_dir.join("theme.toml")))
    }

    /// Context backed by an explicit file path.
    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            preference: None,
        }
    }

    /// Whether [`load`](Self::load) has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.preference.is_some()
    }

    /// Read the persisted preference. A missing file means `System`; a
    /// malformed file is an error rather than a silent default.
    pub fn load(&mut self) -> Result<ThemePreference, ThemeError> {
        let preference = match fs::read_to_string(&self.path) {
            Ok(content) => parse_state(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => ThemePreference::System,
            Err(e) => return Err(ThemeError::Io(e)),
        };
        self.preference = Some(preference);
        Ok(preference)
    }

    /// The loaded preference; `None` until [`load`](Self::load) ran.
    #[must_use]
    pub fn preference(&self) -> Option<ThemePreference> {
        self.preference
    }

    /// Persist a new preference and keep it as the loaded value.
    pub fn set(&mut self, preference: ThemePreference) -> Result<(), ThemeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Rewrite through toml_edit so unrelated keys in the file survive.
        let content = fs::read_to_string(&self.path).unwrap_or_default();
        let mut doc: toml_edit::DocumentMut = content
            .parse()
            .map_err(|e: toml_edit::TomlError| ThemeError::Parse(e.to_string()))?;
        doc["theme"] = toml_edit::value(preference.as_str());
        fs::write(&self.path, doc.to_string())?;

        self.preference = Some(preference);
        Ok(())
    }

    /// Resolve the preference against an OS hint; `System` follows the
    /// hint, explicit choices ignore it.
    #[must_use]
    pub fn resolved(&self, os_hint: ResolvedTheme) -> ResolvedTheme {
        match self.preference.unwrap_or_default() {
            ThemePreference::Light => ResolvedTheme::Light,
            ThemePreference::Dark => ResolvedTheme::Dark,
            ThemePreference::System => os_hint,
        }
    }
}

fn parse_state(content: &str) -> Result<ThemePreference, ThemeError> {
    let doc: toml_edit::DocumentMut = content
        .parse()
        .map_err(|e: toml_edit::TomlError| ThemeError::Parse(e.to_string()))?;

    match doc.get("theme").and_then(|v| v.as_str()) {
        Some(value) => value.parse().map_err(ThemeError::Parse),
        None => Ok(ThemePreference::System),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_in(dir: &tempfile::TempDir) -> ThemeContext {
        ThemeContext::at(dir.path().join("theme.toml"))
    }

    #[test]
    fn missing_file_loads_as_system() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(&dir);

        assert!(!ctx.is_initialized());
        assert_eq!(ctx.load().unwrap(), ThemePreference::System);
        assert!(ctx.is_initialized());
    }

    #[test]
    fn set_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();

        let mut ctx = context_in(&dir);
        ctx.load().unwrap();
        ctx.set(ThemePreference::Dark).unwrap();

        let mut reread = context_in(&dir);
        assert_eq!(reread.load().unwrap(), ThemePreference::Dark);
    }

    #[test]
    fn set_preserves_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.toml");
        fs::write(&path, "# state file\nlast_seen = \"dashboard\"\n").unwrap();

        let mut ctx = ThemeContext::at(path.clone());
        ctx.set(ThemePreference::Light).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("last_seen"));
        assert!(content.contains("theme = \"light\""));
    }

    #[test]
    fn system_resolves_with_the_os_hint() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(&dir);
        ctx.load().unwrap();

        assert_eq!(ctx.resolved(ResolvedTheme::Dark), ResolvedTheme::Dark);
        ctx.set(ThemePreference::Light).unwrap();
        assert_eq!(ctx.resolved(ResolvedTheme::Dark), ResolvedTheme::Light);
    }

    #[test]
    fn malformed_state_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.toml");
        fs::write(&path, "theme = [broken\n").unwrap();

        let mut ctx = ThemeContext::at(path);
        assert!(matches!(ctx.load(), Err(ThemeError::Parse(_))));
    }

    #[test]
    fn preference_parses_and_displays() {
        assert_eq!("dark".parse::<ThemePreference>().unwrap(), ThemePreference::Dark);
        assert!("solarized".parse::<ThemePreference>().is_err());
        assert_eq!(ThemePreference::System.to_string(), "system");
    }
}
