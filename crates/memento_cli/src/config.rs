//! Configuration file support for memento.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `MEMENTO_`, e.g., `MEMENTO_GITHUB_TOKEN`)
//! 3. Config file (~/.config/memento/config.toml or ./memento.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "gho_..."  # or use MEMENTO_GITHUB_TOKEN env var
//!
//! [server]
//! bind = "127.0.0.1"
//! port = 8787
//!
//! [ui]
//! sort = "updated"  # updated, stars, or name
//! ```

use std::path::PathBuf;
use std::{fs, io};

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

use memento::dashboard::SortKey;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration.
    pub github: GitHubConfig,
    /// Dashboard API server configuration.
    pub server: ServerConfig,
    /// Dashboard presentation defaults.
    pub ui: UiConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub access token.
    /// Can also be set via MEMENTO_GITHUB_TOKEN environment variable.
    pub token: Option<String>,
}

/// Dashboard API server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address for `memento serve`.
    pub bind: String,
    /// Port for `memento serve`.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

/// Dashboard presentation defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Default sort order for `memento repos`.
    pub sort: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sort: "updated".to_string(),
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/memento/config.toml)
    /// 3. Local config file (./memento.toml)
    /// 4. Environment variables with MEMENTO_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        // Add XDG config file if it exists
        if let Some(proj_dirs) = ProjectDirs::from("", "", "memento") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        // Add local config file (higher priority than XDG)
        let local_config = PathBuf::from("memento.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./memento.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // Add MEMENTO_ prefixed environment variables
        // e.g., MEMENTO_GITHUB_TOKEN -> github.token
        builder = builder.add_source(
            Environment::with_prefix("MEMENTO")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the GitHub token.
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone()
    }

    /// Default sort order for the repository listing. A value that does
    /// not parse falls back to most-recently-updated.
    pub fn default_sort(&self) -> SortKey {
        self.ui.sort.parse().unwrap_or_else(|e| {
            tracing::warn!("ignoring configured ui.sort: {e}");
            SortKey::Updated
        })
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "memento").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Save a GitHub token to the config file.
    ///
    /// Creates the config file and parent directories if they don't exist.
    /// If a config file already exists, it updates only the `[github]`
    /// section, preserving formatting, comments, and other settings.
    pub fn save_github_token(token: &str) -> io::Result<PathBuf> {
        use toml_edit::{DocumentMut, value};

        let config_path = Self::default_config_path().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = if config_path.exists() {
            fs::read_to_string(&config_path)?
        } else {
            String::new()
        };

        // Parse as TOML document (preserves formatting and comments)
        let mut doc: DocumentMut = content.parse().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid TOML: {}", e))
        })?;

        if !doc.contains_key("github") {
            doc["github"] = toml_edit::table();
        }
        doc["github"]["token"] = value(token);

        fs::write(&config_path, doc.to_string())?;
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_section() {
        let config = Config::default();
        assert!(config.github.token.is_none());
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.default_sort(), SortKey::Updated);
    }

    #[test]
    fn toml_sections_deserialize() {
        let toml_content = r#"
            [github]
            token = "gho_test123"

            [server]
            bind = "0.0.0.0"
            port = 9000

            [ui]
            sort = "stars"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(config.github_token(), Some("gho_test123".to_string()));
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.default_sort(), SortKey::Stars);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let toml_content = r#"
            [server]
            port = 3000
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert!(config.github.token.is_none());
    }

    #[test]
    fn bogus_sort_value_falls_back_to_updated() {
        let config = Config {
            ui: UiConfig {
                sort: "popularity".to_string(),
            },
            ..Default::default()
        };

        assert_eq!(config.default_sort(), SortKey::Updated);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let toml_content = r#"
            [ui]
            sort = "name"
            unknown_field = "should be ignored"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();
        assert_eq!(config.default_sort(), SortKey::Name);
    }
}
