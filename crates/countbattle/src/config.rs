//! Application configuration.

use std::path::{Path, PathBuf};

use countbattle_core::{BoardCatalog, ScoringMode};
use countbattle_session::BoardLibrary;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Default configuration file, read when present.
pub const DEFAULT_CONFIG_FILE: &str = "countbattle.toml";

/// A board file and its dead-stone file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct CatalogPaths {
    /// Board records.
    boards: PathBuf,
    /// Dead-stone records, same order.
    dead: PathBuf,
}

impl CatalogPaths {
    /// Pairs a board file with its dead-stone file.
    pub fn new(boards: impl Into<PathBuf>, dead: impl Into<PathBuf>) -> Self {
        Self {
            boards: boards.into(),
            dead: dead.into(),
        }
    }

    /// Reads and pairs both files.
    #[instrument(skip(self), fields(boards = %self.boards.display()))]
    pub fn load(&self) -> Result<BoardCatalog, ConfigError> {
        let boards = read(&self.boards)?;
        let dead = read(&self.dead)?;
        let catalog = match BoardCatalog::parse(&boards, &dead) {
            Ok(catalog) => catalog,
            Err(e) => {
                return Err(ConfigError::new(format!(
                    "Failed to load catalog {}: {}",
                    self.boards.display(),
                    e
                )));
            }
        };
        info!(boards = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }
}

/// Settings for the command-line front end.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog for normal play.
    #[serde(default = "default_normal")]
    normal: CatalogPaths,

    /// Catalog for hard mode, if any.
    #[serde(default)]
    hard: Option<CatalogPaths>,

    /// Where room settings are persisted.
    #[serde(default = "default_settings_file")]
    settings_file: PathBuf,

    /// Count used when a command does not name one.
    #[serde(default)]
    scoring_mode: ScoringMode,
}

fn default_normal() -> CatalogPaths {
    CatalogPaths::new("data/boards/normal.txt", "data/boards/normal_dead.txt")
}

fn default_settings_file() -> PathBuf {
    PathBuf::from("countbattle_settings.toml")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            normal: default_normal(),
            hard: None,
            settings_file: default_settings_file(),
            scoring_mode: ScoringMode::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = read(path.as_ref())?;
        let config: Self = match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => return Err(ConfigError::new(format!("Failed to parse config: {}", e))),
        };

        info!(scoring_mode = %config.scoring_mode, hard = config.hard.is_some(), "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` when given, else the default file when it exists, else
    /// built-in defaults.
    #[instrument]
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Loads the normal catalog and, when configured, the hard one.
    #[instrument(skip(self))]
    pub fn load_library(&self) -> Result<BoardLibrary, ConfigError> {
        let library = BoardLibrary::new(self.normal.load()?);
        match &self.hard {
            Some(hard) => Ok(library.with_hard(hard.load()?)),
            None => Ok(library),
        }
    }
}

/// Reads a file, reporting failures at the caller's location.
#[track_caller]
fn read(path: &Path) -> Result<String, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) => Err(ConfigError::new(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str(r#"scoring_mode = "area""#).unwrap();
        assert_eq!(config.scoring_mode(), &ScoringMode::Area);
        assert_eq!(config.normal(), &default_normal());
        assert!(config.hard().is_none());
    }

    #[test]
    fn test_catalogs_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, text: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, text).unwrap();
            path
        };
        let normal = CatalogPaths::new(write("n.txt", "xo\nox\n\nxx\noo"), write("nd.txt", "..\n..\n\n..\ny."));
        let hard = CatalogPaths::new(write("h.txt", "x.\n.."), write("hd.txt", "..\n.."));
        let config = AppConfig {
            normal,
            hard: Some(hard),
            ..AppConfig::default()
        };

        let library = config.load_library().unwrap();
        assert_eq!(library.normal().len(), 2);
        assert_eq!(library.hard().map(BoardCatalog::len), Some(1));
    }

    #[test]
    fn test_shipped_catalog_loads() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/boards");
        let catalog = CatalogPaths::new(data.join("normal.txt"), data.join("normal_dead.txt"))
            .load()
            .unwrap();
        assert_eq!(catalog.len(), 100);
    }

    #[test]
    fn test_shipped_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../countbattle.toml");
        let config = AppConfig::from_file(path).unwrap();
        assert_eq!(config.normal(), &default_normal());
        assert!(config.hard().is_none());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = CatalogPaths::new("no/such/boards.txt", "no/such/dead.txt")
            .load()
            .unwrap_err();
        assert!(err.message.contains("no/such/boards.txt"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_read_error_points_at_caller() {
        let expected_line = line!() + 1;
        let err = read(Path::new("no/such/file.toml")).unwrap_err();
        assert_eq!(err.line, expected_line);
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_mismatched_catalog_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let boards = dir.path().join("b.txt");
        let dead = dir.path().join("d.txt");
        std::fs::write(&boards, "x.\n..\n\n.o\n..").unwrap();
        std::fs::write(&dead, "..\n..").unwrap();
        let err = CatalogPaths::new(boards, dead).load().unwrap_err();
        assert!(err.to_string().starts_with("Config error: Failed to load catalog"));
    }
}
