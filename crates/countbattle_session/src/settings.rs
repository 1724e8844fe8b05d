//! Game settings and where they persist between sessions.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use countbattle_core::ScoringMode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::remote::RoomSettingsPatch;

/// Keys under which settings persist. Values are stored as JSON text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter)]
pub enum SettingKey {
    /// `true` or `false`.
    #[strum(serialize = "countbattle_hard_mode")]
    HardMode,
    /// `"territory"` or `"area"`.
    #[strum(serialize = "countbattle_scoring_mode")]
    ScoringMode,
    /// Seconds per board, or `null`.
    #[strum(serialize = "countbattle_time_per_board")]
    TimePerBoard,
}

/// Get/set access to persisted string values.
pub trait SettingsStore: std::fmt::Debug + Send {
    /// Value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`. Failures are the store's to report.
    fn set(&mut self, key: &str, value: String);
}

/// Settings kept only for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: HashMap<String, String>,
}

impl MemorySettingsStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

/// Settings kept in a flat TOML table on disk.
///
/// The file is read once on open and rewritten on every `set`. A missing or
/// unreadable file starts the store empty; write failures are logged and the
/// in-memory value is kept.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlSettingsStore {
    /// Opens the store backed by `path`.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<BTreeMap<String, String>>(&content) {
                Ok(values) => {
                    debug!(count = values.len(), "Loaded settings file");
                    values
                }
                Err(e) => {
                    warn!(error = %e, "Settings file is not a flat string table, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file yet");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read settings file, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    /// File backing the store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn flush(&self) {
        let content = match toml::to_string(&self.values) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "Failed to encode settings");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, content) {
            warn!(error = %e, "Failed to write settings file");
        }
    }
}

impl SettingsStore for TomlSettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
        self.flush();
    }
}

/// Room parameters that shape a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    /// Use the hard catalog and ask for margins.
    pub hard_mode: bool,
    /// Which count decides the answers.
    pub scoring_mode: ScoringMode,
    /// Seconds per board; `None` or zero is untimed.
    pub time_per_board: Option<u32>,
}

impl GameSettings {
    /// Reads settings from `store`, falling back to defaults per key.
    #[instrument(skip(store))]
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();
        let settings = Self {
            hard_mode: read(store, SettingKey::HardMode).unwrap_or(defaults.hard_mode),
            scoring_mode: read(store, SettingKey::ScoringMode).unwrap_or(defaults.scoring_mode),
            time_per_board: read::<Option<u32>>(store, SettingKey::TimePerBoard)
                .unwrap_or(defaults.time_per_board),
        };
        debug!(?settings, "Loaded game settings");
        settings
    }

    /// Writes every setting to `store`.
    #[instrument(skip(store))]
    pub fn save(&self, store: &mut dyn SettingsStore) {
        write(store, SettingKey::HardMode, &self.hard_mode);
        write(store, SettingKey::ScoringMode, &self.scoring_mode);
        write(store, SettingKey::TimePerBoard, &self.time_per_board);
    }

    /// Applies the fields present in `patch`. Returns whether anything changed.
    #[instrument(skip(self))]
    pub fn apply(&mut self, patch: &RoomSettingsPatch) -> bool {
        let before = *self;
        if let Some(hard_mode) = patch.hard_mode {
            self.hard_mode = hard_mode;
        }
        if let Some(scoring_mode) = patch.scoring_mode {
            self.scoring_mode = scoring_mode;
        }
        if let Some(seconds) = patch.time_per_board {
            self.time_per_board = Some(seconds);
        }
        let changed = before != *self;
        if changed {
            info!(settings = ?self, "Room settings changed");
        }
        changed
    }

    /// Round time limit, if the game is timed.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_per_board
            .filter(|seconds| *seconds > 0)
            .map(|seconds| Duration::from_secs(u64::from(seconds)))
    }
}

fn read<T: DeserializeOwned>(store: &dyn SettingsStore, key: SettingKey) -> Option<T> {
    let raw = store.get(key.as_ref())?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(%key, error = %e, "Ignoring unreadable stored setting");
            None
        }
    }
}

fn write<T: Serialize>(store: &mut dyn SettingsStore, key: SettingKey, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => store.set(key.as_ref(), json),
        Err(e) => warn!(%key, error = %e, "Failed to encode setting"),
    }
}
