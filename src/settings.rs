//! Persisted user preferences.
//!
//! The settings live in a TOML file with a single `[general]` table holding
//! four string keys. A missing file is created with the defaults on first
//! load; unreadable or mistyped keys fall back to their defaults one by one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::AppError;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_OUTPUT_DIR: &str = "./downloads";
pub const DEFAULT_FORMAT: &str = "mp3";
pub const DEFAULT_BITRATE: &str = "320k";
pub const DEFAULT_AUDIO_PROVIDER: &str = "youtube-music";

const SECTION: &str = "general";

/// Output formats the companion accepts.
pub const FORMATS: &[&str] = &["mp3", "flac", "ogg", "opus", "m4a", "wav"];

/// `auto`, `disable`, then every multiple of 8 kbps up to 320k.
pub fn bitrates() -> Vec<String> {
    ["auto", "disable"]
        .iter()
        .map(|s| s.to_string())
        .chain((8..=320).step_by(8).map(|k| format!("{k}k")))
        .collect()
}

pub fn is_known_format(format: &str) -> bool {
    FORMATS.contains(&format)
}

pub fn is_known_bitrate(bitrate: &str) -> bool {
    bitrates().iter().any(|b| b == bitrate)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub output_dir: String,
    pub format: String,
    pub bitrate: String,
    pub audio_provider: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            bitrate: DEFAULT_BITRATE.to_string(),
            audio_provider: DEFAULT_AUDIO_PROVIDER.to_string(),
        }
    }
}

#[derive(Serialize)]
struct SettingsFile<'a> {
    general: &'a Settings,
}

impl Settings {
    fn from_document(text: &str) -> Self {
        let defaults = Settings::default();

        let table = match text.parse::<toml::Table>() {
            Ok(table) => table,
            Err(e) => {
                warn!("Settings file is not valid TOML, using defaults: {}", e);
                return defaults;
            }
        };

        let section = match table.get(SECTION).and_then(|v| v.as_table()) {
            Some(section) => section,
            None => {
                warn!("Settings file has no [{}] section, using defaults", SECTION);
                return defaults;
            }
        };

        let key = |name: &str, fallback: String| -> String {
            match section.get(name).map(|v| v.as_str()) {
                Some(Some(value)) => value.to_string(),
                Some(None) => {
                    warn!("Setting '{}' is not a string, using '{}'", name, fallback);
                    fallback
                }
                None => {
                    warn!("Setting '{}' is missing, using '{}'", name, fallback);
                    fallback
                }
            }
        };

        Settings {
            output_dir: key("output_dir", defaults.output_dir.clone()),
            format: key("format", defaults.format.clone()),
            bitrate: key("bitrate", defaults.bitrate.clone()),
            audio_provider: key("audio_provider", defaults.audio_provider.clone()),
        }
    }

    fn to_document(&self) -> Result<String, AppError> {
        Ok(toml::to_string(&SettingsFile { general: self })?)
    }
}

/// Reads and writes [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Settings, AppError> {
        if !self.path.exists() {
            debug!(
                "Settings file {} not found, writing defaults",
                self.path.display()
            );
            self.save(&Settings::default())?;
        }

        let text = fs::read_to_string(&self.path)?;
        Ok(Settings::from_document(&text))
    }

    /// Replaces the file atomically: the new content goes to a temp file in
    /// the same directory which is then renamed over the target.
    pub fn save(&self, settings: &Settings) -> Result<(), AppError> {
        let document = settings.to_document()?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(document.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!("Settings saved to {}", self.path.display());
        Ok(())
    }
}
