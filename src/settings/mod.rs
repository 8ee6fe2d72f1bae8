//! Settings
//!
//! Command-line arguments plus `settings.ron`, which holds the host format
//! (markers, templates, naming overrides) and remembered folders. Missing
//! fields fall back to defaults, so an empty file is a valid settings file.

use clap::Parser;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::host::HostFormat;
use crate::storage::{LocalStorage, StorageError};

pub const SETTINGS_FILE: &str = "settings.ron";
const APP_DIR: &str = "roster-forge";

#[derive(Parser, Debug, Default)]
#[command(name = "roster-forge")]
#[command(version)]
#[command(about = "Edit the character roster baked into a game's host document")]
pub struct CliArgs {
    /// Host document to open on startup
    pub host: Option<PathBuf>,

    /// Settings file (defaults to the user config directory)
    #[arg(long, env = "ROSTER_FORGE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Characters directory holding installed/ and available/ scripts
    #[arg(long, env = "ROSTER_FORGE_CHARACTERS")]
    pub characters: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O: {0}")]
    Io(#[from] StorageError),
    #[error("settings parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub format: HostFormat,
    /// Folder with installed/ and available/ character scripts
    pub characters_dir: PathBuf,
    /// Where the open dialog starts
    pub last_document_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: HostFormat::default(),
            characters_dir: PathBuf::from("characters"),
            last_document_dir: None,
        }
    }
}

/// `<config dir>/roster-forge/settings.ron`
#[cfg(not(target_arch = "wasm32"))]
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(SETTINGS_FILE)
}

#[cfg(target_arch = "wasm32")]
pub fn default_settings_path() -> PathBuf {
    PathBuf::from(APP_DIR).join(SETTINGS_FILE)
}

impl Settings {
    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        ron::from_str(text).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    pub fn to_ron(&self) -> Result<String, SettingsError> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .indentor("  ".to_string());
        ron::ser::to_string_pretty(self, config).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = LocalStorage::with_base_dir("").read_string(path)?;
        Self::parse(&text)
    }

    /// Load, falling back to defaults when the file is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(StorageError::NotFound(_))) => Self::default(),
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let text = self.to_ron()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(StorageError::from)?;
        }
        LocalStorage::with_base_dir("").write_atomic(path, text.as_bytes())?;
        Ok(())
    }

    /// Command-line values win over the file
    pub fn apply_args(&mut self, args: &CliArgs) {
        if let Some(dir) = &args.characters {
            self.characters_dir = dir.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Settings::parse("()").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_format_keeps_other_defaults() {
        let settings = Settings::parse(
            r#"(format: (templates: (installed_dir: "js/chars")), characters_dir: "assets/chars")"#,
        )
        .unwrap();
        assert_eq!(settings.format.templates.installed_dir, "js/chars");
        assert_eq!(settings.format.markers, HostFormat::default().markers);
        assert_eq!(settings.characters_dir, PathBuf::from("assets/chars"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);

        let mut settings = Settings::default();
        settings.last_document_dir = Some(PathBuf::from("/games/site"));
        settings
            .format
            .generator_overrides
            .insert("npc".to_string(), "createNPCCharacter".to_string());
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_or_default() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.ron");
        assert_eq!(Settings::load_or_default(&missing), Settings::default());

        let broken = dir.path().join("broken.ron");
        std::fs::write(&broken, "(format: ").unwrap();
        assert!(matches!(Settings::load(&broken), Err(SettingsError::Parse(_))));
        assert_eq!(Settings::load_or_default(&broken), Settings::default());
    }

    #[test]
    fn test_cli_overrides() {
        let args = CliArgs::parse_from(["roster-forge", "game.html", "--characters", "/tmp/chars"]);
        assert_eq!(args.host, Some(PathBuf::from("game.html")));

        let mut settings = Settings::default();
        settings.apply_args(&args);
        assert_eq!(settings.characters_dir, PathBuf::from("/tmp/chars"));
    }
}
