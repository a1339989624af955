use serde::{Serialize, Deserialize};
use directories::ProjectDirs;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::delay::{RandomDelay, DEFAULT_MIN_DELAY_MS, DEFAULT_SPREAD_MS};
use crate::mock::MockResponseTable;
use crate::typing::{TypingOptions, DEFAULT_SPEED};

/// Reveal animation settings for assistant messages
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TypingSettings {
    pub enabled: bool,
    pub speed: f64, // characters per second
    pub delay_ms: u64,
}

impl Default for TypingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: DEFAULT_SPEED,
            delay_ms: 0,
        }
    }
}

impl TypingSettings {
    pub fn to_options(&self) -> TypingOptions {
        TypingOptions {
            enabled: self.enabled,
            speed: self.speed,
            delay: Duration::from_millis(self.delay_ms),
            on_update: None,
        }
    }
}

/// Simulated network latency for mock replies
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct MockDelaySettings {
    pub min_ms: u64,
    pub spread_ms: u64,
}

impl Default for MockDelaySettings {
    fn default() -> Self {
        Self {
            min_ms: DEFAULT_MIN_DELAY_MS,
            spread_ms: DEFAULT_SPREAD_MS,
        }
    }
}

impl MockDelaySettings {
    pub fn to_delay(&self) -> RandomDelay {
        RandomDelay::from_millis(self.min_ms, self.spread_ms)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub theme: String,
    pub typing: TypingSettings,
    pub mock_delay: MockDelaySettings,
    /// JSON file replacing the built-in mock table
    pub mock_table: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            typing: TypingSettings::default(),
            mock_delay: MockDelaySettings::default(),
            mock_table: None,
        }
    }
}

impl Settings {
    /// Mock table from `mock_table`, or the built-in one if unset or unreadable.
    pub fn load_mock_table(&self) -> MockResponseTable {
        let Some(path) = &self.mock_table else {
            return MockResponseTable::builtin();
        };
        match MockResponseTable::load(path) {
            Ok(table) => {
                log::info!("Loaded {} mock replies from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                log::warn!(
                    "Failed to load mock table {}: {} (using built-in replies)",
                    path.display(),
                    e
                );
                MockResponseTable::builtin()
            }
        }
    }
}

pub fn settings_path() -> Option<PathBuf> {
    if let Some(proj) = ProjectDirs::from("com", "nitra", "nitra-chat") {
        let dir = proj.config_dir();
        if let Err(e) = fs::create_dir_all(dir) {
            log::warn!("Failed to create config dir: {}", e);
            return None;
        }
        return Some(dir.join("settings.json"));
    }
    None
}

pub fn load_settings() -> Option<Settings> {
    load_settings_from(&settings_path()?)
}

pub fn load_settings_from(path: &Path) -> Option<Settings> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(settings) => Some(settings),
        Err(e) => {
            log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
            None
        }
    }
}

pub fn save_settings(settings: &Settings) -> io::Result<()> {
    if let Some(path) = settings_path() {
        save_settings_to(settings, &path)?;
    }
    Ok(())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> io::Result<()> {
    let data = serde_json::to_string_pretty(settings)?;
    let mut file = fs::File::create(path)?;
    file.write_all(data.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("nitra-chat-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_settings_round_trip() {
        let path = temp_path("settings.json");
        let mut settings = Settings::default();
        settings.theme = "light".into();
        settings.typing.speed = 42.0;
        settings.mock_delay.min_ms = 0;

        save_settings_to(&settings, &path).unwrap();
        let loaded = load_settings_from(&path).unwrap();
        assert_eq!(loaded, settings);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "typing": { "speed": 30.0 } }"#).unwrap();
        assert_eq!(settings.theme, "dark");
        assert!(settings.typing.enabled);
        assert_eq!(settings.typing.speed, 30.0);
        assert_eq!(settings.mock_delay, MockDelaySettings::default());
        assert!(settings.mock_table.is_none());
    }

    #[test]
    fn test_malformed_settings_ignored() {
        let path = temp_path("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_settings_from(&path).is_none());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_mock_table_falls_back() {
        let settings = Settings {
            mock_table: Some(temp_path("does-not-exist.json")),
            ..Settings::default()
        };
        assert_eq!(settings.load_mock_table(), MockResponseTable::builtin());
    }

    #[test]
    fn test_mock_table_from_file() {
        let path = temp_path("table.json");
        fs::write(
            &path,
            concat!(
                r#"{ "Ping": { "message": "#,
                r#"{ "role": "assistant", "content": "Pong", "timestamp": "" } } }"#,
            ),
        )
        .unwrap();
        let settings = Settings {
            mock_table: Some(path.clone()),
            ..Settings::default()
        };
        let table = settings.load_mock_table();
        assert_eq!(table.respond("Ping").content, "Pong");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_typing_settings_to_options() {
        let options = TypingSettings {
            enabled: false,
            speed: 12.5,
            delay_ms: 250,
        }
        .to_options();
        assert!(!options.enabled);
        assert_eq!(options.speed, 12.5);
        assert_eq!(options.delay, Duration::from_millis(250));
        assert!(options.on_update.is_none());
    }
}
