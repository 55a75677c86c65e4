//! Player settings, their JSON persistence, and the game state handed to
//! every subscriber.
//!
//! The settings file is a flat object:
//!
//! ```json
//! { "sound": "on", "language": "en", "difficulty": "medium", "selected_character": "blaze" }
//! ```
//!
//! Missing or unreadable keys fall back to their defaults. Saving merges the
//! changed keys into whatever the file already holds, so keys written by
//! other tools survive.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, RuntimeError};
use crate::locale::Texts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    #[default]
    On,
    Off,
}

impl Toggle {
    pub fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    #[serde(alias = "normal")]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn next(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub sound: Toggle,
    pub language: String,
    pub difficulty: Difficulty,
    pub selected_character: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: Toggle::On,
            language: "en".to_string(),
            difficulty: Difficulty::Medium,
            selected_character: None,
        }
    }
}

impl Settings {
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(sound) = patch.sound {
            self.sound = sound;
        }
        if let Some(language) = &patch.language {
            self.language.clone_from(language);
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(selected) = &patch.selected_character {
            self.selected_character = Some(selected.clone());
        }
    }

    /// Read the known keys out of a JSON object, defaulting each one that is
    /// absent or malformed.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let defaults = Self::default();
        Self {
            sound: field(object, "sound").unwrap_or(defaults.sound),
            language: field(object, "language").unwrap_or(defaults.language),
            difficulty: field(object, "difficulty").unwrap_or(defaults.difficulty),
            selected_character: field(object, "selected_character")
                .unwrap_or(defaults.selected_character),
        }
    }
}

fn field<T: DeserializeOwned>(object: &Map<String, Value>, key: &str) -> Option<T> {
    let value = object.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::warn!("Settings: ignoring invalid value for '{key}': {e}");
            None
        }
    }
}

/// A partial update. Only the `Some` fields are applied and persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_character: Option<String>,
}

impl SettingsPatch {
    pub fn sound(sound: Toggle) -> Self {
        Self {
            sound: Some(sound),
            ..Self::default()
        }
    }

    pub fn language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Self::default()
        }
    }

    pub fn difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty: Some(difficulty),
            ..Self::default()
        }
    }

    pub fn selected_character(id: impl Into<String>) -> Self {
        Self {
            selected_character: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;

    /// Merge `patch` into the persisted settings. Saving the same patch
    /// twice leaves the same result.
    fn save(&mut self, patch: &SettingsPatch) -> Result<()>;
}

pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, reason: impl Into<String>) -> RuntimeError {
        RuntimeError::Settings {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn read_object(&self) -> Result<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.error(format!("read failed: {e}"))),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(object)) => Ok(object),
            Ok(_) => {
                log::warn!(
                    "Settings file {} is not a JSON object, starting fresh",
                    self.path.display()
                );
                Ok(Map::new())
            }
            Err(e) => {
                log::warn!(
                    "Settings file {} is not valid JSON ({e}), starting fresh",
                    self.path.display()
                );
                Ok(Map::new())
            }
        }
    }

    fn write_object(&self, object: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.error(format!("mkdir failed: {e}")))?;
        }
        let body = serde_json::to_string_pretty(object)
            .map_err(|e| self.error(format!("encode failed: {e}")))?;

        // Write-then-rename so readers never see a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| self.error(format!("write failed: {e}")))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.error(format!("rename failed: {e}")))
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings> {
        let settings = Settings::from_json_object(&self.read_object()?);
        log::info!("Loaded settings from {}", self.path.display());
        Ok(settings)
    }

    fn save(&mut self, patch: &SettingsPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let mut object = self.read_object()?;
        let Value::Object(changes) =
            serde_json::to_value(patch).map_err(|e| self.error(format!("encode failed: {e}")))?
        else {
            return Err(self.error("patch did not encode to an object"));
        };
        object.extend(changes);
        self.write_object(&object)?;
        log::info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// In-process store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Settings,
    saves: usize,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self { settings, saves: 0 }
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.settings.clone())
    }

    fn save(&mut self, patch: &SettingsPatch) -> Result<()> {
        self.settings.apply(patch);
        self.saves += 1;
        Ok(())
    }
}

/// Everything a subscriber may read about the running game. Owned by the
/// director and only changed between frames.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    pub settings: Settings,
    pub texts: Texts,
}

impl GameState {
    pub fn new(settings: Settings, texts: Texts) -> Self {
        Self { settings, texts }
    }

    pub fn selected_character(&self) -> Option<&str> {
        self.settings.selected_character.as_deref()
    }

    /// Localised text for `key`, blank when missing.
    pub fn text(&self, key: &str) -> &str {
        self.texts.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "curb_settings_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn missing_file_loads_defaults() {
        let store = JsonSettingsStore::new(temp_file_path("missing"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn legacy_normal_difficulty_reads_as_medium() {
        let path = temp_file_path("legacy");
        fs::write(&path, r#"{ "difficulty": "normal", "sound": "off" }"#).unwrap();
        let settings = JsonSettingsStore::new(&path).load().unwrap();
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.sound, Toggle::Off);
        assert_eq!(settings.language, "en");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn invalid_values_fall_back_per_key() {
        let path = temp_file_path("invalid");
        fs::write(&path, r#"{ "difficulty": "nightmare", "language": "pt" }"#).unwrap();
        let settings = JsonSettingsStore::new(&path).load().unwrap();
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.language, "pt");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn save_merges_and_keeps_unknown_keys() {
        let path = temp_file_path("merge");
        fs::write(&path, r#"{ "volume": 7, "language": "pt" }"#).unwrap();
        let mut store = JsonSettingsStore::new(&path);

        store.save(&SettingsPatch::difficulty(Difficulty::Hard)).unwrap();
        store.save(&SettingsPatch::difficulty(Difficulty::Hard)).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["volume"], 7);
        assert_eq!(raw["language"], "pt");
        assert_eq!(raw["difficulty"], "hard");
        assert!(raw.get("sound").is_none(), "untouched keys are not written");
        assert!(!path.with_extension("json.tmp").exists());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = temp_file_path("nested");
        let path = dir.join("config").join("settings.json");
        let mut store = JsonSettingsStore::new(&path);
        store.save(&SettingsPatch::selected_character("blaze")).unwrap();
        assert_eq!(store.load().unwrap().selected_character.as_deref(), Some("blaze"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn corrupt_file_is_replaced_on_save() {
        let path = temp_file_path("corrupt");
        fs::write(&path, "{{{").unwrap();
        let mut store = JsonSettingsStore::new(&path);
        assert_eq!(store.load().unwrap(), Settings::default());
        store.save(&SettingsPatch::sound(Toggle::Off)).unwrap();
        assert_eq!(store.load().unwrap().sound, Toggle::Off);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn apply_touches_only_given_fields() {
        let mut settings = Settings::default();
        settings.apply(&SettingsPatch::language("pt"));
        assert_eq!(settings.language, "pt");
        assert_eq!(settings.sound, Toggle::On);
        assert!(SettingsPatch::default().is_empty());
    }

    #[test]
    fn cycles_wrap() {
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
        assert_eq!(Toggle::On.toggled().toggled(), Toggle::On);
    }

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemorySettingsStore::default();
        store.save(&SettingsPatch::sound(Toggle::Off)).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap().sound, Toggle::Off);
    }
}
