//! Street layout file and its hot-reload watcher.
//!
//! Every field has a default, so an empty object is a valid stage:
//!
//! ```json
//! { "ground_y": 600, "scroll_speed": 2,
//!   "backgrounds": ["sprites/street/background-1.png"],
//!   "vehicle_spawn_min_ticks": 120, "vehicle_spawn_max_ticks": 300 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StageFile {
    pub ground_y: f32,
    pub ground_width: f32,
    pub ground_height: f32,
    pub player_spawn_x: f32,
    /// Pixels per tick the street slides left.
    pub scroll_speed: f32,
    pub backgrounds: Vec<String>,
    pub vehicle_spawn_min_ticks: u32,
    pub vehicle_spawn_max_ticks: u32,
    pub vehicle_lifetime_ticks: u32,
    pub vehicle_speed: f32,
    pub vehicle_y: f32,
}

impl Default for StageFile {
    fn default() -> Self {
        Self {
            ground_y: 600.0,
            ground_width: 1280.0,
            ground_height: 50.0,
            player_spawn_x: 300.0,
            scroll_speed: 2.0,
            backgrounds: vec![
                "sprites/street/background-1.png".to_string(),
                "sprites/street/background-2.png".to_string(),
            ],
            vehicle_spawn_min_ticks: 180,
            vehicle_spawn_max_ticks: 420,
            vehicle_lifetime_ticks: curb_core::vehicle::DEFAULT_LIFETIME_TICKS,
            vehicle_speed: -2.0,
            vehicle_y: 510.0,
        }
    }
}

impl StageFile {
    /// Ticks until the next vehicle, drawn uniformly from the configured range.
    pub fn next_spawn_delay(&self) -> u32 {
        fastrand::u32(self.vehicle_spawn_min_ticks..=self.vehicle_spawn_max_ticks)
    }
}

/// Polls a file's modification time; reports each change once.
pub struct FileWatcher {
    path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl FileWatcher {
    pub fn new(path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&path);
        Self {
            path,
            last_seen_modified,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

pub fn load_stage_from_str(raw: &str) -> Result<StageFile, String> {
    let stage: StageFile =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse stage JSON: {e}"))?;
    validate_stage(&stage)?;
    Ok(stage)
}

pub fn load_stage_from_path(path: &Path) -> Result<StageFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read stage file {}: {e}", path.display()))?;
    load_stage_from_str(&raw).map_err(|e| format!("{}: {e}", path.display()))
}

/// A missing or broken stage file is not fatal: log it and play on defaults.
pub fn load_stage_or_default(path: &Path) -> StageFile {
    match load_stage_from_path(path) {
        Ok(stage) => {
            log::info!("Loaded stage layout from {}", path.display());
            stage
        }
        Err(e) => {
            log::warn!("{e}. Using the default stage layout.");
            StageFile::default()
        }
    }
}

fn validate_stage(stage: &StageFile) -> Result<(), String> {
    if stage.backgrounds.is_empty() {
        return Err("Stage validation failed: backgrounds list is empty".to_string());
    }
    if stage.ground_width <= 0.0 || stage.ground_height <= 0.0 {
        return Err("Stage validation failed: ground size must be > 0".to_string());
    }
    if stage.scroll_speed < 0.0 {
        return Err("Stage validation failed: scroll_speed must be >= 0".to_string());
    }
    if stage.vehicle_spawn_min_ticks == 0 {
        return Err("Stage validation failed: vehicle_spawn_min_ticks must be > 0".to_string());
    }
    if stage.vehicle_spawn_min_ticks > stage.vehicle_spawn_max_ticks {
        return Err(format!(
            "Stage validation failed: vehicle spawn range {}..{} is inverted",
            stage.vehicle_spawn_min_ticks, stage.vehicle_spawn_max_ticks
        ));
    }
    if stage.vehicle_lifetime_ticks == 0 {
        return Err("Stage validation failed: vehicle_lifetime_ticks must be > 0".to_string());
    }
    Ok(())
}
