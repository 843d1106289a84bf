use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vec2::Vec2;

/// Geometry and physics constants for one game. Every field has a default matching the
/// stock level, so a settings file only needs to name what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,

    pub movement_speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,

    pub player_start: Vec2,
    pub player_width: f32,
    pub player_height: f32,
    /// Size of one frame in the player sprite sheet.
    pub sprite_frame_width: f32,
    pub sprite_frame_height: f32,
    /// Top of the left-facing row in the sprite sheet.
    pub sprite_left_row_y: f32,
    pub walk_cycle_frames: u8,

    pub tile_count: usize,
    pub gap_step: f32,
    pub platform_width: f32,
    pub platform_height: f32,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_y: f32,
    pub brick_extra_gap: f32,
    pub decoration_width: f32,
    pub decoration_height: f32,
    pub decoration_y: f32,
    /// How far decorations move per scrolled frame, independent of `movement_speed`.
    pub parallax_shift: f32,
    /// Win distance before the per-slot gaps are added on top.
    pub max_limit_baseline: f32,

    /// Walking left moves the player (not the world) while `x >= canvas_width * left_walk_ratio`.
    pub left_walk_ratio: f32,
    /// Walking right moves the player (not the world) while `x <= canvas_width * right_walk_ratio`.
    pub right_walk_ratio: f32,
}

/// Source platform art is 1842 px wide and drawn at half size.
const PLATFORM_ART_WIDTH: f32 = 1842.0;

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1024.0,
            canvas_height: 576.0,

            movement_speed: 5.0,
            gravity: 1.5,
            jump_impulse: 30.0,

            player_start: Vec2::new(100.0, 100.0),
            player_width: 864.0 / 8.0 / 2.0,
            player_height: 130.0 / 2.0,
            sprite_frame_width: 864.0 / 8.0,
            sprite_frame_height: 130.0,
            sprite_left_row_y: 140.0,
            walk_cycle_frames: 8,

            tile_count: 10,
            gap_step: 150.0,
            platform_width: PLATFORM_ART_WIDTH / 2.0,
            platform_height: 238.0 / 2.0,
            brick_width: 326.0 / 3.0,
            brick_height: 100.0 / 3.0,
            brick_y: 200.0,
            brick_extra_gap: 3000.0,
            decoration_width: 820.0 / 2.0,
            decoration_height: 399.0 / 2.0,
            decoration_y: 60.0,
            parallax_shift: 2.0,
            max_limit_baseline: PLATFORM_ART_WIDTH * 8.0,

            left_walk_ratio: 0.1,
            right_walk_ratio: 0.5,
        }
    }
}

/// Upper bound on `GameConfig::tile_count`.
pub const MAX_TILE_COUNT: usize = 1_000;

impl GameConfig {
    pub fn left_walk_bound(&self) -> f32 {
        self.canvas_width * self.left_walk_ratio
    }

    pub fn right_walk_bound(&self) -> f32 {
        self.canvas_width * self.right_walk_ratio
    }

    /// Replaces values the game can't run with (non-finite, empty canvas, zero-length walk
    /// cycle, no tiles) by their defaults. The tile count is capped at [`MAX_TILE_COUNT`].
    pub fn sanitized(mut self) -> Self {
        let d = GameConfig::default();
        let fix = |v: &mut f32, default: f32| {
            if !v.is_finite() {
                *v = default;
            }
        };
        let fix_positive = |v: &mut f32, default: f32| {
            if !v.is_finite() || *v <= 0.0 {
                *v = default;
            }
        };

        fix_positive(&mut self.canvas_width, d.canvas_width);
        fix_positive(&mut self.canvas_height, d.canvas_height);
        fix(&mut self.movement_speed, d.movement_speed);
        fix(&mut self.gravity, d.gravity);
        fix(&mut self.jump_impulse, d.jump_impulse);
        if !self.player_start.is_finite() {
            self.player_start = d.player_start;
        }
        fix_positive(&mut self.player_width, d.player_width);
        fix_positive(&mut self.player_height, d.player_height);
        fix_positive(&mut self.sprite_frame_width, d.sprite_frame_width);
        fix_positive(&mut self.sprite_frame_height, d.sprite_frame_height);
        fix(&mut self.sprite_left_row_y, d.sprite_left_row_y);
        if self.walk_cycle_frames == 0 {
            self.walk_cycle_frames = d.walk_cycle_frames;
        }
        if self.tile_count == 0 {
            self.tile_count = d.tile_count;
        }
        self.tile_count = self.tile_count.min(MAX_TILE_COUNT);
        fix(&mut self.gap_step, d.gap_step);
        fix_positive(&mut self.platform_width, d.platform_width);
        fix_positive(&mut self.platform_height, d.platform_height);
        fix_positive(&mut self.brick_width, d.brick_width);
        fix_positive(&mut self.brick_height, d.brick_height);
        fix(&mut self.brick_y, d.brick_y);
        fix(&mut self.brick_extra_gap, d.brick_extra_gap);
        fix_positive(&mut self.decoration_width, d.decoration_width);
        fix_positive(&mut self.decoration_height, d.decoration_height);
        fix(&mut self.decoration_y, d.decoration_y);
        fix(&mut self.parallax_shift, d.parallax_shift);
        fix(&mut self.max_limit_baseline, d.max_limit_baseline);
        fix(&mut self.left_walk_ratio, d.left_walk_ratio);
        fix(&mut self.right_walk_ratio, d.right_walk_ratio);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_frame_hz")]
    pub frame_hz: f64,
    #[serde(default)]
    pub game: GameConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            frame_hz: default_frame_hz(),
            game: GameConfig::default(),
        }
    }
}

impl Settings {
    pub fn sanitized(mut self) -> Self {
        if !self.frame_hz.is_finite() || self.frame_hz <= 0.0 {
            self.frame_hz = default_frame_hz();
        }
        if self.log_level.trim().is_empty() {
            self.log_level = default_log_level();
        }
        self.game = self.game.sanitized();
        self
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_frame_hz() -> f64 {
    60.0
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed reading settings {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed parsing settings {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed writing settings {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `PLATFORMER_CONFIG` if set, otherwise `$XDG_CONFIG_HOME/platformer/settings.json`
    /// (falling back to `~/.config`).
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("PLATFORMER_CONFIG") {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("platformer");
        path.push("settings.json");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file means defaults; anything else that goes wrong is an error.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice::<Settings>(&bytes)
            .map(Settings::sanitized)
            .map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        fs::write(&self.path, text).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("platformer_settings_{tag}_{nanos}.json"))
    }

    #[test]
    fn defaults_match_stock_level() {
        let c = GameConfig::default();
        assert_eq!(c.platform_width, 921.0);
        assert_eq!(c.player_width, 54.0);
        assert_eq!(c.player_height, 65.0);
        assert_eq!(c.max_limit_baseline, 14736.0);
        assert_eq!(c.left_walk_bound(), 102.4);
        assert_eq!(c.right_walk_bound(), 512.0);
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: Settings = serde_json::from_str(r#"{"game":{"gravity":2.0}}"#)
            .expect("settings JSON should parse");
        assert_eq!(parsed.game.gravity, 2.0);
        assert_eq!(parsed.game.movement_speed, 5.0);
        assert_eq!(parsed.log_level, "info");
        assert_eq!(parsed.frame_hz, 60.0);
    }

    #[test]
    fn sanitized_replaces_unusable_values() {
        let settings = Settings {
            log_level: " ".to_string(),
            frame_hz: 0.0,
            game: GameConfig {
                canvas_width: 0.0,
                gravity: f32::NAN,
                walk_cycle_frames: 0,
                tile_count: 0,
                ..GameConfig::default()
            },
        }
        .sanitized();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn sanitized_caps_the_tile_count() {
        let huge = GameConfig {
            tile_count: usize::MAX,
            ..GameConfig::default()
        }
        .sanitized();
        assert_eq!(huge.tile_count, MAX_TILE_COUNT);

        let parsed: Settings = serde_json::from_str(r#"{"game":{"tile_count":0}}"#)
            .expect("settings JSON should parse");
        assert_eq!(parsed.sanitized().game.tile_count, 10);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let store = SettingsStore::new(temp_path("missing"));
        assert_eq!(store.load().expect("missing file is fine"), Settings::default());
    }

    #[test]
    fn save_then_load_and_reject_garbage() {
        let path = temp_path("roundtrip");
        let store = SettingsStore::new(&path);
        let mut settings = Settings::default();
        settings.game.movement_speed = 7.0;
        store.save(&settings).expect("save settings");
        assert_eq!(store.load().expect("load settings"), settings);

        fs::write(&path, "not json").expect("overwrite settings");
        assert!(matches!(store.load(), Err(ConfigError::Parse { .. })));
        let _ = fs::remove_file(path);
    }
}
