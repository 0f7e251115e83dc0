use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration from voila.toml. Every field has a default, so a missing
/// or partial file is fine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gestures: GestureConfig,
    #[serde(default)]
    pub drop: DropConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {0}: {1}")]
    Read(String, std::io::Error),
    #[error("could not parse voila.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Gesture recognition thresholds. Distances are in the same screen units
/// the presentation layer reports positions in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Longest press-to-release that still counts as a tap
    #[serde(default = "default_tap_max_ms")]
    pub tap_max_ms: u64,
    /// Max displacement for a tap
    #[serde(default = "default_tap_slop")]
    pub tap_slop: f32,
    /// How long a completed tap is held back waiting for a second tap.
    /// Tunable; 250ms keeps single taps feeling immediate while still
    /// letting double taps win.
    #[serde(default = "default_double_tap_window_ms")]
    pub double_tap_window_ms: u64,
    /// Hold duration before a press becomes a drag
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,
    /// Radius the pointer must stay within during the long-press hold
    #[serde(default = "default_drag_jitter")]
    pub drag_jitter: f32,
    /// Horizontal travel that activates a swipe
    #[serde(default = "default_swipe_activate_x")]
    pub swipe_activate_x: f32,
    /// Vertical travel that disqualifies a swipe before activation
    #[serde(default = "default_swipe_fail_y")]
    pub swipe_fail_y: f32,
    /// Horizontal travel at release beyond which a swipe deletes
    #[serde(default = "default_swipe_delete")]
    pub swipe_delete: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            tap_max_ms: default_tap_max_ms(),
            tap_slop: default_tap_slop(),
            double_tap_window_ms: default_double_tap_window_ms(),
            long_press_ms: default_long_press_ms(),
            drag_jitter: default_drag_jitter(),
            swipe_activate_x: default_swipe_activate_x(),
            swipe_fail_y: default_swipe_fail_y(),
            swipe_delete: default_swipe_delete(),
        }
    }
}

fn default_tap_max_ms() -> u64 {
    300
}
fn default_tap_slop() -> f32 {
    10.0
}
fn default_double_tap_window_ms() -> u64 {
    250
}
fn default_long_press_ms() -> u64 {
    1000
}
fn default_drag_jitter() -> f32 {
    10.0
}
fn default_swipe_activate_x() -> f32 {
    30.0
}
fn default_swipe_fail_y() -> f32 {
    10.0
}
fn default_swipe_delete() -> f32 {
    70.0
}

/// Drop-target geometry: how recorded category rects map to the absolute
/// positions pointer events arrive in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropConfig {
    /// Horizontal correction added to recorded rects (container padding)
    #[serde(default = "default_origin_x")]
    pub origin_x: f32,
    /// Vertical correction added to recorded rects
    #[serde(default = "default_origin_y")]
    pub origin_y: f32,
    /// Extra hit area below each rect's bottom edge, so small buttons are
    /// easier to drop on
    #[serde(default = "default_bottom_tolerance")]
    pub bottom_tolerance: f32,
    /// Left edge of the category row, for reorder slot math
    #[serde(default = "default_row_origin_x")]
    pub row_origin_x: f32,
    /// Nominal width of one category button slot
    #[serde(default = "default_slot_width")]
    pub slot_width: f32,
}

impl Default for DropConfig {
    fn default() -> Self {
        DropConfig {
            origin_x: default_origin_x(),
            origin_y: default_origin_y(),
            bottom_tolerance: default_bottom_tolerance(),
            row_origin_x: default_row_origin_x(),
            slot_width: default_slot_width(),
        }
    }
}

fn default_origin_x() -> f32 {
    20.0
}
fn default_origin_y() -> f32 {
    90.0
}
fn default_bottom_tolerance() -> f32 {
    30.0
}
fn default_row_origin_x() -> f32 {
    20.0
}
fn default_slot_width() -> f32 {
    80.0
}

/// Durations for the three animation outcomes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Fly-to-target on a successful drop
    #[serde(default = "default_fly_ms")]
    pub fly_ms: u64,
    /// Spring back to neutral
    #[serde(default = "default_reset_ms")]
    pub reset_ms: u64,
    /// Slide off-screen on a delete swipe
    #[serde(default = "default_exit_ms")]
    pub exit_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            fly_ms: default_fly_ms(),
            reset_ms: default_reset_ms(),
            exit_ms: default_exit_ms(),
        }
    }
}

fn default_fly_ms() -> u64 {
    500
}
fn default_reset_ms() -> u64 {
    300
}
fn default_exit_ms() -> u64 {
    300
}

impl Config {
    /// Load voila.toml from the data directory. A missing file yields the
    /// defaults; a malformed one is an error the caller can report.
    pub fn load(dir: &Path) -> Result<Config, ConfigError> {
        let path = dir.join("voila.toml");
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e))?;
        Ok(toml::from_str(&text)?)
    }

    /// Defaults re-tuned for terminal cells instead of touch-screen points:
    /// cells are coarse, so distance thresholds shrink and the recorded
    /// rects are already absolute (no container padding to correct for).
    pub fn terminal() -> Config {
        Config {
            gestures: GestureConfig {
                tap_slop: 1.0,
                long_press_ms: 400,
                drag_jitter: 2.0,
                swipe_activate_x: 4.0,
                swipe_fail_y: 1.0,
                swipe_delete: 8.0,
                ..GestureConfig::default()
            },
            drop: DropConfig {
                origin_x: 0.0,
                origin_y: 0.0,
                bottom_tolerance: 1.0,
                row_origin_x: 1.0,
                slot_width: 14.0,
            },
            animation: AnimationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("[gestures]\nswipe_delete = 90.0\n").unwrap();
        assert_eq!(cfg.gestures.swipe_delete, 90.0);
        assert_eq!(cfg.gestures.long_press_ms, 1000);
        assert_eq!(cfg.drop.bottom_tolerance, 30.0);
        assert_eq!(cfg.animation.fly_ms, 500);
    }

    #[test]
    fn missing_file_is_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.gestures.tap_max_ms, 300);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("voila.toml"), "gestures = 7").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
