//! Engine configuration, loaded from TOML. Every key is optional; missing
//! keys fall back to the classic game's timings and layout.
//!
//! ```toml
//! [timing]
//! movement_frames = 4
//! end_check_delay = 10
//!
//! [spawn]
//! four_probability = 0.1
//!
//! [rules]
//! win_value = 2048
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{Layout, BOARD_SIZE};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub timing: Timing,
    pub spawn: Spawn,
    pub rules: Rules,
    pub layout: Layout,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// Ticks a move takes to settle; also the tile animation length.
    #[serde(default = "defaults::movement_frames")]
    pub movement_frames: u32,
    /// Settled ticks required before win/lose is evaluated.
    #[serde(default = "defaults::end_check_delay")]
    pub end_check_delay: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    #[serde(default = "defaults::four_probability")]
    pub four_probability: f64,
    #[serde(default = "defaults::initial_tiles")]
    pub initial_tiles: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    #[serde(default = "defaults::win_value")]
    pub win_value: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            movement_frames: defaults::movement_frames(),
            end_check_delay: defaults::end_check_delay(),
        }
    }
}

impl Default for Spawn {
    fn default() -> Self {
        Self {
            four_probability: defaults::four_probability(),
            initial_tiles: defaults::initial_tiles(),
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self { win_value: defaults::win_value() }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.movement_frames == 0 {
            return Err(ConfigError::Invalid("timing.movement_frames must be at least 1".into()));
        }
        let p = self.spawn.four_probability;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::Invalid(format!(
                "spawn.four_probability must be within [0, 1], got {p}"
            )));
        }
        if !(1..=BOARD_SIZE).contains(&self.spawn.initial_tiles) {
            return Err(ConfigError::Invalid(format!(
                "spawn.initial_tiles must be within 1..={BOARD_SIZE}, got {}",
                self.spawn.initial_tiles
            )));
        }
        let w = self.rules.win_value;
        if !w.is_power_of_two() || w < 4 {
            return Err(ConfigError::Invalid(format!(
                "rules.win_value must be a power of two >= 4, got {w}"
            )));
        }
        if self.layout.tile_offset <= 0 || self.layout.tile_size <= 0 {
            return Err(ConfigError::Invalid("layout sizes must be positive".into()));
        }
        Ok(())
    }
}

mod defaults {
    pub fn movement_frames() -> u32 { 4 }
    pub fn end_check_delay() -> u32 { 10 }
    pub fn four_probability() -> f64 { crate::engine::spawn::DEFAULT_FOUR_PROBABILITY }
    pub fn initial_tiles() -> usize { 2 }
    pub fn win_value() -> u32 { 2048 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_defaults_to_classic_timings() {
        let cfg = Config::default();
        assert_eq!(cfg.timing.movement_frames, 4);
        assert_eq!(cfg.timing.end_check_delay, 10);
        assert_eq!(cfg.spawn.initial_tiles, 2);
        assert_eq!(cfg.rules.win_value, 2048);
        assert_eq!(cfg.layout, Layout::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn it_parses_partial_toml() {
        let cfg = Config::from_toml_str("[rules]\nwin_value = 64\n\n[layout]\ntile_offset = 30\n")
            .unwrap();
        assert_eq!(cfg.rules.win_value, 64);
        assert_eq!(cfg.layout.tile_offset, 30);
        assert_eq!(cfg.layout.top_left, 9);
        assert_eq!(cfg.timing, Timing::default());
    }

    #[test]
    fn it_parses_empty_toml() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn it_rejects_invalid_values() {
        let err = Config::from_toml_str("[timing]\nmovement_frames = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = Config::from_toml_str("[spawn]\nfour_probability = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = Config::from_toml_str("[rules]\nwin_value = 100\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = Config::from_toml_str("[spawn]\ninitial_tiles = 17\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn it_reports_parse_errors() {
        let err = Config::from_toml_str("[timing\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
