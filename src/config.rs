use crate::grid::Dimensions;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Default grid size on startup
pub const DEFAULT_ROWS: usize = 30;
pub const DEFAULT_COLS: usize = 30;

/// A random cell is alive when a uniform draw lands above this threshold
pub const RANDOM_THRESHOLD: f64 = 0.8;
/// Probability of a cell being alive in a randomized grid
pub const DEFAULT_ALIVE_PROBABILITY: f64 = 1.0 - RANDOM_THRESHOLD;

/// Generation speed presets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Speed {
    pub const ALL: [Speed; 3] = [Speed::Slow, Speed::Medium, Speed::Fast];

    pub fn label(&self) -> &'static str {
        match self {
            Speed::Slow => "slow",
            Speed::Medium => "medium",
            Speed::Fast => "fast",
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tick interval in milliseconds for each speed preset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedPresets {
    pub slow_ms: u64,
    pub medium_ms: u64,
    pub fast_ms: u64,
}

impl Default for SpeedPresets {
    fn default() -> Self {
        Self {
            slow_ms: 1000,
            medium_ms: 500,
            fast_ms: 100,
        }
    }
}

impl SpeedPresets {
    pub fn interval_ms(&self, speed: Speed) -> u64 {
        match speed {
            Speed::Slow => self.slow_ms,
            Speed::Medium => self.medium_ms,
            Speed::Fast => self.fast_ms,
        }
    }

    pub fn interval(&self, speed: Speed) -> Duration {
        Duration::from_millis(self.interval_ms(speed))
    }
}

/// Everything the simulation controller needs at construction
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub dimensions: Dimensions,
    pub speed: Speed,
    pub presets: SpeedPresets,
    pub alive_probability: f64,
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::new(DEFAULT_ROWS, DEFAULT_COLS),
            speed: Speed::default(),
            presets: SpeedPresets::default(),
            alive_probability: DEFAULT_ALIVE_PROBABILITY,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_startup_state() {
        let config = SimConfig::default();
        assert_eq!(config.dimensions, Dimensions::new(30, 30));
        assert_eq!(config.speed, Speed::Medium);
        assert!((config.alive_probability - 0.2).abs() < 1e-9);
    }

    #[test]
    fn preset_intervals() {
        let presets = SpeedPresets::default();
        assert_eq!(presets.interval(Speed::Slow), Duration::from_millis(1000));
        assert_eq!(presets.interval(Speed::Medium), Duration::from_millis(500));
        assert_eq!(presets.interval(Speed::Fast), Duration::from_millis(100));
    }

    #[test]
    fn speed_labels_round_trip_through_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            speed: Speed,
        }
        for speed in Speed::ALL {
            let parsed: Wrapper = toml::from_str(&format!("speed = \"{speed}\"")).unwrap();
            assert_eq!(parsed.speed, speed);
        }
    }
}
