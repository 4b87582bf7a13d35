use crate::config::{SimConfig, Speed};
use crate::error::{Error, Result};
use crate::grid::Dimensions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub simulation: SimulationSettings,
}

/// `[simulation]` table; every key is optional and overrides the built-in default
#[derive(Debug, Default, Deserialize)]
pub struct SimulationSettings {
    pub rows: Option<i64>,
    pub cols: Option<i64>,
    pub speed: Option<Speed>,
    pub alive_probability: Option<f64>,
    pub slow_ms: Option<u64>,
    pub medium_ms: Option<u64>,
    pub fast_ms: Option<u64>,
}

impl Settings {
    /// Load the user config file. A missing file yields defaults; an unreadable
    /// or malformed one is logged and also yields defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let loaded = fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|content| Self::parse(&content));
        match loaded {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring settings file");
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termlife")
            .join("config.toml")
    }

    /// Validate the file's overrides onto `config`. Nothing is applied on error.
    pub fn apply(&self, config: &SimConfig) -> Result<SimConfig> {
        let sim = &self.simulation;
        let mut next = config.clone();

        if sim.rows.is_some() || sim.cols.is_some() {
            next.dimensions = Dimensions::clamped(
                sim.rows.unwrap_or(config.dimensions.rows as i64),
                sim.cols.unwrap_or(config.dimensions.cols as i64),
            )?;
        }
        if let Some(speed) = sim.speed {
            next.speed = speed;
        }
        if let Some(p) = sim.alive_probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidProbability(p));
            }
            next.alive_probability = p;
        }

        for (name, value, slot) in [
            ("slow_ms", sim.slow_ms, &mut next.presets.slow_ms),
            ("medium_ms", sim.medium_ms, &mut next.presets.medium_ms),
            ("fast_ms", sim.fast_ms, &mut next.presets.fast_ms),
        ] {
            match value {
                Some(0) => return Err(Error::Config(format!("{name} must be greater than 0"))),
                Some(ms) => *slot = ms,
                None => {}
            }
        }

        Ok(next)
    }
}
