use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use super::detector_types::{MOVING_DETECTOR, STILL_DETECTOR};

/// Environment variable pointing at an optional TOML configuration file
pub const CONFIG_PATH_ENV: &str = "POSE_DETECTOR_CONFIG";

/// Pose detector parameters, loaded once at startup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Number of velocity samples a window must hold before it is evaluated
    pub window_length: usize,
    /// Velocity magnitude separating "still" from "moving"
    pub movement_threshold: f64,
    /// Detector active when the node starts
    #[serde(default = "default_initial_detector")]
    pub initial_detector: String,
}

fn default_initial_detector() -> String {
    STILL_DETECTOR.to_string()
}

impl DetectorConfig {
    pub fn new(window_length: usize, movement_threshold: f64) -> Self {
        Self {
            window_length,
            movement_threshold,
            initial_detector: default_initial_detector(),
        }
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Couldn't read config file {}", path))?;
        let config: DetectorConfig = toml::from_str(&content)
            .wrap_err_with(|| format!("Invalid config file {}", path))?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// `WINDOW_LENGTH` and `MOVEMENT_THRESHOLD` are required,
    /// `INITIAL_DETECTOR` is optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let window_length = lookup("WINDOW_LENGTH")
            .ok_or_else(|| eyre::eyre!("Missing WINDOW_LENGTH"))?
            .trim()
            .parse::<usize>()
            .context("Invalid WINDOW_LENGTH")?;

        let movement_threshold = lookup("MOVEMENT_THRESHOLD")
            .ok_or_else(|| eyre::eyre!("Missing MOVEMENT_THRESHOLD"))?
            .trim()
            .parse::<f64>()
            .context("Invalid MOVEMENT_THRESHOLD")?;

        let initial_detector = lookup("INITIAL_DETECTOR").unwrap_or_else(default_initial_detector);

        Ok(Self {
            window_length,
            movement_threshold,
            initial_detector,
        })
    }

    /// Load from the file named by `POSE_DETECTOR_CONFIG` if set, otherwise
    /// from the environment, and validate the result.
    pub fn load() -> Result<Self> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load_from_file(&path)?,
            Err(_) => Self::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_length == 0 {
            return Err(eyre::eyre!("window_length must be positive"));
        }

        if !self.movement_threshold.is_finite() || self.movement_threshold <= 0.0 {
            return Err(eyre::eyre!(
                "movement_threshold must be a positive number, got {}",
                self.movement_threshold
            ));
        }

        if self.initial_detector != STILL_DETECTOR && self.initial_detector != MOVING_DETECTOR {
            return Err(eyre::eyre!(
                "Unknown initial detector '{}' (expected {} or {})",
                self.initial_detector,
                STILL_DETECTOR,
                MOVING_DETECTOR
            ));
        }

        Ok(())
    }
}
