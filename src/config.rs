//! Process configuration loaded from environment variables.

use crate::error::{Result, VidError};
use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

/// Default Runway API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.runwayml.com/v1";

/// Resolutions the service accepts, as "WxH" strings.
pub const SUPPORTED_RESOLUTIONS: &[&str] =
    &["1280x768", "1920x1080", "768x1280", "1080x1920"];

/// Validation limits for generation parameters.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Allowed video duration range in seconds.
    pub duration_secs: RangeInclusive<u32>,
    /// Allowed motion strength range.
    pub motion_strength: RangeInclusive<f32>,
    /// Resolutions the service accepts.
    pub supported_resolutions: Vec<String>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            duration_secs: 1..=10,
            motion_strength: 0.0..=1.0,
            supported_resolutions: SUPPORTED_RESOLUTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Application configuration, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer credential for the generation and status endpoints.
    pub api_key: String,
    /// Base URL of the generation service.
    pub api_base: String,
    /// Default resolution when the caller does not pick one.
    pub default_resolution: String,
    /// Default video duration in seconds.
    pub default_duration: u32,
    /// Default motion strength.
    pub default_motion_strength: f32,
    /// Maximum time to wait for a job to finish.
    pub max_wait: Duration,
    /// Directory where downloaded videos land.
    pub output_dir: PathBuf,
    /// Parameter validation limits.
    pub limits: Limits,
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// Reads a `.env` file if one exists. `RUNWAY_API_KEY` is required;
    /// everything else falls back to the defaults the service documents:
    /// - `RUNWAY_API_BASE` (default `https://api.runwayml.com/v1`)
    /// - `DEFAULT_RESOLUTION` (default `1280x768`)
    /// - `DEFAULT_DURATION` (default `4`)
    /// - `DEFAULT_MOTION_STRENGTH` (default `0.8`)
    /// - `MAX_WAIT_TIME` in seconds (default `300`)
    /// - `OUTPUT_DIR` (default `generated_videos`)
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let api_key = env::var("RUNWAY_API_KEY").map_err(|_| {
            VidError::Validation("RUNWAY_API_KEY must be set in .env or environment".into())
        })?;

        let config = Self {
            api_key,
            api_base: env::var("RUNWAY_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into()),
            default_resolution: env::var("DEFAULT_RESOLUTION")
                .unwrap_or_else(|_| "1280x768".into()),
            default_duration: env::var("DEFAULT_DURATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4),
            default_motion_strength: env::var("DEFAULT_MOTION_STRENGTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.8),
            max_wait: Duration::from_secs(
                env::var("MAX_WAIT_TIME")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("generated_videos")),
            limits: Limits::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks that the configured defaults respect their own limits.
    pub fn validate(&self) -> Result<()> {
        if !self
            .limits
            .supported_resolutions
            .iter()
            .any(|r| r == &self.default_resolution)
        {
            return Err(VidError::Validation(format!(
                "unsupported default resolution: {}",
                self.default_resolution
            )));
        }
        if !self.limits.duration_secs.contains(&self.default_duration) {
            return Err(VidError::Validation(format!(
                "default duration {} outside {:?}",
                self.default_duration, self.limits.duration_secs
            )));
        }
        if !self
            .limits
            .motion_strength
            .contains(&self.default_motion_strength)
        {
            return Err(VidError::Validation(format!(
                "default motion strength {} outside {:?}",
                self.default_motion_strength, self.limits.motion_strength
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api_key: "rw-test".into(),
            api_base: DEFAULT_API_BASE.into(),
            default_resolution: "1280x768".into(),
            default_duration: 4,
            default_motion_strength: 0.8,
            max_wait: Duration::from_secs(300),
            output_dir: PathBuf::from("generated_videos"),
            limits: Limits::default(),
        }
    }

    #[test]
    fn test_valid_defaults() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_unsupported_default_resolution() {
        let mut config = test_config();
        config.default_resolution = "640x480".into();
        assert!(matches!(
            config.validate(),
            Err(VidError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_default_duration() {
        let mut config = test_config();
        config.default_duration = 30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_default_motion() {
        let mut config = test_config();
        config.default_motion_strength = 1.5;
        assert!(config.validate().is_err());
    }
}
