//! Tunable constants for a scan.
//!
//! Defaults reproduce the tuning used on phones with a 50 ms sampling tick.
//! Every value can be overridden from JSON; missing keys fall back to the
//! defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Parameters for the filter pipeline, calibration and quality checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// EMA coefficient for loudness smoothing. Range: (0.0, 1.0].
    pub ema_alpha: f32,

    /// Noise-floor coefficient when the level drops below the floor.
    /// Fast so the floor hugs quiet minima.
    pub noise_floor_down_alpha: f32,

    /// Noise-floor coefficient when the level is at or above the floor.
    /// Slow so transient loud events do not drag the floor up.
    pub noise_floor_up_alpha: f32,

    /// First-order high-pass coefficient. Range: (0.0, 1.0).
    pub high_pass_alpha: f32,

    /// Minimum signal strength for a usable detection.
    /// Ticks below this are flagged "too quiet"; a scan whose peak does not
    /// exceed it fails.
    pub min_detected_signal: f32,

    /// Stationary warm-up window measured from scan start (seconds).
    pub calibration_duration_secs: f64,

    /// Rotation-rate magnitude above which ticks are discarded (rad/s).
    pub max_rotation_rate: f64,

    /// Noise floor above which the environment is flagged as noisy (dB).
    pub noisy_floor_threshold: f32,

    /// Floor used before calibration and when calibration saw no ticks (dB).
    pub default_noise_floor: f32,

    /// How many of the strongest headings to publish.
    pub top_heading_count: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ema_alpha: 0.2,
            noise_floor_down_alpha: 0.2,
            noise_floor_up_alpha: 0.02,
            high_pass_alpha: 0.9,
            min_detected_signal: 3.0,
            calibration_duration_secs: 1.5,
            max_rotation_rate: 2.0,
            noisy_floor_threshold: -35.0,
            default_noise_floor: -60.0,
            top_heading_count: 3,
        }
    }
}

impl ScanConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: ScanConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Calibration window as a [`Duration`].
    ///
    /// Saturates at [`Duration::MAX`] for values `validate` would reject.
    pub fn calibration_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.calibration_duration_secs).unwrap_or(Duration::MAX)
    }

    /// Check every parameter against its valid range.
    pub fn validate(&self) -> ConfigResult<()> {
        check_unit_interval("ema_alpha", self.ema_alpha)?;
        check_unit_interval("noise_floor_down_alpha", self.noise_floor_down_alpha)?;
        check_unit_interval("noise_floor_up_alpha", self.noise_floor_up_alpha)?;

        if !(self.high_pass_alpha > 0.0 && self.high_pass_alpha < 1.0) {
            return Err(invalid(
                "high_pass_alpha",
                format!("must be in (0, 1), got {}", self.high_pass_alpha),
            ));
        }
        if !self.min_detected_signal.is_finite() || self.min_detected_signal < 0.0 {
            return Err(invalid(
                "min_detected_signal",
                format!("must be finite and >= 0, got {}", self.min_detected_signal),
            ));
        }
        if Duration::try_from_secs_f64(self.calibration_duration_secs).is_err() {
            return Err(invalid(
                "calibration_duration_secs",
                format!(
                    "must be a non-negative duration in range, got {}",
                    self.calibration_duration_secs
                ),
            ));
        }
        if !self.max_rotation_rate.is_finite() || self.max_rotation_rate <= 0.0 {
            return Err(invalid(
                "max_rotation_rate",
                format!("must be finite and > 0, got {}", self.max_rotation_rate),
            ));
        }
        if !self.noisy_floor_threshold.is_finite() {
            return Err(invalid("noisy_floor_threshold", "must be finite".to_string()));
        }
        if !self.default_noise_floor.is_finite() {
            return Err(invalid("default_noise_floor", "must be finite".to_string()));
        }
        Ok(())
    }
}

fn check_unit_interval(name: &'static str, value: f32) -> ConfigResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(name, format!("must be in (0, 1], got {value}")))
    }
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidParameter { name, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.ema_alpha, 0.2);
        assert_eq!(config.noise_floor_down_alpha, 0.2);
        assert_eq!(config.noise_floor_up_alpha, 0.02);
        assert_eq!(config.high_pass_alpha, 0.9);
        assert_eq!(config.min_detected_signal, 3.0);
        assert_eq!(config.calibration_duration(), Duration::from_millis(1500));
        assert_eq!(config.max_rotation_rate, 2.0);
        assert_eq!(config.noisy_floor_threshold, -35.0);
        assert_eq!(config.top_heading_count, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ScanConfig::from_json(r#"{ "max_rotation_rate": 1.5 }"#).unwrap();
        assert_eq!(config.max_rotation_rate, 1.5);
        assert_eq!(config.ema_alpha, 0.2);
    }

    #[test]
    fn test_json_round_trip_preserves_values() {
        let mut config = ScanConfig::default();
        config.top_heading_count = 5;
        let json = config.to_json().unwrap();
        assert_eq!(ScanConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_alpha() {
        let err = ScanConfig::from_json(r#"{ "ema_alpha": 0.0 }"#).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(err.to_string().contains("ema_alpha"));
    }

    #[test]
    fn test_rejects_high_pass_of_one() {
        let config = ScanConfig {
            high_pass_alpha: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_calibration() {
        let config = ScanConfig {
            calibration_duration_secs: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_huge_calibration() {
        let err = ScanConfig::from_json(r#"{ "calibration_duration_secs": 1e30 }"#).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(err.to_string().contains("calibration_duration_secs"));

        let config = ScanConfig {
            calibration_duration_secs: 1e30,
            ..Default::default()
        };
        assert_eq!(config.calibration_duration(), Duration::MAX);
        assert!(crate::pipeline::ScanPipeline::new(config).is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = ScanConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
