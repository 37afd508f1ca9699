//! Core data types for the sound bearing engine.
//!
//! This module defines the values that flow through the scan pipeline: the
//! per-tick sensor input, the samples retained while scanning, the derived
//! profile points, and the typed status/quality/outcome enums that replace
//! free-form status strings.
//!
//! Design principle: if a concept exists, it gets a type. Callers branch on
//! enums, never on display text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One sampling tick delivered by the platform collaborators.
///
/// This is the minimal input contract: a compass heading, a relative loudness
/// reading from the microphone meter, and the magnitude of the device rotation
/// rate. Values are relative and device-dependent, never calibrated SPL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorTick {
    /// Compass heading in degrees, expected in [0, 360). 0 = magnetic north.
    pub heading_deg: f64,

    /// Raw meter level in dB (relative, typically -160..0).
    pub loudness_db: f32,

    /// Magnitude of the rotation-rate vector in rad/s.
    pub rotation_rate: f64,
}

impl SensorTick {
    /// Creates a new sensor tick.
    pub fn new(heading_deg: f64, loudness_db: f32, rotation_rate: f64) -> Self {
        Self {
            heading_deg,
            loudness_db,
            rotation_rate,
        }
    }

    /// Returns true when every field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.heading_deg.is_finite() && self.loudness_db.is_finite() && self.rotation_rate.is_finite()
    }
}

/// A tick accepted while actively scanning.
///
/// Immutable once created. Owned by the sample store for the lifetime of a
/// single scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundSample {
    /// Heading at which the sample was taken, in degrees [0, 360).
    pub heading_deg: f64,
    /// Meter level as delivered.
    pub raw_db: f32,
    /// EMA-smoothed level.
    pub smoothed_db: f32,
    /// Floor-adjusted, high-pass filtered strength. Never negative.
    pub signal: f32,
}

/// Heading/magnitude pair for intensity-vs-heading visualization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarPoint {
    pub heading_deg: f64,
    pub magnitude: f32,
}

impl From<&SoundSample> for PolarPoint {
    fn from(sample: &SoundSample) -> Self {
        Self {
            heading_deg: sample.heading_deg,
            magnitude: sample.signal,
        }
    }
}

/// Coarse severity of current scan conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanQualityLevel {
    /// Conditions are fine.
    Normal,
    /// Advisory: the sample is kept but conditions are poor.
    Warning,
    /// The tick was discarded.
    Bad,
}

/// Qualitative description of scan conditions.
///
/// Each variant maps to exactly one [`ScanQualityLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanQuality {
    Ready,
    Calibrating,
    Good,
    TooFast,
    TooNoisy,
    TooQuiet,
}

impl ScanQuality {
    /// Severity of this condition.
    pub fn level(&self) -> ScanQualityLevel {
        match self {
            ScanQuality::Ready | ScanQuality::Calibrating | ScanQuality::Good => {
                ScanQualityLevel::Normal
            }
            ScanQuality::TooNoisy | ScanQuality::TooQuiet => ScanQualityLevel::Warning,
            ScanQuality::TooFast => ScanQualityLevel::Bad,
        }
    }

    /// Short user-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            ScanQuality::Ready => "Ready",
            ScanQuality::Calibrating => "Calibrating",
            ScanQuality::Good => "Good",
            ScanQuality::TooFast => "Too fast",
            ScanQuality::TooNoisy => "Too noisy",
            ScanQuality::TooQuiet => "Too quiet",
        }
    }
}

impl fmt::Display for ScanQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle status of the scanner, shown to the user as a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanStatus {
    /// No scan has run yet.
    Ready,
    /// Stationary warm-up seeding the noise floor.
    Calibrating,
    /// Accepting samples.
    Scanning,
    /// Rotation exceeded the limit; sticky until a slow enough tick arrives.
    TooFast,
    /// Last scan resolved a direction.
    Complete,
    /// Last scan ended without a strong enough signal.
    TooQuiet,
}

impl ScanStatus {
    /// User-facing status line.
    pub fn message(&self) -> &'static str {
        match self {
            ScanStatus::Ready => "Ready",
            ScanStatus::Calibrating => "Calibrating... stay still",
            ScanStatus::Scanning => "Scanning... turn slowly 360°",
            ScanStatus::TooFast => "Scanning... slow down",
            ScanStatus::Complete => "Scan complete.",
            ScanStatus::TooQuiet => "Sound too quiet. Try again.",
        }
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Why a tick was not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    /// No scan is active.
    NotScanning,
    /// A reading was NaN or infinite.
    InvalidReading,
    /// Rotation rate above the configured maximum.
    TooFast,
}

/// Result of feeding one tick into the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Tick consumed by the calibration window.
    ///
    /// `completed` is true on the tick that closed the window and seeded the
    /// noise floor.
    Calibrating { smoothed_db: f32, completed: bool },
    /// Tick discarded.
    Rejected(RejectReason),
    /// Tick stored in the sample store.
    Accepted {
        sample: SoundSample,
        quality: ScanQuality,
    },
}

impl TickOutcome {
    /// Returns the stored sample, if any.
    pub fn sample(&self) -> Option<&SoundSample> {
        match self {
            TickOutcome::Accepted { sample, .. } => Some(sample),
            _ => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, TickOutcome::Accepted { .. })
    }
}

/// Final analysis of a finished scan.
///
/// A missing `direction_deg` is the failure signal; there is no error path
/// for a quiet scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Heading of the strongest sample, when it cleared the threshold.
    pub direction_deg: Option<f64>,
    /// Strongest sample seen, regardless of threshold.
    pub peak: Option<SoundSample>,
    /// Number of samples analyzed.
    pub sample_count: usize,
    /// Quality shown after analysis.
    pub quality: ScanQuality,
    /// Status shown after analysis.
    pub status: ScanStatus,
}

impl ScanResult {
    pub fn is_success(&self) -> bool {
        self.direction_deg.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_levels() {
        assert_eq!(ScanQuality::Good.level(), ScanQualityLevel::Normal);
        assert_eq!(ScanQuality::Calibrating.level(), ScanQualityLevel::Normal);
        assert_eq!(ScanQuality::TooNoisy.level(), ScanQualityLevel::Warning);
        assert_eq!(ScanQuality::TooQuiet.level(), ScanQualityLevel::Warning);
        assert_eq!(ScanQuality::TooFast.level(), ScanQualityLevel::Bad);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(ScanStatus::Scanning.to_string(), "Scanning... turn slowly 360°");
        assert_eq!(ScanStatus::TooFast.to_string(), "Scanning... slow down");
        assert_eq!(ScanStatus::TooQuiet.to_string(), "Sound too quiet. Try again.");
        assert_eq!(ScanQuality::TooFast.to_string(), "Too fast");
    }

    #[test]
    fn test_tick_finiteness() {
        assert!(SensorTick::new(10.0, -40.0, 0.1).is_finite());
        assert!(!SensorTick::new(f64::NAN, -40.0, 0.1).is_finite());
        assert!(!SensorTick::new(10.0, f32::NEG_INFINITY, 0.1).is_finite());
        assert!(!SensorTick::new(10.0, -40.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_polar_point_from_sample() {
        let sample = SoundSample {
            heading_deg: 42.0,
            raw_db: -30.0,
            smoothed_db: -32.0,
            signal: 7.5,
        };
        let point = PolarPoint::from(&sample);
        assert_eq!(point.heading_deg, 42.0);
        assert_eq!(point.magnitude, 7.5);
    }

    #[test]
    fn test_outcome_sample_accessor() {
        let rejected = TickOutcome::Rejected(RejectReason::TooFast);
        assert!(rejected.sample().is_none());
        assert!(!rejected.is_accepted());
    }
}
