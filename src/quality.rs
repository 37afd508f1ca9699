//! Per-tick scan quality classification.
//!
//! Rules are evaluated in order and the first match wins:
//! 1. rotation rate above the limit → `TooFast` (Bad), tick discarded
//! 2. leaving the too-fast state restores the normal scanning status
//! 3. noise floor above the noisy threshold → `TooNoisy` (Warning)
//! 4. signal below the detection minimum → `TooQuiet` (Warning)
//! 5. otherwise → `Good` (Normal)
//!
//! Only rule 1 blocks storage. The too-fast status is sticky: it is held as a
//! typed phase and cleared by the next slow enough tick.

use crate::config::ScanConfig;
use crate::types::{ScanQuality, ScanStatus};

/// Sticky sub-state of an active scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanningPhase {
    Scanning,
    TooFast,
}

impl From<ScanningPhase> for ScanStatus {
    fn from(phase: ScanningPhase) -> Self {
        match phase {
            ScanningPhase::Scanning => ScanStatus::Scanning,
            ScanningPhase::TooFast => ScanStatus::TooFast,
        }
    }
}

/// Outcome of assessing one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityVerdict {
    /// Store the sample; quality is advisory.
    Accept(ScanQuality),
    /// Discard the tick.
    Reject(ScanQuality),
}

impl QualityVerdict {
    pub fn quality(&self) -> ScanQuality {
        match self {
            QualityVerdict::Accept(q) | QualityVerdict::Reject(q) => *q,
        }
    }
}

/// Classifies scan conditions from rotation rate, noise floor and signal.
#[derive(Debug, Clone)]
pub struct QualityAssessor {
    max_rotation_rate: f64,
    noisy_floor_threshold: f32,
    min_detected_signal: f32,
    phase: ScanningPhase,
}

impl QualityAssessor {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            max_rotation_rate: config.max_rotation_rate,
            noisy_floor_threshold: config.noisy_floor_threshold,
            min_detected_signal: config.min_detected_signal,
            phase: ScanningPhase::Scanning,
        }
    }

    /// Classify one post-calibration tick.
    pub fn assess(&mut self, rotation_rate: f64, noise_floor: f32, signal: f32) -> QualityVerdict {
        if rotation_rate > self.max_rotation_rate {
            if self.phase != ScanningPhase::TooFast {
                log::debug!("rotation too fast: {:.2} rad/s", rotation_rate);
            }
            self.phase = ScanningPhase::TooFast;
            return QualityVerdict::Reject(ScanQuality::TooFast);
        }

        if self.phase == ScanningPhase::TooFast {
            log::debug!("rotation back under limit");
            self.phase = ScanningPhase::Scanning;
        }

        let quality = if noise_floor > self.noisy_floor_threshold {
            ScanQuality::TooNoisy
        } else if signal < self.min_detected_signal {
            ScanQuality::TooQuiet
        } else {
            ScanQuality::Good
        };
        QualityVerdict::Accept(quality)
    }

    /// Current sticky phase.
    pub fn phase(&self) -> ScanningPhase {
        self.phase
    }

    /// Status line implied by the current phase.
    pub fn status(&self) -> ScanStatus {
        self.phase.into()
    }

    pub fn reset(&mut self) {
        self.phase = ScanningPhase::Scanning;
    }
}
