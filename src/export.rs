//! Export of finished scans.
//!
//! Produces a self-contained JSON document for downstream consumers: the
//! resolved direction, the peak sample, the strongest headings, the full
//! intensity profile and summary statistics.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::pipeline::ScanPipeline;
use crate::types::{PolarPoint, ScanQuality, ScanResult, ScanStatus, SoundSample};

/// Complete report of one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Loudest bearing, absent when the scan failed.
    pub direction_deg: Option<f64>,
    pub status: ScanStatus,
    pub quality: ScanQuality,
    pub peak: Option<SoundSample>,
    /// Strongest headings, strongest first.
    pub top_headings: Vec<f64>,
    /// Intensity per heading, in arrival order.
    pub profile: Vec<PolarPoint>,
    pub summary: ScanSummary,
}

/// Aggregate statistics of a scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub sample_count: usize,
    /// Unwrapped distance turned (degrees).
    pub rotation_deg: f64,
    pub progress: f64,
    /// Noise floor when the scan stopped (dB).
    pub noise_floor_db: f32,
    pub mean_signal: f32,
    pub peak_signal: f32,
}

impl ScanReport {
    /// Build a report from a stopped pipeline and its result.
    pub fn from_scan<C: Clock>(pipeline: &ScanPipeline<C>, result: &ScanResult) -> Self {
        let samples = pipeline.samples();
        let mean_signal = if samples.is_empty() {
            0.0
        } else {
            samples.iter().map(|s| s.signal).sum::<f32>() / samples.len() as f32
        };

        Self {
            direction_deg: result.direction_deg,
            status: result.status,
            quality: result.quality,
            peak: result.peak,
            top_headings: pipeline.top_headings().to_vec(),
            profile: pipeline.polar_profile().to_vec(),
            summary: ScanSummary {
                sample_count: result.sample_count,
                rotation_deg: pipeline.accumulated_degrees(),
                progress: pipeline.progress(),
                noise_floor_db: pipeline.noise_floor(),
                mean_signal,
                peak_signal: result.peak.map(|s| s.signal).unwrap_or(0.0),
            },
        }
    }

    /// Pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Single-line JSON.
    pub fn to_compact_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Report without the per-sample profile, for constrained transports.
    pub fn without_profile(&self) -> Self {
        Self {
            profile: Vec::new(),
            ..self.clone()
        }
    }
}
