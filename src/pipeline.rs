/// Complete scan pipeline integrating all per-tick processing stages.
///
/// This module orchestrates the data flow from raw sensor ticks through
/// smoothing, calibration, quality assessment and storage to produce the
/// live readouts and the final directional estimate.
///
/// # Architecture
///
/// Each tick is fully processed before the next is accepted:
/// 1. **Input policy**: reject non-finite readings, normalize heading
/// 2. **Smoothing**: EMA of the raw level (always, even while calibrating)
/// 3. **Calibration**: buffer levels until the warm-up window closes
/// 4. **Signal**: noise floor, floor adjustment, high-pass, clamp
/// 5. **Quality**: classify, possibly discard
/// 6. **Storage**: append sample, update progress, recompute derived views
///
/// `stop_scan` runs the result analysis once over the stored samples.
///
/// # Concurrency
/// Single sequential caller, no locks. Use [`crate::publish::SnapshotCell`]
/// to hand readouts to another thread.

use serde::Serialize;

use crate::aggregate::{analyze, DerivedAggregates, SampleStore};
use crate::calibration::{CalibrationController, CalibrationStep};
use crate::clock::{Clock, MonotonicClock};
use crate::config::ScanConfig;
use crate::error::{ConfigResult, ScanError};
use crate::heading::{normalize_heading, RotationProgressTracker};
use crate::quality::{QualityAssessor, QualityVerdict};
use crate::signal::SignalFilter;
use crate::types::*;

/// Meter level reported before the first reading (dB).
pub const SILENCE_DB: f32 = -160.0;

/// Lower bound of the live loudness meter (dB).
const METER_MIN_DB: f32 = -60.0;

/// Point-in-time copy of everything a presentation layer reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSnapshot {
    pub raw_db: f32,
    pub smoothed_db: f32,
    pub heading_deg: f64,
    pub scanning: bool,
    pub quality: ScanQuality,
    pub quality_level: ScanQualityLevel,
    pub status: ScanStatus,
    pub progress: f64,
    pub direction_deg: Option<f64>,
    pub top_headings: Vec<f64>,
    pub polar_profile: Vec<PolarPoint>,
    pub noise_floor_db: f32,
    pub sample_count: usize,
}

impl ScanSnapshot {
    /// Smoothed level mapped from [-60, 0] dB onto [0, 1] for a live meter.
    pub fn loudness_fraction(&self) -> f32 {
        let clamped = self.smoothed_db.clamp(METER_MIN_DB, 0.0);
        (clamped - METER_MIN_DB) / -METER_MIN_DB
    }

    pub fn status_text(&self) -> &'static str {
        self.status.message()
    }

    pub fn quality_text(&self) -> &'static str {
        self.quality.label()
    }
}

/// Stateful scan processor.
///
/// Owns all per-scan state. One instance per concurrent scan.
pub struct ScanPipeline<C: Clock = MonotonicClock> {
    config: ScanConfig,
    clock: C,

    // Processing stages
    filter: SignalFilter,
    calibration: CalibrationController,
    progress: RotationProgressTracker,
    quality_assessor: QualityAssessor,

    // Scan evidence
    store: SampleStore,
    derived: DerivedAggregates,

    // Published readouts
    scanning: bool,
    status: ScanStatus,
    quality: ScanQuality,
    direction_deg: Option<f64>,
    last_raw_db: f32,
    last_smoothed_db: f32,
    current_heading: f64,
}

impl ScanPipeline<MonotonicClock> {
    /// Creates a pipeline on the system monotonic clock.
    pub fn new(config: ScanConfig) -> ConfigResult<Self> {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> ScanPipeline<C> {
    /// Creates a pipeline with an injected clock.
    pub fn with_clock(config: ScanConfig, clock: C) -> ConfigResult<Self> {
        config.validate()?;

        Ok(Self {
            filter: SignalFilter::with_config(&config),
            calibration: CalibrationController::new(
                config.calibration_duration(),
                config.default_noise_floor,
            ),
            progress: RotationProgressTracker::new(),
            quality_assessor: QualityAssessor::new(&config),
            store: SampleStore::new(),
            derived: DerivedAggregates::default(),
            scanning: false,
            status: ScanStatus::Ready,
            quality: ScanQuality::Ready,
            direction_deg: None,
            last_raw_db: SILENCE_DB,
            last_smoothed_db: SILENCE_DB,
            current_heading: 0.0,
            config,
            clock,
        })
    }

    /// Begins a new scan, clearing all state from any previous one.
    pub fn start_scan(&mut self) {
        if self.scanning {
            log::warn!("start_scan while a scan is active; restarting");
        }

        self.store.clear();
        self.derived.clear();
        self.filter.reset();
        self.progress.reset();
        self.quality_assessor.reset();
        self.calibration.begin(self.clock.now());

        self.direction_deg = None;
        self.scanning = true;
        self.status = ScanStatus::Calibrating;
        self.quality = ScanQuality::Calibrating;

        log::info!(
            "scan started; calibrating for {:.1}s",
            self.config.calibration_duration_secs
        );
    }

    /// Ends the scan and analyzes the stored samples.
    ///
    /// A quiet scan is not an error: check [`ScanResult::direction_deg`].
    pub fn stop_scan(&mut self) -> Result<ScanResult, ScanError> {
        if !self.scanning {
            return Err(ScanError::NotScanning);
        }

        self.scanning = false;
        self.calibration.cancel();

        let result = analyze(&self.store, self.config.min_detected_signal);
        self.direction_deg = result.direction_deg;
        self.status = result.status;
        self.quality = result.quality;

        match result.direction_deg {
            Some(direction) => log::info!(
                "scan complete: loudest at {:.1}° from {} samples",
                direction,
                result.sample_count
            ),
            None => log::info!(
                "scan failed: peak signal {:.2} from {} samples",
                result.peak.map(|s| s.signal).unwrap_or(0.0),
                result.sample_count
            ),
        }

        Ok(result)
    }

    /// Processes a single sensor tick through the entire pipeline.
    pub fn ingest(&mut self, tick: &SensorTick) -> TickOutcome {
        if !tick.is_finite() {
            log::warn!("discarding non-finite tick: {:?}", tick);
            return TickOutcome::Rejected(RejectReason::InvalidReading);
        }

        let heading = normalize_heading(tick.heading_deg);
        let rotation_rate = tick.rotation_rate.abs();
        self.current_heading = heading;

        if !self.scanning {
            return TickOutcome::Rejected(RejectReason::NotScanning);
        }

        // Stage 1: smoothing
        let smoothed = self.filter.process(tick.loudness_db);
        self.last_raw_db = tick.loudness_db;
        self.last_smoothed_db = smoothed;

        // Stage 2: calibration gate
        match self.calibration.observe(smoothed, self.clock.now()) {
            CalibrationStep::Collecting => {
                self.status = ScanStatus::Calibrating;
                self.quality = ScanQuality::Calibrating;
                return TickOutcome::Calibrating {
                    smoothed_db: smoothed,
                    completed: false,
                };
            }
            CalibrationStep::Completed { noise_floor, .. } => {
                self.filter.seed_noise_floor(noise_floor);
                self.status = ScanStatus::Scanning;
                self.quality = ScanQuality::Good;
                return TickOutcome::Calibrating {
                    smoothed_db: smoothed,
                    completed: true,
                };
            }
            CalibrationStep::Inactive => {}
        }

        // Stage 3: signal strength
        let reading = self.filter.signal(smoothed);

        // Stage 4: quality
        let verdict = self
            .quality_assessor
            .assess(rotation_rate, reading.noise_floor, reading.signal);
        self.status = self.quality_assessor.status();
        self.quality = verdict.quality();

        let quality = match verdict {
            QualityVerdict::Reject(_) => {
                return TickOutcome::Rejected(RejectReason::TooFast);
            }
            QualityVerdict::Accept(quality) => quality,
        };

        // Stage 5: storage and derived views
        let sample = SoundSample {
            heading_deg: heading,
            raw_db: tick.loudness_db,
            smoothed_db: smoothed,
            signal: reading.signal,
        };
        self.store.push(sample);
        self.progress.update(heading);
        self.derived
            .recompute(&self.store, self.config.top_heading_count);

        log::trace!(
            "sample #{} heading={:.1} signal={:.2} floor={:.2} quality={:?}",
            self.store.len(),
            heading,
            reading.signal,
            reading.noise_floor,
            quality
        );

        TickOutcome::Accepted { sample, quality }
    }

    /// Copies every readout into a snapshot.
    pub fn snapshot(&self) -> ScanSnapshot {
        ScanSnapshot {
            raw_db: self.last_raw_db,
            smoothed_db: self.last_smoothed_db,
            heading_deg: self.current_heading,
            scanning: self.scanning,
            quality: self.quality,
            quality_level: self.quality.level(),
            status: self.status,
            progress: self.progress.progress(),
            direction_deg: self.direction_deg,
            top_headings: self.derived.top_headings.clone(),
            polar_profile: self.derived.polar_profile.clone(),
            noise_floor_db: self.filter.noise_floor(),
            sample_count: self.store.len(),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibration.is_calibrating()
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn quality(&self) -> ScanQuality {
        self.quality
    }

    pub fn quality_level(&self) -> ScanQualityLevel {
        self.quality.level()
    }

    /// Completion of the sweep in [0, 1].
    pub fn progress(&self) -> f64 {
        self.progress.progress()
    }

    /// Unwrapped distance traveled this scan, in degrees.
    pub fn accumulated_degrees(&self) -> f64 {
        self.progress.accumulated_degrees()
    }

    /// Resolved direction of the last finished scan.
    pub fn direction(&self) -> Option<f64> {
        self.direction_deg
    }

    pub fn top_headings(&self) -> &[f64] {
        &self.derived.top_headings
    }

    pub fn polar_profile(&self) -> &[PolarPoint] {
        &self.derived.polar_profile
    }

    pub fn samples(&self) -> &[SoundSample] {
        self.store.samples()
    }

    pub fn sample_count(&self) -> usize {
        self.store.len()
    }

    pub fn noise_floor(&self) -> f32 {
        self.filter.noise_floor()
    }

    pub fn last_raw_db(&self) -> f32 {
        self.last_raw_db
    }

    pub fn last_smoothed_db(&self) -> f32 {
        self.last_smoothed_db
    }

    pub fn current_heading(&self) -> f64 {
        self.current_heading
    }
}
