//! Deterministic synthetic scans.
//!
//! Models a room with uniform ambient loudness and one directional source,
//! and a user who holds still for the calibration window and then turns at a
//! constant speed. Used by the demo binary and end-to-end tests; no randomness
//! so results are reproducible.

use std::time::Duration;

use crate::clock::ManualClock;
use crate::heading::normalize_heading;
use crate::pipeline::ScanPipeline;
use crate::types::{SensorTick, TickOutcome};

/// A room with one directional sound source.
#[derive(Debug, Clone)]
pub struct SyntheticRoom {
    /// Bearing of the source in degrees.
    pub source_bearing_deg: f64,
    /// Ambient level everywhere (dB).
    pub ambient_db: f32,
    /// Extra level when facing the source (dB).
    pub source_gain_db: f32,
    /// Exponent of the cosine lobe; higher = narrower.
    pub lobe_sharpness: i32,
    /// Amplitude of a deterministic meter ripple (dB).
    pub ripple_db: f32,
    /// Sampling cadence.
    pub tick_interval: Duration,
    /// Turning speed after the hold (degrees per second).
    pub rotation_speed_dps: f64,
    /// Heading during the hold and at the start of the turn.
    pub start_heading_deg: f64,
    /// Stationary period before turning.
    pub hold: Duration,
}

impl Default for SyntheticRoom {
    fn default() -> Self {
        Self {
            source_bearing_deg: 135.0,
            ambient_db: -50.0,
            source_gain_db: 30.0,
            lobe_sharpness: 8,
            ripple_db: 0.3,
            tick_interval: Duration::from_millis(50),
            rotation_speed_dps: 30.0,
            start_heading_deg: 0.0,
            hold: Duration::from_millis(1600),
        }
    }
}

impl SyntheticRoom {
    /// Meter level heard when facing `heading_deg`, before ripple.
    pub fn loudness_at(&self, heading_deg: f64) -> f32 {
        let offset = (heading_deg - self.source_bearing_deg).to_radians();
        let lobe = offset.cos().max(0.0).powi(self.lobe_sharpness);
        self.ambient_db + self.source_gain_db * lobe as f32
    }

    /// Ticks for the hold followed by `turns` full rotations.
    ///
    /// A zero `tick_interval` yields no ticks.
    pub fn sweep(&self, turns: f64) -> Vec<SensorTick> {
        let dt = self.tick_interval.as_secs_f64();
        if dt <= 0.0 {
            return Vec::new();
        }
        let hold_ticks = (self.hold.as_secs_f64() / dt).ceil() as usize;
        let step_deg = self.rotation_speed_dps * dt;
        let turn_ticks = if step_deg > 0.0 {
            (turns * 360.0 / step_deg).ceil() as usize
        } else {
            0
        };
        let rotation_rate = self.rotation_speed_dps.to_radians();

        let mut ticks = Vec::with_capacity(hold_ticks + turn_ticks);
        for i in 0..hold_ticks {
            let heading = self.start_heading_deg;
            ticks.push(SensorTick::new(heading, self.level(heading, i), 0.0));
        }
        for i in 1..=turn_ticks {
            let heading = normalize_heading(self.start_heading_deg + step_deg * i as f64);
            ticks.push(SensorTick::new(
                heading,
                self.level(heading, hold_ticks + i),
                rotation_rate,
            ));
        }
        ticks
    }

    fn level(&self, heading_deg: f64, index: usize) -> f32 {
        let ripple = self.ripple_db * (index as f32 * 0.7).sin();
        self.loudness_at(heading_deg) + ripple
    }
}

/// Feed ticks into a pipeline, advancing `clock` by `interval` before each.
///
/// Returns the outcome of every tick in order.
pub fn replay(
    pipeline: &mut ScanPipeline<ManualClock>,
    clock: &ManualClock,
    ticks: &[SensorTick],
    interval: Duration,
) -> Vec<TickOutcome> {
    ticks
        .iter()
        .map(|tick| {
            clock.advance(interval);
            pipeline.ingest(tick)
        })
        .collect()
}
