//! Loudness filtering and noise-floor tracking.
//!
//! This module provides the per-tick smoothing chain:
//! - Exponential moving average of the raw meter level
//! - Asymmetric noise-floor tracker (falls fast, rises slowly)
//! - First-order high-pass on the floor-adjusted level
//! - Clamping to a non-negative signal strength
//!
//! All filters use incremental updates (O(1) per tick). No history buffers.
//!
//! The high-pass stage removes slow drift so that only transient loudness
//! rising above the ambient floor counts as signal.

use crate::config::ScanConfig;

/// Exponential moving average with a lazily seeded state.
#[derive(Debug, Clone)]
pub struct EmaSmoother {
    alpha: f32,
    value: Option<f32>,
}

impl EmaSmoother {
    pub fn new(alpha: f32) -> Self {
        Self { alpha, value: None }
    }

    /// Feed one value and return the smoothed output.
    ///
    /// The first call passes its input through and seeds the state:
    /// s = α*x + (1-α)*s_prev afterwards.
    pub fn update(&mut self, input: f32) -> f32 {
        let next = match self.value {
            Some(prev) => self.alpha * input + (1.0 - self.alpha) * prev,
            None => input,
        };
        self.value = Some(next);
        next
    }

    /// Current smoothed value, if any input has been seen.
    pub fn value(&self) -> Option<f32> {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}

/// Adaptive ambient baseline.
///
/// Tracks downward with `down_alpha` and upward with `up_alpha`, so the floor
/// hugs quiet minima and resists being dragged up by loud events.
#[derive(Debug, Clone)]
pub struct NoiseFloorTracker {
    floor: f32,
    down_alpha: f32,
    up_alpha: f32,
    initial: f32,
}

impl NoiseFloorTracker {
    pub fn new(initial: f32, down_alpha: f32, up_alpha: f32) -> Self {
        Self {
            floor: initial,
            down_alpha,
            up_alpha,
            initial,
        }
    }

    /// Move the floor toward `level` and return the new floor.
    pub fn update(&mut self, level: f32) -> f32 {
        let alpha = if level < self.floor {
            self.down_alpha
        } else {
            self.up_alpha
        };
        self.floor = alpha * level + (1.0 - alpha) * self.floor;
        self.floor
    }

    /// Overwrite the floor (calibration hand-off).
    pub fn seed(&mut self, floor: f32) {
        self.floor = floor;
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Restore the pre-calibration default.
    pub fn reset(&mut self) {
        self.floor = self.initial;
    }
}

/// First-order high-pass: y = β*(y_prev + x - x_prev).
#[derive(Debug, Clone)]
pub struct HighPassFilter {
    alpha: f32,
    prev_input: Option<f32>,
    prev_output: f32,
}

impl HighPassFilter {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            prev_input: None,
            prev_output: 0.0,
        }
    }

    /// Feed one value. The first call outputs 0 and only seeds the state.
    pub fn update(&mut self, input: f32) -> f32 {
        let output = match self.prev_input {
            Some(prev) => self.alpha * (self.prev_output + input - prev),
            None => 0.0,
        };
        self.prev_input = Some(input);
        self.prev_output = output;
        output
    }

    pub fn reset(&mut self) {
        self.prev_input = None;
        self.prev_output = 0.0;
    }
}

/// Intermediate values of one signal computation, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalReading {
    /// Noise floor after this tick's update.
    pub noise_floor: f32,
    /// Smoothed level minus floor.
    pub adjusted: f32,
    /// High-pass output before clamping.
    pub high_pass: f32,
    /// max(0, high_pass).
    pub signal: f32,
}

/// Complete filter chain owning all per-scan filter state.
///
/// Hot path. Reset at every scan start, mutated once per tick, never shared.
#[derive(Debug, Clone)]
pub struct SignalFilter {
    ema: EmaSmoother,
    noise_floor: NoiseFloorTracker,
    high_pass: HighPassFilter,
}

impl SignalFilter {
    /// Create a filter chain with default configuration.
    pub fn new() -> Self {
        Self::with_config(&ScanConfig::default())
    }

    /// Create a filter chain with custom configuration.
    pub fn with_config(config: &ScanConfig) -> Self {
        Self {
            ema: EmaSmoother::new(config.ema_alpha),
            noise_floor: NoiseFloorTracker::new(
                config.default_noise_floor,
                config.noise_floor_down_alpha,
                config.noise_floor_up_alpha,
            ),
            high_pass: HighPassFilter::new(config.high_pass_alpha),
        }
    }

    /// Smooth a raw meter level. Always available, including during calibration.
    pub fn process(&mut self, raw_db: f32) -> f32 {
        self.ema.update(raw_db)
    }

    /// Derive signal strength from a smoothed level.
    ///
    /// Only valid once the noise floor has been seeded by calibration.
    pub fn signal(&mut self, smoothed_db: f32) -> SignalReading {
        let noise_floor = self.noise_floor.update(smoothed_db);
        let adjusted = smoothed_db - noise_floor;
        let high_pass = self.high_pass.update(adjusted);
        // Written as a comparison so that -0.0 and NaN both land on +0.0.
        let signal = if high_pass > 0.0 { high_pass } else { 0.0 };

        SignalReading {
            noise_floor,
            adjusted,
            high_pass,
            signal,
        }
    }

    /// Seed the noise floor from a calibration baseline.
    pub fn seed_noise_floor(&mut self, floor: f32) {
        self.noise_floor.seed(floor);
    }

    pub fn noise_floor(&self) -> f32 {
        self.noise_floor.floor()
    }

    /// Last smoothed level, if any.
    pub fn smoothed(&self) -> Option<f32> {
        self.ema.value()
    }

    /// Clear all filter state for a new scan.
    pub fn reset(&mut self) {
        self.ema.reset();
        self.noise_floor.reset();
        self.high_pass.reset();
    }
}

impl Default for SignalFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_first_value_passes_through() {
        let mut ema = EmaSmoother::new(0.2);
        assert_eq!(ema.value(), None);
        assert_eq!(ema.update(-42.0), -42.0);
        // 0.2 * -32 + 0.8 * -42 = -40
        assert!((ema.update(-32.0) + 40.0).abs() < 1e-5);
    }

    #[test]
    fn test_ema_convergence() {
        let mut ema = EmaSmoother::new(0.2);
        ema.update(-80.0);
        let mut out = 0.0;
        for _ in 0..100 {
            out = ema.update(-25.0);
        }
        assert!((out + 25.0).abs() < 0.01, "EMA should converge to input, got {}", out);
    }

    #[test]
    fn test_noise_floor_asymmetry() {
        let mut down = NoiseFloorTracker::new(-40.0, 0.2, 0.02);
        let mut up = NoiseFloorTracker::new(-40.0, 0.2, 0.02);

        for _ in 0..10 {
            down.update(-50.0);
            up.update(-30.0);
        }

        let down_progress = (-40.0 - down.floor()).abs();
        let up_progress = (up.floor() + 40.0).abs();
        assert!(
            down_progress > up_progress * 3.0,
            "floor should fall faster ({}) than it rises ({})",
            down_progress,
            up_progress
        );
    }

    #[test]
    fn test_noise_floor_equal_level_uses_up_alpha() {
        let mut floor = NoiseFloorTracker::new(-40.0, 0.2, 0.02);
        floor.update(-40.0);
        assert_eq!(floor.floor(), -40.0);
    }

    #[test]
    fn test_noise_floor_seed_and_reset() {
        let mut floor = NoiseFloorTracker::new(-60.0, 0.2, 0.02);
        floor.seed(-41.0);
        assert_eq!(floor.floor(), -41.0);
        floor.reset();
        assert_eq!(floor.floor(), -60.0);
    }

    #[test]
    fn test_high_pass_first_call_is_zero() {
        let mut hp = HighPassFilter::new(0.9);
        assert_eq!(hp.update(21.0), 0.0);
        // 0.9 * (0 + 31 - 21) = 9
        assert!((hp.update(31.0) - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_high_pass_blocks_dc() {
        let mut hp = HighPassFilter::new(0.9);
        for _ in 0..50 {
            assert_eq!(hp.update(12.5), 0.0);
        }
    }

    #[test]
    fn test_high_pass_decays_after_step() {
        let mut hp = HighPassFilter::new(0.9);
        hp.update(0.0);
        let step = hp.update(10.0);
        let mut last = step;
        for _ in 0..20 {
            let next = hp.update(10.0);
            assert!(next < last);
            last = next;
        }
        assert!(last < 1.5);
    }

    #[test]
    fn test_signal_is_clamped_non_negative() {
        let mut filter = SignalFilter::new();
        filter.seed_noise_floor(-50.0);
        filter.signal(-20.0);
        let reading = filter.signal(-45.0);
        assert!(reading.high_pass < 0.0);
        assert_eq!(reading.signal, 0.0);
    }

    #[test]
    fn test_constant_input_gives_zero_signal() {
        let mut filter = SignalFilter::new();
        filter.seed_noise_floor(-41.0);
        for _ in 0..30 {
            let reading = filter.signal(-41.0);
            assert!(reading.signal < 1e-4, "DC leaked through: {}", reading.signal);
        }
    }

    #[test]
    fn test_signal_chain_matches_formulas() {
        let mut filter = SignalFilter::new();
        filter.seed_noise_floor(-41.0);

        let first = filter.signal(-20.0);
        let floor1 = 0.02 * -20.0 + 0.98 * -41.0;
        assert!((first.noise_floor - floor1).abs() < 1e-4);
        assert!((first.adjusted - (-20.0 - floor1)).abs() < 1e-4);
        assert_eq!(first.signal, 0.0);

        let second = filter.signal(-10.0);
        let floor2 = 0.02 * -10.0 + 0.98 * floor1;
        let expected = 0.9 * ((-10.0 - floor2) - (-20.0 - floor1));
        assert!((second.signal - expected).abs() < 1e-3);
        assert!(second.signal > 8.0 && second.signal < 9.5);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut filter = SignalFilter::new();
        filter.process(-30.0);
        filter.seed_noise_floor(-30.0);
        filter.signal(-30.0);

        filter.reset();
        assert_eq!(filter.smoothed(), None);
        assert_eq!(filter.noise_floor(), -60.0);
        assert_eq!(filter.process(-10.0), -10.0);
    }
}
