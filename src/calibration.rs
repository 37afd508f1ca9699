//! Stationary warm-up that seeds the noise floor.
//!
//! State machine: `Idle → Calibrating → Done`. A scan start enters
//! `Calibrating`; every tick's smoothed level is buffered until the window has
//! elapsed, then the floor is seeded with the buffer mean. Calibration never
//! re-triggers mid-scan.

use std::time::Duration;

/// Phase of the calibration controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationPhase {
    /// No scan started.
    Idle,
    /// Buffering smoothed levels.
    Calibrating,
    /// Floor seeded; the signal pipeline owns the tick.
    Done,
}

/// What a single observation did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationStep {
    /// Calibration is not running; the tick belongs to the signal pipeline.
    Inactive,
    /// Value buffered, window still open.
    Collecting,
    /// Window closed on this tick; seed the floor with `noise_floor`.
    Completed { noise_floor: f32, sample_count: usize },
}

/// Gates the signal pipeline during the warm-up window.
#[derive(Debug, Clone)]
pub struct CalibrationController {
    phase: CalibrationPhase,
    samples: Vec<f32>,
    started_at: Option<Duration>,
    window: Duration,
    fallback_floor: f32,
}

impl CalibrationController {
    /// Create a controller with the given window length and empty-buffer fallback.
    pub fn new(window: Duration, fallback_floor: f32) -> Self {
        Self {
            phase: CalibrationPhase::Idle,
            // 1.5 s at 20 Hz
            samples: Vec::with_capacity(32),
            started_at: None,
            window,
            fallback_floor,
        }
    }

    /// Enter `Calibrating`, discarding any previous buffer.
    pub fn begin(&mut self, now: Duration) {
        self.samples.clear();
        self.started_at = Some(now);
        self.phase = CalibrationPhase::Calibrating;
    }

    /// Buffer a smoothed level and close the window once it has elapsed.
    ///
    /// The closing tick's value is part of the mean.
    pub fn observe(&mut self, smoothed_db: f32, now: Duration) -> CalibrationStep {
        if self.phase != CalibrationPhase::Calibrating {
            return CalibrationStep::Inactive;
        }

        self.samples.push(smoothed_db);

        let elapsed = self
            .started_at
            .map(|start| now.saturating_sub(start))
            .unwrap_or_default();
        if elapsed < self.window {
            return CalibrationStep::Collecting;
        }

        let noise_floor = self.baseline();
        let sample_count = self.samples.len();
        self.phase = CalibrationPhase::Done;
        log::debug!(
            "calibration complete: floor={:.2} dB from {} samples over {:?}",
            noise_floor,
            sample_count,
            elapsed
        );

        CalibrationStep::Completed {
            noise_floor,
            sample_count,
        }
    }

    /// Mean of the buffered levels, or the fallback when nothing was buffered.
    pub fn baseline(&self) -> f32 {
        if self.samples.is_empty() {
            return self.fallback_floor;
        }
        let total: f32 = self.samples.iter().sum();
        total / self.samples.len() as f32
    }

    /// Stop calibrating without seeding (scan stopped early).
    pub fn cancel(&mut self) {
        self.phase = CalibrationPhase::Idle;
        self.started_at = None;
        self.samples.clear();
    }

    pub fn phase(&self) -> CalibrationPhase {
        self.phase
    }

    pub fn is_calibrating(&self) -> bool {
        self.phase == CalibrationPhase::Calibrating
    }

    /// Values buffered so far.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_idle_until_begin() {
        let mut cal = CalibrationController::new(ms(1500), -60.0);
        assert_eq!(cal.phase(), CalibrationPhase::Idle);
        assert_eq!(cal.observe(-40.0, ms(0)), CalibrationStep::Inactive);
        assert!(cal.samples().is_empty());
    }

    #[test]
    fn test_seeds_mean_of_buffer() {
        let mut cal = CalibrationController::new(ms(1500), -60.0);
        cal.begin(ms(0));

        assert_eq!(cal.observe(-40.0, ms(500)), CalibrationStep::Collecting);
        assert_eq!(cal.observe(-42.0, ms(1000)), CalibrationStep::Collecting);

        match cal.observe(-41.0, ms(1500)) {
            CalibrationStep::Completed {
                noise_floor,
                sample_count,
            } => {
                assert!((noise_floor + 41.0).abs() < 1e-5);
                assert_eq!(sample_count, 3);
            }
            other => panic!("expected completion, got {:?}", other),
        }
        assert_eq!(cal.phase(), CalibrationPhase::Done);
    }

    #[test]
    fn test_no_retrigger_after_done() {
        let mut cal = CalibrationController::new(ms(1500), -60.0);
        cal.begin(ms(0));
        cal.observe(-40.0, ms(2000));
        assert_eq!(cal.phase(), CalibrationPhase::Done);
        assert_eq!(cal.observe(-10.0, ms(2050)), CalibrationStep::Inactive);
    }

    #[test]
    fn test_window_is_time_based() {
        let mut cal = CalibrationController::new(ms(1500), -60.0);
        cal.begin(ms(100));
        // Many ticks in a short span must not close the window.
        for i in 0..100 {
            assert_eq!(cal.observe(-45.0, ms(100 + i)), CalibrationStep::Collecting);
        }
        assert!(matches!(
            cal.observe(-45.0, ms(1600)),
            CalibrationStep::Completed { .. }
        ));
    }

    #[test]
    fn test_empty_buffer_fallback() {
        let cal = CalibrationController::new(ms(1500), -60.0);
        assert_eq!(cal.baseline(), -60.0);
    }

    #[test]
    fn test_begin_clears_previous_buffer() {
        let mut cal = CalibrationController::new(ms(1500), -60.0);
        cal.begin(ms(0));
        cal.observe(-20.0, ms(10));
        cal.begin(ms(5000));
        assert!(cal.samples().is_empty());
        assert!(cal.is_calibrating());
    }

    #[test]
    fn test_cancel() {
        let mut cal = CalibrationController::new(ms(1500), -60.0);
        cal.begin(ms(0));
        cal.observe(-20.0, ms(10));
        cal.cancel();
        assert_eq!(cal.phase(), CalibrationPhase::Idle);
        assert!(cal.samples().is_empty());
    }
}
