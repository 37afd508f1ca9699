//! Heading arithmetic and rotation progress.
//!
//! Progress is a distance-traveled heuristic: absolute heading deltas are
//! summed, so oscillating back and forth also counts toward completion. The
//! total is never wrapped and may exceed 360°.

/// Degrees in a full turn.
pub const FULL_TURN_DEG: f64 = 360.0;

/// Normalize a heading to [0, 360).
pub fn normalize_heading(heading_deg: f64) -> f64 {
    let h = heading_deg.rem_euclid(FULL_TURN_DEG);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if h >= FULL_TURN_DEG {
        0.0
    } else {
        h
    }
}

/// Shortest unsigned angle between two headings, in [0, 180].
///
/// Handles the 0°/360° seam: `angular_delta(350.0, 10.0) == 20.0`.
pub fn angular_delta(from_deg: f64, to_deg: f64) -> f64 {
    let delta = (to_deg - from_deg).abs();
    if delta > 180.0 {
        FULL_TURN_DEG - delta
    } else {
        delta
    }
}

/// Integrates absolute heading changes into a completion fraction.
#[derive(Debug, Clone, Default)]
pub struct RotationProgressTracker {
    last_heading: Option<f64>,
    accumulated_deg: f64,
}

impl RotationProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a heading and return progress in [0, 1].
    ///
    /// The first heading after a reset only becomes the reference.
    pub fn update(&mut self, heading_deg: f64) -> f64 {
        if let Some(prev) = self.last_heading {
            self.accumulated_deg += angular_delta(prev, heading_deg);
        }
        self.last_heading = Some(heading_deg);
        self.progress()
    }

    /// Fraction of a full turn completed, capped at 1.
    pub fn progress(&self) -> f64 {
        (self.accumulated_deg / FULL_TURN_DEG).min(1.0)
    }

    /// Total distance traveled in degrees. Not wrapped.
    pub fn accumulated_degrees(&self) -> f64 {
        self.accumulated_deg
    }

    pub fn last_heading(&self) -> Option<f64> {
        self.last_heading
    }

    pub fn reset(&mut self) {
        self.last_heading = None;
        self.accumulated_deg = 0.0;
    }
}

// ============================================================================
// TESTS
// ============================================================================
