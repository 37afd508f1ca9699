//! Sample storage, final analysis and derived views.
//!
//! The store is append-only during a scan and cleared at the next scan start.
//! Derived views (strongest headings, polar profile) are recomputed wholesale
//! after every accepted sample; scans hold low hundreds of samples, so a full
//! pass per tick is cheap.

use crate::types::{PolarPoint, ScanQuality, ScanResult, ScanStatus, SoundSample};

/// Accepted samples of the current scan, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    samples: Vec<SoundSample>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: SoundSample) {
        self.samples.push(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[SoundSample] {
        &self.samples
    }

    /// Strongest sample. Ties resolve to the earliest arrival.
    pub fn peak(&self) -> Option<&SoundSample> {
        let mut best: Option<&SoundSample> = None;
        for sample in &self.samples {
            match best {
                Some(current) if sample.signal <= current.signal => {}
                _ => best = Some(sample),
            }
        }
        best
    }

    /// Headings of the `n` strongest samples, strongest first.
    ///
    /// Stable: equal signals keep arrival order.
    pub fn top_headings(&self, n: usize) -> Vec<f64> {
        let mut sorted: Vec<&SoundSample> = self.samples.iter().collect();
        sorted.sort_by(|a, b| b.signal.total_cmp(&a.signal));
        sorted.into_iter().take(n).map(|s| s.heading_deg).collect()
    }

    /// Every sample projected to heading/magnitude, in arrival order.
    pub fn polar_profile(&self) -> Vec<PolarPoint> {
        self.samples.iter().map(PolarPoint::from).collect()
    }
}

/// Resolve the loudest direction from a finished scan.
///
/// Fails when the store is empty or the peak signal is not strictly greater
/// than `min_detected_signal`; a peak exactly at the threshold fails.
pub fn analyze(store: &SampleStore, min_detected_signal: f32) -> ScanResult {
    let peak = store.peak().copied();
    let sample_count = store.len();

    match peak {
        Some(sample) if sample.signal > min_detected_signal => ScanResult {
            direction_deg: Some(sample.heading_deg),
            peak,
            sample_count,
            quality: ScanQuality::Good,
            status: ScanStatus::Complete,
        },
        _ => ScanResult {
            direction_deg: None,
            peak,
            sample_count,
            quality: ScanQuality::TooQuiet,
            status: ScanStatus::TooQuiet,
        },
    }
}

/// Views regenerated from the store after every accepted sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedAggregates {
    pub top_headings: Vec<f64>,
    pub polar_profile: Vec<PolarPoint>,
}

impl DerivedAggregates {
    /// Rebuild both views from scratch.
    pub fn recompute(&mut self, store: &SampleStore, top_count: usize) {
        self.top_headings = store.top_headings(top_count);
        self.polar_profile = store.polar_profile();
    }

    pub fn clear(&mut self) {
        self.top_headings.clear();
        self.polar_profile.clear();
    }
}
