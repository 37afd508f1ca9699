//! Sound Bearing Engine Library
//!
//! A streaming signal-processing core that finds the compass bearing of the
//! loudest ambient sound while a user turns a device through a full circle.
//! Each sampling tick carries a loudness reading, a heading and a rotation
//! rate; the engine turns that noisy stream into an adaptive noise floor, a
//! per-heading signal strength, live scan-quality feedback, sweep progress and
//! a final direction estimate with an intensity profile.
//!
//! # Design Philosophy
//!
//! - **Explicit state**: every filter, buffer and tracker lives in one owned
//!   [`ScanPipeline`]; there are no globals.
//! - **Control flow as data**: [`ScanPipeline::ingest`] returns a
//!   [`TickOutcome`] instead of firing callbacks.
//! - **Failure is a result**: a quiet scan yields a [`ScanResult`] without a
//!   direction, not an error.
//! - **O(1) filtering**: smoothing and tracking are incremental per tick.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use sound_bearing::{ManualClock, ScanConfig, ScanPipeline, SensorTick};
//!
//! let clock = ManualClock::new();
//! let mut pipeline = ScanPipeline::with_clock(ScanConfig::default(), clock.clone()).unwrap();
//!
//! pipeline.start_scan();
//! for i in 0..60 {
//!     clock.advance(Duration::from_millis(50));
//!     pipeline.ingest(&SensorTick::new(i as f64 * 6.0, -50.0, 0.5));
//! }
//! let result = pipeline.stop_scan().unwrap();
//! assert!(result.direction_deg.is_none()); // steady room, nothing stands out
//! ```

pub mod aggregate;
pub mod calibration;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod heading;
pub mod pipeline;
pub mod publish;
pub mod quality;
pub mod signal;
pub mod simulate;
pub mod types;


// Re-export commonly used types
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::ScanConfig;
pub use error::{ConfigError, ConfigResult, ScanError};
pub use export::{ScanReport, ScanSummary};
pub use pipeline::{ScanPipeline, ScanSnapshot};
pub use publish::SnapshotCell;
pub use types::{
    PolarPoint, RejectReason, ScanQuality, ScanQualityLevel, ScanResult, ScanStatus, SensorTick,
    SoundSample, TickOutcome,
};
