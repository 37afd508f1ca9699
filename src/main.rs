//! Sound Bearing Engine
//!
//! Runs a synthetic scan through the engine and prints the scan report.
//!
//! Usage: `sound-bearing [SOURCE_BEARING_DEG] [CONFIG_JSON]`

use std::env;

use anyhow::{Context, Result};
use log::{info, warn};

use sound_bearing::simulate::{replay, SyntheticRoom};
use sound_bearing::{ManualClock, ScanConfig, ScanPipeline, ScanReport};

fn main() -> Result<()> {
    // Set RUST_LOG=debug (or trace) for per-tick output.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let source_bearing_deg: f64 = match args.next() {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid source bearing '{arg}'"))?,
        None => 135.0,
    };
    let config = match args.next() {
        Some(path) => ScanConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => ScanConfig::default(),
    };

    let room = SyntheticRoom {
        source_bearing_deg,
        start_heading_deg: (source_bearing_deg + 180.0).rem_euclid(360.0),
        ..Default::default()
    };

    let clock = ManualClock::new();
    let mut pipeline = ScanPipeline::with_clock(config, clock.clone())?;

    info!("simulating a source at {:.1}°", source_bearing_deg);
    pipeline.start_scan();
    let ticks = room.sweep(1.0);
    let outcomes = replay(&mut pipeline, &clock, &ticks, room.tick_interval);
    let accepted = outcomes.iter().filter(|o| o.is_accepted()).count();
    info!("{} ticks, {} samples accepted", ticks.len(), accepted);

    let result = pipeline.stop_scan()?;
    match result.direction_deg {
        Some(direction) => info!("loudest sound at {:.0}°", direction),
        None => warn!("{}", result.status),
    }

    let report = ScanReport::from_scan(&pipeline, &result);
    println!("{}", report.without_profile().to_json()?);
    Ok(())
}
