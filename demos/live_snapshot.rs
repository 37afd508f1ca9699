/// Live readout example: scan on one thread, render snapshots on another
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use sound_bearing::simulate::SyntheticRoom;
use sound_bearing::{ScanConfig, ScanPipeline, SnapshotCell};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== Sound Bearing Engine: Live Snapshots ===\n");

    // Real-time clock: the calibration window is measured in wall-clock time
    let mut pipeline = match ScanPipeline::new(ScanConfig::default()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("invalid config: {e}");
            return;
        }
    };

    let room = SyntheticRoom {
        source_bearing_deg: 60.0,
        start_heading_deg: 240.0,
        rotation_speed_dps: 90.0,
        ..Default::default()
    };

    let cell = SnapshotCell::new(pipeline.snapshot());
    let done = Arc::new(AtomicBool::new(false));

    // Reader: prints a status line every 250ms
    let reader = {
        let cell = cell.clone();
        let done = Arc::clone(&done);
        thread::spawn(move || {
            while !done.load(Ordering::Acquire) {
                let snap = cell.load();
                println!(
                    "{:<30} {:>5.1}°  meter {:>3.0}%  progress {:>3.0}%  [{}]",
                    snap.status_text(),
                    snap.heading_deg,
                    snap.loudness_fraction() * 100.0,
                    snap.progress * 100.0,
                    snap.quality_text()
                );
                thread::sleep(Duration::from_millis(250));
            }
        })
    };

    pipeline.start_scan();
    for tick in room.sweep(1.0) {
        pipeline.ingest(&tick);
        cell.publish(pipeline.snapshot());
        thread::sleep(room.tick_interval);
    }

    let result = pipeline.stop_scan();
    cell.publish(pipeline.snapshot());
    done.store(true, Ordering::Release);
    let _ = reader.join();

    match result {
        Ok(result) => match result.direction_deg {
            Some(direction) => println!("\nLoudest sound at: {:.0}°", direction),
            None => println!("\n{}", result.status),
        },
        Err(e) => eprintln!("{e}"),
    }
}
