/// Basic usage example: feed sensor ticks, get a bearing
use std::time::Duration;

use sound_bearing::{ManualClock, ScanConfig, ScanPipeline, SensorTick, TickOutcome};

fn main() {
    println!("=== Sound Bearing Engine: Basic Example ===\n");

    // Manual clock: each tick advances time by the 50ms sampling cadence
    let clock = ManualClock::new();
    let mut pipeline = match ScanPipeline::with_clock(ScanConfig::default(), clock.clone()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("invalid config: {e}");
            return;
        }
    };

    pipeline.start_scan();

    // Calibration: hold still in a quiet room (1.5 seconds)
    let mut ticks: Vec<SensorTick> = (0..30).map(|_| SensorTick::new(0.0, -52.0, 0.0)).collect();

    // Turn: a door slams while facing ~200°
    for i in 1..=72 {
        let heading = i as f64 * 5.0;
        let level = if (195.0..=210.0).contains(&heading) { -15.0 } else { -52.0 };
        ticks.push(SensorTick::new(heading % 360.0, level, 0.6));
    }

    println!("Processing {} ticks...\n", ticks.len());

    for tick in &ticks {
        clock.advance(Duration::from_millis(50));
        match pipeline.ingest(tick) {
            TickOutcome::Calibrating { completed: true, .. } => {
                println!("Calibrated: noise floor {:.1} dB", pipeline.noise_floor());
            }
            TickOutcome::Accepted { sample, quality } if sample.signal > 3.0 => {
                println!(
                    "  {:>5.1}°  signal {:>5.2}  ({})",
                    sample.heading_deg, sample.signal, quality
                );
            }
            _ => {}
        }
    }

    println!("\nProgress: {:.0}%", pipeline.progress() * 100.0);
    println!("Top headings: {:?}", pipeline.top_headings());

    match pipeline.stop_scan() {
        Ok(result) => match result.direction_deg {
            Some(direction) => println!("Loudest sound at: {:.0}°", direction),
            None => println!("{}", result.status),
        },
        Err(e) => eprintln!("{e}"),
    }
}
