use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{info, warn};

use countup_core::{spawn_counter, AppConfig, Frame, HostMotion, MotionPreference, StatTarget};

pub struct SimulateOptions {
    pub json: bool,
    pub reduced_motion: bool,
    pub delay_ms: u64,
    pub duration_ms: Option<u64>,
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    elapsed_ms: u64,
    values: &'a [u64],
    formatted: Vec<String>,
    complete: bool,
}

pub async fn run(config: &AppConfig, options: SimulateOptions) -> Result<()> {
    let mut counter = config.counter.clone();
    if let Some(duration_ms) = options.duration_ms {
        counter.duration_ms = duration_ms;
    }
    let override_motion = if options.reduced_motion {
        Some(true)
    } else {
        counter.reduced_motion
    };
    let reduced = HostMotion::detect(override_motion).prefers_reduced_motion();
    let targets = config.page.stat_targets();

    let (visibility_tx, visibility_rx) = watch::channel(0.0);
    let (_motion_tx, motion_rx) = watch::channel(reduced);
    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();

    let handle = spawn_counter(targets.clone(), counter, visibility_rx, motion_rx, frame_tx);

    if options.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(options.delay_ms)).await;
    }
    let started = Instant::now();
    if visibility_tx.send(1.0).is_err() {
        warn!("Counter stopped before the stats became visible");
    }

    let mut count = 0usize;
    while let Some(frame) = frame_rx.recv().await {
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        if options.json {
            let record = FrameRecord {
                elapsed_ms,
                values: &frame.values,
                formatted: frame.formatted(),
                complete: frame.complete,
            };
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}", render_frame(elapsed_ms, &frame, &targets));
        }
        count += 1;
    }

    handle.wait().await;
    info!(frames = count, reduced, "Simulation finished");
    if !options.json {
        println!("\n{count} frames");
    }

    Ok(())
}

fn render_frame(elapsed_ms: u64, frame: &Frame, targets: &[StatTarget]) -> String {
    let cells: Vec<String> = frame
        .formatted()
        .into_iter()
        .zip(targets)
        .map(|(number, target)| {
            let field = format!("{number:>width$}", width = target.width());
            match &target.suffix {
                Some(suffix) => format!("{field} {suffix}"),
                None => field,
            }
        })
        .collect();

    let mut line = format!("{elapsed_ms:>6} ms  {}", cells.join("  |  "));
    if frame.complete {
        line.push_str("  (done)");
    }
    line
}
