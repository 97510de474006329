//! Periodic driver for the [`VisionScanner`].
//!
//! Each tick copies the current pose and the item registry, scans, and hands
//! every detection to a [`DetectionSink`] in scan order. The loop owns its
//! scanner, so ticks never overlap; ticks whose deadline passes while a scan
//! is still running are dropped and counted in
//! [`ScanStatsSnapshot::skipped_ticks`].

use std::sync::Arc;
use std::time::Instant;

use litterbug_middleware::DetectionSink;
use rand::Rng;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::vision::{ScanStats, ScanStatsSnapshot, VisionScanner};
use crate::world::{ItemRegistry, SharedPose};

pub struct VisionLoop<R: Rng, S: DetectionSink> {
    scanner: VisionScanner<R>,
    pose: SharedPose,
    registry: ItemRegistry,
    sink: S,
}

impl<R: Rng, S: DetectionSink> VisionLoop<R, S> {
    pub fn new(scanner: VisionScanner<R>, pose: SharedPose, registry: ItemRegistry, sink: S) -> Self {
        Self {
            scanner,
            pose,
            registry,
            sink,
        }
    }

    pub fn stats(&self) -> Arc<ScanStats> {
        self.scanner.stats()
    }

    /// Run a single scan against the current snapshots. Returns the number
    /// of detections delivered.
    pub fn tick(&mut self) -> usize {
        let pose = self.pose.get();
        let (items, labels) = self.registry.snapshot_with_labels();

        let detections = self.scanner.scan(&pose, &items, &labels);
        for detection in &detections {
            self.sink.deliver(detection);
        }
        detections.len()
    }

    /// Tick every `1 / fps` seconds until `shutdown` turns `true` or its
    /// sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> ScanStatsSnapshot {
        let stats = self.scanner.stats();
        let period = self.scanner.params().tick_period();
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(period_ms = period.as_millis() as u64, "vision loop started");

        while !*shutdown.borrow() {
            tokio::select! {
                _ = interval.tick() => {
                    let started = Instant::now();
                    let delivered = self.tick();
                    let elapsed = started.elapsed();

                    if elapsed > period {
                        let missed = (elapsed.as_secs_f64() / period.as_secs_f64()).floor() as u64;
                        stats.add_skipped_ticks(missed);
                        warn!(
                            elapsed_ms = elapsed.as_millis() as u64,
                            missed,
                            "scan overran its period; dropping ticks"
                        );
                    } else {
                        debug!(delivered, "tick complete");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        let summary = stats.snapshot();
        info!(
            ticks = summary.ticks,
            skipped = summary.skipped_ticks,
            detections = summary.detections,
            ghosts = summary.ghosts,
            "vision loop stopped"
        );
        summary
    }
}
