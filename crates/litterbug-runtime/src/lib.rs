//! `litterbug-runtime` – the simulated camera
//!
//! Ties the map, the shared world state and the noise model together into a
//! periodic scan.
//!
//! # Modules
//!
//! - [`world`] – [`SharedPose`] and [`ItemRegistry`]: lock-guarded handles
//!   readers copy snapshots out of.
//! - [`vision`] – [`VisionScanner`]: one tick of visibility checks, false
//!   negatives, mislabels and ghost detections, driven by a seedable RNG.
//! - [`vision_loop`] – [`VisionLoop`]: runs the scanner at `fps`,
//!   single-flight, dropping ticks that overrun.
//! - [`pose_feed`] – [`PoseFeed`]: odometry from the event bus into
//!   [`SharedPose`].
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: initialises
//!   the global `tracing` subscriber with an optional OTLP span exporter.

pub mod pose_feed;
pub mod telemetry;
pub mod vision;
pub mod vision_loop;
pub mod world;

pub use pose_feed::PoseFeed;
pub use telemetry::{LoggingConfig, TracerProviderGuard, init_tracing};
pub use vision::{LocationError, ScanStats, ScanStatsSnapshot, VisionParameters, VisionScanner};
pub use vision_loop::VisionLoop;
pub use world::{ItemRegistry, SharedPose};
