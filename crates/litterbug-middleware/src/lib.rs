//! `litterbug-middleware` – message plumbing
//!
//! Routes pose and detection traffic between the simulator components and
//! external clients without caring about the data's meaning.
//!
//! # Modules
//!
//! - [`bus`] – Headless, typed, topic-based publish/subscribe event bus built
//!   on Tokio broadcast channels.
//! - [`sink`] – The [`DetectionSink`] seam the vision loop reports through.
//! - [`bridge`] – WebSocket bridge streaming detections out as JSON and
//!   taking odometry in.

pub mod bridge;
pub mod bus;
pub mod sink;

pub use bridge::DetectionBridge;
pub use bus::{EventBus, Topic, TopicReceiver};
pub use sink::{BusSink, DetectionSink};
