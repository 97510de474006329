//! Destinations for scan results.
//!
//! The vision loop hands every detection to a [`DetectionSink`], one call
//! per object in scan order. Any `Fn(&Detection)` closure is a sink;
//! [`BusSink`] publishes onto the [`Topic::Detections`] lane of an
//! [`EventBus`].

use litterbug_types::{Detection, Event, EventPayload};
use tracing::debug;

use crate::bus::{EventBus, Topic};

/// Event `source` stamped on every detection published by [`BusSink`].
pub const DETECTION_SOURCE: &str = "litterbug-middleware::vision";

/// Receives detections one at a time.
pub trait DetectionSink: Send + Sync {
    fn deliver(&self, detection: &Detection);
}

impl<F> DetectionSink for F
where
    F: Fn(&Detection) + Send + Sync,
{
    fn deliver(&self, detection: &Detection) {
        self(detection)
    }
}

/// Publishes every detection as an [`EventPayload::ItemSpotted`] event.
#[derive(Clone, Debug)]
pub struct BusSink {
    bus: EventBus,
}

impl BusSink {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl DetectionSink for BusSink {
    fn deliver(&self, detection: &Detection) {
        let event = Event::new(DETECTION_SOURCE, EventPayload::ItemSpotted(detection.clone()));
        let receivers = self.bus.publish_to(Topic::Detections, event);
        debug!(label = %detection.label, kind = ?detection.kind, receivers, "detection published");
    }
}
