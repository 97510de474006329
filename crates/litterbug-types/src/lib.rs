use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A metric point on the ground plane (metres).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Roll, pitch and yaw (radians).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Orientation {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// A planar orientation: only the heading is set.
    pub fn from_yaw(yaw: f64) -> Self {
        Self::new(0.0, 0.0, yaw)
    }
}

/// Latest known robot pose on the map plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RobotPose {
    pub location: Point2,
    /// Heading, counter-clockwise from +X (radians).
    pub heading_rad: f64,
}

impl RobotPose {
    pub fn new(x: f64, y: f64, heading_rad: f64) -> Self {
        Self {
            location: Point2::new(x, y),
            heading_rad,
        }
    }
}

/// A labelled object placed in the world.
///
/// Items are created by the placement logic and stored in the item
/// registry; the vision scanner only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub label: String,
    pub origin: Point2,
    pub orientation: Orientation,
    /// Path of the visual/physical model used by the simulator.
    pub model_path: String,
}

impl Item {
    /// Create an item. An absent or empty `id` is replaced with a fresh
    /// UUID v4.
    pub fn new(
        id: Option<String>,
        label: impl Into<String>,
        origin: Point2,
        orientation: Orientation,
        model_path: impl Into<String>,
    ) -> Self {
        let id = match id {
            Some(id) if !id.is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };
        Self {
            id,
            label: label.into(),
            origin,
            orientation,
            model_path: model_path.into(),
        }
    }
}

/// How a [`Detection`] came to be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionKind {
    /// A visible item reported under its true label.
    Observed,
    /// A visible item reported under a label drawn from the known labels.
    Mislabeled,
    /// A fabricated detection with no corresponding item.
    Ghost,
}

/// What a single scan reports about one (real or imagined) object.
///
/// Only [`DetectionKind::Observed`] detections carry the id of a registry
/// item; synthesised detections have no persistent identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub kind: DetectionKind,
    pub item_id: Option<String>,
    pub label: String,
    pub origin: Point2,
    pub orientation: Orientation,
    pub model_path: String,
}

impl Detection {
    /// Report `item` as-is.
    pub fn observed(item: &Item) -> Self {
        Self {
            kind: DetectionKind::Observed,
            item_id: Some(item.id.clone()),
            label: item.label.clone(),
            origin: item.origin,
            orientation: item.orientation,
            model_path: item.model_path.clone(),
        }
    }

    /// Report `item` at its true pose but under `label`.
    pub fn mislabeled(item: &Item, label: impl Into<String>) -> Self {
        Self {
            kind: DetectionKind::Mislabeled,
            item_id: None,
            label: label.into(),
            origin: item.origin,
            orientation: item.orientation,
            model_path: String::new(),
        }
    }

    /// Report an object that does not exist.
    pub fn ghost(label: impl Into<String>, origin: Point2, orientation: Orientation) -> Self {
        Self {
            kind: DetectionKind::Ghost,
            item_id: None,
            label: label.into(),
            origin,
            orientation,
            model_path: String::new(),
        }
    }

    /// True when the detection refers to an item that exists in the registry.
    pub fn is_real(&self) -> bool {
        self.item_id.is_some()
    }
}

/// A raw odometry sample: planar position plus orientation quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OdometryData {
    pub x: f64,
    pub y: f64,
    pub qx: f64,
    pub qy: f64,
    pub qz: f64,
    pub qw: f64,
}

/// Unified event wrapper for the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// e.g., "litterbug-runtime::vision"
    pub source: String,
    pub payload: EventPayload,
}

impl Event {
    /// Wrap `payload` in a freshly stamped event.
    pub fn new(source: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: source.into(),
            payload,
        }
    }
}

/// Variants of data that can be routed over the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    Odometry(OdometryData),
    ItemSpotted(Detection),
    ScanFault { component: String, message: String },
}

/// Error type shared by every litterbug crate.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LitterError {
    #[error("Missing required fields in map config: {}", fields.join(", "))]
    MissingMapConfig { fields: Vec<String> },

    #[error("Invalid map config: {0}")]
    InvalidMapConfig(String),

    #[error("Malformed raster: unrecognised intensity levels {levels:?}")]
    MalformedRaster { levels: Vec<u8> },

    #[error("No known labels to draw from")]
    EmptyLabelSet,

    #[error("Invalid pose sample: {0}")]
    InvalidPose(String),

    #[error("Map I/O error: {0}")]
    MapIo(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn can() -> Item {
        Item::new(
            Some("can-1".to_string()),
            "can",
            Point2::new(1.0, 2.0),
            Orientation::from_yaw(0.5),
            "models/can",
        )
    }

    #[test]
    fn item_keeps_supplied_id() {
        assert_eq!(can().id, "can-1");
    }

    #[test]
    fn item_generates_id_when_absent_or_empty() {
        let a = Item::new(None, "bottle", Point2::default(), Orientation::default(), "");
        let b = Item::new(Some(String::new()), "bottle", Point2::default(), Orientation::default(), "");
        assert!(Uuid::parse_str(&a.id).is_ok());
        assert!(Uuid::parse_str(&b.id).is_ok());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn observed_detection_mirrors_item() {
        let item = can();
        let d = Detection::observed(&item);
        assert_eq!(d.kind, DetectionKind::Observed);
        assert_eq!(d.item_id.as_deref(), Some("can-1"));
        assert_eq!(d.label, item.label);
        assert_eq!(d.origin, item.origin);
        assert_eq!(d.orientation, item.orientation);
        assert!(d.is_real());
    }

    #[test]
    fn mislabeled_detection_has_no_identity() {
        let item = can();
        let d = Detection::mislabeled(&item, "bottle");
        assert_eq!(d.kind, DetectionKind::Mislabeled);
        assert_eq!(d.label, "bottle");
        assert_eq!(d.origin, item.origin);
        assert!(!d.is_real());
    }

    #[test]
    fn detection_kind_serialises_snake_case() {
        let json = serde_json::to_string(&DetectionKind::Mislabeled).unwrap();
        assert_eq!(json, "\"mislabeled\"");
    }

    #[test]
    fn item_spotted_event_roundtrip() {
        let event = Event::new(
            "litterbug-runtime::vision",
            EventPayload::ItemSpotted(Detection::ghost(
                "can",
                Point2::new(3.0, 4.0),
                Orientation::from_yaw(1.0),
            )),
        );
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, event.id);
        match back.payload {
            EventPayload::ItemSpotted(d) => {
                assert_eq!(d.kind, DetectionKind::Ghost);
                assert_eq!(d.origin, Point2::new(3.0, 4.0));
            }
            _ => panic!("unexpected variant"),
        }
    }

    #[test]
    fn missing_map_config_names_every_field() {
        let err = LitterError::MissingMapConfig {
            fields: vec!["resolution".to_string(), "origin".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("resolution"));
        assert!(msg.contains("origin"));
    }

    #[test]
    fn point_distance() {
        assert!((Point2::new(0.0, 0.0).distance(Point2::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }
}
