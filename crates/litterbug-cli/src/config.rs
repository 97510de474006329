//! Configuration – reads `~/.litterbug/config.toml` (or `--config <path>`).
//!
//! Every table rejects unknown keys; every key has a default except the
//! `label` and `origin` of an `[[items]]` entry.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use litterbug_perception::MapConfig;
use litterbug_runtime::{LoggingConfig, VisionParameters};
use litterbug_types::{Item, LitterError, Orientation, Point2, RobotPose};
use serde::Deserialize;

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LitterbugConfig {
    pub core: CoreConfig,
    pub map: MapSection,
    pub vision: VisionParameters,
    pub logging: LoggingConfig,
    pub items: Vec<ItemConfig>,
    pub pose: PoseConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub service_name: String,
    /// WebSocket bridge address; no bridge when absent.
    pub bridge_addr: Option<SocketAddr>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            service_name: "litterbug".to_string(),
            bridge_addr: None,
        }
    }
}

/// `[map]`: raster stem plus optional direct resolution/origin.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapSection {
    /// `<file>.pgm` is the raster, `<file>.yaml` the metadata.
    pub file: PathBuf,
    pub resolution: Option<f64>,
    pub origin: Option<[f64; 2]>,
}

impl Default for MapSection {
    fn default() -> Self {
        Self {
            file: PathBuf::from("maps/world"),
            resolution: None,
            origin: None,
        }
    }
}

impl MapSection {
    pub fn map_config(&self) -> MapConfig {
        MapConfig::new(self.resolution, self.origin.map(|[x, y]| Point2::new(x, y)))
    }
}

/// One `[[items]]` entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemConfig {
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
    pub origin: [f64; 2],
    /// Roll, pitch, yaw (radians).
    #[serde(default)]
    pub orientation: [f64; 3],
    #[serde(default)]
    pub model: String,
}

impl ItemConfig {
    pub fn to_item(&self) -> Item {
        let [x, y] = self.origin;
        let [roll, pitch, yaw] = self.orientation;
        Item::new(
            self.id.clone(),
            self.label.clone(),
            Point2::new(x, y),
            Orientation::new(roll, pitch, yaw),
            self.model.clone(),
        )
    }
}

/// Robot pose used until the first odometry sample arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoseConfig {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

impl PoseConfig {
    pub fn to_pose(self) -> RobotPose {
        RobotPose::new(self.x, self.y, self.yaw)
    }
}

impl LitterbugConfig {
    /// # Errors
    ///
    /// Returns [`LitterError::Config`] for invalid vision parameters, an
    /// item with an empty label, or a non-finite item or pose coordinate.
    pub fn validate(&self) -> Result<(), LitterError> {
        self.vision.validate()?;
        for (i, item) in self.items.iter().enumerate() {
            if item.label.trim().is_empty() {
                return Err(LitterError::Config(format!("items[{i}] has an empty label")));
            }
            if !item.origin.iter().chain(&item.orientation).all(|v| v.is_finite()) {
                return Err(LitterError::Config(format!(
                    "items[{i}] has a non-finite origin or orientation"
                )));
            }
        }
        if ![self.pose.x, self.pose.y, self.pose.yaw].iter().all(|v| v.is_finite()) {
            return Err(LitterError::Config("pose must be finite".to_string()));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Loading
// ────────────────────────────────────────────────────────────────────────────

/// Return the path to `~/.litterbug/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".litterbug").join("config.toml")
}

/// Load, apply environment overrides and validate.
///
/// An explicit `path` must exist. Without one, `~/.litterbug/config.toml` is
/// used when present and defaults otherwise.
pub fn load(path: Option<&Path>) -> Result<LitterbugConfig, LitterError> {
    let mut cfg = match path {
        Some(p) => load_from(p)?
            .ok_or_else(|| LitterError::Config(format!("config file {} not found", p.display())))?,
        None => load_from(&config_path())?.unwrap_or_default(),
    };
    apply_env_overrides(&mut cfg);
    cfg.validate()?;
    Ok(cfg)
}

/// Parse the config at `path`. Returns `None` if the file does not exist.
pub(crate) fn load_from(path: &Path) -> Result<Option<LitterbugConfig>, LitterError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| LitterError::Config(format!("failed to read config at {}: {e}", path.display())))?;
    let cfg = toml::from_str(&raw)
        .map_err(|e| LitterError::Config(format!("failed to parse config: {e}")))?;
    Ok(Some(cfg))
}

/// Apply `LITTERBUG_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `LITTERBUG_MAP_FILE` | `map.file` |
/// | `LITTERBUG_VISION_FPS` | `vision.fps` |
/// | `LITTERBUG_BRIDGE_ADDR` | `core.bridge_addr` |
///
/// Values that do not parse are ignored.
pub fn apply_env_overrides(cfg: &mut LitterbugConfig) {
    if let Ok(v) = std::env::var("LITTERBUG_MAP_FILE") {
        cfg.map.file = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("LITTERBUG_VISION_FPS")
        && let Ok(fps) = v.parse::<f64>()
    {
        cfg.vision.fps = fps;
    }
    if let Ok(v) = std::env::var("LITTERBUG_BRIDGE_ADDR")
        && let Ok(addr) = v.parse::<SocketAddr>()
    {
        cfg.core.bridge_addr = Some(addr);
    }
}
