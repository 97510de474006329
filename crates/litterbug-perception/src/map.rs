//! Occupancy map and line-of-sight queries.
//!
//! A map is a fixed three-state grid ([`CellState`]) loaded from a grayscale
//! raster, plus the `resolution` (metres per cell edge) and `origin` (metric
//! position of the grid's reference point) needed to relate metric
//! coordinates to cells.
//!
//! # Coordinate conventions
//!
//! Raster row 0 is the top of the image while metric `y` grows upwards, so
//! the row axis is flipped:
//!
//! ```text
//! col = floor((x - origin.x) / resolution)
//! row = height - floor((y - origin.y) / resolution)
//! ```
//!
//! # Raster levels
//!
//! | Intensity | State |
//! |---|---|
//! | [`OCCUPIED_INTENSITY`] (0) | [`CellState::Occupied`] |
//! | [`UNKNOWN_INTENSITY`] (205) | [`CellState::Unknown`] |
//! | [`FREE_INTENSITY`] (254) | [`CellState::Free`] |
//!
//! Any other intensity makes the raster malformed.
//!
//! # Example
//!
//! ```rust
//! use litterbug_perception::map::{CellState, OccupancyGrid, OccupancyMap};
//! use litterbug_types::Point2;
//!
//! let grid = OccupancyGrid::filled(10, 10, CellState::Free);
//! let map = OccupancyMap::new(grid, 1.0, Point2::new(0.0, 0.0)).unwrap();
//!
//! assert!(map.line_of_sight(Point2::new(0.5, 5.5), Point2::new(9.5, 5.5)));
//! ```

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use image::GrayImage;
use litterbug_types::{LitterError, Point2};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::raster::{GridCell, rasterize};

pub const OCCUPIED_INTENSITY: u8 = 0;
pub const UNKNOWN_INTENSITY: u8 = 205;
pub const FREE_INTENSITY: u8 = 254;

// ────────────────────────────────────────────────────────────────────────────
// Cells and grid
// ────────────────────────────────────────────────────────────────────────────

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Occupied,
    Free,
    Unknown,
}

impl CellState {
    /// Classify a raster intensity. `None` for unrecognised levels.
    pub fn from_intensity(value: u8) -> Option<Self> {
        match value {
            OCCUPIED_INTENSITY => Some(Self::Occupied),
            FREE_INTENSITY => Some(Self::Free),
            UNKNOWN_INTENSITY => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Only occupied cells block sight; unknown space does not.
    pub fn blocks_sight(self) -> bool {
        matches!(self, Self::Occupied)
    }
}

/// Fixed-size, row-major grid of [`CellState`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl OccupancyGrid {
    /// Build a grid from row-major `cells`.
    ///
    /// # Errors
    ///
    /// Returns [`LitterError::InvalidMapConfig`] when `cells.len()` is not
    /// `width * height`.
    pub fn new(width: usize, height: usize, cells: Vec<CellState>) -> Result<Self, LitterError> {
        if cells.len() != width * height {
            return Err(LitterError::InvalidMapConfig(format!(
                "grid has {} cells, expected {width}x{height}",
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// A grid where every cell has the same state.
    pub fn filled(width: usize, height: usize, state: CellState) -> Self {
        Self {
            width,
            height,
            cells: vec![state; width * height],
        }
    }

    /// Classify a row-major buffer of raster intensities.
    ///
    /// # Errors
    ///
    /// Returns [`LitterError::MalformedRaster`] listing every distinct
    /// unrecognised intensity (ascending), or
    /// [`LitterError::InvalidMapConfig`] on a size mismatch.
    pub fn from_intensities(width: usize, height: usize, data: &[u8]) -> Result<Self, LitterError> {
        let mut bad_levels = BTreeSet::new();
        let cells: Vec<CellState> = data
            .iter()
            .map(|&v| {
                CellState::from_intensity(v).unwrap_or_else(|| {
                    bad_levels.insert(v);
                    CellState::Unknown
                })
            })
            .collect();

        if !bad_levels.is_empty() {
            return Err(LitterError::MalformedRaster {
                levels: bad_levels.into_iter().collect(),
            });
        }
        Self::new(width, height, cells)
    }

    /// Classify an 8-bit grayscale image.
    pub fn from_image(image: &GrayImage) -> Result<Self, LitterError> {
        Self::from_intensities(image.width() as usize, image.height() as usize, image.as_raw())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True when `cell` lies inside the grid.
    pub fn contains(&self, cell: GridCell) -> bool {
        cell.col >= 0
            && cell.row >= 0
            && (cell.col as usize) < self.width
            && (cell.row as usize) < self.height
    }

    /// State of `cell`, or `None` outside the grid.
    pub fn get(&self, cell: GridCell) -> Option<CellState> {
        if !self.contains(cell) {
            return None;
        }
        self.cells
            .get(cell.row as usize * self.width + cell.col as usize)
            .copied()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolution / origin configuration
// ────────────────────────────────────────────────────────────────────────────

/// Directly supplied map parameters. Any `None` field is looked up in the
/// map's metadata file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MapConfig {
    pub resolution: Option<f64>,
    pub origin: Option<Point2>,
}

impl MapConfig {
    pub fn new(resolution: Option<f64>, origin: Option<Point2>) -> Self {
        Self { resolution, origin }
    }

    /// True when no metadata lookup is needed.
    pub fn is_complete(&self) -> bool {
        self.resolution.is_some() && self.origin.is_some()
    }

    /// Resolve resolution and origin, preferring directly supplied values
    /// over `metadata`.
    ///
    /// # Errors
    ///
    /// - [`LitterError::MissingMapConfig`] naming every field that neither
    ///   source provides.
    /// - [`LitterError::InvalidMapConfig`] when a resolved value is unusable.
    pub fn resolve(&self, metadata: Option<&MapMetadata>) -> Result<(f64, Point2), LitterError> {
        let resolution = self
            .resolution
            .or_else(|| metadata.and_then(|m| m.resolution));
        let origin = self
            .origin
            .or_else(|| metadata.and_then(MapMetadata::origin_point));

        let mut missing = Vec::new();
        if resolution.is_none() {
            missing.push("resolution".to_string());
        }
        if origin.is_none() {
            missing.push("origin".to_string());
        }

        match (resolution, origin) {
            (Some(resolution), Some(origin)) => {
                validate(resolution, origin)?;
                Ok((resolution, origin))
            }
            _ => Err(LitterError::MissingMapConfig { fields: missing }),
        }
    }
}

fn validate(resolution: f64, origin: Point2) -> Result<(), LitterError> {
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(LitterError::InvalidMapConfig(format!(
            "resolution must be a positive number, got {resolution}"
        )));
    }
    if !origin.x.is_finite() || !origin.y.is_finite() {
        return Err(LitterError::InvalidMapConfig(format!(
            "origin must be finite, got ({}, {})",
            origin.x, origin.y
        )));
    }
    Ok(())
}

/// Contents of a map's metadata YAML. Unrelated keys (`image`,
/// `occupied_thresh`, ...) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapMetadata {
    #[serde(default)]
    pub resolution: Option<f64>,
    #[serde(default)]
    pub origin: Option<MetadataOrigin>,
}

/// Either `origin: {x: .., y: ..}` or the ROS form `origin: [x, y, yaw]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetadataOrigin {
    Named { x: f64, y: f64 },
    Sequence(Vec<f64>),
}

impl MapMetadata {
    /// Parse metadata from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, LitterError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| LitterError::InvalidMapConfig(format!("failed to parse map metadata: {e}")))
    }

    /// Read metadata from `path`. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>, LitterError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_yaml(&raw).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "map metadata file not found");
                Ok(None)
            }
            Err(e) => Err(LitterError::MapIo(format!(
                "failed to read map metadata {}: {e}",
                path.display()
            ))),
        }
    }

    /// The origin as a point; `None` when absent or not a 2/3-element
    /// sequence.
    pub fn origin_point(&self) -> Option<Point2> {
        match self.origin.as_ref()? {
            MetadataOrigin::Named { x, y } => Some(Point2::new(*x, *y)),
            MetadataOrigin::Sequence(v) if v.len() == 2 || v.len() == 3 => {
                Some(Point2::new(v[0], v[1]))
            }
            MetadataOrigin::Sequence(v) => {
                warn!(len = v.len(), "map metadata origin must have 2 or 3 elements");
                None
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OccupancyMap
// ────────────────────────────────────────────────────────────────────────────

/// An immutable occupancy grid anchored in metric space.
#[derive(Debug, Clone)]
pub struct OccupancyMap {
    grid: OccupancyGrid,
    resolution: f64,
    origin: Point2,
}

impl OccupancyMap {
    /// Wrap `grid` with its metric anchoring.
    ///
    /// # Errors
    ///
    /// Returns [`LitterError::InvalidMapConfig`] when `resolution` is not a
    /// positive finite number or `origin` is not finite.
    pub fn new(grid: OccupancyGrid, resolution: f64, origin: Point2) -> Result<Self, LitterError> {
        validate(resolution, origin)?;
        Ok(Self {
            grid,
            resolution,
            origin,
        })
    }

    /// Load `<stem>.pgm`, reading `<stem>.yaml` only when `config` leaves
    /// resolution or origin unset.
    pub fn load(stem: impl AsRef<Path>, config: &MapConfig) -> Result<Self, LitterError> {
        let stem = stem.as_ref();
        let image_path = with_suffix(stem, ".pgm");

        let image = image::open(&image_path)
            .map_err(|e| {
                LitterError::MapIo(format!(
                    "failed to load map image {}: {e}",
                    image_path.display()
                ))
            })?
            .into_luma8();

        let metadata = if config.is_complete() {
            None
        } else {
            MapMetadata::load(&with_suffix(stem, ".yaml"))?
        };

        let map = Self::from_image(&image, config, metadata.as_ref())?;
        debug!(
            path = %image_path.display(),
            width = map.grid.width(),
            height = map.grid.height(),
            resolution = map.resolution,
            "occupancy map loaded"
        );
        Ok(map)
    }

    /// Build a map from an in-memory raster.
    pub fn from_image(
        image: &GrayImage,
        config: &MapConfig,
        metadata: Option<&MapMetadata>,
    ) -> Result<Self, LitterError> {
        let (resolution, origin) = config.resolve(metadata)?;
        let grid = OccupancyGrid::from_image(image)?;
        Ok(Self {
            grid,
            resolution,
            origin,
        })
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn origin(&self) -> Point2 {
        self.origin
    }

    /// Convert a metric point to the grid cell containing it.
    ///
    /// The result may lie outside the grid.
    pub fn to_grid(&self, point: Point2) -> GridCell {
        let col = ((point.x - self.origin.x) / self.resolution).floor() as i64;
        let up = ((point.y - self.origin.y) / self.resolution).floor() as i64;
        GridCell::new(col, self.grid.height() as i64 - up)
    }

    /// Metric centre of `cell`; the inverse of [`to_grid`][Self::to_grid].
    pub fn to_metric(&self, cell: GridCell) -> Point2 {
        let up = self.grid.height() as i64 - cell.row;
        Point2::new(
            self.origin.x + (cell.col as f64 + 0.5) * self.resolution,
            self.origin.y + (up as f64 + 0.5) * self.resolution,
        )
    }

    /// State of the cell containing `point`, `None` off the grid.
    pub fn cell_state(&self, point: Point2) -> Option<CellState> {
        self.grid.get(self.to_grid(point))
    }

    /// True when nothing occupied lies on the straight path from `from` to
    /// `to`.
    ///
    /// Unknown cells do not block. Cells outside the grid do: a ray that
    /// leaves the mapped area cannot be confirmed clear. Identical endpoints
    /// always have line of sight.
    pub fn line_of_sight(&self, from: Point2, to: Point2) -> bool {
        if from == to {
            return true;
        }
        let a = self.to_grid(from);
        let b = self.to_grid(to);
        // Both endpoints are on the line, so an off-grid endpoint blocks.
        if !(self.grid.contains(a) && self.grid.contains(b)) {
            return false;
        }
        rasterize(a.col, a.row, b.col, b.row)
            .all(|cell| matches!(self.grid.get(cell), Some(state) if !state.blocks_sight()))
    }
}

fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut raw = stem.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}
