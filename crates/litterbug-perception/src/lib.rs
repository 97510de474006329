//! `litterbug-perception` – the geometric half of the vision simulation.
//!
//! Answers "could the robot see that?" against a static occupancy map.
//!
//! # Modules
//!
//! - [`raster`] – [`LineCells`][raster::LineCells]: integer line
//!   rasterisation between two grid cells, symmetric under reversal.
//! - [`map`] – [`OccupancyMap`][map::OccupancyMap]: a three-state occupancy
//!   grid loaded from a grayscale raster plus resolution/origin metadata,
//!   with metric ↔ grid conversion and line-of-sight queries.
//! - [`transform`] – [`Quaternion`][transform::Quaternion]: conversion of
//!   odometry orientation quaternions to roll/pitch/yaw.

pub mod map;
pub mod raster;
pub mod transform;

pub use map::{CellState, MapConfig, OccupancyGrid, OccupancyMap};
pub use raster::{GridCell, LineCells, rasterize};
pub use transform::Quaternion;
