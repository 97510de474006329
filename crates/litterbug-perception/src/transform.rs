//! Orientation conversions.
//!
//! Odometry reports orientation as a unit quaternion; the map and scanner
//! only need the planar heading. [`Quaternion::to_euler`] yields
//! roll/pitch/yaw using the aerospace (ZYX) convention.
//!
//! # Example
//!
//! ```rust
//! use litterbug_perception::transform::Quaternion;
//!
//! let q = Quaternion::from_yaw(std::f64::consts::FRAC_PI_2);
//! assert!((q.yaw() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
//! ```

use litterbug_types::Orientation;

/// A rotation quaternion (w, x, y, z convention).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// The identity rotation.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// A pure rotation of `yaw` radians about +Z.
    pub fn from_yaw(yaw: f64) -> Self {
        let half = yaw * 0.5;
        Self::new(half.cos(), 0.0, 0.0, half.sin())
    }

    pub fn norm(self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Roll, pitch and yaw in radians.
    ///
    /// Pitch is clamped to ±π/2 so slightly denormalised input cannot
    /// produce NaN.
    pub fn to_euler(self) -> Orientation {
        let Self { w, x, y, z } = self;

        let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
        let pitch = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0).asin();
        let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));

        Orientation::new(roll, pitch, yaw)
    }

    /// Heading about +Z, in (-π, π].
    pub fn yaw(self) -> f64 {
        self.to_euler().yaw
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn identity_has_zero_angles() {
        let e = Quaternion::identity().to_euler();
        assert!(e.roll.abs() < EPS && e.pitch.abs() < EPS && e.yaw.abs() < EPS);
    }

    #[test]
    fn yaw_roundtrip() {
        for yaw in [-3.0, -FRAC_PI_2, -0.1, 0.0, 0.7, FRAC_PI_4, 2.5] {
            let q = Quaternion::from_yaw(yaw);
            assert!((q.norm() - 1.0).abs() < EPS);
            let e = q.to_euler();
            assert!((e.yaw - yaw).abs() < EPS, "yaw {yaw} -> {}", e.yaw);
            assert!(e.roll.abs() < EPS);
            assert!(e.pitch.abs() < EPS);
        }
    }

    #[test]
    fn half_turn_yaw() {
        let q = Quaternion::new(0.0, 0.0, 0.0, 1.0);
        assert!((q.yaw().abs() - PI).abs() < EPS);
    }

    #[test]
    fn pure_roll() {
        let half = FRAC_PI_4 * 0.5;
        let q = Quaternion::new(half.cos(), half.sin(), 0.0, 0.0);
        let e = q.to_euler();
        assert!((e.roll - FRAC_PI_4).abs() < EPS);
        assert!(e.yaw.abs() < EPS);
    }

    #[test]
    fn gimbal_lock_pitch_is_clamped() {
        // Slightly over-unit quaternion at +90° pitch.
        let s = FRAC_PI_4.sin() * 1.0001;
        let q = Quaternion::new(s, 0.0, s, 0.0);
        let e = q.to_euler();
        assert!(!e.pitch.is_nan());
        assert!((e.pitch - FRAC_PI_2).abs() < EPS);
    }
}
