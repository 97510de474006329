//! Simulated object vision.
//!
//! [`VisionScanner::scan`] turns one snapshot of robot pose and known items
//! into the detections a noisy camera would report:
//!
//! | Stage | Effect |
//! |---|---|
//! | Visibility | Items without line of sight from the robot are skipped. |
//! | False negatives | A visible item is suppressed with `false_negative_probability`. |
//! | Mislabels | A surviving item is reported under a random known label with the per-tick ghost probability. |
//! | Ghosts | With `mislabel_probability`, one fabricated item is placed in view. |
//! | Location error | Reported origins are jittered by up to `error.{x,y}` metres. |
//!
//! Mislabels and ghosts only happen with `enable_false_positives`; the
//! mislabel stage additionally requires `enable_false_negatives`.
//!
//! Randomness comes from the caller-supplied [`Rng`], so a seeded
//! [`StdRng`] makes scans reproducible.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use litterbug_perception::OccupancyMap;
use litterbug_types::{Detection, Item, LitterError, Orientation, Point2, RobotPose};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Sampled positions tried per ghost before giving up for the tick.
pub const GHOST_ATTEMPTS: usize = 25;

// ────────────────────────────────────────────────────────────────────────────
// Parameters
// ────────────────────────────────────────────────────────────────────────────

/// Per-axis location error magnitude (metres).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocationError {
    pub x: f64,
    pub y: f64,
}

/// Sensor and noise-model settings. Fixed for the lifetime of a scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisionParameters {
    pub enable_simulation: bool,
    /// Scan frequency (Hz).
    pub fps: f64,
    /// Half-angle of the field of view (degrees).
    pub fov: f64,
    /// Maximum sensing range (metres).
    pub range: f64,
    pub minimum_range: f64,
    pub error: LocationError,
    pub enable_false_negatives: bool,
    pub false_negative_probability: f64,
    pub enable_false_positives: bool,
    /// Expected false detections per second.
    pub ghost_positive_rate: f64,
    pub mislabel_probability: f64,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for VisionParameters {
    fn default() -> Self {
        Self {
            enable_simulation: true,
            fps: 10.0,
            fov: 45.0,
            range: 5.0,
            minimum_range: 0.3,
            error: LocationError::default(),
            enable_false_negatives: false,
            false_negative_probability: 0.05,
            enable_false_positives: false,
            ghost_positive_rate: 30.0,
            mislabel_probability: 0.05,
            seed: None,
        }
    }
}

impl VisionParameters {
    /// Check every field, reporting all problems at once.
    ///
    /// # Errors
    ///
    /// Returns [`LitterError::Config`] listing each invalid field.
    pub fn validate(&self) -> Result<(), LitterError> {
        let mut problems = Vec::new();

        if !(self.fps.is_finite() && self.fps > 0.0) {
            problems.push(format!("fps must be positive, got {}", self.fps));
        } else if !Duration::try_from_secs_f64(1.0 / self.fps).is_ok_and(|period| !period.is_zero()) {
            problems.push(format!("fps {} gives no usable tick period", self.fps));
        }
        if !(0.0..=180.0).contains(&self.fov) {
            problems.push(format!("fov must be within [0, 180] degrees, got {}", self.fov));
        }
        for (name, value) in [("range", self.range), ("minimum_range", self.minimum_range)] {
            if !(value.is_finite() && value >= 0.0) {
                problems.push(format!("{name} must be a non-negative distance, got {value}"));
            }
        }
        if self.minimum_range > self.range {
            problems.push(format!(
                "minimum_range {} exceeds range {}",
                self.minimum_range, self.range
            ));
        }
        for (name, value) in [("error.x", self.error.x), ("error.y", self.error.y)] {
            if !(value.is_finite() && value >= 0.0) {
                problems.push(format!("{name} must be non-negative, got {value}"));
            }
        }
        for (name, value) in [
            ("false_negative_probability", self.false_negative_probability),
            ("mislabel_probability", self.mislabel_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                problems.push(format!("{name} must be within [0, 1], got {value}"));
            }
        }
        if !(self.ghost_positive_rate > 0.0) {
            problems.push(format!(
                "ghost_positive_rate must be positive, got {}",
                self.ghost_positive_rate
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(LitterError::Config(format!("invalid vision parameters: {}", problems.join("; "))))
        }
    }

    /// Per-tick probability derived from the ghost rate:
    /// `(1 / ghost_positive_rate) * (1 / fps)`.
    pub fn ghost_probability(&self) -> f64 {
        (1.0 / self.ghost_positive_rate) * (1.0 / self.fps)
    }

    /// Time between scan ticks. Non-zero for parameters that pass
    /// [`validate`][Self::validate].
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Statistics
// ────────────────────────────────────────────────────────────────────────────

/// Running counters for scan outcomes that are otherwise silent.
#[derive(Debug, Default)]
pub struct ScanStats {
    ticks: AtomicU64,
    skipped_ticks: AtomicU64,
    detections: AtomicU64,
    suppressed: AtomicU64,
    mislabeled: AtomicU64,
    ghosts: AtomicU64,
    ghost_budget_exhausted: AtomicU64,
    empty_label_set: AtomicU64,
}

/// Point-in-time copy of [`ScanStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStatsSnapshot {
    pub ticks: u64,
    pub skipped_ticks: u64,
    pub detections: u64,
    pub suppressed: u64,
    pub mislabeled: u64,
    pub ghosts: u64,
    pub ghost_budget_exhausted: u64,
    pub empty_label_set: u64,
}

impl ScanStats {
    pub fn snapshot(&self) -> ScanStatsSnapshot {
        ScanStatsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            skipped_ticks: self.skipped_ticks.load(Ordering::Relaxed),
            detections: self.detections.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            mislabeled: self.mislabeled.load(Ordering::Relaxed),
            ghosts: self.ghosts.load(Ordering::Relaxed),
            ghost_budget_exhausted: self.ghost_budget_exhausted.load(Ordering::Relaxed),
            empty_label_set: self.empty_label_set.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn add_skipped_ticks(&self, n: u64) {
        self.skipped_ticks.fetch_add(n, Ordering::Relaxed);
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scanner
// ────────────────────────────────────────────────────────────────────────────

/// Produces detections from pose and item snapshots against a fixed map.
pub struct VisionScanner<R: Rng> {
    params: VisionParameters,
    ghost_probability: f64,
    map: OccupancyMap,
    rng: R,
    stats: Arc<ScanStats>,
}

impl VisionScanner<StdRng> {
    /// Scanner backed by a [`StdRng`] seeded from `params.seed`, or from
    /// entropy when unset.
    pub fn seeded(params: VisionParameters, map: OccupancyMap) -> Result<Self, LitterError> {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(params, map, rng)
    }
}

impl<R: Rng> VisionScanner<R> {
    /// # Errors
    ///
    /// Returns [`LitterError::Config`] when `params` fail validation.
    pub fn new(params: VisionParameters, map: OccupancyMap, rng: R) -> Result<Self, LitterError> {
        params.validate()?;
        let ghost_probability = params.ghost_probability();
        Ok(Self {
            params,
            ghost_probability,
            map,
            rng,
            stats: Arc::new(ScanStats::default()),
        })
    }

    pub fn params(&self) -> &VisionParameters {
        &self.params
    }

    pub fn map(&self) -> &OccupancyMap {
        &self.map
    }

    /// Shared handle to this scanner's counters.
    pub fn stats(&self) -> Arc<ScanStats> {
        Arc::clone(&self.stats)
    }

    /// Run one tick. Detections come back in registry order followed by at
    /// most one ghost.
    ///
    /// Never fails: an empty registry or label set simply produces fewer
    /// detections.
    pub fn scan(&mut self, pose: &RobotPose, items: &[Item], labels: &[String]) -> Vec<Detection> {
        ScanStats::bump(&self.stats.ticks);
        let mut detections = Vec::new();

        for item in items {
            if !self.map.line_of_sight(pose.location, item.origin) {
                continue;
            }
            if let Some(detection) = self.observe(item, labels) {
                detections.push(detection);
            }
        }

        if self.params.enable_false_positives && self.ghost_probability > 0.0 {
            if let Some(ghost) = self.ghost(pose, labels) {
                detections.push(ghost);
            }
        }

        let detections: Vec<Detection> = detections
            .into_iter()
            .map(|d| self.apply_location_error(d))
            .collect();

        self.stats
            .detections
            .fetch_add(detections.len() as u64, Ordering::Relaxed);
        trace!(
            x = pose.location.x,
            y = pose.location.y,
            items = items.len(),
            detections = detections.len(),
            "scan tick"
        );
        detections
    }

    /// Noise model for one visible item.
    fn observe(&mut self, item: &Item, labels: &[String]) -> Option<Detection> {
        if !self.params.enable_false_negatives {
            return Some(Detection::observed(item));
        }

        if self.rng.r#gen::<f64>() < self.params.false_negative_probability {
            ScanStats::bump(&self.stats.suppressed);
            return None;
        }

        if self.params.enable_false_positives && self.rng.r#gen::<f64>() < self.ghost_probability {
            let label = self.draw_label(labels)?;
            ScanStats::bump(&self.stats.mislabeled);
            return Some(Detection::mislabeled(item, label));
        }

        Some(Detection::observed(item))
    }

    /// Try to fabricate one item somewhere the robot could plausibly see.
    fn ghost(&mut self, pose: &RobotPose, labels: &[String]) -> Option<Detection> {
        if self.rng.r#gen::<f64>() >= self.params.mislabel_probability {
            return None;
        }
        let label = self.draw_label(labels)?;

        let fov = self.params.fov.to_radians();
        let origin = pose.location;
        for _ in 0..GHOST_ATTEMPTS {
            let angle = pose.heading_rad + self.rng.gen_range(-fov..=fov);
            let distance = self
                .rng
                .gen_range(self.params.minimum_range..=self.params.range);
            let spot = Point2::new(
                origin.x + distance * angle.cos(),
                origin.y + distance * angle.sin(),
            );

            if self.map.line_of_sight(origin, spot) {
                ScanStats::bump(&self.stats.ghosts);
                return Some(Detection::ghost(label, spot, Orientation::from_yaw(pose.heading_rad)));
            }
        }

        ScanStats::bump(&self.stats.ghost_budget_exhausted);
        debug!(attempts = GHOST_ATTEMPTS, "no visible spot for ghost detection");
        None
    }

    fn draw_label(&mut self, labels: &[String]) -> Option<String> {
        match labels.choose(&mut self.rng) {
            Some(label) => Some(label.clone()),
            None => {
                ScanStats::bump(&self.stats.empty_label_set);
                debug!(error = %LitterError::EmptyLabelSet, "label draw skipped");
                None
            }
        }
    }

    fn apply_location_error(&mut self, mut detection: Detection) -> Detection {
        let LocationError { x, y } = self.params.error;
        if x > 0.0 {
            detection.origin.x += self.rng.gen_range(-x..=x);
        }
        if y > 0.0 {
            detection.origin.y += self.rng.gen_range(-y..=y);
        }
        detection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use litterbug_perception::{CellState, OccupancyGrid};
    use litterbug_types::DetectionKind;

    const SIZE: usize = 20;

    /// 20×20 free map, 1 m cells, origin (0, 0): metric (x, y) lands in
    /// col floor(x), row 20 - floor(y). `walls` are (col, row) cells.
    fn map_with_walls(walls: &[(usize, usize)]) -> OccupancyMap {
        let mut cells = vec![CellState::Free; SIZE * SIZE];
        for &(col, row) in walls {
            cells[row * SIZE + col] = CellState::Occupied;
        }
        let grid = OccupancyGrid::new(SIZE, SIZE, cells).unwrap();
        OccupancyMap::new(grid, 1.0, Point2::default()).unwrap()
    }

    /// Every cell occupied except the one holding the robot at (10.5, 10.5).
    fn boxed_in_map() -> OccupancyMap {
        let mut cells = vec![CellState::Occupied; SIZE * SIZE];
        cells[10 * SIZE + 10] = CellState::Free;
        let grid = OccupancyGrid::new(SIZE, SIZE, cells).unwrap();
        OccupancyMap::new(grid, 1.0, Point2::default()).unwrap()
    }

    fn robot() -> RobotPose {
        RobotPose::new(5.5, 10.5, 0.0)
    }

    fn can() -> Item {
        Item::new(
            Some("can-1".to_string()),
            "can",
            Point2::new(12.5, 10.5),
            Orientation::from_yaw(0.3),
            "models/can",
        )
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn scanner(params: VisionParameters, map: OccupancyMap) -> VisionScanner<StdRng> {
        VisionScanner::new(params, map, StdRng::seed_from_u64(7)).unwrap()
    }

    // ── Parameters ──────────────────────────────────────────────────────────

    #[test]
    fn defaults_are_valid() {
        assert!(VisionParameters::default().validate().is_ok());
    }

    #[test]
    fn ghost_probability_formula() {
        let params = VisionParameters {
            fps: 10.0,
            ghost_positive_rate: 30.0,
            ..Default::default()
        };
        assert!((params.ghost_probability() - 1.0 / 300.0).abs() < 1e-15);
        assert_eq!(params.tick_period(), Duration::from_millis(100));
    }

    #[test]
    fn infinite_ghost_rate_means_zero_probability() {
        let params = VisionParameters {
            ghost_positive_rate: f64::INFINITY,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
        assert_eq!(params.ghost_probability(), 0.0);
    }

    #[test]
    fn validate_reports_every_bad_field() {
        let params = VisionParameters {
            fps: 0.0,
            fov: 270.0,
            minimum_range: 6.0,
            false_negative_probability: 1.5,
            ghost_positive_rate: f64::NAN,
            ..Default::default()
        };
        let Err(LitterError::Config(msg)) = params.validate() else {
            panic!("expected Config error");
        };
        for field in ["fps", "fov", "minimum_range", "false_negative_probability", "ghost_positive_rate"] {
            assert!(msg.contains(field), "{field} missing from {msg}");
        }
    }

    #[test]
    fn validate_rejects_unrepresentable_tick_periods() {
        for fps in [1e12, 1e-20] {
            let params = VisionParameters {
                fps,
                ..Default::default()
            };
            let Err(LitterError::Config(msg)) = params.validate() else {
                panic!("fps {fps} should be rejected");
            };
            assert!(msg.contains("tick period"), "{msg}");
        }

        let fast = VisionParameters {
            fps: 1e6,
            ..Default::default()
        };
        assert!(fast.validate().is_ok());
        assert!(!fast.tick_period().is_zero());
    }

    #[test]
    fn scanner_rejects_invalid_parameters() {
        let params = VisionParameters {
            fps: -1.0,
            ..Default::default()
        };
        let result = VisionScanner::new(params, map_with_walls(&[]), StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(LitterError::Config(_))));
    }

    // ── Visibility ──────────────────────────────────────────────────────────

    #[test]
    fn noiseless_scan_reports_visible_item_unchanged() {
        let mut scanner = scanner(VisionParameters::default(), map_with_walls(&[]));
        let item = can();
        for _ in 0..10 {
            let detections = scanner.scan(&robot(), std::slice::from_ref(&item), &labels(&["can"]));
            assert_eq!(detections, vec![Detection::observed(&item)]);
        }
        let stats = scanner.stats().snapshot();
        assert_eq!(stats.ticks, 10);
        assert_eq!(stats.detections, 10);
    }

    #[test]
    fn occluded_item_is_never_reported() {
        // Wall cell between robot (col 5) and can (col 12) on row 10.
        let params = VisionParameters {
            enable_false_negatives: true,
            false_negative_probability: 0.0,
            enable_false_positives: true,
            ghost_positive_rate: 0.01,
            mislabel_probability: 0.0,
            ..Default::default()
        };
        let mut scanner = scanner(params, map_with_walls(&[(9, 10)]));
        for _ in 0..100 {
            assert!(scanner.scan(&robot(), &[can()], &labels(&["can", "bottle"])).is_empty());
        }
        assert_eq!(scanner.stats().snapshot().mislabeled, 0);
    }

    // ── False negatives ─────────────────────────────────────────────────────

    #[test]
    fn certain_false_negative_suppresses_every_tick() {
        let params = VisionParameters {
            enable_false_negatives: true,
            false_negative_probability: 1.0,
            ..Default::default()
        };
        let mut scanner = scanner(params, map_with_walls(&[]));
        for _ in 0..1000 {
            assert!(scanner.scan(&robot(), &[can()], &labels(&["can"])).is_empty());
        }
        assert_eq!(scanner.stats().snapshot().suppressed, 1000);
    }

    #[test]
    fn false_negative_rate_is_roughly_honoured() {
        let params = VisionParameters {
            enable_false_negatives: true,
            false_negative_probability: 0.25,
            ..Default::default()
        };
        let mut scanner = scanner(params, map_with_walls(&[]));
        let seen: usize = (0..4000)
            .map(|_| scanner.scan(&robot(), &[can()], &labels(&["can"])).len())
            .sum();
        assert!((2700..=3300).contains(&seen), "seen {seen} of 4000");
    }

    // ── False positives ─────────────────────────────────────────────────────

    #[test]
    fn zero_ghost_probability_never_fabricates() {
        let params = VisionParameters {
            enable_false_negatives: true,
            false_negative_probability: 0.0,
            enable_false_positives: true,
            ghost_positive_rate: f64::INFINITY,
            mislabel_probability: 1.0,
            ..Default::default()
        };
        let item = can();
        let mut scanner = scanner(params, map_with_walls(&[]));
        for _ in 0..1000 {
            let detections = scanner.scan(&robot(), std::slice::from_ref(&item), &labels(&["bottle"]));
            assert_eq!(detections, vec![Detection::observed(&item)]);
        }
        let stats = scanner.stats().snapshot();
        assert_eq!(stats.ghosts, 0);
        assert_eq!(stats.mislabeled, 0);
    }

    #[test]
    fn mislabel_keeps_pose_and_drops_identity() {
        // ghost probability 1/(0.01 * 10) = 10, so every surviving item is mislabeled.
        let params = VisionParameters {
            enable_false_negatives: true,
            false_negative_probability: 0.0,
            enable_false_positives: true,
            ghost_positive_rate: 0.01,
            mislabel_probability: 0.0,
            ..Default::default()
        };
        let item = can();
        let mut scanner = scanner(params, map_with_walls(&[]));
        let detections = scanner.scan(&robot(), std::slice::from_ref(&item), &labels(&["bottle"]));

        assert_eq!(detections.len(), 1);
        let d = &detections[0];
        assert_eq!(d.kind, DetectionKind::Mislabeled);
        assert_eq!(d.label, "bottle");
        assert_eq!(d.origin, item.origin);
        assert_eq!(d.orientation, item.orientation);
        assert!(!d.is_real());
    }

    #[test]
    fn mislabel_with_no_known_labels_reports_nothing() {
        let params = VisionParameters {
            enable_false_negatives: true,
            false_negative_probability: 0.0,
            enable_false_positives: true,
            ghost_positive_rate: 0.01,
            mislabel_probability: 0.0,
            ..Default::default()
        };
        let mut scanner = scanner(params, map_with_walls(&[]));
        assert!(scanner.scan(&robot(), &[can()], &[]).is_empty());
        assert_eq!(scanner.stats().snapshot().empty_label_set, 1);
    }

    #[test]
    fn ghost_lands_in_view_within_range() {
        let params = VisionParameters {
            enable_false_positives: true,
            ghost_positive_rate: 0.01,
            mislabel_probability: 1.0,
            fov: 30.0,
            minimum_range: 1.0,
            range: 3.0,
            ..Default::default()
        };
        let pose = RobotPose::new(10.5, 10.5, 0.8);
        let mut scanner = scanner(params, map_with_walls(&[]));

        for _ in 0..200 {
            let detections = scanner.scan(&pose, &[], &labels(&["can", "bottle"]));
            assert_eq!(detections.len(), 1, "exactly one ghost per tick");
            let ghost = &detections[0];
            assert_eq!(ghost.kind, DetectionKind::Ghost);
            assert!(ghost.item_id.is_none());
            assert!(ghost.label == "can" || ghost.label == "bottle");
            assert_eq!(ghost.orientation, Orientation::from_yaw(0.8));

            let distance = pose.location.distance(ghost.origin);
            assert!((1.0 - 1e-9..=3.0 + 1e-9).contains(&distance), "distance {distance}");
            let bearing = (ghost.origin.y - pose.location.y).atan2(ghost.origin.x - pose.location.x);
            assert!((bearing - 0.8).abs() <= 30f64.to_radians() + 1e-9, "bearing {bearing}");
        }
        assert_eq!(scanner.stats().snapshot().ghosts, 200);
    }

    #[test]
    fn ghost_attempt_budget_exhausts_when_boxed_in() {
        let params = VisionParameters {
            enable_false_positives: true,
            ghost_positive_rate: 0.01,
            mislabel_probability: 1.0,
            minimum_range: 1.0,
            range: 2.0,
            ..Default::default()
        };
        let pose = RobotPose::new(10.5, 10.5, 0.0);
        let mut scanner = scanner(params, boxed_in_map());
        for _ in 0..50 {
            assert!(scanner.scan(&pose, &[], &labels(&["can"])).is_empty());
        }
        let stats = scanner.stats().snapshot();
        assert_eq!(stats.ghost_budget_exhausted, 50);
        assert_eq!(stats.ghosts, 0);
    }

    #[test]
    fn empty_registry_and_labels_yield_nothing() {
        let params = VisionParameters {
            enable_false_negatives: true,
            false_negative_probability: 0.5,
            enable_false_positives: true,
            ghost_positive_rate: 0.01,
            mislabel_probability: 1.0,
            ..Default::default()
        };
        let mut scanner = scanner(params, map_with_walls(&[]));
        for _ in 0..100 {
            assert!(scanner.scan(&robot(), &[], &[]).is_empty());
        }
        let stats = scanner.stats().snapshot();
        assert_eq!(stats.ticks, 100);
        assert_eq!(stats.empty_label_set, 100);
    }

    // ── Location error and determinism ──────────────────────────────────────

    #[test]
    fn location_error_stays_within_bounds() {
        let params = VisionParameters {
            error: LocationError { x: 0.5, y: 0.0 },
            ..Default::default()
        };
        let item = can();
        let mut scanner = scanner(params, map_with_walls(&[]));
        let mut moved = false;
        for _ in 0..100 {
            let d = &scanner.scan(&robot(), std::slice::from_ref(&item), &labels(&["can"]))[0];
            assert!((d.origin.x - item.origin.x).abs() <= 0.5);
            assert_eq!(d.origin.y, item.origin.y);
            moved |= d.origin.x != item.origin.x;
        }
        assert!(moved);
    }

    #[test]
    fn same_seed_same_detections() {
        let params = VisionParameters {
            enable_false_negatives: true,
            false_negative_probability: 0.3,
            enable_false_positives: true,
            ghost_positive_rate: 0.5,
            mislabel_probability: 0.5,
            seed: Some(99),
            ..Default::default()
        };
        let items = vec![can(), Item::new(Some("b".into()), "bottle", Point2::new(6.5, 14.5), Orientation::default(), "")];
        let known = labels(&["bottle", "can"]);

        let mut a = VisionScanner::seeded(params.clone(), map_with_walls(&[])).unwrap();
        let mut b = VisionScanner::seeded(params, map_with_walls(&[])).unwrap();
        for _ in 0..200 {
            assert_eq!(a.scan(&robot(), &items, &known), b.scan(&robot(), &items, &known));
        }
    }
}
