//! Integer line rasterisation.
//!
//! Produces every grid cell a straight segment between two cells passes
//! through, origin first and target last, using integer arithmetic only.
//!
//! ```text
//! From (0,0) to (7,3):
//!
//!     3 │             ● ●
//!     2 │         ● ●
//!     1 │     ● ●
//!     0 │ ● ●
//!       └────────────────
//!         0 1 2 3 4 5 6 7
//! ```
//!
//! Each step advances one cell along the major axis; the minor-axis offset
//! at step `i` is `i * minor / major` rounded to the nearest integer.  Exact
//! halves are the only place where two valid rasterisations disagree, so the
//! tie is broken by the direction of travel: half-up when walking from the
//! lexicographically smaller endpoint, half-down otherwise.  That makes
//! `rasterize(b, a)` the exact reverse of `rasterize(a, b)`.
//!
//! # Example
//!
//! ```rust
//! use litterbug_perception::raster::{rasterize, GridCell};
//!
//! let cells: Vec<GridCell> = rasterize(0, 0, 4, 0).collect();
//! assert_eq!(cells.len(), 5);
//! assert_eq!(cells[0], GridCell::new(0, 0));
//! assert_eq!(cells[4], GridCell::new(4, 0));
//! ```

use serde::{Deserialize, Serialize};

/// A grid cell index. Column grows to the right, row grows downward from
/// the top-left corner of the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub col: i64,
    pub row: i64,
}

impl GridCell {
    pub fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }
}

/// Iterator over the cells of one rasterised segment.
///
/// Obtained from [`rasterize`]. Holds no state beyond the step index, so
/// cloning it or calling [`rasterize`] again replays the same sequence.
/// Spans are kept in 128-bit arithmetic, so any pair of `i64` endpoints is
/// accepted.
#[derive(Debug, Clone)]
pub struct LineCells {
    start: GridCell,
    /// Unit step along the major axis.
    major_step: (i128, i128),
    /// Unit step along the minor axis.
    minor_step: (i128, i128),
    major: u128,
    minor: u128,
    round_half_up: bool,
    next_index: u128,
}

/// Rasterise the segment from `(x0, y0)` to `(x1, y1)`.
///
/// Both endpoints are always part of the sequence. A degenerate segment
/// yields its single cell.
pub fn rasterize(x0: i64, y0: i64, x1: i64, y1: i64) -> LineCells {
    let dx = i128::from(x1) - i128::from(x0);
    let dy = i128::from(y1) - i128::from(y0);
    let sx = dx.signum();
    let sy = dy.signum();

    let (major, minor, major_step, minor_step) = if dy.unsigned_abs() > dx.unsigned_abs() {
        (dy.unsigned_abs(), dx.unsigned_abs(), (0, sy), (sx, 0))
    } else {
        (dx.unsigned_abs(), dy.unsigned_abs(), (sx, 0), (0, sy))
    };

    LineCells {
        start: GridCell::new(x0, y0),
        major_step,
        minor_step,
        major,
        minor,
        round_half_up: (x0, y0) <= (x1, y1),
        next_index: 0,
    }
}

impl LineCells {
    /// Minor-axis offset at major step `i`: `i * minor / major` rounded.
    ///
    /// `i * minor` is split into `q * major + r` so that only the remainder
    /// is doubled; both spans are below 2^64, so nothing here overflows.
    fn minor_offset(&self, i: u128) -> u128 {
        if self.major == 0 {
            return 0;
        }
        let product = i * self.minor;
        let (q, r) = (product / self.major, product % self.major);
        let num = 2 * r + self.major;
        let denom = 2 * self.major;
        if self.round_half_up {
            q + num / denom
        } else {
            q + (num - 1) / denom
        }
    }
}

impl Iterator for LineCells {
    type Item = GridCell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index > self.major {
            return None;
        }
        let i = self.next_index;
        let j = self.minor_offset(i);
        self.next_index += 1;

        // Both offsets are bounded by the spans, so every cell lies between
        // the endpoints and fits back into i64.
        let (i, j) = (i as i128, j as i128);
        Some(GridCell::new(
            (i128::from(self.start.col) + self.major_step.0 * i + self.minor_step.0 * j) as i64,
            (i128::from(self.start.row) + self.major_step.1 * i + self.minor_step.1 * j) as i64,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.major + 1).saturating_sub(self.next_index);
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LineCells {}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(x0: i64, y0: i64, x1: i64, y1: i64) -> Vec<GridCell> {
        rasterize(x0, y0, x1, y1).collect()
    }

    #[test]
    fn degenerate_segment_yields_single_cell() {
        assert_eq!(cells(3, -2, 3, -2), vec![GridCell::new(3, -2)]);
    }

    #[test]
    fn horizontal_line_has_length_plus_one_cells() {
        let line = cells(2, 5, 9, 5);
        assert_eq!(line.len(), 8);
        assert!(line.iter().all(|c| c.row == 5));
        assert!(line.windows(2).all(|w| w[1].col == w[0].col + 1));
    }

    #[test]
    fn horizontal_line_leftwards() {
        let line = cells(4, 0, 0, 0);
        let cols: Vec<i64> = line.iter().map(|c| c.col).collect();
        assert_eq!(cols, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn vertical_line() {
        let line = cells(1, 6, 1, 2);
        assert_eq!(line.len(), 5);
        assert!(line.iter().all(|c| c.col == 1));
        assert!(line.windows(2).all(|w| w[1].row == w[0].row - 1));
    }

    #[test]
    fn diagonal_line_steps_both_axes() {
        let line = cells(0, 0, 4, -4);
        let expected: Vec<GridCell> = (0..=4).map(|i| GridCell::new(i, -i)).collect();
        assert_eq!(line, expected);
    }

    #[test]
    fn shallow_slope_matches_reference_cells() {
        let line = cells(0, 0, 7, 3);
        let expected = vec![
            GridCell::new(0, 0),
            GridCell::new(1, 0),
            GridCell::new(2, 1),
            GridCell::new(3, 1),
            GridCell::new(4, 2),
            GridCell::new(5, 2),
            GridCell::new(6, 3),
            GridCell::new(7, 3),
        ];
        assert_eq!(line, expected);
    }

    #[test]
    fn steep_slope_advances_rows() {
        let line = cells(0, 0, 2, 6);
        assert_eq!(line.len(), 7);
        assert!(line.windows(2).all(|w| w[1].row == w[0].row + 1));
        assert_eq!(line.first(), Some(&GridCell::new(0, 0)));
        assert_eq!(line.last(), Some(&GridCell::new(2, 6)));
    }

    #[test]
    fn every_octant_is_connected_and_hits_both_endpoints() {
        for (x1, y1) in [(5, 2), (2, 5), (-2, 5), (-5, 2), (-5, -2), (-2, -5), (2, -5), (5, -2)] {
            let line = cells(0, 0, x1, y1);
            assert_eq!(line.first(), Some(&GridCell::new(0, 0)));
            assert_eq!(line.last(), Some(&GridCell::new(x1, y1)));
            for w in line.windows(2) {
                assert!((w[1].col - w[0].col).abs() <= 1, "gap in {line:?}");
                assert!((w[1].row - w[0].row).abs() <= 1, "gap in {line:?}");
            }
        }
    }

    #[test]
    fn reversal_yields_reverse_sequence() {
        // Covers every slope in a small window, including all tie cases.
        for x0 in -3..=3 {
            for y0 in -3..=3 {
                for x1 in -3..=3 {
                    for y1 in -3..=3 {
                        let forward = cells(x0, y0, x1, y1);
                        let mut backward = cells(x1, y1, x0, y0);
                        backward.reverse();
                        assert_eq!(forward, backward, "({x0},{y0}) -> ({x1},{y1})");
                    }
                }
            }
        }
    }

    #[test]
    fn extreme_endpoints_do_not_overflow() {
        let mut line = rasterize(i64::MIN, 0, i64::MAX, i64::MAX);
        assert_eq!(line.next(), Some(GridCell::new(i64::MIN, 0)));
        assert_eq!(line.next(), Some(GridCell::new(i64::MIN + 1, 0)));

        let mut reverse = rasterize(i64::MAX, i64::MAX, i64::MIN, 0);
        assert_eq!(reverse.next(), Some(GridCell::new(i64::MAX, i64::MAX)));
        assert_eq!(reverse.next(), Some(GridCell::new(i64::MAX - 1, i64::MAX)));

        let mut far = rasterize(5, 5, 1_000_000_000_000_000_000, 900_000_000_000_000_000);
        assert_eq!(far.len() as u128, 999_999_999_999_999_996);
        assert_eq!(far.next(), Some(GridCell::new(5, 5)));
    }

    #[test]
    fn exact_size_and_restartable() {
        let line = rasterize(0, 0, 10, 3);
        assert_eq!(line.len(), 11);
        let again: Vec<GridCell> = line.clone().collect();
        let first: Vec<GridCell> = line.collect();
        assert_eq!(first, again);
    }
}
