//! Toroidal grid addressing.
//!
//! Cells are stored row-major. Every row and column wraps, so each cell has
//! exactly eight Moore neighbors. Neighbor indices are precomputed once per
//! grid and shared by every layer.

use crate::error::{Result, UniverseError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTopology {
    rows: usize,
    cols: usize,
    neighbors: Vec<[usize; 8]>,
}

/// Moore offsets in scan order (row-major, center skipped).
pub const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Parameters of a wormhole's neighbor distortion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Warp {
    pub shift_speed: f64,
    pub spin: i8,
    pub amplitude: f64,
}

impl GridTopology {
    /// Builds the neighbor table.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero; use [`GridTopology::try_new`] for
    /// untrusted input.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        match Self::try_new(rows, cols) {
            Ok(topology) => topology,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(UniverseError::InvalidDimensions { rows, cols });
        }
        let mut neighbors = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                let mut entry = [0usize; 8];
                for (slot, (dr, dc)) in entry.iter_mut().zip(MOORE_OFFSETS) {
                    *slot = wrap(r as isize + dr, rows) * cols + wrap(c as isize + dc, cols);
                }
                neighbors.push(entry);
            }
        }
        Ok(Self {
            rows,
            cols,
            neighbors,
        })
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    #[inline(always)]
    #[must_use]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline(always)]
    #[must_use]
    pub fn coords(&self, idx: usize) -> (usize, usize) {
        (idx / self.cols, idx % self.cols)
    }

    /// Index of `(row + dr, col + dc)` after wrapping both axes.
    #[inline]
    #[must_use]
    pub fn offset(&self, row: usize, col: usize, dr: isize, dc: isize) -> usize {
        self.index(
            wrap(row as isize + dr, self.rows),
            wrap(col as isize + dc, self.cols),
        )
    }

    /// The eight Moore neighbors of `idx`, in [`MOORE_OFFSETS`] order.
    #[inline(always)]
    #[must_use]
    pub fn neighbors(&self, idx: usize) -> &[usize; 8] {
        &self.neighbors[idx]
    }

    /// Neighbors of `(row, col)` while a wormhole bends space.
    ///
    /// The whole window is shifted by an offset that oscillates with the tick,
    /// the event's shift speed and its spin sign. Deterministic.
    #[must_use]
    pub fn distorted_neighbors(
        &self,
        row: usize,
        col: usize,
        tick: u64,
        warp: &Warp,
    ) -> [usize; 8] {
        let phase = tick as f64 * warp.shift_speed;
        let spin = f64::from(warp.spin);
        let shift_r = (warp.amplitude * (phase + spin * col as f64 * 0.2).sin()).round() as isize;
        let shift_c = (warp.amplitude * (phase * spin + row as f64 * 0.2).cos()).round() as isize;
        let mut out = [0usize; 8];
        for (slot, (dr, dc)) in out.iter_mut().zip(MOORE_OFFSETS) {
            *slot = self.offset(row, col, dr + shift_r, dc + shift_c);
        }
        out
    }

    /// Sum of `layer` over the eight neighbors of `idx`.
    #[inline]
    #[must_use]
    pub fn neighbor_sum(&self, layer: &[u8], idx: usize) -> u8 {
        self.neighbors[idx].iter().map(|&n| layer[n]).sum()
    }

    /// Shortest wrapped distance between two rows.
    #[inline]
    #[must_use]
    pub fn row_delta(&self, a: usize, b: usize) -> usize {
        axis_delta(a, b, self.rows)
    }

    #[inline]
    #[must_use]
    pub fn col_delta(&self, a: usize, b: usize) -> usize {
        axis_delta(a, b, self.cols)
    }

    /// Euclidean distance across the torus between two cells.
    #[must_use]
    pub fn distance(&self, (r1, c1): (usize, usize), (r2, c2): (usize, usize)) -> f64 {
        let dr = self.row_delta(r1, r2) as f64;
        let dc = self.col_delta(c1, c2) as f64;
        (dr * dr + dc * dc).sqrt()
    }

    /// Like [`GridTopology::distance`] but with a fractional target point.
    #[must_use]
    pub fn distance_to_point(&self, (r, c): (usize, usize), (pr, pc): (f64, f64)) -> f64 {
        let dr = frac_delta(r as f64, pr, self.rows as f64);
        let dc = frac_delta(c as f64, pc, self.cols as f64);
        (dr * dr + dc * dc).sqrt()
    }
}

#[inline(always)]
fn wrap(v: isize, n: usize) -> usize {
    v.rem_euclid(n as isize) as usize
}

#[inline]
fn axis_delta(a: usize, b: usize, n: usize) -> usize {
    let d = a.abs_diff(b) % n;
    d.min(n - d)
}

#[inline]
fn frac_delta(a: f64, b: f64, n: f64) -> f64 {
    let d = (a - b).abs().rem_euclid(n);
    d.min(n - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_corner_neighbors_wrap() {
        let topo = GridTopology::new(4, 5);
        let n = topo.neighbors(0);
        assert!(n.contains(&topo.index(3, 4)));
        assert!(n.contains(&topo.index(3, 0)));
        assert!(n.contains(&topo.index(0, 4)));
        assert!(n.contains(&topo.index(1, 1)));
        assert!(!n.contains(&0));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            GridTopology::try_new(0, 3),
            Err(UniverseError::InvalidDimensions { rows: 0, cols: 3 })
        ));
    }

    #[test]
    fn test_single_cell_is_its_own_neighbor() {
        let topo = GridTopology::new(1, 1);
        assert_eq!(topo.neighbors(0), &[0; 8]);
    }

    #[test]
    fn test_distance_wraps() {
        let topo = GridTopology::new(10, 10);
        assert_eq!(topo.row_delta(0, 9), 1);
        assert!((topo.distance((0, 0), (9, 9)) - 2f64.sqrt()).abs() < 1e-9);
        assert!((topo.distance_to_point((0, 0), (9.5, 0.0)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_distortion_is_deterministic_and_wraps() {
        let topo = GridTopology::new(7, 9);
        let warp = Warp {
            shift_speed: 0.13,
            spin: -1,
            amplitude: 2.5,
        };
        for tick in 0..20 {
            let a = topo.distorted_neighbors(6, 8, tick, &warp);
            let b = topo.distorted_neighbors(6, 8, tick, &warp);
            assert_eq!(a, b);
            assert!(a.iter().all(|&n| n < topo.len()));
        }
    }

    #[test]
    fn test_zero_amplitude_matches_plain_neighbors() {
        let topo = GridTopology::new(5, 5);
        let warp = Warp {
            shift_speed: 0.1,
            spin: 1,
            amplitude: 0.0,
        };
        let idx = topo.index(2, 3);
        assert_eq!(&topo.distorted_neighbors(2, 3, 17, &warp), topo.neighbors(idx));
    }

    proptest! {
        #[test]
        fn prop_neighbor_relation_is_symmetric(rows in 2usize..12, cols in 2usize..12, seed in 0usize..1000) {
            let topo = GridTopology::new(rows, cols);
            let idx = seed % topo.len();
            for &n in topo.neighbors(idx) {
                prop_assert!(topo.neighbors(n).contains(&idx));
            }
        }

        #[test]
        fn prop_offset_round_trips(rows in 1usize..20, cols in 1usize..20, r in 0usize..20, c in 0usize..20, dr in -30isize..30, dc in -30isize..30) {
            let topo = GridTopology::new(rows, cols);
            let (r, c) = (r % rows, c % cols);
            let moved = topo.offset(r, c, dr, dc);
            let (mr, mc) = topo.coords(moved);
            prop_assert_eq!(topo.offset(mr, mc, -dr, -dc), topo.index(r, c));
        }
    }
}
