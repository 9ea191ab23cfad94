//! Connected-component labeling of the life layer.
//!
//! Used once per GALACTIC_WAR spawn to find the two largest populations and
//! draw a front between them.

use crate::topology::GridTopology;
use cosmogenesis_data::FrontPoint;
use std::f64::consts::TAU;

/// Flood fill stops growing a component past this many cells.
pub const MAX_COMPONENT_CELLS: usize = 2000;
/// Labeling stops after this many components.
pub const MAX_CLUSTERS: usize = 64;
pub const FRONT_SAMPLES: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub size: usize,
    /// Circular mean position, so clusters straddling the seam stay whole.
    pub centroid: (f64, f64),
}

/// Labels 8-connected live components across the torus.
#[must_use]
pub fn label_clusters(
    life: &[u8],
    topology: &GridTopology,
    max_component: usize,
    max_clusters: usize,
) -> Vec<Cluster> {
    let mut visited = vec![false; life.len()];
    let mut clusters = Vec::new();
    let mut stack = Vec::new();

    for start in 0..life.len() {
        if clusters.len() >= max_clusters {
            break;
        }
        if life[start] == 0 || visited[start] {
            continue;
        }

        let mut acc = CircularMean::new(topology);
        visited[start] = true;
        stack.clear();
        stack.push(start);
        let mut size = 0;

        while let Some(idx) = stack.pop() {
            size += 1;
            acc.add(topology.coords(idx));
            if size >= max_component {
                break;
            }
            for &n in topology.neighbors(idx) {
                if life[n] == 1 && !visited[n] {
                    visited[n] = true;
                    stack.push(n);
                }
            }
        }

        clusters.push(Cluster {
            size,
            centroid: acc.mean(),
        });
    }

    clusters
}

/// Front between the two largest clusters, or a horizontal line through the
/// middle row when fewer than two exist.
#[must_use]
pub fn war_front(life: &[u8], topology: &GridTopology) -> Vec<FrontPoint> {
    let mut clusters = label_clusters(life, topology, MAX_COMPONENT_CELLS, MAX_CLUSTERS);
    clusters.sort_by(|a, b| b.size.cmp(&a.size));

    let rows = topology.rows() as f64;
    let cols = topology.cols() as f64;

    if clusters.len() < 2 {
        let row = (rows / 2.0).floor();
        return (0..FRONT_SAMPLES)
            .map(|i| FrontPoint {
                row,
                col: (i as f64 + 0.5) * cols / FRONT_SAMPLES as f64,
            })
            .collect();
    }

    let (r0, c0) = clusters[0].centroid;
    let (r1, c1) = clusters[1].centroid;
    let dr = shortest(r1 - r0, rows);
    let dc = shortest(c1 - c0, cols);
    (0..FRONT_SAMPLES)
        .map(|i| {
            let t = (i as f64 + 0.5) / FRONT_SAMPLES as f64;
            FrontPoint {
                row: (r0 + dr * t).rem_euclid(rows),
                col: (c0 + dc * t).rem_euclid(cols),
            }
        })
        .collect()
}

fn shortest(delta: f64, n: f64) -> f64 {
    let d = delta.rem_euclid(n);
    if d > n / 2.0 {
        d - n
    } else {
        d
    }
}

struct CircularMean {
    rows: f64,
    cols: f64,
    row_sin: f64,
    row_cos: f64,
    col_sin: f64,
    col_cos: f64,
}

impl CircularMean {
    fn new(topology: &GridTopology) -> Self {
        Self {
            rows: topology.rows() as f64,
            cols: topology.cols() as f64,
            row_sin: 0.0,
            row_cos: 0.0,
            col_sin: 0.0,
            col_cos: 0.0,
        }
    }

    fn add(&mut self, (r, c): (usize, usize)) {
        let ra = r as f64 / self.rows * TAU;
        let ca = c as f64 / self.cols * TAU;
        self.row_sin += ra.sin();
        self.row_cos += ra.cos();
        self.col_sin += ca.sin();
        self.col_cos += ca.cos();
    }

    fn mean(&self) -> (f64, f64) {
        let r = self.row_sin.atan2(self.row_cos).rem_euclid(TAU) / TAU * self.rows;
        let c = self.col_sin.atan2(self.col_cos).rem_euclid(TAU) / TAU * self.cols;
        (r, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(topo: &GridTopology, cells: &[(usize, usize)]) -> Vec<u8> {
        let mut life = vec![0u8; topo.len()];
        for &(r, c) in cells {
            life[topo.index(r, c)] = 1;
        }
        life
    }

    #[test]
    fn test_diagonal_cells_join() {
        let topo = GridTopology::new(10, 10);
        let life = grid_with(&topo, &[(1, 1), (2, 2), (3, 3), (7, 7)]);
        let mut clusters = label_clusters(&life, &topo, 100, 10);
        clusters.sort_by(|a, b| b.size.cmp(&a.size));
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].size, 3);
        assert!((clusters[0].centroid.0 - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_component_wraps_across_seam() {
        let topo = GridTopology::new(8, 8);
        let life = grid_with(&topo, &[(0, 0), (7, 0), (0, 7)]);
        let clusters = label_clusters(&life, &topo, 100, 10);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size, 3);
    }

    #[test]
    fn test_caps_are_respected() {
        let topo = GridTopology::new(10, 10);
        let life = vec![1u8; topo.len()];
        let clusters = label_clusters(&life, &topo, 30, 2);
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|c| c.size <= 30));
    }

    #[test]
    fn test_front_fallback_is_middle_row() {
        let topo = GridTopology::new(10, 12);
        let front = war_front(&vec![0u8; topo.len()], &topo);
        assert_eq!(front.len(), FRONT_SAMPLES);
        assert!(front.iter().all(|p| p.row == 5.0));
    }

    #[test]
    fn test_front_lies_between_clusters() {
        let topo = GridTopology::new(20, 40);
        let mut cells = Vec::new();
        for r in 8..12 {
            for c in 2..6 {
                cells.push((r, c));
            }
            for c in 20..23 {
                cells.push((r, c));
            }
        }
        let front = war_front(&grid_with(&topo, &cells), &topo);
        assert!(front.iter().all(|p| p.col > 3.0 && p.col < 22.0));
    }
}
