//! Gray–Scott reaction-diffusion fields.
//!
//! Chemical A is the feed, B the catalyst. Both live on the same torus as the
//! life layer and are clamped to `[0, 1]` after every step. The step is pure,
//! so rows can be computed in parallel without affecting results.

use crate::config::ChemistryConfig;
use crate::topology::GridTopology;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const AXIS_WEIGHT: f64 = 0.2;
const DIAGONAL_WEIGHT: f64 = 0.05;
/// Positions of the axis neighbors in `MOORE_OFFSETS`.
const AXIS_SLOTS: [usize; 4] = [1, 3, 4, 6];
const DIAGONAL_SLOTS: [usize; 4] = [0, 2, 5, 7];

/// Initial B concentration under a live cell.
const SEED_B: f64 = 0.25;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChemicalField {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    #[serde(skip)]
    back_a: Vec<f64>,
    #[serde(skip)]
    back_b: Vec<f64>,
}

impl ChemicalField {
    /// A saturated everywhere, B absent.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            a: vec![1.0; len],
            b: vec![0.0; len],
            back_a: vec![1.0; len],
            back_b: vec![0.0; len],
        }
    }

    /// Deposits catalyst under every live cell.
    pub fn seed_from_life(&mut self, life: &[u8]) {
        for ((a, b), &alive) in self.a.iter_mut().zip(self.b.iter_mut()).zip(life) {
            if alive == 1 {
                *a = 1.0 - SEED_B;
                *b = SEED_B;
            } else {
                *a = 1.0;
                *b = 0.0;
            }
        }
    }

    /// Advances both fields by one integration step.
    pub fn step(&mut self, topology: &GridTopology, config: &ChemistryConfig) {
        std::mem::swap(&mut self.a, &mut self.back_a);
        std::mem::swap(&mut self.b, &mut self.back_b);
        let old_a = &self.back_a;
        let old_b = &self.back_b;
        let cols = topology.cols();

        #[cfg(feature = "parallel")]
        let rows = self
            .a
            .par_chunks_mut(cols)
            .zip(self.b.par_chunks_mut(cols))
            .enumerate();
        #[cfg(not(feature = "parallel"))]
        let rows = self
            .a
            .chunks_mut(cols)
            .zip(self.b.chunks_mut(cols))
            .enumerate();

        rows.for_each(|(r, (row_a, row_b))| {
            for c in 0..cols {
                let idx = r * cols + c;
                let neighbors = topology.neighbors(idx);
                let lap_a = laplacian(old_a, idx, neighbors);
                let lap_b = laplacian(old_b, idx, neighbors);
                let a = old_a[idx];
                let b = old_b[idx];
                let reaction = a * b * b;
                row_a[c] = (a
                    + config.dt
                        * (config.diffusion_a * lap_a - reaction + config.feed_rate * (1.0 - a)))
                    .clamp(0.0, 1.0);
                row_b[c] = (b
                    + config.dt
                        * (config.diffusion_b * lap_b + reaction
                            - (config.kill_rate + config.feed_rate) * b))
                    .clamp(0.0, 1.0);
            }
        });
    }

    pub fn clear(&mut self) {
        self.a.fill(1.0);
        self.b.fill(0.0);
        self.back_a.fill(1.0);
        self.back_b.fill(0.0);
    }
}

#[inline]
fn laplacian(field: &[f64], idx: usize, neighbors: &[usize; 8]) -> f64 {
    let axis: f64 = AXIS_SLOTS.iter().map(|&s| field[neighbors[s]]).sum();
    let diagonal: f64 = DIAGONAL_SLOTS.iter().map(|&s| field[neighbors[s]]).sum();
    axis * AXIS_WEIGHT + diagonal * DIAGONAL_WEIGHT - field[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_field_is_stationary() {
        let topo = GridTopology::new(6, 6);
        let mut field = ChemicalField::new(topo.len());
        field.step(&topo, &ChemistryConfig::default());
        assert!(field.a.iter().all(|&a| (a - 1.0).abs() < 1e-12));
        assert!(field.b.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_values_stay_clamped() {
        let topo = GridTopology::new(8, 8);
        let mut field = ChemicalField::new(topo.len());
        let mut life = vec![0u8; topo.len()];
        for idx in [9, 10, 17, 18, 27] {
            life[idx] = 1;
        }
        field.seed_from_life(&life);
        let config = ChemistryConfig {
            dt: 1.0,
            ..Default::default()
        };
        for _ in 0..50 {
            field.step(&topo, &config);
        }
        assert!(field.a.iter().chain(&field.b).all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_catalyst_diffuses_to_neighbors() {
        let topo = GridTopology::new(5, 5);
        let mut field = ChemicalField::new(topo.len());
        let mut life = vec![0u8; topo.len()];
        life[topo.index(2, 2)] = 1;
        field.seed_from_life(&life);
        field.step(&topo, &ChemistryConfig::default());
        assert!(field.b[topo.index(2, 3)] > 0.0);
        assert!(field.b[topo.index(2, 3)] > field.b[topo.index(3, 3)]);
    }
}
