//! Feedback metrics for adaptive behavior, plus logging setup.
//!
//! Entropy, live count, average energy and stagnation are the only signals the
//! rule engine, event scheduler and archetype injector adapt to.

use crate::topology::GridTopology;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Number of possible live counts in a 3×3 window (0 through 9).
pub const WINDOW_BUCKETS: usize = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MetricsCollector {
    pub entropy: f64,
    pub live_count: usize,
    pub average_energy: f64,
    /// Consecutive ticks whose live count equaled the previous tick's.
    pub stagnation: u64,
    pub(crate) previous_live_count: Option<usize>,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples `samples` random 3×3 windows and stores the Shannon entropy
    /// (bits) of their live-count histogram.
    pub fn sample_entropy(
        &mut self,
        life: &[u8],
        topology: &GridTopology,
        samples: usize,
        rng: &mut impl Rng,
    ) -> f64 {
        let mut bins = [0usize; WINDOW_BUCKETS];
        for _ in 0..samples {
            let idx = rng.gen_range(0..topology.len());
            bins[window_sum(life, topology, idx) as usize] += 1;
        }
        self.entropy = shannon_entropy(&bins, samples);
        self.entropy
    }

    /// Records the outcome of a rule pass.
    pub fn record(&mut self, live_count: usize, total_energy: f64, cells: usize) {
        if self.previous_live_count == Some(live_count) {
            self.stagnation += 1;
        } else {
            self.stagnation = 0;
        }
        self.previous_live_count = Some(live_count);
        self.live_count = live_count;
        self.average_energy = if cells > 0 {
            total_energy / cells as f64
        } else {
            0.0
        };
    }

    /// Seeds the baseline from an initialized grid without counting stagnation.
    pub fn reset(&mut self, live_count: usize, total_energy: f64, cells: usize) {
        *self = Self::default();
        self.record(live_count, total_energy, cells);
    }
}

/// Live cells in the 3×3 window centered on `idx`, center included.
#[inline]
#[must_use]
pub fn window_sum(life: &[u8], topology: &GridTopology, idx: usize) -> u8 {
    life[idx] + topology.neighbor_sum(life, idx)
}

#[must_use]
pub fn shannon_entropy(bins: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    bins.iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Calling this more than once is a
/// no-op.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .finish(),
    )
    .ok();
}
