//! Diff-triggered ring buffer of compressed life snapshots.
//!
//! The life layer is bit-packed and gzip-compressed. A snapshot is appended
//! when enough cells differ from the previous one, or when too many ticks have
//! passed since it. The oldest snapshot is evicted past capacity.

use crate::config::HistoryConfig;
use crate::error::{Result, UniverseError};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io::{Read, Write};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub tick: u64,
    pub live_count: usize,
    pub compressed: Vec<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryBuffer {
    capacity: usize,
    diff_threshold: f64,
    force_interval: u64,
    cells: usize,
    snapshots: VecDeque<HistorySnapshot>,
    #[serde(skip)]
    last_packed: Option<Vec<u8>>,
}

impl HistoryBuffer {
    #[must_use]
    pub fn new(config: &HistoryConfig, cells: usize) -> Self {
        Self {
            capacity: config.capacity,
            diff_threshold: config.diff_threshold,
            force_interval: config.force_interval,
            cells,
            snapshots: VecDeque::with_capacity(config.capacity),
            last_packed: None,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistorySnapshot> {
        self.snapshots.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&HistorySnapshot> {
        self.snapshots.back()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.last_packed = None;
    }

    /// Appends a snapshot of `life` if it changed enough or is due.
    ///
    /// Returns whether a snapshot was taken.
    pub fn consider(&mut self, tick: u64, life: &[u8]) -> Result<bool> {
        let packed = pack(life);
        let due = match (&self.last_packed, self.latest()) {
            (Some(previous), Some(latest)) => {
                let differing: u32 = previous
                    .iter()
                    .zip(&packed)
                    .map(|(a, b)| (a ^ b).count_ones())
                    .sum();
                let fraction = f64::from(differing) / self.cells.max(1) as f64;
                fraction > self.diff_threshold
                    || tick.saturating_sub(latest.tick) >= self.force_interval
            }
            _ => true,
        };
        if !due {
            return Ok(false);
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(&packed)?;
        let compressed = encoder.finish()?;
        let live_count = life.iter().filter(|&&v| v == 1).count();

        tracing::debug!(
            tick,
            live_count,
            bytes = compressed.len(),
            "History snapshot taken"
        );
        self.snapshots.push_back(HistorySnapshot {
            tick,
            live_count,
            compressed,
        });
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
        self.last_packed = Some(packed);
        Ok(true)
    }

    /// Restores the life grid a snapshot was taken from.
    pub fn decode(&self, snapshot: &HistorySnapshot) -> Result<Vec<u8>> {
        let mut packed = Vec::new();
        GzDecoder::new(snapshot.compressed.as_slice()).read_to_end(&mut packed)?;
        if packed.len() != self.cells.div_ceil(8) {
            return Err(UniverseError::CorruptSnapshot(format!(
                "expected {} packed bytes, found {}",
                self.cells.div_ceil(8),
                packed.len()
            )));
        }
        Ok(unpack(&packed, self.cells))
    }

    /// Fraction of stored snapshots in which each cell was alive.
    pub fn average_occupancy(&self) -> Result<Vec<f64>> {
        let mut totals = vec![0u32; self.cells];
        for snapshot in &self.snapshots {
            for (total, alive) in totals.iter_mut().zip(self.decode(snapshot)?) {
                *total += u32::from(alive);
            }
        }
        let n = self.snapshots.len().max(1) as f64;
        Ok(totals.into_iter().map(|t| f64::from(t) / n).collect())
    }
}

fn pack(life: &[u8]) -> Vec<u8> {
    let mut packed = vec![0u8; life.len().div_ceil(8)];
    for (i, &alive) in life.iter().enumerate() {
        if alive == 1 {
            packed[i / 8] |= 1 << (i % 8);
        }
    }
    packed
}

fn unpack(packed: &[u8], cells: usize) -> Vec<u8> {
    (0..cells).map(|i| (packed[i / 8] >> (i % 8)) & 1).collect()
}
