use serde::{Deserialize, Serialize};

/// Outcome of one `tick()` call, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickResult {
    /// Generation this result describes.
    pub tick: u64,
    pub live_count: usize,
    /// Shannon entropy (bits) of the sampled 3×3 live-count distribution.
    pub entropy: f64,
    pub average_energy: f64,
    pub extinct: bool,
}
