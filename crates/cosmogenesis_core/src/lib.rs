//! # Cosmogenesis Core
//!
//! Deterministic subsystems of the cellular universe simulation.
//!
//! This crate contains everything the engine needs to advance one generation:
//! - Toroidal grid topology with a precomputed neighbor table
//! - Layered per-cell state (life, invaders, genetics, weapons, energy, age)
//! - Gray–Scott reaction-diffusion chemistry
//! - Entropy/energy/stagnation metrics and structured logging
//! - The cosmic event scheduler and its spawn effects
//! - Adaptive birth/survival rules evaluated through a per-tick context
//! - Genetics, warfare and invader systems
//! - The pattern archetype library and the compressed history ring buffer
//!
//! ## Example
//!
//! ```
//! use cosmogenesis_core::topology::GridTopology;
//!
//! let topology = GridTopology::new(4, 4);
//! let neighbors = topology.neighbors(0);
//! // (3, 3) wraps around to touch (0, 0)
//! assert!(neighbors.contains(&topology.index(3, 3)));
//! ```

/// Pattern archetype library and injection policy
pub mod archetypes;
/// Gray–Scott reaction-diffusion fields
pub mod chemistry;
/// Configuration management for simulation parameters
pub mod config;
/// Error types surfaced at the engine boundary
pub mod error;
/// Cosmic event scheduler, spawn effects and war-front labeling
pub mod events;
/// Diff-triggered compressed snapshot ring buffer
pub mod history;
/// Per-cell state layers and their double buffers
pub mod layers;
/// Entropy, live-count, energy and stagnation tracking; logging setup
pub mod metrics;
/// Adaptive rule sets and the per-cell transition function
pub mod rules;
/// Genetics, warfare and invader systems
pub mod systems;
/// Toroidal neighbor lookup
pub mod topology;

pub use config::UniverseConfig;
pub use error::UniverseError;
pub use metrics::{init_logging, MetricsCollector};
pub use topology::GridTopology;
