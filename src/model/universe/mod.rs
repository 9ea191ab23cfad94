use crate::model::config::UniverseConfig;
use cosmogenesis_core::archetypes::{Injector, PatternLibrary};
use cosmogenesis_core::chemistry::ChemicalField;
use cosmogenesis_core::events::EventScheduler;
use cosmogenesis_core::history::HistoryBuffer;
use cosmogenesis_core::layers::Layers;
use cosmogenesis_core::metrics::MetricsCollector;
use cosmogenesis_core::topology::GridTopology;
use cosmogenesis_data::{EventKind, EventMeta, TickResult};
use rand_chacha::ChaCha8Rng;

pub mod finalize;
pub mod init;
pub mod state;
pub mod update;

/// How the life layer was populated, replayed by [`Universe::restart`].
#[derive(Debug, Clone, PartialEq)]
pub enum Seed {
    /// Configured seeding (cosmic disc or empty).
    Configured,
    /// Explicit live cells.
    Cells(Vec<(usize, usize)>),
}

/// The simulation engine.
///
/// Owns every layer exclusively. Observers read through the accessors in
/// `state.rs`; external stimuli go through [`Universe::trigger_event`] and
/// are folded into the next tick.
pub struct Universe {
    config: UniverseConfig,
    topology: GridTopology,
    layers: Layers,
    chemistry: ChemicalField,
    metrics: MetricsCollector,
    events: EventScheduler,
    history: HistoryBuffer,
    library: PatternLibrary,
    injector: Injector,
    rng: ChaCha8Rng,
    /// Stream state right after construction, for restarts.
    initial_rng: ChaCha8Rng,
    seed: Seed,
    pending: Vec<(EventKind, Option<EventMeta>)>,
    tick: u64,
    extinct: bool,
    last_result: TickResult,
}
