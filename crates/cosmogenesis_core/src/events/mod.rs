//! Cosmic event scheduler.
//!
//! Events move through three states: inactive, active (holding an inclusive
//! `[start_tick, end_tick]` window and typed metadata) and pruned. Spawns are
//! either explicit triggers, which bypass every gate, or scheduled rolls
//! through [`EventScheduler::spawn_event_cool`].
//!
//! Cooldowns are tracked per kind from the last spawn of that kind and are
//! independent of whether an instance is still active, so two instances of the
//! same kind can overlap when a cooldown is shorter than a duration. Setting
//! `events.exclusive_per_kind` additionally rejects scheduled spawns while an
//! instance is active.

pub mod clusters;
pub mod spawn;

use crate::config::EventConfig;
use crate::metrics::MetricsCollector;
use cosmogenesis_data::{CosmicEvent, EventKind, EventMeta};
use rand::Rng;
use serde::{Deserialize, Serialize};
pub use spawn::{apply_spawn_effect, roll_duration, roll_meta, SpawnContext};

/// Base probability and cooldown of a scheduled kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    pub kind: EventKind,
    pub base_probability: f64,
    pub cooldown: u64,
}

const fn schedule(kind: EventKind, base_probability: f64, cooldown: u64) -> Schedule {
    Schedule {
        kind,
        base_probability,
        cooldown,
    }
}

/// Every kind the scheduler rolls for, in evaluation order. INVASION is absent:
/// it only ever arrives through an explicit trigger.
pub const SCHEDULES: [Schedule; 17] = [
    schedule(EventKind::SolarFlare, 0.004, 120),
    schedule(EventKind::Comet, 0.003, 200),
    schedule(EventKind::Supernova, 0.002, 300),
    schedule(EventKind::Nebula, 0.003, 250),
    schedule(EventKind::GravitationalWave, 0.002, 300),
    schedule(EventKind::BlackHole, 0.001, 500),
    schedule(EventKind::Quasar, 0.0015, 400),
    schedule(EventKind::DarkMatter, 0.002, 350),
    schedule(EventKind::CosmicStrings, 0.0015, 400),
    schedule(EventKind::Pulsar, 0.002, 300),
    schedule(EventKind::Wormhole, 0.001, 500),
    schedule(EventKind::GliderStorm, 0.002, 300),
    schedule(EventKind::Aurora, 0.003, 200),
    schedule(EventKind::TimeDilation, 0.001, 600),
    schedule(EventKind::GalacticWar, 0.0008, 800),
    schedule(EventKind::SpeciesEvolution, 0.0015, 500),
    schedule(EventKind::NuclearWarfare, 0.0005, 1000),
];

/// Live density above which galactic wars become more likely.
const CROWDED_DENSITY: f64 = 0.25;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EventScheduler {
    active: Vec<CosmicEvent>,
    last_spawn: Vec<Option<u64>>,
    next_id: u64,
    exclusive_per_kind: bool,
}

impl EventScheduler {
    #[must_use]
    pub fn new(config: &EventConfig) -> Self {
        Self {
            active: Vec::new(),
            last_spawn: vec![None; EventKind::COUNT],
            next_id: 1,
            exclusive_per_kind: config.exclusive_per_kind,
        }
    }

    #[must_use]
    pub fn active(&self) -> &[CosmicEvent] {
        &self.active
    }

    #[must_use]
    pub fn is_active(&self, kind: EventKind) -> bool {
        self.active.iter().any(|e| e.kind() == kind)
    }

    pub fn active_of(&self, kind: EventKind) -> impl Iterator<Item = &CosmicEvent> {
        self.active.iter().filter(move |e| e.kind() == kind)
    }

    #[must_use]
    pub fn last_spawn(&self, kind: EventKind) -> Option<u64> {
        self.last_spawn.get(kind.index()).copied().flatten()
    }

    /// Registers an event active from `tick` through `tick + duration`.
    pub fn spawn(&mut self, meta: EventMeta, tick: u64, duration: u64) -> &CosmicEvent {
        let kind = meta.kind();
        let id = self.next_id;
        self.next_id += 1;
        if let Some(slot) = self.last_spawn.get_mut(kind.index()) {
            *slot = Some(tick);
        }
        tracing::info!(tick, id, kind = %kind, duration, "Cosmic event spawned");
        let index = self.active.len();
        self.active.push(CosmicEvent {
            id,
            start_tick: tick,
            end_tick: tick + duration,
            meta,
        });
        &self.active[index]
    }

    /// Scheduled spawn gate for `kind`.
    ///
    /// Always consumes exactly one uniform draw. Rejects when the draw exceeds
    /// `probability` or fewer than `cooldown` ticks have elapsed since the last
    /// spawn of `kind`.
    pub fn spawn_event_cool(
        &self,
        kind: EventKind,
        cooldown: u64,
        probability: f64,
        tick: u64,
        rng: &mut impl Rng,
    ) -> bool {
        let draw: f64 = rng.gen();
        if probability <= 0.0 || draw > probability {
            return false;
        }
        if let Some(last) = self.last_spawn(kind) {
            if tick.saturating_sub(last) < cooldown {
                return false;
            }
        }
        !(self.exclusive_per_kind && self.is_active(kind))
    }

    /// Drops every event whose window ended before `tick`.
    pub fn prune(&mut self, tick: u64) {
        self.active.retain(|e| {
            let keep = tick <= e.end_tick;
            if !keep {
                tracing::debug!(tick, id = e.id, kind = %e.kind(), "Cosmic event ended");
            }
            keep
        });
    }

    /// Spawn probability for a scheduled kind after metric and cross-event bonuses.
    #[must_use]
    pub fn probability(&self, entry: &Schedule, metrics: &MetricsCollector, density: f64) -> f64 {
        let bonus = match entry.kind {
            EventKind::SolarFlare if metrics.average_energy > 5.0 => 0.004,
            EventKind::Comet if metrics.stagnation > 30 => 0.01,
            EventKind::Supernova if metrics.entropy > 3.0 => 0.004,
            EventKind::Nebula => 0.002 * metrics.entropy,
            EventKind::BlackHole if self.is_active(EventKind::Supernova) => 0.01,
            EventKind::Pulsar if self.is_active(EventKind::Supernova) => 0.003,
            EventKind::GliderStorm if metrics.stagnation > 50 => 0.01,
            EventKind::Aurora if self.is_active(EventKind::SolarFlare) => 0.004,
            EventKind::GalacticWar if density > CROWDED_DENSITY => 0.002,
            EventKind::NuclearWarfare if self.is_active(EventKind::GalacticWar) => 0.002,
            _ => 0.0,
        };
        entry.base_probability + bonus
    }

    /// Rolls every scheduled kind once and returns the kinds that passed.
    ///
    /// Bonuses are evaluated against the active set as it stood before this
    /// roll, so spawns in the same tick do not feed each other.
    pub fn roll_scheduled(
        &self,
        tick: u64,
        metrics: &MetricsCollector,
        density: f64,
        config: &EventConfig,
        rng: &mut impl Rng,
    ) -> Vec<EventKind> {
        SCHEDULES
            .iter()
            .filter(|entry| {
                let p = self.probability(entry, metrics, density) * config.probability_scale;
                self.spawn_event_cool(entry.kind, entry.cooldown, p, tick, rng)
            })
            .map(|entry| entry.kind)
            .collect()
    }

    /// Product of active TIME_DILATION factors; 1.0 when none are active.
    #[must_use]
    pub fn time_scale(&self) -> f64 {
        self.active
            .iter()
            .filter_map(|e| match e.meta {
                EventMeta::TimeDilation { factor } => Some(factor),
                _ => None,
            })
            .product()
    }

    pub fn clear(&mut self) {
        self.active.clear();
        self.last_spawn.iter_mut().for_each(|s| *s = None);
        self.next_id = 1;
    }
}
