use crate::model::config::UniverseConfig;
use crate::model::universe::Universe;
use cosmogenesis_core::chemistry::ChemicalField;
use cosmogenesis_core::events::{apply_spawn_effect, roll_duration, roll_meta, SpawnContext};
use cosmogenesis_core::layers::{Layers, AGE_CAP, MAX_ENERGY};
use cosmogenesis_core::rules::{next_life, CellInput, RuleContext};
use cosmogenesis_core::systems::{adopt_dominant, inherit_species, next_weapon, WeaponInput};
use cosmogenesis_core::topology::GridTopology;
use cosmogenesis_data::{EventMeta, TickResult, UNASSIGNED_SPECIES};
use rand::Rng;

/// Energy gained per tick by a surviving cell.
const SURVIVOR_GAIN: f64 = 0.3;
/// Cells older than this gain at half rate.
const ELDER_AGE: u32 = 200;
const BIRTH_GAIN: f64 = 0.5;
const DEAD_DECAY: f64 = 0.9;
const ENERGY_FLOOR: f64 = 0.01;

/// Outcome of the life pass handed to finalization.
pub struct PassOutcome {
    pub live_count: usize,
    pub births_authorized: bool,
    pub detonations: Vec<usize>,
}

impl Universe {
    /// Advances the universe by one generation.
    ///
    /// Pipeline: entropy sample, chemistry (on its interval), event
    /// prune/spawn, life pass with genetics and weapons, then finalization
    /// (detonations, invaders, swap, metrics, history, extinction, injection).
    ///
    /// Once extinct this is a no-op that returns the final result again.
    pub fn tick(&mut self) -> TickResult {
        if self.extinct {
            return self.last_result;
        }
        self.tick += 1;
        let tick = self.tick;

        self.metrics.sample_entropy(
            &self.layers.life,
            &self.topology,
            self.config.rules.entropy_samples,
            &mut self.rng,
        );

        if tick % self.config.chemistry.interval == 0 {
            self.chemistry.step(&self.topology, &self.config.chemistry);
        }

        self.advance_events(tick);

        let ctx = RuleContext::new(
            tick,
            &self.topology,
            &self.metrics,
            self.events.active(),
            &self.config.rules,
            &self.config.warfare,
            &mut self.rng,
        );
        let outcome = life_pass(
            &ctx,
            &mut self.layers,
            &self.chemistry,
            &self.config,
            &mut self.rng,
        );

        self.finalize_tick(outcome)
    }

    /// Folds queued triggers in, drops expired events and rolls the schedule.
    fn advance_events(&mut self, tick: u64) {
        self.events.prune(tick);

        let mut spawns = Vec::new();
        for (kind, meta) in std::mem::take(&mut self.pending) {
            let meta = match meta {
                Some(meta) => meta,
                None => roll_meta(
                    kind,
                    &SpawnContext {
                        topology: &self.topology,
                        layers: &self.layers,
                    },
                    &mut self.rng,
                ),
            };
            spawns.push(meta);
        }
        for meta in spawns {
            self.spawn_event(meta, tick);
        }

        if !self.config.events.enabled {
            return;
        }
        let density = self.metrics.live_count as f64 / self.topology.len() as f64;
        let rolled = self.events.roll_scheduled(
            tick,
            &self.metrics,
            density,
            &self.config.events,
            &mut self.rng,
        );
        for kind in rolled {
            let meta = roll_meta(
                kind,
                &SpawnContext {
                    topology: &self.topology,
                    layers: &self.layers,
                },
                &mut self.rng,
            );
            self.spawn_event(meta, tick);
        }
    }

    fn spawn_event(&mut self, meta: EventMeta, tick: u64) {
        let duration = roll_duration(meta.kind(), &mut self.rng);
        let changed = apply_spawn_effect(&meta, &self.topology, &mut self.layers, &mut self.rng);
        if changed > 0 {
            tracing::debug!(tick, kind = %meta.kind(), changed, "Spawn effect applied");
        }
        self.events.spawn(meta, tick, duration);
    }
}

/// Computes the next life, species and weapon buffers for every cell in
/// row-major order, updating energy and age in place. Detonations are only
/// collected here; finalization applies them.
pub fn life_pass(
    ctx: &RuleContext<'_>,
    layers: &mut Layers,
    chemistry: &ChemicalField,
    config: &UniverseConfig,
    rng: &mut impl Rng,
) -> PassOutcome {
    let topology: &GridTopology = ctx.topology;
    let war_mode = config.world.war_mode;
    let at_war = !ctx.effects.wars.is_empty();
    let mut live_count = 0;
    let mut detonations = Vec::new();

    for idx in 0..topology.len() {
        let alive = layers.life[idx] == 1;
        let neighbors = topology.neighbors(idx);

        let allied_neighbors = if at_war && alive {
            let own = layers.alliance[idx];
            neighbors
                .iter()
                .filter(|&&n| layers.life[n] == 1 && layers.alliance[n] == own)
                .count() as u8
        } else {
            0
        };
        let invader_neighbors = if war_mode && ctx.effects.invasion {
            topology.neighbor_sum(&layers.invader, idx)
        } else {
            0
        };

        let cell = CellInput {
            idx,
            alive,
            neighbors: ctx.live_neighbors(&layers.life, idx),
            allied_neighbors,
            invader: war_mode && layers.invader[idx] == 1,
            invader_neighbors,
            chem_a: chemistry.a[idx],
            chem_b: chemistry.b[idx],
        };
        let next = next_life(ctx, &cell, rng);
        layers.life_next[idx] = next;

        if next == 1 {
            let mut species = if alive && layers.species[idx] != UNASSIGNED_SPECIES {
                layers.species[idx]
            } else {
                inherit_species(&layers.life, &layers.species, neighbors, rng)
            };
            if let Some(evolution) = ctx.effects.evolution {
                species =
                    adopt_dominant(species, &layers.life, &layers.species, neighbors, evolution, rng);
            }
            layers.species_next[idx] = species;
        } else {
            layers.species_next[idx] = UNASSIGNED_SPECIES;
        }

        let energy = &mut layers.energy[idx];
        let age = &mut layers.age[idx];
        match (alive, next == 1) {
            (true, true) => {
                *age = (*age + 1).min(AGE_CAP);
                *energy += if *age > ELDER_AGE {
                    SURVIVOR_GAIN * 0.5
                } else {
                    SURVIVOR_GAIN
                };
            }
            (false, true) => {
                *age = 1;
                *energy += BIRTH_GAIN;
            }
            (_, false) => {
                *age = 0;
                *energy *= DEAD_DECAY;
                if *energy < ENERGY_FLOOR {
                    *energy = 0.0;
                }
            }
        }
        *energy = energy.clamp(0.0, MAX_ENERGY);

        let (weapon, detonates) = next_weapon(
            &WeaponInput {
                idx,
                tick: ctx.tick,
                age: layers.age[idx],
                survived: alive && next == 1,
                nuclear_warfare: ctx.effects.nuclear_warfare,
            },
            &layers.weapon,
            topology,
            &config.warfare,
            rng,
        );
        layers.weapon_next[idx] = weapon;
        if detonates {
            detonations.push(idx);
        }

        live_count += usize::from(next);
    }

    PassOutcome {
        live_count,
        births_authorized: ctx.births_authorized,
        detonations,
    }
}
