//! Adaptive life rules and the per-cell transition function.
//!
//! A [`RuleContext`] is built once per tick from metrics, configuration and
//! the active events. [`next_life`] is then called for every cell in
//! row-major order; it reads only the context, the cell's own inputs and the
//! shared random stream.

use crate::config::{RulesConfig, WarfareConfig};
use crate::metrics::MetricsCollector;
use crate::topology::{GridTopology, Warp};
use cosmogenesis_data::{CosmicEvent, EventMeta, FrontPoint};
use rand::Rng;
use std::f64::consts::{PI, TAU};

/// Birth and survival neighbor counts as bitmasks (bit `n` set = count `n` qualifies).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    pub survive: u16,
    pub birth: u16,
}

impl RuleSet {
    /// B3/S23.
    pub const CONWAY: RuleSet = RuleSet {
        survive: (1 << 2) | (1 << 3),
        birth: 1 << 3,
    };

    #[inline]
    #[must_use]
    pub fn survives(self, neighbors: u8) -> bool {
        self.survive & (1 << neighbors) != 0
    }

    #[inline]
    #[must_use]
    pub fn births(self, neighbors: u8) -> bool {
        self.birth & (1 << neighbors) != 0
    }

    /// Global rule set for a tick: the Conway base widened by metrics and
    /// active events.
    pub fn for_tick(
        metrics: &MetricsCollector,
        effects: &ActiveEffects,
        config: &RulesConfig,
        rng: &mut impl Rng,
    ) -> RuleSet {
        let mut rules = RuleSet::CONWAY;
        if config.adaptive {
            if metrics.entropy < 2.0 {
                rules.birth |= 1 << 2;
            }
            if metrics.entropy > 3.2 && chance(rng, config.chaos_drop_chance) {
                rules.birth &= !(1 << 3);
            }
            if metrics.average_energy > 6.5 {
                rules.survive |= 1 << 4;
            }
        }
        if effects.nebula {
            rules.birth |= 1 << 2;
        }
        if effects.gravitational_wave {
            rules.survive |= 1 << 4;
            rules.birth |= 1 << 6;
        }
        rules
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupernovaShock {
    pub center: (usize, usize),
    pub core_radius: f64,
    pub shock_radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Disc {
    pub center: (usize, usize),
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    pub center: (usize, usize),
    pub angle: f64,
    pub width: f64,
    pub reach: f64,
    pub boost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Strings {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub boost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WarFront {
    pub front: Vec<FrontPoint>,
    pub width: f64,
    pub kill_probability: f64,
    pub spark_probability: f64,
}

/// Continuous effects of the active events, resolved for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveEffects {
    pub nebula: bool,
    pub gravitational_wave: bool,
    pub nuclear_warfare: bool,
    pub invasion: bool,
    pub mutation_bonus: f64,
    pub mutation_multiplier: f64,
    /// (band, boost)
    pub auroras: Vec<(usize, f64)>,
    pub glider_storms: Vec<(usize, f64)>,
    pub supernovae: Vec<SupernovaShock>,
    /// Black hole event horizons at their current radius.
    pub black_holes: Vec<Disc>,
    pub quasars: Vec<Beam>,
    pub dark_matter: Vec<Disc>,
    pub strings: Vec<Strings>,
    pub wars: Vec<WarFront>,
    pub wormhole: Option<Warp>,
    /// (dominant species, adoption probability)
    pub evolution: Option<(u8, f64)>,
}

impl ActiveEffects {
    #[must_use]
    pub fn from_events(events: &[CosmicEvent], tick: u64) -> Self {
        let mut fx = ActiveEffects {
            mutation_multiplier: 1.0,
            ..Default::default()
        };
        for event in events.iter().filter(|e| e.is_active_at(tick)) {
            let age = event.age(tick) as f64;
            match &event.meta {
                EventMeta::SolarFlare { mutation_bonus } => fx.mutation_bonus += mutation_bonus,
                EventMeta::Comet {
                    mutation_multiplier,
                    ..
                } => fx.mutation_multiplier *= mutation_multiplier,
                EventMeta::Supernova {
                    row,
                    col,
                    radius,
                    shock_speed,
                } => fx.supernovae.push(SupernovaShock {
                    center: (*row, *col),
                    core_radius: radius * 0.5,
                    shock_radius: radius + age * shock_speed,
                }),
                EventMeta::Nebula => fx.nebula = true,
                EventMeta::GravitationalWave => fx.gravitational_wave = true,
                EventMeta::BlackHole {
                    row,
                    col,
                    growth_rate,
                    max_radius,
                } => fx.black_holes.push(Disc {
                    center: (*row, *col),
                    radius: (2.0 + age * growth_rate).min(*max_radius),
                }),
                EventMeta::Quasar {
                    row,
                    col,
                    start_angle,
                    angular_speed,
                    beam_width,
                    reach,
                    boost,
                } => fx.quasars.push(Beam {
                    center: (*row, *col),
                    angle: (start_angle + age * angular_speed).rem_euclid(TAU),
                    width: *beam_width,
                    reach: *reach,
                    boost: *boost,
                }),
                EventMeta::DarkMatter { row, col, radius } => fx.dark_matter.push(Disc {
                    center: (*row, *col),
                    radius: *radius,
                }),
                EventMeta::CosmicStrings { rows, cols, boost } => fx.strings.push(Strings {
                    rows: rows.clone(),
                    cols: cols.clone(),
                    boost: *boost,
                }),
                EventMeta::Pulsar {
                    period,
                    duty,
                    multiplier,
                } => {
                    let period = (*period).max(1);
                    let phase = event.age(tick) % period;
                    if (phase as f64) < period as f64 * duty {
                        fx.mutation_multiplier *= multiplier;
                    }
                }
                EventMeta::Wormhole {
                    shift_speed,
                    spin,
                    amplitude,
                } => {
                    fx.wormhole.get_or_insert(Warp {
                        shift_speed: *shift_speed,
                        spin: *spin,
                        amplitude: *amplitude,
                    });
                }
                EventMeta::GliderStorm { band, boost } => fx.glider_storms.push((*band, *boost)),
                EventMeta::Aurora { band, boost } => fx.auroras.push((*band, *boost)),
                EventMeta::TimeDilation { .. } => {}
                EventMeta::GalacticWar {
                    front,
                    width,
                    kill_probability,
                    spark_probability,
                } => fx.wars.push(WarFront {
                    front: front.clone(),
                    width: *width,
                    kill_probability: *kill_probability,
                    spark_probability: *spark_probability,
                }),
                EventMeta::SpeciesEvolution { dominant, adoption } => {
                    fx.evolution.get_or_insert((*dominant, *adoption));
                }
                EventMeta::NuclearWarfare => fx.nuclear_warfare = true,
                EventMeta::Invasion { .. } => fx.invasion = true,
            }
        }
        fx
    }

    #[must_use]
    pub fn has_overrides(&self) -> bool {
        !(self.auroras.is_empty()
            && self.glider_storms.is_empty()
            && self.supernovae.is_empty()
            && self.black_holes.is_empty()
            && self.quasars.is_empty()
            && self.strings.is_empty()
            && self.wars.is_empty())
    }
}

/// Mutation probability for the tick: base plus flare bonuses, times comet and
/// pulsar multipliers, capped.
#[must_use]
pub fn mutation_probability(config: &RulesConfig, effects: &ActiveEffects) -> f64 {
    ((config.base_mutation_rate + effects.mutation_bonus) * effects.mutation_multiplier)
        .clamp(0.0, config.max_mutation_rate)
}

/// Everything the per-cell transition needs that does not vary by cell.
pub struct RuleContext<'a> {
    pub tick: u64,
    pub topology: &'a GridTopology,
    pub rules: RuleSet,
    pub mutation_probability: f64,
    /// Births from mutation and event paths only stand while INVASION is active.
    pub births_authorized: bool,
    pub chemistry_coupling: bool,
    pub invader_extinguish: f64,
    pub invasion_suppression: f64,
    pub effects: ActiveEffects,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        tick: u64,
        topology: &'a GridTopology,
        metrics: &MetricsCollector,
        events: &[CosmicEvent],
        rules_config: &RulesConfig,
        warfare_config: &WarfareConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let effects = ActiveEffects::from_events(events, tick);
        let rules = RuleSet::for_tick(metrics, &effects, rules_config, rng);
        Self {
            tick,
            topology,
            rules,
            mutation_probability: mutation_probability(rules_config, &effects),
            births_authorized: effects.invasion,
            chemistry_coupling: rules_config.chemistry_coupling,
            invader_extinguish: warfare_config.invader_extinguish,
            invasion_suppression: warfare_config.invasion_suppression,
            effects,
        }
    }

    /// Live neighbors of `idx`, through the wormhole when one is open.
    #[must_use]
    pub fn live_neighbors(&self, life: &[u8], idx: usize) -> u8 {
        match &self.effects.wormhole {
            Some(warp) => {
                let (row, col) = self.topology.coords(idx);
                self.topology
                    .distorted_neighbors(row, col, self.tick, warp)
                    .iter()
                    .map(|&n| life[n])
                    .sum()
            }
            None => self.topology.neighbor_sum(life, idx),
        }
    }
}

/// Per-cell inputs to [`next_life`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CellInput {
    pub idx: usize,
    pub alive: bool,
    pub neighbors: u8,
    /// Live neighbors sharing this cell's alliance. Only consulted at war fronts.
    pub allied_neighbors: u8,
    pub invader: bool,
    pub invader_neighbors: u8,
    pub chem_a: f64,
    pub chem_b: f64,
}

/// Computes the next life state of one cell.
pub fn next_life(ctx: &RuleContext<'_>, cell: &CellInput, rng: &mut impl Rng) -> u8 {
    let topo = ctx.topology;
    let (row, col) = topo.coords(cell.idx);
    let n = cell.neighbors;

    let mut rules = ctx.rules;
    for dm in &ctx.effects.dark_matter {
        if topo.distance((row, col), dm.center) <= dm.radius {
            rules.survive |= (1 << 1) | (1 << 4);
            rules.birth |= 1 << 6;
        }
    }
    if ctx.chemistry_coupling {
        if cell.chem_b > 0.55 {
            rules.birth |= 1 << 6;
        }
        if cell.chem_a > 0.9 && n > 3 {
            rules.survive &= (1 << 2) | (1 << 3);
        }
    }

    let tentative = u8::from(if cell.alive {
        rules.survives(n)
    } else {
        rules.births(n)
    });
    let mut next = tentative;

    if ctx.effects.has_overrides() {
        next = apply_overrides(ctx, cell, (row, col), next, rng);
    }

    if ctx.mutation_probability > 0.0 && rng.gen::<f64>() < ctx.mutation_probability {
        next ^= 1;
    }

    if next == 1 && !cell.alive && tentative == 0 && !ctx.births_authorized {
        next = 0;
    }

    if next == 1 && cell.invader && chance(rng, ctx.invader_extinguish) {
        next = 0;
    }
    if next == 1
        && !cell.alive
        && ctx.effects.invasion
        && cell.invader_neighbors >= 2
        && chance(rng, ctx.invasion_suppression)
    {
        next = 0;
    }

    next
}

fn apply_overrides(
    ctx: &RuleContext<'_>,
    cell: &CellInput,
    (row, col): (usize, usize),
    mut next: u8,
    rng: &mut impl Rng,
) -> u8 {
    let topo = ctx.topology;
    let fx = &ctx.effects;

    for &(band, boost) in &fx.auroras {
        if next == 0 && row < band && chance(rng, boost) {
            next = 1;
        }
    }

    for &(band, boost) in &fx.glider_storms {
        let in_band = row < band
            || row + band >= topo.rows()
            || col < band
            || col + band >= topo.cols();
        if next == 0 && in_band && cell.neighbors == 3 && chance(rng, boost) {
            next = 1;
        }
    }

    for shock in &fx.supernovae {
        let d = topo.distance((row, col), shock.center);
        if next == 0 && (d - shock.shock_radius).abs() < 1.0 && chance(rng, 0.15) {
            next = 1;
        } else if next == 1 && d < shock.core_radius && chance(rng, 0.5) {
            next = 0;
        }
    }

    for hole in &fx.black_holes {
        let d = topo.distance((row, col), hole.center);
        if d < hole.radius * 0.6 {
            next = 0;
        } else if next == 0 && d <= hole.radius && chance(rng, 0.05) {
            next = 1;
        }
    }

    for beam in &fx.quasars {
        let dr = signed_delta(row, beam.center.0, topo.rows());
        let dc = signed_delta(col, beam.center.1, topo.cols());
        let d = (dr * dr + dc * dc).sqrt();
        if next == 0 && d > 0.0 && d <= beam.reach {
            let off = (dr.atan2(dc).rem_euclid(TAU) - beam.angle).abs();
            let off = off.min(TAU - off).min(PI);
            if off <= beam.width && chance(rng, beam.boost) {
                next = 1;
            }
        }
    }

    for strings in &fx.strings {
        if next == 0
            && (strings.rows.contains(&row) || strings.cols.contains(&col))
            && chance(rng, strings.boost)
        {
            next = 1;
        }
    }

    for war in &fx.wars {
        let near = war
            .front
            .iter()
            .any(|p| topo.distance_to_point((row, col), (p.row, p.col)) <= war.width);
        if !near {
            continue;
        }
        if cell.alive && next == 1 {
            let mut p = war.kill_probability;
            if cell.allied_neighbors >= 2 {
                p *= 0.4;
            }
            if chance(rng, p) {
                next = 0;
            }
        } else if next == 0 && chance(rng, war.spark_probability) {
            next = 1;
        }
    }

    next
}

/// Bernoulli trial that tolerates probabilities outside `[0, 1]`.
#[inline]
pub fn chance(rng: &mut impl Rng, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}

/// Signed shortest offset from `b` to `a` on an axis of length `n`.
fn signed_delta(a: usize, b: usize, n: usize) -> f64 {
    let n = n as f64;
    let d = (a as f64 - b as f64).rem_euclid(n);
    if d > n / 2.0 {
        d - n
    } else {
        d
    }
}
