//! Metadata generation and immediate effects for newly spawned events.

use super::clusters;
use crate::layers::Layers;
use crate::topology::GridTopology;
use cosmogenesis_data::{EventKind, EventMeta, Heading, MAX_SPECIES, UNASSIGNED_SPECIES};
use rand::Rng;
use std::f64::consts::TAU;

/// Read-only view of the universe used to roll event parameters.
pub struct SpawnContext<'a> {
    pub topology: &'a GridTopology,
    pub layers: &'a Layers,
}

/// Inclusive duration range in ticks for each kind.
#[must_use]
pub fn duration_range(kind: EventKind) -> (u64, u64) {
    match kind {
        EventKind::SolarFlare => (40, 80),
        EventKind::Comet => (30, 60),
        EventKind::Supernova => (20, 40),
        EventKind::Nebula => (60, 120),
        EventKind::GravitationalWave => (20, 40),
        EventKind::BlackHole => (80, 150),
        EventKind::Quasar => (100, 200),
        EventKind::DarkMatter => (100, 200),
        EventKind::CosmicStrings => (80, 160),
        EventKind::Pulsar => (100, 200),
        EventKind::Wormhole => (40, 80),
        EventKind::GliderStorm => (40, 80),
        EventKind::Aurora => (60, 120),
        EventKind::TimeDilation => (60, 120),
        EventKind::GalacticWar => (150, 300),
        EventKind::SpeciesEvolution => (100, 200),
        EventKind::NuclearWarfare => (200, 400),
        EventKind::Invasion => (80, 160),
    }
}

pub fn roll_duration(kind: EventKind, rng: &mut impl Rng) -> u64 {
    let (lo, hi) = duration_range(kind);
    rng.gen_range(lo..=hi)
}

/// Rolls type-specific parameters for a new event of `kind`.
pub fn roll_meta(kind: EventKind, ctx: &SpawnContext<'_>, rng: &mut impl Rng) -> EventMeta {
    let rows = ctx.topology.rows();
    let cols = ctx.topology.cols();
    let short_side = rows.min(cols) as f64;

    match kind {
        EventKind::SolarFlare => EventMeta::SolarFlare {
            mutation_bonus: rng.gen_range(0.002..0.008),
        },
        EventKind::Comet => EventMeta::Comet {
            row: rng.gen_range(0..rows),
            heading: if rng.gen_bool(0.5) {
                Heading::East
            } else {
                Heading::West
            },
            mutation_multiplier: rng.gen_range(1.5..3.0),
            gliders: rng.gen_range(3..=6),
        },
        EventKind::Supernova => EventMeta::Supernova {
            row: rng.gen_range(0..rows),
            col: rng.gen_range(0..cols),
            radius: rng.gen_range(4.0..8.0_f64).min(short_side / 3.0).max(1.0),
            shock_speed: rng.gen_range(0.3..0.8),
        },
        EventKind::Nebula => EventMeta::Nebula,
        EventKind::GravitationalWave => EventMeta::GravitationalWave,
        EventKind::BlackHole => EventMeta::BlackHole {
            row: rng.gen_range(0..rows),
            col: rng.gen_range(0..cols),
            growth_rate: rng.gen_range(0.05..0.15),
            max_radius: rng.gen_range(6.0..14.0_f64).min(short_side / 3.0).max(2.0),
        },
        EventKind::Quasar => EventMeta::Quasar {
            row: rng.gen_range(0..rows),
            col: rng.gen_range(0..cols),
            start_angle: rng.gen_range(0.0..TAU),
            angular_speed: rng.gen_range(0.02..0.06),
            beam_width: rng.gen_range(0.08..0.2),
            reach: short_side / 2.0,
            boost: rng.gen_range(0.05..0.12),
        },
        EventKind::DarkMatter => EventMeta::DarkMatter {
            row: rng.gen_range(0..rows),
            col: rng.gen_range(0..cols),
            radius: rng.gen_range(6.0..15.0_f64).min(short_side / 2.0).max(1.0),
        },
        EventKind::CosmicStrings => {
            let n_rows = rng.gen_range(1..=3);
            let n_cols = rng.gen_range(1..=3);
            EventMeta::CosmicStrings {
                rows: (0..n_rows).map(|_| rng.gen_range(0..rows)).collect(),
                cols: (0..n_cols).map(|_| rng.gen_range(0..cols)).collect(),
                boost: rng.gen_range(0.02..0.06),
            }
        }
        EventKind::Pulsar => EventMeta::Pulsar {
            period: rng.gen_range(10..=30),
            duty: rng.gen_range(0.2..0.5),
            multiplier: rng.gen_range(4.0..12.0),
        },
        EventKind::Wormhole => EventMeta::Wormhole {
            shift_speed: rng.gen_range(0.05..0.2),
            spin: if rng.gen_bool(0.5) { 1 } else { -1 },
            amplitude: rng.gen_range(1.0..3.0),
        },
        EventKind::GliderStorm => EventMeta::GliderStorm {
            band: rng.gen_range(2..=4).min((rows / 4).max(1)),
            boost: rng.gen_range(0.1..0.3),
        },
        EventKind::Aurora => EventMeta::Aurora {
            band: rng.gen_range(3..=6).min((rows / 3).max(1)),
            boost: rng.gen_range(0.01..0.04),
        },
        EventKind::TimeDilation => EventMeta::TimeDilation {
            factor: rng.gen_range(0.5..=2.0),
        },
        EventKind::GalacticWar => {
            let front = clusters::war_front(&ctx.layers.life, ctx.topology);
            tracing::debug!(points = front.len(), "Computed galactic war front");
            EventMeta::GalacticWar {
                front,
                width: rng.gen_range(1.5..3.0),
                kill_probability: rng.gen_range(0.3..0.6),
                spark_probability: rng.gen_range(0.05..0.15),
            }
        }
        EventKind::SpeciesEvolution => EventMeta::SpeciesEvolution {
            dominant: dominant_species(ctx.layers).unwrap_or_else(|| rng.gen_range(1..=MAX_SPECIES)),
            adoption: rng.gen_range(0.05..0.2),
        },
        EventKind::NuclearWarfare => EventMeta::NuclearWarfare,
        EventKind::Invasion => EventMeta::Invasion {
            clusters: rng.gen_range(3..=6),
        },
    }
}

/// Most common species among live cells; lowest id wins ties.
#[must_use]
pub fn dominant_species(layers: &Layers) -> Option<u8> {
    let mut counts = [0usize; MAX_SPECIES as usize + 1];
    for (&alive, &species) in layers.life.iter().zip(&layers.species) {
        if alive == 1 && species != UNASSIGNED_SPECIES {
            counts[species as usize] += 1;
        }
    }
    let mut best = None;
    let mut best_count = 0;
    for (species, &count) in counts.iter().enumerate().skip(1) {
        if count > best_count {
            best_count = count;
            best = Some(species as u8);
        }
    }
    best
}

const GLIDER_EAST: [(isize, isize); 5] = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
const GLIDER_WEST: [(isize, isize); 5] = [(0, 1), (1, 0), (2, 0), (2, 1), (2, 2)];
/// Column spacing between gliders in a comet train.
const COMET_SPACING: usize = 6;
const SUPERNOVA_RIM_WIDTH: f64 = 1.5;
const SUPERNOVA_RIM_DENSITY: f64 = 0.5;

/// Applies the immediate, one-time effect of a freshly spawned event.
///
/// Returns the number of cells whose life state changed.
pub fn apply_spawn_effect(
    meta: &EventMeta,
    topology: &GridTopology,
    layers: &mut Layers,
    rng: &mut impl Rng,
) -> usize {
    match meta {
        EventMeta::Supernova {
            row, col, radius, ..
        } => {
            let mut changed = 0;
            let reach = (radius + SUPERNOVA_RIM_WIDTH).ceil() as isize;
            let species = rng.gen_range(1..=MAX_SPECIES);
            for dr in -reach..=reach {
                for dc in -reach..=reach {
                    let idx = topology.offset(*row, *col, dr, dc);
                    let d = ((dr * dr + dc * dc) as f64).sqrt();
                    if d <= *radius {
                        if layers.life[idx] == 1 {
                            changed += 1;
                        }
                        layers.kill_cell(idx);
                    } else if d <= radius + SUPERNOVA_RIM_WIDTH
                        && layers.life[idx] == 0
                        && rng.gen_bool(SUPERNOVA_RIM_DENSITY)
                    {
                        layers.stamp_cell(idx, species);
                        changed += 1;
                    }
                }
            }
            changed
        }
        EventMeta::Comet {
            row,
            heading,
            gliders,
            ..
        } => {
            let shape = match heading {
                Heading::East => &GLIDER_EAST,
                Heading::West => &GLIDER_WEST,
            };
            let species = rng.gen_range(1..=MAX_SPECIES);
            let start = rng.gen_range(0..topology.cols());
            let mut changed = 0;
            for g in 0..*gliders as usize {
                let col = (start + g * COMET_SPACING) % topology.cols();
                for &(dr, dc) in shape {
                    let idx = topology.offset(*row, col, dr, dc);
                    if layers.life[idx] == 0 {
                        changed += 1;
                    }
                    layers.stamp_cell(idx, species);
                }
            }
            changed
        }
        EventMeta::Invasion { clusters } => {
            seed_invader_clusters(topology, layers, *clusters as usize, rng);
            0
        }
        _ => 0,
    }
}

/// Scatters small invader blobs at random positions.
pub fn seed_invader_clusters(
    topology: &GridTopology,
    layers: &mut Layers,
    count: usize,
    rng: &mut impl Rng,
) {
    for _ in 0..count {
        let row = rng.gen_range(0..topology.rows());
        let col = rng.gen_range(0..topology.cols());
        for dr in -1..=1 {
            for dc in -1..=1 {
                if rng.gen_bool(0.6) {
                    layers.invader[topology.offset(row, col, dr, dc)] = 1;
                }
            }
        }
    }
}
