//! Invader propagation, run after the life pass.

use crate::config::WarfareConfig;
use crate::layers::Layers;
use crate::topology::GridTopology;
use rand::Rng;

const CONVERSION_NEIGHBORS: u8 = 3;

/// Writes the next invader layer from the current one.
///
/// First every cell resolves on its own: invaders persist unless they decay,
/// and empty cells convert when surrounded by enough invaders. Then each
/// current invader may expand onto one random neighbor that is alive in the
/// next life layer. Expansion only ever adds invaders.
pub fn propagate_invaders(
    topology: &GridTopology,
    layers: &mut Layers,
    config: &WarfareConfig,
    rng: &mut impl Rng,
) {
    let Layers {
        invader,
        invader_next,
        life_next,
        ..
    } = layers;

    for idx in 0..invader.len() {
        invader_next[idx] = if invader[idx] == 1 {
            u8::from(rng.gen::<f64>() >= config.invader_decay)
        } else if topology.neighbor_sum(invader, idx) >= CONVERSION_NEIGHBORS {
            u8::from(rng.gen::<f64>() < config.invader_conversion)
        } else {
            0
        };
    }

    for idx in 0..invader.len() {
        if invader[idx] == 0 || rng.gen::<f64>() >= config.invader_expansion {
            continue;
        }
        let target = topology.neighbors(idx)[rng.gen_range(0..8)];
        if life_next[target] == 1 {
            invader_next[target] = 1;
        }
    }
}
