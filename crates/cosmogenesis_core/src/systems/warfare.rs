//! Weapon escalation and nuclear detonation.
//!
//! Escalation only runs while NUCLEAR_WARFARE is active. A live cell climbs
//! None → Factory → Weapon → Nuke and never steps down until it dies or
//! detonates.

use crate::config::WarfareConfig;
use crate::layers::Layers;
use crate::topology::GridTopology;
use cosmogenesis_data::{WeaponState, UNASSIGNED_SPECIES};
use rand::Rng;

/// Half-width of the window scanned for armed cells when building a nuke.
const ARMS_RADIUS: isize = 2;
const ARMS_FOR_NUKE: usize = 3;

pub struct WeaponInput {
    pub idx: usize,
    pub tick: u64,
    /// Age after this tick's update.
    pub age: u32,
    pub survived: bool,
    pub nuclear_warfare: bool,
}

/// Next weapon state of a cell and whether it detonates this tick.
pub fn next_weapon(
    input: &WeaponInput,
    weapons: &[WeaponState],
    topology: &GridTopology,
    config: &WarfareConfig,
    rng: &mut impl Rng,
) -> (WeaponState, bool) {
    if !input.survived {
        return (WeaponState::None, false);
    }
    let current = weapons[input.idx];
    if !input.nuclear_warfare {
        return (current, false);
    }

    match current {
        WeaponState::None => {
            if input.age > config.age_threshold && rng.gen::<f64>() < config.factory_chance {
                (WeaponState::Factory, false)
            } else {
                (current, false)
            }
        }
        WeaponState::Factory => {
            if input.tick % config.factory_period == 0 && rng.gen::<f64>() < config.weapon_chance
            {
                (WeaponState::Weapon, false)
            } else {
                (current, false)
            }
        }
        WeaponState::Weapon => {
            if armed_nearby(input.idx, weapons, topology) >= ARMS_FOR_NUKE
                && rng.gen::<f64>() < config.nuke_chance
            {
                (WeaponState::Nuke, false)
            } else {
                (current, false)
            }
        }
        WeaponState::Nuke => (current, rng.gen::<f64>() < config.detonation_chance),
    }
}

/// Weapon or Nuke cells in the 5×5 window around `idx`, excluding itself.
fn armed_nearby(idx: usize, weapons: &[WeaponState], topology: &GridTopology) -> usize {
    let (row, col) = topology.coords(idx);
    let mut count = 0;
    for dr in -ARMS_RADIUS..=ARMS_RADIUS {
        for dc in -ARMS_RADIUS..=ARMS_RADIUS {
            if dr == 0 && dc == 0 {
                continue;
            }
            if weapons[topology.offset(row, col, dr, dc)].is_armed() {
                count += 1;
            }
        }
    }
    count
}

/// Destroys every cell within `radius` of `center` in the next-state buffers,
/// the detonating cell included. Returns how many live cells were killed.
pub fn detonate(center: usize, radius: f64, topology: &GridTopology, layers: &mut Layers) -> usize {
    let (row, col) = topology.coords(center);
    let reach = radius.floor() as isize;
    let mut killed = 0;
    for dr in -reach..=reach {
        for dc in -reach..=reach {
            if ((dr * dr + dc * dc) as f64).sqrt() > radius {
                continue;
            }
            let idx = topology.offset(row, col, dr, dc);
            if layers.life_next[idx] == 1 {
                killed += 1;
            }
            layers.life_next[idx] = 0;
            layers.species_next[idx] = UNASSIGNED_SPECIES;
            layers.weapon_next[idx] = WeaponState::None;
            layers.energy[idx] = 0.0;
            layers.age[idx] = 0;
        }
    }
    tracing::debug!(row, col, killed, "Nuke detonated");
    killed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn certain() -> WarfareConfig {
        WarfareConfig {
            factory_chance: 1.0,
            weapon_chance: 1.0,
            nuke_chance: 1.0,
            detonation_chance: 1.0,
            factory_period: 1,
            ..Default::default()
        }
    }

    fn input(idx: usize, survived: bool, nuclear_warfare: bool) -> WeaponInput {
        WeaponInput {
            idx,
            tick: 10,
            age: 100,
            survived,
            nuclear_warfare,
        }
    }

    #[test]
    fn test_escalation_ladder() {
        let topo = GridTopology::new(6, 6);
        let mut weapons = vec![WeaponState::None; topo.len()];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = certain();

        let (w, _) = next_weapon(&input(0, true, true), &weapons, &topo, &config, &mut rng);
        assert_eq!(w, WeaponState::Factory);
        weapons[0] = w;
        let (w, _) = next_weapon(&input(0, true, true), &weapons, &topo, &config, &mut rng);
        assert_eq!(w, WeaponState::Weapon);
        weapons[0] = w;

        // Not enough armed neighbors yet.
        let (w, _) = next_weapon(&input(0, true, true), &weapons, &topo, &config, &mut rng);
        assert_eq!(w, WeaponState::Weapon);

        for idx in [1, 2, 6] {
            weapons[idx] = WeaponState::Weapon;
        }
        let (w, _) = next_weapon(&input(0, true, true), &weapons, &topo, &config, &mut rng);
        assert_eq!(w, WeaponState::Nuke);
        weapons[0] = w;
        let (w, boom) = next_weapon(&input(0, true, true), &weapons, &topo, &config, &mut rng);
        assert_eq!(w, WeaponState::Nuke);
        assert!(boom);
    }

    #[test]
    fn test_no_escalation_without_war_and_reset_on_death() {
        let topo = GridTopology::new(4, 4);
        let weapons = vec![WeaponState::Weapon; topo.len()];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = certain();
        assert_eq!(
            next_weapon(&input(3, true, false), &weapons, &topo, &config, &mut rng),
            (WeaponState::Weapon, false)
        );
        assert_eq!(
            next_weapon(&input(3, false, true), &weapons, &topo, &config, &mut rng),
            (WeaponState::None, false)
        );
    }

    #[test]
    fn test_detonation_clears_radius() {
        let topo = GridTopology::new(20, 20);
        let mut layers = Layers::new(topo.len());
        layers.life_next.fill(1);
        layers.species_next.fill(3);
        let center = topo.index(10, 10);
        let killed = detonate(center, 3.5, &topo, &mut layers);
        // Lattice points within radius 3.5 of the origin.
        assert_eq!(killed, 37);
        assert_eq!(layers.life_next[center], 0);
        assert_eq!(layers.life_next[topo.index(10, 13)], 0);
        assert_eq!(layers.life_next[topo.index(10, 14)], 1);
        assert_eq!(layers.species_next[topo.index(12, 12)], UNASSIGNED_SPECIES);
    }
}
