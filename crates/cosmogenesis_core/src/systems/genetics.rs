//! Species inheritance.

use cosmogenesis_data::{MAX_SPECIES, UNASSIGNED_SPECIES};
use rand::Rng;

/// Species for a newborn cell: the majority among live, assigned neighbors,
/// ties broken by the first neighbor seen in scan order. With no such
/// neighbor a species is drawn uniformly from `1..=MAX_SPECIES`.
pub fn inherit_species(
    life: &[u8],
    species: &[u8],
    neighbors: &[usize; 8],
    rng: &mut impl Rng,
) -> u8 {
    let mut counts = [0u8; MAX_SPECIES as usize + 1];
    let mut best = UNASSIGNED_SPECIES;
    let mut best_count = 0;
    for &n in neighbors {
        let s = species[n];
        if life[n] == 0 || s == UNASSIGNED_SPECIES {
            continue;
        }
        counts[s as usize] += 1;
    }
    for &n in neighbors {
        let s = species[n];
        if life[n] == 0 || s == UNASSIGNED_SPECIES {
            continue;
        }
        if counts[s as usize] > best_count {
            best_count = counts[s as usize];
            best = s;
        }
    }
    if best == UNASSIGNED_SPECIES {
        rng.gen_range(1..=MAX_SPECIES)
    } else {
        best
    }
}

/// SPECIES_EVOLUTION pressure on a live or newborn cell: when any live
/// neighbor carries the dominant species, adopt it with probability `adoption`.
pub fn adopt_dominant(
    current: u8,
    life: &[u8],
    species: &[u8],
    neighbors: &[usize; 8],
    (dominant, adoption): (u8, f64),
    rng: &mut impl Rng,
) -> u8 {
    if current == dominant {
        return current;
    }
    let exposed = neighbors
        .iter()
        .any(|&n| life[n] == 1 && species[n] == dominant);
    if exposed && rng.gen::<f64>() < adoption {
        dominant
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const NEIGHBORS: [usize; 8] = [0, 1, 2, 3, 5, 6, 7, 8];

    #[test]
    fn test_majority_wins() {
        let life = [1, 1, 1, 0, 0, 0, 0, 0, 0];
        let species = [2, 5, 5, 0, 0, 0, 0, 0, 0];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(inherit_species(&life, &species, &NEIGHBORS, &mut rng), 5);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let life = [1, 1, 1, 1, 0, 0, 0, 0, 0];
        let species = [4, 6, 6, 4, 0, 0, 0, 0, 0];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(inherit_species(&life, &species, &NEIGHBORS, &mut rng), 4);
    }

    #[test]
    fn test_dead_and_unassigned_neighbors_ignored() {
        // Dead cells keep no species, but guard against stale ids anyway.
        let life = [0, 1, 0, 0, 0, 0, 0, 0, 0];
        let species = [3, 0, 3, 0, 0, 0, 0, 0, 0];
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for _ in 0..50 {
            let s = inherit_species(&life, &species, &NEIGHBORS, &mut rng);
            assert!((1..=MAX_SPECIES).contains(&s));
        }
    }

    #[test]
    fn test_adoption_requires_exposure() {
        let life = [1, 0, 0, 0, 1, 0, 0, 0, 0];
        let species = [2, 0, 0, 0, 1, 0, 0, 0, 0];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            adopt_dominant(1, &life, &species, &NEIGHBORS, (7, 1.0), &mut rng),
            1
        );
        assert_eq!(
            adopt_dominant(1, &life, &species, &NEIGHBORS, (2, 1.0), &mut rng),
            2
        );
    }
}
