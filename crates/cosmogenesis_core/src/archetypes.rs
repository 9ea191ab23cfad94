//! Pattern archetype library and the injector that stamps it.
//!
//! Archetypes are immutable sets of relative live-cell offsets. Stamping ORs
//! them onto the life layer with toroidal wrap. The injector reads entropy,
//! average energy and a neighborhood-diversity sample to decide what to stamp.

use crate::config::InjectionConfig;
use crate::layers::Layers;
use crate::metrics::{window_sum, MetricsCollector, WINDOW_BUCKETS};
use crate::topology::GridTopology;
use cosmogenesis_data::MAX_SPECIES;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Archetype {
    pub name: &'static str,
    /// Lower is rarer in spirit; picks weight by its inverse.
    pub rarity: f64,
    pub cells: Vec<(usize, usize)>,
    pub width: usize,
    pub height: usize,
}

impl Archetype {
    /// Builds an archetype from rows of `.`/`O` text.
    #[must_use]
    pub fn from_ascii(name: &'static str, rows: &[&str], rarity: f64) -> Self {
        let cells = rows
            .iter()
            .enumerate()
            .flat_map(|(r, line)| {
                line.chars()
                    .enumerate()
                    .filter(|&(_, ch)| matches!(ch, 'O' | 'X' | '1'))
                    .map(move |(c, _)| (r, c))
            })
            .collect();
        Self {
            name,
            rarity,
            cells,
            width: rows.first().map_or(0, |l| l.len()),
            height: rows.len(),
        }
    }

    /// ORs the pattern onto the current life layer at `(top, left)`.
    ///
    /// Returns the number of cells that were dead before.
    pub fn stamp(
        &self,
        topology: &GridTopology,
        layers: &mut Layers,
        top: usize,
        left: usize,
        species: u8,
    ) -> usize {
        let mut born = 0;
        for &(r, c) in &self.cells {
            let idx = topology.offset(top, left, r as isize, c as isize);
            if layers.life[idx] == 0 {
                born += 1;
            }
            layers.stamp_cell(idx, species);
        }
        born
    }
}

pub struct PatternLibrary {
    patterns: Vec<Archetype>,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

impl PatternLibrary {
    #[must_use]
    pub fn standard() -> Self {
        let patterns = vec![
            Archetype::from_ascii("Glider", &[".O.", "..O", "OOO"], 0.2),
            Archetype::from_ascii("LWSS", &[".O..O", "O....", "O...O", "OOOO."], 0.1),
            Archetype::from_ascii(
                "PulsarCore",
                &[
                    "..OOO...OOO..",
                    ".............",
                    "O....O.O....O",
                    "O....O.O....O",
                    "O....O.O....O",
                    "..OOO...OOO..",
                    ".............",
                    "..OOO...OOO..",
                    "O....O.O....O",
                    "O....O.O....O",
                    "O....O.O....O",
                    ".............",
                    "..OOO...OOO..",
                ],
                0.05,
            ),
            Archetype::from_ascii(
                "GosperGun",
                &[
                    "........................O...........",
                    "......................O.O...........",
                    "............OO......OO............OO",
                    "...........O...O....OO............OO",
                    "OO........O.....O...OO..............",
                    "OO........O...O.OO....O.O...........",
                    "..........O.....O.......O...........",
                    "...........O...O....................",
                    "............OO......................",
                ],
                0.02,
            ),
            Archetype::from_ascii(
                "SpiralSeed",
                &[
                    "...O...", "..OOO..", ".OO.OO.", "OO...OO", ".OO.OO.", "..OOO..", "...O...",
                ],
                0.15,
            ),
            Archetype::from_ascii(
                "NovaCluster",
                &["..O..", ".O.O.", "O...O", ".O.O.", "..O.."],
                0.25,
            ),
        ];
        Self { patterns }
    }

    #[must_use]
    pub fn patterns(&self) -> &[Archetype] {
        &self.patterns
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Archetype> {
        self.patterns.iter().find(|p| p.name == name)
    }

    /// Random pick weighted by inverse rarity.
    pub fn pick_weighted(&self, rng: &mut impl Rng) -> &Archetype {
        let total: f64 = self.patterns.iter().map(|p| 1.0 / p.rarity).sum();
        let mut t = rng.gen::<f64>() * total;
        for pattern in &self.patterns {
            t -= 1.0 / pattern.rarity;
            if t <= 0.0 {
                return pattern;
            }
        }
        &self.patterns[self.patterns.len() - 1]
    }

    /// The named archetype, or a weighted random one when the name is unknown.
    pub fn select(&self, name: &str, rng: &mut impl Rng) -> &Archetype {
        match self.get(name) {
            Some(pattern) => pattern,
            None => self.pick_weighted(rng),
        }
    }
}

/// Distinct 3×3 live-count buckets seen over `samples` random windows.
pub fn neighborhood_signature(
    life: &[u8],
    topology: &GridTopology,
    samples: usize,
    rng: &mut impl Rng,
) -> usize {
    let mut buckets = [0u16; WINDOW_BUCKETS];
    for _ in 0..samples {
        let idx = rng.gen_range(0..topology.len());
        let b = &mut buckets[window_sum(life, topology, idx) as usize];
        *b = b.saturating_add(1);
    }
    buckets.iter().filter(|&&b| b > 0).count()
}

/// Decides when and what to stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Injector {
    cooldown: u64,
    diversity_samples: usize,
    last_injection: Option<u64>,
}

impl Injector {
    #[must_use]
    pub fn new(config: &InjectionConfig) -> Self {
        Self {
            cooldown: config.cooldown,
            diversity_samples: config.diversity_samples,
            last_injection: None,
        }
    }

    #[must_use]
    pub fn last_injection(&self) -> Option<u64> {
        self.last_injection
    }

    pub fn reset(&mut self) {
        self.last_injection = None;
    }

    /// Consults the metrics and stamps patterns into the current grid.
    ///
    /// Returns the names of the stamped archetypes.
    pub fn inject(
        &mut self,
        tick: u64,
        metrics: &MetricsCollector,
        library: &PatternLibrary,
        topology: &GridTopology,
        layers: &mut Layers,
        rng: &mut impl Rng,
    ) -> Vec<&'static str> {
        if let Some(last) = self.last_injection {
            if tick.saturating_sub(last) < self.cooldown {
                return Vec::new();
            }
        }

        let entropy = metrics.entropy;
        let energy = metrics.average_energy;
        let diversity =
            neighborhood_signature(&layers.life, topology, self.diversity_samples, rng);

        let mut picks: Vec<&str> = Vec::new();
        if entropy < 1.5 && diversity <= 3 {
            picks.push("GosperGun");
        } else if (3.0..=6.0).contains(&energy) && rng.gen::<f64>() < 0.05 {
            for _ in 0..rng.gen_range(2..=3) {
                picks.push(if rng.gen_bool(0.5) {
                    "SpiralSeed"
                } else {
                    "NovaCluster"
                });
            }
        } else if entropy > 3.0 && rng.gen::<f64>() < 0.05 {
            for _ in 0..rng.gen_range(3..=5) {
                picks.push(if rng.gen_bool(0.5) { "Glider" } else { "LWSS" });
            }
        }
        if (2.0..=2.8).contains(&entropy) && rng.gen::<f64>() < 0.01 {
            picks.push("PulsarCore");
        }

        if picks.is_empty() {
            return Vec::new();
        }

        let mut stamped = Vec::with_capacity(picks.len());
        for name in picks {
            let pattern = library.select(name, rng);
            let top = rng.gen_range(0..topology.rows());
            let left = rng.gen_range(0..topology.cols());
            let species = rng.gen_range(1..=MAX_SPECIES);
            let born = pattern.stamp(topology, layers, top, left, species);
            tracing::debug!(tick, pattern = pattern.name, top, left, born, "Injected archetype");
            stamped.push(pattern.name);
        }
        self.last_injection = Some(tick);
        stamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_library_shapes() {
        let lib = PatternLibrary::standard();
        assert_eq!(lib.patterns().len(), 6);
        assert_eq!(lib.get("Glider").map(|p| p.cells.len()), Some(5));
        assert_eq!(lib.get("LWSS").map(|p| p.cells.len()), Some(9));
        assert_eq!(lib.get("PulsarCore").map(|p| p.cells.len()), Some(48));
        assert_eq!(lib.get("GosperGun").map(|p| p.cells.len()), Some(36));
        let gun = lib.get("GosperGun").unwrap();
        assert_eq!((gun.height, gun.width), (9, 36));
    }

    #[test]
    fn test_unknown_name_falls_back() {
        let lib = PatternLibrary::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let picked = lib.select("Nonexistent", &mut rng);
        assert!(lib.get(picked.name).is_some());
    }

    #[test]
    fn test_weighted_pick_favors_inverse_rarity() {
        let lib = PatternLibrary::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut guns = 0;
        let mut novas = 0;
        for _ in 0..2000 {
            match lib.pick_weighted(&mut rng).name {
                "GosperGun" => guns += 1,
                "NovaCluster" => novas += 1,
                _ => {}
            }
        }
        assert!(guns > novas);
    }

    #[test]
    fn test_stamp_wraps_and_assigns_species() {
        let topo = GridTopology::new(5, 5);
        let mut layers = Layers::new(topo.len());
        let lib = PatternLibrary::standard();
        let glider = lib.get("Glider").unwrap();
        let born = glider.stamp(&topo, &mut layers, 4, 4, 6);
        assert_eq!(born, 5);
        // (4 + 2, 4 + 2) wraps to (1, 1).
        assert_eq!(layers.life[topo.index(1, 1)], 1);
        assert_eq!(layers.species[topo.index(1, 1)], 6);
    }

    #[test]
    fn test_signature_of_empty_grid() {
        let topo = GridTopology::new(10, 10);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            neighborhood_signature(&vec![0; topo.len()], &topo, 120, &mut rng),
            1
        );
    }

    #[test]
    fn test_low_entropy_injects_gun_then_cools_down() {
        let topo = GridTopology::new(40, 60);
        let mut layers = Layers::new(topo.len());
        let lib = PatternLibrary::standard();
        let mut injector = Injector::new(&InjectionConfig::default());
        let metrics = MetricsCollector::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let names = injector.inject(10, &metrics, &lib, &topo, &mut layers, &mut rng);
        assert_eq!(names, vec!["GosperGun"]);
        assert_eq!(layers.live_count(), 36);
        assert!(injector
            .inject(20, &metrics, &lib, &topo, &mut layers, &mut rng)
            .is_empty());
    }
}
