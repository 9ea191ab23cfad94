use crate::model::config::{Seeding, UniverseConfig};
use crate::model::universe::{Seed, Universe};
use cosmogenesis_core::archetypes::{Injector, PatternLibrary};
use cosmogenesis_core::chemistry::ChemicalField;
use cosmogenesis_core::error::UniverseError;
use cosmogenesis_core::events::spawn::seed_invader_clusters;
use cosmogenesis_core::events::EventScheduler;
use cosmogenesis_core::history::HistoryBuffer;
use cosmogenesis_core::layers::Layers;
use cosmogenesis_core::metrics::MetricsCollector;
use cosmogenesis_core::topology::GridTopology;
use cosmogenesis_data::{TickResult, MAX_SPECIES};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

impl Universe {
    /// Builds and seeds a universe from `config`.
    ///
    /// The random stream is seeded from `world.seed`, or from OS entropy when
    /// no seed is configured.
    pub fn new(config: UniverseConfig) -> anyhow::Result<Self> {
        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Builds a universe that draws every random decision from `rng`.
    pub fn with_rng(config: UniverseConfig, rng: ChaCha8Rng) -> anyhow::Result<Self> {
        Self::build(config, rng, Seed::Configured)
    }

    /// Default configuration with the given dimensions and optional seed.
    pub fn initialize(rows: usize, cols: usize, seed: Option<u64>) -> anyhow::Result<Self> {
        let mut config = UniverseConfig::default();
        config.world.rows = rows;
        config.world.cols = cols;
        config.world.seed = seed;
        Self::new(config)
    }

    /// Starts from exactly the given live cells instead of the configured seeding.
    pub fn from_cells(config: UniverseConfig, cells: &[(usize, usize)]) -> anyhow::Result<Self> {
        let rng = ChaCha8Rng::seed_from_u64(config.world.seed.unwrap_or(0));
        Self::build(config, rng, Seed::Cells(cells.to_vec()))
    }

    fn build(config: UniverseConfig, rng: ChaCha8Rng, seed: Seed) -> anyhow::Result<Self> {
        let (rows, cols) = (config.world.rows, config.world.cols);
        if rows == 0 || cols == 0 {
            return Err(UniverseError::InvalidDimensions { rows, cols }.into());
        }
        config.validate()?;
        if let Seed::Cells(cells) = &seed {
            if let Some(&(row, col)) = cells.iter().find(|&&(r, c)| r >= rows || c >= cols) {
                return Err(UniverseError::OutOfBounds {
                    row,
                    col,
                    rows,
                    cols,
                }
                .into());
            }
        }

        let topology = GridTopology::try_new(rows, cols)?;
        let len = topology.len();
        let mut universe = Self {
            layers: Layers::new(len),
            chemistry: ChemicalField::new(len),
            metrics: MetricsCollector::new(),
            events: EventScheduler::new(&config.events),
            history: HistoryBuffer::new(&config.history, len),
            library: PatternLibrary::standard(),
            injector: Injector::new(&config.injection),
            initial_rng: rng.clone(),
            rng,
            seed,
            pending: Vec::new(),
            tick: 0,
            extinct: false,
            last_result: TickResult::default(),
            topology,
            config,
        };
        universe.populate();
        tracing::info!(
            rows,
            cols,
            live = universe.metrics.live_count,
            fingerprint = %universe.config.fingerprint(),
            "Universe initialized"
        );
        Ok(universe)
    }

    /// Resets every layer and replays the original seeding with the original
    /// random stream. Clears extinction.
    pub fn restart(&mut self) {
        self.rng = self.initial_rng.clone();
        self.layers.clear();
        self.chemistry.clear();
        self.events.clear();
        self.history.clear();
        self.injector.reset();
        self.pending.clear();
        self.tick = 0;
        self.extinct = false;
        self.populate();
        tracing::info!(live = self.metrics.live_count, "Universe restarted");
    }

    fn populate(&mut self) {
        match self.seed.clone() {
            Seed::Configured => {
                if self.config.world.seeding == Seeding::Cosmic {
                    self.seed_cosmic();
                }
            }
            Seed::Cells(cells) => {
                for (row, col) in cells {
                    let species = self.rng.gen_range(1..=MAX_SPECIES);
                    let idx = self.topology.index(row, col);
                    self.layers.stamp_cell(idx, species);
                }
            }
        }

        if self.config.world.war_mode && self.seed == Seed::Configured {
            seed_invader_clusters(
                &self.topology,
                &mut self.layers,
                self.config.warfare.initial_invader_clusters,
                &mut self.rng,
            );
        }

        self.chemistry.seed_from_life(&self.layers.life);
        self.metrics.reset(
            self.layers.live_count(),
            self.layers.total_energy(),
            self.topology.len(),
        );
        if let Err(e) = self.history.consider(0, &self.layers.life) {
            tracing::error!(error = %e, "Failed to record initial history snapshot");
        }
        self.last_result = TickResult {
            tick: 0,
            live_count: self.metrics.live_count,
            entropy: 0.0,
            average_energy: self.metrics.average_energy,
            extinct: false,
        };
    }

    /// Dense core disc, sparser halo ring, sparse background.
    fn seed_cosmic(&mut self) {
        let world = &self.config.world;
        let rows = self.topology.rows();
        let cols = self.topology.cols();
        let short_side = rows.min(cols) as f64;
        let core = world.core_radius * short_side;
        let halo = world.halo_radius * short_side;
        let center = (rows / 2, cols / 2);

        for idx in 0..self.topology.len() {
            let d = self.topology.distance(self.topology.coords(idx), center);
            let p = if d < core {
                world.core_density
            } else if d < halo {
                world.halo_density
            } else {
                world.background_density
            };
            if self.rng.gen::<f64>() < p {
                let species = self.rng.gen_range(1..=MAX_SPECIES);
                self.layers.stamp_cell(idx, species);
            }
        }
    }
}
