//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every section has defaults, so a file only needs to
//! name the values it overrides.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults)
//! 3. Command-line flags of the driver (seed, dimensions)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! rows = 90
//! cols = 160
//! seed = 42
//!
//! [events]
//! probability_scale = 2.0
//!
//! [history]
//! capacity = 32
//! ```

use serde::{Deserialize, Serialize};

/// How the life layer is populated at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seeding {
    /// Dense core disc, sparser halo ring and a sprinkle of background life.
    #[default]
    Cosmic,
    /// No life at all; callers stamp explicit cells.
    Empty,
}

/// Grid dimensions, seeding and war mode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub rows: usize,
    pub cols: usize,
    pub seed: Option<u64>,
    pub seeding: Seeding,
    /// Radius of the dense core as a fraction of the smaller dimension.
    pub core_radius: f64,
    /// Outer radius of the halo ring as a fraction of the smaller dimension.
    pub halo_radius: f64,
    pub core_density: f64,
    pub halo_density: f64,
    pub background_density: f64,
    /// Enables the invader layer and its interaction with life.
    pub war_mode: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            rows: 120,
            cols: 200,
            seed: None,
            seeding: Seeding::Cosmic,
            core_radius: 0.17,
            halo_radius: 0.3,
            core_density: 0.4,
            halo_density: 0.15,
            background_density: 0.03,
            war_mode: true,
        }
    }
}

/// Rule adaptation and mutation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    /// Entropy/energy driven widening and narrowing of the base rule sets.
    pub adaptive: bool,
    /// Chemistry concentrations modify birth/survival per cell.
    pub chemistry_coupling: bool,
    pub base_mutation_rate: f64,
    pub max_mutation_rate: f64,
    pub entropy_samples: usize,
    /// Probability that birth-on-3 is dropped for a tick when entropy is high.
    pub chaos_drop_chance: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            adaptive: true,
            chemistry_coupling: true,
            base_mutation_rate: 0.0002,
            max_mutation_rate: 0.05,
            entropy_samples: 400,
            chaos_drop_chance: 0.5,
        }
    }
}

/// Gray–Scott constants.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChemistryConfig {
    pub feed_rate: f64,
    pub kill_rate: f64,
    pub diffusion_a: f64,
    pub diffusion_b: f64,
    pub dt: f64,
    /// The solver runs on ticks divisible by this interval.
    pub interval: u64,
}

impl Default for ChemistryConfig {
    fn default() -> Self {
        Self {
            feed_rate: 0.037,
            kill_rate: 0.06,
            diffusion_a: 1.0,
            diffusion_b: 0.5,
            dt: 0.9,
            interval: 2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EventConfig {
    /// Scheduled (stochastic) spawning. Explicit triggers work regardless.
    pub enabled: bool,
    /// Multiplies every scheduled spawn probability.
    pub probability_scale: f64,
    /// Reject scheduled spawns of a kind while an instance of it is active.
    pub exclusive_per_kind: bool,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            probability_scale: 1.0,
            exclusive_per_kind: false,
        }
    }
}

/// Weapon escalation and invader behavior.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WarfareConfig {
    pub age_threshold: u32,
    pub factory_chance: f64,
    pub factory_period: u64,
    pub weapon_chance: f64,
    pub nuke_chance: f64,
    pub detonation_chance: f64,
    pub blast_radius: f64,
    pub invader_decay: f64,
    pub invader_expansion: f64,
    pub invader_conversion: f64,
    pub invader_extinguish: f64,
    pub invasion_suppression: f64,
    pub initial_invader_clusters: usize,
}

impl Default for WarfareConfig {
    fn default() -> Self {
        Self {
            age_threshold: 25,
            factory_chance: 0.004,
            factory_period: 15,
            weapon_chance: 0.3,
            nuke_chance: 0.05,
            detonation_chance: 0.02,
            blast_radius: 3.5,
            invader_decay: 0.03,
            invader_expansion: 0.08,
            invader_conversion: 0.3,
            invader_extinguish: 0.2,
            invasion_suppression: 0.5,
            initial_invader_clusters: 3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InjectionConfig {
    pub enabled: bool,
    /// Minimum ticks between two injections.
    pub cooldown: u64,
    pub diversity_samples: usize,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cooldown: 30,
            diversity_samples: 120,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
    /// Fraction of differing cells that forces a snapshot.
    pub diff_threshold: f64,
    /// A snapshot is taken at least this often.
    pub force_interval: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: 24,
            diff_threshold: 0.02,
            force_interval: 60,
        }
    }
}

/// Wall-clock pacing used by the realtime driver.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClockConfig {
    pub tick_interval_ms: u64,
    pub frame_interval_ms: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 90,
            frame_interval_ms: 16,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub summary_interval: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            summary_interval: 500,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct UniverseConfig {
    pub world: WorldConfig,
    pub rules: RulesConfig,
    pub chemistry: ChemistryConfig,
    pub events: EventConfig,
    pub warfare: WarfareConfig,
    pub injection: InjectionConfig,
    pub history: HistoryConfig,
    pub clock: ClockConfig,
    pub logging: LoggingConfig,
}

fn ensure_probability(value: f64, name: &str) -> anyhow::Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&value),
        "{name} must be in [0.0, 1.0], got {value}"
    );
    Ok(())
}

impl UniverseConfig {
    /// Plain Conway life: no adaptation, events, mutation, chemistry coupling,
    /// invaders or injections. Starts empty.
    #[must_use]
    pub fn classic(rows: usize, cols: usize) -> Self {
        Self {
            world: WorldConfig {
                rows,
                cols,
                seeding: Seeding::Empty,
                war_mode: false,
                ..WorldConfig::default()
            },
            rules: RulesConfig {
                adaptive: false,
                chemistry_coupling: false,
                base_mutation_rate: 0.0,
                ..RulesConfig::default()
            },
            events: EventConfig {
                enabled: false,
                ..EventConfig::default()
            },
            injection: InjectionConfig {
                enabled: false,
                ..InjectionConfig::default()
            },
            ..Self::default()
        }
    }

    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.world.rows > 0, "World rows must be positive");
        anyhow::ensure!(self.world.cols > 0, "World cols must be positive");
        anyhow::ensure!(
            self.world.rows <= 4096 && self.world.cols <= 4096,
            "World too large (max 4096 per side)"
        );
        anyhow::ensure!(
            self.world.core_radius >= 0.0 && self.world.halo_radius >= self.world.core_radius,
            "Halo radius must not be smaller than core radius"
        );
        ensure_probability(self.world.core_density, "Core density")?;
        ensure_probability(self.world.halo_density, "Halo density")?;
        ensure_probability(self.world.background_density, "Background density")?;

        ensure_probability(self.rules.base_mutation_rate, "Base mutation rate")?;
        ensure_probability(self.rules.max_mutation_rate, "Max mutation rate")?;
        ensure_probability(self.rules.chaos_drop_chance, "Chaos drop chance")?;
        anyhow::ensure!(
            self.rules.entropy_samples > 0,
            "Entropy samples must be positive"
        );

        anyhow::ensure!(
            self.chemistry.feed_rate >= 0.0 && self.chemistry.kill_rate >= 0.0,
            "Feed and kill rates must be non-negative"
        );
        anyhow::ensure!(
            self.chemistry.diffusion_a >= self.chemistry.diffusion_b,
            "Chemical A must diffuse at least as fast as chemical B"
        );
        anyhow::ensure!(
            self.chemistry.dt > 0.0 && self.chemistry.dt <= 1.0,
            "Chemistry dt must be in (0.0, 1.0]"
        );
        anyhow::ensure!(
            self.chemistry.interval > 0,
            "Chemistry interval must be positive"
        );

        anyhow::ensure!(
            self.events.probability_scale >= 0.0,
            "Event probability scale must be non-negative"
        );

        let w = &self.warfare;
        for (value, name) in [
            (w.factory_chance, "Factory chance"),
            (w.weapon_chance, "Weapon chance"),
            (w.nuke_chance, "Nuke chance"),
            (w.detonation_chance, "Detonation chance"),
            (w.invader_decay, "Invader decay"),
            (w.invader_expansion, "Invader expansion"),
            (w.invader_conversion, "Invader conversion"),
            (w.invader_extinguish, "Invader extinguish"),
            (w.invasion_suppression, "Invasion suppression"),
        ] {
            ensure_probability(value, name)?;
        }
        anyhow::ensure!(w.factory_period > 0, "Factory period must be positive");
        anyhow::ensure!(w.blast_radius >= 0.0, "Blast radius must be non-negative");

        anyhow::ensure!(
            self.injection.diversity_samples > 0,
            "Diversity samples must be positive"
        );

        anyhow::ensure!(
            self.history.capacity > 0,
            "History capacity must be positive"
        );
        ensure_probability(self.history.diff_threshold, "History diff threshold")?;
        anyhow::ensure!(
            self.history.force_interval > 0,
            "History force interval must be positive"
        );

        anyhow::ensure!(
            self.clock.tick_interval_ms > 0 && self.clock.frame_interval_ms > 0,
            "Clock intervals must be positive"
        );
        anyhow::ensure!(
            self.logging.summary_interval > 0,
            "Summary interval must be positive"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path, "No config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Hash of every section that changes how generations evolve.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.rules).as_bytes());
        hasher.update(format!("{:?}", self.chemistry).as_bytes());
        hasher.update(format!("{:?}", self.events).as_bytes());
        hasher.update(format!("{:?}", self.warfare).as_bytes());
        hasher.update(format!("{:?}", self.injection).as_bytes());
        hex::encode(hasher.finalize())
    }
}
