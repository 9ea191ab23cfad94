use crate::model::config::UniverseConfig;
use crate::model::universe::Universe;
use cosmogenesis_core::error::UniverseError;
use cosmogenesis_core::history::HistoryBuffer;
use cosmogenesis_core::metrics::MetricsCollector;
use cosmogenesis_core::topology::GridTopology;
use cosmogenesis_data::{CosmicEvent, EventKind, EventMeta, TickResult, WeaponState};
use sha2::{Digest, Sha256};

impl Universe {
    /// Queues `kind` to spawn at the start of the next tick.
    ///
    /// Metadata left out is generated from the universe at spawn time. An
    /// extinct universe ignores triggers.
    pub fn trigger_event(
        &mut self,
        kind: EventKind,
        meta: Option<EventMeta>,
    ) -> Result<(), UniverseError> {
        if let Some(meta) = &meta {
            if meta.kind() != kind {
                return Err(UniverseError::MetadataMismatch {
                    expected: kind,
                    found: meta.kind(),
                });
            }
        }
        if self.extinct {
            tracing::warn!(kind = %kind, "Trigger ignored, universe is extinct");
            return Ok(());
        }
        tracing::debug!(tick = self.tick, kind = %kind, "Event trigger queued");
        self.pending.push((kind, meta));
        Ok(())
    }

    #[must_use]
    pub fn life(&self) -> &[u8] {
        &self.layers.life
    }

    #[must_use]
    pub fn invader(&self) -> &[u8] {
        &self.layers.invader
    }

    #[must_use]
    pub fn species(&self) -> &[u8] {
        &self.layers.species
    }

    #[must_use]
    pub fn alliance(&self) -> &[u8] {
        &self.layers.alliance
    }

    #[must_use]
    pub fn weapons(&self) -> &[WeaponState] {
        &self.layers.weapon
    }

    #[must_use]
    pub fn energy(&self) -> &[f64] {
        &self.layers.energy
    }

    #[must_use]
    pub fn age(&self) -> &[u32] {
        &self.layers.age
    }

    #[must_use]
    pub fn chemical_a(&self) -> &[f64] {
        &self.chemistry.a
    }

    #[must_use]
    pub fn chemical_b(&self) -> &[f64] {
        &self.chemistry.b
    }

    #[must_use]
    pub fn active_events(&self) -> &[CosmicEvent] {
        self.events.active()
    }

    #[must_use]
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    #[must_use]
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    #[must_use]
    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    #[must_use]
    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// `(rows, cols)`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.topology.rows(), self.topology.cols())
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.metrics.live_count
    }

    /// Product of the factors of every active time dilation; 1.0 when none.
    #[must_use]
    pub fn time_scale(&self) -> f64 {
        self.events.time_scale()
    }

    #[must_use]
    pub fn is_extinct(&self) -> bool {
        self.extinct
    }

    #[must_use]
    pub fn last_result(&self) -> TickResult {
        self.last_result
    }

    /// SHA-256 over the tick counter and every cell layer, hex encoded.
    ///
    /// Two universes built from the same configuration and seed produce the
    /// same digest after the same sequence of ticks and triggers.
    #[must_use]
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.tick.to_le_bytes());
        hasher.update(&self.layers.life);
        hasher.update(&self.layers.invader);
        hasher.update(&self.layers.species);
        for weapon in &self.layers.weapon {
            hasher.update([weapon.as_u8()]);
        }
        for (energy, age) in self.layers.energy.iter().zip(&self.layers.age) {
            hasher.update(energy.to_le_bytes());
            hasher.update(age.to_le_bytes());
        }
        for (a, b) in self.chemistry.a.iter().zip(&self.chemistry.b) {
            hasher.update(a.to_le_bytes());
            hasher.update(b.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Universe {
        Universe::from_cells(UniverseConfig::classic(6, 6), &[(2, 1), (2, 2), (2, 3)])
            .expect("Failed to create universe")
    }

    #[test]
    fn test_trigger_rejects_mismatched_meta() {
        let mut universe = small();
        let err = universe
            .trigger_event(EventKind::Nebula, Some(EventMeta::NuclearWarfare))
            .unwrap_err();
        assert!(matches!(
            err,
            UniverseError::MetadataMismatch {
                expected: EventKind::Nebula,
                found: EventKind::NuclearWarfare
            }
        ));
    }

    #[test]
    fn test_time_scale_without_dilation() {
        assert_eq!(small().time_scale(), 1.0);
    }

    #[test]
    fn test_time_scale_follows_dilation() {
        let mut universe = small();
        universe
            .trigger_event(
                EventKind::TimeDilation,
                Some(EventMeta::TimeDilation { factor: 0.5 }),
            )
            .unwrap();
        universe.tick();
        assert!((universe.time_scale() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_config_is_read_only_after_validation() {
        let mut config = UniverseConfig::classic(6, 6);
        config.chemistry.interval = 3;
        let mut universe = Universe::from_cells(config, &[(2, 1), (2, 2), (2, 3)]).unwrap();
        assert_eq!(universe.config().chemistry.interval, 3);
        for _ in 0..6 {
            universe.tick();
        }
        assert_eq!(universe.tick_count(), 6);

        let mut config = UniverseConfig::classic(6, 6);
        config.chemistry.interval = 0;
        assert!(Universe::from_cells(config, &[(2, 2)]).is_err());
    }

    #[test]
    fn test_digest_changes_with_tick() {
        let mut universe = small();
        let before = universe.digest();
        assert_eq!(before.len(), 64);
        universe.tick();
        assert_ne!(before, universe.digest());
    }
}
