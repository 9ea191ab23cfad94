use crate::model::universe::update::PassOutcome;
use crate::model::universe::Universe;
use cosmogenesis_core::systems::{detonate, propagate_invaders};
use cosmogenesis_data::TickResult;

impl Universe {
    /// Applies detonations and the invader pass to the next buffers, swaps,
    /// then records metrics and history and handles extinction or injection.
    pub(super) fn finalize_tick(&mut self, outcome: PassOutcome) -> TickResult {
        let tick = self.tick;
        let mut live_count = outcome.live_count;

        for &center in &outcome.detonations {
            live_count -= detonate(
                center,
                self.config.warfare.blast_radius,
                &self.topology,
                &mut self.layers,
            );
        }

        if self.config.world.war_mode {
            propagate_invaders(
                &self.topology,
                &mut self.layers,
                &self.config.warfare,
                &mut self.rng,
            );
        } else {
            self.layers.invader_next.fill(0);
        }

        self.layers.swap();
        self.metrics.record(
            live_count,
            self.layers.total_energy(),
            self.topology.len(),
        );

        if let Err(e) = self.history.consider(tick, &self.layers.life) {
            tracing::error!(tick, error = %e, "Failed to record history snapshot");
        }

        if live_count == 0 {
            self.extinct = true;
            tracing::warn!(tick, "Universe went extinct");
        } else if outcome.births_authorized && self.config.injection.enabled {
            let stamped = self.injector.inject(
                tick,
                &self.metrics,
                &self.library,
                &self.topology,
                &mut self.layers,
                &mut self.rng,
            );
            if !stamped.is_empty() {
                self.metrics.live_count = self.layers.live_count();
            }
        }

        if tick % self.config.logging.summary_interval == 0 {
            tracing::info!(
                tick,
                live = self.metrics.live_count,
                entropy = format!("{:.3}", self.metrics.entropy),
                energy = format!("{:.3}", self.metrics.average_energy),
                events = self.events.active().len(),
                snapshots = self.history.len(),
                "Universe summary"
            );
        }

        self.last_result = TickResult {
            tick,
            live_count: self.metrics.live_count,
            entropy: self.metrics.entropy,
            average_energy: self.metrics.average_energy,
            extinct: self.extinct,
        };
        self.last_result
    }
}

#[cfg(test)]
mod tests {
    use crate::model::config::UniverseConfig;
    use crate::model::universe::Universe;

    #[test]
    fn test_lonely_cell_goes_extinct_and_freezes() {
        let mut universe =
            Universe::from_cells(UniverseConfig::classic(5, 5), &[(2, 2)]).unwrap();
        let first = universe.tick();
        assert!(first.extinct);
        assert_eq!(first.live_count, 0);
        let again = universe.tick();
        assert_eq!(again, first);
        assert_eq!(universe.tick_count(), 1);
    }

    #[test]
    fn test_result_mirrors_metrics() {
        let mut universe = Universe::from_cells(
            UniverseConfig::classic(8, 8),
            &[(1, 1), (1, 2), (2, 1), (2, 2)],
        )
        .unwrap();
        let result = universe.tick();
        assert_eq!(result.tick, 1);
        assert_eq!(result.live_count, 4);
        assert_eq!(result.live_count, universe.live_count());
        assert!(!result.extinct);
    }
}
