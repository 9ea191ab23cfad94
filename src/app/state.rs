use crate::app::{SimulationClock, ShutdownManager};
use crate::model::config::UniverseConfig;
use crate::model::universe::Universe;
use std::time::Duration;

/// How the driver paces ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One tick per elapsed clock interval, scaled by time dilation.
    Realtime,
    /// Ticks back to back.
    Headless,
}

/// Driver state: the universe plus pacing and output options.
pub struct App {
    pub universe: Universe,
    pub clock: SimulationClock,
    pub mode: RunMode,
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
    /// Emit every tick result as a JSON line on stdout.
    pub json: bool,
    pub shutdown: ShutdownManager,
    pub frame_interval: Duration,
}

impl App {
    pub fn new(config: UniverseConfig, mode: RunMode) -> anyhow::Result<Self> {
        let clock = SimulationClock::new(Duration::from_millis(config.clock.tick_interval_ms));
        let frame_interval = Duration::from_millis(config.clock.frame_interval_ms);
        let universe = Universe::new(config)?;
        Ok(Self {
            universe,
            clock,
            mode,
            max_ticks: None,
            json: false,
            shutdown: ShutdownManager::new(),
            frame_interval,
        })
    }

    pub fn with_max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// True once the universe is extinct or the tick limit is reached.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.universe.is_extinct()
            || self
                .max_ticks
                .is_some_and(|max| self.universe.tick_count() >= max)
    }
}
