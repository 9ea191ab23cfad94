pub mod clock;
pub mod shutdown;
pub mod state;

pub use clock::SimulationClock;
pub use shutdown::ShutdownManager;
pub use state::{App, RunMode};

use anyhow::Result;
use cosmogenesis_data::TickResult;
use std::io::Write;
use std::time::Instant;
use tokio::time::MissedTickBehavior;

impl App {
    /// Runs until extinction, the tick limit or Ctrl-C.
    pub async fn run(&mut self) -> Result<()> {
        self.shutdown.listen_for_ctrl_c();

        let mut frames = tokio::time::interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut out = std::io::stdout();

        tracing::info!(
            mode = ?self.mode,
            max_ticks = ?self.max_ticks,
            "Simulation loop started"
        );

        while !self.shutdown.is_shutdown_requested() && !self.finished() {
            match self.mode {
                RunMode::Headless => {
                    self.step(&mut out)?;
                    tokio::task::yield_now().await;
                }
                RunMode::Realtime => {
                    frames.tick().await;
                    if self
                        .clock
                        .should_tick(Instant::now(), self.universe.time_scale())
                    {
                        self.step(&mut out)?;
                    }
                }
            }
        }
        out.flush()?;

        let last = self.universe.last_result();
        tracing::info!(
            tick = last.tick,
            live = last.live_count,
            extinct = last.extinct,
            digest = %self.universe.digest(),
            "Simulation loop finished"
        );
        Ok(())
    }

    /// Advances one tick and writes its result when JSON output is on.
    pub fn step(&mut self, out: &mut impl Write) -> Result<TickResult> {
        let result = self.universe.tick();
        if self.json {
            serde_json::to_writer(&mut *out, &result)?;
            writeln!(out)?;
        }
        Ok(result)
    }
}
