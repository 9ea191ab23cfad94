use anyhow::Result;
use clap::Parser;
use cosmogenesis_lib::app::{App, RunMode};
use cosmogenesis_lib::model::config::UniverseConfig;
use cosmogenesis_lib::model::events::EventKind;
use cosmogenesis_core::metrics::init_logging;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mode to run the simulation in
    #[arg(short, long, value_enum, default_value = "headless")]
    mode: Mode,

    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Seed for the random stream (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Grid rows (overrides the config file)
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns (overrides the config file)
    #[arg(long)]
    cols: Option<usize>,

    /// Stop after this many ticks
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Trigger a cosmic event before the first tick (repeatable)
    #[arg(long = "trigger", value_name = "KIND")]
    triggers: Vec<EventKind>,

    /// Print every tick result as a JSON line
    #[arg(long)]
    json: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Realtime,
    Headless,
}

impl From<Mode> for RunMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Realtime => RunMode::Realtime,
            Mode::Headless => RunMode::Headless,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = UniverseConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    if let Some(rows) = args.rows {
        config.world.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.world.cols = cols;
    }
    config.validate()?;
    init_logging(&config.logging.level);

    let mut app = App::new(config, args.mode.into())?
        .with_max_ticks(args.ticks)
        .with_json(args.json);
    for kind in args.triggers {
        app.universe.trigger_event(kind, None)?;
    }

    if let Err(e) = app.run().await {
        tracing::error!(error = %e, "Simulation failed");
        return Err(e);
    }
    Ok(())
}
