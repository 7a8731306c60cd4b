//! # ledge_app
//!
//! Builds a level, installs the physics pipeline, and drives it with a
//! fixed-timestep loop. At the end the state of every entity is printed as
//! JSON, one snapshot per line.
//!
//! ## Startup Sequence
//!
//! 1. Load the optional JSON config and apply command-line overrides.
//! 2. Load the terrain (`--level`) or fall back to the built-in demo room.
//! 3. Populate the demo entities and install the systems.
//! 4. Run the tick loop.

mod config;
mod demo;
mod tick;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ledge_ecs::{ComponentStore, Scheduler};
use ledge_physics::{EntitySnapshot, TileMap};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use tick::TickLoop;

/// Ticks to run headless when neither the config nor the command line sets
/// a limit.
const DEFAULT_HEADLESS_TICKS: u64 = 600;

#[derive(Parser)]
#[command(name = "ledge_app", about = "Run a platformer level headless")]
struct Args {
    /// Number of ticks to run (0 = unlimited, only allowed with --realtime)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Target ticks per second
    #[arg(long)]
    tick_rate: Option<f64>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Terrain file: ASCII art, or JSON when the extension is `.json`
    #[arg(short, long)]
    level: Option<PathBuf>,

    /// Hold the tick rate in wall-clock time
    #[arg(long)]
    realtime: bool,
}

fn load_map(path: &Path) -> Result<TileMap> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading level {}", path.display()))?;
    let map = if path.extension().is_some_and(|ext| ext == "json") {
        TileMap::from_json(&text)
    } else {
        TileMap::from_ascii(demo::TILE_SIZE, &text)
    };
    map.with_context(|| format!("parsing level {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ledge_app=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        config.tick.max_ticks = ticks;
    }
    if let Some(rate) = args.tick_rate {
        config.tick.tick_rate = rate;
    }
    config.tick.realtime |= args.realtime;
    if config.tick.max_ticks == 0 && !config.tick.realtime {
        config.tick.max_ticks = DEFAULT_HEADLESS_TICKS;
    }
    config.validate()?;

    let map = match &args.level {
        Some(path) => load_map(path)?,
        None => demo::default_map()?,
    };
    info!(cols = map.cols(), rows = map.rows(), "terrain loaded");

    let mut store = ComponentStore::new();
    let level = demo::populate(&mut store)?;

    let mut scheduler = Scheduler::with_max_dt(config.max_dt);
    ledge_physics::install(&mut scheduler, config.physics, map)?;
    info!(systems = ?scheduler.system_names(), "pipeline ready");

    let mut tick_loop = TickLoop::new(config.tick.clone(), store, scheduler);
    tick_loop.run();

    if let Some(pos) = demo::player_position(tick_loop.store(), &level) {
        info!(x = pos.x, y = pos.y, ticks = tick_loop.tick_id(), "player final position");
    }
    let (button, door_open) = demo::door_state(tick_loop.store(), &level);
    info!(?button, door_open, "door final state");
    for snapshot in EntitySnapshot::capture_all(tick_loop.store()) {
        println!("{}", serde_json::to_string(&snapshot)?);
    }
    Ok(())
}
