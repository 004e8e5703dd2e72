use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use traffic_signal_sim::simulation::{
    RoadId, SimConfig, SimulationEngine, SimulationStats, VehicleOrdering,
};

#[derive(Parser)]
#[command(name = "traffic_signal_sim")]
#[command(about = "Headless two-road signalized intersection simulation")]
struct Cli {
    /// TOML file overriding the default configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible spawns
    #[arg(long)]
    seed: Option<u64>,

    /// Real seconds to simulate
    #[arg(long, default_value = "30")]
    duration: f32,

    /// Frames per real second (overrides the config)
    #[arg(long)]
    fps: Option<f32>,

    /// How vehicles observe each other within a tick (overrides the config)
    #[arg(long, value_enum)]
    ordering: Option<VehicleOrdering>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if let Some(ordering) = cli.ordering {
        config.ordering = ordering;
    }

    run_headless(config, cli.seed, cli.duration)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(config: SimConfig, seed: Option<u64>, duration: f32) -> Result<()> {
    let frame_dt = 1.0 / config.fps;
    let frames = config.frame_count(duration);
    let frames_per_second = config.fps.ceil().max(1.0) as u64;

    info!("Running intersection simulation in headless mode...");
    info!(
        "Duration: {duration}s real, {} fps, speed factor {}x, {:?} ordering",
        config.fps, config.speed_factor, config.ordering
    );

    let mut engine = match seed {
        Some(seed) => SimulationEngine::with_seed(config, seed),
        None => SimulationEngine::new(config),
    }
    .context("Failed to build simulation engine")?;
    let mut stats = SimulationStats::new();

    for _ in 0..frames {
        let report = engine.tick(frame_dt);
        stats.record_tick(&report, engine.scenario());

        if engine.ticks() % frames_per_second == 0 {
            print_status(&engine);
        }
    }

    stats.finalize();

    info!("=== SIMULATION COMPLETE ===");
    info!("Real time: {:.2}s", engine.clock().real_elapsed());
    info!("Active vehicles: {}", engine.scenario().vehicle_count());
    stats.log_summary();

    Ok(())
}

fn print_status(engine: &SimulationEngine) {
    let scenario = engine.scenario();
    info!(
        "t={:.1}s | vertical {:?} queue {} | horizontal {:?} queue {} | vehicles {}",
        engine.clock().virtual_elapsed(),
        scenario.signal_for(RoadId::Vertical).color(),
        scenario.queue_depth(RoadId::Vertical),
        scenario.signal_for(RoadId::Horizontal).color(),
        scenario.queue_depth(RoadId::Horizontal),
        scenario.vehicle_count()
    );
}
