use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;

use intersection_sim::simulation::{
    has_pending_records, RecordGenerator, RemovalPolicy, Road, SimConfig, SimWorld,
    DEFAULT_FOLLOWING_DISTANCE, DEFAULT_PHASE_DURATION, DEFAULT_RECORDS_DIR,
};

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Four-way signalized intersection simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "1000")]
    ticks: u64,

    /// Simulated seconds per tick
    #[arg(long, default_value = "0.1")]
    delta: f32,

    /// Seconds each road keeps the green
    #[arg(long, default_value_t = DEFAULT_PHASE_DURATION)]
    phase_duration: f32,

    /// Minimum gap between a vehicle and the one ahead, in pixels
    #[arg(long, default_value_t = DEFAULT_FOLLOWING_DISTANCE)]
    following_distance: f32,

    /// Directory holding the laneA.txt .. laneD.txt record files
    #[arg(long, default_value = DEFAULT_RECORDS_DIR)]
    records_dir: PathBuf,

    /// Read the record files every N ticks
    #[arg(long, default_value = "1")]
    ingest_every: u32,

    /// Maximum vehicles per lane; unbounded when omitted
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Write new records for every road every N ticks (0 = never)
    #[arg(long, default_value = "50")]
    spawn_every: u64,

    /// Records written per road each time records are spawned
    #[arg(long, default_value = "3")]
    spawn_count: usize,

    /// Seed for reproducible record generation
    #[arg(long)]
    seed: Option<u64>,

    /// Also remove turn-lane vehicles as soon as their turn completes
    #[arg(long)]
    remove_turned: bool,

    /// Print the summary and map every N ticks (0 = never)
    #[arg(long, default_value = "0")]
    map_every: u64,

    /// Sleep for the tick delta between ticks
    #[arg(long)]
    realtime: bool,
}

impl Cli {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            phase_duration: self.phase_duration,
            following_distance: self.following_distance,
            queue_capacity: self.queue_capacity,
            ingest_every_ticks: self.ingest_every,
            removal_policy: if self.remove_turned {
                RemovalPolicy::ExitFrameOrTurnComplete
            } else {
                RemovalPolicy::ExitFrame
            },
            records_dir: self.records_dir.clone(),
            ..SimConfig::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    let config = cli.sim_config();
    std::fs::create_dir_all(&config.records_dir).with_context(|| {
        format!(
            "Failed to create records directory {}",
            config.records_dir.display()
        )
    })?;

    info!(
        "Running intersection simulation: {} ticks, {}s per tick, {}s phases",
        cli.ticks, cli.delta, config.phase_duration
    );
    info!("Records directory: {}", config.records_dir.display());

    let mut generator = match cli.seed {
        Some(seed) => RecordGenerator::new_with_seed(seed),
        None => RecordGenerator::new(),
    };
    let mut world = SimWorld::new(config);

    world.run_until(cli.delta, |world| {
        if world.tick_count > 0 && cli.map_every > 0 && world.tick_count % cli.map_every == 0 {
            world.print_summary();
            world.snapshot().draw_map();
        }

        if world.tick_count >= cli.ticks {
            return false;
        }

        if cli.spawn_every > 0 && world.tick_count % cli.spawn_every == 0 {
            for road in Road::ALL {
                let path = world.config.record_path(road);
                if has_pending_records(&path) {
                    debug!("Road {} records not ingested yet, skipping spawn", road);
                    continue;
                }
                if let Err(e) =
                    generator.write_road(road, cli.spawn_count, &path, &world.config, &world.queues)
                {
                    warn!("Failed to generate records for road {}: {:#}", road, e);
                }
            }
        }

        if cli.realtime && world.tick_count > 0 {
            std::thread::sleep(std::time::Duration::from_secs_f32(cli.delta.max(0.0)));
        }
        true
    });

    world.log_stats();
    Ok(())
}
