/*
 * Crowd Flow Simulation
 *
 * This application simulates a crowd of agents with boid flocking rules
 * (separation, alignment, cohesion) in a bounded area. Ticks 7-9 and
 * 17-19 of each 24-tick cycle are peak hours, during which agents also
 * take axis-aligned random walks. Two modes are available:
 *
 *   watch   - open a window and render the simulation live
 *   export  - run headless for a fixed tick count and write one CSV row
 *             per agent per tick for downstream analysis
 */

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;
use rand::Rng;
use std::path::PathBuf;

use crowdflow::{app, CsvExporter, SimConfig, Simulation};

#[derive(Parser)]
#[command(name = "crowdflow")]
#[command(about = "Boid-based crowd flow simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a window and watch the simulation live
    Watch {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Run headless and export per-tick agent records to CSV
    Export {
        #[command(flatten)]
        config: ConfigArgs,

        /// Number of ticks to simulate
        #[arg(long, default_value_t = 200)]
        ticks: u64,

        /// Output CSV path
        #[arg(long, default_value = "crowd_data.csv")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// Number of agents in the population
    #[arg(long, default_value_t = 100)]
    agents: usize,

    /// Area width
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Area height
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Seed for the random stream (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 25.0)]
    separation_radius: f32,

    #[arg(long, default_value_t = 50.0)]
    alignment_radius: f32,

    #[arg(long, default_value_t = 100.0)]
    cohesion_radius: f32,

    /// Weight applied to the separation force
    #[arg(long, default_value_t = 1.0)]
    separation_weight: f32,

    /// Weight applied to the alignment force
    #[arg(long, default_value_t = 1.0)]
    alignment_weight: f32,

    /// Weight applied to the cohesion force
    #[arg(long, default_value_t = 1.0)]
    cohesion_weight: f32,

    /// Maximum agent speed per tick
    #[arg(long, default_value_t = 2.0)]
    max_speed: f32,

    /// Maximum steering force per rule per tick
    #[arg(long, default_value_t = 0.05)]
    max_force: f32,
}

impl ConfigArgs {
    fn into_config(self) -> SimConfig {
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());
        SimConfig {
            num_agents: self.agents,
            width: self.width,
            height: self.height,
            separation_radius: self.separation_radius,
            alignment_radius: self.alignment_radius,
            cohesion_radius: self.cohesion_radius,
            separation_weight: self.separation_weight,
            alignment_weight: self.alignment_weight,
            cohesion_weight: self.cohesion_weight,
            max_speed: self.max_speed,
            max_force: self.max_force,
            seed,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch { config } => {
            let config = config.into_config();
            config.validate()?;
            info!("starting interactive mode with seed {}", config.seed);
            app::run(config);
        }
        Commands::Export { config, ticks, out } => {
            let config = config.into_config();
            config.validate()?;

            let mut sim = Simulation::new(config)?;
            info!("starting batch export with seed {}", sim.config().seed);

            let mut exporter = CsvExporter::from_path(&out)?;
            sim.run(ticks, &mut exporter)?;

            info!(
                "wrote {} records to {}",
                sim.config().num_agents as u64 * ticks,
                out.display()
            );
        }
    }

    Ok(())
}
