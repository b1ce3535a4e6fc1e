//! Relay Planner - command line entry point
//!
//! Reads planning requests as JSON, writes plans and reports as JSON on
//! stdout. Diagnostics go to stderr through tracing.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use relay_planner::core::error::Result;
use relay_planner::core::PlannerConfig;
use relay_planner::network::reroute;
use relay_planner::planning::{PlanReport, Planner, PlanningRequest, Tower};
use relay_planner::weather::{clock_stamp, SessionStore};

/// Relay tower coverage planner
#[derive(Parser, Debug)]
#[command(name = "relay-planner")]
#[command(about = "Plan relay tower placement over service areas")]
struct Args {
    /// Planner config (TOML); defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan towers for a request file ("-" reads stdin)
    Plan {
        /// Planning request JSON
        request: PathBuf,

        /// Random seed for the fill phase; random when omitted
        #[arg(long)]
        seed: Option<u64>,

        /// Output format: json or text
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Link the nearest surviving tower to a failed one
    Reroute {
        /// JSON with a "towers" array (a plan report works)
        towers: PathBuf,

        /// Id of the failed tower, e.g. TWR-02
        #[arg(long)]
        dead: String,
    },
    /// Weather resilience and QoS policy for a village
    Weather {
        #[arg(long, default_value = "chitkul")]
        village: String,

        /// Deployed technology name
        #[arg(long, default_value = "Satellite")]
        tech: String,

        /// Simulate a disaster for this village
        #[arg(long)]
        simulate: bool,

        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Deserialize)]
struct TowerSet {
    towers: Vec<Tower>,
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("relay_planner=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };

    match args.command {
        Command::Plan {
            request,
            seed,
            format,
        } => {
            let request: PlanningRequest = serde_json::from_str(&read_input(&request)?)?;
            let seed = seed.unwrap_or_else(rand::random);
            tracing::info!(
                "Planning {} areas, {} critical points (terrain '{}', seed {})",
                request.polygons.len(),
                request.critical_nodes.len(),
                request.terrain_type,
                seed
            );

            let planner = Planner::new(config)?;
            let plan = planner.plan_seeded(&request, seed);
            let report = PlanReport::build(&plan, planner.config());

            if format == "text" {
                println!("{}", report.summary());
                for line in &report.logs {
                    println!("  {}", line);
                }
            } else {
                println!("{}", report.to_json());
            }
        }
        Command::Reroute { towers, dead } => {
            let set: TowerSet = serde_json::from_str(&read_input(&towers)?)?;
            let outcome = reroute(&set.towers, &dead)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Weather {
            village,
            tech,
            simulate,
            seed,
        } => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.unwrap_or_else(rand::random));
            let mut sessions = SessionStore::new();
            if simulate {
                sessions.start_simulation("cli", &village);
            }
            let stamp = clock_stamp(&chrono::Local::now());
            let report = sessions.check("cli", &village, &tech, &mut rng, &stamp);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
