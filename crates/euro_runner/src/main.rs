//! Euro Runner CLI
//!
//! Domestic seasons → qualification → Champions League / Europa League

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use euro_runner::{Competition, RunOptions, SeasonOutcome};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "euro-runner")]
#[command(about = "Simulate domestic leagues and continental cups", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Simulate a season from a JSON data directory
    Run {
        /// Directory holding leagues.json, clubs, players and managers
        #[arg(long)]
        data: PathBuf,

        /// Competitions to play after the domestic seasons
        #[arg(long, value_enum, default_value = "both")]
        competition: Competition,

        /// Random seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Engine configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory for CSV / JSON exports
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Simulate a season with generated clubs and players
    Demo {
        /// Number of clubs to generate
        #[arg(long, default_value = "36")]
        teams: usize,

        /// Random seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Directory for CSV / JSON exports
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Run {
            data,
            competition,
            seed,
            config,
            out,
        } => {
            let config = match config {
                Some(path) => euro_runner::load_config(&path)?,
                None => euro_core::EngineConfig::default(),
            };
            let seed = seed.unwrap_or_else(rand::random);
            println!("🔨 Loading data...");
            println!("   Data: {}", data.display());
            println!("   Seed: {}", seed);

            let dataset = euro_runner::load_dataset(&data, &config.strength)?;
            println!(
                "   {} leagues, {} clubs, {} players, {} managers",
                dataset.leagues.len(),
                dataset.teams.len(),
                dataset.players.len(),
                dataset.managers.len()
            );

            let outcome = euro_runner::simulate_season(
                &dataset,
                &RunOptions {
                    competition,
                    seed,
                    config,
                },
            )?;
            finish(&outcome, out)?;
        }

        Commands::Demo { teams, seed, out } => {
            let seed = seed.unwrap_or_else(rand::random);
            println!("🔨 Generating {} clubs (seed {})...", teams, seed);
            let dataset = euro_core::demo::synthetic_dataset(teams, seed)?;
            let outcome = euro_runner::simulate_season(
                &dataset,
                &RunOptions {
                    competition: Competition::Ucl,
                    seed,
                    config: euro_core::EngineConfig::default(),
                },
            )?;
            finish(&outcome, out)?;
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn finish(outcome: &SeasonOutcome, out: Option<PathBuf>) -> Result<()> {
    for season in &outcome.domestic {
        euro_runner::report::print_domestic(season);
    }
    for report in &outcome.tournaments {
        euro_runner::report::print_tournament(report);
    }

    if let Some(dir) = out {
        let summary = euro_runner::export_season(&dir, outcome)?;
        println!("\n📄 Wrote {} files to {}", summary.files.len(), dir.display());
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("euro-runner CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
