//! Alliance selection CLI
//!
//! Runs the engine against a team-pool JSON file (an array of team
//! snapshots) and prints contract-shaped JSON to stdout.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ad_core::{
    AllianceOptimizer, AllianceWeights, ComplementFinder, DraftSession, OptimizerConfig, Team,
};

#[derive(Parser)]
#[command(name = "ad_cli")]
#[command(about = "Score, partition, and draft event team pools", long_about = None)]
struct Cli {
    /// Input JSON file: an array of team snapshots
    #[arg(long, global = true, default_value = "teams.json")]
    teams: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition the pool into ranked alliances
    Optimize {
        /// Teams per alliance
        #[arg(long, default_value_t = 3)]
        size: usize,

        /// Number of alliances (default: min(8, pool / size))
        #[arg(long)]
        count: Option<usize>,
    },

    /// Simulate a full snake draft with automatic picks
    Draft {
        /// Picks per alliance after the captain seed
        #[arg(long, default_value_t = 2)]
        rounds: u32,
    },

    /// Rank complement candidates for a target team
    Complements {
        /// Target team key (e.g. frc254)
        #[arg(long)]
        team: String,

        /// Number of candidates to print
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn load_pool(path: &PathBuf) -> Result<Vec<Team>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read team file {}", path.display()))?;
    let pool: Vec<Team> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse team file {}", path.display()))?;
    Ok(pool)
}

fn event_key_of(pool: &[Team]) -> String {
    pool.first().map(|t| t.event_key.clone()).unwrap_or_default()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let pool = load_pool(&cli.teams)?;

    match cli.command {
        Commands::Optimize { size, count } => {
            let config = OptimizerConfig { alliance_size: size, alliance_count: count };
            let optimizer = AllianceOptimizer::with_config(AllianceWeights::default(), config)?;
            let alliances = optimizer.compute(&pool)?;
            let output = serde_json::json!({
                "event_key": event_key_of(&pool),
                "alliances": alliances,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Draft { rounds } => {
            let mut session = DraftSession::new(event_key_of(&pool), &pool, rounds)?;
            session.auto_complete()?;
            println!("{}", serde_json::to_string_pretty(&session.to_snapshot())?);
        }

        Commands::Complements { team, top } => {
            let target = pool
                .iter()
                .find(|t| t.team_key == team)
                .with_context(|| format!("team {team} not found in {}", cli.teams.display()))?
                .clone();
            let finder = ComplementFinder::default().with_top_n(top);
            let complements = finder.find(&target, &pool)?;
            let output = serde_json::json!({
                "target_team": target,
                "complements": complements,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
