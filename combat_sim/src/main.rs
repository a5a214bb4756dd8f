//! combat_sim - run a scenario and print the summary

use clap::Parser;
use combat_core::config::{default_skills, load_skill_configs};
use combat_core::{CombatConstants, CombatSession, ConfigError};
use combat_sim::{default_scenario, ScenarioConfig, Simulation};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Headless combat simulation
#[derive(Parser)]
#[command(name = "combat_sim")]
#[command(about = "Drive the combat core against a simulated hostile field", long_about = None)]
#[command(version)]
struct Args {
    /// Scenario TOML (defaults to the embedded scenario)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Combat constants TOML
    #[arg(long)]
    constants: Option<PathBuf>,

    /// Skill catalog TOML
    #[arg(long)]
    skills: Option<PathBuf>,

    /// Override the scenario duration in seconds
    #[arg(long)]
    seconds: Option<u64>,

    /// RNG seed for a reproducible run
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn load(args: &Args) -> Result<(ScenarioConfig, CombatSession), ConfigError> {
    let mut scenario = match &args.scenario {
        Some(path) => ScenarioConfig::load(path)?,
        None => default_scenario(),
    };
    if let Some(seconds) = args.seconds {
        scenario.duration_ms = seconds * 1000;
    }
    let constants = match &args.constants {
        Some(path) => CombatConstants::load(path)?,
        None => CombatConstants::default(),
    };
    let catalog = match &args.skills {
        Some(path) => load_skill_configs(path)?,
        None => default_skills(),
    };
    Ok((scenario, CombatSession::new(constants, catalog)))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let (scenario, session) = match load(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut simulation = Simulation::new(scenario, session);
    let summary = simulation.run(&mut rng);

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("failed to encode summary: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", summary.summary());
    }
    ExitCode::SUCCESS
}
