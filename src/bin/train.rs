use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use broadside::ai::TargetingAgent;
use broadside::config::AppConfig;
use broadside::training::Trainer;

/// Train the targeting agent's value map against simulated fleets.
#[derive(Parser)]
#[command(name = "train", about = "Train the targeting agent via simulated games")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of training games
    #[arg(long)]
    games: Option<usize>,

    /// Seed both the agent and the fleet layouts
    #[arg(long)]
    seed: Option<u64>,

    /// Override the reinforcement store path
    #[arg(long)]
    store: Option<PathBuf>,

    /// Play without consulting or updating the value map
    #[arg(long)]
    no_learning: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml().context("serializing default config")?);
        return Ok(());
    }

    // Load configuration
    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(games) = cli.games {
        app_config.training.num_games = games;
    }
    if let Some(seed) = cli.seed {
        app_config.agent.seed = Some(seed);
        app_config.training.seed = Some(seed.wrapping_add(1));
    }
    if let Some(store) = cli.store {
        app_config.agent.reinforcement.path = store;
    }
    if cli.no_learning {
        app_config.agent.hunt.reinforcement_enabled = false;
    }
    app_config.validate().context("validating configuration")?;

    let mut agent = TargetingAgent::new(app_config.agent.clone());
    let mut trainer = Trainer::new(app_config.training.clone());
    let metrics = trainer.train(&mut agent).context("training")?;

    tracing::info!(
        "Average shots over the last {} games: {:.1}",
        app_config.training.log_interval,
        metrics.average_shots(app_config.training.log_interval)
    );
    Ok(())
}
