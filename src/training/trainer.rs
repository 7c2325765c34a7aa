use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ai::TargetingAgent;
use crate::error::TrainingError;
use crate::training::episode::{play_game, GameReport};
use crate::training::metrics::GameMetrics;
use crate::training::opponent::OpponentFleet;

/// Trainer configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub num_games: usize,
    pub log_interval: usize,
    /// Hard stop per game; 0 means the board area.
    pub max_shots_per_game: usize,
    /// Seed for opponent fleet layouts; OS entropy when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_games: 1_000,
            log_interval: 100,
            max_shots_per_game: 0,
            seed: None,
        }
    }
}

/// Plays the agent against randomly placed fleets so that its value map
/// accumulates experience.
pub struct Trainer {
    config: TrainerConfig,
    rng: StdRng,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Trainer { config, rng }
    }

    /// Run the full training loop.
    pub fn train(&mut self, agent: &mut TargetingAgent) -> Result<GameMetrics, TrainingError> {
        let mut metrics = GameMetrics::with_capacity(self.config.log_interval.max(1));
        let board_size = agent.config().board_size;

        tracing::info!(
            "Starting training for {} games on a {}x{} board (hunt chain: {})",
            self.config.num_games,
            board_size,
            board_size,
            agent.hunt_strategies().join(" -> ")
        );

        for game in 1..=self.config.num_games {
            let report = self.play_one(agent)?;
            metrics.record_game(report);

            if game % self.config.log_interval == 0 {
                let window = self.config.log_interval;
                tracing::info!(
                    "Game {}/{} | avg shots({}): {:.1} | win rate: {:.1}% | best: {} | worst: {}",
                    game,
                    self.config.num_games,
                    window,
                    metrics.average_shots(window),
                    metrics.win_rate(window) * 100.0,
                    fmt_shots(metrics.best_game()),
                    fmt_shots(metrics.worst_game()),
                );
            }
        }

        tracing::info!(
            "Training complete. Total games: {} | board resets: {} | persistence failures: {}",
            metrics.total_games(),
            agent.resets(),
            agent.persistence_failures()
        );
        Ok(metrics)
    }

    /// Play a single game against a freshly placed fleet.
    pub fn play_one(&mut self, agent: &mut TargetingAgent) -> Result<GameReport, TrainingError> {
        let config = agent.config();
        let size = config.board_size;
        let mut fleet = OpponentFleet::random(size, &config.fleet, &mut self.rng)
            .ok_or(TrainingError::FleetPlacement { size })?;
        let max_shots = match self.config.max_shots_per_game {
            0 => size * size,
            n => n,
        };
        play_game(agent, &mut fleet, max_shots)
    }
}

fn fmt_shots(shots: Option<usize>) -> String {
    shots.map_or_else(|| "-".to_string(), |s| s.to_string())
}
