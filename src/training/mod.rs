//! Self-play training: a simulated opponent fleet, the game loop that drives
//! the agent with shot outcomes, and rolling metrics.

pub mod episode;
pub mod metrics;
pub mod opponent;
pub mod trainer;

pub use episode::{play_game, GameReport};
pub use metrics::GameMetrics;
pub use opponent::{OpponentFleet, ShotResult};
pub use trainer::{Trainer, TrainerConfig};
