use std::path::Path;

use crate::ai::AgentConfig;
use crate::error::ConfigError;
use crate::training::TrainerConfig;

/// Largest supported board side.
pub const MAX_BOARD_SIZE: usize = 26;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub training: TrainerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let agent = &self.agent;
        if agent.board_size == 0 || agent.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::Validation(format!(
                "agent.board_size must be in 1..={MAX_BOARD_SIZE}"
            )));
        }
        if agent.fleet.is_empty() {
            return Err(ConfigError::Validation(
                "agent.fleet must list at least one ship class".into(),
            ));
        }
        for class in &agent.fleet {
            if class.length == 0 || class.length > agent.board_size {
                return Err(ConfigError::Validation(format!(
                    "agent.fleet length {} must be in 1..={}",
                    class.length, agent.board_size
                )));
            }
            if class.count == 0 {
                return Err(ConfigError::Validation(format!(
                    "agent.fleet count for length {} must be > 0",
                    class.length
                )));
            }
        }
        let fleet_cells: usize = agent.fleet.iter().map(|c| c.length * c.count).sum();
        if fleet_cells > agent.board_size * agent.board_size {
            return Err(ConfigError::Validation(
                "agent.fleet does not fit on the board".into(),
            ));
        }

        let rewards = &agent.reinforcement;
        if !(rewards.hit_reward.is_finite() && rewards.hit_reward > 0.0) {
            return Err(ConfigError::Validation(
                "agent.reinforcement.hit_reward must be finite and > 0".into(),
            ));
        }
        if !(rewards.destroy_reward.is_finite() && rewards.destroy_reward > 0.0) {
            return Err(ConfigError::Validation(
                "agent.reinforcement.destroy_reward must be finite and > 0".into(),
            ));
        }
        if !(rewards.invalid_penalty.is_finite() && rewards.invalid_penalty < 0.0) {
            return Err(ConfigError::Validation(
                "agent.reinforcement.invalid_penalty must be finite and < 0".into(),
            ));
        }

        if self.training.num_games == 0 {
            return Err(ConfigError::Validation(
                "training.num_games must be > 0".into(),
            ));
        }
        if self.training.log_interval == 0 {
            return Err(ConfigError::Validation(
                "training.log_interval must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}
