use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::game::{Coord, OccupancyGrid};

use super::backend::{MemoryStore, StoredValues, ValueStore};
use super::map::ReinforcementMap;

/// Where the value map lives and how much each shot outcome is worth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReinforcementConfig {
    pub path: PathBuf,
    pub hit_reward: f64,
    pub destroy_reward: f64,
    /// Applied at the last shot when the driver sends an unknown token.
    pub invalid_penalty: f64,
}

impl Default for ReinforcementConfig {
    fn default() -> Self {
        ReinforcementConfig {
            path: PathBuf::from("reinforcement.json"),
            hit_reward: 1.0,
            destroy_reward: 5.0,
            invalid_penalty: -0.5,
        }
    }
}

/// Cross-session reward map plus the backend it is persisted to.
pub struct ReinforcementStore {
    map: ReinforcementMap,
    backend: Box<dyn ValueStore>,
    rewards_applied: u64,
}

impl ReinforcementStore {
    /// Load the map from `backend`. A missing, unreadable, malformed or
    /// wrongly sized document yields an all-zero map.
    pub fn load(size: usize, backend: Box<dyn ValueStore>) -> Self {
        let (map, rewards_applied) = match Self::read(size, backend.as_ref()) {
            Ok(Some(loaded)) => loaded,
            Ok(None) => {
                tracing::debug!("no stored values at {}, starting from zero", backend.describe());
                (ReinforcementMap::zeros(size), 0)
            }
            Err(e) => {
                tracing::warn!(
                    "ignoring stored values at {}: {}; starting from zero",
                    backend.describe(),
                    e
                );
                (ReinforcementMap::zeros(size), 0)
            }
        };
        ReinforcementStore {
            map,
            backend,
            rewards_applied,
        }
    }

    /// Store backed by a fresh [`MemoryStore`].
    pub fn in_memory(size: usize) -> Self {
        Self::load(size, Box::new(MemoryStore::new()))
    }

    fn read(
        size: usize,
        backend: &dyn ValueStore,
    ) -> Result<Option<(ReinforcementMap, u64)>, StoreError> {
        let Some(stored) = backend.load()? else {
            return Ok(None);
        };
        let found = stored.values.len();
        let map = ReinforcementMap::from_rows(stored.values)
            .filter(|m| m.size() == size && stored.board_size == size)
            .ok_or(StoreError::DimensionMismatch {
                expected: size,
                found,
            })?;
        Ok(Some((map, stored.rewards_applied)))
    }

    /// Apply `value` at `coord` with neighborhood spillover. Not persisted
    /// until [`ReinforcementStore::save`].
    pub fn reward(&mut self, coord: Coord, value: f64) {
        self.map.reward(coord, value);
        self.rewards_applied += 1;
    }

    /// Write the full map to the backend. Blocking.
    pub fn save(&self) -> Result<(), StoreError> {
        let updated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.backend.save(&StoredValues {
            board_size: self.map.size(),
            updated_at,
            rewards_applied: self.rewards_applied,
            values: self.map.to_rows(),
        })
    }

    /// Available cells holding the highest learned value, with that value.
    pub fn best_candidates(&self, occupancy: &OccupancyGrid) -> Option<(f64, Vec<Coord>)> {
        self.map.best_candidates(occupancy)
    }

    pub fn map(&self) -> &ReinforcementMap {
        &self.map
    }

    pub fn rewards_applied(&self) -> u64 {
        self.rewards_applied
    }

    /// Zero the in-memory map. The backend keeps its copy until the next save.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
