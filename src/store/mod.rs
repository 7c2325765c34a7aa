//! Persisted reinforcement signal: the per-cell value map, its spillover
//! update rule, and the storage backends it is saved to.

mod backend;
mod map;
mod reinforcement;

pub use backend::{JsonFileStore, MemoryStore, StoredValues, ValueStore};
pub use map::ReinforcementMap;
pub use reinforcement::{ReinforcementConfig, ReinforcementStore};
