use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::game::{
    standard_fleet, Coord, Notification, OccupancyGrid, ShipClass, ShipInventory,
    DEFAULT_BOARD_SIZE,
};
use crate::store::{JsonFileStore, ReinforcementConfig, ReinforcementStore};

use super::follow_up::TargetFollowUp;
use super::hunt::{HuntChain, HuntConfig, HuntContext};

/// Agent configuration, loadable from the `[agent]` TOML section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub board_size: usize,
    /// Fixed RNG seed for reproducible play; OS entropy when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub fleet: Vec<ShipClass>,
    pub hunt: HuntConfig,
    pub reinforcement: ReinforcementConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            board_size: DEFAULT_BOARD_SIZE,
            seed: None,
            fleet: standard_fleet(),
            hunt: HuntConfig::default(),
            reinforcement: ReinforcementConfig::default(),
        }
    }
}

/// Hunt: searching for any ship. Target: finishing off a damaged one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Hunt,
    Target,
}

/// Hunt/target state machine that turns shot outcomes into the next shot.
///
/// Not safe for concurrent use; callers serialize access per instance.
pub struct TargetingAgent {
    config: AgentConfig,
    occupancy: OccupancyGrid,
    inventory: ShipInventory,
    hunt: HuntChain,
    reinforcement: Option<ReinforcementStore>,
    mode: Mode,
    hits: Vec<Coord>,
    last_shot: Option<Coord>,
    rng: StdRng,
    shots: usize,
    resets: usize,
    persistence_failures: usize,
}

impl TargetingAgent {
    /// Build an agent whose value map is persisted as JSON at
    /// `config.reinforcement.path` (when reinforcement is enabled).
    pub fn new(config: AgentConfig) -> Self {
        let store = config.hunt.reinforcement_enabled.then(|| {
            ReinforcementStore::load(
                config.board_size,
                Box::new(JsonFileStore::new(&config.reinforcement.path)),
            )
        });
        Self::with_store(config, store)
    }

    /// Build an agent around an already loaded store, or none at all.
    pub fn with_store(config: AgentConfig, reinforcement: Option<ReinforcementStore>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        TargetingAgent {
            occupancy: OccupancyGrid::new(config.board_size),
            inventory: ShipInventory::from_fleet(&config.fleet),
            hunt: HuntChain::from_config(&config.hunt),
            reinforcement,
            mode: Mode::Hunt,
            hits: Vec::new(),
            last_shot: None,
            rng,
            shots: 0,
            resets: 0,
            persistence_failures: 0,
            config,
        }
    }

    /// Process the outcome of the previous shot and return the next one.
    pub fn next_move(&mut self, notification: Notification) -> Result<Coord, AgentError> {
        self.observe(notification)?;
        match self.mode {
            Mode::Hunt => self.hunt_shot(),
            Mode::Target => self.follow_up_shot(),
        }
    }

    /// Apply the outcome of the previous shot without choosing another one.
    /// Used for the final shot of a game, where selecting again could
    /// exhaust the board.
    pub fn observe(&mut self, notification: Notification) -> Result<(), AgentError> {
        match notification {
            Notification::RequestShot => {}
            Notification::Hit => {
                let shot = self.require_last_shot(notification)?;
                self.record_hit(shot);
                self.grant(shot, self.config.reinforcement.hit_reward);
                self.mode = Mode::Target;
            }
            Notification::Destroyed => {
                let shot = self.require_last_shot(notification)?;
                self.record_hit(shot);
                self.grant(shot, self.config.reinforcement.destroy_reward);
                self.sink_current_ship();
                self.mode = Mode::Hunt;
            }
        }
        Ok(())
    }

    /// Like [`TargetingAgent::next_move`], but from a raw driver token. An
    /// unknown token penalizes the last shot and is reported as
    /// [`AgentError::InvalidNotification`]; the agent state is unchanged.
    pub fn respond(&mut self, token: &str) -> Result<Coord, AgentError> {
        match token.parse::<Notification>() {
            Ok(notification) => self.next_move(notification),
            Err(e) => {
                if let Some(shot) = self.last_shot {
                    self.grant(shot, self.config.reinforcement.invalid_penalty);
                }
                Err(e)
            }
        }
    }

    /// Start a new game against a fresh fleet. The learned value map is kept.
    pub fn new_game(&mut self) {
        self.occupancy = OccupancyGrid::new(self.config.board_size);
        self.inventory = ShipInventory::from_fleet(&self.config.fleet);
        self.mode = Mode::Hunt;
        self.hits.clear();
        self.last_shot = None;
        self.shots = 0;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Hits on the ship currently being pursued, in the order they landed.
    pub fn hits(&self) -> &[Coord] {
        &self.hits
    }

    pub fn last_shot(&self) -> Option<Coord> {
        self.last_shot
    }

    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    pub fn inventory(&self) -> &ShipInventory {
        &self.inventory
    }

    pub fn reinforcement(&self) -> Option<&ReinforcementStore> {
        self.reinforcement.as_ref()
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn hunt_strategies(&self) -> Vec<&'static str> {
        self.hunt.names()
    }

    /// Shots fired in the current game.
    pub fn shots(&self) -> usize {
        self.shots
    }

    /// Times the board was reset after running out of untried cells.
    pub fn resets(&self) -> usize {
        self.resets
    }

    pub fn persistence_failures(&self) -> usize {
        self.persistence_failures
    }

    fn require_last_shot(&self, notification: Notification) -> Result<Coord, AgentError> {
        self.last_shot.ok_or_else(|| {
            AgentError::InvalidNotification(format!(
                "'{notification}' received before any shot was fired"
            ))
        })
    }

    fn record_hit(&mut self, shot: Coord) {
        if !self.hits.contains(&shot) {
            self.hits.push(shot);
        }
    }

    /// Reward `coord` and persist. A failed write is logged and counted but
    /// never aborts the move.
    fn grant(&mut self, coord: Coord, value: f64) {
        let Some(store) = self.reinforcement.as_mut() else {
            return;
        };
        store.reward(coord, value);
        if let Err(e) = store.save() {
            self.persistence_failures += 1;
            tracing::warn!("failed to persist reinforcement values: {}", e);
        }
    }

    /// Exclude the ring around every cell of the sunk ship, update the
    /// inventory and forget the hit list.
    fn sink_current_ship(&mut self) {
        let size = self.config.board_size;
        for hit in &self.hits {
            for cell in hit.surrounding(size) {
                self.occupancy.mark(cell);
            }
        }

        let length = self.hits.len();
        match self.inventory.record_sunk(length) {
            Some(l) if l == length => {
                tracing::debug!("sunk {}-cell ship at {:?}", length, self.hits)
            }
            Some(l) => tracing::warn!(
                "sunk {}-cell ship at {:?} but none of that length remained; counted as length {}",
                length,
                self.hits,
                l
            ),
            None => tracing::warn!(
                "sunk {}-cell ship at {:?} with an empty inventory",
                length,
                self.hits
            ),
        }
        self.hits.clear();
    }

    fn hunt_shot(&mut self) -> Result<Coord, AgentError> {
        let coord = match self.pick_hunt() {
            Some(c) => c,
            None => {
                self.recover_exhausted_board();
                self.pick_hunt().ok_or(AgentError::ExhaustedBoard {
                    size: self.config.board_size,
                })?
            }
        };
        Ok(self.fire(coord))
    }

    fn pick_hunt(&mut self) -> Option<Coord> {
        let ctx = HuntContext {
            occupancy: &self.occupancy,
            inventory: &self.inventory,
            reinforcement: self.reinforcement.as_ref(),
        };
        let (coord, strategy) = self.hunt.select(&ctx, &mut self.rng)?;
        tracing::debug!("hunt: {} picked {}", strategy, coord);
        Some(coord)
    }

    fn follow_up_shot(&mut self) -> Result<Coord, AgentError> {
        let coord = match self.pick_follow_up() {
            Some(c) => c,
            None => {
                self.recover_exhausted_board();
                self.pick_follow_up().ok_or(AgentError::ExhaustedBoard {
                    size: self.config.board_size,
                })?
            }
        };
        Ok(self.fire(coord))
    }

    fn pick_follow_up(&mut self) -> Option<Coord> {
        TargetFollowUp::new(&self.hits, &self.occupancy).next_coordinate(&mut self.rng)
    }

    fn recover_exhausted_board(&mut self) {
        tracing::warn!(
            "no untried cell left after {} shots ({:?} mode); resetting the board",
            self.shots,
            self.mode
        );
        self.occupancy.reset();
        if let Some(store) = self.reinforcement.as_mut() {
            store.clear();
        }
        self.resets += 1;
    }

    fn fire(&mut self, coord: Coord) -> Coord {
        debug_assert!(self.occupancy.is_available(coord), "{coord} fired twice");
        self.occupancy.mark(coord);
        self.last_shot = Some(coord);
        self.shots += 1;
        coord
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::error::StoreError;
    use crate::store::{MemoryStore, ReinforcementMap, StoredValues, ValueStore};

    fn config(fleet: Vec<ShipClass>, reinforcement_enabled: bool) -> AgentConfig {
        AgentConfig {
            seed: Some(42),
            fleet,
            hunt: HuntConfig {
                reinforcement_enabled,
                ..HuntConfig::default()
            },
            ..AgentConfig::default()
        }
    }

    fn plain_agent() -> TargetingAgent {
        TargetingAgent::with_store(config(standard_fleet(), false), None)
    }

    fn learning_agent() -> TargetingAgent {
        TargetingAgent::with_store(
            config(standard_fleet(), true),
            Some(ReinforcementStore::in_memory(DEFAULT_BOARD_SIZE)),
        )
    }

    struct FailingStore;

    impl ValueStore for FailingStore {
        fn load(&self) -> Result<Option<StoredValues>, StoreError> {
            Ok(None)
        }

        fn save(&self, _values: &StoredValues) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    #[test]
    fn test_starts_in_hunt_mode() {
        let agent = plain_agent();
        assert_eq!(agent.mode(), Mode::Hunt);
        assert!(agent.hits().is_empty());
        assert_eq!(agent.last_shot(), None);
    }

    #[test]
    fn test_no_duplicate_shots_until_board_is_exhausted() {
        let mut agent = plain_agent();
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let shot = agent.next_move(Notification::RequestShot).unwrap();
            assert!(shot.col < 10 && shot.row < 10);
            assert!(seen.insert(shot), "{shot} fired twice");
        }
        assert_eq!(agent.resets(), 0);

        agent.next_move(Notification::RequestShot).unwrap();
        assert_eq!(agent.resets(), 1);
    }

    #[test]
    fn test_hit_enters_target_mode_and_follows_up() {
        let mut agent = plain_agent();
        let first = agent.next_move(Notification::RequestShot).unwrap();
        let next = agent.next_move(Notification::Hit).unwrap();

        assert_eq!(agent.mode(), Mode::Target);
        assert_eq!(agent.hits(), &[first]);
        assert_eq!(next.manhattan(first), 1);
    }

    #[test]
    fn test_miss_in_target_mode_keeps_pursuing() {
        let mut agent = plain_agent();
        let first = agent.next_move(Notification::RequestShot).unwrap();
        agent.next_move(Notification::Hit).unwrap();
        let retry = agent.next_move(Notification::RequestShot).unwrap();

        assert_eq!(agent.mode(), Mode::Target);
        assert_eq!(agent.hits(), &[first]);
        assert_eq!(retry.manhattan(first), 1);
    }

    #[test]
    fn test_single_cell_ship_scenario() {
        let mut agent = TargetingAgent::with_store(config(vec![ShipClass::new(1, 1)], false), None);
        let ship = agent.next_move(Notification::RequestShot).unwrap();

        agent.next_move(Notification::Hit).unwrap();
        assert_eq!(agent.mode(), Mode::Target);
        assert_eq!(agent.hits(), &[ship]);

        agent.next_move(Notification::Destroyed).unwrap();
        assert_eq!(agent.mode(), Mode::Hunt);
        assert!(agent.hits().is_empty());
        assert_eq!(agent.inventory().count(1), 0);
        for cell in ship.surrounding(10) {
            assert!(agent.occupancy().is_marked(cell), "{cell} not excluded");
        }
    }

    #[test]
    fn test_destroyed_straight_from_hunt() {
        let mut agent = plain_agent();
        let ship = agent.next_move(Notification::RequestShot).unwrap();
        agent.next_move(Notification::Destroyed).unwrap();

        assert_eq!(agent.mode(), Mode::Hunt);
        assert_eq!(agent.inventory().count(1), 3);
        assert!(ship.surrounding(10).all(|c| agent.occupancy().is_marked(c)));
    }

    #[test]
    fn test_destroying_three_decker_updates_inventory() {
        let mut agent = plain_agent();
        agent.next_move(Notification::RequestShot).unwrap();
        agent.next_move(Notification::Hit).unwrap();
        agent.next_move(Notification::Hit).unwrap();
        agent.next_move(Notification::Destroyed).unwrap();

        assert_eq!(agent.inventory().count(3), 1);
        assert_eq!(agent.inventory().count(4), 1);
        assert_eq!(agent.inventory().remaining_ships(), 9);
    }

    #[test]
    fn test_hunt_never_fires_next_to_sunk_ship() {
        let mut agent = plain_agent();
        agent.next_move(Notification::RequestShot).unwrap();
        agent.next_move(Notification::Hit).unwrap();
        let last = agent.last_shot().unwrap();
        let mut sunk = agent.hits().to_vec();
        sunk.push(last);
        agent.next_move(Notification::Destroyed).unwrap();

        let excluded: HashSet<Coord> = sunk
            .iter()
            .flat_map(|c| c.surrounding(10).chain(std::iter::once(*c)))
            .collect();
        let mut shot = agent.last_shot().unwrap();
        for _ in 0..(100 - excluded.len() - 1) {
            assert!(!excluded.contains(&shot), "{shot} touches the sunk ship");
            shot = agent.next_move(Notification::RequestShot).unwrap();
        }
        assert_eq!(agent.resets(), 0);
    }

    #[test]
    fn test_unknown_token_is_reported_and_penalized() {
        let mut agent = learning_agent();
        let shot = agent.next_move(Notification::RequestShot).unwrap();
        let before = agent.reinforcement().unwrap().map().value(shot);

        let err = agent.respond("fire!").unwrap_err();
        assert!(matches!(err, AgentError::InvalidNotification(_)));
        assert_eq!(agent.mode(), Mode::Hunt);
        assert_eq!(agent.last_shot(), Some(shot));
        assert!(agent.reinforcement().unwrap().map().value(shot) < before);
    }

    #[test]
    fn test_respond_parses_driver_tokens() {
        let mut agent = plain_agent();
        let first = agent.respond("shoot").unwrap();
        agent.respond("hit").unwrap();
        assert_eq!(agent.hits(), &[first]);
    }

    #[test]
    fn test_hit_before_any_shot_is_invalid() {
        let mut agent = plain_agent();
        let err = agent.next_move(Notification::Hit).unwrap_err();
        assert!(matches!(err, AgentError::InvalidNotification(_)));
        assert_eq!(agent.mode(), Mode::Hunt);
    }

    #[test]
    fn test_hit_reward_spills_to_neighbors() {
        let mut agent = learning_agent();
        let shot = agent.next_move(Notification::RequestShot).unwrap();
        agent.next_move(Notification::Hit).unwrap();

        let map = agent.reinforcement().unwrap().map();
        let direct = map.value(shot);
        assert!(direct > 0.0);
        for n in shot.surrounding(10) {
            assert!(map.value(n) > 0.0 && map.value(n) < direct);
        }
    }

    #[test]
    fn test_rewards_are_saved_after_each_event() {
        let backend = MemoryStore::new();
        let store = ReinforcementStore::load(10, Box::new(backend.clone()));
        let mut agent = TargetingAgent::with_store(config(standard_fleet(), true), Some(store));

        agent.next_move(Notification::RequestShot).unwrap();
        assert!(backend.snapshot().is_none());
        agent.next_move(Notification::Hit).unwrap();
        assert_eq!(backend.snapshot().unwrap().rewards_applied, 1);
        agent.next_move(Notification::Destroyed).unwrap();
        assert_eq!(backend.snapshot().unwrap().rewards_applied, 2);
    }

    #[test]
    fn test_save_failure_does_not_block_the_move() {
        let store = ReinforcementStore::load(10, Box::new(FailingStore));
        let mut agent = TargetingAgent::with_store(config(standard_fleet(), true), Some(store));

        let first = agent.next_move(Notification::RequestShot).unwrap();
        let next = agent.next_move(Notification::Hit).unwrap();
        assert_eq!(next.manhattan(first), 1);
        assert_eq!(agent.persistence_failures(), 1);
    }

    #[test]
    fn test_same_seed_same_shots() {
        let mut a = plain_agent();
        let mut b = plain_agent();
        for _ in 0..30 {
            assert_eq!(
                a.next_move(Notification::RequestShot).unwrap(),
                b.next_move(Notification::RequestShot).unwrap()
            );
        }
    }

    #[test]
    fn test_new_game_keeps_learned_values() {
        let mut agent = learning_agent();
        let shot = agent.next_move(Notification::RequestShot).unwrap();
        agent.next_move(Notification::Hit).unwrap();
        agent.new_game();

        assert_eq!(agent.mode(), Mode::Hunt);
        assert_eq!(agent.shots(), 0);
        assert_eq!(agent.occupancy().marked_count(), 0);
        assert_eq!(agent.inventory().remaining_ships(), 10);
        assert!(agent.reinforcement().unwrap().map().value(shot) > 0.0);

        // The learned hotspot is the first thing tried next game.
        assert_eq!(agent.next_move(Notification::RequestShot).unwrap(), shot);
    }

    #[test]
    fn test_observe_applies_outcome_without_firing() {
        let mut agent = plain_agent();
        let ship = agent.next_move(Notification::RequestShot).unwrap();
        agent.observe(Notification::Destroyed).unwrap();

        assert_eq!(agent.shots(), 1);
        assert_eq!(agent.last_shot(), Some(ship));
        assert_eq!(agent.mode(), Mode::Hunt);
        assert_eq!(agent.inventory().count(1), 3);
        assert!(ship.surrounding(10).all(|c| agent.occupancy().is_marked(c)));
    }

    #[test]
    fn test_exhausted_board_clears_in_memory_values_and_retries() {
        let backend = MemoryStore::new();
        let store = ReinforcementStore::load(2, Box::new(backend.clone()));
        let config = AgentConfig {
            board_size: 2,
            ..config(vec![ShipClass::new(2, 1)], true)
        };
        let mut agent = TargetingAgent::with_store(config, Some(store));

        let first = agent.next_move(Notification::RequestShot).unwrap();
        agent.next_move(Notification::Hit).unwrap();
        agent.next_move(Notification::RequestShot).unwrap();
        agent.next_move(Notification::RequestShot).unwrap();
        assert!(agent.occupancy().is_exhausted());

        let retry = agent.next_move(Notification::RequestShot).unwrap();
        assert_eq!(agent.resets(), 1);
        assert_eq!(agent.mode(), Mode::Target);
        assert_eq!(retry.manhattan(first), 1);
        assert_eq!(agent.occupancy().marked_count(), 1);
        assert_eq!(
            agent.reinforcement().unwrap().map(),
            &ReinforcementMap::zeros(2)
        );
        assert_eq!(backend.snapshot().unwrap().values[first.row][first.col], 1.0);
    }

    #[test]
    fn test_failed_retry_reports_exhausted_board() {
        let config = AgentConfig {
            board_size: 0,
            ..config(standard_fleet(), false)
        };
        let mut agent = TargetingAgent::with_store(config, None);

        let err = agent.next_move(Notification::RequestShot).unwrap_err();
        assert!(matches!(err, AgentError::ExhaustedBoard { size: 0 }));
        assert_eq!(agent.resets(), 1);
        assert_eq!(agent.last_shot(), None);
    }

    #[test]
    fn test_values_persist_across_agents_through_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AgentConfig {
            reinforcement: ReinforcementConfig {
                path: dir.path().join("values.json"),
                ..ReinforcementConfig::default()
            },
            ..config(standard_fleet(), true)
        };

        let mut first = TargetingAgent::new(config.clone());
        let hotspot = first.next_move(Notification::RequestShot).unwrap();
        first.next_move(Notification::Hit).unwrap();
        assert_eq!(first.persistence_failures(), 0);
        drop(first);

        let mut second = TargetingAgent::new(config);
        assert_eq!(second.reinforcement().unwrap().rewards_applied(), 1);
        assert_eq!(second.next_move(Notification::RequestShot).unwrap(), hotspot);
    }
}
