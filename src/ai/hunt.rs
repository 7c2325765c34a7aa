use rand::seq::IndexedRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::game::{Coord, OccupancyGrid, ShipInventory};
use crate::store::ReinforcementStore;

use super::density::ProbabilityMap;
use super::random::random_available;

/// Which hunt-mode heuristics are layered into the selection chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuntConfig {
    /// Consult the persisted value map first.
    pub reinforcement_enabled: bool,
    /// Use placement-density scoring.
    pub density_enabled: bool,
    /// Parity scan as the pattern fallback.
    pub checkerboard_enabled: bool,
    /// Row-major scan as the pattern fallback.
    pub sequential_enabled: bool,
}

impl Default for HuntConfig {
    fn default() -> Self {
        HuntConfig {
            reinforcement_enabled: true,
            density_enabled: true,
            checkerboard_enabled: true,
            sequential_enabled: false,
        }
    }
}

/// Everything a hunt heuristic may look at.
pub struct HuntContext<'a> {
    pub occupancy: &'a OccupancyGrid,
    pub inventory: &'a ShipInventory,
    pub reinforcement: Option<&'a ReinforcementStore>,
}

/// A hunt-mode cell selector. Returning `None` passes to the next
/// strategy in the chain. Implementations must only return unmarked cells.
pub trait HuntStrategy: Send {
    fn name(&self) -> &'static str;

    fn select(&self, ctx: &HuntContext<'_>, rng: &mut dyn RngCore) -> Option<Coord>;
}

/// Learned value map; only used once some cell has a positive value.
pub struct ReinforcementStrategy;

impl HuntStrategy for ReinforcementStrategy {
    fn name(&self) -> &'static str {
        "reinforcement"
    }

    fn select(&self, ctx: &HuntContext<'_>, rng: &mut dyn RngCore) -> Option<Coord> {
        let (best, cells) = ctx.reinforcement?.best_candidates(ctx.occupancy)?;
        if best <= 0.0 {
            return None;
        }
        cells.choose(rng).copied()
    }
}

/// Placement-density maximum.
pub struct DensityStrategy;

impl HuntStrategy for DensityStrategy {
    fn name(&self) -> &'static str {
        "density"
    }

    fn select(&self, ctx: &HuntContext<'_>, rng: &mut dyn RngCore) -> Option<Coord> {
        let map = ProbabilityMap::compute(ctx.occupancy, ctx.inventory);
        let (_, cells) = map.best_cells(ctx.occupancy)?;
        cells.choose(rng).copied()
    }
}

/// Even-parity cells in row-major order, then the odd-parity ones.
pub struct CheckerboardStrategy;

impl HuntStrategy for CheckerboardStrategy {
    fn name(&self) -> &'static str {
        "checkerboard"
    }

    fn select(&self, ctx: &HuntContext<'_>, _rng: &mut dyn RngCore) -> Option<Coord> {
        ctx.occupancy
            .available()
            .find(|c| c.is_even_parity())
            .or_else(|| ctx.occupancy.available().next())
    }
}

/// First unmarked cell in row-major order.
pub struct SequentialStrategy;

impl HuntStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn select(&self, ctx: &HuntContext<'_>, _rng: &mut dyn RngCore) -> Option<Coord> {
        ctx.occupancy.available().next()
    }
}

/// Any unmarked cell.
pub struct UniformRandomStrategy;

impl HuntStrategy for UniformRandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select(&self, ctx: &HuntContext<'_>, rng: &mut dyn RngCore) -> Option<Coord> {
        random_available(ctx.occupancy, rng)
    }
}

/// Ordered fallback chain of hunt strategies.
pub struct HuntChain {
    strategies: Vec<Box<dyn HuntStrategy>>,
}

impl HuntChain {
    pub fn new(strategies: Vec<Box<dyn HuntStrategy>>) -> Self {
        HuntChain { strategies }
    }

    /// reinforcement -> density -> checkerboard -> sequential -> random,
    /// skipping disabled layers. Random is always last.
    pub fn from_config(config: &HuntConfig) -> Self {
        let mut strategies: Vec<Box<dyn HuntStrategy>> = Vec::new();
        if config.reinforcement_enabled {
            strategies.push(Box::new(ReinforcementStrategy));
        }
        if config.density_enabled {
            strategies.push(Box::new(DensityStrategy));
        }
        if config.checkerboard_enabled {
            strategies.push(Box::new(CheckerboardStrategy));
        }
        if config.sequential_enabled {
            strategies.push(Box::new(SequentialStrategy));
        }
        strategies.push(Box::new(UniformRandomStrategy));
        HuntChain { strategies }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// First unmarked cell offered by the chain and the strategy that chose
    /// it. `None` only when the board is exhausted.
    pub fn select(
        &self,
        ctx: &HuntContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<(Coord, &'static str)> {
        self.strategies.iter().find_map(|strategy| {
            let coord = strategy.select(ctx, rng)?;
            if ctx.occupancy.is_available(coord) {
                Some((coord, strategy.name()))
            } else {
                tracing::warn!("{} strategy proposed marked cell {}", strategy.name(), coord);
                None
            }
        })
    }
}
