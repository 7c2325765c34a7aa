use rand::seq::IndexedRandom;
use rand::RngCore;

use crate::game::{Coord, OccupancyGrid};

/// Uniformly random unmarked cell, or `None` on an exhausted board.
pub fn random_available(occupancy: &OccupancyGrid, rng: &mut dyn RngCore) -> Option<Coord> {
    let cells: Vec<Coord> = occupancy.available().collect();
    cells.choose(rng).copied()
}
