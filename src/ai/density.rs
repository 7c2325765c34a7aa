use rand::seq::IndexedRandom;
use rand::RngCore;

use crate::game::{Coord, Grid, OccupancyGrid, ShipInventory};

use super::random::random_available;

/// Per-cell count of feasible ship placements covering the cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityMap {
    scores: Grid<u32>,
}

impl ProbabilityMap {
    /// Enumerate every horizontal and vertical window for each remaining ship
    /// and credit the cells of each window that lies entirely on unmarked
    /// cells. Single-cell ships are counted once, not once per orientation.
    pub fn compute(occupancy: &OccupancyGrid, inventory: &ShipInventory) -> Self {
        let size = occupancy.size();
        let mut scores = Grid::filled(size, 0u32);

        for length in inventory.ships() {
            if length == 0 || length > size {
                continue;
            }
            for fixed in 0..size {
                for start in 0..=size - length {
                    let horizontal = (0..length).map(|k| Coord::new(start + k, fixed));
                    Self::credit(&mut scores, occupancy, horizontal);
                    if length > 1 {
                        let vertical = (0..length).map(|k| Coord::new(fixed, start + k));
                        Self::credit(&mut scores, occupancy, vertical);
                    }
                }
            }
        }

        ProbabilityMap { scores }
    }

    fn credit(
        scores: &mut Grid<u32>,
        occupancy: &OccupancyGrid,
        window: impl Iterator<Item = Coord> + Clone,
    ) {
        if window.clone().all(|c| occupancy.is_available(c)) {
            for c in window {
                scores[c] += 1;
            }
        }
    }

    pub fn score(&self, coord: Coord) -> u32 {
        self.scores.get(coord).copied().unwrap_or(0)
    }

    /// Unmarked cells sharing the maximum score, with that score. `None` when
    /// no unmarked cell has a positive score.
    pub fn best_cells(&self, occupancy: &OccupancyGrid) -> Option<(u32, Vec<Coord>)> {
        let best = occupancy.available().map(|c| self.score(c)).max()?;
        if best == 0 {
            return None;
        }
        let cells = occupancy
            .available()
            .filter(|&c| self.score(c) == best)
            .collect();
        Some((best, cells))
    }

    /// Highest-scoring unmarked cell, ties broken uniformly at random. Falls
    /// back to any unmarked cell when every score is zero.
    pub fn select_highest_scoring(
        &self,
        occupancy: &OccupancyGrid,
        rng: &mut dyn RngCore,
    ) -> Option<Coord> {
        match self.best_cells(occupancy) {
            Some((_, cells)) => cells.choose(rng).copied(),
            None => random_available(occupancy, rng),
        }
    }
}
