use crate::game::{Coord, Grid, OccupancyGrid};

/// Values closer than this are treated as tied.
const TIE_EPSILON: f64 = 1e-9;

/// Learned per-cell reward values.
#[derive(Debug, Clone, PartialEq)]
pub struct ReinforcementMap {
    values: Grid<f64>,
}

impl ReinforcementMap {
    pub fn zeros(size: usize) -> Self {
        ReinforcementMap {
            values: Grid::filled(size, 0.0),
        }
    }

    /// Build from row-major rows; `None` unless the rows form a square.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        Grid::from_rows(rows).map(|values| ReinforcementMap { values })
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.rows().map(|r| r.to_vec()).collect()
    }

    pub fn size(&self) -> usize {
        self.values.size()
    }

    /// Stored value, or 0.0 off the board.
    pub fn value(&self, coord: Coord) -> f64 {
        self.values.get(coord).copied().unwrap_or(0.0)
    }

    /// Add `value` at `coord` and `value / (1 + manhattan)` to each in-bounds
    /// cell of its 3x3 neighborhood.
    pub fn reward(&mut self, coord: Coord, value: f64) {
        let size = self.size();
        let Some(cell) = self.values.get_mut(coord) else {
            return;
        };
        *cell += value;
        for neighbor in coord.surrounding(size) {
            let decay = 1.0 + coord.manhattan(neighbor) as f64;
            self.values[neighbor] += value / decay;
        }
    }

    /// Highest value among available cells and every available cell that
    /// holds it. `None` when no cell is available.
    pub fn best_candidates(&self, occupancy: &OccupancyGrid) -> Option<(f64, Vec<Coord>)> {
        let best = occupancy
            .available()
            .map(|c| self.value(c))
            .fold(f64::NEG_INFINITY, f64::max);
        if best == f64::NEG_INFINITY {
            return None;
        }
        let cells = occupancy
            .available()
            .filter(|&c| (self.value(c) - best).abs() <= TIE_EPSILON)
            .collect();
        Some((best, cells))
    }

    pub fn clear(&mut self) {
        self.values.fill(0.0);
    }
}
