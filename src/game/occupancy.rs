use super::board::{Coord, Grid};

/// Cells already fired upon or ruled out. Marks are monotonic until
/// [`OccupancyGrid::reset`].
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    marks: Grid<bool>,
    marked: usize,
}

impl OccupancyGrid {
    pub fn new(size: usize) -> Self {
        OccupancyGrid {
            marks: Grid::filled(size, false),
            marked: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.marks.size()
    }

    /// Mark a cell fired/excluded. Returns true if the cell was newly marked;
    /// out-of-bounds coordinates are ignored.
    pub fn mark(&mut self, coord: Coord) -> bool {
        match self.marks.get_mut(coord) {
            Some(cell) if !*cell => {
                *cell = true;
                self.marked += 1;
                true
            }
            _ => false,
        }
    }

    /// True iff `coord` is on the board and not yet marked.
    pub fn is_available(&self, coord: Coord) -> bool {
        matches!(self.marks.get(coord), Some(false))
    }

    pub fn is_marked(&self, coord: Coord) -> bool {
        matches!(self.marks.get(coord), Some(true))
    }

    /// Unmarked cells in row-major order.
    pub fn available(&self) -> impl Iterator<Item = Coord> + '_ {
        self.marks
            .iter()
            .filter(|&(_, &marked)| !marked)
            .map(|(coord, _)| coord)
    }

    pub fn marked_count(&self) -> usize {
        self.marked
    }

    pub fn available_count(&self) -> usize {
        self.size() * self.size() - self.marked
    }

    pub fn is_exhausted(&self) -> bool {
        self.available_count() == 0
    }

    /// Clear every mark. Only for recovery from an exhausted board.
    pub fn reset(&mut self) {
        self.marks.fill(false);
        self.marked = 0;
    }
}
