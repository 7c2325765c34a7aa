use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Default side length of the square board.
pub const DEFAULT_BOARD_SIZE: usize = 10;

/// Orthogonal steps in (col, row) order: up, down, left, right.
const ORTHOGONAL: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// A board cell, 0-indexed. `col` is the x axis, `row` the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub col: usize,
    pub row: usize,
}

impl Coord {
    pub const fn new(col: usize, row: usize) -> Self {
        Coord { col, row }
    }

    /// Shift by `(dc, dr)`, returning `None` if the result leaves a
    /// `size`x`size` board.
    pub fn offset(self, dc: isize, dr: isize, size: usize) -> Option<Coord> {
        let col = self.col.checked_add_signed(dc)?;
        let row = self.row.checked_add_signed(dr)?;
        if col < size && row < size {
            Some(Coord { col, row })
        } else {
            None
        }
    }

    /// In-bounds orthogonal neighbors (up, down, left, right).
    pub fn orthogonal_neighbors(self, size: usize) -> impl Iterator<Item = Coord> {
        ORTHOGONAL
            .into_iter()
            .filter_map(move |(dc, dr)| self.offset(dc, dr, size))
    }

    /// In-bounds cells of the 8-neighborhood, excluding `self`.
    pub fn surrounding(self, size: usize) -> impl Iterator<Item = Coord> {
        (-1..=1isize)
            .flat_map(|dr| (-1..=1isize).map(move |dc| (dc, dr)))
            .filter(|&(dc, dr)| dc != 0 || dr != 0)
            .filter_map(move |(dc, dr)| self.offset(dc, dr, size))
    }

    pub fn manhattan(self, other: Coord) -> usize {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }

    /// Checkerboard color: true when `col + row` is even.
    pub fn is_even_parity(self) -> bool {
        (self.col + self.row) % 2 == 0
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Square, row-major cell storage shared by the occupancy, density and
/// reinforcement layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(size: usize, value: T) -> Self {
        Grid {
            size,
            cells: vec![value; size * size],
        }
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Grid<T> {
    /// Build from rows; returns `None` unless `rows` is square.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Grid {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.col < self.size && coord.row < self.size
    }

    pub fn get(&self, coord: Coord) -> Option<&T> {
        if self.contains(coord) {
            Some(&self.cells[self.index_of(coord)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut T> {
        if self.contains(coord) {
            let idx = self.index_of(coord);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Coord::new(col, row)))
    }

    /// Cells paired with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &T)> {
        self.coords().zip(self.cells.iter())
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.size.max(1))
    }

    fn index_of(&self, coord: Coord) -> usize {
        coord.row * self.size + coord.col
    }
}

impl<T> Index<Coord> for Grid<T> {
    type Output = T;

    fn index(&self, coord: Coord) -> &T {
        assert!(self.contains(coord), "{coord} outside {0}x{0} grid", self.size);
        &self.cells[self.index_of(coord)]
    }
}

impl<T> IndexMut<Coord> for Grid<T> {
    fn index_mut(&mut self, coord: Coord) -> &mut T {
        assert!(self.contains(coord), "{coord} outside {0}x{0} grid", self.size);
        let idx = self.index_of(coord);
        &mut self.cells[idx]
    }
}
