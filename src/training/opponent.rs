use rand::{Rng, RngCore};

use crate::game::{Coord, Grid, Notification, ShipClass};

/// Placement attempts per ship before the whole layout is restarted.
const ATTEMPTS_PER_SHIP: usize = 200;
/// Full layout restarts before giving up.
const LAYOUT_RESTARTS: usize = 100;

/// What the opponent's board reports for a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotResult {
    Miss,
    Hit,
    Destroyed,
}

impl ShotResult {
    /// Notification the agent receives for this result.
    pub fn notification(self) -> Notification {
        match self {
            ShotResult::Miss => Notification::RequestShot,
            ShotResult::Hit => Notification::Hit,
            ShotResult::Destroyed => Notification::Destroyed,
        }
    }
}

#[derive(Debug, Clone)]
struct PlacedShip {
    cells: Vec<Coord>,
    hits: usize,
}

impl PlacedShip {
    fn is_sunk(&self) -> bool {
        self.hits >= self.cells.len()
    }
}

/// Hidden opponent fleet used to drive the agent in simulation. Ships never
/// touch, not even diagonally.
#[derive(Debug, Clone)]
pub struct OpponentFleet {
    ships: Vec<PlacedShip>,
    owner: Grid<Option<usize>>,
    struck: Grid<bool>,
}

impl OpponentFleet {
    /// Place `fleet` at random, longest ships first. `None` if no valid
    /// layout was found.
    pub fn random(size: usize, fleet: &[ShipClass], rng: &mut dyn RngCore) -> Option<Self> {
        let mut lengths: Vec<usize> = fleet
            .iter()
            .flat_map(|c| std::iter::repeat(c.length).take(c.count))
            .collect();
        lengths.sort_unstable_by(|a, b| b.cmp(a));

        for _ in 0..LAYOUT_RESTARTS {
            if let Some(layout) = Self::try_layout(size, &lengths, rng) {
                return Self::from_ships(size, layout);
            }
        }
        None
    }

    fn try_layout(size: usize, lengths: &[usize], rng: &mut dyn RngCore) -> Option<Vec<Vec<Coord>>> {
        let mut taken = Grid::filled(size, false);
        let mut layout = Vec::with_capacity(lengths.len());

        for &length in lengths {
            if length == 0 || length > size {
                return None;
            }
            let cells = (0..ATTEMPTS_PER_SHIP).find_map(|_| {
                let vertical = rng.random_bool(0.5);
                let fixed = rng.random_range(0..size);
                let start = rng.random_range(0..=size - length);
                let cells: Vec<Coord> = (0..length)
                    .map(|k| {
                        if vertical {
                            Coord::new(fixed, start + k)
                        } else {
                            Coord::new(start + k, fixed)
                        }
                    })
                    .collect();
                let clear = cells
                    .iter()
                    .all(|&c| !taken[c] && c.surrounding(size).all(|n| !taken[n]));
                clear.then_some(cells)
            })?;
            for &c in &cells {
                taken[c] = true;
            }
            layout.push(cells);
        }
        Some(layout)
    }

    /// Fleet from explicit ship cells. `None` if any cell is off the board,
    /// or ships overlap or touch.
    pub fn from_ships(size: usize, ships: Vec<Vec<Coord>>) -> Option<Self> {
        let mut owner: Grid<Option<usize>> = Grid::filled(size, None);
        for (id, cells) in ships.iter().enumerate() {
            for &c in cells {
                if owner.get(c)?.is_some() {
                    return None;
                }
                owner[c] = Some(id);
            }
        }
        for (c, id) in owner.iter() {
            if let Some(id) = id {
                if c.surrounding(size).any(|n| matches!(owner[n], Some(other) if other != *id)) {
                    return None;
                }
            }
        }

        Some(OpponentFleet {
            ships: ships
                .into_iter()
                .map(|cells| PlacedShip { cells, hits: 0 })
                .collect(),
            owner,
            struck: Grid::filled(size, false),
        })
    }

    /// Resolve a shot. Repeated shots at a struck segment, and shots off the
    /// board, are misses.
    pub fn fire(&mut self, coord: Coord) -> ShotResult {
        let Some(&Some(id)) = self.owner.get(coord) else {
            return ShotResult::Miss;
        };
        if self.struck[coord] {
            return ShotResult::Miss;
        }
        self.struck[coord] = true;
        let ship = &mut self.ships[id];
        ship.hits += 1;
        if ship.is_sunk() {
            ShotResult::Destroyed
        } else {
            ShotResult::Hit
        }
    }

    pub fn ships_remaining(&self) -> usize {
        self.ships.iter().filter(|s| !s.is_sunk()).count()
    }

    pub fn ships_sunk(&self) -> usize {
        self.ships.len() - self.ships_remaining()
    }

    pub fn is_defeated(&self) -> bool {
        self.ships_remaining() == 0
    }

    /// Cells of every ship, in placement order.
    pub fn ship_cells(&self) -> impl Iterator<Item = &[Coord]> {
        self.ships.iter().map(|s| s.cells.as_slice())
    }
}
