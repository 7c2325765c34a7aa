use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of the fleet composition: `count` ships of `length` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipClass {
    pub length: usize,
    pub count: usize,
}

impl ShipClass {
    pub const fn new(length: usize, count: usize) -> Self {
        ShipClass { length, count }
    }
}

/// One four-deck, two three-deck, three two-deck and four single-deck ships.
pub fn standard_fleet() -> Vec<ShipClass> {
    vec![
        ShipClass::new(4, 1),
        ShipClass::new(3, 2),
        ShipClass::new(2, 3),
        ShipClass::new(1, 4),
    ]
}

/// Ships still afloat, keyed by length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipInventory {
    remaining: BTreeMap<usize, usize>,
}

impl ShipInventory {
    pub fn from_fleet(fleet: &[ShipClass]) -> Self {
        let mut remaining = BTreeMap::new();
        for class in fleet.iter().filter(|c| c.length > 0) {
            *remaining.entry(class.length).or_insert(0) += class.count;
        }
        ShipInventory { remaining }
    }

    /// Remaining ships of `length`.
    pub fn count(&self, length: usize) -> usize {
        self.remaining.get(&length).copied().unwrap_or(0)
    }

    /// Record a sunk ship of `length`. If no such ship remains, the nearest
    /// remaining length is decremented instead (longer wins ties). Returns the
    /// length actually decremented, or `None` if the inventory is empty.
    pub fn record_sunk(&mut self, length: usize) -> Option<usize> {
        let chosen = if self.count(length) > 0 {
            length
        } else {
            self.remaining
                .iter()
                .filter(|&(_, &count)| count > 0)
                .map(|(&len, _)| len)
                .min_by_key(|&len| (len.abs_diff(length), std::cmp::Reverse(len)))?
        };
        if let Some(count) = self.remaining.get_mut(&chosen) {
            *count = count.saturating_sub(1);
        }
        Some(chosen)
    }

    /// Every remaining ship as its length, longest first. A length with
    /// count `n` appears `n` times.
    pub fn ships(&self) -> impl Iterator<Item = usize> + '_ {
        self.remaining
            .iter()
            .rev()
            .flat_map(|(&len, &count)| std::iter::repeat(len).take(count))
    }

    pub fn remaining_ships(&self) -> usize {
        self.remaining.values().sum()
    }

    pub fn remaining_cells(&self) -> usize {
        self.remaining.iter().map(|(len, count)| len * count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_ships() == 0
    }

    /// Snapshot as (length, count) pairs, ascending by length.
    pub fn counts(&self) -> Vec<(usize, usize)> {
        self.remaining.iter().map(|(&l, &c)| (l, c)).collect()
    }
}
