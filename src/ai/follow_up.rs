use rand::seq::SliceRandom;
use rand::RngCore;

use crate::game::{Coord, OccupancyGrid};

use super::random::random_available;

/// Axis along which the pursued ship lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Proposes the next shot against a damaged ship from its recorded hits.
pub struct TargetFollowUp<'a> {
    hits: &'a [Coord],
    occupancy: &'a OccupancyGrid,
}

impl<'a> TargetFollowUp<'a> {
    pub fn new(hits: &'a [Coord], occupancy: &'a OccupancyGrid) -> Self {
        TargetFollowUp { hits, occupancy }
    }

    /// Orientation implied by the first two hits, if they share a column or
    /// a row.
    pub fn orientation(&self) -> Option<Orientation> {
        match self.hits {
            [a, b, ..] if a.col == b.col => Some(Orientation::Vertical),
            [a, b, ..] if a.row == b.row => Some(Orientation::Horizontal),
            _ => None,
        }
    }

    /// Next cell to fire at. `None` only when the board has no unmarked cell.
    pub fn next_coordinate(&self, rng: &mut dyn RngCore) -> Option<Coord> {
        let proposal = match (self.hits, self.orientation()) {
            ([], _) => None,
            ([only], _) => self.probe_neighbors(*only, rng),
            (_, Some(orientation)) => {
                let end = self.extend_line(orientation, rng);
                if end.is_none() {
                    tracing::warn!(
                        "both ends of {:?} line {:?} are closed; ship bookkeeping is inconsistent",
                        orientation,
                        self.hits
                    );
                }
                end
            }
            (_, None) => self
                .hits
                .iter()
                .rev()
                .find_map(|&hit| self.probe_neighbors(hit, rng)),
        };

        proposal.or_else(|| {
            tracing::debug!("no local follow-up for hits {:?}, firing at random", self.hits);
            random_available(self.occupancy, rng)
        })
    }

    /// First available orthogonal neighbor of `origin`, in shuffled order.
    fn probe_neighbors(&self, origin: Coord, rng: &mut dyn RngCore) -> Option<Coord> {
        let mut neighbors: Vec<Coord> = origin.orthogonal_neighbors(self.occupancy.size()).collect();
        neighbors.shuffle(rng);
        neighbors.into_iter().find(|&c| self.occupancy.is_available(c))
    }

    /// Cell just past either extreme of the hit line, ends tried in random
    /// order.
    fn extend_line(&self, orientation: Orientation, rng: &mut dyn RngCore) -> Option<Coord> {
        let anchor = self.hits[0];
        let size = self.occupancy.size();
        let mut ends = match orientation {
            Orientation::Vertical => {
                let rows = self.hits.iter().filter(|h| h.col == anchor.col).map(|h| h.row);
                let (lo, hi) = min_max(rows, anchor.row);
                [
                    Coord::new(anchor.col, lo).offset(0, -1, size),
                    Coord::new(anchor.col, hi).offset(0, 1, size),
                ]
            }
            Orientation::Horizontal => {
                let cols = self.hits.iter().filter(|h| h.row == anchor.row).map(|h| h.col);
                let (lo, hi) = min_max(cols, anchor.col);
                [
                    Coord::new(lo, anchor.row).offset(-1, 0, size),
                    Coord::new(hi, anchor.row).offset(1, 0, size),
                ]
            }
        };
        ends.shuffle(rng);
        ends.into_iter()
            .flatten()
            .find(|&c| self.occupancy.is_available(c))
    }
}

fn min_max(values: impl Iterator<Item = usize>, seed: usize) -> (usize, usize) {
    values.fold((seed, seed), |(lo, hi), v| (lo.min(v), hi.max(v)))
}
