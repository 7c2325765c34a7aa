//! Board model: coordinates, square grids, the occupancy grid, the fleet
//! inventory and the notification tokens exchanged with the game driver.

mod board;
mod fleet;
mod notification;
mod occupancy;

pub use board::{Coord, Grid, DEFAULT_BOARD_SIZE};
pub use fleet::{standard_fleet, ShipClass, ShipInventory};
pub use notification::Notification;
pub use occupancy::OccupancyGrid;
