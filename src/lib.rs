//! # Broadside
//!
//! A targeting agent for hidden-ship grid-search games (Battleship-style).
//! Given shot outcomes from a game driver, it chooses the next cell to fire
//! at, layering a persisted reinforcement signal, placement-density scoring
//! and checkerboard scanning in hunt mode, and line-following in target mode.
//!
//! ## Modules
//!
//! - [`game`] — Coordinates, grids, occupancy, fleet inventory, notifications
//! - [`ai`] — Density estimator, hunt strategies, target follow-up, agent
//! - [`store`] — Reinforcement value map and its persistence backends
//! - [`training`] — Simulated opponent fleets and the self-play trainer
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod store;
pub mod training;
