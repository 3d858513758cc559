//! Simulation core for a persistent 2D world of autonomous and
//! player-commanded entities.
//!
//! The crate advances entity motion against a tile grid, tracks spatial
//! chunk membership, detects collision transitions, drives non-player
//! entities through behavior state machines, pathfinds across the grid and
//! resolves pierce-limited attacks - all single-threaded, one fixed tick at
//! a time. Rendering, input and inventory live outside; they talk to the
//! core through [`engine::commands`], the read-only [`queries`] and the
//! [`events::EventQueue`].

pub mod behavior;
pub mod board;
pub mod components;
pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod pathfinding;
pub mod queries;
pub mod spawning;
pub mod systems;
pub mod tile;
pub mod worldgen;

pub use engine::{simulate, GameClock, GameState};
pub use error::CommandError;
pub use events::{EventQueue, GameEvent};
