//! Simulation entry points: state container, tick pipeline, commands.

pub mod commands;
pub mod game_state;
pub mod simulation;

pub use commands::{apply_damage, command_move_to_tile, spawn_creature};
pub use game_state::{GameClock, GameState};
pub use simulation::simulate;
