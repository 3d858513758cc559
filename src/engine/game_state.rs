//! Core game state - owns the simulation data.

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::Board;
use crate::constants::{CHUNK_TILES, DEFAULT_BOARD_CHUNKS, TICK_DURATION};
use crate::grid::TileGrid;
use crate::systems::combat::AttackInfo;
use crate::tile::Tile;
use crate::worldgen;

/// Simulation time, advanced once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameClock {
    pub tick: u64,
    /// Simulation time in seconds (not real time).
    pub time: f32,
}

impl GameClock {
    pub fn advance(&mut self) {
        self.tick += 1;
        self.time += TICK_DURATION;
    }
}

/// Core game state - owns all simulation data.
///
/// Everything the tick touches hangs off this struct and is passed by
/// reference into the systems; there is no global mutable state, so
/// independent simulations can run side by side (tests do).
pub struct GameState {
    /// The ECS world
    pub world: World,

    /// The session's tile grid
    pub grid: TileGrid,

    /// Spatial partition over the grid
    pub board: Board,

    /// Simulation clock
    pub clock: GameClock,

    /// Seeded RNG - all in-tick randomness draws from here, which keeps
    /// runs reproducible per seed
    pub rng: StdRng,

    /// Attacks queued by AI this tick, resolved after the AI pass
    pub pending_attacks: Vec<AttackInfo>,
}

impl GameState {
    /// Build a state around an externally produced tile grid.
    pub fn new(grid: TileGrid, seed: u64) -> Self {
        let board = Board::new(grid.width, grid.height);
        Self {
            world: World::new(),
            grid,
            board,
            clock: GameClock::default(),
            rng: StdRng::seed_from_u64(seed),
            pending_attacks: Vec::new(),
        }
    }

    /// Generate a default-size overworld and wrap it.
    pub fn generated(seed: u64) -> Self {
        let side = DEFAULT_BOARD_CHUNKS * CHUNK_TILES;
        let grid = worldgen::generate(side, side, seed as u32);
        Self::new(grid, seed)
    }

    /// A uniform single-tile world, mostly for tests and demos.
    pub fn flat(width: usize, height: usize, tile: Tile, seed: u64) -> Self {
        Self::new(TileGrid::filled(width, height, tile), seed)
    }

    /// Read-only typed component lookup for the renderer/UI side.
    pub fn component<T: hecs::Component>(&self, entity: Entity) -> Option<hecs::Ref<'_, T>> {
        self.world.get::<&T>(entity).ok()
    }
}
