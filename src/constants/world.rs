//! World layout and fog constants.

/// World-space size of one tile.
pub const TILE_SIZE: f32 = 1.0;

/// Side length of a chunk in tiles.
pub const CHUNK_TILES: usize = 8;

/// Default board size for generated worlds, in chunks per side.
pub const DEFAULT_BOARD_CHUNKS: usize = 16;

/// Fog removed per second from a revealed tile.
pub const FOG_DECAY_PER_SECOND: f32 = 0.35;
