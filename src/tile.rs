use crate::components::EffectKind;

/// Terrain kind of a single tile.
///
/// Kind is fixed after generation and determines walkability, the speed
/// multiplier applied to entities crossing the tile, the friction used to
/// decelerate coasting entities, and an optional hazard effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Grass,
    Dirt,
    Sand,
    Water,
    Rock,
    Lava,
}

impl TileKind {
    pub fn is_walkable(&self) -> bool {
        !matches!(self, TileKind::Rock)
    }

    /// Movement speed multiplier applied during position integration.
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            TileKind::Grass | TileKind::Dirt => 1.0,
            TileKind::Sand => 0.75,
            TileKind::Water => 0.4,
            TileKind::Rock => 1.0,
            TileKind::Lava => 0.6,
        }
    }

    /// Deceleration (world-units per second squared) applied to entities
    /// coasting on this tile with no active acceleration.
    pub fn friction(&self) -> f32 {
        match self {
            TileKind::Grass | TileKind::Dirt => 18.0,
            TileKind::Sand => 26.0,
            TileKind::Water => 30.0,
            TileKind::Rock => 18.0,
            TileKind::Lava => 14.0,
        }
    }

    /// Status effect this tile imposes on entities standing in it.
    pub fn hazard(&self) -> Option<EffectKind> {
        match self {
            TileKind::Lava => Some(EffectKind::Burning),
            _ => None,
        }
    }
}

/// Biome grouping, assigned per tile at generation.
///
/// Biomes drive wander-destination preferences; they have no physics effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    Plains,
    Forest,
    Desert,
    Swamp,
    Mountain,
    Lake,
}

/// A single cell of the tile grid.
///
/// `kind`, `biome` and `is_wall` are immutable after generation. `fog` starts
/// fully opaque and decays toward 0 each tick once the tile has been revealed.
#[derive(Debug, Clone)]
pub struct Tile {
    pub kind: TileKind,
    pub biome: Biome,
    pub is_wall: bool,
    pub fog: f32,
    pub revealed: bool,
}

impl Tile {
    pub fn new(kind: TileKind, biome: Biome) -> Self {
        Self {
            kind,
            biome,
            is_wall: !kind.is_walkable(),
            fog: 1.0,
            revealed: false,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(TileKind::Grass, Biome::Plains)
    }
}
