//! Overworld generation.
//!
//! Produces the initial tile grid and biome data before the simulation
//! starts; nothing here runs during ticks. Elevation and moisture are
//! sampled from two Perlin fields and mapped to tile kind and biome.

use noise::{NoiseFn, Perlin};

use crate::grid::TileGrid;
use crate::tile::{Biome, Tile, TileKind};

/// Noise frequency for the elevation field.
const ELEVATION_FREQUENCY: f64 = 0.05;
/// Noise frequency for the moisture field.
const MOISTURE_FREQUENCY: f64 = 0.07;

/// Elevation below this is open water.
const WATER_LEVEL: f64 = -0.35;
/// Elevation above this is impassable rock.
const ROCK_LEVEL: f64 = 0.55;
/// Elevation above this with dry moisture becomes lava pockets.
const LAVA_LEVEL: f64 = 0.8;

/// Generate a `width` x `height` overworld.
pub fn generate(width: usize, height: usize, seed: u32) -> TileGrid {
    let elevation = Perlin::new(seed);
    let moisture = Perlin::new(seed.wrapping_add(1));

    let mut tiles = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let e = elevation.get([x as f64 * ELEVATION_FREQUENCY, y as f64 * ELEVATION_FREQUENCY]);
            let m = moisture.get([x as f64 * MOISTURE_FREQUENCY, y as f64 * MOISTURE_FREQUENCY]);
            tiles.push(classify(e, m));
        }
    }

    TileGrid::new(width, height, tiles)
}

fn classify(elevation: f64, moisture: f64) -> Tile {
    if elevation < WATER_LEVEL {
        return Tile::new(TileKind::Water, Biome::Lake);
    }
    if elevation > ROCK_LEVEL {
        if elevation > LAVA_LEVEL && moisture < -0.2 {
            return Tile::new(TileKind::Lava, Biome::Mountain);
        }
        return Tile::new(TileKind::Rock, Biome::Mountain);
    }
    if moisture < -0.3 {
        return Tile::new(TileKind::Sand, Biome::Desert);
    }
    if moisture > 0.4 {
        return Tile::new(TileKind::Dirt, Biome::Swamp);
    }
    if moisture > 0.0 {
        return Tile::new(TileKind::Grass, Biome::Forest);
    }
    Tile::new(TileKind::Grass, Biome::Plains)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = generate(64, 64, 7);
        let b = generate(64, 64, 7);
        for (ta, tb) in a.tiles.iter().zip(b.tiles.iter()) {
            assert_eq!(ta.kind, tb.kind);
            assert_eq!(ta.biome, tb.biome);
        }
    }

    #[test]
    fn walls_match_kind_walkability() {
        let grid = generate(64, 64, 11);
        for tile in &grid.tiles {
            assert_eq!(tile.is_wall, !tile.kind.is_walkable());
        }
    }
}
