use glam::Vec2;

use crate::constants::{FOG_DECAY_PER_SECOND, TILE_SIZE};
use crate::tile::Tile;

/// The static tile grid for a session.
///
/// Tiles are stored in a flat row-major vec and looked up by integer tile
/// coordinates; they are never individually allocated. The grid owns all tile
/// state, including the fog values mutated by the fog system.
pub struct TileGrid {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Tile>,
}

impl TileGrid {
    /// Wrap a generated tile vec. Panics if the vec does not match the
    /// dimensions; generation happens once at setup, outside the tick loop.
    pub fn new(width: usize, height: usize, tiles: Vec<Tile>) -> Self {
        assert_eq!(tiles.len(), width * height, "tile vec does not match grid dimensions");
        Self { width, height, tiles }
    }

    /// A uniform grid of one tile, cloned everywhere. Test worlds and the
    /// open-field pathfinding cases use this.
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile; width * height],
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(&self.tiles[y as usize * self.width + x as usize])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(&mut self.tiles[y as usize * self.width + x as usize])
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map(|t| !t.is_wall).unwrap_or(false)
    }

    /// Tile under a world-space position.
    pub fn tile_at_world(&self, pos: Vec2) -> Option<&Tile> {
        let (x, y) = Self::world_to_tile(pos);
        self.get(x, y)
    }

    /// Convert a world-space position to tile coordinates.
    pub fn world_to_tile(pos: Vec2) -> (i32, i32) {
        ((pos.x / TILE_SIZE).floor() as i32, (pos.y / TILE_SIZE).floor() as i32)
    }

    /// World-space center of a tile.
    pub fn tile_center(x: i32, y: i32) -> Vec2 {
        Vec2::new(
            x as f32 * TILE_SIZE + TILE_SIZE * 0.5,
            y as f32 * TILE_SIZE + TILE_SIZE * 0.5,
        )
    }

    pub fn world_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn world_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    /// Mark every tile within `radius` of a world position as revealed.
    pub fn reveal_circle(&mut self, center: Vec2, radius: f32) {
        let r_tiles = (radius / TILE_SIZE).ceil() as i32;
        let (cx, cy) = Self::world_to_tile(center);
        for y in (cy - r_tiles)..=(cy + r_tiles) {
            for x in (cx - r_tiles)..=(cx + r_tiles) {
                if Self::tile_center(x, y).distance(center) > radius {
                    continue;
                }
                if let Some(tile) = self.get_mut(x, y) {
                    tile.revealed = true;
                }
            }
        }
    }

    /// Decay fog toward 0 on every revealed tile.
    pub fn decay_fog(&mut self, dt: f32) {
        let step = FOG_DECAY_PER_SECOND * dt;
        for tile in &mut self.tiles {
            if tile.revealed && tile.fog > 0.0 {
                tile.fog = (tile.fog - step).max(0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{Biome, TileKind};

    #[test]
    fn out_of_bounds_lookup_is_none() {
        let grid = TileGrid::filled(4, 4, Tile::default());
        assert!(grid.get(-1, 0).is_none());
        assert!(grid.get(0, 4).is_none());
        assert!(grid.get(2, 2).is_some());
    }

    #[test]
    fn world_to_tile_floors() {
        assert_eq!(TileGrid::world_to_tile(Vec2::new(3.9, 0.1)), (3, 0));
        assert_eq!(TileGrid::world_to_tile(Vec2::new(-0.1, 2.0)), (-1, 2));
    }

    #[test]
    fn fog_decays_only_once_revealed() {
        let mut grid = TileGrid::filled(4, 4, Tile::new(TileKind::Grass, Biome::Plains));
        grid.decay_fog(1.0);
        assert_eq!(grid.get(1, 1).unwrap().fog, 1.0);

        grid.reveal_circle(TileGrid::tile_center(1, 1), 0.1);
        let before = grid.get(1, 1).unwrap().fog;
        grid.decay_fog(0.5);
        let after = grid.get(1, 1).unwrap().fog;
        assert!(after < before);

        // Decay is monotonic and clamps at zero.
        for _ in 0..100 {
            grid.decay_fog(0.5);
        }
        assert_eq!(grid.get(1, 1).unwrap().fog, 0.0);
    }
}
