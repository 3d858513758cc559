//! Spatial partition over the tile grid.
//!
//! The board divides the world into fixed-size chunks, each holding the
//! entities currently located inside it bucketed by coarse category. Chunks
//! are created once at world setup and never destroyed; an entity belongs to
//! exactly one chunk at a time, the one computed from its current position.

use glam::Vec2;
use hecs::{Entity, World};

use crate::components::{Category, Hitbox, Transform};
use crate::constants::{CHUNK_TILES, TILE_SIZE};

/// One cell of the partition. Members are bucketed by category so iteration
/// visits units, then mobs, then props.
pub struct Chunk {
    buckets: [Vec<Entity>; Category::COUNT],
}

impl Chunk {
    fn new() -> Self {
        Self {
            buckets: [Vec::new(), Vec::new(), Vec::new()],
        }
    }

    pub fn members(&self, category: Category) -> &[Entity] {
        &self.buckets[category.index()]
    }

    /// All members in category order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.buckets.iter().flatten().copied()
    }

    fn insert(&mut self, category: Category, entity: Entity) {
        self.buckets[category.index()].push(entity);
    }

    fn remove(&mut self, category: Category, entity: Entity) -> bool {
        let bucket = &mut self.buckets[category.index()];
        let before = bucket.len();
        bucket.retain(|&e| e != entity);
        bucket.len() != before
    }
}

/// The chunk grid.
pub struct Board {
    cols: usize,
    rows: usize,
    /// World-space side length of one chunk.
    chunk_size: f32,
    chunks: Vec<Chunk>,
}

impl Board {
    /// Build an empty board covering a `tile_width` x `tile_height` grid.
    pub fn new(tile_width: usize, tile_height: usize) -> Self {
        let cols = tile_width.div_ceil(CHUNK_TILES);
        let rows = tile_height.div_ceil(CHUNK_TILES);
        let chunks = (0..cols * rows).map(|_| Chunk::new()).collect();
        Self {
            cols,
            rows,
            chunk_size: CHUNK_TILES as f32 * TILE_SIZE,
            chunks,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn chunk(&self, index: usize) -> &Chunk {
        &self.chunks[index]
    }

    /// Chunk index for a world position. Out-of-bounds positions are `None`,
    /// never wrapped.
    pub fn chunk_index(&self, pos: Vec2) -> Option<usize> {
        if pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let col = (pos.x / self.chunk_size) as usize;
        let row = (pos.y / self.chunk_size) as usize;
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(row * self.cols + col)
    }

    pub fn insert(&mut self, entity: Entity, category: Category, chunk: usize) {
        self.chunks[chunk].insert(category, entity);
    }

    pub fn remove(&mut self, entity: Entity, category: Category, chunk: usize) {
        let removed = self.chunks[chunk].remove(category, entity);
        debug_assert!(removed, "entity was not a member of its recorded chunk");
    }

    /// Relocate an entity's membership between chunks.
    pub fn move_entity(&mut self, entity: Entity, category: Category, old: usize, new: usize) {
        if old == new {
            return;
        }
        self.remove(entity, category, old);
        self.chunks[new].insert(category, entity);
    }

    /// World-space bounding box of a chunk.
    fn chunk_aabb(&self, index: usize) -> (Vec2, Vec2) {
        let col = index % self.cols;
        let row = index / self.cols;
        let min = Vec2::new(col as f32 * self.chunk_size, row as f32 * self.chunk_size);
        (min, min + Vec2::splat(self.chunk_size))
    }

    /// All entities whose shape lies within `radius` of `point`.
    ///
    /// Scans only chunks whose bounding square intersects the query circle,
    /// then runs the exact per-candidate test: circles by center distance
    /// minus radius, rectangles by point-to-AABB distance, bare transforms
    /// by point distance. Never returns the same entity twice (single-chunk
    /// membership) and never returns entities outside the board.
    pub fn entities_in_range(&self, world: &World, point: Vec2, radius: f32) -> Vec<Entity> {
        let mut out = Vec::new();

        let min_col = (((point.x - radius) / self.chunk_size).floor().max(0.0)) as usize;
        let min_row = (((point.y - radius) / self.chunk_size).floor().max(0.0)) as usize;
        if point.x + radius < 0.0 || point.y + radius < 0.0 {
            return out;
        }
        let max_col = (((point.x + radius) / self.chunk_size).floor() as usize).min(self.cols.saturating_sub(1));
        let max_row = (((point.y + radius) / self.chunk_size).floor() as usize).min(self.rows.saturating_sub(1));
        if min_col >= self.cols || min_row >= self.rows {
            return out;
        }

        for row in min_row..=max_row {
            for col in min_col..=max_col {
                let index = row * self.cols + col;
                let (min, max) = self.chunk_aabb(index);
                let closest = point.clamp(min, max);
                if closest.distance(point) > radius {
                    continue;
                }

                for entity in self.chunks[index].iter() {
                    let Ok(transform) = world.get::<&Transform>(entity) else {
                        continue;
                    };
                    let hit = match world.get::<&Hitbox>(entity) {
                        Ok(hitbox) => hitbox.shape.within_range(transform.position, point, radius),
                        Err(_) => transform.position.distance(point) <= radius,
                    };
                    if hit {
                        out.push(entity);
                    }
                }
            }
        }

        out
    }

    /// Whether the entity is currently filed in the given chunk (test support).
    pub fn contains(&self, entity: Entity, category: Category, chunk: usize) -> bool {
        self.chunks[chunk].members(category).contains(&entity)
    }
}
