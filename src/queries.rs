//! Common read-only query helpers.
//!
//! Pure lookups shared by the systems and exposed to the renderer/UI side.
//! Nothing here mutates simulation state.

use glam::Vec2;
use hecs::{Entity, World};

use crate::components::{EntityKind, Health, Transform};
use crate::engine::GameState;
use crate::tile::Tile;

/// All entities whose shape lies within `radius` of `point`.
pub fn entities_in_range(state: &GameState, point: Vec2, radius: f32) -> Vec<Entity> {
    state.board.entities_in_range(&state.world, point, radius)
}

/// The tile at integer tile coordinates, if on the grid.
pub fn tile_at(state: &GameState, x: i32, y: i32) -> Option<&Tile> {
    state.grid.get(x, y)
}

/// An entity's world-space position.
pub fn position_of(world: &World, entity: Entity) -> Option<Vec2> {
    world.get::<&Transform>(entity).ok().map(|t| t.position)
}

/// An entity's kind tag.
pub fn kind_of(world: &World, entity: Entity) -> Option<EntityKind> {
    world.get::<&EntityKind>(entity).ok().map(|k| *k)
}

/// Current and maximum health.
pub fn health_of(world: &World, entity: Entity) -> Option<(i32, i32)> {
    world.get::<&Health>(entity).ok().map(|h| (h.current, h.max))
}

/// Whether the entity exists and its health (if any) is above zero.
pub fn is_alive(world: &World, entity: Entity) -> bool {
    if !world.contains(entity) {
        return false;
    }
    world.get::<&Health>(entity).map(|h| !h.is_dead()).unwrap_or(true)
}
