//! Motion integration and tile collision response.

use glam::Vec2;
use hecs::{Entity, World};

use crate::board::Board;
use crate::components::{
    ChunkMember, EffectKind, EntityKind, Hitbox, StatusEffects, Still, Transform,
};
use crate::constants::{
    BURN_DURATION_TICKS, REST_SPEED, SLOWED_SPEED_FACTOR, TICK_DURATION, TILE_SIZE,
};
use crate::grid::TileGrid;

/// Keeps clamped entities strictly inside the board so the chunk lookup for
/// an entity sitting on the far edge stays in range.
const BOUNDS_MARGIN: f32 = 1e-3;

/// Integrate one tick of motion for every non-static entity.
///
/// Per entity: acceleration (or tile friction) into velocity, terminal
/// velocity clamp, position integration scaled by the occupied tile,
/// tile hazards, knockback decay, wall push-out, world bounds clamp.
/// An entity with no velocity, acceleration or knockback is a strict no-op.
pub fn integrate_motion(world: &mut World, grid: &TileGrid) {
    puffin::profile_function!();

    for (_, (transform, hitbox, effects)) in world
        .query::<(&mut Transform, Option<&Hitbox>, Option<&mut StatusEffects>)>()
        .without::<&Still>()
        .iter()
    {
        step_entity(transform, hitbox, effects, grid);
    }
}

fn step_entity(
    t: &mut Transform,
    hitbox: Option<&Hitbox>,
    mut effects: Option<&mut StatusEffects>,
    grid: &TileGrid,
) {
    let dt = TICK_DURATION;
    let tile = grid.tile_at_world(t.position);
    let (speed_mult, friction, hazard) = tile
        .map(|tile| (tile.kind.speed_multiplier(), tile.kind.friction(), tile.kind.hazard()))
        .unwrap_or((1.0, 0.0, None));

    // Tile hazards apply even at rest; standing in lava re-ignites an
    // expired burn without resetting the damage cadence of an active one.
    if let (Some(kind), Some(fx)) = (hazard, effects.as_deref_mut()) {
        if !fx.has(kind) {
            fx.apply(kind, BURN_DURATION_TICKS);
        }
    }

    if t.at_rest() {
        return;
    }

    // (1) acceleration into velocity, or friction deceleration while coasting
    if let Some(acc) = t.acceleration {
        t.velocity = Some(t.velocity.unwrap_or(Vec2::ZERO) + acc * dt);
    } else if let Some(v) = t.velocity {
        let speed = v.length();
        let decel = friction * dt;
        t.velocity = if speed - decel <= REST_SPEED {
            None
        } else {
            Some(v * ((speed - decel) / speed))
        };
    }

    // (2) terminal velocity clamp
    if let Some(v) = t.velocity {
        t.velocity = Some(v.clamp_length_max(t.terminal_velocity));
    }

    // (3) position integration scaled by the occupied tile (and slow effects)
    if let Some(v) = t.velocity {
        let mut mult = speed_mult;
        if effects.as_deref().map(|fx| fx.has(EffectKind::Slowed)).unwrap_or(false) {
            mult *= SLOWED_SPEED_FACTOR;
        }
        t.position += v * dt * mult;
        t.rotation = v.y.atan2(v.x);
    }

    // (5) knockback impulse with tick countdown
    if let Some(mut kb) = t.knockback {
        t.position += kb.velocity * dt;
        kb.ticks_left = kb.ticks_left.saturating_sub(1);
        t.knockback = (kb.ticks_left > 0).then_some(kb);
    }

    // (6) wall penetration response
    if let Some(hb) = hitbox {
        resolve_wall_penetration(grid, &mut t.position, hb.shape.half_extents());
    }

    // (7) keep the entity fully inside world bounds
    let half = hitbox.map(|h| h.shape.half_extents()).unwrap_or(Vec2::ZERO);
    t.position.x = t.position.x.clamp(half.x, grid.world_width() - half.x - BOUNDS_MARGIN);
    t.position.y = t.position.y.clamp(half.y, grid.world_height() - half.y - BOUNDS_MARGIN);
}

/// Push the entity out of any wall tile its AABB overlaps, along whichever
/// axis needs the smaller correction (judged from the tile center).
fn resolve_wall_penetration(grid: &TileGrid, pos: &mut Vec2, half: Vec2) {
    let min_x = ((pos.x - half.x) / TILE_SIZE).floor() as i32;
    let max_x = ((pos.x + half.x) / TILE_SIZE).floor() as i32;
    let min_y = ((pos.y - half.y) / TILE_SIZE).floor() as i32;
    let max_y = ((pos.y + half.y) / TILE_SIZE).floor() as i32;

    for ty in min_y..=max_y {
        for tx in min_x..=max_x {
            let Some(tile) = grid.get(tx, ty) else { continue };
            if !tile.is_wall {
                continue;
            }

            let center = TileGrid::tile_center(tx, ty);
            let overlap_x = (half.x + TILE_SIZE * 0.5) - (pos.x - center.x).abs();
            let overlap_y = (half.y + TILE_SIZE * 0.5) - (pos.y - center.y).abs();
            if overlap_x <= 0.0 || overlap_y <= 0.0 {
                continue;
            }

            if overlap_x < overlap_y {
                pos.x += overlap_x * (pos.x - center.x).signum();
            } else {
                pos.y += overlap_y * (pos.y - center.y).signum();
            }
        }
    }
}

/// Refile entities whose position crossed a chunk boundary this tick.
pub fn update_chunk_membership(world: &mut World, board: &mut Board) {
    puffin::profile_function!();

    for (entity, (transform, kind, member)) in
        world.query::<(&Transform, &EntityKind, &mut ChunkMember)>().iter()
    {
        relocate(board, entity, transform.position, *kind, member);
    }
}

fn relocate(board: &mut Board, entity: Entity, position: Vec2, kind: EntityKind, member: &mut ChunkMember) {
    let Some(new_chunk) = board.chunk_index(position) else {
        // Bounds clamping keeps live entities on the board; getting here is
        // a logic bug in the caller.
        debug_assert!(false, "entity position left the board");
        return;
    };
    if new_chunk != member.chunk {
        board.move_entity(entity, kind.category(), member.chunk, new_chunk);
        member.chunk = new_chunk;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::components::Knockback;
    use crate::constants::TICKS_PER_SECOND;
    use crate::tile::{Biome, Tile, TileKind};

    fn open_grid() -> TileGrid {
        TileGrid::filled(128, 128, Tile::new(TileKind::Grass, Biome::Plains))
    }

    #[test]
    fn rest_state_is_idempotent() {
        let mut world = World::new();
        let grid = open_grid();
        let start = Vec2::new(5.5, 5.5);
        let entity = world.spawn((Transform::new(start, 2.0), Hitbox::circle(0.5)));

        for _ in 0..10 {
            integrate_motion(&mut world, &grid);
        }
        let t = world.get::<&Transform>(entity).unwrap();
        assert_eq!(t.position, start);
        assert!(t.velocity.is_none());
    }

    #[test]
    fn terminal_velocity_bounds_speed_for_any_acceleration() {
        let mut world = World::new();
        let grid = open_grid();
        let mut transform = Transform::new(Vec2::new(20.0, 20.0), 2.0);
        transform.acceleration = Some(Vec2::new(500.0, -350.0));
        let entity = world.spawn((transform, Hitbox::circle(0.3)));

        for _ in 0..300 {
            integrate_motion(&mut world, &grid);
            let t = world.get::<&Transform>(entity).unwrap();
            assert!(t.velocity.unwrap().length() <= 2.0 + 1e-4);
        }
    }

    #[test]
    fn accelerated_entity_moves_at_most_clamped_distance_per_tick() {
        // 16x16 chunks of 8 tiles, entity at tile (5,5), radius-0.5 hitbox,
        // terminal velocity 2, acceleration magnitude 10 along +x, one tick
        // at 60 ticks/sec: displacement is bounded by 2 * (1/60).
        let mut world = World::new();
        let grid = open_grid();
        let start = TileGrid::tile_center(5, 5);
        let mut transform = Transform::new(start, 2.0);
        transform.acceleration = Some(Vec2::new(10.0, 0.0));
        let entity = world.spawn((transform, Hitbox::circle(0.5)));

        integrate_motion(&mut world, &grid);

        let t = world.get::<&Transform>(entity).unwrap();
        let moved = t.position.x - start.x;
        assert!(moved > 0.0);
        assert!(moved <= 2.0 * (1.0 / TICKS_PER_SECOND) + 1e-6);
        assert_relative_eq!(t.position.y, start.y);
    }

    #[test]
    fn friction_brings_a_coasting_entity_to_rest() {
        let mut world = World::new();
        let grid = open_grid();
        let mut transform = Transform::new(Vec2::new(30.0, 30.0), 10.0);
        transform.velocity = Some(Vec2::new(3.0, 0.0));
        let entity = world.spawn((transform,));

        for _ in 0..120 {
            integrate_motion(&mut world, &grid);
        }
        assert!(world.get::<&Transform>(entity).unwrap().velocity.is_none());
    }

    #[test]
    fn wall_pushes_out_along_smaller_axis() {
        let mut world = World::new();
        let mut grid = open_grid();
        grid.get_mut(10, 10).unwrap().kind = TileKind::Rock;
        grid.get_mut(10, 10).unwrap().is_wall = true;

        // Entity overlapping the wall's left edge, centered vertically on
        // the tile: the x correction is smaller, so it pops out to -x.
        let mut transform = Transform::new(Vec2::new(9.8, 10.5), 2.0);
        transform.velocity = Some(Vec2::new(0.5, 0.0));
        let entity = world.spawn((transform, Hitbox::circle(0.4)));

        integrate_motion(&mut world, &grid);

        let t = world.get::<&Transform>(entity).unwrap();
        assert!(t.position.x <= 10.0 - 0.4 + 1e-4, "pushed out to x={}", t.position.x);
        assert_relative_eq!(t.position.y, 10.5);
    }

    #[test]
    fn entities_stay_inside_world_bounds() {
        let mut world = World::new();
        let grid = open_grid();
        let mut transform = Transform::new(Vec2::new(0.6, 0.6), 100.0);
        transform.velocity = Some(Vec2::new(-50.0, -50.0));
        transform.acceleration = Some(Vec2::new(-50.0, -50.0));
        let entity = world.spawn((transform, Hitbox::circle(0.5)));

        for _ in 0..60 {
            integrate_motion(&mut world, &grid);
        }
        let t = world.get::<&Transform>(entity).unwrap();
        assert!(t.position.x >= 0.5);
        assert!(t.position.y >= 0.5);
    }

    #[test]
    fn knockback_decays_and_expires() {
        let mut world = World::new();
        let grid = open_grid();
        let mut transform = Transform::new(Vec2::new(40.0, 40.0), 2.0);
        transform.knockback = Some(Knockback { velocity: Vec2::new(6.0, 0.0), ticks_left: 3 });
        let entity = world.spawn((transform,));

        for _ in 0..3 {
            integrate_motion(&mut world, &grid);
        }
        let t = world.get::<&Transform>(entity).unwrap();
        assert!(t.knockback.is_none());
        assert!(t.position.x > 40.0);
    }

    #[test]
    fn lava_ignites_entities_with_status_effects() {
        let mut world = World::new();
        let mut grid = open_grid();
        *grid.get_mut(10, 10).unwrap() = Tile::new(TileKind::Lava, Biome::Mountain);

        let entity = world.spawn((
            Transform::new(TileGrid::tile_center(10, 10), 2.0),
            StatusEffects::new(),
        ));
        integrate_motion(&mut world, &grid);

        let fx = world.get::<&StatusEffects>(entity).unwrap();
        assert!(fx.has(EffectKind::Burning));
    }

    #[test]
    fn still_entities_are_skipped() {
        let mut world = World::new();
        let grid = open_grid();
        let mut transform = Transform::new(Vec2::new(12.0, 12.0), 2.0);
        transform.velocity = Some(Vec2::new(1.0, 0.0));
        let entity = world.spawn((transform, Still));

        integrate_motion(&mut world, &grid);
        let t = world.get::<&Transform>(entity).unwrap();
        assert_eq!(t.position, Vec2::new(12.0, 12.0));
    }
}
