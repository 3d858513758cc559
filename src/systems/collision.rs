//! Overlap tracking and collision transition events.

use std::collections::HashSet;

use glam::Vec2;
use hecs::{Entity, World};

use crate::board::Board;
use crate::components::{shapes_overlap, CollisionWatcher, Hitbox, Shape, Transform};
use crate::events::{EventQueue, GameEvent};

/// Recompute overlap sets for every entity subscribed to collision
/// transitions and fire enter/stay/exit events against last tick's set.
///
/// Only entities carrying a `CollisionWatcher` pay for this; each tracks its
/// own view independently. An entity is never reported colliding with
/// itself.
pub fn detect_transitions(world: &mut World, board: &Board, events: &mut EventQueue) {
    puffin::profile_function!();

    let subjects: Vec<(Entity, Vec2, Shape)> = world
        .query::<(&Transform, &Hitbox)>()
        .with::<&CollisionWatcher>()
        .iter()
        .map(|(entity, (transform, hitbox))| (entity, transform.position, hitbox.shape))
        .collect();

    for (entity, position, shape) in subjects {
        let current = current_overlaps(world, board, entity, position, &shape);

        let Ok(mut watcher) = world.get::<&mut CollisionWatcher>(entity) else {
            continue;
        };

        for &other in &current {
            if watcher.overlapping.contains(&other) {
                if watcher.on_stay {
                    events.push(GameEvent::CollisionOngoing { entity, other });
                }
            } else if watcher.on_enter {
                events.push(GameEvent::CollisionStarted { entity, other });
            }
        }
        if watcher.on_exit {
            for &other in &watcher.overlapping {
                if !current.contains(&other) {
                    events.push(GameEvent::CollisionEnded { entity, other });
                }
            }
        }

        watcher.overlapping = current;
    }
}

/// Broad phase: range query sized to the entity's bounding radius. Narrow
/// phase: shape-vs-shape overlap, or point containment for entities without
/// a hitbox.
fn current_overlaps(
    world: &World,
    board: &Board,
    entity: Entity,
    position: Vec2,
    shape: &Shape,
) -> HashSet<Entity> {
    let mut overlaps = HashSet::new();
    for other in board.entities_in_range(world, position, shape.bounding_radius()) {
        if other == entity {
            continue;
        }
        let Ok(other_transform) = world.get::<&Transform>(other) else {
            continue;
        };
        let hit = match world.get::<&Hitbox>(other) {
            Ok(other_hitbox) => {
                shapes_overlap(position, shape, other_transform.position, &other_hitbox.shape)
            }
            Err(_) => shape.within_range(position, other_transform.position, 0.0),
        };
        if hit {
            overlaps.insert(other);
        }
    }
    overlaps
}
