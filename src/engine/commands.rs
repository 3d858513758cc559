//! Command entry points consumed from the input layer.
//!
//! Every command validates against current world bounds and entity
//! existence; invalid requests are rejected as no-ops with a typed reason,
//! never a crash. The player-facing contract is "the action silently did
//! nothing".

use glam::Vec2;
use hecs::Entity;
use log::debug;

use crate::behavior::{Behavior, BehaviorId, Brain, Script};
use crate::components::EntityKind;
use crate::error::CommandError;
use crate::events::{EventQueue, GameEvent};
use crate::grid::TileGrid;
use crate::pathfinding;
use crate::spawning;
use crate::systems::combat::{self, AttackInfo};

use super::game_state::GameState;

/// Spawn a creature of the given kind at a world position.
pub fn spawn_creature(
    state: &mut GameState,
    kind: EntityKind,
    position: Vec2,
) -> Result<Entity, CommandError> {
    spawning::spawn_creature(&mut state.world, &mut state.board, kind, position).map_err(|err| {
        debug!("spawn of {kind:?} at {position:?} rejected: {err}");
        err
    })
}

/// Command an entity to walk to a tile.
///
/// Pathfinds from the entity's current tile, installs the path on its
/// scripted behavior and makes that behavior active. Fails as a no-op when
/// the entity is gone, has no scripted behavior, the tile is off the grid,
/// or no path exists (walls included).
pub fn command_move_to_tile(
    state: &mut GameState,
    entity: Entity,
    tile: (i32, i32),
    events: &mut EventQueue,
) -> Result<(), CommandError> {
    if !state.grid.in_bounds(tile.0, tile.1) {
        debug!("move command to off-grid tile {tile:?} rejected");
        return Err(CommandError::OutOfBounds);
    }
    let position =
        crate::queries::position_of(&state.world, entity).ok_or(CommandError::NoSuchEntity)?;

    let start = TileGrid::world_to_tile(position);
    let waypoints =
        pathfinding::find_path(&state.grid, start, tile).ok_or(CommandError::NoPath)?;

    let Ok(mut brain) = state.world.get::<&mut Brain>(entity) else {
        return Err(CommandError::NotCommandable);
    };
    let Some(Behavior::Scripted(scripted)) = brain.behavior_mut(BehaviorId::Scripted) else {
        return Err(CommandError::NotCommandable);
    };
    scripted.script = Script::TraversePath { waypoints, next: 0 };
    scripted.finished = false;

    let from = brain.active();
    if from != BehaviorId::Scripted {
        brain.switch_to(BehaviorId::Scripted);
        events.push(GameEvent::BehaviorChanged { entity, from, to: BehaviorId::Scripted });
    }
    Ok(())
}

/// Apply an attack from the input layer (or a scripted ability).
///
/// The affected position must be on the board; the attack is otherwise
/// resolved exactly like an AI-queued one. Returns the number of entities
/// hit.
pub fn apply_damage(
    state: &mut GameState,
    attack: AttackInfo,
    events: &mut EventQueue,
) -> Result<usize, CommandError> {
    if state.board.chunk_index(attack.position).is_none() {
        debug!("attack at {:?} rejected: off the board", attack.position);
        return Err(CommandError::OutOfBounds);
    }
    Ok(combat::apply_attack(&mut state.world, &state.board, &attack, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::combat::{DamageSpec, KnockbackSpec};
    use crate::tile::{Biome, Tile, TileKind};

    fn flat_state(seed: u64) -> GameState {
        GameState::flat(64, 64, Tile::new(TileKind::Grass, Biome::Plains), seed)
    }

    #[test]
    fn move_command_requires_live_commandable_entity() {
        let mut state = flat_state(1);
        let mut events = EventQueue::new();

        let unit = spawn_creature(&mut state, EntityKind::Tribesman, Vec2::new(10.5, 10.5)).unwrap();
        assert!(command_move_to_tile(&mut state, unit, (12, 12), &mut events).is_ok());

        // Trees have no brain at all.
        let tree = spawn_creature(&mut state, EntityKind::Tree, Vec2::new(20.5, 20.5)).unwrap();
        assert_eq!(
            command_move_to_tile(&mut state, tree, (12, 12), &mut events),
            Err(CommandError::NotCommandable)
        );

        crate::spawning::despawn(&mut state.world, &mut state.board, unit).unwrap();
        assert_eq!(
            command_move_to_tile(&mut state, unit, (12, 12), &mut events),
            Err(CommandError::NoSuchEntity)
        );
    }

    #[test]
    fn move_command_rejects_walls_and_off_grid_tiles() {
        let mut state = flat_state(1);
        let mut events = EventQueue::new();
        *state.grid.get_mut(12, 12).unwrap() = Tile::new(TileKind::Rock, Biome::Mountain);

        let unit = spawn_creature(&mut state, EntityKind::Tribesman, Vec2::new(10.5, 10.5)).unwrap();
        assert_eq!(
            command_move_to_tile(&mut state, unit, (12, 12), &mut events),
            Err(CommandError::NoPath)
        );
        assert_eq!(
            command_move_to_tile(&mut state, unit, (99, 3), &mut events),
            Err(CommandError::OutOfBounds)
        );
    }

    #[test]
    fn out_of_bounds_attack_is_a_no_op() {
        let mut state = flat_state(1);
        let mut events = EventQueue::new();
        let attack = AttackInfo {
            origin: Vec2::new(-5.0, 3.0),
            position: Vec2::new(-5.0, 3.0),
            attacker: None,
            radius: 2.0,
            damage: DamageSpec::Flat(10),
            pierce: 3,
            knockback: KnockbackSpec::None,
        };
        assert_eq!(apply_damage(&mut state, attack, &mut events), Err(CommandError::OutOfBounds));
        assert!(events.is_empty());
    }
}
