//! Data-driven creature spawning.
//!
//! Defines the creature types and the component bundles they spawn with.
//! Construction is where the component requirements hold: anything given a
//! hitbox or a brain is also given a transform, so the tick systems never
//! re-check.

use glam::Vec2;
use hecs::{Entity, World};

use crate::behavior::{
    Behavior, BehaviorId, Brain, FollowBehavior, MeleeStrike, Script, ScriptedBehavior,
    SwitchCondition, SwitchRule, TargetPriority, WanderBehavior,
};
use crate::board::Board;
use crate::components::{
    ChunkMember, EntityKind, Health, Hitbox, RevealsFog, StatusEffects, Still, Transform, Tribe,
};
use crate::constants::*;
use crate::error::CommandError;
use crate::tile::Biome;

/// Tribe every player-side tribesman spawns into.
pub const DEFAULT_TRIBE: Tribe = Tribe(0);

/// Spawn a creature of the given kind. The position must be on the board;
/// out-of-bounds spawns are rejected, never wrapped or clamped.
pub fn spawn_creature(
    world: &mut World,
    board: &mut Board,
    kind: EntityKind,
    position: Vec2,
) -> Result<Entity, CommandError> {
    let chunk = board.chunk_index(position).ok_or(CommandError::OutOfBounds)?;

    let entity = match kind {
        EntityKind::Tribesman => world.spawn((
            Transform::new(position, TRIBESMAN_TERMINAL_VELOCITY),
            kind,
            Hitbox::circle(TRIBESMAN_RADIUS),
            Health::new(TRIBESMAN_HEALTH),
            DEFAULT_TRIBE,
            StatusEffects::new(),
            RevealsFog { radius: TRIBESMAN_REVEAL_RADIUS },
            tribesman_brain(),
            ChunkMember { chunk },
        )),
        EntityKind::Zombie => world.spawn((
            Transform::new(position, ZOMBIE_TERMINAL_VELOCITY),
            kind,
            Hitbox::circle(ZOMBIE_RADIUS),
            Health::new(ZOMBIE_HEALTH),
            StatusEffects::new(),
            zombie_brain(),
            ChunkMember { chunk },
        )),
        EntityKind::Deer => world.spawn((
            Transform::new(position, DEER_TERMINAL_VELOCITY),
            kind,
            Hitbox::circle(DEER_RADIUS),
            Health::new(DEER_HEALTH),
            StatusEffects::new(),
            deer_brain(),
            ChunkMember { chunk },
        )),
        EntityKind::Tree => world.spawn((
            Transform::new(position, 0.0),
            kind,
            Hitbox::rect(TREE_SIDE, TREE_SIDE),
            Health::new(TREE_HEALTH),
            Still,
            ChunkMember { chunk },
        )),
    };

    board.insert(entity, kind.category(), chunk);
    Ok(entity)
}

/// Explicitly remove an entity: unfile it from its chunk and despawn it.
pub fn despawn(world: &mut World, board: &mut Board, entity: Entity) -> Result<(), CommandError> {
    let removal = {
        let kind = world.get::<&EntityKind>(entity).map_err(|_| CommandError::NoSuchEntity)?;
        let member = world.get::<&ChunkMember>(entity).map_err(|_| CommandError::NoSuchEntity)?;
        (kind.category(), member.chunk)
    };
    board.remove(entity, removal.0, removal.1);
    world.despawn(entity).map_err(|_| CommandError::NoSuchEntity)
}

fn tribesman_brain() -> Brain {
    Brain::new(BehaviorId::Wander)
        .with_behavior(Behavior::Wander(WanderBehavior::new(
            TRIBESMAN_WANDER_RATE,
            WANDER_SEARCH_RADIUS,
            vec![Biome::Plains, Biome::Forest],
            TRIBESMAN_ACCELERATION,
        )))
        .with_behavior(Behavior::Scripted(
            ScriptedBehavior::new(Script::Idle, TRIBESMAN_ACCELERATION).with_switch(SwitchRule {
                condition: SwitchCondition::ScriptFinished,
                to: BehaviorId::Wander,
            }),
        ))
}

fn zombie_brain() -> Brain {
    let prey = vec![EntityKind::Tribesman, EntityKind::Deer];
    Brain::new(BehaviorId::Wander)
        .with_behavior(Behavior::Wander(
            WanderBehavior::new(
                ZOMBIE_WANDER_RATE,
                WANDER_SEARCH_RADIUS,
                vec![Biome::Swamp],
                ZOMBIE_ACCELERATION,
            )
            .with_switch(SwitchRule {
                condition: SwitchCondition::HostileWithin {
                    radius: ZOMBIE_SIGHT_RADIUS,
                    kinds: prey.clone(),
                },
                to: BehaviorId::Follow,
            }),
        ))
        .with_behavior(Behavior::Follow(
            FollowBehavior::new(
                ZOMBIE_SIGHT_RADIUS,
                prey.clone(),
                TargetPriority::Nearest,
                ZOMBIE_ACCELERATION,
            )
            .with_strike(MeleeStrike {
                range: ZOMBIE_STRIKE_RANGE,
                radius: ZOMBIE_STRIKE_RADIUS,
                damage: ZOMBIE_STRIKE_DAMAGE,
                knockback: ZOMBIE_STRIKE_KNOCKBACK,
                cooldown_ticks: ZOMBIE_STRIKE_COOLDOWN_TICKS,
                pierce: ZOMBIE_STRIKE_PIERCE,
                cooldown_left: 0,
            })
            .with_switch(SwitchRule {
                condition: SwitchCondition::NoHostileWithin {
                    radius: ZOMBIE_SIGHT_RADIUS * FOLLOW_LEASH_FACTOR,
                    kinds: prey,
                },
                to: BehaviorId::Wander,
            }),
        ))
}

fn deer_brain() -> Brain {
    let threats = vec![EntityKind::Zombie, EntityKind::Tribesman];
    Brain::new(BehaviorId::Wander)
        .with_behavior(Behavior::Wander(WanderBehavior::new(
            DEER_WANDER_RATE,
            WANDER_SEARCH_RADIUS,
            vec![Biome::Forest, Biome::Plains],
            DEER_ACCELERATION,
        )))
        .with_behavior(Behavior::Scripted(
            ScriptedBehavior::new(
                Script::FleeFromKinds {
                    kinds: threats.clone(),
                    radius: DEER_FLEE_RADIUS * FOLLOW_LEASH_FACTOR,
                },
                DEER_ACCELERATION,
            )
            .with_switch(SwitchRule {
                condition: SwitchCondition::NoHostileWithin {
                    radius: DEER_FLEE_RADIUS * FOLLOW_LEASH_FACTOR,
                    kinds: threats.clone(),
                },
                to: BehaviorId::Wander,
            }),
        ))
        .with_global_switch(SwitchRule {
            condition: SwitchCondition::HostileWithin {
                radius: DEER_FLEE_RADIUS,
                kinds: threats,
            },
            to: BehaviorId::Scripted,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_spawn_is_rejected() {
        let mut world = World::new();
        let mut board = Board::new(128, 128);
        let result = spawn_creature(&mut world, &mut board, EntityKind::Deer, Vec2::new(-1.0, 5.0));
        assert_eq!(result.unwrap_err(), CommandError::OutOfBounds);
        assert_eq!(world.len(), 0);
    }

    #[test]
    fn spawned_creatures_carry_required_components() {
        let mut world = World::new();
        let mut board = Board::new(128, 128);
        let pos = Vec2::new(12.0, 12.0);

        for kind in [EntityKind::Tribesman, EntityKind::Zombie, EntityKind::Deer] {
            let entity = spawn_creature(&mut world, &mut board, kind, pos).unwrap();
            // Brains and hitboxes require a transform - enforced here at
            // construction, not per tick.
            assert!(world.get::<&Transform>(entity).is_ok());
            assert!(world.get::<&Hitbox>(entity).is_ok());
            assert!(world.get::<&Brain>(entity).is_ok());
            let member = world.get::<&ChunkMember>(entity).unwrap();
            assert!(board.contains(entity, kind.category(), member.chunk));
        }
    }

    #[test]
    fn despawn_unfiles_from_board() {
        let mut world = World::new();
        let mut board = Board::new(128, 128);
        let pos = Vec2::new(12.0, 12.0);
        let entity = spawn_creature(&mut world, &mut board, EntityKind::Zombie, pos).unwrap();
        let chunk = board.chunk_index(pos).unwrap();

        despawn(&mut world, &mut board, entity).unwrap();
        assert!(!world.contains(entity));
        assert!(!board.contains(entity, EntityKind::Zombie.category(), chunk));

        // A second removal reports the missing entity.
        assert_eq!(despawn(&mut world, &mut board, entity), Err(CommandError::NoSuchEntity));
    }
}
