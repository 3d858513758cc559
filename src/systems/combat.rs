//! Attack application and death reaping.

use glam::Vec2;
use hecs::{Entity, World};

use crate::board::Board;
use crate::components::{ChunkMember, EntityKind, Health, Knockback, Transform, Tribe};
use crate::events::{EventQueue, GameEvent};

/// Damage of an attack, resolved per target.
#[derive(Debug, Clone, Copy)]
pub enum DamageSpec {
    Flat(i32),
    /// Damage shrinking with the target's distance from the attack origin.
    DistanceFalloff { base: i32, per_unit: f32 },
}

impl DamageSpec {
    pub fn amount(&self, distance: f32) -> i32 {
        match *self {
            DamageSpec::Flat(amount) => amount,
            DamageSpec::DistanceFalloff { base, per_unit } => {
                (base as f32 - per_unit * distance).max(0.0) as i32
            }
        }
    }
}

/// Knockback of an attack, resolved per target. Direction is always away
/// from the attack origin.
#[derive(Debug, Clone, Copy)]
pub enum KnockbackSpec {
    None,
    Fixed { strength: f32, ticks: u32 },
    DistanceFalloff { strength: f32, per_unit: f32, ticks: u32 },
}

impl KnockbackSpec {
    fn resolve(&self, distance: f32) -> Option<(f32, u32)> {
        match *self {
            KnockbackSpec::None => None,
            KnockbackSpec::Fixed { strength, ticks } => Some((strength, ticks)),
            KnockbackSpec::DistanceFalloff { strength, per_unit, ticks } => {
                let s = strength - per_unit * distance;
                (s > 0.0).then_some((s, ticks))
            }
        }
    }
}

/// One attack application.
#[derive(Debug, Clone)]
pub struct AttackInfo {
    /// Point damage and knockback are measured from. May differ from
    /// `position` (a swing originates at the attacker, lands at the target).
    pub origin: Vec2,
    /// Center of the affected area.
    pub position: Vec2,
    pub attacker: Option<Entity>,
    pub radius: f32,
    pub damage: DamageSpec,
    /// Maximum number of distinct entities this application may damage,
    /// closest to the origin first.
    pub pierce: usize,
    pub knockback: KnockbackSpec,
}

/// Apply an attack: query the partition around `position`, keep entities
/// with health, drop the attacker's tribe-mates, sort by distance from
/// `origin`, then damage and knock back the closest `pierce` targets.
/// Targets reduced to zero emit a kill signal to the attacker and skip
/// their knockback. Returns the number of entities hit.
pub fn apply_attack(
    world: &mut World,
    board: &Board,
    attack: &AttackInfo,
    events: &mut EventQueue,
) -> usize {
    puffin::profile_function!();

    let attacker_tribe = attack
        .attacker
        .and_then(|attacker| world.get::<&Tribe>(attacker).ok().map(|tribe| *tribe));

    let mut eligible: Vec<(Entity, f32)> = Vec::new();
    for target in board.entities_in_range(world, attack.position, attack.radius) {
        if Some(target) == attack.attacker {
            continue;
        }
        match world.get::<&Health>(target) {
            Ok(health) if !health.is_dead() => {}
            _ => continue,
        }
        if let Some(tribe) = attacker_tribe {
            if world.get::<&Tribe>(target).map(|t| *t == tribe).unwrap_or(false) {
                continue;
            }
        }
        let Ok(transform) = world.get::<&Transform>(target) else {
            continue;
        };
        eligible.push((target, transform.position.distance(attack.origin)));
    }

    eligible.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.to_bits().cmp(&b.0.to_bits())));

    let mut hits = 0;
    for (target, distance) in eligible.into_iter().take(attack.pierce) {
        let amount = attack.damage.amount(distance);
        let (current, max, dead) = {
            let Ok(mut health) = world.get::<&mut Health>(target) else {
                continue;
            };
            health.damage(amount);
            (health.current, health.max, health.is_dead())
        };
        hits += 1;
        events.push(GameEvent::EntityHurt { entity: target, attacker: attack.attacker, damage: amount });
        events.push(GameEvent::HealthChanged { entity: target, current, max });

        if dead {
            if let Some(attacker) = attack.attacker {
                events.push(GameEvent::EntityKilled { attacker, victim: target });
            }
            continue;
        }

        if let Some((strength, ticks)) = attack.knockback.resolve(distance) {
            if let Ok(mut transform) = world.get::<&mut Transform>(target) {
                let dir = (transform.position - attack.origin).normalize_or_zero();
                if dir != Vec2::ZERO {
                    transform.knockback = Some(Knockback { velocity: dir * strength, ticks_left: ticks });
                }
            }
        }
    }

    hits
}

/// Remove entities whose health reached zero: unfile them from the board,
/// emit the death and loot-drop boundary events, despawn.
///
/// Works from a snapshot since removal mutates the chunk lists being read.
pub fn reap_dead(world: &mut World, board: &mut Board, events: &mut EventQueue) {
    puffin::profile_function!();

    let mut dead: Vec<(Entity, EntityKind, Vec2, usize)> = Vec::new();
    for (entity, (health, kind, transform, member)) in world
        .query::<(&Health, &EntityKind, &Transform, &ChunkMember)>()
        .iter()
    {
        if health.is_dead() {
            dead.push((entity, *kind, transform.position, member.chunk));
        }
    }

    for (entity, kind, position, chunk) in dead {
        board.remove(entity, kind.category(), chunk);
        events.push(GameEvent::EntityDied { entity, kind, position });
        events.push(GameEvent::InventoryChanged { entity, kind, position });
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Category, Hitbox};

    fn spawn_target(world: &mut World, board: &mut Board, pos: Vec2, health: i32) -> Entity {
        let chunk = board.chunk_index(pos).unwrap();
        let entity = world.spawn((
            Transform::new(pos, 3.0),
            Hitbox::circle(0.4),
            Health::new(health),
            EntityKind::Zombie,
            ChunkMember { chunk },
        ));
        board.insert(entity, Category::Mob, chunk);
        entity
    }

    fn flat_attack(origin: Vec2, radius: f32, pierce: usize) -> AttackInfo {
        AttackInfo {
            origin,
            position: origin,
            attacker: None,
            radius,
            damage: DamageSpec::Flat(10),
            pierce,
            knockback: KnockbackSpec::None,
        }
    }

    #[test]
    fn pierce_limits_hits_to_closest_targets() {
        let mut world = World::new();
        let mut board = Board::new(128, 128);
        let mut events = EventQueue::new();

        let origin = Vec2::new(20.0, 20.0);
        let near = spawn_target(&mut world, &mut board, Vec2::new(21.0, 20.0), 50);
        let mid = spawn_target(&mut world, &mut board, Vec2::new(22.0, 20.0), 50);
        let far = spawn_target(&mut world, &mut board, Vec2::new(23.0, 20.0), 50);

        let attack = flat_attack(origin, 5.0, 2);
        assert_eq!(apply_attack(&mut world, &board, &attack, &mut events), 2);

        assert_eq!(world.get::<&Health>(near).unwrap().current, 40);
        assert_eq!(world.get::<&Health>(mid).unwrap().current, 40);
        assert_eq!(world.get::<&Health>(far).unwrap().current, 50);
    }

    #[test]
    fn falloff_damage_shrinks_with_distance_from_origin() {
        let mut world = World::new();
        let mut board = Board::new(128, 128);
        let mut events = EventQueue::new();

        let origin = Vec2::new(20.0, 20.0);
        let near = spawn_target(&mut world, &mut board, Vec2::new(21.0, 20.0), 50);
        let far = spawn_target(&mut world, &mut board, Vec2::new(24.0, 20.0), 50);

        let mut attack = flat_attack(origin, 6.0, 2);
        attack.damage = DamageSpec::DistanceFalloff { base: 12, per_unit: 2.0 };
        apply_attack(&mut world, &board, &attack, &mut events);

        // 12 - 2*1 = 10 up close, 12 - 2*4 = 4 out wide.
        assert_eq!(world.get::<&Health>(near).unwrap().current, 40);
        assert_eq!(world.get::<&Health>(far).unwrap().current, 46);
    }

    #[test]
    fn attacker_tribe_mates_are_excluded() {
        let mut world = World::new();
        let mut board = Board::new(128, 128);
        let mut events = EventQueue::new();

        let origin = Vec2::new(20.0, 20.0);
        let friend = spawn_target(&mut world, &mut board, Vec2::new(21.0, 20.0), 50);
        let foe = spawn_target(&mut world, &mut board, Vec2::new(22.0, 20.0), 50);
        world.insert_one(friend, Tribe(1)).unwrap();

        let attacker = world.spawn((Transform::new(origin, 3.0), Tribe(1)));

        let mut attack = flat_attack(origin, 5.0, 1);
        attack.attacker = Some(attacker);
        apply_attack(&mut world, &board, &attack, &mut events);

        // The nearest target is a tribe-mate; the single pierce slot goes to the foe.
        assert_eq!(world.get::<&Health>(friend).unwrap().current, 50);
        assert_eq!(world.get::<&Health>(foe).unwrap().current, 40);
    }

    #[test]
    fn lethal_hit_signals_kill_and_skips_knockback() {
        let mut world = World::new();
        let mut board = Board::new(128, 128);
        let mut events = EventQueue::new();

        let origin = Vec2::new(20.0, 20.0);
        let victim = spawn_target(&mut world, &mut board, Vec2::new(21.0, 20.0), 5);
        let attacker = world.spawn((Transform::new(origin, 3.0),));

        let mut attack = flat_attack(origin, 5.0, 1);
        attack.attacker = Some(attacker);
        attack.knockback = KnockbackSpec::Fixed { strength: 8.0, ticks: 10 };
        apply_attack(&mut world, &board, &attack, &mut events);

        assert!(world.get::<&Transform>(victim).unwrap().knockback.is_none());
        let fired: Vec<GameEvent> = events.drain().collect();
        assert!(fired.iter().any(|e| matches!(
            e,
            GameEvent::EntityKilled { attacker: a, victim: v } if *a == attacker && *v == victim
        )));
    }

    #[test]
    fn knockback_pushes_away_from_origin() {
        let mut world = World::new();
        let mut board = Board::new(128, 128);
        let mut events = EventQueue::new();

        let origin = Vec2::new(20.0, 20.0);
        let target = spawn_target(&mut world, &mut board, Vec2::new(21.0, 20.0), 50);

        let mut attack = flat_attack(origin, 5.0, 1);
        attack.knockback = KnockbackSpec::Fixed { strength: 8.0, ticks: 10 };
        apply_attack(&mut world, &board, &attack, &mut events);

        let kb = world.get::<&Transform>(target).unwrap().knockback.unwrap();
        assert!(kb.velocity.x > 0.0);
        assert_eq!(kb.ticks_left, 10);
    }

    #[test]
    fn entities_without_health_are_ignored() {
        let mut world = World::new();
        let mut board = Board::new(128, 128);
        let mut events = EventQueue::new();

        let pos = Vec2::new(20.0, 20.0);
        let chunk = board.chunk_index(pos).unwrap();
        let marker = world.spawn((Transform::new(pos, 3.0), EntityKind::Tree, ChunkMember { chunk }));
        board.insert(marker, Category::Prop, chunk);

        let attack = flat_attack(pos, 5.0, 3);
        assert_eq!(apply_attack(&mut world, &board, &attack, &mut events), 0);
    }

    #[test]
    fn reap_removes_dead_from_world_and_board() {
        let mut world = World::new();
        let mut board = Board::new(128, 128);
        let mut events = EventQueue::new();

        let pos = Vec2::new(20.0, 20.0);
        let victim = spawn_target(&mut world, &mut board, pos, 5);
        world.get::<&mut Health>(victim).unwrap().damage(10);

        reap_dead(&mut world, &mut board, &mut events);

        assert!(!world.contains(victim));
        let chunk = board.chunk_index(pos).unwrap();
        assert!(!board.contains(victim, Category::Mob, chunk));
        let fired: Vec<GameEvent> = events.drain().collect();
        assert!(fired.iter().any(|e| matches!(e, GameEvent::EntityDied { .. })));
        assert!(fired.iter().any(|e| matches!(e, GameEvent::InventoryChanged { .. })));
    }
}
