//! AI decision-making: switch evaluation and behavior ticks.
//!
//! Per entity and tick: global switch rules are evaluated first, then the
//! active state's own rules. Any hit changes the active state and consumes
//! the entity's AI turn; otherwise the active behavior runs.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;

use crate::behavior::{
    Behavior, BehaviorId, Brain, FollowBehavior, Script, ScriptedBehavior, SwitchCondition,
    SwitchRule, TargetPriority, WanderBehavior,
};
use crate::board::Board;
use crate::components::{EntityKind, Health, Transform};
use crate::constants::{
    FOLLOW_LEASH_FACTOR, KNOCKBACK_DEFAULT_TICKS, REACH_EPSILON_SQUARED, TICK_DURATION, TILE_SIZE,
};
use crate::events::{EventQueue, GameEvent};
use crate::grid::TileGrid;
use crate::queries;
use crate::systems::combat::{AttackInfo, DamageSpec, KnockbackSpec};

/// Run one AI turn for every entity with a brain.
pub fn think(
    world: &mut World,
    grid: &TileGrid,
    board: &Board,
    rng: &mut impl Rng,
    attacks: &mut Vec<AttackInfo>,
    events: &mut EventQueue,
) {
    puffin::profile_function!();

    let agents: Vec<Entity> = world
        .query::<(&Brain, &Transform)>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    for entity in agents {
        think_one(world, grid, board, entity, rng, attacks, events);
    }
}

fn think_one(
    world: &World,
    grid: &TileGrid,
    board: &Board,
    entity: Entity,
    rng: &mut impl Rng,
    attacks: &mut Vec<AttackInfo>,
    events: &mut EventQueue,
) {
    let Some(position) = queries::position_of(world, entity) else {
        return;
    };

    let switched = {
        let Ok(brain) = world.get::<&Brain>(entity) else {
            return;
        };
        let active = brain.active();
        first_matching(world, board, entity, position, &brain, brain.global_switches(), active)
            .or_else(|| {
                first_matching(
                    world,
                    board,
                    entity,
                    position,
                    &brain,
                    brain.active_behavior().switches(),
                    active,
                )
            })
            .map(|to| (active, to))
    };

    if let Some((from, to)) = switched {
        if let Ok(mut brain) = world.get::<&mut Brain>(entity) {
            brain.switch_to(to);
        }
        // The incoming behavior starts from clean motion.
        stop_motion(world, entity);
        events.push(GameEvent::BehaviorChanged { entity, from, to });
        return;
    }

    let Ok(mut brain) = world.get::<&mut Brain>(entity) else {
        return;
    };
    match brain.active_behavior_mut() {
        Behavior::Wander(wander) => wander_tick(world, grid, entity, position, wander, rng),
        Behavior::Follow(follow) => follow_tick(world, board, entity, position, follow, attacks),
        Behavior::Scripted(scripted) => scripted_tick(world, board, entity, position, scripted),
    }
}

fn first_matching(
    world: &World,
    board: &Board,
    entity: Entity,
    position: Vec2,
    brain: &Brain,
    rules: &[SwitchRule],
    active: BehaviorId,
) -> Option<BehaviorId> {
    rules
        .iter()
        .find(|rule| rule.to != active && condition_met(world, board, entity, position, brain, &rule.condition))
        .map(|rule| rule.to)
}

fn condition_met(
    world: &World,
    board: &Board,
    entity: Entity,
    position: Vec2,
    brain: &Brain,
    condition: &SwitchCondition,
) -> bool {
    match condition {
        SwitchCondition::HostileWithin { radius, kinds } => {
            any_alive_kind_within(world, board, entity, position, *radius, kinds)
        }
        SwitchCondition::NoHostileWithin { radius, kinds } => {
            !any_alive_kind_within(world, board, entity, position, *radius, kinds)
        }
        SwitchCondition::HealthBelow { fraction } => world
            .get::<&Health>(entity)
            .map(|health| health.fraction() < *fraction)
            .unwrap_or(false),
        SwitchCondition::ScriptFinished => matches!(
            brain.behavior(BehaviorId::Scripted),
            Some(Behavior::Scripted(scripted)) if scripted.finished
        ),
    }
}

fn any_alive_kind_within(
    world: &World,
    board: &Board,
    entity: Entity,
    position: Vec2,
    radius: f32,
    kinds: &[EntityKind],
) -> bool {
    board.entities_in_range(world, position, radius).into_iter().any(|other| {
        other != entity
            && world.get::<&EntityKind>(other).map(|kind| kinds.contains(&kind)).unwrap_or(false)
            && queries::is_alive(world, other)
    })
}

// ---------------------------------------------------------------------------
// wander
// ---------------------------------------------------------------------------

fn wander_tick(
    world: &World,
    grid: &TileGrid,
    entity: Entity,
    position: Vec2,
    wander: &mut WanderBehavior,
    rng: &mut impl Rng,
) {
    if let Some(target) = wander.target {
        if target_reached(world, entity, target) {
            wander.target = None;
            stop_motion(world, entity);
        } else {
            steer_toward(world, entity, target, wander.acceleration);
        }
        return;
    }

    let p = (wander.rate_per_sec * TICK_DURATION).clamp(0.0, 1.0);
    if rng.gen_bool(p as f64) {
        wander.target = Some(pick_destination(grid, position, wander, rng));
    }
}

/// Pick a wander destination biased toward the preferred biomes within the
/// search radius. Zero candidate tiles falls back to a random point inside
/// the entity's own current tile.
fn pick_destination(
    grid: &TileGrid,
    position: Vec2,
    wander: &WanderBehavior,
    rng: &mut impl Rng,
) -> Vec2 {
    let (cx, cy) = TileGrid::world_to_tile(position);
    let mut preferred = Vec::new();
    let mut fallback = Vec::new();

    for y in (cy - wander.search_radius)..=(cy + wander.search_radius) {
        for x in (cx - wander.search_radius)..=(cx + wander.search_radius) {
            if (x, y) == (cx, cy) {
                continue;
            }
            let Some(tile) = grid.get(x, y) else { continue };
            if tile.is_wall {
                continue;
            }
            if wander.preferred_biomes.contains(&tile.biome) {
                preferred.push((x, y));
            } else {
                fallback.push((x, y));
            }
        }
    }

    let choice = if !preferred.is_empty() && (fallback.is_empty() || rng.gen_bool(0.75)) {
        Some(preferred[rng.gen_range(0..preferred.len())])
    } else if !fallback.is_empty() {
        Some(fallback[rng.gen_range(0..fallback.len())])
    } else {
        None
    };

    match choice {
        Some((x, y)) => TileGrid::tile_center(x, y),
        None => Vec2::new(
            (cx as f32 + rng.gen::<f32>()) * TILE_SIZE,
            (cy as f32 + rng.gen::<f32>()) * TILE_SIZE,
        ),
    }
}

// ---------------------------------------------------------------------------
// follow
// ---------------------------------------------------------------------------

fn follow_tick(
    world: &World,
    board: &Board,
    entity: Entity,
    position: Vec2,
    follow: &mut FollowBehavior,
    attacks: &mut Vec<AttackInfo>,
) {
    if let Some(strike) = &mut follow.strike {
        if strike.cooldown_left > 0 {
            strike.cooldown_left -= 1;
        }
    }

    // Re-validate the acquired target every tick.
    if let Some(target) = follow.target {
        if !target_valid(world, target, position, follow.search_radius * FOLLOW_LEASH_FACTOR) {
            follow.target = None;
        }
    }
    if follow.target.is_none() {
        follow.target = targets_in_search_radius(world, board, entity, position, follow)
            .into_iter()
            .next();
    }

    let Some(target) = follow.target else {
        stop_motion(world, entity);
        return;
    };
    let Some(target_position) = queries::position_of(world, target) else {
        follow.target = None;
        return;
    };

    steer_toward(world, entity, target_position, follow.acceleration);

    if let Some(strike) = &mut follow.strike {
        if strike.cooldown_left == 0 && position.distance(target_position) <= strike.range {
            attacks.push(AttackInfo {
                origin: position,
                position: target_position,
                attacker: Some(entity),
                radius: strike.radius,
                damage: DamageSpec::Flat(strike.damage),
                pierce: strike.pierce,
                knockback: KnockbackSpec::Fixed {
                    strength: strike.knockback,
                    ticks: KNOCKBACK_DEFAULT_TICKS,
                },
            });
            strike.cooldown_left = strike.cooldown_ticks;
        }
    }
}

fn target_valid(world: &World, target: Entity, position: Vec2, leash: f32) -> bool {
    if !queries::is_alive(world, target) {
        return false;
    }
    match queries::position_of(world, target) {
        Some(target_position) => position.distance(target_position) <= leash,
        None => false,
    }
}

/// Range query filtered to the follow allow-list and sorted by the
/// configured priority. Deterministic for a fixed world state: ties break
/// on entity id.
pub fn targets_in_search_radius(
    world: &World,
    board: &Board,
    entity: Entity,
    position: Vec2,
    follow: &FollowBehavior,
) -> Vec<Entity> {
    let mut candidates: Vec<(Entity, f32)> = Vec::new();
    for other in board.entities_in_range(world, position, follow.search_radius) {
        if other == entity {
            continue;
        }
        let Ok(kind) = world.get::<&EntityKind>(other) else { continue };
        if !follow.allowed.contains(&kind) {
            continue;
        }
        let Ok(health) = world.get::<&Health>(other) else { continue };
        if health.is_dead() {
            continue;
        }
        let Some(other_position) = queries::position_of(world, other) else {
            continue;
        };
        let score = match follow.priority {
            TargetPriority::Nearest => position.distance(other_position),
            TargetPriority::Weakest => health.current as f32,
        };
        candidates.push((other, score));
    }

    candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.to_bits().cmp(&b.0.to_bits())));
    candidates.into_iter().map(|(entity, _)| entity).collect()
}

// ---------------------------------------------------------------------------
// scripted
// ---------------------------------------------------------------------------

fn scripted_tick(
    world: &World,
    board: &Board,
    entity: Entity,
    position: Vec2,
    scripted: &mut ScriptedBehavior,
) {
    let mut completed = false;

    match &mut scripted.script {
        Script::Idle => {}
        Script::TraversePath { waypoints, next } => loop {
            if *next >= waypoints.len() {
                completed = true;
                break;
            }
            let (x, y) = waypoints[*next];
            let waypoint = TileGrid::tile_center(x, y);
            if target_reached(world, entity, waypoint) {
                *next += 1;
                continue;
            }
            steer_toward(world, entity, waypoint, scripted.acceleration);
            break;
        },
        Script::FleeFromKinds { kinds, radius } => {
            match nearest_of_kinds(world, board, entity, position, *radius, kinds) {
                Some(threat_position) => {
                    let away = (position - threat_position).normalize_or_zero();
                    if away != Vec2::ZERO {
                        steer_toward(world, entity, position + away * 2.0 * TILE_SIZE, scripted.acceleration);
                    }
                }
                None => stop_motion(world, entity),
            }
        }
    }

    if completed {
        scripted.script = Script::Idle;
        scripted.finished = true;
        stop_motion(world, entity);
    }
}

fn nearest_of_kinds(
    world: &World,
    board: &Board,
    entity: Entity,
    position: Vec2,
    radius: f32,
    kinds: &[EntityKind],
) -> Option<Vec2> {
    let mut best: Option<(Vec2, f32, u64)> = None;
    for other in board.entities_in_range(world, position, radius) {
        if other == entity {
            continue;
        }
        let allowed = world
            .get::<&EntityKind>(other)
            .map(|kind| kinds.contains(&kind))
            .unwrap_or(false);
        if !allowed || !queries::is_alive(world, other) {
            continue;
        }
        let Some(other_position) = queries::position_of(world, other) else {
            continue;
        };
        let distance = position.distance(other_position);
        let id = other.to_bits().get();
        let better = match best {
            Some((_, best_distance, best_id)) => {
                distance < best_distance || (distance == best_distance && id < best_id)
            }
            None => true,
        };
        if better {
            best = Some((other_position, distance, id));
        }
    }
    best.map(|(pos, _, _)| pos)
}

// ---------------------------------------------------------------------------
// movement helpers
// ---------------------------------------------------------------------------

fn steer_toward(world: &World, entity: Entity, point: Vec2, acceleration: f32) {
    let Ok(mut transform) = world.get::<&mut Transform>(entity) else {
        return;
    };
    let direction = (point - transform.position).normalize_or_zero();
    if direction == Vec2::ZERO {
        transform.acceleration = None;
        return;
    }
    transform.acceleration = Some(direction * acceleration);
    transform.rotation = direction.y.atan2(direction.x);
}

fn stop_motion(world: &World, entity: Entity) {
    if let Ok(mut transform) = world.get::<&mut Transform>(entity) {
        transform.acceleration = None;
    }
}

/// Whether the entity has reached (or passed) a steering target.
///
/// Reaching is detected by the velocity/to-target dot product changing sign:
/// the entity has "passed" the point. This is deliberately approximate and
/// can trigger early on fast entities with large ticks.
fn target_reached(world: &World, entity: Entity, target: Vec2) -> bool {
    let Ok(transform) = world.get::<&Transform>(entity) else {
        return true;
    };
    let to_target = target - transform.position;
    if to_target.length_squared() <= REACH_EPSILON_SQUARED {
        return true;
    }
    match transform.velocity {
        Some(velocity) => velocity.dot(to_target) < 0.0,
        None => false,
    }
}
