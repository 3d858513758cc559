//! Headless demo loop: generate a world, spawn creatures, tick and log.
//!
//! Stands in for the renderer/input layers during development; run with
//! RUST_LOG=info to watch the world live.

use log::info;
use rand::Rng;

use tribelands::components::EntityKind;
use tribelands::engine::{commands, simulate};
use tribelands::events::{EventQueue, GameEvent};
use tribelands::grid::TileGrid;
use tribelands::GameState;

const DEMO_SEED: u64 = 2077;
const DEMO_TICKS: u64 = 3600;

fn main() {
    env_logger::init();

    let mut state = GameState::generated(DEMO_SEED);
    let mut events = EventQueue::new();
    populate(&mut state);
    plant_trees(&mut state, 12);

    for _ in 0..DEMO_TICKS {
        simulate(&mut state, &mut events);
        for event in events.drain() {
            match event {
                GameEvent::EntityDied { kind, position, .. } => {
                    info!("{:?} died at ({:.1}, {:.1})", kind, position.x, position.y);
                }
                GameEvent::EntityKilled { attacker, victim } => {
                    info!("{attacker:?} killed {victim:?}");
                }
                GameEvent::BehaviorChanged { entity, from, to } => {
                    info!("{entity:?} switched {from:?} -> {to:?}");
                }
                _ => {}
            }
        }
    }

    info!(
        "simulated {} ticks ({:.0}s of game time), {} entities remain",
        state.clock.tick,
        state.clock.time,
        state.world.len()
    );
}

/// Scatter a starting cast across walkable tiles.
fn populate(state: &mut GameState) {
    let mut placed = 0;
    let mut commanded = false;
    let mut events = EventQueue::new();
    while placed < 24 {
        let x = state.rng.gen_range(0..state.grid.width) as i32;
        let y = state.rng.gen_range(0..state.grid.height) as i32;
        if !state.grid.is_walkable(x, y) {
            continue;
        }
        let kind = match placed % 4 {
            0 => EntityKind::Tribesman,
            1 | 2 => EntityKind::Zombie,
            _ => EntityKind::Deer,
        };
        let position = TileGrid::tile_center(x, y);
        if let Ok(entity) = commands::spawn_creature(state, kind, position) {
            if kind == EntityKind::Tribesman && !commanded {
                // Send the first tribesman marching toward the map center.
                let goal = (state.grid.width as i32 / 2, state.grid.height as i32 / 2);
                if commands::command_move_to_tile(state, entity, goal, &mut events).is_ok() {
                    info!("{entity:?} commanded to {goal:?}");
                    commanded = true;
                }
            }
            placed += 1;
        } else {
            break;
        }
    }
    info!("spawned {placed} creatures");
}

fn plant_trees(state: &mut GameState, count: usize) {
    let mut planted = 0;
    while planted < count {
        let x = state.rng.gen_range(0..state.grid.width) as i32;
        let y = state.rng.gen_range(0..state.grid.height) as i32;
        if !state.grid.is_walkable(x, y) {
            continue;
        }
        if commands::spawn_creature(state, EntityKind::Tree, TileGrid::tile_center(x, y)).is_ok() {
            planted += 1;
        }
    }
}
