//! The fixed-timestep tick pipeline.

use crate::events::EventQueue;
use crate::systems::{ai, collision, combat, effects, fog, physics};

use super::game_state::GameState;

/// Advance the whole simulation by one tick.
///
/// Step order is significant and preserved: motion integrates before chunk
/// membership is reassigned, membership before collision transitions,
/// collisions before status effects, effects before AI (so switch
/// conditions observe post-damage health), AI before the attacks it queued
/// this tick, attacks before death reaping. Fog and the clock close the
/// tick. Nothing suspends mid-tick; events accumulate in `events` for the
/// embedding layer to drain afterwards.
pub fn simulate(state: &mut GameState, events: &mut EventQueue) {
    puffin::profile_function!();

    physics::integrate_motion(&mut state.world, &state.grid);
    physics::update_chunk_membership(&mut state.world, &mut state.board);
    collision::detect_transitions(&mut state.world, &state.board, events);
    effects::tick_status_effects(&mut state.world, events);
    ai::think(
        &mut state.world,
        &state.grid,
        &state.board,
        &mut state.rng,
        &mut state.pending_attacks,
        events,
    );

    let attacks = std::mem::take(&mut state.pending_attacks);
    for attack in &attacks {
        combat::apply_attack(&mut state.world, &state.board, attack, events);
    }

    combat::reap_dead(&mut state.world, &mut state.board, events);
    fog::update_fog(&state.world, &mut state.grid);
    state.clock.advance();
}
