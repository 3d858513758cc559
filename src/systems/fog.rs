//! Fog reveal and decay.

use hecs::World;

use crate::components::{RevealsFog, Transform};
use crate::constants::TICK_DURATION;
use crate::grid::TileGrid;

/// Reveal tiles around fog-revealing entities, then decay fog on every
/// revealed tile. Revealing is a latch: tiles never fog back up.
pub fn update_fog(world: &World, grid: &mut TileGrid) {
    puffin::profile_function!();

    for (_, (transform, reveal)) in world.query::<(&Transform, &RevealsFog)>().iter() {
        grid.reveal_circle(transform.position, reveal.radius);
    }
    grid.decay_fog(TICK_DURATION);
}
