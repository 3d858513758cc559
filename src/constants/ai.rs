//! AI behavior constants.

/// A follow target acquired inside the search radius is only dropped once it
/// leaves search_radius * this factor (hysteresis against flapping).
pub const FOLLOW_LEASH_FACTOR: f32 = 1.5;

/// Half-side of the square of candidate tiles a wander destination is
/// drawn from, in tiles.
pub const WANDER_SEARCH_RADIUS: i32 = 6;
