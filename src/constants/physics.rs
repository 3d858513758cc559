//! Fixed-timestep and motion constants.

/// Simulation ticks per second.
pub const TICKS_PER_SECOND: f32 = 60.0;

/// Duration of one simulation tick in seconds.
pub const TICK_DURATION: f32 = 1.0 / TICKS_PER_SECOND;

/// Speed below which a coasting entity is considered stopped and its
/// velocity removed outright.
pub const REST_SPEED: f32 = 1e-3;

/// Squared distance at which a steering target counts as reached even
/// without a velocity sign flip (degenerate zero-distance guard).
pub const REACH_EPSILON_SQUARED: f32 = 1e-6;

/// Speed multiplier applied while the Slowed effect is active.
pub const SLOWED_SPEED_FACTOR: f32 = 0.5;
