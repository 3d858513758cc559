//! Per-creature stats and tuning.

// TRIBESMAN
/// Tribesman health
pub const TRIBESMAN_HEALTH: i32 = 100;
/// Tribesman hitbox radius
pub const TRIBESMAN_RADIUS: f32 = 0.45;
/// Tribesman terminal velocity (world-units per second)
pub const TRIBESMAN_TERMINAL_VELOCITY: f32 = 4.5;
/// Tribesman steering acceleration
pub const TRIBESMAN_ACCELERATION: f32 = 18.0;
/// Radius around a tribesman in which fog is revealed
pub const TRIBESMAN_REVEAL_RADIUS: f32 = 8.0;
/// Wander trials per second while idle
pub const TRIBESMAN_WANDER_RATE: f32 = 0.25;

// ZOMBIE
/// Zombie health
pub const ZOMBIE_HEALTH: i32 = 60;
/// Zombie hitbox radius
pub const ZOMBIE_RADIUS: f32 = 0.5;
/// Zombie terminal velocity (slower than a fleeing tribesman)
pub const ZOMBIE_TERMINAL_VELOCITY: f32 = 3.2;
/// Zombie steering acceleration
pub const ZOMBIE_ACCELERATION: f32 = 14.0;
/// Radius in which a zombie notices prey
pub const ZOMBIE_SIGHT_RADIUS: f32 = 7.0;
/// Wander trials per second while no prey is around
pub const ZOMBIE_WANDER_RATE: f32 = 0.15;
/// Distance at which a zombie can strike
pub const ZOMBIE_STRIKE_RANGE: f32 = 0.9;
/// Query radius of the strike around the target position
pub const ZOMBIE_STRIKE_RADIUS: f32 = 0.6;
/// Strike damage
pub const ZOMBIE_STRIKE_DAMAGE: i32 = 8;
/// Strike knockback strength (world-units per second)
pub const ZOMBIE_STRIKE_KNOCKBACK: f32 = 6.0;
/// Ticks between strikes
pub const ZOMBIE_STRIKE_COOLDOWN_TICKS: u32 = 45;
/// Entities a single strike can hit
pub const ZOMBIE_STRIKE_PIERCE: usize = 1;

// DEER
/// Deer health
pub const DEER_HEALTH: i32 = 30;
/// Deer hitbox radius
pub const DEER_RADIUS: f32 = 0.4;
/// Deer terminal velocity (fast)
pub const DEER_TERMINAL_VELOCITY: f32 = 5.5;
/// Deer steering acceleration
pub const DEER_ACCELERATION: f32 = 20.0;
/// Radius in which a deer startles and flees
pub const DEER_FLEE_RADIUS: f32 = 5.0;
/// Wander trials per second while calm
pub const DEER_WANDER_RATE: f32 = 0.35;

// TREE
/// Tree health (trees are choppable props)
pub const TREE_HEALTH: i32 = 80;
/// Tree hitbox side length
pub const TREE_SIDE: f32 = 0.8;
