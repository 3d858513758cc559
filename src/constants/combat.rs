//! Attack and damage constants.

/// Ticks a knockback impulse lasts unless the attack specifies otherwise.
pub const KNOCKBACK_DEFAULT_TICKS: u32 = 10;

/// Ticks between periodic burn damage applications.
pub const BURN_DAMAGE_INTERVAL_TICKS: u32 = 30;

/// Damage per burn application.
pub const BURN_DAMAGE: i32 = 2;

/// Ticks a fresh burning effect lasts.
pub const BURN_DURATION_TICKS: u32 = 180;
