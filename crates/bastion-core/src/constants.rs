//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick, as used by the per-tick systems.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

/// Seconds per tick, as used by the frame clock accumulator.
pub const FIXED_STEP: f64 = 1.0 / TICK_RATE as f64;

/// Largest wall-clock delta a single frame may feed into the accumulator.
/// Bounds the catch-up work after a stall.
pub const MAX_FRAME_DELTA: f64 = 0.25;

/// Slack when comparing the accumulator against the fixed step.
pub const ACCUMULATOR_EPSILON: f64 = 1e-9;

/// Upper bound for the user-settable time scale.
pub const MAX_TIME_SCALE: f64 = 4.0;

/// Largest level grid accepted, in cells.
pub const MAX_GRID_CELLS: u32 = 1 << 20;

// --- Progress ---

/// Gold at level start.
pub const STARTING_GOLD: u32 = 100;

/// Lives at level start.
pub const STARTING_LIVES: u32 = 20;

/// Lives lost per enemy that reaches the final waypoint.
pub const LEAK_DAMAGE: u32 = 1;

// --- Waves ---

/// Flat gold granted on wave completion.
pub const WAVE_BASE_REWARD: u32 = 100;

/// Interest on wave completion is `gold / WAVE_INTEREST_DIVISOR` (10%).
pub const WAVE_INTEREST_DIVISOR: u32 = 10;

/// Wall-clock delay before an auto-started wave begins (seconds).
pub const AUTO_START_DELAY_SECS: f64 = 3.0;

// --- Combat ---

/// Cooldowns at or below this count as elapsed. Absorbs f32 drift from
/// subtracting `DT` once per tick.
pub const COOLDOWN_EPSILON: f32 = 1e-4;

/// Radius within which a homing projectile counts as having hit.
pub const PROJECTILE_HIT_RADIUS: f32 = 10.0;

/// Fallback draw size of a projectile.
pub const PROJECTILE_SIZE: f32 = 5.0;

/// Fallback colour of a projectile.
pub const PROJECTILE_COLOR: &str = "yellow";

/// Fallback draw size of a tower.
pub const TOWER_SIZE: f32 = 40.0;
