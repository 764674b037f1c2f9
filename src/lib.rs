//! Crush Runner - an endless side-scroller with a crushing ceiling
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain streaming, physics, collisions, ceiling hazard)
//! - `tuning`: Data-driven game balance
//! - `runner`: Frame pacing around the simulation tick

pub mod runner;
pub mod sim;
pub mod tuning;

pub use runner::FrameLoop;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Reference frame length the per-frame tuning values are expressed in (ms)
    pub const REFERENCE_FRAME_MS: f64 = 16.0;
    /// Largest step fed to physics and the hazard clock (ms)
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Viewport dimensions
    pub const VIEW_WIDTH: f64 = 800.0;
    pub const VIEW_HEIGHT: f64 = 600.0;

    /// Resting floor height of the flat segments
    pub const GROUND_Y: f64 = 460.0;
    /// Nothing is ever drawn or collided above this line
    pub const CEILING_TOP: f64 = 40.0;
    /// Below this the player has fallen out of the world
    pub const FALL_LIMIT_Y: f64 = VIEW_HEIGHT + 100.0;

    /// Downward acceleration per reference frame
    pub const GRAVITY: f64 = 0.8;

    /// Terrain pattern: flat -> up -> flat -> down
    pub const FLAT_LENGTH: f64 = 500.0;
    pub const SLOPE_LENGTH: f64 = 500.0;
    pub const SLOPE_ANGLE_DEG: f64 = 15.0;
    pub const TERRAIN_MIN_Y: f64 = 260.0;
    pub const TERRAIN_MAX_Y: f64 = GROUND_Y + 40.0;

    /// Chunk streaming
    pub const CHUNK_WIDTH: f64 = 1000.0;
    pub const SAMPLE_STEP: f64 = 100.0;
    /// Distance at which difficulty saturates
    pub const DIFFICULTY_DISTANCE: f64 = 5000.0;

    /// Channel between floor and ceiling
    pub const BASE_CLEARANCE: f64 = 220.0;
    pub const MIN_CLEARANCE: f64 = 0.0;

    /// Pruning keeps this much geometry behind the requested x
    pub const PRUNE_LOOKBACK: f64 = 200.0;
    /// Two full pattern cycles at the level start are never pruned
    pub const PROTECTED_START_ZONE: f64 = 4000.0;

    /// Ceiling hazard phase durations (ms)
    pub const SAFE_DURATION_MS: f64 = 5000.0;
    pub const WARNING_DURATION_MS: f64 = 2000.0;
    pub const DESCEND_DURATION_MS: f64 = 250.0;
    pub const HOLD_DURATION_MS: f64 = 3000.0;
    pub const ASCEND_DURATION_MS: f64 = 700.0;
    /// How far the ceiling comes down at full descent
    pub const DESCEND_DISTANCE: f64 = 220.0;
    /// Ceiling jitter while the warning is telegraphed
    pub const WARNING_SHAKE: f64 = 6.0;
    /// Warning flash toggles this often (ms)
    pub const WARNING_FLASH_MS: f64 = 200.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f64 = 20.0;
    pub const PLAYER_HEIGHT: f64 = 28.0;
    /// Horizontal distance per reference frame
    pub const PLAYER_BASE_SPEED: f64 = 10.0;
    pub const PLAYER_SPAWN_X: f64 = 100.0;
    pub const STARTING_LIVES: u8 = 3;
    /// Crush checks are skipped this long after a respawn; falls still count (ms)
    pub const RESPAWN_GRACE_MS: f64 = 1000.0;

    /// Speed modifiers read from input
    pub const SPEED_SLOW: f64 = 0.67;
    pub const SPEED_FAST: f64 = 1.65;

    /// Camera keeps the player this far from the left edge
    pub const CAMERA_LEAD: f64 = 200.0;
    /// Debug camera pan per reference frame
    pub const DEBUG_PAN_SPEED: f64 = 12.0;
    /// Terrain is generated at least this far past the right edge of the view
    pub const STREAM_LOOKAHEAD: f64 = 1000.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Whether `x` lies in the closed interval `[start, end]`
#[inline]
pub fn in_span(x: f64, start: f64, end: f64) -> bool {
    x >= start && x <= end
}
