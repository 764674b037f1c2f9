//! Player integration
//!
//! Semi-implicit Euler scaled to a 16 ms reference frame, so tuning values are
//! per-frame and motion stays the same at any refresh rate. Terrain is not
//! consulted here; see `collision`.

use super::state::Player;
use crate::tuning::PhysicsTuning;

/// Advance the player by `dt_ms`. The caller clamps `dt_ms` beforehand.
pub fn integrate(player: &mut Player, dt_ms: f64, tuning: &PhysicsTuning) {
    let time_scale = dt_ms / tuning.reference_frame_ms;

    player.velocity.y += tuning.gravity * time_scale;
    player.position += player.velocity * time_scale;
}

/// Clamp a raw frame delta into `[0, max_frame_delta_ms]`
pub fn clamp_delta(dt_ms: f64, tuning: &PhysicsTuning) -> f64 {
    if dt_ms.is_nan() {
        return 0.0;
    }
    dt_ms.clamp(0.0, tuning.max_frame_delta_ms)
}
