//! Vertical collision against the terrain channel
//!
//! Only floor and ceiling contact are resolved. The player runs through
//! slopes and walls horizontally; a gap (no surface) means free fall.

use super::state::Player;
use super::terrain::TerrainSystem;

/// Snap the player onto the floor if their feet reached it.
///
/// Returns whether the player is grounded this tick.
pub fn resolve_terrain_collision(terrain: &TerrainSystem, player: &mut Player) -> bool {
    let Some(surface_y) = terrain.surface_y(player.position.x) else {
        return false;
    };
    if player.foot_y() >= surface_y {
        player.position.y = surface_y;
        player.velocity.y = 0.0;
        return true;
    }
    false
}

/// Whether the ceiling has come down onto the player's head
pub fn check_ceiling_collision(terrain: &TerrainSystem, player: &Player) -> bool {
    player.head_y() <= terrain.ceiling_y(player.position.x)
}

/// Channel height at the player's x, used to pick a crouched pose
pub fn vertical_clearance(terrain: &TerrainSystem, player: &Player) -> f64 {
    terrain.clearance(player.position.x)
}
