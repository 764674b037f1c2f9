//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Terrain is a function of world x only
//! - Time only enters through the tick's frame delta
//! - Single owner per field, fixed update order within a tick
//! - No rendering or platform dependencies

pub mod ceiling;
pub mod collision;
pub mod layout;
pub mod level;
pub mod physics;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod zone;

pub use ceiling::{CeilingSystem, HazardPhase, HazardState};
pub use collision::{check_ceiling_collision, resolve_terrain_collision, vertical_clearance};
pub use level::{Chunk, LevelGenerator};
pub use physics::integrate;
pub use state::{DeathCause, GameEvent, GameState, Player};
pub use terrain::TerrainSystem;
pub use tick::{Session, TickInput};
pub use zone::{HazardKind, HazardZone};
