//! Game balance values
//!
//! Every constant the simulation reads lives here so a run can be re-balanced
//! from a JSON file without recompiling. Missing fields fall back to `consts`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Failure to load a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Procedural level shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorTuning {
    pub chunk_width: f64,
    pub sample_step: f64,
    pub ground_y: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub flat_length: f64,
    pub slope_length: f64,
    pub slope_angle_deg: f64,
    pub difficulty_distance: f64,
}

impl Default for GeneratorTuning {
    fn default() -> Self {
        Self {
            chunk_width: CHUNK_WIDTH,
            sample_step: SAMPLE_STEP,
            ground_y: GROUND_Y,
            min_y: TERRAIN_MIN_Y,
            max_y: TERRAIN_MAX_Y,
            flat_length: FLAT_LENGTH,
            slope_length: SLOPE_LENGTH,
            slope_angle_deg: SLOPE_ANGLE_DEG,
            difficulty_distance: DIFFICULTY_DISTANCE,
        }
    }
}

impl GeneratorTuning {
    /// Vertical change per unit of horizontal travel on a slope
    pub fn slope_rate(&self) -> f64 {
        self.slope_angle_deg.to_radians().tan()
    }

    /// Length of one flat -> up -> flat -> down cycle
    pub fn cycle_length(&self) -> f64 {
        2.0 * (self.flat_length + self.slope_length)
    }
}

/// Terrain store and channel shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainTuning {
    pub base_clearance: f64,
    pub min_clearance: f64,
    pub ceiling_top: f64,
    pub prune_lookback: f64,
    pub protected_start_zone: f64,
}

impl Default for TerrainTuning {
    fn default() -> Self {
        Self {
            base_clearance: BASE_CLEARANCE,
            min_clearance: MIN_CLEARANCE,
            ceiling_top: CEILING_TOP,
            prune_lookback: PRUNE_LOOKBACK,
            protected_start_zone: PROTECTED_START_ZONE,
        }
    }
}

/// Integration constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f64,
    pub reference_frame_ms: f64,
    pub max_frame_delta_ms: f64,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            reference_frame_ms: REFERENCE_FRAME_MS,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
        }
    }
}

/// Ceiling hazard cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub safe_ms: f64,
    pub warning_ms: f64,
    pub descend_ms: f64,
    pub hold_ms: f64,
    pub ascend_ms: f64,
    pub descend_distance: f64,
    pub warning_shake: f64,
    pub warning_flash_ms: f64,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            safe_ms: SAFE_DURATION_MS,
            warning_ms: WARNING_DURATION_MS,
            descend_ms: DESCEND_DURATION_MS,
            hold_ms: HOLD_DURATION_MS,
            ascend_ms: ASCEND_DURATION_MS,
            descend_distance: DESCEND_DISTANCE,
            warning_shake: WARNING_SHAKE,
            warning_flash_ms: WARNING_FLASH_MS,
        }
    }
}

/// Player body and lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f64,
    pub height: f64,
    pub base_speed: f64,
    pub spawn_x: f64,
    pub lives: u8,
    pub respawn_grace_ms: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            base_speed: PLAYER_BASE_SPEED,
            spawn_x: PLAYER_SPAWN_X,
            lives: STARTING_LIVES,
            respawn_grace_ms: RESPAWN_GRACE_MS,
        }
    }
}

/// Camera and chunk streaming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingTuning {
    pub view_width: f64,
    pub camera_lead: f64,
    pub lookahead: f64,
    pub debug_pan_speed: f64,
    pub fall_limit_y: f64,
}

impl Default for StreamingTuning {
    fn default() -> Self {
        Self {
            view_width: VIEW_WIDTH,
            camera_lead: CAMERA_LEAD,
            lookahead: STREAM_LOOKAHEAD,
            debug_pan_speed: DEBUG_PAN_SPEED,
            fall_limit_y: FALL_LIMIT_Y,
        }
    }
}

/// Complete balance sheet for a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub generator: GeneratorTuning,
    pub terrain: TerrainTuning,
    pub physics: PhysicsTuning,
    pub hazard: HazardTuning,
    pub player: PlayerTuning,
    pub streaming: StreamingTuning,
}

impl Tuning {
    /// Parse tuning from a JSON document; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
