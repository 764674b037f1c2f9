//! Player and run bookkeeping

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::tuning::PlayerTuning;

/// The runner. `position` is the point between the feet; the body extends
/// `height` upward (toward smaller y).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Position at the start of the current tick
    pub previous_position: DVec2,
    pub width: f64,
    pub height: f64,
    /// Horizontal distance per reference frame at normal speed
    pub base_speed: f64,
}

impl Player {
    pub fn new(tuning: &PlayerTuning, position: DVec2) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
            previous_position: position,
            width: tuning.width,
            height: tuning.height,
            base_speed: tuning.base_speed,
        }
    }

    #[inline]
    pub fn foot_y(&self) -> f64 {
        self.position.y
    }

    #[inline]
    pub fn head_y(&self) -> f64 {
        self.position.y - self.height
    }

    /// Move to `position` at rest (respawn / reset)
    pub fn place_at(&mut self, position: DVec2) {
        self.position = position;
        self.previous_position = position;
        self.velocity = DVec2::ZERO;
    }
}

/// Lives and distance for the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub lives: u8,
    /// Best distance reached, in tenths of world units
    pub distance: u64,
    pub is_game_over: bool,
    /// Free camera and extra logging
    pub debug_mode: bool,
    starting_lives: u8,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(crate::consts::STARTING_LIVES)
    }
}

impl GameState {
    pub fn new(lives: u8) -> Self {
        Self {
            lives,
            distance: 0,
            is_game_over: false,
            debug_mode: false,
            starting_lives: lives,
        }
    }

    /// Take a life; the run ends when none are left
    pub fn lose_life(&mut self) {
        if self.is_game_over {
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.is_game_over = true;
            log::info!("Game over at distance {}", self.distance);
        } else {
            log::info!("Lives remaining: {}", self.lives);
        }
    }

    /// Record progress; distance never decreases
    pub fn update_distance(&mut self, player_x: f64) {
        let reached = (player_x / 10.0).floor().max(0.0) as u64;
        self.distance = self.distance.max(reached);
    }

    pub fn reset(&mut self) {
        self.lives = self.starting_lives;
        self.distance = 0;
        self.is_game_over = false;
    }
}

/// Why a life was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Fell through a gap below the world
    Fell,
    /// Ceiling came down onto the player
    Crushed,
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::Fell => "fell",
            DeathCause::Crushed => "was crushed",
        }
    }
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LifeLost { cause: DeathCause, x: f64 },
    Respawned { position: DVec2 },
    GameOver,
    ChunkLoaded { start_x: f64, end_x: f64 },
}
