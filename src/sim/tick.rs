//! Per-frame simulation tick
//!
//! `Session` owns every simulation component for one run and advances them in
//! a fixed order:
//! input -> physics -> ground -> fall check -> distance -> ceiling hazard ->
//! crush check -> chunk streaming -> pruning -> camera.

use glam::DVec2;

use super::ceiling::CeilingSystem;
use super::collision::{check_ceiling_collision, resolve_terrain_collision};
use super::level::LevelGenerator;
use super::physics::{clamp_delta, integrate};
use super::state::{DeathCause, GameEvent, GameState, Player};
use super::terrain::TerrainSystem;
use crate::tuning::Tuning;

/// Input commands for a single tick
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Multiplier on the player's base speed (1.0 = normal)
    pub speed_modifier: f64,
    /// Debug camera direction (-1 left, 1 right)
    pub camera_pan: f64,
    /// Pause toggle
    pub pause: bool,
    /// Debug mode toggle
    pub toggle_debug: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            speed_modifier: 1.0,
            camera_pan: 0.0,
            pause: false,
            toggle_debug: false,
        }
    }
}

impl TickInput {
    pub fn with_speed(speed_modifier: f64) -> Self {
        Self {
            speed_modifier,
            ..Default::default()
        }
    }
}

/// One run: terrain, hazard, player and bookkeeping
#[derive(Debug, Clone)]
pub struct Session {
    pub tuning: Tuning,
    pub generator: LevelGenerator,
    pub terrain: TerrainSystem,
    pub ceiling: CeilingSystem,
    pub player: Player,
    pub game: GameState,
    /// Left edge of the view in world x
    pub camera_x: f64,
    pub paused: bool,
    /// Whether the player stood on the floor after the last tick
    pub grounded: bool,
    /// Terrain has been generated up to here
    generated_until: f64,
    /// Crush checks are skipped until this runs out
    grace_ms: f64,
    time_ticks: u64,
}

impl Session {
    pub fn new(tuning: Tuning) -> Self {
        let generator = LevelGenerator::new(tuning.generator.clone());
        let start_y = generator.terrain_y(0.0);
        let spawn = DVec2::new(tuning.player.spawn_x, start_y);

        let mut session = Self {
            terrain: TerrainSystem::new(tuning.terrain.clone(), start_y),
            ceiling: CeilingSystem::new(tuning.hazard.clone()),
            player: Player::new(&tuning.player, spawn),
            game: GameState::new(tuning.player.lives),
            camera_x: spawn.x - tuning.streaming.camera_lead,
            paused: false,
            grounded: false,
            generated_until: 0.0,
            grace_ms: 0.0,
            time_ticks: 0,
            generator,
            tuning,
        };
        session.place_at_start();
        session
    }

    /// Start a fresh run; the player is moved back, not rebuilt
    pub fn reset(&mut self) {
        let start_y = self.generator.terrain_y(0.0);
        self.terrain.init(start_y);
        self.ceiling.reset();
        self.game.reset();
        self.paused = false;
        self.grace_ms = 0.0;
        self.generated_until = 0.0;
        self.time_ticks = 0;
        self.place_at_start();
        log::info!("Session reset");
    }

    fn place_at_start(&mut self) {
        let spawn_x = self.tuning.player.spawn_x;
        self.camera_x = spawn_x - self.tuning.streaming.camera_lead;
        self.stream_chunks();
        let spawn = self.find_spawn_point(spawn_x);
        self.player.place_at(spawn);
        self.grounded = true;
    }

    /// Advance the run by one frame of `dt_ms` (clamped to the configured max)
    pub fn tick(&mut self, input: &TickInput, dt_ms: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if input.toggle_debug {
            self.game.debug_mode = !self.game.debug_mode;
            log::info!("Debug mode {}", if self.game.debug_mode { "on" } else { "off" });
        }
        if input.pause {
            self.paused = !self.paused;
            log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        }
        if self.paused || self.game.is_game_over {
            return events;
        }

        let dt = clamp_delta(dt_ms, &self.tuning.physics);
        let time_scale = dt / self.tuning.physics.reference_frame_ms;
        self.time_ticks += 1;
        self.grace_ms = (self.grace_ms - dt).max(0.0);

        // Input
        self.player.previous_position = self.player.position;
        self.player.velocity.x = self.player.base_speed * input.speed_modifier;

        integrate(&mut self.player, dt, &self.tuning.physics);
        self.grounded = resolve_terrain_collision(&self.terrain, &mut self.player);

        if !self.grounded && self.player.foot_y() > self.tuning.streaming.fall_limit_y {
            self.lose_life(DeathCause::Fell, &mut events);
        }

        self.game.update_distance(self.player.position.x);

        // Drop must land in the terrain before the crush query below
        self.ceiling.update(dt, &mut self.terrain);

        if !self.game.is_game_over
            && self.grace_ms <= 0.0
            && check_ceiling_collision(&self.terrain, &self.player)
        {
            self.lose_life(DeathCause::Crushed, &mut events);
        }

        for (start_x, end_x) in self.stream_chunks() {
            events.push(GameEvent::ChunkLoaded { start_x, end_x });
        }
        self.terrain.prune(self.camera_x.min(self.player.position.x));

        if self.game.debug_mode {
            self.camera_x +=
                input.camera_pan.clamp(-1.0, 1.0) * self.tuning.streaming.debug_pan_speed * time_scale;
        } else {
            self.camera_x = self.player.position.x - self.tuning.streaming.camera_lead;
        }

        log::trace!(
            "tick {} x={:.1} y={:.1} drop={:.1}",
            self.time_ticks,
            self.player.position.x,
            self.player.position.y,
            self.terrain.ceiling_drop()
        );

        events
    }

    pub fn set_camera_x(&mut self, x: f64) {
        self.camera_x = x;
    }

    pub fn generated_until(&self) -> f64 {
        self.generated_until
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Whether the player is currently protected from the ceiling
    pub fn in_respawn_grace(&self) -> bool {
        self.grace_ms > 0.0
    }

    /// Generate chunks until the terrain reaches past the view and the player.
    /// Returns the spans that were added.
    fn stream_chunks(&mut self) -> Vec<(f64, f64)> {
        let streaming = &self.tuning.streaming;
        let horizon = self
            .player
            .position
            .x
            .max(self.camera_x + streaming.view_width)
            + streaming.lookahead;

        let mut added = Vec::new();
        while self.generated_until < horizon {
            let chunk = self.generator.generate_chunk(self.generated_until);
            if chunk.end_x <= self.generated_until {
                log::warn!("Chunk at x={} made no progress", self.generated_until);
                break;
            }
            self.terrain.add_chunk(&chunk);
            added.push((chunk.start_x, chunk.end_x));
            self.generated_until = chunk.end_x;
        }
        added
    }

    fn lose_life(&mut self, cause: DeathCause, events: &mut Vec<GameEvent>) {
        let x = self.player.position.x;
        log::info!("Player {} at x={:.0}", cause.as_str(), x);

        self.game.lose_life();
        events.push(GameEvent::LifeLost { cause, x });

        if self.game.is_game_over {
            events.push(GameEvent::GameOver);
            return;
        }

        // The hazard clock keeps running through death and respawn
        let position = self.find_spawn_point(x);
        self.player.place_at(position);
        self.grace_ms = self.tuning.player.respawn_grace_ms;
        events.push(GameEvent::Respawned { position });
        log::debug!("Respawned at ({:.0}, {:.0})", position.x, position.y);
    }

    /// First point with a floor at or after `from_x`, resting on the surface
    fn find_spawn_point(&self, from_x: f64) -> DVec2 {
        let step = self.tuning.generator.sample_step.max(1.0);
        let mut x = from_x;
        while x <= self.generated_until {
            if let Some(y) = self.terrain.surface_y(x) {
                return DVec2::new(x, y);
            }
            x += step;
        }

        // Nothing ahead; fall back to the leftmost stored floor
        self.terrain
            .regions()
            .filter(|points| points.len() >= 2)
            .find_map(|points| {
                let x = points[0].x;
                self.terrain.surface_y(x).map(|y| DVec2::new(x, y))
            })
            .unwrap_or_else(|| DVec2::new(from_x, self.generator.terrain_y(from_x)))
    }
}
