//! Frame pacing around the simulation
//!
//! A host (browser refresh callback, native event loop, headless driver) calls
//! `frame` with its own timestamp. The first frame after `start` seeds the
//! clock and reports a zero delta, so resuming after a stop never produces one
//! huge step.

use crate::sim::{GameEvent, Session, TickInput};
use crate::tuning::Tuning;

pub struct FrameLoop {
    session: Session,
    /// Timestamp of the previous frame; `None` until the next frame reseeds it
    last_time: Option<f64>,
    running: bool,
}

impl FrameLoop {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            session: Session::new(tuning),
            last_time: None,
            running: false,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            log::info!("Frame loop started");
        }
        self.running = true;
    }

    /// Stop and forget the seed timestamp
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Frame loop stopped");
        }
        self.running = false;
        self.last_time = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one tick for a refresh at `now_ms`. Does nothing while stopped.
    pub fn frame(&mut self, now_ms: f64, input: &TickInput) -> Vec<GameEvent> {
        if !self.running {
            return Vec::new();
        }
        let dt = match self.last_time {
            Some(last) => now_ms - last,
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        self.session.tick(input, dt)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}
