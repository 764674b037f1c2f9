//! Ceiling hazard cycle
//!
//! The ceiling free-runs through safe -> warning -> descending -> hold ->
//! ascending and back to safe. Transitions are a pure function of the current
//! state and the elapsed time; `CeilingSystem` wraps that and pushes the
//! resulting drop and shake into the terrain every tick.

use serde::{Deserialize, Serialize};

use super::terrain::TerrainSystem;
use crate::tuning::HazardTuning;

/// Phase of the hazard cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HazardPhase {
    #[default]
    Safe,
    /// Ceiling shakes to telegraph the drop
    Warning,
    Descending,
    /// Ceiling held at full drop
    Hold,
    Ascending,
}

impl HazardPhase {
    pub fn duration_ms(self, tuning: &HazardTuning) -> f64 {
        match self {
            HazardPhase::Safe => tuning.safe_ms,
            HazardPhase::Warning => tuning.warning_ms,
            HazardPhase::Descending => tuning.descend_ms,
            HazardPhase::Hold => tuning.hold_ms,
            HazardPhase::Ascending => tuning.ascend_ms,
        }
    }

    pub fn next(self) -> Self {
        match self {
            HazardPhase::Safe => HazardPhase::Warning,
            HazardPhase::Warning => HazardPhase::Descending,
            HazardPhase::Descending => HazardPhase::Hold,
            HazardPhase::Hold => HazardPhase::Ascending,
            HazardPhase::Ascending => HazardPhase::Safe,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HazardPhase::Safe => "safe",
            HazardPhase::Warning => "warning",
            HazardPhase::Descending => "descending",
            HazardPhase::Hold => "hold",
            HazardPhase::Ascending => "ascending",
        }
    }
}

/// Snapshot of the hazard after a step
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HazardState {
    pub phase: HazardPhase,
    /// Time spent in `phase` (ms)
    pub timer_ms: f64,
    /// How far the ceiling is lowered
    pub drop: f64,
    /// Ceiling jitter amplitude
    pub shake: f64,
}

impl HazardState {
    /// Advance by `elapsed_ms`.
    ///
    /// The phase's effect is evaluated at the advanced timer first; if that
    /// reaches the phase duration the machine moves on with the timer reset to
    /// zero. Leftover time is not carried into the next phase.
    pub fn advance(self, elapsed_ms: f64, tuning: &HazardTuning) -> Self {
        let timer_ms = self.timer_ms + elapsed_ms.max(0.0);
        let duration = self.phase.duration_ms(tuning);
        let progress = if duration > 0.0 {
            (timer_ms / duration).min(1.0)
        } else {
            1.0
        };

        let (drop, shake) = match self.phase {
            HazardPhase::Safe => (0.0, 0.0),
            HazardPhase::Warning => (self.drop, tuning.warning_shake),
            HazardPhase::Descending => (progress * tuning.descend_distance, 0.0),
            HazardPhase::Hold => (tuning.descend_distance, 0.0),
            HazardPhase::Ascending => ((1.0 - progress) * tuning.descend_distance, 0.0),
        };

        if timer_ms < duration {
            return Self {
                phase: self.phase,
                timer_ms,
                drop,
                shake,
            };
        }

        let drop = if self.phase == HazardPhase::Ascending {
            0.0
        } else {
            drop
        };
        Self {
            phase: self.phase.next(),
            timer_ms: 0.0,
            drop,
            shake,
        }
    }
}

/// Owner of the hazard state; the only writer of the terrain's drop and shake
#[derive(Debug, Clone, Default)]
pub struct CeilingSystem {
    state: HazardState,
    tuning: HazardTuning,
}

impl CeilingSystem {
    pub fn new(tuning: HazardTuning) -> Self {
        Self {
            state: HazardState::default(),
            tuning,
        }
    }

    /// Step the cycle and write the result into the terrain.
    ///
    /// Must run before any clearance or ceiling query in the same tick.
    pub fn update(&mut self, elapsed_ms: f64, terrain: &mut TerrainSystem) {
        let next = self.state.advance(elapsed_ms, &self.tuning);
        if next.phase != self.state.phase {
            log::debug!(
                "Ceiling: {} -> {}",
                self.state.phase.as_str(),
                next.phase.as_str()
            );
        }
        self.state = next;

        terrain.set_ceiling_shake(self.state.shake);
        terrain.set_ceiling_drop(self.state.drop);
    }

    /// Back to the start of a safe phase
    pub fn reset(&mut self) {
        self.state = HazardState::default();
    }

    pub fn state(&self) -> HazardState {
        self.state
    }

    pub fn phase(&self) -> HazardPhase {
        self.state.phase
    }

    pub fn current_drop(&self) -> f64 {
        self.state.drop
    }

    /// Ceiling is down or coming down
    pub fn is_ceiling_low(&self) -> bool {
        matches!(self.state.phase, HazardPhase::Descending | HazardPhase::Hold)
    }

    pub fn is_ceiling_safe(&self) -> bool {
        self.state.phase == HazardPhase::Safe
    }

    /// Warning colour alternates with the base colour during the warning phase
    pub fn warning_flash_on(&self) -> bool {
        if self.state.phase != HazardPhase::Warning || self.tuning.warning_flash_ms <= 0.0 {
            return false;
        }
        (self.state.timer_ms / self.tuning.warning_flash_ms).floor() as u64 % 2 == 0
    }

    /// Length of one full safe-to-safe cycle (ms)
    pub fn cycle_duration(&self) -> f64 {
        let t = &self.tuning;
        t.safe_ms + t.warning_ms + t.descend_ms + t.hold_ms + t.ascend_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::tuning::TerrainTuning;

    const STEP_MS: f64 = 10.0;

    fn run(system: &mut CeilingSystem, terrain: &mut TerrainSystem, ms: f64) {
        let steps = (ms / STEP_MS).round() as usize;
        for _ in 0..steps {
            system.update(STEP_MS, terrain);
        }
    }

    fn setup() -> (CeilingSystem, TerrainSystem) {
        (
            CeilingSystem::default(),
            TerrainSystem::new(TerrainTuning::default(), GROUND_Y),
        )
    }

    #[test]
    fn test_starts_safe() {
        let (system, _) = setup();
        assert!(system.is_ceiling_safe());
        assert_eq!(system.current_drop(), 0.0);
        assert_eq!(system.cycle_duration(), 10_950.0);
    }

    #[test]
    fn test_warning_shakes_without_dropping() {
        let (mut system, mut terrain) = setup();
        run(&mut system, &mut terrain, 5500.0);
        assert_eq!(system.phase(), HazardPhase::Warning);
        assert_eq!(terrain.ceiling_shake(), WARNING_SHAKE);
        assert_eq!(terrain.ceiling_drop(), 0.0);
    }

    #[test]
    fn test_descending_ramp() {
        let (mut system, mut terrain) = setup();
        run(&mut system, &mut terrain, 7050.0);
        assert_eq!(system.phase(), HazardPhase::Descending);
        assert!((terrain.ceiling_drop() - 44.0).abs() < 1e-9);
        assert!(system.is_ceiling_low());
        assert_eq!(terrain.ceiling_shake(), 0.0);
    }

    #[test]
    fn test_hold_and_ascend() {
        let (mut system, mut terrain) = setup();
        run(&mut system, &mut terrain, 7250.0);
        assert_eq!(system.phase(), HazardPhase::Hold);
        assert_eq!(terrain.ceiling_drop(), DESCEND_DISTANCE);

        run(&mut system, &mut terrain, 3000.0);
        assert_eq!(system.phase(), HazardPhase::Ascending);
        assert_eq!(terrain.ceiling_drop(), DESCEND_DISTANCE);

        run(&mut system, &mut terrain, 350.0);
        assert!((terrain.ceiling_drop() - DESCEND_DISTANCE / 2.0).abs() < 1e-9);

        run(&mut system, &mut terrain, 350.0);
        assert!(system.is_ceiling_safe());
        assert_eq!(terrain.ceiling_drop(), 0.0);
    }

    #[test]
    fn test_full_cycle_returns_to_safe() {
        let (mut system, mut terrain) = setup();
        run(&mut system, &mut terrain, 10_950.0);
        assert_eq!(system.state(), HazardState::default());
        run(&mut system, &mut terrain, 10_950.0);
        assert_eq!(system.state(), HazardState::default());
    }

    #[test]
    fn test_transition_resets_timer() {
        let tuning = HazardTuning::default();
        let state = HazardState::default().advance(6000.0, &tuning);
        assert_eq!(state.phase, HazardPhase::Warning);
        assert_eq!(state.timer_ms, 0.0);
    }

    #[test]
    fn test_negative_elapsed_does_not_rewind() {
        let tuning = HazardTuning::default();
        let state = HazardState::default().advance(100.0, &tuning);
        let state = state.advance(-50.0, &tuning);
        assert_eq!(state.timer_ms, 100.0);
    }

    #[test]
    fn test_warning_flash_alternates() {
        let (mut system, mut terrain) = setup();
        run(&mut system, &mut terrain, 5000.0);
        assert_eq!(system.phase(), HazardPhase::Warning);
        run(&mut system, &mut terrain, 100.0);
        assert!(system.warning_flash_on());
        run(&mut system, &mut terrain, 200.0);
        assert!(!system.warning_flash_on());
    }

    #[test]
    fn test_reset() {
        let (mut system, mut terrain) = setup();
        run(&mut system, &mut terrain, 8000.0);
        system.reset();
        assert!(system.is_ceiling_safe());
        assert_eq!(system.state().timer_ms, 0.0);
    }
}
