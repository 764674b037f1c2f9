//! Procedural level generation
//!
//! The terrain is a pure function of world x: a repeating cycle of
//! flat -> upward slope -> elevated flat -> downward slope. Chunks sample that
//! function, so any chunk can be regenerated from its start x alone and comes
//! out bit-identical every time.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::layout::authored_zones;
use super::zone::HazardZone;
use crate::tuning::GeneratorTuning;

/// One unit of streamed terrain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub start_x: f64,
    /// Polylines, each strictly ascending in x
    pub regions: Vec<Vec<DVec2>>,
    /// Authored zones whose interval touches `[start_x, end_x]`
    pub zones: Vec<HazardZone>,
    /// Last surface point; the next chunk starts here
    pub end_point: DVec2,
    pub end_x: f64,
}

/// Stateless chunk producer
#[derive(Debug, Clone, Default)]
pub struct LevelGenerator {
    tuning: GeneratorTuning,
}

impl LevelGenerator {
    pub fn new(tuning: GeneratorTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &GeneratorTuning {
        &self.tuning
    }

    pub fn chunk_width(&self) -> f64 {
        self.tuning.chunk_width
    }

    /// Normalized progress in `[0, 1]`, saturating at the difficulty distance
    pub fn difficulty(&self, distance: f64) -> f64 {
        if self.tuning.difficulty_distance <= 0.0 {
            return 1.0;
        }
        (distance / self.tuning.difficulty_distance).clamp(0.0, 1.0)
    }

    /// Floor height at `x` before any zone offsets
    pub fn terrain_y(&self, x: f64) -> f64 {
        let t = &self.tuning;
        let rate = t.slope_rate();
        let rise = t.slope_length * rate;
        let clamp = |y: f64| y.clamp(t.min_y, t.max_y);

        let cycle = t.cycle_length();
        let pos = if cycle > 0.0 { x.rem_euclid(cycle) } else { 0.0 };

        let rise_end = t.flat_length + t.slope_length;
        let high_end = rise_end + t.flat_length;

        if pos < t.flat_length {
            t.ground_y
        } else if pos < rise_end {
            clamp(t.ground_y - (pos - t.flat_length) * rate)
        } else if pos < high_end {
            clamp(t.ground_y - rise)
        } else {
            clamp(t.ground_y - rise + (pos - high_end) * rate)
        }
    }

    /// Sample `[start_x, start_x + chunk_width]` into a polyline and collect
    /// the authored zones that overlap it
    pub fn generate_chunk(&self, start_x: f64) -> Chunk {
        let end_x = start_x + self.tuning.chunk_width;
        let step = self.tuning.sample_step;

        let mut points = Vec::new();
        if step > 0.0 {
            let samples = (self.tuning.chunk_width / step).floor() as usize;
            for i in 0..=samples {
                // Multiply rather than accumulate so every start_x samples the same way
                let x = start_x + i as f64 * step;
                if x > end_x {
                    break;
                }
                points.push(DVec2::new(x, self.terrain_y(x)));
            }
        }

        let end_point = DVec2::new(end_x, self.terrain_y(end_x));
        if points.last().map(|p| p.x) != Some(end_x) {
            points.push(end_point);
        }

        let zones = authored_zones()
            .filter(|zone| zone.intersects(start_x, end_x))
            .collect();

        log::trace!(
            "Generated chunk [{start_x}, {end_x}] with {} points",
            points.len()
        );

        Chunk {
            start_x,
            regions: vec![points],
            zones,
            end_point,
            end_x,
        }
    }
}
