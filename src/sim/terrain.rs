//! Streaming terrain store and channel queries
//!
//! All surface vertices live in a single growable arena ordered by x. A region
//! is an index range into that arena; consecutive chunks that share a seam
//! vertex extend the same range, and a chunk that does not line up opens a new
//! one, leaving a gap (no terrain) in between.
//!
//! The ceiling is never stored. It is derived per query from the floor, the
//! hazard zones covering x, and the live hazard drop written by the ceiling
//! system each tick.

use std::ops::Range;

use glam::DVec2;

use super::level::Chunk;
use super::zone::{HazardKind, HazardZone};
use crate::lerp;
use crate::tuning::TerrainTuning;

/// Accumulated geometry plus the hazard fields that shape the channel
#[derive(Debug, Clone)]
pub struct TerrainSystem {
    tuning: TerrainTuning,
    /// Every live surface vertex, ascending in x
    vertices: Vec<DVec2>,
    /// Contiguous polylines as ranges into `vertices`, ascending in x
    regions: Vec<Range<usize>>,
    zones: Vec<HazardZone>,
    /// Height used for the seed region on init and on reseed after pruning
    start_y: f64,
    ceiling_drop: f64,
    ceiling_shake: f64,
}

impl TerrainSystem {
    pub fn new(tuning: TerrainTuning, start_y: f64) -> Self {
        let mut terrain = Self {
            tuning,
            vertices: Vec::new(),
            regions: Vec::new(),
            zones: Vec::new(),
            start_y,
            ceiling_drop: 0.0,
            ceiling_shake: 0.0,
        };
        terrain.init(start_y);
        terrain
    }

    /// Reset to a single-point seed region at the origin
    pub fn init(&mut self, start_y: f64) {
        self.start_y = start_y;
        self.vertices.clear();
        self.vertices.push(DVec2::new(0.0, start_y));
        self.regions.clear();
        self.regions.push(0..1);
        self.zones.clear();
        self.ceiling_drop = 0.0;
        self.ceiling_shake = 0.0;
    }

    pub fn tuning(&self) -> &TerrainTuning {
        &self.tuning
    }

    /// Append a generated chunk.
    ///
    /// The chunk's first region continues the last stored region when its first
    /// point is exactly the stored tail vertex. Every other region starts a new
    /// disjoint span.
    pub fn add_chunk(&mut self, chunk: &Chunk) {
        for (index, points) in chunk.regions.iter().enumerate() {
            if points.len() < 2 {
                continue;
            }
            self.push_region(points, index == 0);
        }

        let before = self.zones.len();
        for zone in &chunk.zones {
            // Zones straddling a chunk boundary arrive with both chunks
            if !self.zones.contains(zone) {
                self.zones.push(*zone);
            }
        }

        log::debug!(
            "Terrain: added chunk [{}, {}], {} regions, {} vertices, {} new zones",
            chunk.start_x,
            chunk.end_x,
            self.regions.len(),
            self.vertices.len(),
            self.zones.len() - before
        );
    }

    fn push_region(&mut self, points: &[DVec2], merge: bool) {
        let continues_tail = self.vertices.last() == Some(&points[0])
            && self
                .regions
                .last()
                .is_some_and(|last| last.end == self.vertices.len());
        if merge && continues_tail {
            self.vertices.extend_from_slice(&points[1..]);
            let end = self.vertices.len();
            if let Some(last) = self.regions.last_mut() {
                last.end = end;
            }
            return;
        }

        // Keep the arena ascending even if a chunk overlaps stored geometry
        let tail_x = self.vertices.last().map_or(f64::NEG_INFINITY, |p| p.x);
        let skip = points.partition_point(|p| p.x <= tail_x);
        let points = &points[skip..];
        if points.len() < 2 {
            log::debug!("Terrain: ignored region overlapping stored geometry at x={tail_x}");
            return;
        }

        let start = self.vertices.len();
        self.vertices.extend_from_slice(points);
        self.regions.push(start..self.vertices.len());
    }

    /// Drop geometry and zones well behind `before_x`.
    ///
    /// Each region keeps its last vertex before the cutoff so interpolation
    /// across the new left edge stays exact.
    pub fn prune(&mut self, before_x: f64) {
        let cutoff = before_x - self.tuning.prune_lookback;
        if cutoff < self.tuning.protected_start_zone {
            return;
        }

        self.zones.retain(|zone| zone.end_x >= cutoff);

        if !self.needs_trim(cutoff) {
            return;
        }

        let dropped_before = self.vertices.len();
        let mut vertices = Vec::with_capacity(self.vertices.len());
        let mut regions = Vec::with_capacity(self.regions.len());

        for span in &self.regions {
            let points = &self.vertices[span.clone()];
            let ahead = points.partition_point(|p| p.x < cutoff);
            let kept = &points[ahead.saturating_sub(1)..];

            let lone_point_ahead = kept.len() == 1 && kept[0].x >= cutoff;
            if kept.len() < 2 && !lone_point_ahead {
                continue;
            }

            let start = vertices.len();
            vertices.extend_from_slice(kept);
            regions.push(start..vertices.len());
        }

        if regions.is_empty() {
            log::debug!("Terrain: prune emptied the store, reseeding at x={cutoff}");
            vertices.push(DVec2::new(cutoff, self.start_y));
            regions.push(0..1);
        }

        self.vertices = vertices;
        self.regions = regions;

        log::debug!(
            "Terrain: pruned before x={cutoff}, {} vertices dropped, {} remain",
            dropped_before.saturating_sub(self.vertices.len()),
            self.vertices.len()
        );
    }

    /// Whether the leftmost region reaches behind the cutoff by more than its
    /// interpolation point. Regions are ordered, so later ones never do if it
    /// doesn't.
    fn needs_trim(&self, cutoff: f64) -> bool {
        let Some(span) = self.regions.first() else {
            return true;
        };
        let points = &self.vertices[span.clone()];
        match points.get(1) {
            Some(second) => second.x < cutoff,
            None => points[0].x < cutoff,
        }
    }

    /// Floor height at `x`, or `None` when `x` falls in a gap
    pub fn surface_y(&self, x: f64) -> Option<f64> {
        self.base_surface_y(x).map(|y| y + self.floor_offset(x))
    }

    /// Interpolated polyline height without zone offsets
    fn base_surface_y(&self, x: f64) -> Option<f64> {
        let after = self
            .regions
            .partition_point(|span| self.vertices[span.start].x <= x);
        let span = self.regions.get(after.checked_sub(1)?)?;
        let points = &self.vertices[span.clone()];
        if points.len() < 2 || x > points[points.len() - 1].x {
            return None;
        }

        let i = points
            .partition_point(|p| p.x <= x)
            .clamp(1, points.len() - 1);
        let (a, b) = (points[i - 1], points[i]);
        let dx = b.x - a.x;
        let t = if dx > 0.0 { (x - a.x) / dx } else { 0.0 };
        Some(lerp(a.y, b.y, t))
    }

    /// Largest floor offset covering `x`
    pub fn floor_offset(&self, x: f64) -> f64 {
        self.zones_at(x)
            .filter(|zone| zone.kind == HazardKind::FloorOffset)
            .fold(0.0_f64, |offset, zone| offset.max(zone.magnitude))
    }

    /// Vertical gap between floor and ceiling at `x`
    pub fn clearance(&self, x: f64) -> f64 {
        let base = self.tuning.base_clearance;

        let narrowed = self
            .zones_at(x)
            .filter(|zone| zone.kind.narrows())
            .fold(base, |clearance, zone| clearance.min(zone.magnitude));
        let widened = self
            .zones_at(x)
            .filter(|zone| zone.kind == HazardKind::Recess)
            .fold(narrowed, |clearance, zone| clearance.max(zone.magnitude));

        let clearance = widened + self.floor_offset(x);
        let drop = self.ceiling_drop.min(self.max_collapse_drop());
        (clearance - drop).max(self.tuning.min_clearance)
    }

    /// How far the hazard may lower the ceiling: never more than the tightest
    /// loaded overhang or tunnel clearance
    pub fn max_collapse_drop(&self) -> f64 {
        self.zones
            .iter()
            .filter(|zone| zone.kind.narrows())
            .fold(self.tuning.base_clearance, |min, zone| min.min(zone.magnitude))
            .max(self.tuning.min_clearance)
    }

    /// Upper bound of `clearance` over every x for the loaded zones
    pub fn max_clearance(&self) -> f64 {
        let recess = self
            .zones_of(HazardKind::Recess)
            .fold(self.tuning.base_clearance, |max, zone| max.max(zone.magnitude));
        let offset = self
            .zones_of(HazardKind::FloorOffset)
            .fold(0.0, |max: f64, zone| max.max(zone.magnitude));
        recess + offset
    }

    /// Ceiling height at `x`; the world top when there is no floor
    pub fn ceiling_y(&self, x: f64) -> f64 {
        let top = self.tuning.ceiling_top;
        match self.surface_y(x) {
            Some(surface) => (surface - self.clearance(x)).max(top),
            None => top,
        }
    }

    pub fn set_ceiling_drop(&mut self, amount: f64) {
        self.ceiling_drop = amount.max(0.0);
    }

    pub fn set_ceiling_shake(&mut self, amplitude: f64) {
        self.ceiling_shake = amplitude.max(0.0);
    }

    pub fn ceiling_drop(&self) -> f64 {
        self.ceiling_drop
    }

    pub fn ceiling_shake(&self) -> f64 {
        self.ceiling_shake
    }

    /// Region polylines, left to right
    pub fn regions(&self) -> impl Iterator<Item = &[DVec2]> + '_ {
        self.regions.iter().map(|span| &self.vertices[span.clone()])
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Rightmost stored vertex
    pub fn last_point(&self) -> Option<DVec2> {
        self.vertices.last().copied()
    }

    pub fn zones(&self) -> &[HazardZone] {
        &self.zones
    }

    pub fn zones_of(&self, kind: HazardKind) -> impl Iterator<Item = &HazardZone> + '_ {
        self.zones.iter().filter(move |zone| zone.kind == kind)
    }

    fn zones_at(&self, x: f64) -> impl Iterator<Item = &HazardZone> + '_ {
        self.zones.iter().filter(move |zone| zone.contains(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::level::LevelGenerator;
    use proptest::prelude::*;

    fn flat_chunk(start_x: f64, end_x: f64, y: f64) -> Chunk {
        Chunk {
            start_x,
            regions: vec![vec![DVec2::new(start_x, y), DVec2::new(end_x, y)]],
            zones: Vec::new(),
            end_point: DVec2::new(end_x, y),
            end_x,
        }
    }

    /// Terrain streamed from x=0 for `chunks` chunks
    fn streamed(chunks: usize) -> (TerrainSystem, LevelGenerator) {
        let generator = LevelGenerator::default();
        let mut terrain = TerrainSystem::new(TerrainTuning::default(), generator.terrain_y(0.0));
        let mut x = 0.0;
        for _ in 0..chunks {
            let chunk = generator.generate_chunk(x);
            terrain.add_chunk(&chunk);
            x = chunk.end_x;
        }
        (terrain, generator)
    }

    /// Flat floor without zones, for channel tests
    fn flat_terrain() -> TerrainSystem {
        let mut terrain = TerrainSystem::new(TerrainTuning::default(), GROUND_Y);
        terrain.add_chunk(&flat_chunk(0.0, 10_000.0, GROUND_Y));
        terrain
    }

    #[test]
    fn test_init_is_single_seed() {
        let terrain = TerrainSystem::new(TerrainTuning::default(), 300.0);
        assert_eq!(terrain.region_count(), 1);
        assert_eq!(terrain.vertex_count(), 1);
        assert_eq!(terrain.last_point(), Some(DVec2::new(0.0, 300.0)));
        // A single point is not a surface
        assert_eq!(terrain.surface_y(0.0), None);
        assert_eq!(terrain.ceiling_drop(), 0.0);
    }

    #[test]
    fn test_init_clears_zones_and_hazard() {
        let (mut terrain, _) = streamed(3);
        terrain.set_ceiling_drop(100.0);
        terrain.set_ceiling_shake(6.0);
        assert!(!terrain.zones().is_empty());

        terrain.init(GROUND_Y);
        assert!(terrain.zones().is_empty());
        assert_eq!(terrain.vertex_count(), 1);
        assert_eq!(terrain.ceiling_drop(), 0.0);
        assert_eq!(terrain.ceiling_shake(), 0.0);
    }

    #[test]
    fn test_matching_seam_merges_into_one_region() {
        let (terrain, _) = streamed(3);
        assert_eq!(terrain.region_count(), 1);
        // 1 seed + 10 new per chunk (seam vertex shared)
        assert_eq!(terrain.vertex_count(), 31);
        let xs: Vec<f64> = terrain.vertices().iter().map(|p| p.x).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_mismatched_seam_opens_gap() {
        let mut terrain = flat_terrain();
        terrain.add_chunk(&flat_chunk(10_200.0, 11_000.0, GROUND_Y));
        assert_eq!(terrain.region_count(), 2);
        assert_eq!(terrain.surface_y(10_100.0), None);
        assert_eq!(terrain.surface_y(10_500.0), Some(GROUND_Y));
        assert_eq!(terrain.ceiling_y(10_100.0), CEILING_TOP);
    }

    #[test]
    fn test_short_regions_ignored() {
        let mut terrain = flat_terrain();
        let mut chunk = flat_chunk(10_000.0, 11_000.0, GROUND_Y);
        chunk.regions = vec![vec![DVec2::new(10_500.0, GROUND_Y)], Vec::new()];
        terrain.add_chunk(&chunk);
        assert_eq!(terrain.region_count(), 1);
        assert_eq!(terrain.vertex_count(), 2);
    }

    #[test]
    fn test_duplicate_zones_skipped() {
        let mut terrain = flat_terrain();
        let zone = HazardZone::overhang(2000.0, 60.0, 140.0);
        let mut chunk = flat_chunk(10_000.0, 11_000.0, GROUND_Y);
        chunk.zones = vec![zone];
        terrain.add_chunk(&chunk);
        chunk.regions.clear();
        terrain.add_chunk(&chunk);
        assert_eq!(terrain.zones().len(), 1);
    }

    #[test]
    fn test_surface_interpolates() {
        let mut terrain = TerrainSystem::new(TerrainTuning::default(), 400.0);
        let mut chunk = flat_chunk(0.0, 100.0, 400.0);
        chunk.regions[0][1].y = 300.0;
        terrain.add_chunk(&chunk);
        assert_eq!(terrain.surface_y(0.0), Some(400.0));
        assert_eq!(terrain.surface_y(25.0), Some(375.0));
        assert_eq!(terrain.surface_y(100.0), Some(300.0));
        assert_eq!(terrain.surface_y(100.5), None);
        assert_eq!(terrain.surface_y(-1.0), None);
    }

    #[test]
    fn test_floor_offset_largest_wins() {
        let mut terrain = flat_terrain();
        let mut chunk = flat_chunk(10_000.0, 10_000.0, GROUND_Y);
        chunk.regions.clear();
        chunk.zones = vec![
            HazardZone::floor_offset(500.0, 100.0, 20.0),
            HazardZone::floor_offset(550.0, 100.0, 30.0),
        ];
        terrain.add_chunk(&chunk);
        assert_eq!(terrain.surface_y(520.0), Some(GROUND_Y + 20.0));
        assert_eq!(terrain.surface_y(560.0), Some(GROUND_Y + 30.0));
        assert_eq!(terrain.surface_y(700.0), Some(GROUND_Y));
        // The dip deepens the channel by the same amount
        assert_eq!(terrain.clearance(560.0), BASE_CLEARANCE + 30.0);
    }

    fn with_zones(zones: Vec<HazardZone>) -> TerrainSystem {
        let mut terrain = flat_terrain();
        let mut chunk = flat_chunk(10_000.0, 10_000.0, GROUND_Y);
        chunk.regions.clear();
        chunk.zones = zones;
        terrain.add_chunk(&chunk);
        terrain
    }

    #[test]
    fn test_clearance_narrow_then_widen() {
        let terrain = with_zones(vec![
            HazardZone::overhang(100.0, 100.0, 160.0),
            HazardZone::tunnel(150.0, 100.0, 120.0),
            HazardZone::recess(180.0, 100.0, 280.0),
        ]);
        assert_eq!(terrain.clearance(50.0), BASE_CLEARANCE);
        assert_eq!(terrain.clearance(120.0), 160.0);
        assert_eq!(terrain.clearance(160.0), 120.0);
        // Recess overrides the overhang where both apply
        assert_eq!(terrain.clearance(190.0), 280.0);
        assert_eq!(terrain.ceiling_y(120.0), GROUND_Y - 160.0);
    }

    #[test]
    fn test_drop_bounded_by_tightest_overhang() {
        let mut terrain = with_zones(vec![
            HazardZone::overhang(100.0, 100.0, 160.0),
            HazardZone::overhang(300.0, 100.0, 150.0),
        ]);
        assert_eq!(terrain.max_collapse_drop(), 150.0);
        terrain.set_ceiling_drop(DESCEND_DISTANCE);
        assert_eq!(terrain.clearance(50.0), BASE_CLEARANCE - 150.0);
        assert_eq!(terrain.clearance(150.0), 10.0);
        assert_eq!(terrain.clearance(350.0), 0.0);
    }

    #[test]
    fn test_open_channel_can_fully_close() {
        let mut terrain = flat_terrain();
        assert_eq!(terrain.max_collapse_drop(), BASE_CLEARANCE);
        terrain.set_ceiling_drop(DESCEND_DISTANCE);
        assert_eq!(terrain.clearance(500.0), 0.0);
        assert_eq!(terrain.ceiling_y(500.0), GROUND_Y);
    }

    #[test]
    fn test_full_closure_in_overhang() {
        let mut terrain = with_zones(vec![HazardZone::overhang(2000.0, 60.0, 140.0)]);
        terrain.set_ceiling_drop(DESCEND_DISTANCE);
        assert_eq!(terrain.max_collapse_drop(), 140.0);
        assert_eq!(terrain.clearance(2030.0), 0.0);
        assert_eq!(terrain.ceiling_y(2030.0), terrain.surface_y(2030.0).unwrap());
    }

    #[test]
    fn test_ceiling_clamped_to_world_top() {
        let terrain = with_zones(vec![HazardZone::recess(100.0, 100.0, 900.0)]);
        assert_eq!(terrain.ceiling_y(150.0), CEILING_TOP);
    }

    #[test]
    fn test_hazard_setters_clamp_negative() {
        let mut terrain = flat_terrain();
        terrain.set_ceiling_drop(-5.0);
        terrain.set_ceiling_shake(-1.0);
        assert_eq!(terrain.ceiling_drop(), 0.0);
        assert_eq!(terrain.ceiling_shake(), 0.0);
    }

    #[test]
    fn test_prune_skips_protected_zone() {
        let (mut terrain, _) = streamed(5);
        let before = terrain.vertex_count();
        let zones = terrain.zones().len();
        terrain.prune(PROTECTED_START_ZONE + PRUNE_LOOKBACK - 1.0);
        assert_eq!(terrain.vertex_count(), before);
        assert_eq!(terrain.zones().len(), zones);
    }

    #[test]
    fn test_prune_keeps_interpolation_point() {
        let (mut terrain, _) = streamed(8);
        terrain.prune(5050.0);
        // cutoff 4850: the sample at 4800 stays as the left edge
        let first = terrain.vertices()[0];
        assert_eq!(first.x, 4800.0);
        assert!(terrain.surface_y(4850.0).is_some());
        assert!(terrain.surface_y(4700.0).is_none());
        assert!(terrain.zones().iter().all(|z| z.end_x >= 4850.0));
    }

    #[test]
    fn test_prune_everything_reseeds() {
        let (mut terrain, _) = streamed(5);
        terrain.prune(10_000.0);
        assert_eq!(terrain.region_count(), 1);
        assert_eq!(terrain.vertex_count(), 1);
        assert_eq!(terrain.last_point(), Some(DVec2::new(9800.0, GROUND_Y)));
        assert!(terrain.zones().iter().all(|z| z.end_x >= 9800.0));
    }

    #[test]
    fn test_regenerated_chunk_matches_pruned_geometry() {
        let (mut terrain, generator) = streamed(6);
        let original: Vec<DVec2> = terrain.vertices().to_vec();

        terrain.prune(6000.0);
        let kept = terrain.vertices();
        assert_eq!(kept, &original[original.len() - kept.len()..]);

        // Chunk 4000..5000 is gone; regenerating it reproduces the exact samples
        assert!(kept[0].x > 5000.0);
        let regenerated = generator.generate_chunk(4000.0);
        let stored: Vec<DVec2> = original
            .iter()
            .copied()
            .filter(|p| (4000.0..=5000.0).contains(&p.x))
            .collect();
        assert_eq!(regenerated.regions[0], stored);
    }

    proptest! {
        #[test]
        fn seams_are_continuous(chunks in 2usize..8, probe in 0.0f64..1.0) {
            let (terrain, generator) = streamed(chunks);
            for seam in 1..chunks {
                let x = seam as f64 * CHUNK_WIDTH;
                let left = terrain.surface_y(x - 1e-6).unwrap();
                let right = terrain.surface_y(x + 1e-6).unwrap();
                prop_assert!((left - right).abs() < 1e-3);
                let base = generator.terrain_y(x) + terrain.floor_offset(x);
                prop_assert!((terrain.surface_y(x).unwrap() - base).abs() < 1e-9);
            }
            let x = probe * chunks as f64 * CHUNK_WIDTH;
            prop_assert!(terrain.surface_y(x).is_some());
        }

        #[test]
        fn prune_preserves_recent_vertices(chunks in 5usize..12, at in 0.0f64..1.0) {
            let (mut terrain, _) = streamed(chunks);
            let span = chunks as f64 * CHUNK_WIDTH + 1000.0;
            let before_x = PROTECTED_START_ZONE + at * span;
            let expected: Vec<DVec2> = terrain
                .vertices()
                .iter()
                .copied()
                .filter(|p| p.x >= before_x - PRUNE_LOOKBACK)
                .collect();

            terrain.prune(before_x);

            prop_assert!(terrain.region_count() >= 1);
            for p in expected {
                prop_assert!(terrain.vertices().contains(&p));
            }
            for region in terrain.regions() {
                prop_assert!(region.len() >= 2 || terrain.region_count() == 1);
            }
        }

        #[test]
        fn clearance_stays_in_bounds(
            x in 0.0f64..12_000.0,
            drop in 0.0f64..500.0,
            chunks in 1usize..11,
            extra in proptest::collection::vec((0.0f64..10_000.0, 10.0f64..300.0, 0.0f64..400.0, 0usize..4), 0..6),
        ) {
            let (mut terrain, _) = streamed(chunks);
            let mut chunk = flat_chunk(0.0, 0.0, 0.0);
            chunk.regions.clear();
            chunk.zones = extra
                .into_iter()
                .map(|(start, width, magnitude, kind)| match kind {
                    0 => HazardZone::overhang(start, width, magnitude),
                    1 => HazardZone::tunnel(start, width, magnitude),
                    2 => HazardZone::recess(start, width, magnitude),
                    _ => HazardZone::floor_offset(start, width, magnitude / 10.0),
                })
                .collect();
            terrain.add_chunk(&chunk);
            terrain.set_ceiling_drop(drop);

            let clearance = terrain.clearance(x);
            prop_assert!(clearance >= MIN_CLEARANCE);
            prop_assert!(clearance <= terrain.max_clearance());
        }
    }
}
