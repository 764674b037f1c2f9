//! Hazard zones: authored intervals that reshape the floor/ceiling channel

use serde::{Deserialize, Serialize};

use crate::in_span;

/// What a zone does to the channel at the x positions it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    /// Ceiling hangs low; magnitude is the narrowed clearance
    Overhang,
    /// Enclosed passage; magnitude is the narrowed clearance
    Tunnel,
    /// Ceiling cut-out; magnitude is the enlarged clearance
    Recess,
    /// Floor dips down; magnitude is the downward offset
    FloorOffset,
}

impl HazardKind {
    /// Overhangs and tunnels shrink the channel and bound the collapse depth
    pub fn narrows(self) -> bool {
        matches!(self, HazardKind::Overhang | HazardKind::Tunnel)
    }
}

/// A closed interval `[start_x, end_x]` with a kind-specific magnitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardZone {
    pub kind: HazardKind,
    pub start_x: f64,
    pub end_x: f64,
    pub magnitude: f64,
}

impl HazardZone {
    pub fn new(kind: HazardKind, start_x: f64, end_x: f64, magnitude: f64) -> Self {
        Self {
            kind,
            start_x,
            end_x,
            magnitude,
        }
    }

    pub fn overhang(start_x: f64, width: f64, clearance: f64) -> Self {
        Self::new(HazardKind::Overhang, start_x, start_x + width, clearance)
    }

    pub fn tunnel(start_x: f64, width: f64, clearance: f64) -> Self {
        Self::new(HazardKind::Tunnel, start_x, start_x + width, clearance)
    }

    pub fn recess(start_x: f64, width: f64, clearance: f64) -> Self {
        Self::new(HazardKind::Recess, start_x, start_x + width, clearance)
    }

    pub fn floor_offset(start_x: f64, width: f64, offset: f64) -> Self {
        Self::new(HazardKind::FloorOffset, start_x, start_x + width, offset)
    }

    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        in_span(x, self.start_x, self.end_x)
    }

    /// Whether the zone touches the closed span `[start, end]`
    #[inline]
    pub fn intersects(&self, start: f64, end: f64) -> bool {
        start <= self.end_x && end >= self.start_x
    }
}
