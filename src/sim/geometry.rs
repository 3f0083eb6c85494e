//! Axis-aligned rectangle geometry
//!
//! Every body in the field is a centered rectangle:
//! - center: world position of the entity
//! - half: half width / half height (fixed per entity variant)

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A centered axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Build from a full (width, height) size
    pub fn from_size(center: Vec2, size: (f32, f32)) -> Self {
        Self::new(center, Vec2::new(size.0, size.1) * 0.5)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }

    /// Inclusive containment test
    pub fn contains_point(&self, p: Vec2) -> bool {
        let d = (p - self.center).abs();
        d.x <= self.half.x && d.y <= self.half.y
    }

    /// Same extent, moved to a new center
    #[inline]
    pub fn at(&self, center: Vec2) -> Rect {
        Rect::new(center, self.half)
    }

    /// Smallest dimension, used to pick a sub-step length
    #[inline]
    pub fn thinnest(&self) -> f32 {
        self.half.x.min(self.half.y) * 2.0
    }
}

/// Number of sub-steps needed so neither body moves more than half of the
/// thinner body's smallest dimension between samples.
pub fn substeps_for(travel: f32, a: &Rect, b: &Rect) -> u32 {
    let step = (a.thinnest().min(b.thinnest()) * 0.5).max(0.5);
    ((travel / step).ceil() as u32).clamp(1, 64)
}

/// Swept overlap: both rectangles move linearly from `*_from` to their current
/// centers over the step. Samples the motion at sub-step resolution so a fast
/// body cannot skip over a thin one.
pub fn swept_overlap(a: &Rect, a_from: Vec2, b: &Rect, b_from: Vec2) -> bool {
    if a.overlaps(b) {
        return true;
    }

    // Relative motion is what matters for tunneling
    let travel = ((a.center - a_from) - (b.center - b_from)).length();
    if travel <= f32::EPSILON {
        return false;
    }

    let steps = substeps_for(travel, a, b);
    (0..steps).any(|i| {
        let t = i as f32 / steps as f32;
        let pa = a_from.lerp(a.center, t);
        let pb = b_from.lerp(b.center, t);
        a.at(pa).overlaps(&b.at(pb))
    })
}
