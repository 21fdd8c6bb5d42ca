//! Rectangle (lasso) selection
//!
//! The screen rectangle is unprojected into four world-space half-spaces
//! (top, bottom, left, right). A vertex is inside the lasso when it sits on
//! the inner side of all four and passes the facing test.

use crate::geometry::{Plane, ScreenProjector, Vec3};
use super::FacingMode;

/// Screen-space rectangle being dragged out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LassoRect {
    /// Starting mouse position (corner of box)
    pub start: (f32, f32),
    /// Current mouse position (opposite corner)
    pub current: (f32, f32),
}

impl LassoRect {
    pub fn new(start: (f32, f32)) -> Self {
        Self { start, current: start }
    }

    /// Get the selection rectangle bounds as (min, max) corners
    pub fn bounds(&self) -> ((f32, f32), (f32, f32)) {
        let min = (self.start.0.min(self.current.0), self.start.1.min(self.current.1));
        let max = (self.start.0.max(self.current.0), self.start.1.max(self.current.1));
        (min, max)
    }

    /// Get width of the selection box
    pub fn width(&self) -> f32 {
        (self.current.0 - self.start.0).abs()
    }

    /// Get height of the selection box
    pub fn height(&self) -> f32 {
        (self.current.1 - self.start.1).abs()
    }
}

/// The four inward-facing planes bounding a lasso rectangle in world space
#[derive(Debug, Clone, Copy)]
pub struct LassoFrustum {
    /// Top, right, bottom, left
    pub planes: [Plane; 4],
}

impl LassoFrustum {
    /// Unproject a screen rectangle through `projector`.
    ///
    /// Returns None for a rectangle with no area (every vertex would be
    /// outside anyway).
    pub fn build(rect_min: (f32, f32), rect_max: (f32, f32), projector: &dyn ScreenProjector) -> Option<Self> {
        let corners = [
            (rect_min.0, rect_min.1),
            (rect_max.0, rect_min.1),
            (rect_max.0, rect_max.1),
            (rect_min.0, rect_max.1),
        ];
        let rays = corners.map(|c| projector.screen_ray(c));

        let center = projector
            .screen_ray(((rect_min.0 + rect_max.0) * 0.5, (rect_min.1 + rect_max.1) * 0.5))
            .at(1.0);

        let mut planes = [Plane { normal: Vec3::ZERO, d: 0.0 }; 4];
        for i in 0..4 {
            let a = &rays[i];
            let b = &rays[(i + 1) % 4];
            planes[i] = Plane::from_points(a.origin, a.at(1.0), b.at(1.0))?.facing(center);
        }

        Some(Self { planes })
    }

    /// Inside (or on) all four planes
    pub fn contains(&self, p: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.signed_distance(p) >= 0.0)
    }

    /// Per-vertex membership, parallel to `positions`
    pub fn test_membership(&self, positions: &[Vec3], normals: &[Vec3], facing: FacingMode) -> Vec<bool> {
        let mut inside = vec![false; positions.len()];
        for (idx, (&pos, &normal)) in positions.iter().zip(normals).enumerate() {
            inside[idx] = facing.accepts(normal) && self.contains(pos);
        }
        inside
    }
}

/// Build the frustum and test every vertex; empty rectangles select nothing
pub fn lasso_select(
    rect: &LassoRect,
    projector: &dyn ScreenProjector,
    positions: &[Vec3],
    normals: &[Vec3],
    facing: FacingMode,
) -> Vec<bool> {
    let (min, max) = rect.bounds();
    match LassoFrustum::build(min, max, projector) {
        Some(frustum) => frustum.test_membership(positions, normals, facing),
        None => vec![false; positions.len()],
    }
}
