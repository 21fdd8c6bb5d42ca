//! Nearest-vertex-under-ray query

use crate::geometry::{Ray, Vec3};
use super::FacingMode;

/// Vertex picker with a fixed world-space pick radius
#[derive(Debug, Clone, Copy)]
pub struct Picker {
    /// Squared distance from the ray that still counts as a hit
    pub radius_sq: f32,
}

impl Picker {
    pub fn new(radius_sq: f32) -> Self {
        Self { radius_sq }
    }

    /// Find the vertex closest to `ray` within the pick radius.
    ///
    /// Vertices behind the ray origin are never hit. Back-facing vertices
    /// are skipped unless `facing` allows them. On equal
    /// distance the lower index wins. Positions and normals are read as
    /// parallel arrays; extra entries in the longer one are ignored.
    pub fn find_nearest(
        &self,
        ray: &Ray,
        positions: &[Vec3],
        normals: &[Vec3],
        facing: FacingMode,
    ) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None; // (index, distance)

        for (idx, (&pos, &normal)) in positions.iter().zip(normals).enumerate() {
            // Behind the eye
            if (pos - ray.origin).dot(ray.direction) < 0.0 {
                continue;
            }
            let dist = ray.distance_sq_to_point(pos);
            if dist >= self.radius_sq {
                continue;
            }
            if !facing.accepts(normal) {
                continue;
            }
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((idx, dist));
            }
        }

        best.map(|(idx, _)| idx)
    }
}

impl Default for Picker {
    fn default() -> Self {
        Self::new(0.05 * 0.05)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOWARD_CAMERA: Vec3 = Vec3 { x: 0.0, y: 0.0, z: -1.0 };
    const AWAY: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    fn front() -> FacingMode {
        FacingMode::FrontOnly { forward: Vec3::FORWARD }
    }

    fn ray_at(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, -10.0), Vec3::FORWARD)
    }

    #[test]
    fn test_picks_closest_candidate() {
        let positions = [
            Vec3::new(0.03, 0.0, 0.0),
            Vec3::new(0.01, 0.0, 5.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];
        let normals = [TOWARD_CAMERA; 3];
        let hit = Picker::default().find_nearest(&ray_at(0.0, 0.0), &positions, &normals, front());
        assert_eq!(hit, Some(1));
    }

    #[test]
    fn test_outside_radius_is_none() {
        let positions = [Vec3::new(0.06, 0.0, 0.0)];
        let hit = Picker::default().find_nearest(&ray_at(0.0, 0.0), &positions, &[TOWARD_CAMERA], front());
        assert_eq!(hit, None);
    }

    #[test]
    fn test_back_facing_skipped_unless_allowed() {
        let positions = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.02, 0.0, 0.0)];
        let normals = [AWAY, TOWARD_CAMERA];
        let picker = Picker::default();

        assert_eq!(picker.find_nearest(&ray_at(0.0, 0.0), &positions, &normals, front()), Some(1));
        assert_eq!(picker.find_nearest(&ray_at(0.0, 0.0), &positions, &normals, FacingMode::Both), Some(0));
    }

    #[test]
    fn test_perpendicular_normal_counts_as_front() {
        let positions = [Vec3::ZERO];
        let normals = [Vec3::new(1.0, 0.0, 0.0)];
        assert_eq!(Picker::default().find_nearest(&ray_at(0.0, 0.0), &positions, &normals, front()), Some(0));
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let positions = [Vec3::new(0.01, 0.0, 0.0), Vec3::new(-0.01, 0.0, 0.0), Vec3::new(0.01, 0.0, 3.0)];
        let normals = [TOWARD_CAMERA; 3];
        assert_eq!(Picker::default().find_nearest(&ray_at(0.0, 0.0), &positions, &normals, front()), Some(0));
    }

    #[test]
    fn test_vertex_behind_camera_not_picked() {
        use crate::geometry::{Camera, ScreenProjector, Viewport};

        let mut camera = Camera::new();
        camera.set_orbit(Vec3::ZERO, 10.0, 0.0, 0.0);
        let viewport = Viewport::new(camera, 200.0, 200.0);
        let ray = viewport.screen_ray((100.0, 100.0));

        // On the centre ray's line, 5 units behind the eye at z=-10
        let positions = [Vec3::new(0.0, 0.0, -15.0)];
        let picker = Picker::default();
        assert_eq!(picker.find_nearest(&ray, &positions, &[TOWARD_CAMERA], FacingMode::Both), None);

        // Same line in front of the eye is a hit
        let positions = [Vec3::new(0.0, 0.0, -5.0)];
        assert_eq!(picker.find_nearest(&ray, &positions, &[TOWARD_CAMERA], FacingMode::Both), Some(0));
    }

    #[test]
    fn test_empty_mesh() {
        assert_eq!(Picker::default().find_nearest(&ray_at(0.0, 0.0), &[], &[], FacingMode::Both), None);
    }
}
