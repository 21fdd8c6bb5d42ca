//! Rays and planes for picking and lasso selection

use super::math::Vec3;

/// Normals shorter than this are treated as degenerate
const DEGENERATE_EPSILON: f32 = 1e-10;

/// A 3D ray with origin and direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,  // Normalized
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize()
        }
    }

    /// Get point at distance t along ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Squared perpendicular distance from `point` to the ray's line.
    ///
    /// `|cross(point - origin, direction)|²`, valid because the direction is
    /// unit length.
    pub fn distance_sq_to_point(&self, point: Vec3) -> f32 {
        (point - self.origin).cross(self.direction).len_sq()
    }
}

/// An oriented plane: `dot(normal, p) + d = 0`, positive side along `normal`
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    /// Plane through three points, normal = (b - a) x (c - a).
    ///
    /// Returns None if the points are collinear.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let n = (b - a).cross(c - a);
        if n.len_sq() < DEGENERATE_EPSILON {
            return None;
        }
        let normal = n.normalize();
        Some(Self { normal, d: -normal.dot(a) })
    }

    /// Signed distance from the plane (positive on the normal side)
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.d
    }

    /// Same plane with the positive side flipped
    pub fn flipped(self) -> Self {
        Self { normal: -self.normal, d: -self.d }
    }

    /// Flip if needed so `inside` ends up on the positive side
    pub fn facing(self, inside: Vec3) -> Self {
        if self.signed_distance(inside) < 0.0 {
            self.flipped()
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        );
        let p = ray.at(5.0);
        assert!((p.x - 5.0).abs() < 0.001);
        assert!((p.y - 0.0).abs() < 0.001);
        assert!((p.z - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_distance_to_point() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(ray.distance_sq_to_point(Vec3::new(0.0, 0.0, 3.0)) < 0.0001);
        assert!((ray.distance_sq_to_point(Vec3::new(0.3, 0.4, 0.0)) - 0.25).abs() < 0.0001);
        // Behind the origin still measures distance to the line
        assert!((ray.distance_sq_to_point(Vec3::new(1.0, 0.0, -20.0)) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_plane_from_points() {
        let plane = Plane::from_points(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ).unwrap();
        assert!((plane.normal.z - 1.0).abs() < 0.001);
        assert!((plane.signed_distance(Vec3::new(5.0, 5.0, 2.0)) - 2.0).abs() < 0.001);

        let flipped = plane.facing(Vec3::new(0.0, 0.0, -1.0));
        assert!(flipped.signed_distance(Vec3::new(0.0, 0.0, -1.0)) > 0.0);
    }

    #[test]
    fn test_plane_collinear_points() {
        let plane = Plane::from_points(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        );
        assert!(plane.is_none());
    }
}
