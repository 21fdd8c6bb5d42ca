//! Orbit camera and screen-to-world unprojection
//!
//! The camera looks along `basis_z`. Screen X grows along `basis_x` and
//! screen Y grows downward along `basis_y`, matching mouse coordinates.
//! The projection is a symmetric pinhole with vertical field of view
//! `fov_y`, so a host renderer using the same field of view and aspect
//! ratio lines up with the rays produced here.

use super::math::Vec3;
use super::ray::Ray;

/// Host camera contract used by picking and lasso selection
pub trait ScreenProjector {
    /// World-space ray through a screen point (pixels, origin top-left)
    fn screen_ray(&self, screen: (f32, f32)) -> Ray;

    /// Camera forward direction, used for the facing test
    fn forward(&self) -> Vec3;

    /// Whether back-facing vertices may be picked (e.g. wireframe view)
    fn backfaces_selectable(&self) -> bool {
        false
    }
}

/// Camera state for the 3D viewport
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub rotation_x: f32, // Pitch
    pub rotation_y: f32, // Yaw
    /// Vertical field of view in radians
    pub fov_y: f32,

    // Computed basis vectors
    pub basis_x: Vec3,
    pub basis_y: Vec3,
    pub basis_z: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        let mut cam = Self {
            position: Vec3::ZERO,
            rotation_x: 0.0,
            rotation_y: 0.0,
            fov_y: 45f32.to_radians(),
            basis_x: Vec3::new(1.0, 0.0, 0.0),
            basis_y: Vec3::new(0.0, 1.0, 0.0),
            basis_z: Vec3::new(0.0, 0.0, 1.0),
        };
        cam.update_basis();
        cam
    }

    pub fn update_basis(&mut self) {
        let upward = Vec3::new(0.0, -1.0, 0.0);  // Use -Y as up to match screen coordinates

        // Forward vector based on rotation
        self.basis_z = Vec3 {
            x: self.rotation_x.cos() * self.rotation_y.sin(),
            y: -self.rotation_x.sin(),
            z: self.rotation_x.cos() * self.rotation_y.cos(),
        };

        // Right vector
        self.basis_x = upward.cross(self.basis_z).normalize();

        // Down vector (screen Y)
        self.basis_y = self.basis_z.cross(self.basis_x);
    }

    /// Place the camera on an orbit around `target`
    pub fn set_orbit(&mut self, target: Vec3, distance: f32, azimuth: f32, elevation: f32) {
        self.rotation_x = elevation.clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );
        self.rotation_y = azimuth;
        self.update_basis();

        // Camera sits behind the target along the forward direction
        self.position = target - self.basis_z * distance;
    }

    /// Ray through a screen point for a viewport of the given size
    pub fn screen_to_ray(&self, screen_x: f32, screen_y: f32, width: f32, height: f32) -> Ray {
        let half_h = (self.fov_y * 0.5).tan();
        let aspect = if height > 0.0 { width / height } else { 1.0 };

        // Normalized coords: -1..1, Y pointing down like the screen
        let ndc_x = if width > 0.0 { screen_x / width * 2.0 - 1.0 } else { 0.0 };
        let ndc_y = if height > 0.0 { screen_y / height * 2.0 - 1.0 } else { 0.0 };

        let dir = self.basis_z
            + self.basis_x * (ndc_x * half_h * aspect)
            + self.basis_y * (ndc_y * half_h);

        Ray::new(self.position, dir)
    }

    /// Project a world-space point to screen pixels (inverse of `screen_to_ray`).
    /// Returns (screen_x, screen_y, depth), None if behind the camera.
    pub fn world_to_screen(&self, world_pos: Vec3, width: f32, height: f32) -> Option<(f32, f32, f32)> {
        let rel = world_pos - self.position;
        let cam_z = rel.dot(self.basis_z);

        // Behind camera
        if cam_z <= 0.01 {
            return None;
        }

        let half_h = (self.fov_y * 0.5).tan();
        let aspect = if height > 0.0 { width / height } else { 1.0 };

        let ndc_x = rel.dot(self.basis_x) / (cam_z * half_h * aspect);
        let ndc_y = rel.dot(self.basis_y) / (cam_z * half_h);

        Some(((ndc_x + 1.0) * 0.5 * width, (ndc_y + 1.0) * 0.5 * height, cam_z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// A camera bound to a viewport size and render mode
#[derive(Clone, Debug)]
pub struct Viewport {
    pub camera: Camera,
    pub width: f32,
    pub height: f32,
    /// X-ray / wireframe display: back-facing vertices are pickable
    pub xray_mode: bool,
}

impl Viewport {
    pub fn new(camera: Camera, width: f32, height: f32) -> Self {
        Self { camera, width, height, xray_mode: false }
    }
}

impl ScreenProjector for Viewport {
    fn screen_ray(&self, screen: (f32, f32)) -> Ray {
        self.camera.screen_to_ray(screen.0, screen.1, self.width, self.height)
    }

    fn forward(&self) -> Vec3 {
        self.camera.basis_z
    }

    fn backfaces_selectable(&self) -> bool {
        self.xray_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_to_ray_center() {
        // A ray from screen center should go straight along the view direction
        let mut camera = Camera::new();
        camera.set_orbit(Vec3::ZERO, 10.0, 0.6, 0.3);

        let ray = camera.screen_to_ray(160.0, 120.0, 320.0, 240.0);
        let dot = ray.direction.dot(camera.basis_z);
        assert!(dot > 0.999, "Center ray should be aligned with camera forward, got dot={}", dot);
    }

    #[test]
    fn test_orbit_looks_at_target() {
        let mut camera = Camera::new();
        let target = Vec3::new(1.0, 2.0, 3.0);
        camera.set_orbit(target, 5.0, 1.0, -0.4);

        let to_target = (target - camera.position).normalize();
        assert!(to_target.dot(camera.basis_z) > 0.999);
        assert!(((target - camera.position).len() - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_screen_axes_follow_mouse_coordinates() {
        // Looking down +Z with world Y up: screen right is world -X, screen down is world -Y
        let camera = Camera::new();
        let right = camera.screen_to_ray(320.0, 120.0, 320.0, 240.0);
        let down = camera.screen_to_ray(160.0, 240.0, 320.0, 240.0);
        assert!(right.direction.x < 0.0);
        assert!(down.direction.y < 0.0);

        // Top edge of the viewport is half the vertical field of view away
        let top = camera.screen_to_ray(160.0, 0.0, 320.0, 240.0);
        let angle = top.direction.dot(camera.basis_z).acos();
        assert!((angle - camera.fov_y * 0.5).abs() < 0.001);
    }

    #[test]
    fn test_world_to_screen_inverts_ray() {
        let mut camera = Camera::new();
        camera.set_orbit(Vec3::new(0.0, 1.0, 0.0), 4.0, 0.8, 0.2);

        let ray = camera.screen_to_ray(250.0, 60.0, 320.0, 240.0);
        let (sx, sy, depth) = camera.world_to_screen(ray.at(3.0), 320.0, 240.0).unwrap();
        assert!((sx - 250.0).abs() < 0.01, "sx={}", sx);
        assert!((sy - 60.0).abs() < 0.01, "sy={}", sy);
        assert!(depth > 0.0);

        let behind = camera.position - camera.basis_z;
        assert!(camera.world_to_screen(behind, 320.0, 240.0).is_none());
    }

    #[test]
    fn test_viewport_projector() {
        let mut viewport = Viewport::new(Camera::new(), 320.0, 240.0);
        assert!(!viewport.backfaces_selectable());
        viewport.xray_mode = true;
        assert!(viewport.backfaces_selectable());
        assert!((viewport.forward().z - 1.0).abs() < 0.001);
    }
}
