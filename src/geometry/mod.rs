//! Geometry primitives for picking and lasso selection
//!
//! - `math` - Vec3 and 4x4 matrix helpers
//! - `ray` - Ray, Plane
//! - `camera` - orbit Camera, Viewport and the ScreenProjector trait

pub mod camera;
pub mod math;
pub mod ray;

pub use camera::{Camera, ScreenProjector, Viewport};
pub use math::{
    Vec3, Mat4,
    mat4_translation, mat4_rotation, mat4_mul,
    mat4_transform_point, mat4_transform_vector, mat4_from_position_rotation,
};
pub use ray::{Ray, Plane};
