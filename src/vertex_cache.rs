//! World-space vertex cache
//!
//! Holds the last-known world positions and normals of the skinned mesh and
//! reports when they went stale. Picking, lasso and the marker mesh all read
//! from here, never from the host mesh directly.

use serde::{Deserialize, Serialize};
use crate::geometry::{Mat4, Vec3, mat4_from_position_rotation, mat4_transform_point, mat4_transform_vector};

/// Current transform of the mesh's deformation root
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BonePose {
    /// World position of the root bone
    pub position: Vec3,
    /// Rotation in euler angles (degrees)
    pub rotation: Vec3,
}

impl BonePose {
    pub const IDENTITY: BonePose = BonePose { position: Vec3::ZERO, rotation: Vec3::ZERO };

    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn to_matrix(&self) -> Mat4 {
        mat4_from_position_rotation(self.position, self.rotation)
    }
}

/// Host-side skinned mesh: rest-space geometry plus the live root pose
pub trait SkinnedMeshSource {
    /// Rest-space vertex positions (skin space)
    fn rest_positions(&self) -> &[Vec3];
    /// Rest-space vertex normals, parallel to `rest_positions`
    fn rest_normals(&self) -> &[Vec3];
    /// Current root bone transform
    fn root_pose(&self) -> BonePose;
}

/// Cached world-space positions and normals
#[derive(Debug, Clone, Default)]
pub struct VertexCache {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    built: bool,
    stale_epsilon: f32,
}

impl VertexCache {
    pub fn new(stale_epsilon: f32) -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            built: false,
            stale_epsilon,
        }
    }

    /// Re-transform the rest vertices by `pose`.
    ///
    /// Returns true if anything dependents draw from changed: first build,
    /// vertex count change, or any position moving by more than the
    /// staleness epsilon. If positions and normals disagree in length, the
    /// shorter length is used.
    pub fn refresh(&mut self, rest_positions: &[Vec3], rest_normals: &[Vec3], pose: &BonePose) -> bool {
        let count = rest_positions.len().min(rest_normals.len());
        let m = pose.to_matrix();

        let count_changed = count != self.positions.len();
        let mut stale = !self.built || count_changed;

        if count_changed {
            self.positions.resize(count, Vec3::ZERO);
            self.normals.resize(count, Vec3::ZERO);
        }

        for i in 0..count {
            let world = mat4_transform_point(&m, rest_positions[i]);
            if !stale && !world.approx_eq(self.positions[i], self.stale_epsilon) {
                stale = true;
            }
            self.positions[i] = world;
            self.normals[i] = mat4_transform_vector(&m, rest_normals[i]).normalize();
        }

        if stale {
            log::debug!(
                "vertex cache rebuilt: {} vertices{}",
                count,
                if count_changed { " (count changed)" } else { "" },
            );
        }

        self.built = true;
        stale
    }

    /// Refresh from a host mesh
    pub fn refresh_from(&mut self, source: &dyn SkinnedMeshSource) -> bool {
        let pose = source.root_pose();
        self.refresh(source.rest_positions(), source.rest_normals(), &pose)
    }

    /// Drop everything; the next refresh reports stale
    pub fn invalidate(&mut self) {
        self.built = false;
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
