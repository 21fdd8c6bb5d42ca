//! Per-vertex cloth coefficients
//!
//! The host owns the coefficient array; the engine reads and writes it only
//! through [`CoefficientStore`]. [`editor`] holds the batch and paint edits.

pub mod editor;

pub use editor::{average, paint, set_all};

use serde::{Deserialize, Serialize};

/// The four scalar coefficients carried by every vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRecord {
    /// How far the simulated vertex may travel from its skinned position (>= 0)
    pub max_distance: f32,
    /// Skews the travel range along the normal, in [-1, 1]
    pub max_distance_bias: f32,
    /// Collision sphere radius (>= 0)
    pub collision_sphere_radius: f32,
    /// Collision sphere offset along the inverted normal
    pub collision_sphere_distance: f32,
}

impl Default for CoefficientRecord {
    fn default() -> Self {
        Self {
            max_distance: 0.0,
            max_distance_bias: 0.0,
            collision_sphere_radius: 0.0,
            collision_sphere_distance: 0.0,
        }
    }
}

/// One coefficient column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CoefficientChannel {
    #[default]
    MaxDistance,
    MaxDistanceBias,
    CollisionSphereRadius,
    CollisionSphereDistance,
}

impl CoefficientChannel {
    pub const ALL: [CoefficientChannel; 4] = [
        CoefficientChannel::MaxDistance,
        CoefficientChannel::MaxDistanceBias,
        CoefficientChannel::CollisionSphereRadius,
        CoefficientChannel::CollisionSphereDistance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CoefficientChannel::MaxDistance => "Max Distance",
            CoefficientChannel::MaxDistanceBias => "Max Distance Bias",
            CoefficientChannel::CollisionSphereRadius => "Collision Sphere Radius",
            CoefficientChannel::CollisionSphereDistance => "Collision Sphere Distance",
        }
    }

    /// Position in [`Self::ALL`]
    pub fn index(&self) -> usize {
        match self {
            CoefficientChannel::MaxDistance => 0,
            CoefficientChannel::MaxDistanceBias => 1,
            CoefficientChannel::CollisionSphereRadius => 2,
            CoefficientChannel::CollisionSphereDistance => 3,
        }
    }

    pub fn get(&self, record: &CoefficientRecord) -> f32 {
        match self {
            CoefficientChannel::MaxDistance => record.max_distance,
            CoefficientChannel::MaxDistanceBias => record.max_distance_bias,
            CoefficientChannel::CollisionSphereRadius => record.collision_sphere_radius,
            CoefficientChannel::CollisionSphereDistance => record.collision_sphere_distance,
        }
    }

    /// Write `value` after clamping it to the channel's valid range
    pub fn set(&self, record: &mut CoefficientRecord, value: f32) {
        let value = self.clamp(value);
        match self {
            CoefficientChannel::MaxDistance => record.max_distance = value,
            CoefficientChannel::MaxDistanceBias => record.max_distance_bias = value,
            CoefficientChannel::CollisionSphereRadius => record.collision_sphere_radius = value,
            CoefficientChannel::CollisionSphereDistance => record.collision_sphere_distance = value,
        }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        match self {
            CoefficientChannel::MaxDistanceBias => value.clamp(-1.0, 1.0),
            CoefficientChannel::MaxDistance | CoefficientChannel::CollisionSphereRadius => value.max(0.0),
            CoefficientChannel::CollisionSphereDistance => value,
        }
    }
}

/// Host-owned coefficient storage, indexed in parallel with the mesh vertices
pub trait CoefficientStore {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, idx: usize) -> Option<CoefficientRecord>;

    /// Returns false if `idx` is out of range
    fn set(&mut self, idx: usize, record: CoefficientRecord) -> bool;

    /// Tell the host the coefficients changed (persist / re-simulate)
    fn mark_dirty(&mut self);
}

/// Plain `Vec`-backed store with a dirty flag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoefficientBuffer {
    pub records: Vec<CoefficientRecord>,
    #[serde(skip)]
    dirty: bool,
}

impl CoefficientBuffer {
    pub fn new(count: usize) -> Self {
        Self { records: vec![CoefficientRecord::default(); count], dirty: false }
    }

    pub fn from_records(records: Vec<CoefficientRecord>) -> Self {
        Self { records, dirty: false }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and reset the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Match the mesh vertex count; new entries are default records
    pub fn resize(&mut self, count: usize) {
        if self.records.len() != count {
            self.records.resize(count, CoefficientRecord::default());
            self.dirty = true;
        }
    }
}

impl CoefficientStore for CoefficientBuffer {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn get(&self, idx: usize) -> Option<CoefficientRecord> {
        self.records.get(idx).copied()
    }

    fn set(&mut self, idx: usize, record: CoefficientRecord) -> bool {
        match self.records.get_mut(idx) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

/// One paint channel: whether it is written and what value it paints
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PaintChannel {
    pub enabled: bool,
    pub value: f32,
}

/// Paint brush settings, persistent across strokes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PaintState {
    /// Indexed by [`CoefficientChannel::index`]
    pub channels: [PaintChannel; 4],
}

impl PaintState {
    pub fn channel(&self, channel: CoefficientChannel) -> PaintChannel {
        self.channels[channel.index()]
    }

    pub fn channel_mut(&mut self, channel: CoefficientChannel) -> &mut PaintChannel {
        &mut self.channels[channel.index()]
    }

    /// Enable `channel` and set its target value
    pub fn enable(&mut self, channel: CoefficientChannel, value: f32) {
        *self.channel_mut(channel) = PaintChannel { enabled: true, value };
    }

    pub fn disable(&mut self, channel: CoefficientChannel) {
        self.channel_mut(channel).enabled = false;
    }

    pub fn any_enabled(&self) -> bool {
        self.channels.iter().any(|c| c.enabled)
    }
}
