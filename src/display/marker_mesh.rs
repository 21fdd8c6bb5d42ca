//! Combined marker mesh
//!
//! One small cube per vertex, all packed into a single 16-bit indexed mesh so
//! the host can draw the whole visualization in one call.

use crate::coefficients::{CoefficientChannel, CoefficientStore};
use crate::config::{MARKER_CAPACITY, MARKER_VERTEX_COUNT};
use crate::geometry::Vec3;
use super::color_map::{color_for, Color, ValueRange};

/// Two triangles per cube face. Corner `i` sits at
/// (`i & 1`, `(i >> 1) & 1`, `(i >> 2) & 1`) scaled to +-half size.
const CUBE_INDICES: [u16; 36] = [
    0, 2, 6, 0, 6, 4, // -X
    1, 5, 7, 1, 7, 3, // +X
    0, 4, 5, 0, 5, 1, // -Y
    2, 3, 7, 2, 7, 6, // +Y
    0, 1, 3, 0, 3, 2, // -Z
    4, 6, 7, 4, 7, 5, // +Z
];

/// Marker geometry ready for drawing
#[derive(Debug, Clone, Default)]
pub struct MarkerMesh {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Color>,
    pub indices: Vec<u16>,
    /// Number of cubes in the mesh
    pub marker_count: usize,
    /// Vertices past the budget were left out
    pub truncated: bool,
}

impl MarkerMesh {
    pub fn is_empty(&self) -> bool {
        self.marker_count == 0
    }

    fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.indices.clear();
        self.marker_count = 0;
        self.truncated = false;
    }

    fn push_cube(&mut self, center: Vec3, half: f32, color: Color) {
        let base = self.positions.len() as u16;
        for i in 0..MARKER_VERTEX_COUNT {
            let corner = Vec3::new(
                if i & 1 == 0 { -half } else { half },
                if (i >> 1) & 1 == 0 { -half } else { half },
                if (i >> 2) & 1 == 0 { -half } else { half },
            );
            self.positions.push(center + corner);
            self.colors.push(color);
        }
        self.indices.extend(CUBE_INDICES.iter().map(|&i| base + i));
        self.marker_count += 1;
    }
}

/// Rebuilds the marker mesh when told something it draws from changed
#[derive(Debug, Clone)]
pub struct MarkerMeshBuilder {
    half_size: f32,
    budget: usize,
    dirty: bool,
    /// Vertex count of the last truncation warning
    warned_total: Option<usize>,
    mesh: MarkerMesh,
}

impl MarkerMeshBuilder {
    /// `budget` is clamped to what 16-bit indices can address
    pub fn new(half_size: f32, budget: usize) -> Self {
        Self {
            half_size,
            budget: budget.min(MARKER_CAPACITY),
            dirty: true,
            warned_total: None,
            mesh: MarkerMesh::default(),
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mesh(&self) -> &MarkerMesh {
        &self.mesh
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Rebuild from the cached world positions.
    ///
    /// `selected(i)` reports the displayed selection state of vertex `i`
    /// (persistent selection with any lasso preview merged in). Vertices
    /// without a coefficient record draw at the bottom of the ramp.
    pub fn rebuild(
        &mut self,
        positions: &[Vec3],
        store: &dyn CoefficientStore,
        channel: CoefficientChannel,
        selected: &dyn Fn(usize) -> bool,
    ) -> &MarkerMesh {
        let range = ValueRange::of_channel(store, channel);
        let count = positions.len().min(self.budget);

        self.mesh.clear();
        self.mesh.positions.reserve(count * MARKER_VERTEX_COUNT);
        self.mesh.colors.reserve(count * MARKER_VERTEX_COUNT);
        self.mesh.indices.reserve(count * CUBE_INDICES.len());

        for (idx, &pos) in positions.iter().take(count).enumerate() {
            let value = store.get(idx).map(|r| channel.get(&r)).unwrap_or(range.min);
            let color = color_for(value, range, selected(idx));
            self.mesh.push_cube(pos, self.half_size, color);
        }

        self.mesh.truncated = positions.len() > count;
        self.note_truncation(count, positions.len());

        self.dirty = false;
        &self.mesh
    }

    /// Warn once per truncated vertex count. Returns true if it warned.
    fn note_truncation(&mut self, shown: usize, total: usize) -> bool {
        if shown >= total {
            self.warned_total = None;
            return false;
        }
        if self.warned_total == Some(total) {
            return false;
        }
        self.warned_total = Some(total);
        log::warn!(
            "marker mesh truncated: showing {} of {} vertices; the rest are hidden and not selectable",
            shown,
            total,
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::{CoefficientBuffer, CoefficientRecord};

    fn positions(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect()
    }

    fn store(n: usize) -> CoefficientBuffer {
        CoefficientBuffer::from_records(
            (0..n).map(|i| CoefficientRecord { max_distance: i as f32, ..Default::default() }).collect(),
        )
    }

    #[test]
    fn test_cube_per_vertex() {
        let mut builder = MarkerMeshBuilder::new(0.5, 100);
        assert!(builder.is_dirty());
        let mesh = builder.rebuild(&positions(3), &store(3), CoefficientChannel::MaxDistance, &|_| false);

        assert_eq!(mesh.marker_count, 3);
        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.colors.len(), 24);
        assert_eq!(mesh.indices.len(), 3 * 36);
        assert!(!mesh.truncated);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.positions.len()));

        // Second cube is centred on vertex 1
        let sum = mesh.positions[8..16].iter().fold(Vec3::ZERO, |acc, &p| acc + p);
        assert!(sum.scale(1.0 / 8.0).approx_eq(Vec3::new(1.0, 0.0, 0.0), 0.001));
        assert!(!builder.is_dirty());
    }

    #[test]
    fn test_cube_faces_cover_all_corners() {
        let mut seen = [0usize; 8];
        for &i in CUBE_INDICES.iter() {
            seen[i as usize] += 1;
        }
        // Every corner belongs to three faces
        assert!(seen.iter().all(|&n| n >= 3));
    }

    #[test]
    fn test_colors_follow_value_and_selection() {
        let mut builder = MarkerMeshBuilder::new(0.1, 100);
        let mesh = builder.rebuild(&positions(3), &store(3), CoefficientChannel::MaxDistance, &|i| i == 1);
        assert_eq!(mesh.colors[0], Color::GREEN);
        assert_eq!(mesh.colors[8], Color::RED);
        assert_eq!(mesh.colors[16], Color::BLUE);
    }

    #[test]
    fn test_budget_truncates() {
        let mut builder = MarkerMeshBuilder::new(0.1, 2);
        let mesh = builder.rebuild(&positions(5), &store(5), CoefficientChannel::MaxDistance, &|_| false);
        assert_eq!(mesh.marker_count, 2);
        assert!(mesh.truncated);
    }

    #[test]
    fn test_truncation_warns_once_per_count() {
        let mut builder = MarkerMeshBuilder::new(0.1, 2);
        let store = store(6);
        let channel = CoefficientChannel::MaxDistance;

        builder.rebuild(&positions(5), &store, channel, &|_| false);
        assert_eq!(builder.warned_total, Some(5));

        // Same oversized mesh, rebuilt every frame
        for _ in 0..3 {
            assert!(builder.rebuild(&positions(5), &store, channel, &|_| false).truncated);
            assert!(!builder.note_truncation(2, 5));
        }

        // Vertex count changed
        assert!(builder.note_truncation(2, 6));
        assert!(!builder.note_truncation(2, 6));

        // Back under budget, then over again
        assert!(!builder.rebuild(&positions(2), &store, channel, &|_| false).truncated);
        assert_eq!(builder.warned_total, None);
        assert!(builder.note_truncation(2, 6));
    }

    #[test]
    fn test_full_capacity_fits_u16() {
        let mut builder = MarkerMeshBuilder::new(0.1, usize::MAX);
        assert_eq!(builder.budget(), MARKER_CAPACITY);
        let n = MARKER_CAPACITY + 10;
        let mesh = builder.rebuild(&positions(n), &CoefficientBuffer::default(), CoefficientChannel::MaxDistance, &|_| false);
        assert_eq!(mesh.marker_count, MARKER_CAPACITY);
        assert_eq!(mesh.indices.iter().copied().max(), Some(u16::MAX));
        assert!(mesh.truncated);
    }

    #[test]
    fn test_empty_and_missing_records() {
        let mut builder = MarkerMeshBuilder::new(0.1, 10);
        assert!(builder.rebuild(&[], &store(0), CoefficientChannel::MaxDistance, &|_| false).is_empty());

        // Store shorter than the mesh
        let mesh = builder.rebuild(&positions(2), &store(1), CoefficientChannel::MaxDistance, &|_| false);
        assert_eq!(mesh.marker_count, 2);
        assert_eq!(mesh.colors[8], Color::GREEN);
    }
}
