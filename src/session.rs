//! Tool session
//!
//! Everything one open paint tool needs: vertex cache, selection state
//! machine, paint brush, visualized channel and the marker mesh. The host
//! creates one per tool instance and drives it with:
//!
//! 1. `handle_event` for each pointer event
//! 2. `refresh` once per frame (re-skins, rebuilds markers if anything changed)
//! 3. `take_visualization_dirty` / `marker_mesh` to redraw

use crate::coefficients::{self, CoefficientChannel, CoefficientStore, PaintState};
use crate::config::EngineConfig;
use crate::display::{MarkerMesh, MarkerMeshBuilder};
use crate::geometry::ScreenProjector;
use crate::input::{ModifierKeys, PointerButton, PointerEvent, PointerEventKind};
use crate::selection::{FacingMode, Picker, SelectionOutcome, SelectionSession};
use crate::vertex_cache::{SkinnedMeshSource, VertexCache};

/// Which tool the pointer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    /// Click / shift-click / lasso selection
    #[default]
    Select,
    /// Paint the brush channels onto the vertex under the cursor
    Paint,
}

impl ToolMode {
    pub fn label(&self) -> &'static str {
        match self {
            ToolMode::Select => "Select",
            ToolMode::Paint => "Paint",
        }
    }
}

/// Result of one pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Not consumed; the host may use it (camera navigation etc.)
    Ignored,
    /// Consumed, nothing visible changed
    Captured,
    /// Lasso preview changed
    PreviewChanged,
    /// Persistent selection changed
    SelectionChanged,
    /// A vertex's coefficients were painted
    Painted,
}

impl EventOutcome {
    pub fn needs_redraw(&self) -> bool {
        matches!(
            self,
            EventOutcome::PreviewChanged | EventOutcome::SelectionChanged | EventOutcome::Painted
        )
    }
}

impl From<SelectionOutcome> for EventOutcome {
    fn from(outcome: SelectionOutcome) -> Self {
        match outcome {
            SelectionOutcome::Ignored => EventOutcome::Ignored,
            SelectionOutcome::Captured => EventOutcome::Captured,
            SelectionOutcome::PreviewChanged => EventOutcome::PreviewChanged,
            SelectionOutcome::SelectionChanged => EventOutcome::SelectionChanged,
        }
    }
}

/// One open instance of the vertex paint tool
pub struct ToolSession {
    mode: ToolMode,
    cache: VertexCache,
    selection: SelectionSession,
    picker: Picker,
    paint: PaintState,
    /// Primary button held in paint mode
    painting: bool,
    channel: CoefficientChannel,
    markers: MarkerMeshBuilder,
    visualization_dirty: bool,
}

impl ToolSession {
    pub fn new(config: &EngineConfig) -> Self {
        let picker = Picker::new(config.pick_radius_sq);
        let budget = config.marker_budget();
        Self {
            mode: ToolMode::Select,
            cache: VertexCache::new(config.stale_epsilon),
            selection: SelectionSession::new(picker, config.drag_threshold_px, budget),
            picker,
            paint: PaintState::default(),
            painting: false,
            channel: CoefficientChannel::default(),
            markers: MarkerMeshBuilder::new(config.marker_half_size, budget),
            visualization_dirty: true,
        }
    }

    /// Re-skin the cache from the host mesh and rebuild the markers if the
    /// pose, vertex count, selection, coefficients or channel changed.
    /// Returns true if the marker mesh was rebuilt.
    pub fn refresh(&mut self, mesh: &dyn SkinnedMeshSource, store: &dyn CoefficientStore) -> bool {
        if self.cache.refresh_from(mesh) {
            if self.selection.sync_vertex_count(self.cache.len()) {
                log::debug!("vertex count now {}, selection cleared", self.cache.len());
                self.painting = false;
            }
            self.markers.mark_dirty();
        }

        if !self.markers.is_dirty() {
            return false;
        }

        let selection = &self.selection;
        self.markers
            .rebuild(self.cache.positions(), store, self.channel, &|i| selection.displayed(i));
        self.visualization_dirty = true;
        true
    }

    /// Route one pointer event to the active tool
    pub fn handle_event(
        &mut self,
        event: &PointerEvent,
        projector: &dyn ScreenProjector,
        store: &mut dyn CoefficientStore,
    ) -> EventOutcome {
        let outcome: EventOutcome = match self.mode {
            ToolMode::Select => self.selection.handle_event(event, projector, &self.cache).into(),
            ToolMode::Paint => self.handle_paint_event(event, projector, store),
        };
        if outcome.needs_redraw() {
            self.markers.mark_dirty();
        }
        outcome
    }

    fn handle_paint_event(
        &mut self,
        event: &PointerEvent,
        projector: &dyn ScreenProjector,
        store: &mut dyn CoefficientStore,
    ) -> EventOutcome {
        match event.kind {
            PointerEventKind::Down(PointerButton::Primary) => {
                if event.modifiers.navigating() {
                    return EventOutcome::Ignored;
                }
                self.painting = true;
                self.paint_at(event.position, projector, store)
            }
            PointerEventKind::Move if self.painting => self.paint_at(event.position, projector, store),
            PointerEventKind::Up(PointerButton::Primary) if self.painting => {
                self.painting = false;
                EventOutcome::Captured
            }
            _ => EventOutcome::Ignored,
        }
    }

    fn paint_at(
        &mut self,
        position: (f32, f32),
        projector: &dyn ScreenProjector,
        store: &mut dyn CoefficientStore,
    ) -> EventOutcome {
        let n = self.cache.len().min(self.markers.budget());
        let ray = projector.screen_ray(position);
        let facing = FacingMode::from_projector(projector);
        let hit = self
            .picker
            .find_nearest(&ray, &self.cache.positions()[..n], &self.cache.normals()[..n], facing);

        let Some(idx) = hit else {
            return EventOutcome::Captured;
        };
        if coefficients::paint(store, idx, &self.paint) {
            EventOutcome::Painted
        } else {
            EventOutcome::Captured
        }
    }

    /// Modifier keys changed between pointer events (lasso mode follows them)
    pub fn modifiers_changed(&mut self, modifiers: ModifierKeys) -> EventOutcome {
        if self.mode != ToolMode::Select {
            return EventOutcome::Ignored;
        }
        let outcome: EventOutcome = self.selection.modifiers_changed(modifiers).into();
        if outcome.needs_redraw() {
            self.markers.mark_dirty();
        }
        outcome
    }

    /// Abandon the current lasso or paint stroke (Escape)
    pub fn cancel(&mut self) -> EventOutcome {
        self.painting = false;
        let outcome: EventOutcome = self.selection.cancel().into();
        if outcome.needs_redraw() {
            self.markers.mark_dirty();
        }
        outcome
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Switch tools; any drag in progress is dropped
    pub fn set_mode(&mut self, mode: ToolMode) {
        if mode == self.mode {
            return;
        }
        self.cancel();
        self.mode = mode;
        log::debug!("tool mode: {}", mode.label());
    }

    pub fn visualized_channel(&self) -> CoefficientChannel {
        self.channel
    }

    pub fn set_visualized_channel(&mut self, channel: CoefficientChannel) {
        if channel != self.channel {
            self.channel = channel;
            self.markers.mark_dirty();
        }
    }

    /// The host edited coefficients outside the session
    pub fn coefficients_changed(&mut self) {
        self.markers.mark_dirty();
    }

    pub fn paint_state(&self) -> &PaintState {
        &self.paint
    }

    pub fn paint_state_mut(&mut self) -> &mut PaintState {
        &mut self.paint
    }

    pub fn selection(&self) -> &SelectionSession {
        &self.selection
    }

    pub fn select_all(&mut self) {
        self.selection.select_all();
        self.markers.mark_dirty();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.markers.mark_dirty();
    }

    pub fn invert_selection(&mut self) {
        self.selection.invert();
        self.markers.mark_dirty();
    }

    /// Mean of `channel` over the selection; None if nothing is selected
    pub fn average(&self, store: &dyn CoefficientStore, channel: CoefficientChannel) -> Option<f32> {
        coefficients::average(store, self.selection.selection(), channel)
    }

    /// Averages of all four channels, in `CoefficientChannel::ALL` order
    pub fn averages(&self, store: &dyn CoefficientStore) -> [Option<f32>; 4] {
        CoefficientChannel::ALL.map(|channel| self.average(store, channel))
    }

    /// Batch-set `channel` on every selected vertex
    pub fn set_all(&mut self, store: &mut dyn CoefficientStore, channel: CoefficientChannel, value: f32) -> bool {
        let changed = coefficients::set_all(store, self.selection.selection(), channel, value);
        if changed {
            self.markers.mark_dirty();
        }
        changed
    }

    pub fn vertex_cache(&self) -> &VertexCache {
        &self.cache
    }

    pub fn marker_mesh(&self) -> &MarkerMesh {
        self.markers.mesh()
    }

    /// Read and reset the "redraw the visualization" signal
    pub fn take_visualization_dirty(&mut self) -> bool {
        std::mem::take(&mut self.visualization_dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::{CoefficientBuffer, CoefficientRecord};
    use crate::display::Color;
    use crate::geometry::Vec3;
    use crate::selection::{test_grid, OrthoProjector};
    use crate::vertex_cache::BonePose;

    struct TestMesh {
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        pose: BonePose,
    }

    impl SkinnedMeshSource for TestMesh {
        fn rest_positions(&self) -> &[Vec3] {
            &self.positions
        }

        fn rest_normals(&self) -> &[Vec3] {
            &self.normals
        }

        fn root_pose(&self) -> BonePose {
            self.pose
        }
    }

    fn setup(config: &EngineConfig) -> (ToolSession, TestMesh, CoefficientBuffer) {
        let (positions, normals) = test_grid();
        let mesh = TestMesh { positions, normals, pose: BonePose::IDENTITY };
        let store = CoefficientBuffer::from_records(
            (0..4).map(|i| CoefficientRecord { max_distance: i as f32, ..Default::default() }).collect(),
        );
        let mut session = ToolSession::new(config);
        session.refresh(&mesh, &store);
        session.take_visualization_dirty();
        (session, mesh, store)
    }

    #[test]
    fn test_refresh_builds_once() {
        let (positions, normals) = test_grid();
        let mesh = TestMesh { positions, normals, pose: BonePose::IDENTITY };
        let store = CoefficientBuffer::new(4);
        let mut session = ToolSession::new(&EngineConfig::default());

        assert!(session.refresh(&mesh, &store));
        assert_eq!(session.marker_mesh().marker_count, 4);
        assert!(session.take_visualization_dirty());
        assert!(!session.take_visualization_dirty());

        assert!(!session.refresh(&mesh, &store));
        assert!(!session.take_visualization_dirty());
    }

    #[test]
    fn test_lasso_selection_colors_markers() {
        let (mut session, mesh, mut store) = setup(&EngineConfig::default());
        let p = &OrthoProjector;
        session.handle_event(&PointerEvent::down((-1.0, -1.0), ModifierKeys::NONE), p, &mut store);
        let outcome = session.handle_event(&PointerEvent::moved((0.5, 2.0), ModifierKeys::NONE), p, &mut store);
        assert_eq!(outcome, EventOutcome::PreviewChanged);

        // Preview is visible before release
        assert!(session.refresh(&mesh, &store));
        assert_eq!(session.marker_mesh().colors[0], Color::RED);

        let outcome = session.handle_event(&PointerEvent::up((0.5, 2.0), ModifierKeys::NONE), p, &mut store);
        assert_eq!(outcome, EventOutcome::SelectionChanged);
        assert_eq!(session.selection().selected_indices(), vec![0, 2]);

        assert!(session.refresh(&mesh, &store));
        assert!(session.take_visualization_dirty());
        let colors = &session.marker_mesh().colors;
        assert_eq!(colors[0], Color::RED);
        // Vertex 1 sits a third of the way up the ramp, between green and yellow
        assert_eq!(colors[8].g, 255);
        assert!(colors[8].r > 0 && colors[8].r < 255);
        assert_eq!(colors[16], Color::RED);
        assert_eq!(colors[24], Color::BLUE);
    }

    #[test]
    fn test_batch_edit_through_session() {
        let (mut session, mesh, mut store) = setup(&EngineConfig::default());
        assert_eq!(session.averages(&store), [None; 4]);
        assert!(!session.set_all(&mut store, CoefficientChannel::MaxDistance, 5.0));

        session.select_all();
        let avg = session.average(&store, CoefficientChannel::MaxDistance).unwrap();
        assert!((avg - 1.5).abs() < 0.001);

        assert!(session.set_all(&mut store, CoefficientChannel::MaxDistanceBias, 1.5));
        let avg = session.average(&store, CoefficientChannel::MaxDistanceBias).unwrap();
        assert!((avg - 1.0).abs() < 0.001);
        assert!(store.take_dirty());
        assert!(session.refresh(&mesh, &store));
    }

    #[test]
    fn test_paint_stroke() {
        let (mut session, _mesh, mut store) = setup(&EngineConfig::default());
        session.set_mode(ToolMode::Paint);
        session.paint_state_mut().enable(CoefficientChannel::MaxDistance, 0.5);
        let p = &OrthoProjector;

        let outcome = session.handle_event(&PointerEvent::down((1.0, 1.0), ModifierKeys::NONE), p, &mut store);
        assert_eq!(outcome, EventOutcome::Painted);
        assert!((store.records[3].max_distance - 0.5).abs() < 0.001);

        // Same vertex again: nothing left to write
        let outcome = session.handle_event(&PointerEvent::moved((1.0, 1.0), ModifierKeys::NONE), p, &mut store);
        assert_eq!(outcome, EventOutcome::Captured);

        let outcome = session.handle_event(&PointerEvent::moved((0.0, 1.0), ModifierKeys::NONE), p, &mut store);
        assert_eq!(outcome, EventOutcome::Painted);
        assert!((store.records[2].max_distance - 0.5).abs() < 0.001);

        session.handle_event(&PointerEvent::up((0.0, 1.0), ModifierKeys::NONE), p, &mut store);

        // Hovering after release does not paint
        let outcome = session.handle_event(&PointerEvent::moved((1.0, 0.0), ModifierKeys::NONE), p, &mut store);
        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(store.records[1].max_distance, 1.0);

        // Paint mode never touches the selection
        assert_eq!(session.selection().selected_count(), 0);
    }

    #[test]
    fn test_paint_ignores_navigation_and_misses() {
        let (mut session, _mesh, mut store) = setup(&EngineConfig::default());
        session.set_mode(ToolMode::Paint);
        session.paint_state_mut().enable(CoefficientChannel::MaxDistance, 0.5);
        let p = &OrthoProjector;

        let outcome = session.handle_event(&PointerEvent::down((0.0, 0.0), ModifierKeys::ALT), p, &mut store);
        assert_eq!(outcome, EventOutcome::Ignored);

        let outcome = session.handle_event(&PointerEvent::down((5.0, 5.0), ModifierKeys::NONE), p, &mut store);
        assert_eq!(outcome, EventOutcome::Captured);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_pose_change_and_mesh_swap() {
        let (mut session, mut mesh, store) = setup(&EngineConfig::default());
        session.select_all();
        session.refresh(&mesh, &store);

        mesh.pose = BonePose::new(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO);
        assert!(session.refresh(&mesh, &store));
        assert!(session.vertex_cache().positions()[0].approx_eq(Vec3::new(0.0, 2.0, 0.0), 0.001));
        assert_eq!(session.selection().selected_count(), 4);

        mesh.positions.pop();
        mesh.normals.pop();
        assert!(session.refresh(&mesh, &store));
        assert_eq!(session.selection().selection().len(), 3);
        assert_eq!(session.selection().selected_count(), 0);
        assert_eq!(session.marker_mesh().marker_count, 3);
    }

    #[test]
    fn test_budget_limits_paint_targets() {
        let config = EngineConfig { max_markers: 2, ..Default::default() };
        let (mut session, _mesh, mut store) = setup(&config);
        assert!(session.marker_mesh().truncated);

        session.set_mode(ToolMode::Paint);
        session.paint_state_mut().enable(CoefficientChannel::MaxDistance, 0.5);
        let outcome = session.handle_event(&PointerEvent::down((1.0, 1.0), ModifierKeys::NONE), &OrthoProjector, &mut store);
        assert_eq!(outcome, EventOutcome::Captured);
        assert_eq!(store.records[3].max_distance, 3.0);
    }

    #[test]
    fn test_channel_switch_and_mode_switch() {
        let (mut session, mesh, mut store) = setup(&EngineConfig::default());
        session.set_visualized_channel(CoefficientChannel::MaxDistance);
        assert!(!session.refresh(&mesh, &store));

        session.set_visualized_channel(CoefficientChannel::CollisionSphereRadius);
        assert!(session.refresh(&mesh, &store));
        // Flat channel: everything at the bottom of the ramp
        assert!(session.marker_mesh().colors.iter().all(|&c| c == Color::GREEN));

        // Switching tools drops an in-progress lasso
        let p = &OrthoProjector;
        session.handle_event(&PointerEvent::down((-1.0, -1.0), ModifierKeys::NONE), p, &mut store);
        session.handle_event(&PointerEvent::moved((2.0, 2.0), ModifierKeys::NONE), p, &mut store);
        assert!(session.selection().is_lasso_active());
        session.set_mode(ToolMode::Paint);
        assert!(!session.selection().is_lasso_active());
        assert_eq!(session.selection().selected_count(), 0);
    }
}
