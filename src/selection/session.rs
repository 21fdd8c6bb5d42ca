//! Selection state machine
//!
//! `Idle -> Clicking -> (Lasso | Idle)`. A press that hits a vertex applies
//! click semantics immediately. A press on empty space becomes a lasso once
//! the pointer travels past the drag threshold; released without moving it
//! clears the selection.
//!
//! All drag state lives in the session value, one per open tool.

use crate::geometry::ScreenProjector;
use crate::input::{ModifierKeys, PointerEvent, PointerEventKind, PointerButton};
use crate::vertex_cache::VertexCache;
use super::lasso::{LassoRect, lasso_select};
use super::picker::Picker;
use super::{FacingMode, SelectionMode};

/// What a handled event did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Not for us (other button, camera navigation, nothing in progress)
    Ignored,
    /// Consumed without visible change
    Captured,
    /// Lasso preview moved or its mode changed
    PreviewChanged,
    /// Persistent selection changed
    SelectionChanged,
}

impl SelectionOutcome {
    /// Whether the visualization needs a rebuild
    pub fn needs_redraw(&self) -> bool {
        matches!(self, SelectionOutcome::PreviewChanged | SelectionOutcome::SelectionChanged)
    }
}

#[derive(Debug, Clone, Default)]
enum DragState {
    #[default]
    Idle,
    /// Primary button held, no lasso yet
    Clicking { hit: Option<usize>, down: (f32, f32) },
    /// Lasso drag; `inside` is the transient rectangle selection
    Lasso { rect: LassoRect, inside: Vec<bool> },
}

/// Persistent selection plus the in-progress click/lasso
#[derive(Debug, Clone)]
pub struct SelectionSession {
    selected: Vec<bool>,
    drag: DragState,
    mode: SelectionMode,
    picker: Picker,
    drag_threshold: f32,
    /// Vertices at or past this index are never selected
    limit: usize,
}

impl SelectionSession {
    pub fn new(picker: Picker, drag_threshold: f32, limit: usize) -> Self {
        Self {
            selected: Vec::new(),
            drag: DragState::Idle,
            mode: SelectionMode::Replace,
            picker,
            drag_threshold,
            limit,
        }
    }

    /// Resize to the mesh's vertex count. A change clears the selection and
    /// drops any drag in progress. Returns true if it changed.
    pub fn sync_vertex_count(&mut self, count: usize) -> bool {
        if self.selected.len() == count {
            return false;
        }
        self.selected = vec![false; count];
        self.drag = DragState::Idle;
        true
    }

    /// Feed one pointer event
    pub fn handle_event(
        &mut self,
        event: &PointerEvent,
        projector: &dyn ScreenProjector,
        cache: &VertexCache,
    ) -> SelectionOutcome {
        self.mode = SelectionMode::from_modifiers(event.modifiers);

        match event.kind {
            PointerEventKind::Down(PointerButton::Primary) => self.pointer_down(event, projector, cache),
            PointerEventKind::Move => self.pointer_move(event, projector, cache),
            PointerEventKind::Up(PointerButton::Primary) => self.pointer_up(event),
            _ => SelectionOutcome::Ignored,
        }
    }

    /// Modifier keys changed without pointer movement; re-resolves the lasso mode
    pub fn modifiers_changed(&mut self, modifiers: ModifierKeys) -> SelectionOutcome {
        let mode = SelectionMode::from_modifiers(modifiers);
        let changed = mode != self.mode;
        self.mode = mode;
        if changed && self.is_lasso_active() {
            SelectionOutcome::PreviewChanged
        } else {
            SelectionOutcome::Ignored
        }
    }

    fn pointer_down(
        &mut self,
        event: &PointerEvent,
        projector: &dyn ScreenProjector,
        cache: &VertexCache,
    ) -> SelectionOutcome {
        if event.modifiers.navigating() {
            self.drag = DragState::Idle;
            return SelectionOutcome::Ignored;
        }

        let n = self.pickable_count(cache);
        let ray = projector.screen_ray(event.position);
        let facing = FacingMode::from_projector(projector);
        let hit = self.picker.find_nearest(&ray, &cache.positions()[..n], &cache.normals()[..n], facing);

        self.drag = DragState::Clicking { hit, down: event.position };

        match hit {
            Some(idx) => {
                if event.modifiers.shift {
                    self.selected[idx] = !self.selected[idx];
                } else {
                    self.selected.iter_mut().for_each(|s| *s = false);
                    self.selected[idx] = true;
                }
                SelectionOutcome::SelectionChanged
            }
            None => SelectionOutcome::Captured,
        }
    }

    fn pointer_move(
        &mut self,
        event: &PointerEvent,
        projector: &dyn ScreenProjector,
        cache: &VertexCache,
    ) -> SelectionOutcome {
        let rect = match &self.drag {
            DragState::Idle => return SelectionOutcome::Ignored,
            DragState::Clicking { hit: Some(_), .. } => return SelectionOutcome::Captured,
            DragState::Clicking { hit: None, down } => {
                let dx = event.position.0 - down.0;
                let dy = event.position.1 - down.1;
                if (dx * dx + dy * dy).sqrt() <= self.drag_threshold || event.modifiers.navigating() {
                    return SelectionOutcome::Captured;
                }
                LassoRect { start: *down, current: event.position }
            }
            DragState::Lasso { rect, .. } => LassoRect { start: rect.start, current: event.position },
        };

        let inside = self.lasso_membership(&rect, projector, cache);
        self.drag = DragState::Lasso { rect, inside };
        SelectionOutcome::PreviewChanged
    }

    fn pointer_up(&mut self, event: &PointerEvent) -> SelectionOutcome {
        match std::mem::take(&mut self.drag) {
            DragState::Lasso { inside, .. } => {
                let mode = self.mode;
                for (sel, &rect) in self.selected.iter_mut().zip(&inside) {
                    *sel = mode.combine(*sel, rect);
                }
                SelectionOutcome::SelectionChanged
            }
            DragState::Clicking { hit: None, .. } if !event.modifiers.any() => {
                if self.selected_count() == 0 {
                    SelectionOutcome::Captured
                } else {
                    self.clear();
                    SelectionOutcome::SelectionChanged
                }
            }
            DragState::Clicking { .. } => SelectionOutcome::Captured,
            DragState::Idle => SelectionOutcome::Ignored,
        }
    }

    fn pickable_count(&self, cache: &VertexCache) -> usize {
        cache.len().min(self.limit).min(self.selected.len())
    }

    fn lasso_membership(&self, rect: &LassoRect, projector: &dyn ScreenProjector, cache: &VertexCache) -> Vec<bool> {
        let n = self.pickable_count(cache);
        let facing = FacingMode::from_projector(projector);
        let mut inside = lasso_select(rect, projector, &cache.positions()[..n], &cache.normals()[..n], facing);
        inside.resize(self.selected.len(), false);
        inside
    }

    /// Abandon an in-progress lasso or click; the selection is untouched
    pub fn cancel(&mut self) -> SelectionOutcome {
        match std::mem::take(&mut self.drag) {
            DragState::Lasso { .. } => SelectionOutcome::PreviewChanged,
            DragState::Clicking { .. } => SelectionOutcome::Captured,
            DragState::Idle => SelectionOutcome::Ignored,
        }
    }

    pub fn is_lasso_active(&self) -> bool {
        matches!(self.drag, DragState::Lasso { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.drag, DragState::Idle)
    }

    /// Current lasso rectangle, for drawing the box overlay
    pub fn lasso_rect(&self) -> Option<LassoRect> {
        match &self.drag {
            DragState::Lasso { rect, .. } => Some(*rect),
            _ => None,
        }
    }

    /// Mode resolved from the most recent event
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Persistent selection, one flag per vertex
    pub fn selection(&self) -> &[bool] {
        &self.selected
    }

    pub fn is_selected(&self, idx: usize) -> bool {
        self.selected.get(idx).copied().unwrap_or(false)
    }

    /// Selection as it should be drawn: the lasso preview merged in if dragging
    pub fn displayed(&self, idx: usize) -> bool {
        let persistent = self.is_selected(idx);
        match &self.drag {
            DragState::Lasso { inside, .. } => {
                self.mode.combine(persistent, inside.get(idx).copied().unwrap_or(false))
            }
            _ => persistent,
        }
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|&&s| s).count()
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn clear(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = false);
    }

    pub fn select_all(&mut self) {
        let limit = self.limit;
        for (i, s) in self.selected.iter_mut().enumerate() {
            *s = i < limit;
        }
    }

    pub fn invert(&mut self) {
        let limit = self.limit;
        for (i, s) in self.selected.iter_mut().enumerate() {
            *s = i < limit && !*s;
        }
    }

    /// Replace the selection wholesale (e.g. restored by the host)
    pub fn set_selected(&mut self, indices: &[usize]) {
        self.clear();
        for &i in indices {
            if i < self.limit {
                if let Some(s) = self.selected.get_mut(i) {
                    *s = true;
                }
            }
        }
    }
}
