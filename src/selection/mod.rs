//! Vertex selection
//!
//! - `picker` - nearest vertex under the pointer ray
//! - `lasso` - rectangle unprojected into four world-space planes
//! - `session` - click / shift-click / lasso state machine owning the selection

mod lasso;
mod picker;
mod session;

pub use lasso::{LassoFrustum, LassoRect, lasso_select};
pub use picker::Picker;
pub use session::{SelectionOutcome, SelectionSession};

#[cfg(test)]
pub(crate) use lasso::tests::{grid as test_grid, OrthoProjector};

use crate::geometry::{ScreenProjector, Vec3};
use crate::input::ModifierKeys;

/// How a lasso result combines with the existing selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// No modifier: the lasso result replaces the selection
    #[default]
    Replace,
    /// Shift: union
    Add,
    /// Alt: difference
    Subtract,
}

impl SelectionMode {
    /// Resolve the mode from the modifiers held for this event.
    /// Shift wins when both shift and alt are held.
    pub fn from_modifiers(modifiers: ModifierKeys) -> Self {
        if modifiers.shift {
            SelectionMode::Add
        } else if modifiers.alt {
            SelectionMode::Subtract
        } else {
            SelectionMode::Replace
        }
    }

    /// Final membership of one vertex
    pub fn combine(self, persistent: bool, rect: bool) -> bool {
        match self {
            SelectionMode::Replace => rect,
            SelectionMode::Add => persistent || rect,
            SelectionMode::Subtract => persistent && !rect,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SelectionMode::Replace => "Replace",
            SelectionMode::Add => "Add",
            SelectionMode::Subtract => "Subtract",
        }
    }
}

/// Which vertices the picker and lasso may return
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FacingMode {
    /// Only vertices whose normal does not point along the camera forward
    FrontOnly { forward: Vec3 },
    /// Everything (wireframe / x-ray display)
    Both,
}

impl FacingMode {
    pub fn from_projector(projector: &dyn ScreenProjector) -> Self {
        if projector.backfaces_selectable() {
            FacingMode::Both
        } else {
            FacingMode::FrontOnly { forward: projector.forward() }
        }
    }

    /// Facing test: `dot(normal, forward) <= 0` is front-facing
    pub fn accepts(&self, normal: Vec3) -> bool {
        match self {
            FacingMode::FrontOnly { forward } => normal.dot(*forward) <= 0.0,
            FacingMode::Both => true,
        }
    }
}
