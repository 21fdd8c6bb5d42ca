//! clothpaint: vertex selection and cloth coefficient painting
//!
//! Select vertices of a deforming mesh by click, shift-click or lasso drag,
//! then batch-edit or paint the four per-vertex cloth coefficients
//! (max distance, max distance bias, collision sphere radius and distance).
//!
//! The host supplies the mesh ([`SkinnedMeshSource`]), the coefficient
//! storage ([`CoefficientStore`]) and the camera ([`ScreenProjector`]); a
//! [`ToolSession`] ties them together and produces a [`MarkerMesh`] to draw.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod coefficients;
pub mod config;
pub mod display;
pub mod geometry;
pub mod input;
pub mod selection;
pub mod session;
pub mod vertex_cache;

pub use coefficients::{CoefficientBuffer, CoefficientChannel, CoefficientRecord, CoefficientStore, PaintState};
pub use config::{ConfigError, EngineConfig};
pub use display::{Color, MarkerMesh};
pub use geometry::{Camera, ScreenProjector, Vec3, Viewport};
pub use input::{ModifierKeys, PointerEvent};
pub use selection::{SelectionMode, SelectionSession};
pub use session::{EventOutcome, ToolMode, ToolSession};
pub use vertex_cache::{BonePose, SkinnedMeshSource, VertexCache};
