//! Coefficient value -> marker color
//!
//! Unselected vertices ramp green (min) -> yellow (mid) -> blue (max) across
//! the visualized channel's range. Selected vertices are always red.

use serde::{Deserialize, Serialize};
use crate::coefficients::{CoefficientChannel, CoefficientStore};

/// 8-bit RGB marker color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color { r: 255, g: 0, b: 0 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0 };
    pub const YELLOW: Color = Color { r: 255, g: 255, b: 0 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255 };

    /// Interpolate between two colors
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;
        Self {
            r: (self.r as f32 * inv_t + other.r as f32 * t) as u8,
            g: (self.g as f32 * inv_t + other.g as f32 * t) as u8,
            b: (self.b as f32 * inv_t + other.b as f32 * t) as u8,
        }
    }
}

/// Value range the color ramp is stretched over
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Min/max of `channel` over every record in `store`; (0, 0) when empty
    pub fn of_channel(store: &dyn CoefficientStore, channel: CoefficientChannel) -> Self {
        let mut range: Option<ValueRange> = None;
        for idx in 0..store.len() {
            let Some(record) = store.get(idx) else { continue };
            let v = channel.get(&record);
            range = Some(match range {
                Some(r) => ValueRange::new(r.min.min(v), r.max.max(v)),
                None => ValueRange::new(v, v),
            });
        }
        range.unwrap_or_default()
    }

    /// Position of `value` in the range as 0..1; 0 for a degenerate range
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span.is_nan() || span <= f32::EPSILON {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Marker color for one vertex
pub fn color_for(value: f32, range: ValueRange, selected: bool) -> Color {
    if selected {
        return Color::RED;
    }
    let t = range.normalize(value);
    if t <= 0.5 {
        Color::GREEN.lerp(Color::YELLOW, t * 2.0)
    } else {
        Color::YELLOW.lerp(Color::BLUE, (t - 0.5) * 2.0)
    }
}
