//! Batch and paint editing
//!
//! Batch edits apply one value to every selected vertex. Paint writes the
//! enabled brush channels onto a single vertex, once per pointer event.

use super::{CoefficientChannel, CoefficientStore, PaintState};

/// Mean of `channel` over the selected vertices; None if nothing is selected
pub fn average(store: &dyn CoefficientStore, selection: &[bool], channel: CoefficientChannel) -> Option<f32> {
    let mut sum = 0.0f64;
    let mut count = 0usize;
    for (idx, _) in selection.iter().enumerate().filter(|&(_, &s)| s) {
        if let Some(record) = store.get(idx) {
            sum += channel.get(&record) as f64;
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some((sum / count as f64) as f32)
    }
}

/// Write `value` (clamped) into `channel` for every selected vertex.
///
/// No-op when nothing is selected, the value is not finite, or the clamped
/// value already equals the current average. Returns true if the store was written and marked dirty.
pub fn set_all(store: &mut dyn CoefficientStore, selection: &[bool], channel: CoefficientChannel, value: f32) -> bool {
    if !value.is_finite() {
        return false;
    }
    let Some(current) = average(store, selection, channel) else {
        return false;
    };
    let value = channel.clamp(value);
    if value == current {
        return false;
    }

    let mut written = 0usize;
    for (idx, _) in selection.iter().enumerate().filter(|&(_, &s)| s) {
        if let Some(mut record) = store.get(idx) {
            channel.set(&mut record, value);
            if store.set(idx, record) {
                written += 1;
            }
        }
    }

    if written > 0 {
        store.mark_dirty();
    }
    written > 0
}

/// Apply the enabled paint channels to vertex `idx`.
///
/// Only channels whose target differs from the stored value are written, so
/// repeating the call with the same brush changes nothing. Non-finite
/// targets are skipped.
pub fn paint(store: &mut dyn CoefficientStore, idx: usize, brush: &PaintState) -> bool {
    let Some(mut record) = store.get(idx) else {
        return false;
    };

    let mut changed = false;
    for channel in CoefficientChannel::ALL {
        let target = brush.channel(channel);
        if !target.enabled || !target.value.is_finite() {
            continue;
        }
        let target = channel.clamp(target.value);
        if channel.get(&record) != target {
            channel.set(&mut record, target);
            changed = true;
        }
    }

    if changed && store.set(idx, record) {
        store.mark_dirty();
        return true;
    }
    false
}
