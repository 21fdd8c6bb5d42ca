//! Pointer and modifier input delivered by the host
//!
//! The engine never polls devices itself. The host translates its own
//! events into `PointerEvent`s, one per pointer down/move/up.

/// Modifier key state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierKeys {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Cmd on macOS, Super elsewhere
    pub command: bool,
}

impl ModifierKeys {
    pub const NONE: ModifierKeys = ModifierKeys { shift: false, ctrl: false, alt: false, command: false };
    pub const SHIFT: ModifierKeys = ModifierKeys { shift: true, ctrl: false, alt: false, command: false };
    pub const ALT: ModifierKeys = ModifierKeys { shift: false, ctrl: false, alt: true, command: false };

    /// Check if any modifier is held
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.command
    }

    /// Alt/Ctrl/Cmd are reserved for camera navigation
    pub fn navigating(&self) -> bool {
        self.alt || self.ctrl || self.command
    }
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// What happened to the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down(PointerButton),
    Move,
    Up(PointerButton),
}

/// A single pointer event in screen coordinates (pixels, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: (f32, f32),
    pub modifiers: ModifierKeys,
}

impl PointerEvent {
    pub fn down(position: (f32, f32), modifiers: ModifierKeys) -> Self {
        Self { kind: PointerEventKind::Down(PointerButton::Primary), position, modifiers }
    }

    pub fn moved(position: (f32, f32), modifiers: ModifierKeys) -> Self {
        Self { kind: PointerEventKind::Move, position, modifiers }
    }

    pub fn up(position: (f32, f32), modifiers: ModifierKeys) -> Self {
        Self { kind: PointerEventKind::Up(PointerButton::Primary), position, modifiers }
    }

    pub fn is_primary_down(&self) -> bool {
        self.kind == PointerEventKind::Down(PointerButton::Primary)
    }

    pub fn is_primary_up(&self) -> bool {
        self.kind == PointerEventKind::Up(PointerButton::Primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_modifiers() {
        assert!(!ModifierKeys::NONE.navigating());
        assert!(!ModifierKeys::SHIFT.navigating());
        assert!(ModifierKeys::ALT.navigating());
        assert!(ModifierKeys { command: true, ..Default::default() }.navigating());
        assert!(ModifierKeys::SHIFT.any());
        assert!(!ModifierKeys::NONE.any());
    }

    #[test]
    fn test_event_constructors() {
        let e = PointerEvent::down((1.0, 2.0), ModifierKeys::NONE);
        assert!(e.is_primary_down());
        assert!(!e.is_primary_up());
        assert!(PointerEvent::up((1.0, 2.0), ModifierKeys::NONE).is_primary_up());
        assert_eq!(PointerEvent::moved((0.0, 0.0), ModifierKeys::NONE).kind, PointerEventKind::Move);
    }
}
