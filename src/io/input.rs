//! Pointer and keyboard input
//!
//! Events arrive in client (screen) coordinates. They're converted to glyph
//! space explicitly with a [`ViewTransform`] wherever they're consumed.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Keyboard modifiers held during an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierState {
    /// Snap to grid / 15° steps / uniform scale
    pub shift: bool,
    /// Scale from center / rotate about the handle
    pub alt: bool,
    pub ctrl: bool,
    pub super_key: bool,
}

impl ModifierState {
    pub const NONE: ModifierState = ModifierState {
        shift: false,
        alt: false,
        ctrl: false,
        super_key: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// A pointer event in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub client_x: f64,
    pub client_y: f64,
    pub modifiers: ModifierState,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, client_x: f64, client_y: f64, modifiers: ModifierState) -> Self {
        Self {
            phase,
            client_x,
            client_y,
            modifiers,
        }
    }

    pub fn client(&self) -> Point {
        Point::new(self.client_x, self.client_y)
    }
}

/// Keys the editing engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Escape,
    Delete,
    Backspace,
    Enter,
    ShiftLeft,
    ShiftRight,
    AltLeft,
    AltRight,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Other(u32),
}

impl KeyCode {
    /// Map a DOM-style `code` string
    pub fn from_code(code: &str) -> Self {
        match code {
            "Escape" => KeyCode::Escape,
            "Delete" => KeyCode::Delete,
            "Backspace" => KeyCode::Backspace,
            "Enter" => KeyCode::Enter,
            "ShiftLeft" => KeyCode::ShiftLeft,
            "ShiftRight" => KeyCode::ShiftRight,
            "AltLeft" => KeyCode::AltLeft,
            "AltRight" => KeyCode::AltRight,
            "ArrowUp" => KeyCode::ArrowUp,
            "ArrowDown" => KeyCode::ArrowDown,
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            other => KeyCode::Other(other.bytes().fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32))),
        }
    }

    pub fn is_shift(&self) -> bool {
        matches!(self, KeyCode::ShiftLeft | KeyCode::ShiftRight)
    }

    pub fn is_alt(&self) -> bool {
        matches!(self, KeyCode::AltLeft | KeyCode::AltRight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub down: bool,
}

impl KeyEvent {
    pub fn down(code: KeyCode) -> Self {
        Self { code, down: true }
    }

    pub fn up(code: KeyCode) -> Self {
        Self { code, down: false }
    }
}

/// Tracks modifier keys from a stream of key events
pub fn track_modifiers(state: &mut ModifierState, event: &KeyEvent) {
    if event.code.is_shift() {
        state.shift = event.down;
    } else if event.code.is_alt() {
        state.alt = event.down;
    }
}

/// Canvas view: `offset` is where the glyph origin sits in client space,
/// `zoom` is client pixels per font unit. Glyph space is y-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub zoom: f64,
    pub offset: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn new(zoom: f64, offset: Vec2) -> Self {
        Self { zoom, offset }
    }

    pub fn client_to_glyph(&self, client: Point) -> Point {
        let zoom = self.safe_zoom();
        Point::new(
            (client.x - self.offset.x) / zoom,
            (self.offset.y - client.y) / zoom,
        )
    }

    pub fn glyph_to_client(&self, glyph: Point) -> Point {
        let zoom = self.safe_zoom();
        Point::new(
            glyph.x * zoom + self.offset.x,
            self.offset.y - glyph.y * zoom,
        )
    }

    /// Glyph-space position of a pointer event
    pub fn event_position(&self, event: &PointerEvent) -> Point {
        self.client_to_glyph(event.client())
    }

    /// A client-space distance expressed in font units
    pub fn client_distance(&self, pixels: f64) -> f64 {
        pixels / self.safe_zoom()
    }

    fn safe_zoom(&self) -> f64 {
        if self.zoom.abs() < f64::EPSILON {
            1.0
        } else {
            self.zoom
        }
    }
}
