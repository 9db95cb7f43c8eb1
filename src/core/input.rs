use super::variant::VariantKind;
use std::cell::Cell;
use std::rc::Rc;

/// What a global key press asks for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    TogglePlay,
    /// Seek by this many seek steps.
    Seek(f64),
    /// Change volume by this many volume steps.
    Volume(f32),
    SelectVariant(VariantKind),
    ToggleOverlay,
    Fullscreen,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        " " | "k" | "K" => Some(KeyAction::TogglePlay),
        "ArrowLeft" => Some(KeyAction::Seek(-1.0)),
        "ArrowRight" => Some(KeyAction::Seek(1.0)),
        "ArrowUp" => Some(KeyAction::Volume(1.0)),
        "ArrowDown" => Some(KeyAction::Volume(-1.0)),
        "h" | "H" => Some(KeyAction::ToggleOverlay),
        "Enter" => Some(KeyAction::Fullscreen),
        _ => VariantKind::from_hotkey(key).map(KeyAction::SelectVariant),
    }
}

/// Variant requested by a key press, applied by the frame loop on its next tick.
/// Clones share the same slot; the latest request wins.
#[derive(Clone, Debug, Default)]
pub struct PendingVariant(Rc<Cell<Option<VariantKind>>>);

impl PendingVariant {
    pub fn request(&self, kind: VariantKind) {
        self.0.set(Some(kind));
    }

    pub fn take(&self) -> Option<VariantKind> {
        self.0.take()
    }
}
