use crate::core::input::{action_for_key, KeyAction, PendingVariant};
use crate::dom;
use crate::overlay;
use crate::transport::Player;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct KeyTargets {
    pub player: Player,
    /// Picked up by the frame loop, which rebuilds the visualizer.
    pub pending_variant: PendingVariant,
    pub canvas: web::HtmlCanvasElement,
}

/// Focused form controls keep their own keys.
fn typing_in_control(ev: &web::KeyboardEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
        .is_some()
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, targets: &KeyTargets) {
    if typing_in_control(ev) || ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }
    let key = ev.key();
    let Some(action) = action_for_key(key.as_str()) else {
        return;
    };
    match action {
        KeyAction::TogglePlay => targets.player.toggle_play(),
        KeyAction::Seek(steps) => targets.player.seek_by(steps),
        KeyAction::Volume(steps) => targets.player.nudge_volume(steps),
        KeyAction::SelectVariant(kind) => {
            log::info!("[keys] variant {}", kind);
            targets.pending_variant.request(kind);
        }
        KeyAction::ToggleOverlay => {
            if let Some(doc) = dom::window_document() {
                overlay::toggle(&doc);
            }
        }
        KeyAction::Fullscreen => dom::toggle_fullscreen(&targets.canvas),
    }
    ev.prevent_default();
}

pub fn wire_global_keydown(targets: KeyTargets) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &targets);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
