use crate::constants::*;
use crate::dom;
use crate::transport::Player;
use wasm_bindgen::JsCast;
use web_sys as web;

/// File picker, play button and the volume/seek sliders.
pub fn wire_transport_controls(document: &web::Document, player: &Player) {
    let p = player.clone();
    dom::add_listener(document, FILE_INPUT_ID, "change", move |ev| {
        let file = ev
            .target()
            .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        if let Some(file) = file {
            if let Err(e) = p.load_file(&file) {
                log::error!("[controls] load failed: {:?}", e);
            }
        }
    });

    let p = player.clone();
    dom::add_click_listener(document, PLAY_BUTTON_ID, move || p.toggle_play());

    let p = player.clone();
    dom::add_listener(document, VOLUME_SLIDER_ID, "input", move |ev| {
        if let Some(value) = slider_value(&ev) {
            p.set_volume(value as f32);
        }
    });

    let p = player.clone();
    dom::add_listener(document, SEEK_SLIDER_ID, "input", move |ev| {
        if let Some(value) = slider_value(&ev) {
            p.seek_to(value);
        }
    });
}

fn slider_value(ev: &web::Event) -> Option<f64> {
    let input = ev.target()?.dyn_into::<web::HtmlInputElement>().ok()?;
    let value = input.value_as_number();
    value.is_finite().then_some(value)
}
