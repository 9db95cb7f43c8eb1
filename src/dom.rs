use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    add_listener(document, element_id, "click", move |_| handler());
}

/// Attach `handler` for `event` on the element with `element_id`, if present.
pub fn add_listener(
    document: &web::Document,
    element_id: &str,
    event: &str,
    mut handler: impl FnMut(web::Event) + 'static,
) {
    match document.get_element_by_id(element_id) {
        Some(el) => {
            let closure = wasm_bindgen::closure::Closure::wrap(
                Box::new(move |ev: web::Event| handler(ev)) as Box<dyn FnMut(_)>,
            );
            _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
        None => log::warn!("[dom] missing #{}; {} not wired", element_id, event),
    }
}

pub fn input_by_id(document: &web::Document, element_id: &str) -> Option<web::HtmlInputElement> {
    document
        .get_element_by_id(element_id)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
}

/// True while the element with `element_id` has focus, e.g. a slider being dragged.
pub fn is_focused(document: &web::Document, element_id: &str) -> bool {
    document
        .active_element()
        .is_some_and(|el| el.id() == element_id)
}

pub fn set_text(document: &web::Document, element_id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        el.set_text_content(Some(text));
    }
}

/// Value of `key` in the page's query string.
pub fn query_param(key: &str) -> Option<String> {
    let search = web::window()?.location().search().ok()?;
    web::UrlSearchParams::new_with_str(&search).ok()?.get(key)
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

pub fn toggle_fullscreen(canvas: &web::HtmlCanvasElement) {
    if let Some(doc) = window_document() {
        if doc.fullscreen_element().is_some() {
            _ = doc.exit_fullscreen();
        } else {
            _ = canvas.request_fullscreen();
        }
    }
}
