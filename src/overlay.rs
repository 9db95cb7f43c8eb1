use crate::constants::{OVERLAY_ID, STATUS_ID};
use crate::dom;
use web_sys as web;

const HIDDEN_CLASS: &str = "hidden";
const HIDDEN_STYLE: &str = "display:none";

/// Class toggle plus an inline style, so pages without the `.hidden` rule work too.
fn set_visible(document: &web::Document, visible: bool) {
    let Some(el) = document.get_element_by_id(OVERLAY_ID) else {
        return;
    };
    let classes = el.class_list();
    if visible {
        _ = classes.remove_1(HIDDEN_CLASS);
        _ = el.remove_attribute("style");
    } else {
        _ = classes.add_1(HIDDEN_CLASS);
        _ = el.set_attribute("style", HIDDEN_STYLE);
    }
}

#[inline]
pub fn show(document: &web::Document) {
    set_visible(document, true);
}

pub fn is_hidden(document: &web::Document) -> bool {
    document.get_element_by_id(OVERLAY_ID).is_some_and(|el| {
        el.class_list().contains(HIDDEN_CLASS)
            || el
                .get_attribute("style")
                .is_some_and(|s| s.contains(HIDDEN_STYLE))
    })
}

/// Bound to the overlay hotkey.
pub fn toggle(document: &web::Document) {
    set_visible(document, is_hidden(document));
}

/// Put a message in the overlay status line and make sure it is visible.
pub fn report(document: &web::Document, message: &str) {
    dom::set_text(document, STATUS_ID, message);
    show(document);
}

pub fn clear_status(document: &web::Document) {
    dom::set_text(document, STATUS_ID, "");
}
