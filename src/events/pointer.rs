use crate::core::OrbitCamera;
use crate::input::{self, DragState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Drag to orbit, wheel to zoom. The camera is shared with the frame loop,
/// which swaps it when the variant changes.
pub fn wire_camera_controls(canvas: &web::HtmlCanvasElement, camera: Rc<RefCell<OrbitCamera>>) {
    let drag = Rc::new(RefCell::new(DragState::default()));
    wire_pointerdown(canvas, drag.clone());
    wire_pointermove(camera.clone(), drag.clone());
    wire_pointerup(drag);
    wire_wheel(canvas, camera);
}

fn wire_pointerdown(canvas: &web::HtmlCanvasElement, drag: Rc<RefCell<DragState>>) {
    let canvas_for_capture = canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        drag.borrow_mut().begin(&ev);
        _ = canvas_for_capture.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(camera: Rc<RefCell<OrbitCamera>>, drag: Rc<RefCell<DragState>>) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let delta = drag.borrow_mut().advance(&ev);
        if let Some(d) = delta {
            camera.borrow_mut().orbit(d.x, d.y);
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointerup(drag: Rc<RefCell<DragState>>) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        drag.borrow_mut().end();
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        for event in ["pointerup", "pointercancel"] {
            _ = wnd.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
    closure.forget();
}

fn wire_wheel(canvas: &web::HtmlCanvasElement, camera: Rc<RefCell<OrbitCamera>>) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        let mut cam = camera.borrow_mut();
        if cam.zoom_enabled {
            cam.zoom(input::wheel_zoom_factor(ev.delta_y()));
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
    closure.forget();
}
