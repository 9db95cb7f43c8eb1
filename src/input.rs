use crate::constants::{ORBIT_RADIANS_PER_PX, WHEEL_ZOOM_PER_DELTA};
use glam::Vec2;
use web_sys as web;

#[derive(Default, Clone, Copy)]
pub struct DragState {
    pub active: bool,
    pub pointer_id: i32,
    pub last: Vec2,
}

impl DragState {
    pub fn begin(&mut self, ev: &web::PointerEvent) {
        self.active = true;
        self.pointer_id = ev.pointer_id();
        self.last = pointer_client_px(ev);
    }

    /// Orbit delta in radians (yaw, pitch) since the last event of this drag.
    pub fn advance(&mut self, ev: &web::PointerEvent) -> Option<Vec2> {
        if !self.active || ev.pointer_id() != self.pointer_id {
            return None;
        }
        let now = pointer_client_px(ev);
        let delta = (now - self.last) * ORBIT_RADIANS_PER_PX;
        self.last = now;
        Some(delta)
    }

    pub fn end(&mut self) {
        self.active = false;
    }
}

#[inline]
pub fn pointer_client_px(ev: &web::PointerEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

/// Distance factor for a wheel event; scrolling down moves away.
#[inline]
pub fn wheel_zoom_factor(delta_y: f64) -> f32 {
    (delta_y as f32 * WHEEL_ZOOM_PER_DELTA).exp()
}
