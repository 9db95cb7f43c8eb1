//! Orbit camera owned by the viewport controller.
//!
//! The pipeline never writes to it; pointer and wheel handlers do, and the frame
//! loop advances auto-rotation before rendering.

use super::variant::CameraSpec;
use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Angle around +Y, measured from +Z toward +X.
    pub yaw: f32,
    /// Elevation above the XZ plane.
    pub pitch: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Same unit as orbit controls: 1.0 is one revolution per minute.
    pub auto_rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub zoom_enabled: bool,
}

impl OrbitCamera {
    /// Camera placed at `eye`, looking at `target`.
    pub fn looking_at(eye: Vec3, target: Vec3, fov_degrees: f32) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(1e-3);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        Self {
            target,
            distance,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            fovy_radians: fov_degrees.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
            auto_rotate_speed: 0.0,
            min_distance: 1.0,
            max_distance: 200.0,
            zoom_enabled: true,
        }
    }

    /// Camera for a variant's ambient setup.
    pub fn from_spec(spec: &CameraSpec) -> Self {
        Self {
            auto_rotate_speed: spec.auto_rotate_speed,
            zoom_enabled: spec.zoom,
            ..Self::looking_at(spec.eye, spec.target, spec.fov_degrees)
        }
    }

    pub fn eye(&self) -> Vec3 {
        let horizontal = self.distance * self.pitch.cos();
        self.target
            + Vec3::new(
                horizontal * self.yaw.sin(),
                self.distance * self.pitch.sin(),
                horizontal * self.yaw.cos(),
            )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, aspect.max(1e-3), self.znear, self.zfar)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Rotate by a pointer drag expressed in radians.
    pub fn orbit(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw = (self.yaw - d_yaw).rem_euclid(TAU);
        self.pitch = (self.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Multiply the distance by `factor` (>1 zooms out).
    pub fn zoom(&mut self, factor: f32) {
        if !self.zoom_enabled || !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    pub fn update(&mut self, dt_sec: f32) {
        if self.auto_rotate_speed != 0.0 && dt_sec > 0.0 {
            let rate = TAU / 60.0 * self.auto_rotate_speed;
            self.yaw = (self.yaw + rate * dt_sec).rem_euclid(TAU);
        }
    }
}
