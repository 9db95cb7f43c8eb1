//! Per-frame mappings from frequency magnitudes (0..=255) to visual parameters.
//!
//! Audio-reactive values are pure functions of the magnitudes. Decorative motion
//! is a function of time only. A variant may combine the two, but one never
//! stands in for the other.

use super::constants::*;
use glam::Vec3;
use std::f32::consts::TAU;

/// Arithmetic mean; an empty slice averages to 0.
#[inline]
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = values.iter().sum::<f32>() / values.len() as f32;
    if avg.is_finite() {
        avg
    } else {
        0.0
    }
}

#[inline]
pub fn normalized(magnitude: f32) -> f32 {
    (magnitude / MAX_MAGNITUDE).clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarParams {
    pub scale_y: f32,
    /// Lift applied so the bar grows upward from its base.
    pub y_offset: f32,
}

impl BarParams {
    pub const REST: BarParams = BarParams {
        scale_y: 1.0,
        y_offset: 0.0,
    };
}

pub fn bar_scale(magnitude: f32, gain: f32) -> BarParams {
    let scale_y = 1.0 + normalized(magnitude) * gain;
    BarParams {
        scale_y,
        y_offset: (scale_y - 1.0) / 2.0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpherePulse {
    pub scale: f32,
    pub hue_degrees: f32,
}

impl SpherePulse {
    pub const REST: SpherePulse = SpherePulse {
        scale: 1.0,
        hue_degrees: 0.0,
    };
}

pub fn sphere_pulse(frequencies: &[f32], gain: f32) -> SpherePulse {
    let avg = mean(frequencies);
    SpherePulse {
        scale: 1.0 + normalized(avg) * gain,
        hue_degrees: hue_for_level(avg),
    }
}

/// Average magnitude mapped onto the color wheel in degrees.
#[inline]
pub fn hue_for_level(average: f32) -> f32 {
    normalized(average) * 360.0
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircularSlot {
    pub x: f32,
    pub z: f32,
    /// Hue in 0..1 for slot `i`.
    pub hue: f32,
}

pub fn circular_position(index: usize, num_bars: usize, radius: f32) -> CircularSlot {
    if num_bars == 0 {
        return CircularSlot {
            x: radius,
            z: 0.0,
            hue: 0.0,
        };
    }
    let t = index as f32 / num_bars as f32;
    let angle = t * TAU;
    CircularSlot {
        x: angle.cos() * radius,
        z: angle.sin() * radius,
        hue: t,
    }
}

/// Scale shared by the ring group; rotation is tracked separately by a [`Spin`].
#[inline]
pub fn ring_scale(frequencies: &[f32], gain: f32) -> f32 {
    1.0 + normalized(mean(frequencies)) * gain
}

/// Rotation that accumulates with time, independent of audio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    pub angle: f32,
    pub rate_per_sec: f32,
}

impl Spin {
    pub fn new(rate_per_sec: f32) -> Self {
        Self {
            angle: 0.0,
            rate_per_sec,
        }
    }

    /// Per-frame increment tuned at [`REFERENCE_FPS`], expressed per second.
    pub fn per_frame(increment: f32) -> Self {
        Self::new(increment * REFERENCE_FPS)
    }

    pub fn advance(&mut self, dt_sec: f32) -> f32 {
        if dt_sec.is_finite() && dt_sec > 0.0 {
            self.angle = (self.angle + self.rate_per_sec * dt_sec).rem_euclid(TAU);
        }
        self.angle
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WaveShape {
    /// Straight line along X, centred on the origin, displaced along Y.
    Line { extent: f32 },
    /// Circle of `radius` in the XY plane, displaced along Z.
    Ellipse { radius: f32 },
}

/// Fixed polyline whose base positions are laid out once; each frame only the
/// displacement component is rewritten in place.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformLine {
    points: Vec<Vec3>,
    shape: WaveShape,
    gain: f32,
}

impl WaveformLine {
    pub fn new(count: usize, shape: WaveShape, gain: f32) -> Self {
        let denom = count.saturating_sub(1).max(1) as f32;
        let points = (0..count)
            .map(|i| {
                let t = i as f32 / denom;
                match shape {
                    WaveShape::Line { extent } => Vec3::new(t * extent - extent / 2.0, 0.0, 0.0),
                    WaveShape::Ellipse { radius } => {
                        let a = t * TAU;
                        Vec3::new(a.cos() * radius, a.sin() * radius, 0.0)
                    }
                }
            })
            .collect();
        Self {
            points,
            shape,
            gain,
        }
    }

    /// Displacement of point `i` is `freq[(i / 2) % len] / 255 * gain`.
    pub fn update(&mut self, frequencies: &[f32]) {
        let len = frequencies.len();
        for (i, p) in self.points.iter_mut().enumerate() {
            let d = if len == 0 {
                0.0
            } else {
                normalized(frequencies[(i / 2) % len]) * self.gain
            };
            match self.shape {
                WaveShape::Line { .. } => p.y = d,
                WaveShape::Ellipse { .. } => p.z = d,
            }
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn shape(&self) -> WaveShape {
        self.shape
    }

    /// Audio-driven component of point `i`.
    pub fn displacement(&self, i: usize) -> Option<f32> {
        self.points.get(i).map(|p| match self.shape {
            WaveShape::Line { .. } => p.y,
            WaveShape::Ellipse { .. } => p.z,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BassPulse {
    /// Mean of the bass bins normalised to 0..1.
    pub intensity: f32,
    pub outer_scale: f32,
    pub inner_scale: f32,
    pub glow_scale: f32,
    pub glow_intensity: f32,
}

pub fn bass_pulse(frequencies: &[f32], bins: usize, gain: f32) -> BassPulse {
    let bass = &frequencies[..bins.min(frequencies.len())];
    let intensity = normalized(mean(bass));
    let scale = 1.0 + intensity * gain;
    BassPulse {
        intensity,
        outer_scale: scale,
        inner_scale: scale * CRYSTAL_INNER_RATIO,
        glow_scale: scale * CRYSTAL_GLOW_RATIO,
        glow_intensity: intensity.tanh() * CRYSTAL_GLOW_MAX,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudParams {
    pub position: Vec3,
    pub hue: f32,
    pub scale: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
}

pub fn nebula_cloud(index: usize, count: usize, magnitude: f32, elapsed: f32) -> CloudParams {
    let i = index as f32;
    let centre = (count.max(1) as f32 - 1.0) / 2.0;
    let speed = 0.2 + i * 0.05;
    let scale = if magnitude.is_finite() {
        1.0 + magnitude.max(0.0) / NEBULA_SCALE_DIVISOR
    } else {
        1.0
    };
    CloudParams {
        position: Vec3::new((i - centre) * NEBULA_SPACING, i.sin() * 2.0, i.cos() * 2.0),
        hue: i / count.max(1) as f32,
        scale,
        rotation_x: (elapsed * speed).cos() * NEBULA_SWAY,
        rotation_y: (elapsed * speed).sin() * NEBULA_SWAY,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeMotion {
    pub position: Vec3,
    pub rotation: Vec3,
}

pub fn floating_cube(base: Vec3, elapsed: f32) -> CubeMotion {
    CubeMotion {
        position: Vec3::new(base.x, base.y + (elapsed * 2.0).sin() * 0.5, base.z),
        rotation: Vec3::new(elapsed * 0.5, elapsed * 0.3, 0.0),
    }
}

/// Breathing scale for a network node, phase-shifted by its X coordinate.
#[inline]
pub fn node_pulse(x: f32, elapsed: f32) -> f32 {
    1.0 + (elapsed * 2.0 + x * 10.0).sin() * NETWORK_PULSE
}

#[inline]
pub fn dash_offset(elapsed: f32) -> f32 {
    ((elapsed * 2.0).sin() + 1.0) / 2.0 * 10.0
}

/// Position parameter (0..1) of a packet travelling along a connection.
#[inline]
pub fn data_flow_t(elapsed: f32) -> f32 {
    elapsed.rem_euclid(NETWORK_FLOW_PERIOD_SEC) / NETWORK_FLOW_PERIOD_SEC
}
