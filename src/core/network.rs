//! Decorative particle network: seeded nodes joined by quadratic Bézier arcs.
//!
//! Topology is fixed at construction. Per-frame motion (drift, pulse, packets,
//! dash offset) is derived from elapsed time only.

use super::constants::*;
use super::mappers::{dash_offset, data_flow_t, node_pulse};
use glam::Vec3;
use noise::{NoiseFn, Perlin};
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArcMidpoint {
    /// Midpoint raised along +Y by `factor * distance(start, end)`.
    Lifted { factor: f32 },
    /// Midpoint shifted by a random offset in `[-amount/2, amount/2]` per axis.
    Jittered { amount: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeMotion {
    /// Positions wander with 3D Perlin noise.
    Drift { amplitude: f32 },
    /// Positions stay put; scale breathes.
    Pulse,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    pub node_count: usize,
    pub connection_count: usize,
    /// Side of the cube nodes are scattered in, centred on the origin.
    pub extent: f32,
    pub midpoint: ArcMidpoint,
    pub motion: NodeMotion,
    pub curve_segments: usize,
    /// Per-frame noise displacement of arc points; 0 keeps arcs rigid.
    pub line_wobble: f32,
    pub node_radius: f32,
    pub packet_radius: f32,
    pub data_flow: bool,
    pub dashed: bool,
    pub seed: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            node_count: NETWORK_NODES,
            connection_count: NETWORK_CONNECTIONS,
            extent: 6.0,
            midpoint: ArcMidpoint::Lifted {
                factor: NETWORK_ARC_LIFT,
            },
            motion: NodeMotion::Drift {
                amplitude: NETWORK_DRIFT,
            },
            curve_segments: NETWORK_CURVE_SEGMENTS,
            line_wobble: 0.02,
            node_radius: 0.05,
            packet_radius: 0.02,
            data_flow: true,
            dashed: false,
            seed: 7,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadraticBezier {
    pub start: Vec3,
    pub control: Vec3,
    pub end: Vec3,
}

impl QuadraticBezier {
    pub fn point_at(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// `segments + 1` evenly spaced samples including both endpoints.
    pub fn points(&self, segments: usize) -> Vec<Vec3> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }
}

pub struct NetworkTopology {
    config: NetworkConfig,
    nodes: Vec<Vec3>,
    connections: Vec<(usize, usize)>,
    curves: Vec<QuadraticBezier>,
    polylines: Vec<Vec<Vec3>>,
    perlin: Perlin,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkFrame {
    pub node_positions: Vec<Vec3>,
    pub node_scales: Vec<f32>,
    pub packets: Vec<Vec3>,
    /// Arc polylines as displayed this frame.
    pub lines: Vec<Vec<Vec3>>,
    pub dash_offset: f32,
}

impl NetworkTopology {
    pub fn new(config: NetworkConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let half = config.extent / 2.0;
        let nodes: Vec<Vec3> = (0..config.node_count)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                )
            })
            .collect();
        let connections: Vec<(usize, usize)> = if nodes.is_empty() {
            Vec::new()
        } else {
            (0..config.connection_count)
                .map(|_| (rng.gen_range(0..nodes.len()), rng.gen_range(0..nodes.len())))
                .collect()
        };
        let curves: Vec<QuadraticBezier> = connections
            .iter()
            .map(|&(a, b)| {
                let start = nodes[a];
                let end = nodes[b];
                let mut control = start.lerp(end, 0.5);
                match config.midpoint {
                    ArcMidpoint::Lifted { factor } => control.y += start.distance(end) * factor,
                    ArcMidpoint::Jittered { amount } => {
                        control += Vec3::new(
                            rng.gen::<f32>() - 0.5,
                            rng.gen::<f32>() - 0.5,
                            rng.gen::<f32>() - 0.5,
                        ) * amount;
                    }
                }
                QuadraticBezier {
                    start,
                    control,
                    end,
                }
            })
            .collect();
        let polylines = curves
            .iter()
            .map(|c| c.points(config.curve_segments))
            .collect();
        let perlin = Perlin::new(config.seed as u32);
        Self {
            config,
            nodes,
            connections,
            curves,
            polylines,
            perlin,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[Vec3] {
        &self.nodes
    }

    pub fn connections(&self) -> &[(usize, usize)] {
        &self.connections
    }

    pub fn curves(&self) -> &[QuadraticBezier] {
        &self.curves
    }

    /// Sampled arcs; built once with the topology.
    pub fn polylines(&self) -> &[Vec<Vec3>] {
        &self.polylines
    }

    fn noise_offset(&self, p: Vec3, t: f32, amplitude: f32) -> Vec3 {
        let t = (t * NETWORK_DRIFT_RATE) as f64;
        let (x, y, z) = (p.x as f64, p.y as f64, p.z as f64);
        p + Vec3::new(
            self.perlin.get([x, y, t]) as f32,
            self.perlin.get([y, z, t]) as f32,
            self.perlin.get([z, x, t]) as f32,
        ) * amplitude
    }

    /// Fill `out` with this instant's node positions, scales and packets.
    pub fn frame_into(&self, elapsed: f32, out: &mut NetworkFrame) {
        out.node_positions.clear();
        out.node_scales.clear();
        out.packets.clear();
        for &n in &self.nodes {
            match self.config.motion {
                NodeMotion::Drift { amplitude } => {
                    out.node_positions
                        .push(self.noise_offset(n, elapsed, amplitude));
                    out.node_scales.push(1.0);
                }
                NodeMotion::Pulse => {
                    out.node_positions.push(n);
                    out.node_scales.push(node_pulse(n.x, elapsed));
                }
            }
        }
        out.lines.resize_with(self.polylines.len(), Vec::new);
        let wobble = self.config.line_wobble;
        for (line, base) in out.lines.iter_mut().zip(&self.polylines) {
            line.clear();
            if wobble > 0.0 {
                line.extend(base.iter().map(|&p| self.noise_offset(p, elapsed, wobble)));
            } else {
                line.extend_from_slice(base);
            }
        }
        if self.config.data_flow {
            let t = data_flow_t(elapsed);
            out.packets.extend(self.curves.iter().map(|c| c.point_at(t)));
        }
        out.dash_offset = if self.config.dashed {
            dash_offset(elapsed)
        } else {
            0.0
        };
    }
}
