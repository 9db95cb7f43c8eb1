//! Scene composition: mapper outputs plus static ambient elements into one
//! render list.
//!
//! Composition is a pure function of the [`VisualParameterSet`] and the static
//! topology captured at construction. Composing the same parameters twice
//! yields equal lists.

use super::color::{hsl_degrees_to_rgb, hsl_to_rgb};
use super::constants::*;
use super::mappers::{circular_position, BarParams, CircularSlot};
use super::network::NetworkTopology;
use super::variant::{
    network_color, Bloom, BarLayout, Fog, Lighting, PostStack, StarfieldSpec, VariantConfig,
};
use super::visualizer::VisualParameterSet;
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::prelude::*;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    /// Unit cube centred on the origin.
    Cube,
    /// UV sphere of radius 1.
    Sphere,
    /// Subdivided icosahedron of radius 1.
    Icosphere,
    /// Flat annulus in the XY plane between the ring radii.
    Ring,
    /// Soft translucent puff; a sphere shaded with an edge falloff.
    Cloud,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shading {
    Lit,
    Unlit,
    Wireframe,
    /// Rim-weighted additive glow; `emissive` is its intensity.
    Glow,
    /// Alpha fades toward silhouette edges.
    Soft,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub emissive: f32,
    pub opacity: f32,
    pub shading: Shading,
}

impl Material {
    pub fn lit(color: [f32; 3], emissive: f32) -> Self {
        Self {
            color,
            emissive,
            opacity: 1.0,
            shading: Shading::Lit,
        }
    }

    pub fn unlit(color: [f32; 3]) -> Self {
        Self {
            color,
            emissive: 0.0,
            opacity: 1.0,
            shading: Shading::Unlit,
        }
    }

    pub fn wireframe(color: [f32; 3], emissive: f32) -> Self {
        Self {
            color,
            emissive,
            opacity: 1.0,
            shading: Shading::Wireframe,
        }
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0 || matches!(self.shading, Shading::Glow | Shading::Soft)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderItem {
    pub primitive: Primitive,
    pub model: Mat4,
    pub material: Material,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dash {
    pub size: f32,
    pub gap: f32,
    pub offset: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineStrip {
    pub points: Vec<Vec3>,
    pub color: [f32; 3],
    pub dash: Option<Dash>,
}

/// Static star shell; shared between the composer and every list it fills.
#[derive(Clone, Debug, PartialEq)]
pub struct Starfield {
    pub positions: Vec<Vec3>,
    pub brightness: Vec<f32>,
}

impl Starfield {
    /// Points uniformly distributed on directions, at `radius..radius + depth`.
    pub fn generate(spec: &StarfieldSpec) -> Self {
        let mut rng = StdRng::seed_from_u64(spec.seed);
        let mut positions = Vec::with_capacity(spec.count);
        let mut brightness = Vec::with_capacity(spec.count);
        for _ in 0..spec.count {
            let z: f32 = rng.gen_range(-1.0..=1.0);
            let theta: f32 = rng.gen_range(0.0..TAU);
            let r = (1.0 - z * z).max(0.0).sqrt();
            let dist = spec.radius + spec.depth * rng.gen::<f32>();
            positions.push(Vec3::new(r * theta.cos(), r * theta.sin(), z) * dist);
            brightness.push(rng.gen_range(0.4..=1.0));
        }
        Self {
            positions,
            brightness,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderList {
    pub background: [f32; 3],
    pub fog: Option<Fog>,
    pub lighting: Lighting,
    pub post: PostStack,
    pub items: Vec<RenderItem>,
    pub lines: Vec<LineStrip>,
    pub starfield: Option<Rc<Starfield>>,
}

impl RenderList {
    pub fn new(config: &VariantConfig) -> Self {
        Self {
            background: config.ambient.background,
            fog: config.ambient.fog,
            lighting: config.ambient.lighting,
            post: config.ambient.post,
            items: Vec::new(),
            lines: Vec::new(),
            starfield: None,
        }
    }

    pub fn bloom(&self) -> Option<Bloom> {
        self.post.bloom
    }
}

/// Holds the static topology of a variant and writes render lists from
/// per-frame parameters.
pub struct SceneComposer {
    config: VariantConfig,
    starfield: Option<Rc<Starfield>>,
    network: Option<NetworkTopology>,
}

impl SceneComposer {
    pub fn new(config: &VariantConfig) -> Self {
        let starfield = config
            .ambient
            .starfield
            .as_ref()
            .map(|spec| Rc::new(Starfield::generate(spec)));
        let network = config.network.clone().map(NetworkTopology::new);
        Self {
            config: config.clone(),
            starfield,
            network,
        }
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    pub fn network(&self) -> Option<&NetworkTopology> {
        self.network.as_ref()
    }

    pub fn compose(&self, params: &VisualParameterSet) -> RenderList {
        let mut out = RenderList::new(&self.config);
        self.compose_into(params, &mut out);
        out
    }

    /// Overwrite `out` with the scene for `params`, reusing its allocations.
    pub fn compose_into(&self, params: &VisualParameterSet, out: &mut RenderList) {
        let ambient = &self.config.ambient;
        out.background = ambient.background;
        out.fog = ambient.fog;
        out.lighting = ambient.lighting;
        out.post = ambient.post;
        out.starfield = self.starfield.clone();
        out.items.clear();
        let mut lines = LineWriter::new(&mut out.lines);

        if let Some(layout) = self.config.bars {
            push_bars(&layout, &params.bars, &mut out.items);
        }

        if let (Some(spec), Some(wave)) = (self.config.waveform, params.waveform.as_ref()) {
            lines.push(wave.points(), spec.color, None);
        }

        if let Some(spec) = self.config.sphere {
            let color = if spec.hue_mapped {
                hsl_degrees_to_rgb(params.sphere.hue_degrees, 1.0, 0.5)
            } else {
                spec.color
            };
            out.items.push(RenderItem {
                primitive: Primitive::Sphere,
                model: Mat4::from_scale(Vec3::splat(spec.radius * params.sphere.scale)),
                material: Material::wireframe(color, spec.emissive),
            });
        }

        if let Some(spec) = self.config.rings {
            let group = Mat4::from_rotation_z(params.rings.angle)
                * Mat4::from_scale(Vec3::splat(params.rings.scale));
            for i in 0..spec.count {
                let local = Mat4::from_translation(Vec3::new(0.0, 0.0, i as f32 * spec.spacing))
                    * Mat4::from_rotation_x(FRAC_PI_2);
                out.items.push(RenderItem {
                    primitive: Primitive::Ring,
                    model: group * local,
                    material: Material::lit(spec.color, 0.5),
                });
            }
        }

        if let (Some(spec), Some(crystal)) = (self.config.crystal, params.crystal.as_ref()) {
            let pulse = crystal.pulse;
            out.items.push(RenderItem {
                primitive: Primitive::Icosphere,
                model: Mat4::from_rotation_y(crystal.outer_angle)
                    * Mat4::from_scale(Vec3::splat(spec.radius * pulse.outer_scale)),
                material: Material::wireframe([1.0, 1.0, 1.0], 0.3),
            });
            out.items.push(RenderItem {
                primitive: Primitive::Icosphere,
                model: Mat4::from_rotation_y(crystal.inner_angle)
                    * Mat4::from_scale(Vec3::splat(
                        spec.radius * CRYSTAL_INNER_RATIO * pulse.inner_scale,
                    )),
                material: Material {
                    opacity: 0.7,
                    ..Material::lit(spec.inner_color, 0.0)
                },
            });
            out.items.push(RenderItem {
                primitive: Primitive::Icosphere,
                model: Mat4::from_scale(Vec3::splat(
                    spec.radius * CRYSTAL_GLOW_RATIO * pulse.glow_scale,
                )),
                material: Material {
                    color: spec.glow_color,
                    emissive: pulse.glow_intensity,
                    opacity: 0.8,
                    shading: Shading::Glow,
                },
            });
        }

        if let Some(spec) = self.config.nebula {
            for cloud in &params.clouds {
                let rotation =
                    Quat::from_euler(EulerRot::XYZ, cloud.rotation_x, cloud.rotation_y, 0.0);
                out.items.push(RenderItem {
                    primitive: Primitive::Cloud,
                    model: Mat4::from_scale_rotation_translation(
                        Vec3::new(2.5, 1.0, 0.75) * cloud.scale,
                        rotation,
                        cloud.position,
                    ),
                    material: Material {
                        color: hsl_to_rgb(cloud.hue, 1.0, 0.5),
                        emissive: 0.0,
                        opacity: spec.opacity,
                        shading: Shading::Soft,
                    },
                });
            }
        }

        if let Some(spec) = self.config.cubes.as_ref() {
            for cube in &params.cubes {
                let rotation = Quat::from_euler(
                    EulerRot::XYZ,
                    cube.rotation.x,
                    cube.rotation.y,
                    cube.rotation.z,
                );
                out.items.push(RenderItem {
                    primitive: Primitive::Cube,
                    model: Mat4::from_scale_rotation_translation(
                        Vec3::splat(spec.size),
                        rotation,
                        cube.position,
                    ),
                    material: Material::lit(spec.color, 0.5),
                });
            }
        }

        if let Some(network) = self.network.as_ref() {
            let cfg = network.config();
            let color = network_color();
            let frame = &params.network;
            for (pos, scale) in frame.node_positions.iter().zip(&frame.node_scales) {
                out.items.push(RenderItem {
                    primitive: Primitive::Sphere,
                    model: Mat4::from_scale_rotation_translation(
                        Vec3::splat(cfg.node_radius * scale),
                        Quat::IDENTITY,
                        *pos,
                    ),
                    material: Material::unlit(color),
                });
            }
            let dash = cfg.dashed.then_some(Dash {
                size: 0.1,
                gap: 0.05,
                offset: frame.dash_offset,
            });
            for line in &frame.lines {
                lines.push(line, color, dash);
            }
            for packet in &frame.packets {
                out.items.push(RenderItem {
                    primitive: Primitive::Sphere,
                    model: Mat4::from_scale_rotation_translation(
                        Vec3::splat(cfg.packet_radius),
                        Quat::IDENTITY,
                        *packet,
                    ),
                    material: Material::unlit([1.0, 1.0, 1.0]),
                });
            }
        }

        lines.finish();
    }
}

fn push_bars(layout: &BarLayout, bars: &[BarParams], items: &mut Vec<RenderItem>) {
    match *layout {
        BarLayout::Linear {
            count,
            spacing,
            origin_y,
            rotation_z,
            ..
        } => {
            let group = Mat4::from_translation(Vec3::new(0.0, origin_y, 0.0))
                * Mat4::from_rotation_z(rotation_z);
            let half = (count / 2) as f32;
            for (i, bar) in bars.iter().enumerate() {
                let x = (i as f32 - half) * spacing;
                let hue = i as f32 / count.max(1) as f32;
                items.push(RenderItem {
                    primitive: Primitive::Cube,
                    model: group * bar_model(Vec3::new(x, bar.y_offset, 0.0), bar.scale_y),
                    material: Material::lit(hsl_to_rgb(hue, 1.0, 0.5), 0.5),
                });
            }
        }
        BarLayout::Circular { count, radius, .. } => {
            for (i, bar) in bars.iter().enumerate() {
                let CircularSlot { x, z, hue } = circular_position(i, count, radius);
                items.push(RenderItem {
                    primitive: Primitive::Cube,
                    model: bar_model(Vec3::new(x, bar.y_offset, z), bar.scale_y),
                    material: Material::lit(hsl_to_rgb(hue, 0.7, 0.5), 0.5),
                });
            }
        }
    }
}

fn bar_model(position: Vec3, scale_y: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::new(BAR_SIZE[0], BAR_SIZE[1] * scale_y, BAR_SIZE[2]),
        Quat::IDENTITY,
        position,
    )
}

/// Rewrites line strips in place, growing or truncating the list at the end.
struct LineWriter<'a> {
    lines: &'a mut Vec<LineStrip>,
    used: usize,
}

impl<'a> LineWriter<'a> {
    fn new(lines: &'a mut Vec<LineStrip>) -> Self {
        Self { lines, used: 0 }
    }

    fn push(&mut self, points: &[Vec3], color: [f32; 3], dash: Option<Dash>) {
        if let Some(slot) = self.lines.get_mut(self.used) {
            slot.points.clear();
            slot.points.extend_from_slice(points);
            slot.color = color;
            slot.dash = dash;
        } else {
            self.lines.push(LineStrip {
                points: points.to_vec(),
                color,
                dash,
            });
        }
        self.used += 1;
    }

    fn finish(self) {
        self.lines.truncate(self.used);
    }
}
