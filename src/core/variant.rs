//! Variant configuration records.
//!
//! Every scene in the collection is one [`VariantConfig`] fed to the same
//! pipeline. Presets are built with [`VariantBuilder`]; a builder starts empty
//! (no mappers, black background, default camera) and each call enables one
//! element.

use super::color::hex_to_rgb;
use super::constants::*;
use super::error::VizError;
use super::mappers::WaveShape;
use super::network::{ArcMidpoint, NetworkConfig, NodeMotion};
use super::sampler::Reduction;
use glam::Vec3;
use smallvec::SmallVec;
use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Spectrum,
    Ribbon,
    #[default]
    Orbit,
    Nebula,
    Crystal,
    Network,
    Synapse,
}

impl VariantKind {
    pub const ALL: [VariantKind; 7] = [
        VariantKind::Spectrum,
        VariantKind::Ribbon,
        VariantKind::Orbit,
        VariantKind::Nebula,
        VariantKind::Crystal,
        VariantKind::Network,
        VariantKind::Synapse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VariantKind::Spectrum => "spectrum",
            VariantKind::Ribbon => "ribbon",
            VariantKind::Orbit => "orbit",
            VariantKind::Nebula => "nebula",
            VariantKind::Crystal => "crystal",
            VariantKind::Network => "network",
            VariantKind::Synapse => "synapse",
        }
    }

    /// Number keys "1".."7" select variants in [`VariantKind::ALL`] order.
    pub fn from_hotkey(key: &str) -> Option<Self> {
        let digit = key.parse::<usize>().ok()?;
        if digit == 0 {
            return None;
        }
        Self::ALL.get(digit - 1).copied()
    }

    pub fn from_name(name: &str) -> Result<Self, VizError> {
        let wanted = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| VizError::UnknownVariant(wanted.to_string()))
    }

    pub fn config(self) -> VariantConfig {
        match self {
            VariantKind::Spectrum => spectrum(),
            VariantKind::Ribbon => ribbon(),
            VariantKind::Orbit => orbit(),
            VariantKind::Nebula => nebula(),
            VariantKind::Crystal => crystal(),
            VariantKind::Network => network(),
            VariantKind::Synapse => synapse(),
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VariantKind {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Which mapper sets a variant runs each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapperKind {
    Bars,
    CircularBars,
    Waveform,
    Sphere,
    Rings,
    Crystal,
    Nebula,
    Network,
    Cubes,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BarLayout {
    /// Row along X at `(i - count/2) * spacing`, hue `i / count`, full saturation.
    Linear {
        count: usize,
        spacing: f32,
        gain: f32,
        origin_y: f32,
        /// Rotation of the whole row about Z.
        rotation_z: f32,
    },
    /// Ring in the XZ plane, hue `i / count`, saturation 0.7.
    Circular {
        count: usize,
        radius: f32,
        gain: f32,
    },
}

impl BarLayout {
    pub fn count(&self) -> usize {
        match *self {
            BarLayout::Linear { count, .. } | BarLayout::Circular { count, .. } => count,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveformSpec {
    pub points: usize,
    pub shape: WaveShape,
    pub gain: f32,
    pub color: [f32; 3],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereSpec {
    pub radius: f32,
    pub gain: f32,
    /// Map the average level onto hue; otherwise the sphere stays `color`.
    pub hue_mapped: bool,
    pub color: [f32; 3],
    pub emissive: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingSpec {
    pub count: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub spacing: f32,
    pub gain: f32,
    pub spin_per_frame: f32,
    pub color: [f32; 3],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrystalSpec {
    pub radius: f32,
    pub gain: f32,
    pub bass_bins: usize,
    pub outer_spin_per_frame: f32,
    pub inner_spin_per_frame: f32,
    pub inner_color: [f32; 3],
    pub glow_color: [f32; 3],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NebulaSpec {
    pub clouds: usize,
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CubeSpec {
    pub bases: Vec<Vec3>,
    pub size: f32,
    pub color: [f32; 3],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSpec {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub auto_rotate_speed: f32,
    pub zoom: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    pub point_position: Vec3,
    pub point_intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarfieldSpec {
    pub count: usize,
    pub radius: f32,
    pub depth: f32,
    pub seed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bloom {
    pub threshold: f32,
    pub smoothing: f32,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vignette {
    pub offset: f32,
    pub darkness: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PostStack {
    pub bloom: Option<Bloom>,
    /// Film-grain opacity; 0 disables it.
    pub noise: f32,
    pub vignette: Option<Vignette>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ambient {
    pub background: [f32; 3],
    pub fog: Option<Fog>,
    pub camera: CameraSpec,
    pub lighting: Lighting,
    pub starfield: Option<StarfieldSpec>,
    pub post: PostStack,
}

impl Default for Ambient {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0],
            fog: None,
            camera: CameraSpec {
                eye: Vec3::new(0.0, 0.0, 5.0),
                target: Vec3::ZERO,
                fov_degrees: 75.0,
                auto_rotate_speed: 0.0,
                zoom: true,
            },
            lighting: Lighting {
                ambient: 0.2,
                point_position: Vec3::new(10.0, 10.0, 10.0),
                point_intensity: 1.0,
            },
            starfield: None,
            post: PostStack::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariantConfig {
    pub kind: VariantKind,
    pub reduction: Reduction,
    pub bars: Option<BarLayout>,
    pub waveform: Option<WaveformSpec>,
    pub sphere: Option<SphereSpec>,
    pub rings: Option<RingSpec>,
    pub crystal: Option<CrystalSpec>,
    pub nebula: Option<NebulaSpec>,
    pub network: Option<NetworkConfig>,
    pub cubes: Option<CubeSpec>,
    pub ambient: Ambient,
}

impl VariantConfig {
    pub fn builder(kind: VariantKind) -> VariantBuilder {
        VariantBuilder::new(kind)
    }

    pub fn active_mappers(&self) -> SmallVec<[MapperKind; 8]> {
        let mut out = SmallVec::new();
        match self.bars {
            Some(BarLayout::Linear { .. }) => out.push(MapperKind::Bars),
            Some(BarLayout::Circular { .. }) => out.push(MapperKind::CircularBars),
            None => {}
        }
        if self.waveform.is_some() {
            out.push(MapperKind::Waveform);
        }
        if self.sphere.is_some() {
            out.push(MapperKind::Sphere);
        }
        if self.rings.is_some() {
            out.push(MapperKind::Rings);
        }
        if self.crystal.is_some() {
            out.push(MapperKind::Crystal);
        }
        if self.nebula.is_some() {
            out.push(MapperKind::Nebula);
        }
        if self.network.is_some() {
            out.push(MapperKind::Network);
        }
        if self.cubes.is_some() {
            out.push(MapperKind::Cubes);
        }
        out
    }
}

pub struct VariantBuilder {
    config: VariantConfig,
}

impl VariantBuilder {
    pub fn new(kind: VariantKind) -> Self {
        Self {
            config: VariantConfig {
                kind,
                reduction: Reduction::Raw,
                bars: None,
                waveform: None,
                sphere: None,
                rings: None,
                crystal: None,
                nebula: None,
                network: None,
                cubes: None,
                ambient: Ambient::default(),
            },
        }
    }

    pub fn reduction(mut self, reduction: Reduction) -> Self {
        self.config.reduction = reduction;
        self
    }

    pub fn bars(mut self, layout: BarLayout) -> Self {
        self.config.bars = Some(layout);
        self
    }

    pub fn waveform(mut self, spec: WaveformSpec) -> Self {
        self.config.waveform = Some(spec);
        self
    }

    pub fn sphere(mut self, spec: SphereSpec) -> Self {
        self.config.sphere = Some(spec);
        self
    }

    pub fn rings(mut self, spec: RingSpec) -> Self {
        self.config.rings = Some(spec);
        self
    }

    pub fn crystal(mut self, spec: CrystalSpec) -> Self {
        self.config.crystal = Some(spec);
        self
    }

    /// Clouds read the bucketed view; this also switches the reduction.
    pub fn nebula(mut self, spec: NebulaSpec) -> Self {
        self.config.reduction = Reduction::Bucketed {
            buckets: spec.clouds,
        };
        self.config.nebula = Some(spec);
        self
    }

    pub fn network(mut self, config: NetworkConfig) -> Self {
        self.config.network = Some(config);
        self
    }

    pub fn cubes(mut self, spec: CubeSpec) -> Self {
        self.config.cubes = Some(spec);
        self
    }

    pub fn background(mut self, rgb: [f32; 3]) -> Self {
        self.config.ambient.background = rgb;
        self
    }

    pub fn fog(mut self, fog: Fog) -> Self {
        self.config.ambient.fog = Some(fog);
        self
    }

    pub fn camera(mut self, camera: CameraSpec) -> Self {
        self.config.ambient.camera = camera;
        self
    }

    pub fn lighting(mut self, lighting: Lighting) -> Self {
        self.config.ambient.lighting = lighting;
        self
    }

    pub fn starfield(mut self, spec: StarfieldSpec) -> Self {
        self.config.ambient.starfield = Some(spec);
        self
    }

    pub fn post(mut self, post: PostStack) -> Self {
        self.config.ambient.post = post;
        self
    }

    pub fn build(self) -> VariantConfig {
        self.config
    }
}

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const CYAN: u32 = 0x00ffff;
const MAGENTA: u32 = 0xff00ff;
const GREEN: u32 = 0x00ff00;
const NETWORK_BLUE: u32 = 0x4fc3f7;
const NETWORK_BACKGROUND: u32 = 0x000814;

fn camera(eye: Vec3, fov_degrees: f32) -> CameraSpec {
    CameraSpec {
        eye,
        target: Vec3::ZERO,
        fov_degrees,
        auto_rotate_speed: 0.0,
        zoom: true,
    }
}

fn lighting(ambient: f32) -> Lighting {
    Lighting {
        ambient,
        point_position: Vec3::new(10.0, 10.0, 10.0),
        point_intensity: 1.0,
    }
}

fn stars() -> StarfieldSpec {
    StarfieldSpec {
        count: STAR_COUNT,
        radius: STAR_RADIUS,
        depth: STAR_DEPTH,
        seed: 1,
    }
}

/// Bloom, grain and vignette shared by the bar scenes.
fn cinematic_post() -> PostStack {
    PostStack {
        bloom: Some(Bloom {
            threshold: 0.2,
            smoothing: 0.9,
            intensity: 1.0,
        }),
        noise: 0.02,
        vignette: Some(Vignette {
            offset: 0.1,
            darkness: 1.1,
        }),
    }
}

fn bloom_only(threshold: f32, intensity: f32) -> PostStack {
    PostStack {
        bloom: Some(Bloom {
            threshold,
            smoothing: 0.9,
            intensity,
        }),
        noise: 0.0,
        vignette: None,
    }
}

fn white_sphere() -> SphereSpec {
    SphereSpec {
        radius: SPHERE_RADIUS,
        gain: 1.0,
        hue_mapped: false,
        color: WHITE,
        emissive: 0.2,
    }
}

fn linear_bars(origin_y: f32, rotation_z: f32) -> BarLayout {
    BarLayout::Linear {
        count: BAR_COUNT,
        spacing: BAR_SPACING,
        gain: BAR_GAIN,
        origin_y,
        rotation_z,
    }
}

fn spectrum() -> VariantConfig {
    VariantBuilder::new(VariantKind::Spectrum)
        .bars(linear_bars(-5.0, 0.0))
        .waveform(WaveformSpec {
            points: WAVEFORM_POINTS,
            shape: WaveShape::Line {
                extent: WAVEFORM_EXTENT,
            },
            gain: WAVEFORM_GAIN,
            color: hex_to_rgb(CYAN),
        })
        .sphere(white_sphere())
        .camera(CameraSpec {
            auto_rotate_speed: -0.1,
            ..camera(Vec3::new(0.0, 0.0, 25.0), 60.0)
        })
        .lighting(lighting(0.2))
        .starfield(stars())
        .post(cinematic_post())
        .build()
}

fn ribbon() -> VariantConfig {
    VariantBuilder::new(VariantKind::Ribbon)
        .bars(linear_bars(0.0, FRAC_PI_2))
        .waveform(WaveformSpec {
            points: WAVEFORM_POINTS,
            shape: WaveShape::Ellipse {
                radius: WAVEFORM_ELLIPSE_RADIUS,
            },
            gain: WAVEFORM_GAIN,
            color: hex_to_rgb(CYAN),
        })
        .sphere(white_sphere())
        .camera(CameraSpec {
            zoom: false,
            ..camera(Vec3::new(0.0, 0.0, 25.0), 60.0)
        })
        .lighting(lighting(0.2))
        .starfield(stars())
        .post(cinematic_post())
        .build()
}

fn orbit() -> VariantConfig {
    VariantBuilder::new(VariantKind::Orbit)
        .bars(BarLayout::Circular {
            count: BAR_COUNT,
            radius: CIRCULAR_RADIUS,
            gain: CIRCULAR_BAR_GAIN,
        })
        .sphere(SphereSpec {
            radius: SPHERE_RADIUS,
            gain: 0.3,
            hue_mapped: true,
            color: WHITE,
            emissive: 0.5,
        })
        .rings(RingSpec {
            count: RING_COUNT,
            inner_radius: RING_INNER_RADIUS,
            outer_radius: RING_OUTER_RADIUS,
            spacing: RING_SPACING,
            gain: RING_GAIN,
            spin_per_frame: RING_SPIN_PER_FRAME,
            color: hex_to_rgb(MAGENTA),
        })
        .cubes(CubeSpec {
            bases: vec![
                Vec3::new(0.0, 5.0, 0.0),
                Vec3::new(-5.0, 5.0, 0.0),
                Vec3::new(5.0, 5.0, 0.0),
            ],
            size: 1.0,
            color: hex_to_rgb(GREEN),
        })
        .camera(camera(Vec3::new(0.0, 15.0, 25.0), 60.0))
        .lighting(lighting(0.2))
        .starfield(stars())
        .post(cinematic_post())
        .build()
}

fn nebula() -> VariantConfig {
    VariantBuilder::new(VariantKind::Nebula)
        .nebula(NebulaSpec {
            clouds: NEBULA_BANDS,
            opacity: 0.5,
        })
        .camera(camera(Vec3::new(0.0, 0.0, 20.0), 75.0))
        .lighting(lighting(0.5))
        .post(cinematic_post())
        .build()
}

fn crystal() -> VariantConfig {
    VariantBuilder::new(VariantKind::Crystal)
        .crystal(CrystalSpec {
            radius: SPHERE_RADIUS,
            gain: CRYSTAL_GAIN,
            bass_bins: BASS_BINS,
            outer_spin_per_frame: CRYSTAL_OUTER_SPIN_PER_FRAME,
            inner_spin_per_frame: CRYSTAL_INNER_SPIN_PER_FRAME,
            inner_color: hex_to_rgb(0xfe2fee),
            glow_color: [0.1, 0.31, 0.6],
        })
        .camera(camera(Vec3::new(0.0, 0.0, 8.0), 60.0))
        .lighting(lighting(0.2))
        .post(bloom_only(0.2, 1.0))
        .build()
}

fn network() -> VariantConfig {
    VariantBuilder::new(VariantKind::Network)
        .network(NetworkConfig::default())
        .background(hex_to_rgb(NETWORK_BACKGROUND))
        .fog(Fog {
            color: hex_to_rgb(NETWORK_BACKGROUND),
            near: 5.0,
            far: 15.0,
        })
        .camera(camera(Vec3::new(0.0, 0.0, 8.0), 60.0))
        .lighting(lighting(0.1))
        .post(bloom_only(0.2, 1.0))
        .build()
}

fn synapse() -> VariantConfig {
    VariantBuilder::new(VariantKind::Synapse)
        .network(NetworkConfig {
            extent: 4.0,
            midpoint: ArcMidpoint::Jittered { amount: 0.5 },
            motion: NodeMotion::Pulse,
            line_wobble: 0.0,
            node_radius: 0.03,
            data_flow: false,
            dashed: true,
            seed: 11,
            ..NetworkConfig::default()
        })
        .background(hex_to_rgb(NETWORK_BACKGROUND))
        .camera(camera(Vec3::new(0.0, 0.0, 5.0), 75.0))
        .lighting(lighting(0.1))
        .post(bloom_only(0.1, 0.5))
        .build()
}

/// Network node/line color shared by both network presets.
pub fn network_color() -> [f32; 3] {
    hex_to_rgb(NETWORK_BLUE)
}
