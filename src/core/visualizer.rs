//! The per-frame tick: one spectrum frame plus elapsed time in, one render list out.
//!
//! Callable the same way from the browser frame loop and from a test feeding
//! synthetic frames.

use super::mappers::*;
use super::network::NetworkFrame;
use super::sampler::reduce;
use super::scene::{RenderList, SceneComposer};
use super::spectrum::SpectrumFrame;
use super::variant::{BarLayout, VariantConfig, VariantKind};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingParams {
    pub scale: f32,
    pub angle: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrystalParams {
    pub pulse: BassPulse,
    pub outer_angle: f32,
    pub inner_angle: f32,
}

/// Values derived from the current frame. Rewritten every tick; the buffers are
/// kept so nothing is reallocated between frames.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualParameterSet {
    pub elapsed: f32,
    /// Mean magnitude of the frame normalised to 0..1.
    pub level: f32,
    pub bars: Vec<BarParams>,
    pub sphere: SpherePulse,
    pub rings: RingParams,
    pub waveform: Option<WaveformLine>,
    pub crystal: Option<CrystalParams>,
    pub clouds: Vec<CloudParams>,
    pub cubes: Vec<CubeMotion>,
    pub network: NetworkFrame,
}

impl VisualParameterSet {
    /// Parameters for a silent frame at time zero.
    pub fn rest(config: &VariantConfig) -> Self {
        Self {
            elapsed: 0.0,
            level: 0.0,
            bars: vec![BarParams::REST; config.bars.map_or(0, |b| b.count())],
            sphere: SpherePulse::REST,
            rings: RingParams {
                scale: 1.0,
                angle: 0.0,
            },
            waveform: config
                .waveform
                .map(|w| WaveformLine::new(w.points, w.shape, w.gain)),
            crystal: config.crystal.map(|_| CrystalParams {
                pulse: bass_pulse(&[], 0, 0.0),
                outer_angle: 0.0,
                inner_angle: 0.0,
            }),
            clouds: Vec::new(),
            cubes: Vec::new(),
            network: NetworkFrame::default(),
        }
    }
}

pub struct Visualizer {
    composer: SceneComposer,
    params: VisualParameterSet,
    frequencies: Vec<f32>,
    ring_spin: Spin,
    outer_spin: Spin,
    inner_spin: Spin,
    last_elapsed: Option<f64>,
    list: RenderList,
}

impl Visualizer {
    pub fn new(config: VariantConfig) -> Self {
        let composer = SceneComposer::new(&config);
        let params = VisualParameterSet::rest(&config);
        let list = composer.compose(&params);
        let ring_spin = Spin::per_frame(config.rings.map_or(0.0, |r| r.spin_per_frame));
        let (outer, inner) = config.crystal.map_or((0.0, 0.0), |c| {
            (c.outer_spin_per_frame, c.inner_spin_per_frame)
        });
        log::info!(
            "[viz] variant={} mappers={:?}",
            config.kind,
            config.active_mappers()
        );
        Self {
            composer,
            params,
            frequencies: Vec::new(),
            ring_spin,
            outer_spin: Spin::per_frame(outer),
            inner_spin: Spin::per_frame(inner),
            last_elapsed: None,
            list,
        }
    }

    pub fn kind(&self) -> VariantKind {
        self.composer.config().kind
    }

    pub fn config(&self) -> &VariantConfig {
        self.composer.config()
    }

    pub fn composer(&self) -> &SceneComposer {
        &self.composer
    }

    pub fn parameters(&self) -> &VisualParameterSet {
        &self.params
    }

    /// The reduced view the mappers read on the last tick.
    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    pub fn render_list(&self) -> &RenderList {
        &self.list
    }

    pub fn tick(&mut self, frame: &SpectrumFrame, elapsed: f64) -> &RenderList {
        let dt = match self.last_elapsed {
            Some(prev) if elapsed > prev => (elapsed - prev) as f32,
            _ => 0.0,
        };
        self.last_elapsed = Some(elapsed);
        self.frequencies = reduce(frame, self.config().reduction);
        self.update_parameters(elapsed as f32, dt);
        self.composer.compose_into(&self.params, &mut self.list);
        &self.list
    }

    fn update_parameters(&mut self, t: f32, dt: f32) {
        let config = self.composer.config();
        let freqs = &self.frequencies;
        let p = &mut self.params;
        p.elapsed = t;
        p.level = normalized(mean(freqs));

        if let Some(layout) = config.bars {
            let gain = match layout {
                BarLayout::Linear { gain, .. } | BarLayout::Circular { gain, .. } => gain,
            };
            p.bars.clear();
            p.bars.extend(
                (0..layout.count()).map(|i| bar_scale(freqs.get(i).copied().unwrap_or(0.0), gain)),
            );
        }

        if let Some(wave) = p.waveform.as_mut() {
            wave.update(freqs);
        }

        if let Some(sphere) = config.sphere {
            p.sphere = sphere_pulse(freqs, sphere.gain);
        }

        if let Some(rings) = config.rings {
            p.rings = RingParams {
                scale: ring_scale(freqs, rings.gain),
                angle: self.ring_spin.advance(dt),
            };
        }

        if let Some(crystal) = config.crystal {
            p.crystal = Some(CrystalParams {
                pulse: bass_pulse(freqs, crystal.bass_bins, crystal.gain),
                outer_angle: self.outer_spin.advance(dt),
                inner_angle: self.inner_spin.advance(dt),
            });
        }

        if let Some(nebula) = config.nebula {
            p.clouds.clear();
            p.clouds.extend((0..nebula.clouds).map(|i| {
                nebula_cloud(i, nebula.clouds, freqs.get(i).copied().unwrap_or(0.0), t)
            }));
        }

        if let Some(cubes) = config.cubes.as_ref() {
            p.cubes.clear();
            p.cubes
                .extend(cubes.bases.iter().map(|&base| floating_cube(base, t)));
        }

        if let Some(network) = self.composer.network() {
            network.frame_into(t, &mut p.network);
        }
    }
}
