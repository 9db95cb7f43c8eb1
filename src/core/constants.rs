// Pipeline tuning constants shared by the core and the web frontend.

// Analysis
pub const FFT_SIZE: usize = 256;
pub const BIN_COUNT: usize = FFT_SIZE / 2; // magnitudes per SpectrumFrame
pub const MAX_MAGNITUDE: f32 = 255.0;
pub const SMOOTHING_TIME_CONSTANT: f32 = 0.8;
pub const MIN_DECIBELS: f32 = -100.0;
pub const MAX_DECIBELS: f32 = -30.0;

// Reductions
pub const NEBULA_BANDS: usize = 8;
pub const BASS_BINS: usize = 8;

// Per-frame spin increments are defined at this cadence
pub const REFERENCE_FPS: f32 = 60.0;

// Bars
pub const BAR_COUNT: usize = 64;
pub const BAR_GAIN: f32 = 3.0;
pub const BAR_SPACING: f32 = 0.3;
pub const BAR_SIZE: [f32; 3] = [0.3, 1.0, 0.3];
pub const CIRCULAR_BAR_GAIN: f32 = 5.0;
pub const CIRCULAR_RADIUS: f32 = 8.0;

// Waveform
pub const WAVEFORM_POINTS: usize = 256;
pub const WAVEFORM_EXTENT: f32 = 20.0;
pub const WAVEFORM_GAIN: f32 = 2.0;
pub const WAVEFORM_ELLIPSE_RADIUS: f32 = 10.0;

// Sphere and rings
pub const SPHERE_RADIUS: f32 = 2.0;
pub const RING_INNER_RADIUS: f32 = 2.5;
pub const RING_OUTER_RADIUS: f32 = 2.7;
pub const RING_COUNT: usize = 3;
pub const RING_SPACING: f32 = 0.5;
pub const RING_GAIN: f32 = 0.2;
pub const RING_SPIN_PER_FRAME: f32 = 0.005;

// Crystal
pub const CRYSTAL_GAIN: f32 = 0.2;
pub const CRYSTAL_INNER_RATIO: f32 = 0.9;
pub const CRYSTAL_GLOW_RATIO: f32 = 0.95;
pub const CRYSTAL_GLOW_MAX: f32 = 5.0;
pub const CRYSTAL_OUTER_SPIN_PER_FRAME: f32 = 0.005;
pub const CRYSTAL_INNER_SPIN_PER_FRAME: f32 = -0.003;

// Nebula
pub const NEBULA_SPACING: f32 = 3.0;
pub const NEBULA_SCALE_DIVISOR: f32 = 128.0;
pub const NEBULA_SWAY: f32 = 0.2;

// Starfield
pub const STAR_RADIUS: f32 = 100.0;
pub const STAR_DEPTH: f32 = 50.0;
pub const STAR_COUNT: usize = 5000;

// Particle network
pub const NETWORK_NODES: usize = 100;
pub const NETWORK_CONNECTIONS: usize = 150;
pub const NETWORK_CURVE_SEGMENTS: usize = 50;
pub const NETWORK_ARC_LIFT: f32 = 0.1;
pub const NETWORK_DRIFT: f32 = 0.1;
pub const NETWORK_DRIFT_RATE: f32 = 0.5;
pub const NETWORK_PULSE: f32 = 0.1;
pub const NETWORK_FLOW_PERIOD_SEC: f32 = 2.0;

// Transport
pub const VOLUME_STEP: f32 = 0.05;
pub const SEEK_STEP_SEC: f64 = 5.0;
