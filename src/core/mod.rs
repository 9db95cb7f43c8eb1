pub mod analysis;
pub mod camera;
pub mod color;
pub mod constants;
pub mod error;
pub mod input;
pub mod mappers;
pub mod network;
pub mod sampler;
pub mod scene;
pub mod spectrum;
pub mod transport;
pub mod variant;
pub mod visualizer;

pub use analysis::FftAnalyser;
pub use camera::OrbitCamera;
pub use error::VizError;
pub use sampler::{FrequencySampler, Reduction};
pub use scene::{RenderList, SceneComposer};
pub use spectrum::{BindingState, MagnitudeAnalyser, SessionId, SpectrumFrame, SpectrumSource};
pub use transport::{TransportCommand, TransportState};
pub use variant::{VariantBuilder, VariantConfig, VariantKind};
pub use visualizer::{VisualParameterSet, Visualizer};

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../../shaders/post.wgsl");
