use thiserror::Error;

/// Conditions the pipeline can report. None of them stop the render loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VizError {
    #[error("analyser reports zero frequency bins")]
    EmptyAnalyser,
    #[error("audio graph binding failed: {0}")]
    Binding(String),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("unknown visualizer variant `{0}`")]
    UnknownVariant(String),
}
