use super::spectrum::{BindingState, SpectrumFrame, SpectrumSource};

/// How a variant reads the raw frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reduction {
    /// All bins as captured.
    Raw,
    /// Mean of equal-width bands, recomputed from the raw frame every frame.
    Bucketed { buckets: usize },
}

/// Owns the single frame every mapper reads during a tick.
pub struct FrequencySampler {
    frame: SpectrumFrame,
    pulls: u64,
}

impl FrequencySampler {
    pub fn new(bin_count: usize) -> Self {
        Self {
            frame: SpectrumFrame::silent(bin_count),
            pulls: 0,
        }
    }

    /// Replace the stored frame with a fresh one from `source`.
    ///
    /// A failed binding keeps the previous frame so the scene freezes instead of
    /// snapping to silence.
    pub fn pull(&mut self, source: &mut SpectrumSource) -> &SpectrumFrame {
        if let BindingState::Failed(_) = source.state() {
            return &self.frame;
        }
        self.frame = source.refresh();
        self.pulls += 1;
        &self.frame
    }

    pub fn frame(&self) -> &SpectrumFrame {
        &self.frame
    }

    pub fn pulls(&self) -> u64 {
        self.pulls
    }

    pub fn frequencies(&self, reduction: Reduction) -> Vec<f32> {
        reduce(&self.frame, reduction)
    }
}

pub fn reduce(frame: &SpectrumFrame, reduction: Reduction) -> Vec<f32> {
    match reduction {
        Reduction::Raw => frame.magnitudes(),
        Reduction::Bucketed { buckets } => bucket(frame.bins(), buckets),
    }
}

/// `bucket[i] = mean(raw[i*stride .. i*stride + stride])`, `stride = raw.len() / buckets`.
/// Trailing bins past `buckets * stride` are ignored; an empty band averages to 0.
pub fn bucket(raw: &[u8], buckets: usize) -> Vec<f32> {
    if buckets == 0 {
        return Vec::new();
    }
    let stride = raw.len() / buckets;
    (0..buckets)
        .map(|i| {
            let band = &raw[i * stride..i * stride + stride];
            if band.is_empty() {
                0.0
            } else {
                band.iter().map(|&b| b as f32).sum::<f32>() / band.len() as f32
            }
        })
        .collect()
}
