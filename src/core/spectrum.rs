//! Spectrum frames and the source that produces them.
//!
//! The platform analyser (WebAudio `AnalyserNode` in the browser, [`FftAnalyser`]
//! on the host) sits behind [`MagnitudeAnalyser`]. The source owns at most one
//! binding at a time and tears the previous one down before accepting a new one,
//! so a frame is never read from a stale signal graph.
//!
//! [`FftAnalyser`]: crate::core::analysis::FftAnalyser

use super::constants::MAX_MAGNITUDE;
use super::error::VizError;
use super::mappers::mean;

/// Identifies one analysis session (one bound AudioSource).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// One snapshot of byte magnitudes. Superseded by the next refresh, never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpectrumFrame {
    bins: Vec<u8>,
    session: Option<SessionId>,
}

impl SpectrumFrame {
    pub fn silent(len: usize) -> Self {
        Self {
            bins: vec![0; len],
            session: None,
        }
    }

    pub fn from_bins(bins: Vec<u8>) -> Self {
        Self {
            bins,
            session: None,
        }
    }

    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Session this frame was captured from; `None` for silence or synthetic frames.
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    pub fn is_silent(&self) -> bool {
        self.bins.iter().all(|&b| b == 0)
    }

    /// Magnitudes widened to `f32`, still in 0..=255.
    pub fn magnitudes(&self) -> Vec<f32> {
        self.bins.iter().map(|&b| b as f32).collect()
    }

    pub fn mean(&self) -> f32 {
        mean(&self.magnitudes())
    }

    pub fn level(&self) -> f32 {
        self.mean() / MAX_MAGNITUDE
    }
}

/// Streaming magnitude analyser bound to a decoded signal graph.
pub trait MagnitudeAnalyser {
    fn bin_count(&self) -> usize;

    /// Copy the currently buffered magnitudes into `out` (len == `bin_count`).
    /// Must return immediately with whatever is available.
    fn byte_frequency_data(&mut self, out: &mut [u8]);

    /// Detach from the signal graph. Called once, before the binding is dropped.
    fn disconnect(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingState {
    Unbound,
    Bound(SessionId),
    /// The platform refused the analysis graph for this session.
    Failed(SessionId),
}

struct Binding {
    session: SessionId,
    analyser: Box<dyn MagnitudeAnalyser>,
    scratch: Vec<u8>,
}

pub struct SpectrumSource {
    binding: Option<Binding>,
    state: BindingState,
    bin_count: usize,
    next_session: u64,
}

impl SpectrumSource {
    /// `bin_count` is the frame length reported while nothing is bound.
    pub fn new(bin_count: usize) -> Self {
        Self {
            binding: None,
            state: BindingState::Unbound,
            bin_count,
            next_session: 1,
        }
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    pub fn session(&self) -> Option<SessionId> {
        match self.state {
            BindingState::Bound(s) => Some(s),
            _ => None,
        }
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Replace the current binding. The previous analyser is disconnected first.
    pub fn bind(&mut self, analyser: Box<dyn MagnitudeAnalyser>) -> Result<SessionId, VizError> {
        self.bind_with(|| Ok(analyser))
    }

    /// Tear down the current binding, then build and bind a new analyser.
    ///
    /// On failure the source enters [`BindingState::Failed`] for the new session;
    /// the sampler keeps showing the last frame it pulled.
    pub fn bind_with<F>(&mut self, connect: F) -> Result<SessionId, VizError>
    where
        F: FnOnce() -> Result<Box<dyn MagnitudeAnalyser>, VizError>,
    {
        self.unbind();
        let session = SessionId(self.next_session);
        self.next_session += 1;

        let analyser = connect().and_then(|a| {
            if a.bin_count() == 0 {
                Err(VizError::EmptyAnalyser)
            } else {
                Ok(a)
            }
        });
        match analyser {
            Ok(analyser) => {
                let bins = analyser.bin_count();
                self.bin_count = bins;
                self.binding = Some(Binding {
                    session,
                    analyser,
                    scratch: vec![0; bins],
                });
                self.state = BindingState::Bound(session);
                log::info!("[spectrum] bound session={} bins={}", session.0, bins);
                Ok(session)
            }
            Err(e) => {
                self.state = BindingState::Failed(session);
                log::error!("[spectrum] session={} binding failed: {}", session.0, e);
                Err(e)
            }
        }
    }

    pub fn unbind(&mut self) {
        if let Some(mut b) = self.binding.take() {
            b.analyser.disconnect();
            log::info!("[spectrum] released session={}", b.session.0);
        }
        self.state = BindingState::Unbound;
    }

    /// Mark the current source unusable (for example the media element failed
    /// to decode). Any live binding is torn down and the source stays
    /// [`BindingState::Failed`] until the next bind, so the sampler freezes.
    pub fn fail(&mut self) -> SessionId {
        let session = match self.state {
            BindingState::Failed(s) => s,
            _ => {
                self.unbind();
                let s = SessionId(self.next_session);
                self.next_session += 1;
                s
            }
        };
        self.state = BindingState::Failed(session);
        log::warn!("[spectrum] session={} failed; holding last frame", session.0);
        session
    }

    /// Read whatever the analyser has buffered right now.
    /// Without a live binding this is a silent frame of the expected length.
    pub fn refresh(&mut self) -> SpectrumFrame {
        match self.binding.as_mut() {
            Some(b) => {
                b.analyser.byte_frequency_data(&mut b.scratch);
                SpectrumFrame {
                    bins: b.scratch.clone(),
                    session: Some(b.session),
                }
            }
            None => SpectrumFrame::silent(self.bin_count),
        }
    }
}

impl Drop for SpectrumSource {
    fn drop(&mut self) {
        self.unbind();
    }
}
