//! WebAudio graph: media element → analyser → destination.

use crate::core::constants::{FFT_SIZE, MAX_DECIBELS, MIN_DECIBELS, SMOOTHING_TIME_CONSTANT};
use crate::core::{MagnitudeAnalyser, VizError};
use web_sys as web;

/// Browser `AnalyserNode` fed by one media element.
pub struct WebAnalyser {
    source: web::MediaElementAudioSourceNode,
    node: web::AnalyserNode,
}

impl MagnitudeAnalyser for WebAnalyser {
    fn bin_count(&self) -> usize {
        self.node.frequency_bin_count() as usize
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.node.get_byte_frequency_data(out);
    }

    fn disconnect(&mut self) {
        _ = self.source.disconnect();
        _ = self.node.disconnect();
    }
}

/// Owns the page's single `AudioContext`, created on the first user-initiated
/// load so autoplay policies don't leave it suspended.
#[derive(Default)]
pub struct AudioRuntime {
    ctx: Option<web::AudioContext>,
}

impl AudioRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&mut self) -> Result<web::AudioContext, VizError> {
        if let Some(ctx) = &self.ctx {
            return Ok(ctx.clone());
        }
        let ctx = web::AudioContext::new()
            .map_err(|e| VizError::Binding(format!("AudioContext: {:?}", e)))?;
        log::info!("[audio] context sample_rate={}", ctx.sample_rate());
        self.ctx = Some(ctx.clone());
        Ok(ctx)
    }

    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web::AudioContextState::Suspended {
                _ = ctx.resume();
            }
        }
    }

    /// Route `element` through a fresh analyser to the speakers.
    pub fn connect(
        &mut self,
        element: &web::HtmlAudioElement,
    ) -> Result<Box<dyn MagnitudeAnalyser>, VizError> {
        let ctx = self.context()?;
        let source = ctx
            .create_media_element_source(element)
            .map_err(|e| VizError::Binding(format!("media source: {:?}", e)))?;
        let node = ctx
            .create_analyser()
            .map_err(|e| VizError::Binding(format!("analyser: {:?}", e)))?;
        node.set_fft_size(FFT_SIZE as u32);
        node.set_smoothing_time_constant(SMOOTHING_TIME_CONSTANT as f64);
        node.set_min_decibels(MIN_DECIBELS as f64);
        node.set_max_decibels(MAX_DECIBELS as f64);
        source
            .connect_with_audio_node(&node)
            .and_then(|_| node.connect_with_audio_node(&ctx.destination()))
            .map_err(|e| VizError::Binding(format!("connect: {:?}", e)))?;
        self.resume();
        log::info!("[audio] bound analyser bins={}", node.frequency_bin_count());
        Ok(Box::new(WebAnalyser { source, node }))
    }
}
