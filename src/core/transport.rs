//! Playback state mirrored from the media element.
//!
//! The transport is the single writer of the current AudioSource. The pipeline
//! only reads from it; user input goes through these methods, which clamp the
//! request and hand back the command the media element should execute.

use super::constants::{SEEK_STEP_SEC, VOLUME_STEP};
use super::error::VizError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransportCommand {
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransportState {
    track: Option<String>,
    generation: u64,
    duration: f64,
    position: f64,
    volume: f32,
    playing: bool,
    error: Option<VizError>,
    error_reported: bool,
}

impl Default for TransportState {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportState {
    pub fn new() -> Self {
        Self {
            track: None,
            generation: 0,
            duration: 0.0,
            position: 0.0,
            volume: 1.0,
            playing: false,
            error: None,
            error_reported: false,
        }
    }

    /// Replace the current source. Returns the new generation; anything tied
    /// to an older generation is stale.
    pub fn load(&mut self, name: impl Into<String>) -> u64 {
        self.generation += 1;
        self.track = Some(name.into());
        self.duration = 0.0;
        self.position = 0.0;
        self.playing = false;
        self.error = None;
        self.error_reported = false;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn track(&self) -> Option<&str> {
        self.track.as_deref()
    }

    pub fn has_source(&self) -> bool {
        self.track.is_some() && self.error.is_none()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn volume_percent(&self) -> u32 {
        (self.volume * 100.0).round() as u32
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn error(&self) -> Option<&VizError> {
        self.error.as_ref()
    }

    /// Media metadata arrived. Unknown or streaming durations count as 0.
    pub fn set_duration(&mut self, seconds: f64) {
        self.duration = if seconds.is_finite() && seconds > 0.0 {
            seconds
        } else {
            0.0
        };
        self.position = self.position.min(self.duration);
    }

    pub fn update_position(&mut self, seconds: f64) {
        if seconds.is_finite() {
            self.position = seconds.clamp(0.0, self.duration.max(0.0));
        }
    }

    /// Reflect a play/pause that the media element reported on its own.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing && self.has_source();
    }

    pub fn toggle_play(&mut self) -> Option<TransportCommand> {
        if !self.has_source() {
            return None;
        }
        self.playing = !self.playing;
        Some(if self.playing {
            TransportCommand::Play
        } else {
            TransportCommand::Pause
        })
    }

    /// Non-finite input keeps the current volume.
    pub fn set_volume(&mut self, volume: f32) -> TransportCommand {
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, 1.0);
        }
        TransportCommand::SetVolume(self.volume)
    }

    pub fn nudge_volume(&mut self, steps: f32) -> TransportCommand {
        self.set_volume(self.volume + steps * VOLUME_STEP)
    }

    pub fn seek(&mut self, seconds: f64) -> Option<TransportCommand> {
        if !self.has_source() || !seconds.is_finite() {
            return None;
        }
        self.position = seconds.clamp(0.0, self.duration);
        Some(TransportCommand::Seek(self.position))
    }

    pub fn seek_by(&mut self, steps: f64) -> Option<TransportCommand> {
        self.seek(self.position + steps * SEEK_STEP_SEC)
    }

    /// Record a load-time failure for the current generation. Returns `true`
    /// the first time, so the caller surfaces it to the user exactly once.
    pub fn fail(&mut self, error: VizError) -> bool {
        self.playing = false;
        self.error = Some(error);
        if self.error_reported {
            false
        } else {
            self.error_reported = true;
            true
        }
    }

    pub fn time_readout(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.position),
            format_time(self.duration)
        )
    }
}

/// `m:ss`, truncating fractional seconds.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
