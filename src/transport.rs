//! Media-element transport: loads user files, executes play/seek/volume
//! commands and mirrors element events back into [`TransportState`].

use crate::audio::AudioRuntime;
use crate::core::{SpectrumSource, TransportCommand, TransportState, VizError};
use crate::dom;
use crate::overlay;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

// HTMLMediaElement error code for an undecodable source
const MEDIA_ERR_SRC_NOT_SUPPORTED: u16 = 4;

struct LoadedMedia {
    element: web::HtmlAudioElement,
    object_url: String,
    listeners: Vec<(&'static str, Closure<dyn FnMut()>)>,
}

impl LoadedMedia {
    /// Stop playback, detach listeners and release the object URL.
    fn release(self) {
        _ = self.element.pause();
        for (event, closure) in &self.listeners {
            _ = self
                .element
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        _ = self.element.remove_attribute("src");
        _ = web::Url::revoke_object_url(&self.object_url);
        log::info!("[transport] released {}", self.object_url);
    }
}

/// Cheap-to-clone handle shared by the controls, the keyboard and the frame loop.
#[derive(Clone)]
pub struct Player {
    pub state: Rc<RefCell<TransportState>>,
    pub source: Rc<RefCell<SpectrumSource>>,
    audio: Rc<RefCell<AudioRuntime>>,
    media: Rc<RefCell<Option<LoadedMedia>>>,
}

impl Player {
    pub fn new(source: Rc<RefCell<SpectrumSource>>) -> Self {
        Self {
            state: Rc::new(RefCell::new(TransportState::new())),
            source,
            audio: Rc::new(RefCell::new(AudioRuntime::new())),
            media: Rc::new(RefCell::new(None)),
        }
    }

    /// Replace the current source with `file`. The previous analysis binding is
    /// torn down before the new element exists.
    pub fn load_file(&self, file: &web::File) -> anyhow::Result<()> {
        self.source.borrow_mut().unbind();
        if let Some(previous) = self.media.borrow_mut().take() {
            previous.release();
        }

        let url = web::Url::create_object_url_with_blob(file)
            .map_err(|e| anyhow::anyhow!("createObjectURL: {:?}", e))?;
        let element = web::HtmlAudioElement::new_with_src(&url)
            .map_err(|e| anyhow::anyhow!("Audio element: {:?}", e))?;
        let name = file.name();
        let generation = self.state.borrow_mut().load(name.clone());
        log::info!("[transport] loaded {:?} generation={}", name, generation);
        if let Some(doc) = dom::window_document() {
            overlay::clear_status(&doc);
        }

        let listeners = self.wire_media_events(&element, generation);
        element.set_volume(self.state.borrow().volume() as f64);

        let audio = self.audio.clone();
        let bound = self
            .source
            .borrow_mut()
            .bind_with(|| audio.borrow_mut().connect(&element));
        *self.media.borrow_mut() = Some(LoadedMedia {
            element,
            object_url: url,
            listeners,
        });
        // Loaded paused; playback starts from the play control or the keyboard
        if let Err(e) = bound {
            self.report_failure(generation, e);
        }
        Ok(())
    }

    fn wire_media_events(
        &self,
        element: &web::HtmlAudioElement,
        generation: u64,
    ) -> Vec<(&'static str, Closure<dyn FnMut()>)> {
        let mut listeners: Vec<(&'static str, Closure<dyn FnMut()>)> = Vec::new();
        let mut on = |event: &'static str, handler: Box<dyn FnMut()>| {
            let closure = Closure::wrap(handler);
            _ = element.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            listeners.push((event, closure));
        };

        let (player, el) = (self.clone(), element.clone());
        on(
            "loadedmetadata",
            Box::new(move || {
                if player.is_current(generation) {
                    player.state.borrow_mut().set_duration(el.duration());
                }
            }),
        );
        let (player, el) = (self.clone(), element.clone());
        on(
            "timeupdate",
            Box::new(move || {
                if player.is_current(generation) {
                    player.state.borrow_mut().update_position(el.current_time());
                }
            }),
        );
        let player = self.clone();
        on(
            "play",
            Box::new(move || {
                if player.is_current(generation) {
                    player.state.borrow_mut().set_playing(true);
                }
            }),
        );
        for event in ["pause", "ended"] {
            let player = self.clone();
            on(
                event,
                Box::new(move || {
                    if player.is_current(generation) {
                        player.state.borrow_mut().set_playing(false);
                    }
                }),
            );
        }
        let (player, el) = (self.clone(), element.clone());
        on(
            "error",
            Box::new(move || {
                let code = el.error().map(|e| e.code()).unwrap_or(0);
                let name = player.state.borrow().track().unwrap_or("").to_string();
                let err = if code == MEDIA_ERR_SRC_NOT_SUPPORTED {
                    VizError::UnsupportedFormat(name)
                } else {
                    VizError::Binding(format!("media error code {}", code))
                };
                player.report_failure(generation, err);
            }),
        );
        listeners
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.borrow().generation() == generation
    }

    /// Fail the source for `generation`; the user sees the message once.
    fn report_failure(&self, generation: u64, err: VizError) {
        if !self.is_current(generation) {
            return;
        }
        log::error!("[transport] {}", err);
        let message = err.to_string();
        let first = self.state.borrow_mut().fail(err);
        self.source.borrow_mut().fail();
        if first {
            if let Some(doc) = dom::window_document() {
                overlay::report(&doc, &message);
            }
        }
    }

    pub fn execute(&self, command: TransportCommand) {
        let media = self.media.borrow();
        let Some(media) = media.as_ref() else {
            return;
        };
        let el = &media.element;
        match command {
            TransportCommand::Play => {
                self.audio.borrow().resume();
                _ = el.play();
            }
            TransportCommand::Pause => {
                _ = el.pause();
            }
            TransportCommand::Seek(seconds) => el.set_current_time(seconds),
            TransportCommand::SetVolume(volume) => el.set_volume(volume as f64),
        }
        log::debug!("[transport] {:?}", command);
    }

    pub fn toggle_play(&self) {
        let command = self.state.borrow_mut().toggle_play();
        if let Some(c) = command {
            self.execute(c);
        }
    }

    pub fn seek_to(&self, seconds: f64) {
        let command = self.state.borrow_mut().seek(seconds);
        if let Some(c) = command {
            self.execute(c);
        }
    }

    pub fn seek_by(&self, steps: f64) {
        let command = self.state.borrow_mut().seek_by(steps);
        if let Some(c) = command {
            self.execute(c);
        }
    }

    pub fn set_volume(&self, volume: f32) {
        let command = self.state.borrow_mut().set_volume(volume);
        self.execute(command);
    }

    pub fn nudge_volume(&self, steps: f32) {
        let command = self.state.borrow_mut().nudge_volume(steps);
        self.execute(command);
    }
}
