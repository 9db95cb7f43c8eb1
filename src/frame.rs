use crate::constants::*;
use crate::core::input::PendingVariant;
use crate::core::{FrequencySampler, OrbitCamera, SpectrumSource, VariantKind, Visualizer};
use crate::dom;
use crate::render;
use crate::transport::Player;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub source: Rc<RefCell<SpectrumSource>>,
    pub sampler: FrequencySampler,
    pub visualizer: Visualizer,
    pub camera: Rc<RefCell<OrbitCamera>>,
    pub pending_variant: PendingVariant,
    pub player: Player,

    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,

    pub started: Instant,
    pub last_instant: Instant,
    pub frames: u64,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32().min(MAX_FRAME_DT_SEC);
        self.last_instant = now;
        let elapsed = (now - self.started).as_secs_f64();

        if let Some(kind) = self.pending_variant.take() {
            self.switch_variant(kind);
        }

        // One pull per frame; the tick reads only this snapshot
        let mut source = self.source.borrow_mut();
        let frame = self.sampler.pull(&mut source);
        let list = self.visualizer.tick(frame, elapsed);

        let mut camera = self.camera.borrow_mut();
        camera.update(dt_sec);
        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            match g.render(dt_sec, list, &camera) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::warn!("[gpu] surface lost; reconfiguring");
                    g.reconfigure();
                }
                Err(e) => log::error!("[gpu] render error: {:?}", e),
            }
        }
        drop(camera);
        drop(source);

        if self.frames % READOUT_EVERY_FRAMES == 0 {
            self.update_readouts();
        }
        self.frames += 1;
    }

    /// Rebuild visuals and camera for `kind`. The audio binding is untouched.
    pub fn switch_variant(&mut self, kind: VariantKind) {
        if kind == self.visualizer.kind() {
            return;
        }
        let config = kind.config();
        *self.camera.borrow_mut() = OrbitCamera::from_spec(&config.ambient.camera);
        self.visualizer = Visualizer::new(config);
        if let Some(doc) = dom::window_document() {
            dom::set_text(&doc, VARIANT_LABEL_ID, kind.name());
        }
    }

    fn update_readouts(&self) {
        let Some(doc) = dom::window_document() else {
            return;
        };
        let state = self.player.state.borrow();
        dom::set_text(&doc, TIME_LABEL_ID, &state.time_readout());
        dom::set_text(&doc, VOLUME_LABEL_ID, &format!("{}%", state.volume_percent()));
        dom::set_text(&doc, TRACK_LABEL_ID, state.track().unwrap_or("No file"));
        dom::set_text(
            &doc,
            PLAY_BUTTON_ID,
            if state.is_playing() { "Pause" } else { "Play" },
        );
        if let Some(seek) = dom::input_by_id(&doc, SEEK_SLIDER_ID) {
            seek.set_max(&state.duration().to_string());
            // Leave the handle alone while the user drags it
            if !dom::is_focused(&doc, SEEK_SLIDER_ID) {
                seek.set_value_as_number(state.position());
            }
        }
        if let Some(volume) = dom::input_by_id(&doc, VOLUME_SLIDER_ID) {
            volume.set_value_as_number(state.volume() as f64);
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // The surface borrows the canvas for the life of the page
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[gpu] init failed: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
