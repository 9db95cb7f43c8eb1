use crate::constants::{CANVAS_ID, VARIANT_LABEL_ID, VARIANT_QUERY_KEY};
use crate::core::constants::BIN_COUNT;
use crate::core::input::PendingVariant;
use crate::core::{FrequencySampler, OrbitCamera, SpectrumSource, VariantKind, Visualizer};
use crate::transport::Player;
use crate::{dom, events, frame, overlay};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

/// Startup variant from `?variant=`; unknown names fall back to the default.
fn startup_variant() -> VariantKind {
    match dom::query_param(VARIANT_QUERY_KEY) {
        Some(name) => VariantKind::from_name(&name).unwrap_or_else(|e| {
            log::warn!("[app] {}; using {}", e, VariantKind::default());
            VariantKind::default()
        }),
        None => VariantKind::default(),
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("audioviz-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("[app] init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let kind = startup_variant();
    let config = kind.config();
    let camera = Rc::new(RefCell::new(OrbitCamera::from_spec(&config.ambient.camera)));
    let visualizer = Visualizer::new(config);
    dom::set_text(&document, VARIANT_LABEL_ID, kind.name());

    // Nothing is bound until the user picks a file; frames are silent until then
    let source = Rc::new(RefCell::new(SpectrumSource::new(BIN_COUNT)));
    let player = Player::new(source.clone());
    let pending_variant = PendingVariant::default();

    events::wire_transport_controls(&document, &player);
    events::wire_global_keydown(events::KeyTargets {
        player: player.clone(),
        pending_variant: pending_variant.clone(),
        canvas: canvas.clone(),
    });
    events::wire_camera_controls(&canvas, camera.clone());
    overlay::show(&document);

    let gpu = frame::init_gpu(&canvas).await;
    if gpu.is_none() {
        overlay::report(&document, "WebGPU is not available in this browser.");
    }

    let now = Instant::now();
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        source,
        sampler: FrequencySampler::new(BIN_COUNT),
        visualizer,
        camera,
        pending_variant,
        player,
        canvas,
        gpu,
        started: now,
        last_instant: now,
        frames: 0,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
