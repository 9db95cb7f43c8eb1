//! Page contract and interaction tuning for the browser front-end.
// Element ids the page must provide; controls other than the canvas are optional
pub const CANVAS_ID: &str = "app-canvas";
pub const OVERLAY_ID: &str = "overlay";
pub const STATUS_ID: &str = "overlay-status";
pub const FILE_INPUT_ID: &str = "audio-file";
pub const PLAY_BUTTON_ID: &str = "play-pause";
pub const VOLUME_SLIDER_ID: &str = "volume";
pub const VOLUME_LABEL_ID: &str = "volume-label";
pub const SEEK_SLIDER_ID: &str = "seek";
pub const TIME_LABEL_ID: &str = "time-label";
pub const TRACK_LABEL_ID: &str = "track-name";
pub const VARIANT_LABEL_ID: &str = "variant-name";

// Query parameter naming the startup variant
pub const VARIANT_QUERY_KEY: &str = "variant";

// Pointer orbit and wheel zoom
pub const ORBIT_RADIANS_PER_PX: f32 = 0.005;
pub const WHEEL_ZOOM_PER_DELTA: f32 = 0.001;

// Frame
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
// DOM readouts are refreshed every N frames
pub const READOUT_EVERY_FRAMES: u64 = 10;
