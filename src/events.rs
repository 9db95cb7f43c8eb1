mod controls;
mod keyboard;
mod pointer;

pub use controls::wire_transport_controls;
pub use keyboard::{wire_global_keydown, KeyTargets};
pub use pointer::wire_camera_controls;
