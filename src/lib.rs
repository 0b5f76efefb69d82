//! Custom cursor-following effect for web pages.
//!
//! A visual element tracks the pointer: moves are recorded immediately and
//! painted at most once per animation frame, centering the element on the
//! pointer. Appearance and motion feel come from [`CursorConfig`]; the
//! element's style is exposed as a memoized [`StyleDescriptor`].
//!
//! - `follower`: the tracking algorithm and its start/stop lifecycle
//! - `host`: traits for the scheduler, pointer source and target element
//! - `web`: browser implementations and the JS-facing `CursorEffect`

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod follower;
pub mod host;
pub mod position;
pub mod style;
pub mod web;

pub use config::{CursorConfig, CursorShape};
pub use error::{CursorError, CursorResult};
pub use follower::{CoalescePolicy, CursorFollower};
pub use host::{CursorRef, CursorTarget, FrameScheduler, PointerSource};
pub use position::PointerPosition;
pub use style::{compute_styles, StyleDescriptor, StyleMemo};
pub use web::CursorEffect;

/// Initialize panic hook and logging for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("[Cursor] WASM module initialized");
}
