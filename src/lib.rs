//! Shooting gallery core crate.
//!
//! Laptops launch from the bottom of the screen and arc across it; the player shoots
//! them with mouse, touch or the space bar. Hits burst into a short particle
//! explosion, every shot, hit and miss gets a synthesized sound, and two counters
//! track the score.
//!
//! All gameplay lives in [`gallery`] and is plain Rust: it draws through the
//! [`render::Surface`] trait and plays sounds through [`audio::Sfx`], so it runs
//! under native tests. The browser entry points below hand a canvas, the Web Audio
//! context and DOM events to it.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod config;
pub mod error;
pub mod gallery;
pub mod render;
mod web;

pub use config::GalleryConfig;
pub use error::{AudioError, GalleryError};
pub use gallery::{Gallery, Point, Shot, Viewport};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    console_log::init_with_level(log::Level::Info).ok();
}

// -----------------------------------------------------------------------------
// Browser entrypoints
// -----------------------------------------------------------------------------

/// Start the gallery on the current page with default settings.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start(GalleryConfig::default()).map_err(JsValue::from)
}

/// Start with a JSON config object; omitted fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GalleryConfig::from_json(json)?;
    web::start(config).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn restart_game() {
    web::restart();
}

#[wasm_bindgen]
pub fn stop_game() {
    web::stop();
}

/// Current hit count, 0 when no game is running.
#[wasm_bindgen]
pub fn hit_count() -> u32 {
    web::scores().map(|(hits, _)| hits).unwrap_or(0)
}

/// Current miss count, 0 when no game is running.
#[wasm_bindgen]
pub fn miss_count() -> u32 {
    web::scores().map(|(_, misses)| misses).unwrap_or(0)
}
