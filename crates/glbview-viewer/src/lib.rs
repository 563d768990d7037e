//! glbview Viewer - Browser glTF viewer with an AR toggle
//!
//! Loads one binary glTF model into a bevy scene, exposes a small egui debug
//! panel, and lets the user enter or leave an immersive WebXR AR session from
//! a page button.
//!
//! The AR session is shared with the bevy app, which reacts to it (transparent
//! clear, hidden overlay) but still renders to the page canvas: frames are not
//! submitted to an XR layer.

mod app;
mod page;
mod xr;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // bevy's LogPlugin is disabled in app::run so this stays the only subscriber
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );

    let config = page::load_config();

    // The button must exist before the app takes over the event loop
    let session = xr::install_ar_button(&config.ar_button_id)?;

    // Run the Bevy app
    app::run(config, session);
    Ok(())
}
