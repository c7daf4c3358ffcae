// ==================== Imports ====================
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

#[macro_use]
mod browser;
pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod scroll;
pub mod sprite;
pub mod world;

use config::SceneConfig;
use engine::GameLoop;
use game::ScrollWalk;

// ==================== Main Functions ====================
/// Main entry for Webassembly module, default scene
/// - 800x600 view over a 2000x2000 world on `#app`
/// - scroll range 0 -> +=2000
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    start(SceneConfig::default())
}

/// Same as `main_js`, with any subset of `SceneConfig` fields overridden
/// from a plain JS object
#[wasm_bindgen]
pub fn start_with_config(config: JsValue) -> Result<(), JsValue> {
    let config: SceneConfig = if config.is_undefined() || config.is_null() {
        SceneConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };
    start(config)
}

fn start(config: SceneConfig) -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    let canvas = browser::canvas(&config.canvas).map_err(|err| JsValue::from_str(&format!("{:#}", err)))?;
    canvas.set_width(config.view.width as u32);
    canvas.set_height(config.view.height as u32);

    let scene = ScrollWalk::new(config)
        .init()
        .map_err(|err| JsValue::from_str(&format!("{:#}", err)))?;

    // spawns a new asynchronous task in local thread, for web assembly
    // environment, using wasm_bindgen_futures
    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(scene, canvas).await {
            error!("Could not start scene : {:#}", err);
        }
    });

    Ok(())
}
