//! Browser-only checks, run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use scroll_walk::config::SceneConfig;
use scroll_walk::engine::gradient::Gradient;
use scroll_walk::engine::Game;
use scroll_walk::error::SceneError;
use scroll_walk::game::ScrollWalk;
use scroll_walk::scroll::Ease;
use scroll_walk::sprite::state::CharacterState;
use scroll_walk::sprite::Sheet;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const SHEET_JSON: &str = r#"{
    "frames": {
        "stand_0.png": { "frame": {"x":0,"y":0,"w":40,"h":60}, "rotated": false, "trimmed": false },
        "walk_0.png":  { "frame": {"x":40,"y":0,"w":50,"h":64}, "rotated": false, "trimmed": false }
    },
    "animations": { "stand1": ["stand_0.png"], "walk1": ["walk_0.png"] },
    "meta": { "image": "testsprite.png", "format": "RGBA8888", "scale": "1" }
}"#;

#[wasm_bindgen_test]
fn sprite_sheet_decodes_from_texture_packer_json() {
    let value = js_sys::JSON::parse(SHEET_JSON).unwrap();
    let sheet: Sheet = serde_wasm_bindgen::from_value(value).unwrap();

    let walk = sheet.animation("walk1").unwrap();
    assert_eq!(walk.len(), 1);
    assert_eq!(walk[0].size.width, 50.0);
    assert_eq!(
        sheet.image_path("/assets/character/testsprite.json"),
        "/assets/character/testsprite.png"
    );
}

#[wasm_bindgen_test]
fn partial_config_keeps_defaults() {
    let value = js_sys::JSON::parse(r#"{ "floor_height": 80, "ease": "linear" }"#).unwrap();
    let config: SceneConfig = serde_wasm_bindgen::from_value(value).unwrap();

    assert_eq!(config.floor_height, 80.0);
    assert_eq!(config.ease, Ease::Linear);
    assert_eq!(config.sprite_sheet, "/assets/character/testsprite.json");
    assert_eq!(config.view.width, 800.0);
}

#[wasm_bindgen_test]
fn partial_actions_merge_over_defaults() {
    let value = js_sys::JSON::parse(r#"{ "actions": { "walk1": { "delay": 100 } } }"#).unwrap();
    let config: SceneConfig = serde_wasm_bindgen::from_value(value).unwrap();

    assert_eq!(config.actions.action(CharacterState::Walk1).delay, 100.0);
    assert_eq!(config.actions.action(CharacterState::Stand1).delay, 500.0);
}

#[wasm_bindgen_test]
async fn missing_sprite_sheet_is_an_asset_load_error() {
    let scene = ScrollWalk::new(SceneConfig {
        sprite_sheet: "/missing.json".into(),
        ..SceneConfig::default()
    })
    .init()
    .unwrap();

    let err = match scene.initialize().await {
        Ok(_) => panic!("a missing sheet must not load"),
        Err(err) => err,
    };
    match err.downcast_ref::<SceneError>() {
        Some(SceneError::AssetLoad { path, .. }) => assert_eq!(path, "/missing.json"),
        other => panic!("expected AssetLoad, got {:?}", other),
    }
}

#[wasm_bindgen_test]
fn gradient_texture_is_one_pixel_tall() {
    let canvas = Gradient::floor().texture(256).unwrap();
    assert_eq!(canvas.width(), 256);
    assert_eq!(canvas.height(), 1);
}
