//! Digit pad
//!
//! Browser front-end: draw a digit on a canvas, preprocess it in Rust and
//! classify it with an ONNX model through onnxruntime-web.

mod browser;
mod canvas;
mod engine;
mod render;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Set up panic hook for better error messages in WASM
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    browser::init()
}
