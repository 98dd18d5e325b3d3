//! onnxruntime-web binding
//!
//! The runtime is loaded by the page as the global `ort`. It is reached
//! through reflection so the wasm module has no link-time dependency on it;
//! a page without the script fails the model load with a readable error
//! instead of failing to instantiate.

use js_sys::{Array, Float32Array, Function, Object, Promise, Reflect};
use recognizer::{InputTensor, ScoreVector};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// Model output holding the per-class scores
const OUTPUT_NAME: &str = "output";

/// A loaded `ort.InferenceSession`
#[derive(Clone, Debug)]
pub struct OrtSession {
    inner: JsValue,
}

impl OrtSession {
    /// `await ort.InferenceSession.create(modelPath)`
    pub async fn create(model_path: &str) -> Result<Self, JsValue> {
        let class = Reflect::get(&ort()?, &"InferenceSession".into())?;
        let create: Function = Reflect::get(&class, &"create".into())?.dyn_into()?;
        let promise: Promise = create
            .call1(&class, &JsValue::from_str(model_path))?
            .dyn_into()?;
        let inner = JsFuture::from(promise).await?;
        Ok(Self { inner })
    }

    /// `await session.run({ input: tensor })`, returning `output.data`
    pub async fn run(&self, input: &InputTensor) -> Result<ScoreVector, JsValue> {
        let feeds = Object::new();
        Reflect::set(&feeds, &InputTensor::NAME.into(), &to_ort_tensor(input)?)?;

        let run: Function = Reflect::get(&self.inner, &"run".into())?.dyn_into()?;
        let promise: Promise = run.call1(&self.inner, &feeds)?.dyn_into()?;
        let outputs = JsFuture::from(promise).await?;

        let output = Reflect::get(&outputs, &OUTPUT_NAME.into())?;
        if output.is_undefined() {
            return Err(format!("model has no output named '{}'", OUTPUT_NAME).into());
        }
        let data: Float32Array = Reflect::get(&output, &"data".into())?.dyn_into()?;
        Ok(ScoreVector::new(data.to_vec()))
    }
}

/// `new ort.Tensor('float32', data, [1, 1, 28, 28])`
fn to_ort_tensor(input: &InputTensor) -> Result<JsValue, JsValue> {
    let class: Function = Reflect::get(&ort()?, &"Tensor".into())?.dyn_into()?;
    let data = Float32Array::from(input.as_slice());
    let dims: Array = InputTensor::SHAPE
        .iter()
        .map(|&d| JsValue::from_f64(d as f64))
        .collect();
    Reflect::construct(&class, &Array::of3(&"float32".into(), &data, &dims))
}

fn ort() -> Result<JsValue, JsValue> {
    let ort = Reflect::get(&js_sys::global(), &"ort".into())?;
    if ort.is_undefined() {
        return Err("onnxruntime-web is not loaded (no global `ort`)".into());
    }
    Ok(ort)
}

/// Best-effort message for a JS exception
pub fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(test)]
mod tests {
    const INDEX_HTML: &str = include_str!("../www/index.html");

    #[test]
    fn test_page_pins_runtime_version() {
        assert!(INDEX_HTML.contains("npm/onnxruntime-web@1.17.3/dist/ort.min.js"));
        assert!(!INDEX_HTML.contains("npm/onnxruntime-web/"));
    }
}
