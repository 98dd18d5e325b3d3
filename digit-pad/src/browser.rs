use crate::canvas::Canvas2dSurface;
use crate::engine::{describe, OrtSession};
use crate::render::{show_confidences, show_prediction, BARS_ID, PREDICTION_ID};
use recognizer::{
    DigitPad, InputTensor, ModelState, PadConfig, Point, PointerInput, RecognizerError,
    LABEL_PLACEHOLDER,
};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, HtmlButtonElement, HtmlCanvasElement, MouseEvent, TouchEvent};

const CANVAS_ID: &str = "drawing-canvas";
const PREDICT_BTN_ID: &str = "predict-btn";
const CLEAR_BTN_ID: &str = "clear-btn";
const CONFIG_ID: &str = "pad-config";

/// Either one ends the current stroke
const TOUCH_END_EVENTS: [&str; 2] = ["touchend", "touchcancel"];

const TEXT_COLOR: &str = "#222";
const BUTTON_COLOR: &str = "#2196F3";

struct App {
    pad: DigitPad<Canvas2dSurface>,
    model: ModelState<OrtSession>,
    config: PadConfig,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Run `f` against the app state. Never hold the borrow across an await.
fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|app| app.borrow_mut().as_mut().map(f))
}

pub fn init() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let (config, config_error) = config_or_default(config_text(&document));
    let canvas = setup_ui(&document, &config)?;
    let surface = Canvas2dSurface::new(canvas.clone(), &config)?;

    APP.with(|app| {
        *app.borrow_mut() = Some(App {
            pad: DigitPad::new(surface, config.stroke_width),
            model: ModelState::default(),
            config: config.clone(),
        });
    });

    setup_handlers(&document, &canvas)?;
    render_result(&document)?;
    if let Some(e) = config_error {
        report_error(&e);
    }
    load_model_async(document, config.model_path);

    Ok(())
}

/// Optional `<script id="pad-config" type="application/json">` overrides
fn config_text(document: &Document) -> Option<String> {
    document
        .get_element_by_id(CONFIG_ID)
        .map(|element| element.text_content().unwrap_or_default())
}

/// A broken override block still brings the page up, on the defaults
fn config_or_default(json: Option<String>) -> (PadConfig, Option<RecognizerError>) {
    match json.as_deref().map(PadConfig::from_json) {
        None => (PadConfig::default(), None),
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (PadConfig::default(), Some(e)),
    }
}

fn setup_ui(document: &Document, config: &PadConfig) -> Result<HtmlCanvasElement, JsValue> {
    let body = document.body().ok_or("no body")?;
    body.set_attribute(
        "style",
        &format!(
            "margin: 0; font-family: sans-serif; color: {}; \
             display: flex; flex-direction: column; align-items: center; gap: 12px; \
             padding: 20px;",
            TEXT_COLOR
        ),
    )?;

    let title = document.create_element("h1")?;
    title.set_text_content(Some("Handwritten digit recognition"));
    body.append_child(&title)?;

    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.set_id(CANVAS_ID);
    canvas.set_width(config.canvas_size);
    canvas.set_height(config.canvas_size);
    canvas.set_attribute(
        "style",
        "border: 2px solid #333; border-radius: 4px; cursor: crosshair; touch-action: none;",
    )?;
    body.append_child(&canvas)?;

    let buttons = document.create_element("div")?;
    buttons.set_attribute("style", "display: flex; gap: 10px;")?;
    let predict_btn = create_button(document, PREDICT_BTN_ID, "Predict")?;
    buttons.append_child(&predict_btn)?;
    let clear_btn = create_button(document, CLEAR_BTN_ID, "Clear")?;
    buttons.append_child(&clear_btn)?;
    body.append_child(&buttons)?;

    let result = document.create_element("div")?;
    result.set_attribute("style", "font-size: 20px;")?;
    result.set_text_content(Some("Prediction: "));
    let prediction = document.create_element("span")?;
    prediction.set_id(PREDICTION_ID);
    prediction.set_attribute("style", "font-size: 40px; font-weight: bold;")?;
    prediction.set_text_content(Some(LABEL_PLACEHOLDER));
    result.append_child(&prediction)?;
    body.append_child(&result)?;

    let bars = document.create_element("div")?;
    bars.set_id(BARS_ID);
    bars.set_class_name("confidence-bars");
    bars.set_attribute(
        "style",
        "display: flex; align-items: flex-end; gap: 6px; height: 180px; width: 360px;",
    )?;
    body.append_child(&bars)?;

    Ok(canvas)
}

fn create_button(document: &Document, id: &str, text: &str) -> Result<HtmlButtonElement, JsValue> {
    let button = document
        .create_element("button")?
        .dyn_into::<HtmlButtonElement>()?;
    button.set_id(id);
    button.set_text_content(Some(text));

    let style = button.style();
    style.set_property("padding", "10px 24px")?;
    style.set_property("background", BUTTON_COLOR)?;
    style.set_property("color", "white")?;
    style.set_property("border", "none")?;
    style.set_property("border-radius", "4px")?;
    style.set_property("font-size", "16px")?;
    style.set_property("cursor", "pointer")?;

    Ok(button)
}

fn setup_handlers(document: &Document, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    // Mouse
    listen_mouse(canvas, "mousedown", |event| {
        dispatch_at(PointerInput::Down, event.client_x(), event.client_y());
    })?;
    listen_mouse(canvas, "mousemove", |event| {
        dispatch_at(PointerInput::Move, event.client_x(), event.client_y());
    })?;
    listen_mouse(canvas, "mouseup", |_| dispatch(PointerInput::Up))?;
    listen_mouse(canvas, "mouseout", |_| dispatch(PointerInput::Leave))?;

    // Touch: first finger only, and keep the page from scrolling or zooming
    listen_touch(canvas, "touchstart", |event| {
        event.prevent_default();
        if let Some(touch) = event.touches().get(0) {
            dispatch_at(PointerInput::Down, touch.client_x(), touch.client_y());
        }
    })?;
    listen_touch(canvas, "touchmove", |event| {
        event.prevent_default();
        if let Some(touch) = event.touches().get(0) {
            dispatch_at(PointerInput::Move, touch.client_x(), touch.client_y());
        }
    })?;
    for name in TOUCH_END_EVENTS {
        listen_touch(canvas, name, |_| dispatch(PointerInput::Up))?;
    }

    // Buttons
    let predict_btn = document
        .get_element_by_id(PREDICT_BTN_ID)
        .ok_or("no predict button")?;
    let doc_clone = document.clone();
    let predict_closure = Closure::wrap(Box::new(move |_event: Event| {
        predict(doc_clone.clone());
    }) as Box<dyn Fn(Event)>);
    predict_btn.add_event_listener_with_callback("click", predict_closure.as_ref().unchecked_ref())?;
    predict_closure.forget();

    let clear_btn = document
        .get_element_by_id(CLEAR_BTN_ID)
        .ok_or("no clear button")?;
    let doc_clone = document.clone();
    let clear_closure = Closure::wrap(Box::new(move |_event: Event| {
        with_app(|app| app.pad.clear());
        let _ = render_result(&doc_clone);
    }) as Box<dyn Fn(Event)>);
    clear_btn.add_event_listener_with_callback("click", clear_closure.as_ref().unchecked_ref())?;
    clear_closure.forget();

    Ok(())
}

fn listen_mouse(
    canvas: &HtmlCanvasElement,
    name: &str,
    handler: impl Fn(MouseEvent) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn Fn(MouseEvent)>);
    canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn listen_touch(
    canvas: &HtmlCanvasElement,
    name: &str,
    handler: impl Fn(TouchEvent) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn Fn(TouchEvent)>);
    canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn dispatch(input: PointerInput) {
    with_app(|app| app.pad.handle(input));
}

fn dispatch_at(make: fn(Point) -> PointerInput, client_x: i32, client_y: i32) {
    with_app(|app| {
        let point = app
            .pad
            .surface()
            .to_canvas_point(client_x as f64, client_y as f64);
        app.pad.handle(make(point));
    });
}

fn load_model_async(document: Document, model_path: String) {
    if let Some(Err(e)) = with_app(|app| app.model.begin_load()) {
        report_error(&e);
        return;
    }
    let _ = update_predict_button(&document);
    log(&format!("Loading model from {}", model_path));

    spawn_local(async move {
        let result = OrtSession::create(&model_path)
            .await
            .map_err(|e| describe(&e));

        match with_app(|app| app.model.finish_load(result)) {
            Some(Ok(())) => log("Model loaded"),
            Some(Err(e)) => report_error(&e),
            None => {}
        }
        let _ = update_predict_button(&document);
    });
}

/// Read the canvas, then run the model without holding the app borrow
fn predict(document: Document) {
    let started = with_app(|app| -> Result<(OrtSession, InputTensor), RecognizerError> {
        let session = app.model.session()?.clone();
        if app.pad.is_pending() {
            return Err(RecognizerError::PredictionPending);
        }
        let tensor = app.pad.surface().snapshot()?.to_input_tensor()?;
        app.pad.begin_prediction()?;
        Ok((session, tensor))
    });

    let (session, tensor) = match started {
        Some(Ok(started)) => started,
        Some(Err(e)) => {
            report_error(&e);
            return;
        }
        None => return,
    };
    let _ = update_predict_button(&document);

    spawn_local(async move {
        let scores = session
            .run(&tensor)
            .await
            .map_err(|e| RecognizerError::Inference(describe(&e)));

        let finished = with_app(|app| {
            app.pad
                .finish_prediction(scores)
                .map(|p| p.map(|p| p.label()))
        });
        match finished {
            Some(Ok(Some(label))) => log(&format!("Predicted {}", label)),
            Some(Ok(None)) => log("Canvas cleared during prediction, result dropped"),
            Some(Err(e)) => report_error(&e),
            None => {}
        }
        let _ = render_result(&document);
        let _ = update_predict_button(&document);
    });
}

fn render_result(document: &Document) -> Result<(), JsValue> {
    let Some((label, chart, config)) =
        with_app(|app| (app.pad.label_text(), app.pad.chart(), app.config.clone()))
    else {
        return Ok(());
    };
    show_prediction(document, &label)?;
    show_confidences(document, &chart, &config)
}

/// Predict is usable only with a loaded model and no request in flight
fn update_predict_button(document: &Document) -> Result<(), JsValue> {
    let button = document
        .get_element_by_id(PREDICT_BTN_ID)
        .ok_or("no predict button")?
        .dyn_into::<HtmlButtonElement>()?;

    let (enabled, status) = with_app(|app| {
        (
            app.model.is_ready() && !app.pad.is_pending(),
            app.model.status(),
        )
    })
    .unwrap_or((false, "not loaded"));

    button.set_disabled(!enabled);
    button.set_title(&format!("Model {}", status));
    button
        .style()
        .set_property("opacity", if enabled { "1" } else { "0.5" })?;
    Ok(())
}

fn report_error(error: &RecognizerError) {
    if error.is_usage_error() {
        log(&error.to_string());
    } else {
        web_sys::console::error_1(&JsValue::from_str(&error.to_string()));
    }
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(&error.to_string());
    }
}

/// Log to browser console
fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_block_uses_defaults() {
        let (config, error) = config_or_default(None);
        assert_eq!(config.canvas_size, PadConfig::default().canvas_size);
        assert!(error.is_none());
    }

    #[test]
    fn test_config_block_overrides() {
        let (config, error) =
            config_or_default(Some(r#"{ "model_path": "models/digits.onnx" }"#.to_string()));
        assert_eq!(config.model_path, "models/digits.onnx");
        assert!(error.is_none());
    }

    #[test]
    fn test_invalid_config_block_falls_back_to_defaults() {
        let (config, error) = config_or_default(Some("{ not json".to_string()));
        assert_eq!(config.model_path, PadConfig::default().model_path);
        assert_eq!(config.canvas_size, 280);
        assert!(matches!(error, Some(RecognizerError::InvalidConfig(_))));
        assert!(!error.unwrap().is_usage_error());

        let (config, error) = config_or_default(Some(r#"{ "canvas_size": 0 }"#.to_string()));
        assert_eq!(config.canvas_size, 280);
        assert!(matches!(error, Some(RecognizerError::InvalidConfig(_))));
    }

    #[test]
    fn test_cancelled_touch_ends_stroke() {
        assert!(TOUCH_END_EVENTS.contains(&"touchend"));
        assert!(TOUCH_END_EVENTS.contains(&"touchcancel"));
    }
}
