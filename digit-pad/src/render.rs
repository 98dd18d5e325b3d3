use recognizer::{ConfidenceBar, ConfidenceChart, PadConfig};
use wasm_bindgen::prelude::*;
use web_sys::Document;

pub const PREDICTION_ID: &str = "prediction";
pub const BARS_ID: &str = "confidence-bars";

/// Show the predicted digit, or the placeholder
pub fn show_prediction(document: &Document, text: &str) -> Result<(), JsValue> {
    let label = document
        .get_element_by_id(PREDICTION_ID)
        .ok_or("no prediction element")?;
    label.set_text_content(Some(text));
    Ok(())
}

/// Rebuild the bar chart; an empty chart leaves the container empty
pub fn show_confidences(
    document: &Document,
    chart: &ConfidenceChart,
    config: &PadConfig,
) -> Result<(), JsValue> {
    let container = document
        .get_element_by_id(BARS_ID)
        .ok_or("no confidence bars container")?;
    container.set_inner_html("");

    for bar in chart.bars() {
        let column = document.create_element("div")?;
        column.set_attribute(
            "style",
            "display: flex; flex-direction: column; align-items: center; \
             justify-content: flex-end; height: 100%; flex: 1;",
        )?;

        let value = document.create_element("div")?;
        value.set_class_name("confidence-value");
        value.set_attribute("style", "font-size: 11px; color: #555;")?;
        value.set_text_content(Some(&bar.label()));

        let fill = document.create_element("div")?;
        fill.set_class_name("confidence-bar");
        fill.set_attribute("style", &bar_style(bar, config))?;

        let digit = document.create_element("div")?;
        digit.set_class_name("confidence-bar-label");
        digit.set_attribute("style", "font-size: 14px; font-weight: 600;")?;
        digit.set_text_content(Some(&bar.digit.to_string()));

        column.append_child(&value)?;
        column.append_child(&fill)?;
        column.append_child(&digit)?;
        container.append_child(&column)?;
    }

    Ok(())
}

fn bar_style(bar: &ConfidenceBar, config: &PadConfig) -> String {
    format!(
        "width: 24px; height: {}; background-color: {}; border-radius: 3px 3px 0 0;",
        bar.height(),
        config.color_for(bar.highlighted)
    )
}
