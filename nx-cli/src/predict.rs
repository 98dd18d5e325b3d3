use crate::engine::TractEngine;
use crate::preprocess::load_surface;
use recognizer::{ConfidenceChart, InferenceAdapter, Prediction};
use std::error::Error;
use std::path::Path;
use tracing::info;

const BAR_WIDTH: usize = 40;

pub fn predict(image: &Path, model: &Path, invert: bool, json: bool) -> Result<(), Box<dyn Error>> {
    let tensor = load_surface(image, invert)?.to_input_tensor()?;

    let mut adapter = InferenceAdapter::new(TractEngine);
    adapter.load(model)?;
    info!("Loaded model {}", model.display());

    let prediction = Prediction::from_scores(adapter.run(&tensor)?)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
    } else {
        println!("Prediction: {}", prediction.label());
        print!("{}", render_chart(&prediction.chart()));
    }

    Ok(())
}

/// Horizontal text version of the confidence bars; the predicted digit is
/// marked with `<`
pub fn render_chart(chart: &ConfidenceChart) -> String {
    let mut out = String::new();
    for bar in chart.bars() {
        let filled = ((bar.percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f32).round() as usize;
        out.push_str(&format!(
            "{} |{}{}| {:>6}{}\n",
            bar.digit,
            "█".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            bar.label(),
            if bar.highlighted { " <" } else { "" }
        ));
    }
    out
}
