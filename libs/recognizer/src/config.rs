//! Digit pad configuration

use serde::{Deserialize, Serialize};

use crate::RecognizerError;

/// Settings for the drawing pad and its model.
///
/// The normalization statistics are deliberately absent: they belong to the
/// trained model, see `preprocess::MNIST_MEAN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    /// Model artifact path, relative to the page
    pub model_path: String,
    /// Side length of the square drawing canvas in pixels
    pub canvas_size: u32,
    /// Stroke width in canvas pixels
    pub stroke_width: f64,
    /// Canvas background (CSS color)
    pub background: String,
    /// Stroke color (CSS color)
    pub ink: String,
    /// Color of the non-predicted confidence bars
    pub bar_color: String,
    /// Color of the predicted digit's bar
    pub highlight_color: String,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            model_path: "mnist_model.onnx".to_string(),
            canvas_size: 280,
            stroke_width: 15.0,
            background: "black".to_string(),
            ink: "white".to_string(),
            bar_color: "#2196F3".to_string(),
            highlight_color: "#4CAF50".to_string(),
        }
    }
}

impl PadConfig {
    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, RecognizerError> {
        let config: PadConfig =
            serde_json::from_str(json).map_err(|e| RecognizerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RecognizerError> {
        if self.canvas_size == 0 {
            return Err(RecognizerError::InvalidConfig(
                "canvas_size must be positive".to_string(),
            ));
        }
        if !(self.stroke_width > 0.0) {
            return Err(RecognizerError::InvalidConfig(format!(
                "stroke_width must be positive, got {}",
                self.stroke_width
            )));
        }
        if self.model_path.trim().is_empty() {
            return Err(RecognizerError::InvalidConfig(
                "model_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn color_for(&self, highlighted: bool) -> &str {
        if highlighted {
            &self.highlight_color
        } else {
            &self.bar_color
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PadConfig::default();
        assert_eq!(config.model_path, "mnist_model.onnx");
        assert_eq!(config.canvas_size, 280);
        assert_eq!(config.stroke_width, 15.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PadConfig::from_json(r#"{"model_path": "../mnist_model.onnx"}"#).unwrap();
        assert_eq!(config.model_path, "../mnist_model.onnx");
        assert_eq!(config.canvas_size, 280);
        assert_eq!(config.highlight_color, "#4CAF50");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = PadConfig::from_json(r#"{"canvas_size": 0}"#).unwrap_err();
        assert!(matches!(err, RecognizerError::InvalidConfig(_)));

        let err = PadConfig::from_json(r#"{"stroke_width": -1.0}"#).unwrap_err();
        assert!(matches!(err, RecognizerError::InvalidConfig(_)));

        let err = PadConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, RecognizerError::InvalidConfig(_)));
    }

    #[test]
    fn test_bar_colors() {
        let config = PadConfig::default();
        assert_eq!(config.color_for(true), "#4CAF50");
        assert_eq!(config.color_for(false), "#2196F3");
    }
}
