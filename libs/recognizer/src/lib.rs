//! Handwritten digit recognition core
//!
//! Everything the digit pad does that does not touch the DOM lives here:
//! stroke capture over a drawing surface, the 28x28 preprocessing transform,
//! the model lifecycle around an external inference engine, and turning raw
//! scores into a prediction and a confidence chart.

mod chart;
mod config;
mod model;
mod pad;
mod prediction;
mod preprocess;
mod stroke;
mod surface;

pub use chart::{ConfidenceBar, ConfidenceChart};
pub use config::PadConfig;
pub use model::{InferenceAdapter, InferenceEngine, ModelState};
pub use pad::DigitPad;
pub use prediction::{argmax, Prediction, ScoreVector, NUM_CLASSES};
pub use preprocess::{
    downsample, normalize, preprocess, InputTensor, DIGIT_SIZE, MNIST_MEAN, MNIST_STD,
};
pub use stroke::{PointerInput, StrokeCapture};
pub use surface::{CanvasSurface, DrawingSurface, Point, Rgba};

/// Text shown in place of the predicted digit before any prediction
pub const LABEL_PLACEHOLDER: &str = "?";

/// Error type for recognizer operations
#[derive(Debug, Clone, PartialEq)]
pub enum RecognizerError {
    /// Prediction requested before the model finished loading
    ModelNotLoaded,
    /// Prediction requested while the model is still loading
    ModelLoading,
    /// The model failed to load earlier and has not been reloaded
    ModelUnavailable(String),
    /// Loading the model artifact failed
    ModelLoad(String),
    /// The inference engine rejected or failed a forward pass
    Inference(String),
    /// A prediction is already in flight
    PredictionPending,
    /// Pixel buffer does not match its declared dimensions
    InvalidSurface(String),
    /// The model returned no scores
    EmptyScores,
    /// Configuration value out of range or unparsable
    InvalidConfig(String),
}

impl std::fmt::Display for RecognizerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecognizerError::ModelNotLoaded => {
                write!(f, "The model is not loaded yet. Please wait...")
            }
            RecognizerError::ModelLoading => {
                write!(f, "The model is still loading. Please wait...")
            }
            RecognizerError::ModelUnavailable(e) => {
                write!(f, "The model could not be loaded: {}", e)
            }
            RecognizerError::ModelLoad(e) => write!(f, "Error while loading the model: {}", e),
            RecognizerError::Inference(e) => write!(f, "Error during prediction: {}", e),
            RecognizerError::PredictionPending => write!(f, "A prediction is already running"),
            RecognizerError::InvalidSurface(e) => write!(f, "Invalid drawing surface: {}", e),
            RecognizerError::EmptyScores => write!(f, "The model returned no scores"),
            RecognizerError::InvalidConfig(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for RecognizerError {}

impl RecognizerError {
    /// Usage errors are the user's timing, not a fault of the system
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            RecognizerError::ModelNotLoaded
                | RecognizerError::ModelLoading
                | RecognizerError::PredictionPending
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RecognizerError::ModelNotLoaded;
        assert_eq!(format!("{}", err), "The model is not loaded yet. Please wait...");

        let err = RecognizerError::Inference("shape mismatch".to_string());
        assert_eq!(format!("{}", err), "Error during prediction: shape mismatch");
    }

    #[test]
    fn test_usage_errors() {
        assert!(RecognizerError::ModelNotLoaded.is_usage_error());
        assert!(RecognizerError::ModelLoading.is_usage_error());
        assert!(RecognizerError::PredictionPending.is_usage_error());
        assert!(!RecognizerError::ModelLoad("missing".into()).is_usage_error());
        assert!(!RecognizerError::EmptyScores.is_usage_error());
    }
}
