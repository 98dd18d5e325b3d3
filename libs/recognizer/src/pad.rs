//! Drawing pad controller state
//!
//! Owns the surface, the stroke state and what the result area currently
//! shows. The browser front-end keeps one of these and forwards DOM events to
//! it; everything it decides can be checked here without a DOM.

use crate::chart::ConfidenceChart;
use crate::prediction::{Prediction, ScoreVector};
use crate::stroke::{PointerInput, StrokeCapture};
use crate::surface::DrawingSurface;
use crate::{RecognizerError, LABEL_PLACEHOLDER};

pub struct DigitPad<S> {
    surface: S,
    stroke: StrokeCapture,
    prediction: Option<Prediction>,
    pending: bool,
    /// Set by `clear` while a run is in flight; its result must not be shown
    stale: bool,
}

impl<S: DrawingSurface> DigitPad<S> {
    /// Wrap a surface and paint it with the background
    pub fn new(mut surface: S, line_width: f64) -> Self {
        surface.fill_background();
        Self {
            surface,
            stroke: StrokeCapture::new(line_width),
            prediction: None,
            pending: false,
            stale: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_drawing()
    }

    pub fn handle(&mut self, input: PointerInput) {
        self.stroke.handle(&mut self.surface, input);
    }

    /// Blank canvas, placeholder label, no bars. A run still in flight keeps
    /// the slot but its result is dropped.
    pub fn clear(&mut self) {
        self.stroke.clear(&mut self.surface);
        self.prediction = None;
        self.stale = self.pending;
    }

    /// Claim the single prediction slot
    pub fn begin_prediction(&mut self) -> Result<(), RecognizerError> {
        if self.pending {
            return Err(RecognizerError::PredictionPending);
        }
        self.pending = true;
        Ok(())
    }

    /// Release the slot and, on success, show the new result.
    /// A failed run leaves the previous result and the drawing untouched.
    /// Returns `Ok(None)` when the pad was cleared since the run started.
    pub fn finish_prediction(
        &mut self,
        scores: Result<ScoreVector, RecognizerError>,
    ) -> Result<Option<&Prediction>, RecognizerError> {
        self.pending = false;
        if std::mem::take(&mut self.stale) {
            return Ok(None);
        }
        let prediction = Prediction::from_scores(scores?)?;
        Ok(Some(self.prediction.insert(prediction)))
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    pub fn label_text(&self) -> String {
        match &self.prediction {
            Some(p) => p.label().to_string(),
            None => LABEL_PLACEHOLDER.to_string(),
        }
    }

    pub fn chart(&self) -> ConfidenceChart {
        match &self.prediction {
            Some(p) => p.chart(),
            None => ConfidenceChart::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{CanvasSurface, Point, BLACK};

    fn pad() -> DigitPad<CanvasSurface> {
        DigitPad::new(CanvasSurface::blank(280, 280), 15.0)
    }

    fn scribble(pad: &mut DigitPad<CanvasSurface>) {
        pad.handle(PointerInput::Down(Point::new(100.0, 40.0)));
        pad.handle(PointerInput::Move(Point::new(180.0, 60.0)));
        pad.handle(PointerInput::Move(Point::new(120.0, 250.0)));
        pad.handle(PointerInput::Up);
    }

    #[test]
    fn test_initial_state() {
        let pad = pad();
        assert!(pad.surface().is_uniform(BLACK));
        assert_eq!(pad.label_text(), "?");
        assert!(pad.chart().is_empty());
        assert!(!pad.is_pending());
    }

    #[test]
    fn test_prediction_updates_label_and_chart() {
        let mut pad = pad();
        scribble(&mut pad);

        let mut scores = vec![-4.0f32; 10];
        scores[3] = -0.05;
        pad.begin_prediction().unwrap();
        let label = pad
            .finish_prediction(Ok(scores.into()))
            .unwrap()
            .unwrap()
            .label();

        assert_eq!(label, 3);
        assert_eq!(pad.label_text(), "3");
        assert_eq!(pad.chart().highlighted(), Some(3));
        assert!(!pad.is_pending());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut pad = pad();
        scribble(&mut pad);
        pad.begin_prediction().unwrap();
        pad.finish_prediction(Ok(ScoreVector::new(vec![0.0; 10])))
            .unwrap();
        assert!(pad.surface().inked_pixels() > 0);

        pad.clear();

        assert!(pad.surface().is_uniform(BLACK));
        assert_eq!(pad.label_text(), "?");
        assert!(pad.chart().is_empty());
    }

    #[test]
    fn test_clear_in_the_middle_of_a_stroke() {
        let mut pad = pad();
        pad.handle(PointerInput::Down(Point::new(10.0, 10.0)));
        assert!(pad.is_drawing());
        pad.clear();
        assert!(!pad.is_drawing());
        pad.handle(PointerInput::Move(Point::new(200.0, 200.0)));

        assert!(pad.surface().is_uniform(BLACK));
    }

    #[test]
    fn test_result_arriving_after_clear_is_dropped() {
        let mut pad = pad();
        scribble(&mut pad);
        pad.begin_prediction().unwrap();
        pad.clear();

        let mut scores = vec![-9.0f32; 10];
        scores[7] = -0.01;
        assert!(pad.finish_prediction(Ok(scores.into())).unwrap().is_none());

        assert!(pad.surface().is_uniform(BLACK));
        assert!(pad.prediction().is_none());
        assert_eq!(pad.label_text(), "?");
        assert!(pad.chart().is_empty());
        assert!(!pad.is_pending());
    }

    #[test]
    fn test_failure_arriving_after_clear_is_dropped() {
        let mut pad = pad();
        pad.begin_prediction().unwrap();
        pad.clear();

        let finished = pad.finish_prediction(Err(RecognizerError::Inference("boom".into())));
        assert_eq!(finished, Ok(None));
        assert_eq!(pad.label_text(), "?");
    }

    #[test]
    fn test_next_prediction_after_dropped_result_is_shown() {
        let mut pad = pad();
        pad.begin_prediction().unwrap();
        pad.clear();
        pad.finish_prediction(Ok(ScoreVector::new(vec![0.0; 10])))
            .unwrap();

        let mut scores = vec![-9.0f32; 10];
        scores[2] = -0.01;
        pad.begin_prediction().unwrap();
        pad.finish_prediction(Ok(scores.into())).unwrap();

        assert_eq!(pad.label_text(), "2");
        assert_eq!(pad.prediction().map(|p| p.label()), Some(2));
    }

    #[test]
    fn test_clear_while_idle_does_not_drop_next_result() {
        let mut pad = pad();
        pad.clear();
        pad.begin_prediction().unwrap();
        pad.finish_prediction(Ok(ScoreVector::new(vec![0.0; 10])))
            .unwrap();

        assert_eq!(pad.label_text(), "0");
    }

    #[test]
    fn test_overlapping_predictions_rejected() {
        let mut pad = pad();
        pad.begin_prediction().unwrap();
        assert_eq!(
            pad.begin_prediction().unwrap_err(),
            RecognizerError::PredictionPending
        );

        pad.finish_prediction(Ok(ScoreVector::new(vec![0.0; 10])))
            .unwrap();
        assert!(pad.begin_prediction().is_ok());
    }

    #[test]
    fn test_failed_prediction_keeps_drawing_and_result() {
        let mut pad = pad();
        scribble(&mut pad);
        let inked = pad.surface().inked_pixels();

        pad.begin_prediction().unwrap();
        pad.finish_prediction(Ok(ScoreVector::new(vec![0.0; 10])))
            .unwrap();

        pad.begin_prediction().unwrap();
        let err = pad
            .finish_prediction(Err(RecognizerError::Inference("boom".into())))
            .unwrap_err();

        assert_eq!(err, RecognizerError::Inference("boom".into()));
        assert!(!pad.is_pending());
        assert_eq!(pad.surface().inked_pixels(), inked);
        assert_eq!(pad.label_text(), "0");
    }
}
