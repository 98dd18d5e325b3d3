use serde::Serialize;

use crate::chart::ConfidenceChart;
use crate::RecognizerError;

/// Number of digit classes the model scores
pub const NUM_CLASSES: usize = 10;

/// Raw per-class outputs of one forward pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreVector(Vec<f32>);

impl ScoreVector {
    pub fn new(scores: Vec<f32>) -> Self {
        Self(scores)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Treat scores as log-probabilities and exponentiate them.
    ///
    /// The result is not re-normalized: a model whose outputs are not true
    /// log-softmax values yields confidences that do not sum to 1.
    pub fn confidences(&self) -> Vec<f32> {
        self.0.iter().map(|s| s.exp()).collect()
    }
}

impl From<Vec<f32>> for ScoreVector {
    fn from(scores: Vec<f32>) -> Self {
        Self(scores)
    }
}

/// Index of the largest value; the first one wins on ties
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, max)) if v > max => best = Some((i, v)),
            Some(_) => {}
            None if !v.is_nan() => best = Some((i, v)),
            None => {}
        }
    }
    best.map(|(i, _)| i)
}

/// A digit label together with the scores it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    label: usize,
    scores: ScoreVector,
    confidences: Vec<f32>,
}

impl Prediction {
    pub fn from_scores(scores: ScoreVector) -> Result<Self, RecognizerError> {
        let label = argmax(scores.as_slice()).ok_or(RecognizerError::EmptyScores)?;
        let confidences = scores.confidences();
        Ok(Self {
            label,
            scores,
            confidences,
        })
    }

    pub fn label(&self) -> usize {
        self.label
    }

    pub fn confidences(&self) -> &[f32] {
        &self.confidences
    }

    /// Confidence of the predicted label
    pub fn confidence(&self) -> f32 {
        self.confidences[self.label]
    }

    pub fn chart(&self) -> ConfidenceChart {
        ConfidenceChart::from_confidences(&self.confidences, Some(self.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_first_index_wins_ties() {
        assert_eq!(argmax(&[0.0; 10]), Some(0));
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax(&[-5.0, -1.0, -1.0]), Some(1));
    }

    #[test]
    fn test_argmax_empty() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_argmax_skips_nan() {
        assert_eq!(argmax(&[f32::NAN, -2.0, -1.0]), Some(2));
        assert_eq!(argmax(&[f32::NAN]), None);
    }

    #[test]
    fn test_zero_scores() {
        let prediction = Prediction::from_scores(ScoreVector::new(vec![0.0; 10])).unwrap();

        assert_eq!(prediction.label(), 0);
        assert_eq!(prediction.confidences(), &[1.0; 10]);
    }

    #[test]
    fn test_strict_maximum() {
        let mut scores = vec![-9.0f32; 10];
        scores[7] = -0.01;
        let prediction = Prediction::from_scores(scores.into()).unwrap();

        assert_eq!(prediction.label(), 7);
        assert!((prediction.confidence() - (-0.01f32).exp()).abs() < 1e-6);
    }

    #[test]
    fn test_confidences_not_renormalized() {
        let scores = ScoreVector::new(vec![0.0, 0.0, 0.0]);
        let sum: f32 = scores.confidences().iter().sum();
        assert_eq!(sum, 3.0);
    }

    #[test]
    fn test_empty_scores_rejected() {
        let err = Prediction::from_scores(ScoreVector::new(vec![])).unwrap_err();
        assert_eq!(err, RecognizerError::EmptyScores);
    }
}
