//! Confidence bar chart model
//!
//! The renderer draws whatever this produces, so the bar count, heights,
//! labels and highlighting are decided here and tested without a DOM.

use serde::Serialize;

use crate::prediction::NUM_CLASSES;

/// One bar of the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceBar {
    pub digit: u8,
    /// Confidence scaled by 100
    pub percent: f32,
    /// Whether this bar is the predicted digit
    pub highlighted: bool,
}

impl ConfidenceBar {
    /// Bar height as a CSS percentage, kept within 0..=100
    pub fn height(&self) -> String {
        let clamped = if self.percent.is_nan() {
            0.0
        } else {
            self.percent.clamp(0.0, 100.0)
        };
        format!("{:.1}%", clamped)
    }

    /// Value text shown above the bar
    pub fn label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfidenceChart {
    bars: Vec<ConfidenceBar>,
}

impl ConfidenceChart {
    /// The cleared state: no bars at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Ten bars, one per digit. Missing confidences show as zero; an empty
    /// slice gives the empty chart.
    pub fn from_confidences(confidences: &[f32], predicted: Option<usize>) -> Self {
        if confidences.is_empty() {
            return Self::empty();
        }

        let bars = (0..NUM_CLASSES)
            .map(|i| ConfidenceBar {
                digit: i as u8,
                percent: confidences.get(i).copied().unwrap_or(0.0) * 100.0,
                highlighted: predicted == Some(i),
            })
            .collect();
        Self { bars }
    }

    pub fn bars(&self) -> &[ConfidenceBar] {
        &self.bars
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn highlighted(&self) -> Option<u8> {
        self.bars.iter().find(|b| b.highlighted).map(|b| b.digit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::{Prediction, ScoreVector};

    #[test]
    fn test_empty_confidences() {
        let chart = ConfidenceChart::from_confidences(&[], None);
        assert!(chart.is_empty());
        assert_eq!(chart.bars().len(), 0);
        assert_eq!(chart.highlighted(), None);
    }

    #[test]
    fn test_zero_scores_give_equal_bars() {
        let chart = Prediction::from_scores(ScoreVector::new(vec![0.0; 10]))
            .unwrap()
            .chart();

        assert_eq!(chart.bars().len(), 10);
        for bar in chart.bars() {
            assert_eq!(bar.height(), "100.0%");
            assert_eq!(bar.label(), "100.0%");
        }
        assert_eq!(chart.highlighted(), Some(0));
    }

    #[test]
    fn test_only_predicted_bar_highlighted() {
        let mut scores = vec![-5.0f32; 10];
        scores[4] = -0.1;
        let chart = Prediction::from_scores(scores.into()).unwrap().chart();

        let highlighted: Vec<u8> = chart
            .bars()
            .iter()
            .filter(|b| b.highlighted)
            .map(|b| b.digit)
            .collect();
        assert_eq!(highlighted, vec![4]);
    }

    #[test]
    fn test_label_one_decimal() {
        let chart = ConfidenceChart::from_confidences(&[0.4567, 0.5], Some(1));
        assert_eq!(chart.bars()[0].label(), "45.7%");
        assert_eq!(chart.bars()[1].label(), "50.0%");
    }

    #[test]
    fn test_short_input_padded_with_zero() {
        let chart = ConfidenceChart::from_confidences(&[0.9, 0.1, 0.2], Some(0));
        assert_eq!(chart.bars().len(), 10);
        assert_eq!(chart.bars()[9].percent, 0.0);
        assert_eq!(chart.bars()[9].label(), "0.0%");
    }

    #[test]
    fn test_height_clamped_label_literal() {
        let chart = ConfidenceChart::from_confidences(&[2.0; 10], Some(0));
        assert_eq!(chart.bars()[0].height(), "100.0%");
        assert_eq!(chart.bars()[0].label(), "200.0%");
    }
}
