use crate::error::AppError;
use crate::image_classifier::interface::class_label;
use std::cmp::Ordering;

/// Index of the "cancerous" class in the model output.
pub const POSITIVE_CLASS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnosis {
    Positive,
    Negative,
}

impl Diagnosis {
    pub fn banner(&self) -> &'static str {
        match self {
            Diagnosis::Positive => "CANCER DETECTED",
            Diagnosis::Negative => "NO CANCER DETECTED",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub class_index: usize,
    pub confidence: f32,
    pub scores: Vec<f32>,
    pub diagnosis: Diagnosis,
}

/// First index holding the largest score.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (index, &score)| match best {
            Some((_, best_score)) if score.partial_cmp(&best_score) != Some(Ordering::Greater) => {
                best
            }
            _ => Some((index, score)),
        })
        .map(|(index, _)| index)
}

/// Positive only when the winning class is the positive one and its
/// probability reaches the threshold.
pub fn decide(scores: &[f32], threshold: f32) -> Result<Decision, AppError> {
    let class_index = argmax(scores)
        .ok_or_else(|| AppError::Prediction("model returned no class probabilities".to_string()))?;
    let confidence = scores[class_index];

    let diagnosis = if class_index == POSITIVE_CLASS && confidence >= threshold {
        Diagnosis::Positive
    } else {
        Diagnosis::Negative
    };

    Ok(Decision {
        class_index,
        confidence,
        scores: scores.to_vec(),
        diagnosis,
    })
}

pub fn format_percent(probability: f32) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Rows of the metrics table. Without a decision only the threshold is known.
pub fn metrics_rows(decision: Option<&Decision>, threshold: f32) -> Vec<(&'static str, String)> {
    let placeholder = || "--".to_string();
    let score = |index: usize| {
        decision
            .and_then(|d| d.scores.get(index))
            .map(|p| format!("{:.4}", p))
            .unwrap_or_else(placeholder)
    };

    vec![
        (
            "Class",
            decision
                .map(|d| class_label(d.class_index))
                .unwrap_or_else(placeholder),
        ),
        (
            "Confidence Score",
            decision
                .map(|d| format!("{:.4}", d.confidence))
                .unwrap_or_else(placeholder),
        ),
        ("Non-Cancerous Probability", score(0)),
        ("Cancerous Probability", score(1)),
        ("Decision Threshold", format!("{}", threshold)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_equal_to_threshold_is_positive() {
        let decision = decide(&[0.3, 0.7], 0.7).unwrap();
        assert_eq!(decision.class_index, 1);
        assert_eq!(decision.diagnosis, Diagnosis::Positive);
    }

    #[test]
    fn test_probability_just_below_threshold_is_negative() {
        let below = 0.7f32 - f32::EPSILON;
        let decision = decide(&[1.0 - below, below], 0.7).unwrap();
        assert_eq!(decision.class_index, 1);
        assert_eq!(decision.diagnosis, Diagnosis::Negative);
    }

    #[test]
    fn test_negative_class_winning_is_negative_whatever_the_threshold() {
        let decision = decide(&[0.9, 0.1], 0.0).unwrap();
        assert_eq!(decision.class_index, 0);
        assert_eq!(decision.confidence, 0.9);
        assert_eq!(decision.diagnosis, Diagnosis::Negative);
    }

    #[test]
    fn test_tie_goes_to_first_class() {
        assert_eq!(argmax(&[0.5, 0.5]), Some(0));
        let decision = decide(&[0.5, 0.5], 0.5).unwrap();
        assert_eq!(decision.diagnosis, Diagnosis::Negative);
    }

    #[test]
    fn test_empty_output_is_a_prediction_error() {
        assert_eq!(argmax(&[]), None);
        assert!(matches!(decide(&[], 0.5), Err(AppError::Prediction(_))));
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.8734), "87.34%");
        assert_eq!(format_percent(1.0), "100.00%");
    }

    #[test]
    fn test_metrics_rows_before_prediction() {
        let rows = metrics_rows(None, 0.5);
        assert_eq!(
            rows,
            vec![
                ("Class", "--".to_string()),
                ("Confidence Score", "--".to_string()),
                ("Non-Cancerous Probability", "--".to_string()),
                ("Cancerous Probability", "--".to_string()),
                ("Decision Threshold", "0.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_metrics_rows_after_prediction() {
        let decision = decide(&[0.125, 0.875], 0.5).unwrap();
        let rows = metrics_rows(Some(&decision), 0.5);
        assert_eq!(rows[0].1, "Cancerous");
        assert_eq!(rows[1].1, "0.8750");
        assert_eq!(rows[2].1, "0.1250");
        assert_eq!(rows[3].1, "0.8750");
    }
}
