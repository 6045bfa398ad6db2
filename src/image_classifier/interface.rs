use image::DynamicImage;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

/// Labels of the model outputs, by class index.
pub const CLASS_LABELS: [&str; 2] = ["Non-Cancerous", "Cancerous"];

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

pub trait ImageClassifier {
    /// One entry per model class, in class-index order.
    fn classify(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<Classification>, Box<dyn Error + Send + Sync>>;
}

pub trait ModelLoader {
    fn load(
        &self,
        model_path: &Path,
        target_size: [u32; 2],
    ) -> Result<Arc<dyn ImageClassifier + Send + Sync>, Box<dyn Error + Send + Sync>>;
}

pub fn class_label(index: usize) -> String {
    CLASS_LABELS
        .get(index)
        .map(|label| label.to_string())
        .unwrap_or_else(|| format!("Class {}", index))
}

pub fn classifications_from_scores(scores: &[f32]) -> Vec<Classification> {
    scores
        .iter()
        .enumerate()
        .map(|(index, &confidence)| Classification {
            label: class_label(index),
            confidence,
        })
        .collect()
}

/// Brings a raw model output into the two-class form. A single value is read
/// as the sigmoid probability of the positive class.
pub fn binary_scores(output: &[f32]) -> Result<Vec<f32>, Box<dyn Error + Send + Sync>> {
    match output {
        [positive] => Ok(vec![1.0 - positive, *positive]),
        [negative, positive] => Ok(vec![*negative, *positive]),
        _ => Err(format!(
            "expected 2 class probabilities, model returned {}",
            output.len()
        )
        .into()),
    }
}
