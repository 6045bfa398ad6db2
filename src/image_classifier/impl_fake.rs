use crate::image_classifier::interface::{
    classifications_from_scores, Classification, ImageClassifier, ModelLoader,
};
use image::DynamicImage;
use rand::distr::{Distribution, Uniform};
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum FakeScores {
    /// A fresh random pair summing to one on every call.
    Random,
    Fixed([f32; 2]),
    Fail(String),
}

pub struct ImageClassifierFake {
    scores: FakeScores,
}

impl ImageClassifierFake {
    pub fn new(scores: FakeScores) -> Self {
        Self { scores }
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(
        &self,
        _image: &DynamicImage,
    ) -> Result<Vec<Classification>, Box<dyn Error + Send + Sync>> {
        let scores = match &self.scores {
            FakeScores::Random => {
                let mut rng = rand::rng();
                let positive_dist = Uniform::new(0.0f32, 1.0f32)?;
                let positive = positive_dist.sample(&mut rng);
                [1.0 - positive, positive]
            }
            FakeScores::Fixed(scores) => *scores,
            FakeScores::Fail(message) => return Err(message.clone().into()),
        };

        Ok(classifications_from_scores(&scores))
    }
}

/// Hands out fake classifiers without touching the filesystem.
pub struct ModelLoaderFake {
    scores: FakeScores,
    load_error: Option<String>,
}

impl ModelLoaderFake {
    pub fn new(scores: FakeScores) -> Self {
        Self {
            scores,
            load_error: None,
        }
    }

    #[cfg(test)]
    pub fn failing(message: &str) -> Self {
        Self {
            scores: FakeScores::Random,
            load_error: Some(message.to_string()),
        }
    }
}

impl ModelLoader for ModelLoaderFake {
    fn load(
        &self,
        _model_path: &Path,
        _target_size: [u32; 2],
    ) -> Result<Arc<dyn ImageClassifier + Send + Sync>, Box<dyn Error + Send + Sync>> {
        if let Some(message) = &self.load_error {
            return Err(message.clone().into());
        }
        Ok(Arc::new(ImageClassifierFake::new(self.scores.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> DynamicImage {
        DynamicImage::new_rgb8(48, 48)
    }

    #[test]
    fn test_random_scores_sum_to_one() {
        let classifier = ImageClassifierFake::new(FakeScores::Random);

        for _ in 0..20 {
            let classifications = classifier.classify(&blank()).unwrap();
            assert_eq!(classifications.len(), 2);
            let total: f32 = classifications.iter().map(|c| c.confidence).sum();
            assert!((total - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_fixed_scores() {
        let classifier = ImageClassifierFake::new(FakeScores::Fixed([0.1, 0.9]));
        let classifications = classifier.classify(&blank()).unwrap();
        assert_eq!(classifications[1].label, "Cancerous");
        assert_eq!(classifications[1].confidence, 0.9);
    }

    #[test]
    fn test_failing_loader() {
        let loader = ModelLoaderFake::failing("bad weights");
        let err = loader.load(Path::new("any.onnx"), [48, 48]).err().unwrap();
        assert_eq!(err.to_string(), "bad weights");
    }
}
