use crate::image_classifier::interface::{
    binary_scores, classifications_from_scores, Classification, ImageClassifier, ModelLoader,
};
use crate::image_classifier::preprocess::{image_to_tensor, ChannelLayout};
use image::DynamicImage;
use std::error::Error;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::*;

pub struct ImageClassifierTractOnnx {
    model: TypedRunnableModel<TypedModel>,
    target_size: [u32; 2],
    layout: ChannelLayout,
}

impl ImageClassifierTractOnnx {
    pub fn new(model_path: &Path, target_size: [u32; 2]) -> Result<Self, Box<dyn Error + Send + Sync>> {
        if !model_path.is_file() {
            return Err(Box::new(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no model at {}", model_path.display()),
            )));
        }

        let model = tract_onnx::onnx().model_for_path(model_path)?;

        let (model, layout) = match declared_layout(&model) {
            Some(layout) => (Self::optimize(model, target_size, layout)?, layout),
            // Input shape not fixed in the file, so try channels-last first.
            None => match Self::optimize(model.clone(), target_size, ChannelLayout::Nhwc) {
                Ok(optimized) => (optimized, ChannelLayout::Nhwc),
                Err(nhwc_error) => match Self::optimize(model, target_size, ChannelLayout::Nchw) {
                    Ok(optimized) => (optimized, ChannelLayout::Nchw),
                    Err(_) => return Err(nhwc_error.into()),
                },
            },
        };

        Ok(Self {
            model,
            target_size,
            layout,
        })
    }

    fn optimize(
        model: InferenceModel,
        target_size: [u32; 2],
        layout: ChannelLayout,
    ) -> TractResult<TypedRunnableModel<TypedModel>> {
        model
            .with_input_fact(0, f32::fact(layout.input_shape(target_size)).into())?
            .into_optimized()?
            .into_runnable()
    }
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn classify(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<Classification>, Box<dyn Error + Send + Sync>> {
        let input = image_to_tensor(image, self.target_size, self.layout);

        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let output = outputs
            .first()
            .ok_or("model produced no output")?
            .to_array_view::<f32>()?;

        let raw: Vec<f32> = output.iter().copied().collect();
        let scores = binary_scores(&raw)?;

        Ok(classifications_from_scores(&scores))
    }
}

/// Layout from the input shape stored in the model, if it pins the channel
/// axis.
fn declared_layout(model: &InferenceModel) -> Option<ChannelLayout> {
    let typed = model.clone().into_typed().ok()?;
    let fact = typed.input_fact(0).ok()?;
    let dims: Vec<Option<i64>> = fact.shape.iter().map(|dim| dim.to_i64().ok()).collect();
    layout_from_dims(&dims)
}

/// Channels are 3 wide; unknown dimensions are `None`.
fn layout_from_dims(dims: &[Option<i64>]) -> Option<ChannelLayout> {
    match dims {
        [_, _, _, Some(3)] => Some(ChannelLayout::Nhwc),
        [_, Some(3), _, _] => Some(ChannelLayout::Nchw),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModelLoaderTractOnnx;

impl ModelLoaderTractOnnx {
    pub fn new() -> Self {
        Self
    }
}

impl ModelLoader for ModelLoaderTractOnnx {
    fn load(
        &self,
        model_path: &Path,
        target_size: [u32; 2],
    ) -> Result<Arc<dyn ImageClassifier + Send + Sync>, Box<dyn Error + Send + Sync>> {
        let classifier = ImageClassifierTractOnnx::new(model_path, target_size)?;
        Ok(Arc::new(classifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_model_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.onnx");

        let err = ModelLoaderTractOnnx::new()
            .load(&path, [48, 48])
            .err()
            .unwrap();

        let io_err = err.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_layout_from_declared_input() {
        assert_eq!(
            layout_from_dims(&[None, Some(48), Some(48), Some(3)]),
            Some(ChannelLayout::Nhwc)
        );
        assert_eq!(
            layout_from_dims(&[Some(1), Some(3), Some(224), Some(224)]),
            Some(ChannelLayout::Nchw)
        );
        assert_eq!(layout_from_dims(&[None, None, None, None]), None);
        assert_eq!(layout_from_dims(&[Some(1), Some(3)]), None);
    }

    #[test]
    fn test_corrupt_model_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt.onnx");
        std::fs::write(&path, b"definitely not protobuf").unwrap();

        let err = ModelLoaderTractOnnx::new()
            .load(&path, [48, 48])
            .err()
            .unwrap();

        assert!(err.downcast_ref::<io::Error>().is_none());
    }
}
