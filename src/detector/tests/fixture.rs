use crate::config::Config;
use crate::detector::core::{init, LoadedImage, LoadedModel, ModelState, Msg, State};
use crate::detector::preview::make_preview;
use crate::detector::runtime::Runtime;
use crate::file_dialog::impl_fake::FileDialogFake;
use crate::image_classifier::impl_fake::{FakeScores, ImageClassifierFake, ModelLoaderFake};
use crate::image_classifier::interface::ModelLoader;
use crate::library::logger::{impl_console::LoggerConsole, interface::Logger};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

pub fn loaded_model(scores: [f32; 2]) -> LoadedModel {
    LoadedModel {
        path: PathBuf::from("cancer_detection_model.onnx"),
        classifier: Arc::new(ImageClassifierFake::new(FakeScores::Fixed(scores))),
    }
}

pub fn loaded_image(name: &str, width: u32, height: u32) -> LoadedImage {
    let image = DynamicImage::new_rgb8(width, height);
    let preview = make_preview(&image);
    LoadedImage {
        path: PathBuf::from("/images").join(name),
        filename: name.to_string(),
        image: Arc::new(image),
        preview: Arc::new(preview),
    }
}

/// Freshly started state with no model or image.
pub fn initial_state() -> State {
    init(Config::default()).0
}

/// State ready for a prediction.
pub fn ready_state(scores: [f32; 2]) -> State {
    let mut state = initial_state();
    state.model = ModelState::Loaded(loaded_model(scores));
    state.image = Some(loaded_image("cells.png", 128, 96));
    state
}

#[allow(dead_code)]
pub struct Fixture {
    pub config_path: PathBuf,
    pub runtime: Runtime,
    pub event_receiver: Receiver<Msg>,
}

impl Fixture {
    pub fn new(dir: &Path, model_loader: ModelLoaderFake, file_dialog: FileDialogFake) -> Self {
        let (event_sender, event_receiver) = channel();
        let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new());
        let model_loader: Arc<dyn ModelLoader + Send + Sync> = Arc::new(model_loader);
        let config_path = dir.join("config.json");
        let runtime = Runtime::new(
            logger.with_namespace("test"),
            model_loader,
            Arc::new(file_dialog),
            config_path.clone(),
            Config::default().target_size,
            event_sender,
            Arc::new(|| {}),
        );

        Self {
            config_path,
            runtime,
            event_receiver,
        }
    }
}
