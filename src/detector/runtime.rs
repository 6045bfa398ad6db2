use crate::config::resolve_resource;
use crate::detector::core::{Effect, LoadedImage, LoadedModel, Msg};
use crate::detector::preview::make_preview;
use crate::error::AppError;
use crate::file_dialog::interface::FileDialog;
use crate::image_classifier::interface::{Classification, ModelLoader};
use crate::library::logger::interface::Logger;
use chrono::Local;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Interprets effects. File pickers run on the calling (UI) thread; anything
/// that touches the disk or the model runs on its own thread. Every effect
/// reports back with at most one message.
#[derive(Clone)]
pub struct Runtime {
    logger: Arc<dyn Logger + Send + Sync>,
    model_loader: Arc<dyn ModelLoader + Send + Sync>,
    file_dialog: Arc<dyn FileDialog + Send + Sync>,
    config_path: PathBuf,
    target_size: [u32; 2],
    event_sender: Sender<Msg>,
    wake: Arc<dyn Fn() + Send + Sync>,
}

impl Runtime {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        model_loader: Arc<dyn ModelLoader + Send + Sync>,
        file_dialog: Arc<dyn FileDialog + Send + Sync>,
        config_path: PathBuf,
        target_size: [u32; 2],
        event_sender: Sender<Msg>,
        wake: Arc<dyn Fn() + Send + Sync>,
    ) -> Self {
        Self {
            logger,
            model_loader,
            file_dialog,
            config_path,
            target_size,
            event_sender,
            wake,
        }
    }

    pub fn execute_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::Log { level, message } => {
                let _ = self.logger.log(level, &message);
            }
            Effect::PickModelFile => self.send(Msg::ModelFilePicked(self.file_dialog.pick_model())),
            Effect::PickImageFile => self.send(Msg::ImageFilePicked(self.file_dialog.pick_image())),
            Effect::PickExportPath => {
                self.send(Msg::ExportPathPicked(self.file_dialog.pick_export_path()))
            }
            Effect::LoadModel { path, from_picker } => self.spawn(move |runtime| {
                let result = runtime.load_model(&path, from_picker);
                Msg::ModelLoadDone {
                    path,
                    from_picker,
                    result,
                }
            }),
            Effect::SaveConfig { config } => self.spawn(move |runtime| {
                Msg::ConfigSaveDone(config.save(&runtime.config_path))
            }),
            Effect::LoadImage { path } => self.spawn(move |_| Msg::ImageLoadDone(load_image(&path))),
            Effect::Classify { model, image } => self.spawn(move |_| {
                let result = classify(&model, &image);
                Msg::ClassifyDone {
                    filename: image.filename.clone(),
                    finished_at: Local::now().naive_local(),
                    result,
                }
            }),
            Effect::ExportHistory { path, history } => self.spawn(move |_| {
                let result = history.export(&path);
                Msg::ExportDone { path, result }
            }),
        }
    }

    fn spawn<F>(&self, work: F)
    where
        F: FnOnce(&Runtime) -> Msg + Send + 'static,
    {
        let runtime = self.clone();
        std::thread::spawn(move || {
            let msg = work(&runtime);
            runtime.send(msg);
        });
    }

    fn send(&self, msg: Msg) {
        if self.event_sender.send(msg).is_ok() {
            (self.wake)();
        }
    }

    fn load_model(&self, path: &Path, from_picker: bool) -> Result<LoadedModel, AppError> {
        let resolved = if from_picker {
            path.to_path_buf()
        } else {
            resolve_resource(path)
        };

        match self.model_loader.load(&resolved, self.target_size) {
            Ok(classifier) => Ok(LoadedModel {
                path: resolved,
                classifier,
            }),
            Err(e) => match e.downcast_ref::<io::Error>() {
                Some(io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                    Err(AppError::ModelNotFound(resolved))
                }
                _ => Err(AppError::Model(e.to_string())),
            },
        }
    }
}

pub fn load_image(path: &Path) -> Result<LoadedImage, AppError> {
    let image = image::open(path).map_err(|e| AppError::Image(e.to_string()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let preview = make_preview(&image);

    Ok(LoadedImage {
        path: path.to_path_buf(),
        filename,
        image: Arc::new(image),
        preview: Arc::new(preview),
    })
}

fn classify(model: &LoadedModel, image: &LoadedImage) -> Result<Vec<Classification>, AppError> {
    model
        .classifier
        .classify(&image.image)
        .map_err(|e| AppError::Prediction(e.to_string()))
}
