use crate::config::Config;
use crate::detector::decision::{decide, Decision};
use crate::detector::history::{History, PredictionRecord};
use crate::detector::preview::meets_min_side;
use crate::error::AppError;
use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::library::logger::interface::Level;
use chrono::NaiveDateTime;
use image::{DynamicImage, RgbaImage};
use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct LoadedModel {
    pub path: PathBuf,
    pub classifier: Arc<dyn ImageClassifier + Send + Sync>,
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub filename: String,
    pub image: Arc<DynamicImage>,
    pub preview: Arc<RgbaImage>,
}

impl LoadedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedImage")
            .field("path", &self.path)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum ModelState {
    Loading { path: PathBuf },
    Loaded(LoadedModel),
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Results,
    Metrics,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dialog {
    pub level: DialogLevel,
    pub title: String,
    pub message: String,
}

impl Dialog {
    pub fn info(title: &str, message: &str) -> Self {
        Self {
            level: DialogLevel::Info,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    pub fn warning(title: &str, message: &str) -> Self {
        Self {
            level: DialogLevel::Warning,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    pub fn error(title: &str, message: &str) -> Self {
        Self {
            level: DialogLevel::Error,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    fn from_app_error(error: &AppError) -> Self {
        Self::error(error.title(), &error.to_string())
    }
}

pub const STATUS_START: &str = "Please upload an image to begin";
pub const STATUS_PROCESSING: &str = "Processing...";
pub const STATUS_DONE: &str = "Prediction complete";
pub const STATUS_FAILED: &str = "Prediction failed";

#[derive(Debug, Clone)]
pub struct State {
    pub config: Config,
    pub model: ModelState,
    pub image: Option<LoadedImage>,
    pub decision: Option<Decision>,
    /// Image the current decision was made for.
    pub classified_filename: Option<String>,
    pub history: History,
    pub status: String,
    pub tab: Tab,
    pub predicting: bool,
    pub dialogs: VecDeque<Dialog>,
}

impl State {
    pub fn loaded_model(&self) -> Option<&LoadedModel> {
        match &self.model {
            ModelState::Loaded(model) => Some(model),
            _ => None,
        }
    }

    /// The detect button only needs an image; a missing model is reported
    /// when it is pressed.
    pub fn predict_enabled(&self) -> bool {
        self.image.is_some() && !self.predicting
    }

    pub fn active_dialog(&self) -> Option<&Dialog> {
        self.dialogs.front()
    }
}

#[derive(Debug)]
pub enum Msg {
    ConfigLoadFailed(AppError),
    ConfigSaveDone(Result<(), AppError>),
    ModelLoadDone {
        path: PathBuf,
        from_picker: bool,
        result: Result<LoadedModel, AppError>,
    },
    ModelFilePicked(Option<PathBuf>),
    UploadClicked,
    ImageFilePicked(Option<PathBuf>),
    ImageLoadDone(Result<LoadedImage, AppError>),
    PredictClicked,
    ClassifyDone {
        filename: String,
        finished_at: NaiveDateTime,
        result: Result<Vec<Classification>, AppError>,
    },
    TabSelected(Tab),
    ClearHistoryClicked,
    ExportHistoryClicked,
    ExportPathPicked(Option<PathBuf>),
    ExportDone {
        path: PathBuf,
        result: Result<(), AppError>,
    },
    DialogDismissed,
}

#[derive(Debug, Clone)]
pub enum Effect {
    Log { level: Level, message: String },
    LoadModel { path: PathBuf, from_picker: bool },
    PickModelFile,
    SaveConfig { config: Config },
    PickImageFile,
    LoadImage { path: PathBuf },
    Classify { model: LoadedModel, image: LoadedImage },
    PickExportPath,
    ExportHistory { path: PathBuf, history: History },
}

impl Effect {
    fn info(message: impl Into<String>) -> Self {
        Effect::Log {
            level: Level::Info,
            message: message.into(),
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Effect::Log {
            level: Level::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Effect::Log {
            level: Level::Error,
            message: message.into(),
        }
    }
}

fn model_unavailable_dialog() -> Dialog {
    Dialog::warning(
        "Model Not Found",
        "Please ensure a valid model file is available.",
    )
}

pub fn init(config: Config) -> (State, Vec<Effect>) {
    let path = PathBuf::from(&config.model_path);
    (
        State {
            config,
            model: ModelState::Loading { path: path.clone() },
            image: None,
            decision: None,
            classified_filename: None,
            history: History::new(),
            status: STATUS_START.to_string(),
            tab: Tab::Results,
            predicting: false,
            dialogs: VecDeque::new(),
        },
        vec![Effect::LoadModel {
            path,
            from_picker: false,
        }],
    )
}

pub fn transition(state: State, msg: Msg) -> (State, Vec<Effect>) {
    let mut state = state;

    match msg {
        Msg::ConfigLoadFailed(error) => {
            let effects = vec![Effect::error(format!("Failed to load config: {}", error))];
            state.dialogs.push_back(Dialog::from_app_error(&error));
            (state, effects)
        }
        Msg::ConfigSaveDone(Ok(())) => (state, vec![Effect::info("Configuration saved")]),
        Msg::ConfigSaveDone(Err(error)) => {
            let effects = vec![Effect::error(format!("Failed to save config: {}", error))];
            state.dialogs.push_back(Dialog::from_app_error(&error));
            (state, effects)
        }

        // Model
        Msg::ModelLoadDone {
            path,
            from_picker,
            result: Ok(model),
        } => {
            let mut effects = Vec::new();
            state.model = ModelState::Loaded(model);
            if from_picker {
                effects.push(Effect::info(format!(
                    "Model loaded from user-selected path: {}",
                    path.display()
                )));
                match path.to_str() {
                    Some(model_path) => {
                        state.config.model_path = model_path.to_string();
                        effects.push(Effect::SaveConfig {
                            config: state.config.clone(),
                        });
                    }
                    None => {
                        let error = AppError::Config(format!(
                            "model path is not valid UTF-8 and was not saved: {}",
                            path.display()
                        ));
                        effects.push(Effect::error(error.to_string()));
                        state.dialogs.push_back(Dialog::from_app_error(&error));
                    }
                }
            } else {
                effects.push(Effect::info("Model loaded successfully from default path"));
            }
            (state, effects)
        }
        Msg::ModelLoadDone {
            from_picker: false,
            result: Err(AppError::ModelNotFound(_)),
            ..
        } => {
            state.model = ModelState::Unavailable {
                reason: "waiting for model selection".to_string(),
            };
            (
                state,
                vec![
                    Effect::warn("Default model not found, prompting user selection"),
                    Effect::PickModelFile,
                ],
            )
        }
        Msg::ModelLoadDone {
            result: Err(error), ..
        } => {
            let effects = vec![Effect::error(error.to_string())];
            state.model = ModelState::Unavailable {
                reason: error.to_string(),
            };
            state.dialogs.push_back(Dialog::from_app_error(&error));
            state.dialogs.push_back(model_unavailable_dialog());
            (state, effects)
        }
        Msg::ModelFilePicked(Some(path)) => {
            state.model = ModelState::Loading { path: path.clone() };
            (
                state,
                vec![Effect::LoadModel {
                    path,
                    from_picker: true,
                }],
            )
        }
        Msg::ModelFilePicked(None) => {
            state.model = ModelState::Unavailable {
                reason: "no model selected".to_string(),
            };
            state.dialogs.push_back(model_unavailable_dialog());
            (state, vec![Effect::warn("Model selection cancelled")])
        }

        // Image
        Msg::UploadClicked if state.predicting => (state, vec![]),
        Msg::UploadClicked => (state, vec![Effect::PickImageFile]),
        Msg::ImageFilePicked(Some(path)) => (state, vec![Effect::LoadImage { path }]),
        Msg::ImageFilePicked(None) => (state, vec![]),
        Msg::ImageLoadDone(Ok(image)) => {
            let min_side = state.config.min_side();
            if !meets_min_side(image.width(), image.height(), min_side) {
                state.dialogs.push_back(Dialog::warning(
                    "Warning",
                    &format!("Image must be at least {}x{} pixels.", min_side, min_side),
                ));
                let effects = vec![Effect::warn(format!(
                    "Image rejected, {}x{} is below {}x{}: {}",
                    image.width(),
                    image.height(),
                    min_side,
                    min_side,
                    image.path.display()
                ))];
                return (state, effects);
            }

            let effects = vec![Effect::info(format!(
                "Image uploaded: {}",
                image.path.display()
            ))];
            state.status = format!("Image loaded: {}", image.filename);
            state.image = Some(image);
            (state, effects)
        }
        Msg::ImageLoadDone(Err(error)) => {
            let effects = vec![Effect::error(format!("Image upload failed: {}", error))];
            state.dialogs.push_back(Dialog::from_app_error(&error));
            (state, effects)
        }

        // Prediction
        Msg::PredictClicked if state.predicting => (state, vec![]),
        Msg::PredictClicked => {
            let model = match state.loaded_model() {
                Some(model) => model.clone(),
                None => {
                    state.dialogs.push_back(Dialog::error(
                        "Error",
                        "Model not loaded. Cannot make prediction.",
                    ));
                    return (state, vec![]);
                }
            };
            let image = match &state.image {
                Some(image) => image.clone(),
                None => {
                    state
                        .dialogs
                        .push_back(Dialog::error("Error", "No image selected."));
                    return (state, vec![]);
                }
            };

            state.predicting = true;
            state.status = STATUS_PROCESSING.to_string();
            (
                state,
                vec![
                    Effect::info(format!("Predicting for image: {}", image.path.display())),
                    Effect::Classify { model, image },
                ],
            )
        }
        Msg::ClassifyDone {
            filename,
            finished_at,
            result,
        } => {
            state.predicting = false;

            let scores: Result<Vec<f32>, AppError> =
                result.map(|classifications| classifications.iter().map(|c| c.confidence).collect());
            let decision = scores.and_then(|scores| decide(&scores, state.config.threshold));

            match decision {
                Ok(decision) => {
                    state.history.push(PredictionRecord {
                        timestamp: finished_at,
                        filename: filename.clone(),
                        class_index: decision.class_index,
                        confidence: decision.confidence,
                    });
                    let effects = vec![Effect::info(format!(
                        "Prediction completed: Class {}, Confidence {:?}",
                        decision.class_index, decision.scores
                    ))];
                    state.decision = Some(decision);
                    state.classified_filename = Some(filename);
                    state.status = STATUS_DONE.to_string();
                    state.tab = Tab::Results;
                    (state, effects)
                }
                Err(error) => {
                    let effects = vec![Effect::error(error.to_string())];
                    state.status = STATUS_FAILED.to_string();
                    state.dialogs.push_back(Dialog::from_app_error(&error));
                    (state, effects)
                }
            }
        }

        // Tabs and history
        Msg::TabSelected(tab) => {
            state.tab = tab;
            (state, vec![])
        }
        Msg::ClearHistoryClicked => {
            state.history.clear();
            (state, vec![Effect::info("History cleared")])
        }
        Msg::ExportHistoryClicked => {
            if state.history.is_empty() {
                state
                    .dialogs
                    .push_back(Dialog::info("Info", "No history to export."));
                return (state, vec![]);
            }
            (state, vec![Effect::PickExportPath])
        }
        Msg::ExportPathPicked(Some(path)) => {
            let history = state.history.clone();
            (state, vec![Effect::ExportHistory { path, history }])
        }
        Msg::ExportPathPicked(None) => (state, vec![]),
        Msg::ExportDone {
            path,
            result: Ok(()),
        } => {
            state.dialogs.push_back(Dialog::info(
                "Success",
                &format!("History exported to {}", path.display()),
            ));
            (
                state,
                vec![Effect::info(format!("History exported to {}", path.display()))],
            )
        }
        Msg::ExportDone {
            result: Err(error), ..
        } => {
            let effects = vec![Effect::error(format!("History export failed: {}", error))];
            state.dialogs.push_back(Dialog::from_app_error(&error));
            (state, effects)
        }

        Msg::DialogDismissed => {
            state.dialogs.pop_front();
            (state, vec![])
        }
    }
}
