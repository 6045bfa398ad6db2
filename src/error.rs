use std::fmt;
use std::path::PathBuf;

/// Failures the user gets told about. Each one maps to a dialog title.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    Config(String),
    ModelNotFound(PathBuf),
    Model(String),
    Image(String),
    Prediction(String),
    Export(String),
}

impl AppError {
    pub fn title(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Config Error",
            AppError::ModelNotFound(_) => "Model Not Found",
            AppError::Model(_) => "Model Error",
            AppError::Image(_) | AppError::Prediction(_) | AppError::Export(_) => "Error",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(message) => write!(f, "Invalid configuration: {}", message),
            AppError::ModelNotFound(path) => {
                write!(f, "Model file not found: {}", path.display())
            }
            AppError::Model(message) => write!(f, "Failed to load model: {}", message),
            AppError::Image(message) => write!(f, "Invalid image file: {}", message),
            AppError::Prediction(message) => write!(f, "Prediction failed: {}", message),
            AppError::Export(message) => write!(f, "Failed to export history: {}", message),
        }
    }
}

impl std::error::Error for AppError {}
