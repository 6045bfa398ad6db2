use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_LOG_PATH: &str = "cancer_app.log";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub model_path: String,
    /// Model input as `[width, height]`.
    pub target_size: [u32; 2],
    pub threshold: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: "cancer_detection_model.onnx".to_string(),
            target_size: [48, 48],
            threshold: 0.5,
        }
    }
}

impl Config {
    /// Reads the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, AppError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Config = serde_json::from_str(&contents)
                    .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let config = Config::default();
                config.save(path)?;
                Ok(config)
            }
            Err(e) => Err(AppError::Config(format!("{}: {}", path.display(), e))),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let json = serde_json::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(path, json).map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(AppError::Config(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.target_size.contains(&0) {
            return Err(AppError::Config(format!(
                "target_size must be positive, got {:?}",
                self.target_size
            )));
        }
        Ok(())
    }

    /// Smallest side an uploaded image may have.
    pub fn min_side(&self) -> u32 {
        self.target_size[0].min(self.target_size[1])
    }
}

/// Locates a file shipped with the application. Relative paths are looked up
/// in the working directory first, then next to the executable.
pub fn resolve_resource(path: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(path)))
        .filter(|bundled| bundled.exists())
        .unwrap_or_else(|| path.to_path_buf())
}
