use crate::file_dialog::interface::FileDialog;
use std::path::PathBuf;

/// Answers every prompt with a preset path.
#[derive(Debug, Clone, Default)]
pub struct FileDialogFake {
    pub image: Option<PathBuf>,
    pub model: Option<PathBuf>,
    pub export_path: Option<PathBuf>,
}

impl FileDialog for FileDialogFake {
    fn pick_image(&self) -> Option<PathBuf> {
        self.image.clone()
    }

    fn pick_model(&self) -> Option<PathBuf> {
        self.model.clone()
    }

    fn pick_export_path(&self) -> Option<PathBuf> {
        self.export_path.clone()
    }
}
