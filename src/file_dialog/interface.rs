use std::path::PathBuf;

/// Native file pickers. `None` means the user cancelled.
pub trait FileDialog {
    fn pick_image(&self) -> Option<PathBuf>;
    fn pick_model(&self) -> Option<PathBuf>;
    fn pick_export_path(&self) -> Option<PathBuf>;
}
