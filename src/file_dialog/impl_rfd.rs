use crate::file_dialog::interface::FileDialog;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct FileDialogRfd;

impl FileDialogRfd {
    pub fn new() -> Self {
        Self
    }
}

impl FileDialog for FileDialogRfd {
    fn pick_image(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select Image")
            .add_filter("Image files", &["jpg", "jpeg", "png"])
            .pick_file()
    }

    fn pick_model(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select Model File")
            .add_filter("ONNX files", &["onnx"])
            .pick_file()
    }

    fn pick_export_path(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Export History")
            .add_filter("CSV files", &["csv"])
            .add_filter("All files", &["*"])
            .set_file_name("history.csv")
            .save_file()
            .map(|path| {
                if path.extension().is_none() {
                    path.with_extension("csv")
                } else {
                    path
                }
            })
    }
}
