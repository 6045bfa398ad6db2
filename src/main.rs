use app::DetectorApp;
use clap::Parser;
use cli::Cli;
use config::Config;
use eframe::egui;
use file_dialog::impl_rfd::FileDialogRfd;
use image_classifier::impl_fake::{FakeScores, ModelLoaderFake};
use image_classifier::impl_tract_onnx::ModelLoaderTractOnnx;
use image_classifier::interface::ModelLoader;
use library::logger::impl_console::LoggerConsole;
use library::logger::impl_file::LoggerFile;
use library::logger::impl_multi::LoggerMulti;
use library::logger::interface::Logger;
use std::sync::Arc;

mod app;
mod cli;
mod config;
mod detector;
mod error;
mod file_dialog;
mod image_classifier;
mod library;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let file_logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerFile::new(&cli.log_file)?);
    let console_logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new());
    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerMulti::new(vec![file_logger, console_logger]));

    let (config, config_error) = match Config::load_or_create(&cli.config) {
        Ok(config) => (config, None),
        Err(error) => (Config::default(), Some(error)),
    };

    let model_loader: Arc<dyn ModelLoader + Send + Sync> = if cli.demo {
        let _ = logger.warn("Demo mode, predictions are random");
        Arc::new(ModelLoaderFake::new(FakeScores::Random))
    } else {
        Arc::new(ModelLoaderTractOnnx::new())
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Cancer Cell Detection")
            .with_inner_size([900.0, 700.0])
            .with_resizable(false),
        ..Default::default()
    };

    let detector_logger = logger.with_namespace("detector");
    let config_path = cli.config.clone();

    eframe::run_native(
        "Cancer Cell Detection",
        options,
        Box::new(move |cc| {
            Box::new(DetectorApp::new(
                cc,
                config,
                config_error,
                config_path,
                detector_logger,
                model_loader,
                Arc::new(FileDialogRfd::new()),
            ))
        }),
    )
    .map_err(|e| e.to_string())?;

    let _ = logger.info("Application closed");

    Ok(())
}
