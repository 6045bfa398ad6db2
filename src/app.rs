use crate::config::Config;
use crate::detector::core::{init, transition, Msg, State};
use crate::detector::render::{render, PreviewTexture};
use crate::detector::runtime::Runtime;
use crate::error::AppError;
use crate::file_dialog::interface::FileDialog;
use crate::image_classifier::interface::ModelLoader;
use crate::library::logger::interface::Logger;
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

pub struct DetectorApp {
    state: State,
    runtime: Runtime,
    event_receiver: Receiver<Msg>,
    preview: Option<PreviewTexture>,
}

impl DetectorApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Config,
        config_error: Option<AppError>,
        config_path: PathBuf,
        logger: Arc<dyn Logger + Send + Sync>,
        model_loader: Arc<dyn ModelLoader + Send + Sync>,
        file_dialog: Arc<dyn FileDialog + Send + Sync>,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let (event_sender, event_receiver) = channel();
        let egui_ctx = cc.egui_ctx.clone();
        let runtime = Runtime::new(
            logger,
            model_loader,
            file_dialog,
            config_path,
            config.target_size,
            event_sender,
            Arc::new(move || egui_ctx.request_repaint()),
        );

        let (state, effects) = init(config);
        let mut app = Self {
            state,
            runtime,
            event_receiver,
            preview: None,
        };
        app.runtime.execute_effects(effects);

        if let Some(error) = config_error {
            app.dispatch(Msg::ConfigLoadFailed(error));
        }

        app
    }

    fn dispatch(&mut self, msg: Msg) {
        let (state, effects) = transition(self.state.clone(), msg);
        self.state = state;
        self.runtime.execute_effects(effects);
    }
}

impl eframe::App for DetectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(msg) = self.event_receiver.try_recv() {
            self.dispatch(msg);
        }

        let msgs = render(ctx, &self.state, &mut self.preview);

        for msg in msgs {
            self.dispatch(msg);
        }
    }
}
