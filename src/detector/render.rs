use crate::detector::core::{Dialog, DialogLevel, ModelState, Msg, State, Tab};
use crate::detector::decision::{format_percent, metrics_rows, Decision, Diagnosis, POSITIVE_CLASS};
use crate::image_classifier::interface::CLASS_LABELS;
use eframe::egui::{self, Align2, Color32, FontId, RichText, Rect, Sense, Stroke, Vec2};
use image::RgbaImage;
use std::sync::Arc;

const HEADER_COLOR: Color32 = Color32::from_rgb(0x2c, 0x3e, 0x50);
const BACKGROUND_COLOR: Color32 = Color32::from_rgb(0xf0, 0xf0, 0xf5);
const STATUS_COLOR: Color32 = Color32::from_rgb(0x55, 0x55, 0x55);
const POSITIVE_COLOR: Color32 = Color32::from_rgb(0xd0, 0x21, 0x21);
const NEGATIVE_COLOR: Color32 = Color32::from_rgb(0x1e, 0x8e, 0x3e);

/// Upload of the current preview. Rebuilt only when a different image is
/// loaded.
pub struct PreviewTexture {
    source: Arc<RgbaImage>,
    handle: egui::TextureHandle,
}

fn diagnosis_color(diagnosis: Diagnosis) -> Color32 {
    match diagnosis {
        Diagnosis::Positive => POSITIVE_COLOR,
        Diagnosis::Negative => NEGATIVE_COLOR,
    }
}

fn class_color(index: usize) -> Color32 {
    if index == POSITIVE_CLASS {
        POSITIVE_COLOR
    } else {
        NEGATIVE_COLOR
    }
}

/// Draws the whole window and returns the messages raised by the user this
/// frame.
pub fn render(ctx: &egui::Context, state: &State, preview: &mut Option<PreviewTexture>) -> Vec<Msg> {
    let mut msgs = Vec::new();
    let interactive = state.active_dialog().is_none();
    let texture = preview_texture(ctx, state, preview);

    egui::TopBottomPanel::top("header")
        .exact_height(70.0)
        .frame(egui::Frame::none().fill(HEADER_COLOR))
        .show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Cancer Cell Detection System")
                        .size(20.0)
                        .strong()
                        .color(Color32::WHITE),
                );
            });
        });

    egui::TopBottomPanel::bottom("footer")
        .exact_height(30.0)
        .frame(egui::Frame::none().fill(HEADER_COLOR))
        .show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("© 2025 Cancer Detection System")
                        .size(8.0)
                        .color(Color32::WHITE),
                );
            });
        });

    egui::SidePanel::left("image_panel")
        .resizable(false)
        .exact_width(420.0)
        .frame(egui::Frame::none().fill(BACKGROUND_COLOR).inner_margin(20.0))
        .show(ctx, |ui| {
            ui.add_enabled_ui(interactive, |ui| {
                render_image_panel(ui, state, texture, &mut msgs);
            });
        });

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(BACKGROUND_COLOR).inner_margin(20.0))
        .show(ctx, |ui| {
            ui.add_enabled_ui(interactive, |ui| {
                render_tabs(ui, state, &mut msgs);
            });
        });

    if state.predicting {
        egui::Area::new(egui::Id::new("progress"))
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.add(egui::Spinner::new().size(48.0));
            });
    }

    if let Some(dialog) = state.active_dialog() {
        render_dialog(ctx, dialog, &mut msgs);
    }

    msgs
}

fn preview_texture(
    ctx: &egui::Context,
    state: &State,
    cache: &mut Option<PreviewTexture>,
) -> Option<(egui::TextureId, Vec2)> {
    let image = state.image.as_ref()?;

    let stale = cache
        .as_ref()
        .map_or(true, |cached| !Arc::ptr_eq(&cached.source, &image.preview));
    if stale {
        let size = [image.preview.width() as usize, image.preview.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.preview.as_raw());
        let handle = ctx.load_texture("preview", color_image, egui::TextureOptions::LINEAR);
        *cache = Some(PreviewTexture {
            source: image.preview.clone(),
            handle,
        });
    }

    cache
        .as_ref()
        .map(|cached| (cached.handle.id(), cached.handle.size_vec2()))
}

fn render_image_panel(
    ui: &mut egui::Ui,
    state: &State,
    texture: Option<(egui::TextureId, Vec2)>,
    msgs: &mut Vec<Msg>,
) {
    let (frame_rect, _) = ui.allocate_exact_size(egui::vec2(380.0, 350.0), Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(frame_rect, 0.0, Color32::WHITE);
    match texture {
        Some((id, size)) => {
            let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(
                id,
                Rect::from_center_size(frame_rect.center(), size),
                uv,
                Color32::WHITE,
            );
        }
        None => {
            painter.text(
                frame_rect.center(),
                Align2::CENTER_CENTER,
                "No Image Selected",
                FontId::proportional(14.0),
                Color32::DARK_GRAY,
            );
        }
    }

    ui.add_space(10.0);
    ui.horizontal(|ui| {
        let upload = egui::Button::new(RichText::new("Upload Image").size(11.0));
        if ui.add_enabled(!state.predicting, upload).clicked() {
            msgs.push(Msg::UploadClicked);
        }
        let detect = egui::Button::new(RichText::new("Detect Cancer").size(11.0));
        if ui.add_enabled(state.predict_enabled(), detect).clicked() {
            msgs.push(Msg::PredictClicked);
        }
    });

    ui.add_space(5.0);
    ui.label(RichText::new(state.status.as_str()).size(10.0).color(STATUS_COLOR));

    let model_line = match &state.model {
        ModelState::Loading { path } => format!("Loading model: {}", path.display()),
        ModelState::Loaded(model) => format!("Model: {}", model.path.display()),
        ModelState::Unavailable { reason } => format!("Model unavailable ({})", reason),
    };
    ui.label(RichText::new(model_line).size(10.0).weak());
}

fn render_tabs(ui: &mut egui::Ui, state: &State, msgs: &mut Vec<Msg>) {
    ui.horizontal(|ui| {
        for (tab, title) in [
            (Tab::Results, "Results"),
            (Tab::Metrics, "Metrics"),
            (Tab::History, "History"),
        ] {
            if ui.selectable_label(state.tab == tab, title).clicked() && state.tab != tab {
                msgs.push(Msg::TabSelected(tab));
            }
        }
    });
    ui.separator();

    match state.tab {
        Tab::Results => render_results(ui, state),
        Tab::Metrics => render_metrics(ui, state),
        Tab::History => render_history(ui, state, msgs),
    }
}

fn render_results(ui: &mut egui::Ui, state: &State) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("Diagnosis Results").size(14.0).strong());
        ui.separator();
        ui.add_space(20.0);

        match &state.decision {
            Some(decision) => {
                ui.label(
                    RichText::new(decision.diagnosis.banner())
                        .size(18.0)
                        .strong()
                        .color(diagnosis_color(decision.diagnosis)),
                );
                ui.add_space(20.0);
                ui.label(
                    RichText::new(format!("Confidence: {}", format_percent(decision.confidence)))
                        .size(12.0),
                );
                ui.add(egui::ProgressBar::new(decision.confidence).desired_width(300.0));
            }
            None => {
                ui.label(RichText::new("No prediction yet").size(18.0).strong());
                ui.add_space(20.0);
                ui.label(RichText::new("Confidence: --").size(12.0));
                ui.add(egui::ProgressBar::new(0.0).desired_width(300.0));
            }
        }
    });

    ui.add_space(10.0);
    let image_name = state
        .classified_filename
        .as_deref()
        .or_else(|| state.image.as_ref().map(|image| image.filename.as_str()))
        .unwrap_or("None");
    ui.label(RichText::new(format!("Image: {}", image_name)).size(10.0));
}

fn render_metrics(ui: &mut egui::Ui, state: &State) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("Detailed Metrics").size(14.0).strong());
    });
    ui.separator();

    ui.label(RichText::new("Confidence Scores").strong());
    render_score_bars(ui, state.decision.as_ref());

    ui.add_space(10.0);
    ui.group(|ui| {
        ui.label(RichText::new("Detailed Analysis").strong());
        egui::Grid::new("metrics_table")
            .num_columns(2)
            .striped(true)
            .min_col_width(150.0)
            .show(ui, |ui| {
                ui.strong("Metric");
                ui.strong("Value");
                ui.end_row();
                for (metric, value) in metrics_rows(state.decision.as_ref(), state.config.threshold) {
                    ui.label(metric);
                    ui.label(value);
                    ui.end_row();
                }
            });
    });
}

/// Horizontal bar per class on a 0..1.1 axis.
fn render_score_bars(ui: &mut egui::Ui, decision: Option<&Decision>) {
    for (index, label) in CLASS_LABELS.iter().enumerate() {
        let score = decision
            .and_then(|d| d.scores.get(index).copied())
            .unwrap_or(0.0);

        ui.horizontal(|ui| {
            ui.add_sized([110.0, 20.0], egui::Label::new(*label));
            let width = (ui.available_width() - 60.0).max(0.0);
            let (track, _) = ui.allocate_exact_size(egui::vec2(width, 20.0), Sense::hover());
            let painter = ui.painter();
            painter.rect_stroke(track, 0.0, Stroke::new(1.0, Color32::LIGHT_GRAY));

            let bar_width = track.width() * score.clamp(0.0, 1.0) / 1.1;
            let bar = Rect::from_min_size(track.min, egui::vec2(bar_width, track.height()));
            painter.rect_filled(bar, 0.0, class_color(index));

            if decision.is_some() {
                painter.text(
                    egui::pos2(bar.right() + 4.0, track.center().y),
                    Align2::LEFT_CENTER,
                    format_percent(score),
                    FontId::proportional(11.0),
                    Color32::BLACK,
                );
            }
        });
    }
    ui.label(RichText::new("Confidence Score").size(10.0).weak());
}

fn render_history(ui: &mut egui::Ui, state: &State, msgs: &mut Vec<Msg>) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("Analysis History").size(14.0).strong());
    });
    ui.separator();

    let table_height = (ui.available_height() - 40.0).max(100.0);
    egui::ScrollArea::vertical()
        .max_height(table_height)
        .show(ui, |ui| {
            egui::Grid::new("history_table")
                .num_columns(4)
                .striped(true)
                .min_col_width(100.0)
                .show(ui, |ui| {
                    for header in ["Date", "Filename", "Result", "Confidence"] {
                        ui.strong(header);
                    }
                    ui.end_row();

                    for record in state.history.iter() {
                        ui.label(record.date());
                        ui.label(record.filename.as_str());
                        ui.label(
                            RichText::new(record.result()).color(class_color(record.class_index)),
                        );
                        ui.label(record.confidence_percent());
                        ui.end_row();
                    }
                });
        });

    ui.add_space(10.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new(format!("{} records", state.history.len())).weak());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Clear History").clicked() {
                msgs.push(Msg::ClearHistoryClicked);
            }
            if ui.button("Export History").clicked() {
                msgs.push(Msg::ExportHistoryClicked);
            }
        });
    });
}

fn render_dialog(ctx: &egui::Context, dialog: &Dialog, msgs: &mut Vec<Msg>) {
    let (icon, color) = match dialog.level {
        DialogLevel::Info => ("ℹ", Color32::from_rgb(0x29, 0x80, 0xb9)),
        DialogLevel::Warning => ("⚠", Color32::from_rgb(0xe6, 0x7e, 0x22)),
        DialogLevel::Error => ("✖", POSITIVE_COLOR),
    };

    egui::Window::new(dialog.title.as_str())
        .id(egui::Id::new("dialog"))
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(icon).size(24.0).color(color));
                ui.label(dialog.message.as_str());
            });
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    msgs.push(Msg::DialogDismissed);
                }
            });
        });
}
