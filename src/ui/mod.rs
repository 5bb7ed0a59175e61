use eframe::egui;
use rfd::FileDialog;
use std::path::{Path, PathBuf};

use crate::localizations::Localizations;
use crate::models::{status_is_error, status_key, AppState, Dialog, NoticeKind};
use crate::runner::RunState;
use crate::settings::FORMATS;
use crate::theme::*;

/// What the user did with the dialog at the front of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAnswer {
    Dismissed,
    OpenFolder(bool),
}

/// Returns the text field's response and whether "Paste URL" was clicked.
pub fn render_url_input(
    ui: &mut egui::Ui,
    state: &mut AppState,
    l10n: &Localizations,
) -> (egui::Response, bool) {
    ui.label(l10n.tr("url-label"));

    let mut paste_clicked = false;
    let response = egui::Frame::group(ui.style())
        .fill(INPUT_BG)
        .stroke(egui::Stroke::new(1.0, egui::Color32::LIGHT_GRAY))
        .rounding(ROUNDING_FRAME)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                let response = ui.add_sized(
                    [ui.available_width() - 110.0, 32.0],
                    egui::TextEdit::singleline(&mut state.url)
                        .hint_text(l10n.tr("url-placeholder"))
                        .font(egui::FontId::proportional(16.0)),
                );
                if ui
                    .add_sized([100.0, 32.0], egui::Button::new(l10n.tr("paste-button")))
                    .clicked()
                {
                    paste_clicked = true;
                }
                response
            })
            .inner
        })
        .inner;

    (response, paste_clicked)
}

fn render_choice(
    ui: &mut egui::Ui,
    id: &str,
    label: String,
    current: &mut String,
    choices: impl IntoIterator<Item = String>,
) {
    ui.horizontal(|ui| {
        ui.add_sized([140.0, 20.0], egui::Label::new(label));
        egui::ComboBox::from_id_source(id)
            .width(COMBO_WIDTH)
            .selected_text(current.clone())
            .show_ui(ui, |ui| {
                for choice in choices {
                    let text = choice.clone();
                    ui.selectable_value(current, choice, text);
                }
            });
    });
}

pub fn render_format_selector(ui: &mut egui::Ui, state: &mut AppState, l10n: &Localizations) {
    render_choice(
        ui,
        "format",
        l10n.tr("format-label"),
        &mut state.draft.format,
        FORMATS.iter().map(|f| f.to_string()),
    );
}

pub fn render_bitrate_selector(
    ui: &mut egui::Ui,
    state: &mut AppState,
    l10n: &Localizations,
    bitrates: &[String],
) {
    render_choice(
        ui,
        "bitrate",
        l10n.tr("bitrate-label"),
        &mut state.draft.bitrate,
        bitrates.iter().cloned(),
    );
}

pub fn render_provider_input(ui: &mut egui::Ui, state: &mut AppState, l10n: &Localizations) {
    ui.horizontal(|ui| {
        ui.add_sized([140.0, 20.0], egui::Label::new(l10n.tr("provider-label")));
        ui.add(
            egui::TextEdit::singleline(&mut state.draft.audio_provider)
                .desired_width(COMBO_WIDTH)
                .hint_text(crate::settings::DEFAULT_AUDIO_PROVIDER),
        );
    });
}

/// Where the folder picker opens: the current output folder if it exists,
/// else the user's download folder.
fn picker_start_dir(output_dir: &str) -> PathBuf {
    let current = Path::new(output_dir);
    if current.is_dir() {
        return current.to_path_buf();
    }
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns true when a new folder was picked.
pub fn render_download_dir_selector(
    ui: &mut egui::Ui,
    state: &mut AppState,
    l10n: &Localizations,
) -> bool {
    let mut changed = false;

    ui.vertical_centered(|ui| {
        let button = egui::Button::new(
            egui::RichText::new(l10n.tr("choose-folder-button")).size(14.0),
        )
        .min_size(egui::vec2(260.0, 32.0))
        .rounding(ROUNDING_FRAME);

        if ui.add(button).clicked() {
            if let Some(path) = FileDialog::new()
                .set_directory(picker_start_dir(&state.draft.output_dir))
                .pick_folder()
            {
                state.draft.output_dir = path.to_string_lossy().to_string();
                changed = true;
            }
        }
    });

    ui.add_space(6.0);
    ui.label(
        egui::RichText::new(format!(
            "{} {}",
            l10n.tr("folder-label"),
            state.draft.output_dir
        ))
        .color(SECONDARY_TEXT),
    );

    changed
}

/// The status line follows the controller's run phase.
pub fn render_status(ui: &mut egui::Ui, phase: RunState, l10n: &Localizations) {
    egui::Frame::group(ui.style())
        .fill(STATUS_BG)
        .rounding(8.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                let text = format!("{} {}", l10n.tr("status-label"), l10n.tr(status_key(phase)));
                let color = if status_is_error(phase) {
                    TEXT_ERROR
                } else if phase == RunState::Succeeded {
                    TEXT_SUCCESS
                } else {
                    egui::Color32::DARK_GRAY
                };
                ui.label(egui::RichText::new(text).color(color));
                if phase == RunState::Running {
                    ui.spinner();
                }
            });
        });
}

/// Draws the dialog at the front of the queue as a centered modal window.
pub fn render_dialog(
    ctx: &egui::Context,
    state: &AppState,
    l10n: &Localizations,
) -> Option<DialogAnswer> {
    let dialog = state.current_dialog()?;
    let mut answer = None;

    let title = match dialog {
        Dialog::Notice { title, .. } => title.clone(),
        Dialog::OpenFolder => l10n.tr("title-open-folder"),
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_max_width(420.0);
            match dialog {
                Dialog::Notice { kind, message, .. } => {
                    let color = match kind {
                        NoticeKind::Info => egui::Color32::DARK_GRAY,
                        NoticeKind::Error => TEXT_ERROR,
                    };
                    egui::ScrollArea::vertical()
                        .max_height(240.0)
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new(message).color(color));
                        });
                    ui.add_space(10.0);
                    if ui.button(l10n.tr("ok-button")).clicked() {
                        answer = Some(DialogAnswer::Dismissed);
                    }
                }
                Dialog::OpenFolder => {
                    ui.label(l10n.tr("open-folder-question"));
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button(l10n.tr("yes-button")).clicked() {
                            answer = Some(DialogAnswer::OpenFolder(true));
                        }
                        if ui.button(l10n.tr("no-button")).clicked() {
                            answer = Some(DialogAnswer::OpenFolder(false));
                        }
                    });
                }
            }
        });

    answer
}

pub fn primary_button(text: String) -> impl egui::Widget {
    egui::Button::new(
        egui::RichText::new(text)
            .size(BUTTON_FONT_SIZE)
            .color(BUTTON_MAIN_TEXT),
    )
    .min_size(MIN_SIZE_BUTTON)
    .fill(PRIMARY_BUTTON_BG)
    .rounding(ROUNDING_BUTTON)
    .stroke(egui::Stroke::new(1.0, BORDER_COLOR))
}

pub fn secondary_button(text: String) -> impl egui::Widget {
    egui::Button::new(
        egui::RichText::new(text)
            .size(BUTTON_FONT_SIZE)
            .color(BUTTON_SECONDARY_TEXT),
    )
    .min_size(MIN_SIZE_BUTTON)
    .fill(SECONDARY_BUTTON_BG)
    .rounding(ROUNDING_BUTTON)
    .stroke(egui::Stroke::new(1.0, BORDER_COLOR))
}
