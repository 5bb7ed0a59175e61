use eframe::egui;
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use crate::command::ValidationError;
use crate::controller::{Controller, StartError};
use crate::error::AppError;
use crate::localizations::Localizations;
use crate::models::{AppState, Dialog, NoticeKind};
use crate::runner::DownloadOutcome;
use crate::settings::bitrates;
use crate::system;
use crate::theme::*;
use crate::ui::{self, DialogAnswer};

pub struct SpotdlApp {
    pub state: AppState,
    controller: Controller,
    localizer: Localizations,
    bitrates: Vec<String>,
}

impl SpotdlApp {
    /// `startup_error` is shown once the window is up, e.g. an unreadable
    /// settings file that was replaced by defaults.
    pub fn new(controller: Controller, startup_error: Option<AppError>) -> Self {
        let localizer = Localizations::new();
        debug!("UI language: {}", localizer.language());
        let mut state = AppState::new(controller.settings().clone());

        if let Some(e) = startup_error {
            let message = localizer.tr_with("error-settings-load", e);
            push_error(&mut state, &localizer, message);
        }

        Self {
            state,
            controller,
            localizer,
            bitrates: bitrates(),
        }
    }

    /// Lets background downloads wake the frame loop when they post a result.
    pub fn install_waker(&mut self, ctx: &egui::Context) {
        let ctx = ctx.clone();
        self.controller
            .set_waker(Arc::new(move || ctx.request_repaint()));
    }

    pub fn start_download(&mut self) {
        let snapshot = self.state.draft.clone();
        match self.controller.start_download(&snapshot, &self.state.url) {
            Ok(_) => {
                self.state.download_dir = Some(PathBuf::from(&snapshot.output_dir));
            }
            Err(e) => reject_start(&mut self.state, &self.localizer, e),
        }
    }

    fn paste_url(&mut self) {
        match system::clipboard_text() {
            Ok(Some(text)) => self.state.url = text,
            Ok(None) => info!("Clipboard holds no text"),
            Err(e) => {
                warn!("Could not read clipboard: {}", e);
                let message = self.localizer.tr_with("error-clipboard", e);
                push_error(&mut self.state, &self.localizer, message);
            }
        }
    }

    fn save_settings(&mut self) {
        match self.controller.save_settings(self.state.draft.clone()) {
            Ok(()) => {
                let title = self.localizer.tr("title-success");
                let message = self.localizer.tr("settings-saved");
                self.state.push_dialog(Dialog::Notice {
                    kind: NoticeKind::Info,
                    title,
                    message,
                });
            }
            Err(e) => {
                error!("Failed to save settings: {}", e);
                let message = self.localizer.tr_with("error-settings-save", e);
                push_error(&mut self.state, &self.localizer, message);
            }
        }
    }

    fn open_download_folder(&mut self) {
        let dir = self
            .state
            .download_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.controller.output_dir()));

        if let Err(e) = system::open_folder(&dir) {
            let message = self.localizer.tr_with("error-open-folder", e);
            push_error(&mut self.state, &self.localizer, message);
        }
    }

    fn process_outcomes(&mut self) {
        for outcome in self.controller.poll() {
            apply_outcome(&mut self.state, &self.localizer, outcome);
        }
    }

    fn handle_dialog(&mut self, ctx: &egui::Context) {
        let Some(answer) = ui::render_dialog(ctx, &self.state, &self.localizer) else {
            return;
        };
        self.state.close_dialog();
        if answer == DialogAnswer::OpenFolder(true) {
            self.open_download_folder();
        }
    }

    pub fn update_ui(&mut self, ctx: &egui::Context) {
        self.process_outcomes();

        let modal_open = self.state.current_dialog().is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(
                        egui::RichText::new(self.localizer.tr("app-title"))
                            .size(HEADING_FONT_SIZE)
                            .strong(),
                    );
                });
                ui.add_space(20.0);

                let (url_response, paste_clicked) =
                    ui::render_url_input(ui, &mut self.state, &self.localizer);
                if paste_clicked {
                    self.paste_url();
                }
                if url_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    self.start_download();
                }

                ui.add_space(16.0);
                ui::render_format_selector(ui, &mut self.state, &self.localizer);
                ui.add_space(8.0);
                ui::render_bitrate_selector(ui, &mut self.state, &self.localizer, &self.bitrates);
                ui.add_space(8.0);
                ui::render_provider_input(ui, &mut self.state, &self.localizer);
                ui.add_space(16.0);

                if ui::render_download_dir_selector(ui, &mut self.state, &self.localizer) {
                    info!("Output folder set to {}", self.state.draft.output_dir);
                }
                ui.add_space(20.0);

                self.render_buttons(ui);
                ui.add_space(20.0);

                ui::render_status(ui, self.controller.phase(), &self.localizer);
            });
        });

        self.handle_dialog(ctx);
    }

    fn render_buttons(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space((ui.available_width() - 2.0 * MIN_SIZE_BUTTON.x - 20.0).max(0.0) / 2.0);

            let download = ui::primary_button(self.localizer.tr("download-button"));
            if ui
                .add_enabled(!self.controller.is_running(), download)
                .clicked()
            {
                self.start_download();
            }

            ui.add_space(20.0);

            let save = ui::secondary_button(self.localizer.tr("save-button"));
            if ui.add(save).clicked() {
                self.save_settings();
            }
        });
    }
}

impl eframe::App for SpotdlApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_ui(ctx);
    }
}

fn push_error(state: &mut AppState, l10n: &Localizations, message: String) {
    state.push_dialog(Dialog::Notice {
        kind: NoticeKind::Error,
        title: l10n.tr("title-error"),
        message,
    });
}

/// A refused start only raises a notice; the run phase is left alone.
fn reject_start(state: &mut AppState, l10n: &Localizations, err: StartError) {
    let message = match err {
        StartError::Invalid(ValidationError::EmptyUrl) => l10n.tr("error-empty-url"),
        StartError::Invalid(ValidationError::UnsupportedFormat(format)) => {
            l10n.tr_with("error-unsupported-format", format)
        }
        StartError::Invalid(ValidationError::UnsupportedBitrate(bitrate)) => {
            l10n.tr_with("error-unsupported-bitrate", bitrate)
        }
        StartError::Busy => l10n.tr("error-busy"),
    };
    push_error(state, l10n, message);
}

fn apply_outcome(state: &mut AppState, l10n: &Localizations, outcome: DownloadOutcome) {
    match outcome {
        DownloadOutcome::Succeeded { stdout } => {
            let stdout = stdout.trim();
            let message = if stdout.is_empty() {
                l10n.tr("download-complete")
            } else {
                format!("{}\n\n{}", l10n.tr("download-complete"), stdout)
            };
            state.push_dialog(Dialog::Notice {
                kind: NoticeKind::Info,
                title: l10n.tr("title-success"),
                message,
            });
            state.push_dialog(Dialog::OpenFolder);
        }
        DownloadOutcome::ExecutableMissing { path } => {
            let message = l10n.tr_with("error-companion-missing", path.display());
            push_error(state, l10n, message);
        }
        DownloadOutcome::Failed { stderr, exit_code } => {
            let detail = match (stderr.trim(), exit_code) {
                ("", Some(code)) => format!("exit code {code}"),
                ("", None) => "terminated without an exit code".to_string(),
                (text, _) => text.to_string(),
            };
            let message = l10n.tr_with("error-download-failed", detail);
            push_error(state, l10n, message);
        }
    }
}
