use std::path::PathBuf;

use crate::runner::RunState;
use crate::settings::Settings;

/// Status line text for the controller's run phase.
pub fn status_key(phase: RunState) -> &'static str {
    match phase {
        RunState::Idle => "status-waiting",
        RunState::Running => "status-starting",
        RunState::Succeeded => "status-completed",
        RunState::ExecutableMissing => "status-companion-missing",
        RunState::Failed => "status-failed",
    }
}

pub fn status_is_error(phase: RunState) -> bool {
    matches!(phase, RunState::ExecutableMissing | RunState::Failed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Notice {
        kind: NoticeKind,
        title: String,
        message: String,
    },
    /// Asked after a successful download.
    OpenFolder,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub url: String,
    /// What the widgets show; becomes the saved settings on "Save".
    pub draft: Settings,
    /// Output folder of the most recently started download.
    pub download_dir: Option<PathBuf>,
    /// Modal dialogs, shown one at a time from the front.
    pub dialogs: Vec<Dialog>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            draft: settings,
            ..Default::default()
        }
    }

    pub fn push_dialog(&mut self, dialog: Dialog) {
        self.dialogs.push(dialog);
    }

    pub fn current_dialog(&self) -> Option<&Dialog> {
        self.dialogs.first()
    }

    pub fn close_dialog(&mut self) {
        if !self.dialogs.is_empty() {
            self.dialogs.remove(0);
        }
    }
}
