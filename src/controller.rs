//! UI-independent download flow: settings, current run and its outcome.
//!
//! Only one download runs at a time; `start_download` refuses with
//! [`StartError::Busy`] until the running one reaches a terminal state.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use log::{debug, info, warn};
use thiserror::Error;

use crate::command::{self, ValidationError};
use crate::error::AppError;
use crate::runner::{
    DownloadOutcome, ProcessRunner, RunEvent, RunId, RunState, Spawner, SystemSpawner, Waker,
};
use crate::settings::{Settings, SettingsStore};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("a download is already running")]
    Busy,
}

pub struct Controller<S: Spawner = SystemSpawner> {
    store: SettingsStore,
    settings: Settings,
    companion: PathBuf,
    runner: Arc<ProcessRunner<S>>,
    tx: Sender<RunEvent>,
    rx: Receiver<RunEvent>,
    waker: Option<Waker>,
    phase: RunState,
    active: Option<RunId>,
    next_id: RunId,
}

impl Controller<SystemSpawner> {
    pub fn new(store: SettingsStore, settings: Settings, companion: PathBuf) -> Self {
        Self::with_runner(store, settings, companion, ProcessRunner::new(SystemSpawner))
    }
}

impl<S: Spawner + 'static> Controller<S> {
    pub fn with_runner(
        store: SettingsStore,
        settings: Settings,
        companion: PathBuf,
        runner: ProcessRunner<S>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            store,
            settings,
            companion,
            runner: Arc::new(runner),
            tx,
            rx,
            waker: None,
            phase: RunState::Idle,
            active: None,
            next_id: 1,
        }
    }

    pub fn set_waker(&mut self, waker: Waker) {
        self.waker = Some(waker);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn output_dir(&self) -> &str {
        &self.settings.output_dir
    }

    pub fn companion(&self) -> &Path {
        &self.companion
    }

    pub fn phase(&self) -> RunState {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Builds the invocation from a snapshot of `settings` and hands it to
    /// the runner. Validation failures leave the phase untouched.
    pub fn start_download(
        &mut self,
        settings: &Settings,
        raw_url: &str,
    ) -> Result<RunId, StartError> {
        if self.is_running() {
            warn!("Ignoring download request while another one is running");
            return Err(StartError::Busy);
        }

        let invocation = command::build(settings, raw_url, &self.companion)?;

        let id = self.next_id;
        self.next_id += 1;
        self.active = Some(id);
        self.phase = RunState::Running;
        info!("Starting download {} for {}", id, raw_url.trim());

        // The worker is detached; its result comes back through `rx`.
        let _ = self
            .runner
            .dispatch(id, invocation, self.tx.clone(), self.waker.clone());
        Ok(id)
    }

    /// Drains pending events without blocking and returns the outcomes that
    /// arrived since the last call.
    pub fn poll(&mut self) -> Vec<DownloadOutcome> {
        let mut finished = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            match event {
                RunEvent::Started { id } => {
                    debug!("Download {} entered running state", id);
                }
                RunEvent::Finished { id, outcome } => {
                    if self.active == Some(id) {
                        self.active = None;
                        self.phase = RunState::from(&outcome);
                        debug_assert!(self.phase.is_terminal());
                    }
                    debug!("Download {} finished as {:?}", id, RunState::from(&outcome));
                    finished.push(outcome);
                }
            }
        }
        finished
    }

    /// Persists first; the in-memory settings change only if the write worked.
    pub fn save_settings(&mut self, settings: Settings) -> Result<(), AppError> {
        self.store.save(&settings)?;
        self.settings = settings;
        info!("Settings saved to {}", self.store.path().display());
        Ok(())
    }
}
