//! Desktop integrations: the native file browser and the clipboard.

use std::path::Path;
use std::process::Command;
use std::thread;

use log::{debug, error, warn};

use crate::error::AppError;

#[cfg(target_os = "windows")]
const FILE_BROWSER: &str = "explorer";

#[cfg(target_os = "macos")]
const FILE_BROWSER: &str = "open";

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const FILE_BROWSER: &str = "xdg-open";

/// Opens `dir` in the system file browser. Only a failure to launch it is
/// reported; its exit status is collected in the background and logged.
pub fn open_folder(dir: &Path) -> Result<(), AppError> {
    launch(FILE_BROWSER, dir)?;
    Ok(())
}

fn launch(program: &str, dir: &Path) -> Result<thread::JoinHandle<()>, AppError> {
    debug!("Opening {} with {}", dir.display(), program);
    let mut child = Command::new(program).arg(dir).spawn().map_err(|e| {
        error!("Failed to open {}: {}", dir.display(), e);
        AppError::Io(e)
    })?;

    let dir = dir.to_path_buf();
    let program = program.to_string();
    Ok(thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => {
            warn!("{} exited with {} for {}", program, status, dir.display());
        }
        Ok(_) => {}
        Err(e) => warn!("Failed to wait for {}: {}", program, e),
    }))
}

/// Text currently on the clipboard, or `None` when it holds only whitespace.
pub fn clipboard_text() -> Result<Option<String>, AppError> {
    let mut clipboard = arboard::Clipboard::new().map_err(AppError::clipboard)?;
    let text = clipboard.get_text().map_err(AppError::clipboard)?;
    if text.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}
